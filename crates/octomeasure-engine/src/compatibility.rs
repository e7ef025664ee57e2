//! Return-type compatibility between a group's population basis and a
//! resolved CQL definition.

use octomeasure_cql::ResolvedType;

/// `true` when `resolved` can serve a population over `population_basis`.
///
/// Names are compared ignoring case and whitespace. `Unresolved` is never
/// compatible; callers report it separately.
pub fn is_compatible(population_basis: &str, resolved: &ResolvedType) -> bool {
    let Some(name) = resolved.name() else {
        return false;
    };
    if normalize(population_basis) == "boolean" {
        return resolved.is_boolean();
    }
    normalize(population_basis) == normalize(name)
}

fn normalize(type_name: &str) -> String {
    type_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names() {
        assert!(is_compatible("Encounter", &ResolvedType::named("Encounter")));
        assert!(is_compatible("encounter", &ResolvedType::named("Encounter")));
        assert!(is_compatible("Medication Request", &ResolvedType::named("MedicationRequest")));
    }

    #[test]
    fn test_boolean_basis() {
        assert!(is_compatible("Boolean", &ResolvedType::named("Boolean")));
        assert!(is_compatible(" boolean", &ResolvedType::named("Boolean")));
        assert!(!is_compatible("Boolean", &ResolvedType::named("Encounter")));
    }

    #[test]
    fn test_mismatch_and_unresolved() {
        assert!(!is_compatible("Encounter", &ResolvedType::named("Boolean")));
        assert!(!is_compatible("Encounter", &ResolvedType::named("Procedure")));
        assert!(!is_compatible("Encounter", &ResolvedType::Unresolved));
        assert!(!is_compatible("Boolean", &ResolvedType::Unresolved));
    }
}
