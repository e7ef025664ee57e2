//! Minimal ELM (Expression Logical Model) reader.
//!
//! Only the statement table is read: definition names, whether a statement
//! is a function, and the declared result/operand types. Expression bodies
//! are ignored.

use crate::error::{CqlError, CqlResult};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct ElmDocument {
    library: ElmLibraryNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElmLibraryNode {
    #[serde(default)]
    identifier: Option<ElmIdentifier>,
    #[serde(default)]
    statements: Option<ElmStatements>,
}

#[derive(Debug, Deserialize)]
struct ElmIdentifier {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ElmStatements {
    #[serde(default)]
    def: Vec<ElmStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElmStatement {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    result_type_name: Option<String>,
    #[serde(default)]
    result_type_specifier: Option<TypeSpecifier>,
    #[serde(default)]
    expression: Option<ExpressionTypes>,
    #[serde(default)]
    operand: Vec<ElmOperand>,
}

/// Type annotations the translator may leave on the expression instead of
/// the statement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpressionTypes {
    #[serde(default)]
    result_type_name: Option<String>,
    #[serde(default)]
    result_type_specifier: Option<TypeSpecifier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElmOperand {
    #[serde(default)]
    operand_type: Option<String>,
    #[serde(default)]
    operand_type_specifier: Option<TypeSpecifier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeSpecifier {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    element_type: Option<Box<TypeSpecifier>>,
}

impl TypeSpecifier {
    /// Named types resolve to their name; list types to their element type.
    fn type_name(&self) -> Option<String> {
        match (&self.name, &self.element_type) {
            (Some(name), _) => Some(strip_namespace(name)),
            (None, Some(element)) => element.type_name(),
            (None, None) => None,
        }
    }
}

/// `{urn:hl7-org:elm-types:r1}Boolean` -> `Boolean`
pub fn strip_namespace(qualified: &str) -> String {
    match qualified.rsplit_once('}') {
        Some((_, local)) => local.to_string(),
        None => qualified.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Expression,
    Function,
}

/// One `define` statement of a compiled library.
#[derive(Debug, Clone, PartialEq)]
pub struct ElmDefinition {
    pub name: String,
    pub kind: DefinitionKind,
    /// Declared result type (element type for lists), namespace stripped.
    pub result_type: Option<String>,
    /// Declared operand types in order, namespace stripped.
    pub operand_types: Vec<Option<String>>,
}

impl ElmDefinition {
    /// Type this definition contributes when compared with a population basis.
    ///
    /// Expressions contribute their result type. Functions are observations
    /// applied over the population, so they contribute the type of their
    /// first operand; a parameterless function runs once per patient and
    /// counts as `Boolean`.
    pub fn basis_type(&self) -> Option<String> {
        match self.kind {
            DefinitionKind::Expression => self.result_type.clone(),
            DefinitionKind::Function => match self.operand_types.first() {
                None => Some("Boolean".to_string()),
                Some(operand) => operand.clone(),
            },
        }
    }
}

impl From<ElmStatement> for ElmDefinition {
    fn from(stmt: ElmStatement) -> Self {
        let kind = if stmt.kind.as_deref() == Some("FunctionDef") || !stmt.operand.is_empty() {
            DefinitionKind::Function
        } else {
            DefinitionKind::Expression
        };

        let result_type = stmt
            .result_type_name
            .as_deref()
            .map(strip_namespace)
            .or_else(|| stmt.result_type_specifier.as_ref().and_then(TypeSpecifier::type_name))
            .or_else(|| {
                stmt.expression.as_ref().and_then(|expr| {
                    expr.result_type_name
                        .as_deref()
                        .map(strip_namespace)
                        .or_else(|| {
                            expr.result_type_specifier
                                .as_ref()
                                .and_then(TypeSpecifier::type_name)
                        })
                })
            });

        let operand_types = stmt
            .operand
            .iter()
            .map(|op| {
                op.operand_type
                    .as_deref()
                    .map(strip_namespace)
                    .or_else(|| op.operand_type_specifier.as_ref().and_then(TypeSpecifier::type_name))
            })
            .collect();

        Self {
            name: stmt.name,
            kind,
            result_type,
            operand_types,
        }
    }
}

/// Statement table of a compiled CQL library.
#[derive(Debug, Clone, PartialEq)]
pub struct ElmLibrary {
    pub identifier: Option<String>,
    pub version: Option<String>,
    definitions: HashMap<String, ElmDefinition>,
}

impl ElmLibrary {
    /// Parses an ELM JSON document.
    ///
    /// Overloaded functions share a name; the first overload wins.
    pub fn parse(elm_json: &str) -> CqlResult<Self> {
        if elm_json.trim().is_empty() {
            return Err(CqlError::MissingArtifact);
        }
        let doc: ElmDocument = serde_json::from_str(elm_json)
            .map_err(|e| CqlError::invalid_artifact(format!("not an ELM library: {e}")))?;

        let mut definitions = HashMap::new();
        for stmt in doc.library.statements.map(|s| s.def).unwrap_or_default() {
            let def = ElmDefinition::from(stmt);
            definitions.entry(def.name.clone()).or_insert(def);
        }

        let (identifier, version) = match doc.library.identifier {
            Some(ident) => (ident.id, ident.version),
            None => (None, None),
        };

        Ok(Self {
            identifier,
            version,
            definitions,
        })
    }

    pub fn definition(&self, name: &str) -> Option<&ElmDefinition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_elm() -> String {
        json!({
            "library": {
                "identifier": {"id": "HospitalHarm", "version": "1.0.000"},
                "statements": {"def": [
                    {"name": "Patient", "context": "Patient",
                     "expression": {"type": "SingletonFrom"}},
                    {"name": "Initial Population",
                     "resultTypeName": "{urn:hl7-org:elm-types:r1}Boolean"},
                    {"name": "Qualifying Encounters",
                     "resultTypeSpecifier": {
                        "type": "ListTypeSpecifier",
                        "elementType": {"type": "NamedTypeSpecifier",
                                        "name": "{http://hl7.org/fhir}Encounter"}}},
                    {"name": "Age At Start",
                     "expression": {"resultTypeName": "{urn:hl7-org:elm-types:r1}Integer"}},
                    {"name": "Length Of Stay", "type": "FunctionDef",
                     "resultTypeName": "{urn:hl7-org:elm-types:r1}Integer",
                     "operand": [{"name": "Encounter",
                                  "operandTypeSpecifier": {
                                      "type": "NamedTypeSpecifier",
                                      "name": "{http://hl7.org/fhir}Encounter"}}]},
                    {"name": "Patient Count", "type": "FunctionDef",
                     "resultTypeName": "{urn:hl7-org:elm-types:r1}Integer",
                     "operand": []}
                ]}
            }
        })
        .to_string()
    }

    #[test]
    fn test_strip_namespace() {
        assert_eq!(strip_namespace("{urn:hl7-org:elm-types:r1}Boolean"), "Boolean");
        assert_eq!(strip_namespace("{http://hl7.org/fhir}Encounter"), "Encounter");
        assert_eq!(strip_namespace("Encounter"), "Encounter");
    }

    #[test]
    fn test_parse_statement_table() {
        let lib = ElmLibrary::parse(&sample_elm()).unwrap();
        assert_eq!(lib.identifier.as_deref(), Some("HospitalHarm"));
        assert_eq!(lib.version.as_deref(), Some("1.0.000"));
        assert_eq!(lib.len(), 6);

        let ip = lib.definition("Initial Population").unwrap();
        assert_eq!(ip.kind, DefinitionKind::Expression);
        assert_eq!(ip.basis_type().as_deref(), Some("Boolean"));

        let enc = lib.definition("Qualifying Encounters").unwrap();
        assert_eq!(enc.basis_type().as_deref(), Some("Encounter"));

        let age = lib.definition("Age At Start").unwrap();
        assert_eq!(age.basis_type().as_deref(), Some("Integer"));

        let patient = lib.definition("Patient").unwrap();
        assert_eq!(patient.basis_type(), None);
    }

    #[test]
    fn test_functions_contribute_operand_type() {
        let lib = ElmLibrary::parse(&sample_elm()).unwrap();

        let los = lib.definition("Length Of Stay").unwrap();
        assert_eq!(los.kind, DefinitionKind::Function);
        assert_eq!(los.result_type.as_deref(), Some("Integer"));
        assert_eq!(los.basis_type().as_deref(), Some("Encounter"));

        let count = lib.definition("Patient Count").unwrap();
        assert_eq!(count.basis_type().as_deref(), Some("Boolean"));
    }

    #[test]
    fn test_parse_rejects_non_elm() {
        assert!(matches!(ElmLibrary::parse(""), Err(CqlError::MissingArtifact)));
        assert!(matches!(
            ElmLibrary::parse("library Foo version '1'"),
            Err(CqlError::InvalidArtifact(_))
        ));
        assert!(matches!(
            ElmLibrary::parse(r#"{"statements": []}"#),
            Err(CqlError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_library_without_statements_is_empty() {
        let lib = ElmLibrary::parse(r#"{"library": {}}"#).unwrap();
        assert!(lib.is_empty());
    }
}
