// Identifier helpers shared by groups, group members and test cases.

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// `true` when an optional identifier is absent or only whitespace.
pub fn is_blank(id: Option<&str>) -> bool {
    id.is_none_or(|s| s.trim().is_empty())
}
