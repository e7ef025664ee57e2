//! The measure aggregate.

use crate::group::Group;
use crate::test_case::TestCase;
use crate::time::{Timestamp, now_utc};
use crate::version::{LifecycleState, Version};
use serde::{Deserialize, Serialize};

/// Role granted to a user the measure is shared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclRole {
    SharedWith,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclSpecification {
    pub user_id: String,
    #[serde(default)]
    pub roles: Vec<AclRole>,
}

/// A versioned clinical quality measure and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cql_library_name: Option<String>,
    /// Model family key, e.g. `QI-Core v4.1.1`.
    pub model: String,
    #[serde(default = "default_draft")]
    pub draft: bool,
    #[serde(default)]
    pub version: Version,
    /// Compiled (ELM JSON) form of the measure's CQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elm_json: Option<String>,
    #[serde(default)]
    pub cql_errors: bool,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acls: Vec<AclSpecification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
}

fn default_draft() -> bool {
    true
}

impl Measure {
    /// A fresh draft measure at version 0.0.0.
    pub fn new(id: impl Into<String>, model: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            measure_name: None,
            cql_library_name: None,
            model: model.into(),
            draft: true,
            version: Version::default(),
            elm_json: None,
            cql_errors: false,
            groups: Vec::new(),
            test_cases: Vec::new(),
            created_by: owner.into(),
            acls: Vec::new(),
            last_modified_at: None,
            last_modified_by: None,
        }
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        LifecycleState::from_draft_flag(self.draft)
    }

    pub fn is_owned_by(&self, user: &str) -> bool {
        self.created_by.eq_ignore_ascii_case(user)
    }

    pub fn is_shared_with(&self, user: &str) -> bool {
        self.acls.iter().any(|acl| {
            acl.user_id.eq_ignore_ascii_case(user) && acl.roles.contains(&AclRole::SharedWith)
        })
    }

    /// Position of the group with the given id in the ordered group list.
    pub fn group_index(&self, group_id: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.id.as_deref() == Some(group_id))
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.group_index(group_id).map(|idx| &self.groups[idx])
    }

    /// Stamps last-modified metadata.
    pub fn touch(&mut self, user: &str) {
        self.last_modified_at = Some(now_utc());
        self.last_modified_by = Some(user.to_string());
    }
}
