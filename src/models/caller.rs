use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    RegularMember,
    OrganizationAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::RegularMember => "REGULAR_MEMBER",
            Role::OrganizationAdmin => "ORGANIZATION_ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

/// Identity handed in by the auth layer; trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub role: Role,
    pub owner_id: String,
    pub affiliation_id: Option<String>,
}

impl CallerContext {
    pub fn member(owner_id: &str) -> Self {
        Self {
            role: Role::RegularMember,
            owner_id: owner_id.to_string(),
            affiliation_id: None,
        }
    }
}
