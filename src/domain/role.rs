use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Which side of the app the current user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn parse(role: &str) -> Result<Self, ValidationError> {
        match role {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            _ => Err(ValidationError::new(format!("Unknown role: {role}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[test]
fn test_roles_round_trip_through_their_stored_form() {
    for role in [Role::Admin, Role::Member] {
        assert_eq!(Role::parse(role.as_str()), Ok(role));
    }
}

#[test]
fn test_unknown_roles_are_rejected() {
    for unknown in ["", "Admin", "lead"] {
        assert!(Role::parse(unknown).is_err(), "{unknown} should not parse");
    }
}
