//! Platform roles

use serde::{Deserialize, Serialize};

/// Role carried by the access token, gating which views are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Expert,
    Vendor,
}

impl Role {
    /// Parse the backend's role string. Unknown roles map to `None` so the
    /// guard can treat them as unrecognized instead of failing a decode.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            "expert" => Some(Self::Expert),
            "vendor" => Some(Self::Vendor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Expert => "expert",
            Self::Vendor => "vendor",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Worker-type roles land on the tasks view as their home.
    pub fn is_worker(&self) -> bool {
        matches!(self, Self::User | Self::Expert | Self::Vendor)
    }

    /// Tab label used by the users view ("Admins", "Experts", "Vendors").
    pub fn plural_label(&self) -> &'static str {
        match self {
            Self::Admin => "Admins",
            Self::User => "Users",
            Self::Expert => "Experts",
            Self::Vendor => "Vendors",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trip() {
        for role in [Role::Admin, Role::User, Role::Expert, Role::Vendor] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("operator"), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn worker_classification() {
        assert!(!Role::Admin.is_worker());
        assert!(Role::User.is_worker());
        assert!(Role::Expert.is_worker());
        assert!(Role::Vendor.is_worker());
    }
}
