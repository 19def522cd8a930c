//! # Actions
//!
//! Defines the verbs a subject may request against a resource.
//! The vocabulary is closed; action names arriving from callers are parsed
//! into [`Action`] and anything unrecognized is denied.

use serde::{Deserialize, Serialize};

/// Actions that can be requested on resources.
///
/// - **Create**: Create new resource instances
/// - **Read**: View/access resource data
/// - **Update**: Modify existing resource data
/// - **Delete**: Remove resource instances
/// - **TransferOwnership**: Hand a resource over to another user
/// - **Manage**: Wildcard; a rule granting `Manage` covers every action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create new resource.
    Create,

    /// Read/view resource.
    Read,

    /// Update existing resource.
    Update,

    /// Delete resource.
    ///
    /// Grants permission to permanently remove resources.
    Delete,

    /// Transfer ownership of a resource to another user.
    TransferOwnership,

    /// Manage resource.
    ///
    /// When it appears in a rule it matches every action. When requested,
    /// only rules that themselves list `Manage` match.
    Manage,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::TransferOwnership => "transfer_ownership",
            Action::Manage => "manage",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use saas_auth::actions::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("get"), Some(Action::Read)); // Alias
    /// assert_eq!(Action::parse("transfer_ownership"), Some(Action::TransferOwnership));
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "create" | "add" | "new" => Some(Action::Create),
            "read" | "get" | "view" => Some(Action::Read),
            "update" | "edit" | "modify" | "put" | "patch" => Some(Action::Update),
            "delete" | "remove" | "destroy" => Some(Action::Delete),
            "transfer_ownership" | "transfer-ownership" | "transfer" => {
                Some(Action::TransferOwnership)
            }
            "manage" | "admin" | "administer" => Some(Action::Manage),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::TransferOwnership,
            Action::Manage,
        ]
    }

    /// Check whether a rule listing this action covers a requested action.
    ///
    /// `Manage` covers everything; every other action covers only itself.
    ///
    /// # Example
    ///
    /// ```
    /// use saas_auth::actions::Action;
    ///
    /// assert!(Action::Manage.covers(Action::TransferOwnership));
    /// assert!(Action::Update.covers(Action::Update));
    /// assert!(!Action::Update.covers(Action::Read));
    /// assert!(!Action::Read.covers(Action::Manage));
    /// ```
    pub fn covers(&self, requested: Action) -> bool {
        *self == Action::Manage || *self == requested
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::parse("read"), Some(Action::Read));
        assert_eq!(Action::parse("view"), Some(Action::Read));
        assert_eq!(Action::parse("GET"), Some(Action::Read));

        assert_eq!(Action::parse("create"), Some(Action::Create));
        assert_eq!(Action::parse("add"), Some(Action::Create));

        assert_eq!(Action::parse("update"), Some(Action::Update));
        assert_eq!(Action::parse("edit"), Some(Action::Update));
        assert_eq!(Action::parse("patch"), Some(Action::Update));

        assert_eq!(Action::parse("delete"), Some(Action::Delete));
        assert_eq!(Action::parse("remove"), Some(Action::Delete));

        assert_eq!(
            Action::parse("transfer_ownership"),
            Some(Action::TransferOwnership)
        );
        assert_eq!(Action::parse("manage"), Some(Action::Manage));

        assert_eq!(Action::parse("invalid"), None);
        assert_eq!(Action::parse(""), None);
    }

    #[test]
    fn test_action_as_str_round_trips_through_parse() {
        for action in Action::all() {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_manage_covers_everything() {
        for action in Action::all() {
            assert!(Action::Manage.covers(action));
        }
    }

    #[test]
    fn test_plain_actions_cover_only_themselves() {
        assert!(Action::Read.covers(Action::Read));
        assert!(!Action::Read.covers(Action::Update));
        assert!(!Action::Update.covers(Action::TransferOwnership));
        assert!(!Action::Create.covers(Action::Manage));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Action::TransferOwnership).unwrap();
        assert_eq!(json, "\"transfer_ownership\"");
        let back: Action = serde_json::from_str("\"manage\"").unwrap();
        assert_eq!(back, Action::Manage);
    }
}
