//! Workspace (tenant) types and the registration-time workspace choice.

use chrono::{DateTime, Utc};
use eleads_core::{AppError, AppResult, NonEmptyString, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Maximum accepted workspace name length in characters.
pub const WORKSPACE_NAME_MAX_LENGTH: usize = 120;

/// Tenant boundary owning users, leads, clients and invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: WorkspaceName,
    created_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates a workspace from persisted values.
    #[must_use]
    pub fn new(id: WorkspaceId, name: WorkspaceName, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    /// Returns the workspace id.
    #[must_use]
    pub fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the workspace display name.
    #[must_use]
    pub fn name(&self) -> &WorkspaceName {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Validated workspace name. Uniqueness is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WorkspaceName(NonEmptyString);

impl WorkspaceName {
    /// Creates a trimmed, length-checked workspace name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let name = NonEmptyString::for_field("workspace name", value)?;
        if name.as_str().chars().count() > WORKSPACE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "workspace name must not exceed {WORKSPACE_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(name))
    }

    /// Returns the name as entered (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the key used for case-insensitive uniqueness.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        self.0.as_str().to_lowercase()
    }
}

/// Explicit workspace mode picked in the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceMode {
    /// Found a new workspace.
    New,
    /// Join an existing workspace.
    Existing,
}

/// Raw workspace choice from a registration submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceChoice {
    /// Optional explicit mode; inferred from the supplied field when absent.
    pub mode: Option<WorkspaceMode>,
    /// Name of a workspace to create.
    pub name: Option<String>,
    /// Identifier of a workspace to join.
    pub id: Option<String>,
}

/// Workspace choice after validation: exactly one alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedWorkspaceChoice {
    /// Create a workspace with this name; the registrant becomes ADMIN.
    New {
        /// Validated workspace name.
        name: WorkspaceName,
    },
    /// Join the workspace with this identifier as USER.
    Existing {
        /// Trimmed workspace identifier as supplied.
        id: String,
    },
}

const EXACTLY_ONE_MESSAGE: &str = "exactly one of name/id required";

/// Validates that a registration names exactly one workspace alternative.
pub fn validate_workspace_choice(choice: &WorkspaceChoice) -> AppResult<NormalizedWorkspaceChoice> {
    let name = present(choice.name.as_deref());
    let id = present(choice.id.as_deref());

    match (choice.mode, name, id) {
        (_, Some(_), Some(_)) => Err(AppError::Validation(EXACTLY_ONE_MESSAGE.to_owned())),
        (Some(WorkspaceMode::New), None, Some(_))
        | (Some(WorkspaceMode::Existing), Some(_), None) => {
            Err(AppError::Validation(EXACTLY_ONE_MESSAGE.to_owned()))
        }
        (Some(WorkspaceMode::New), None, None) => {
            Err(AppError::Validation("workspace name required".to_owned()))
        }
        (Some(WorkspaceMode::Existing), None, None) => {
            Err(AppError::Validation("workspace id required".to_owned()))
        }
        (None, None, None) => Err(AppError::Validation(EXACTLY_ONE_MESSAGE.to_owned())),
        (Some(WorkspaceMode::New) | None, Some(name), None) => {
            Ok(NormalizedWorkspaceChoice::New {
                name: WorkspaceName::new(name)?,
            })
        }
        (Some(WorkspaceMode::Existing) | None, None, Some(id)) => {
            Ok(NormalizedWorkspaceChoice::Existing { id: id.to_owned() })
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(name: &str, id: &str) -> WorkspaceChoice {
        WorkspaceChoice {
            mode: None,
            name: Some(name.to_owned()),
            id: Some(id.to_owned()),
        }
    }

    fn validation_message(result: AppResult<NormalizedWorkspaceChoice>) -> String {
        match result {
            Err(AppError::Validation(message)) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn both_alternatives_are_rejected() {
        let message = validation_message(validate_workspace_choice(&choice("Acme", "w1")));
        assert_eq!(message, "exactly one of name/id required");
    }

    #[test]
    fn neither_alternative_is_rejected() {
        let message = validation_message(validate_workspace_choice(&choice("", "")));
        assert_eq!(message, "exactly one of name/id required");
        assert!(validate_workspace_choice(&WorkspaceChoice::default()).is_err());
    }

    #[test]
    fn name_only_is_a_new_workspace() {
        let result = validate_workspace_choice(&choice(" Acme ", ""));
        let Ok(NormalizedWorkspaceChoice::New { name }) = result else {
            panic!("expected new workspace choice");
        };
        assert_eq!(name.as_str(), "Acme");
    }

    #[test]
    fn id_only_is_an_existing_workspace() {
        let result = validate_workspace_choice(&choice("", "w1"));
        assert_eq!(
            result.ok(),
            Some(NormalizedWorkspaceChoice::Existing { id: "w1".to_owned() })
        );
    }

    #[test]
    fn whitespace_name_counts_as_missing() {
        let result = validate_workspace_choice(&WorkspaceChoice {
            mode: Some(WorkspaceMode::New),
            name: Some("   ".to_owned()),
            id: None,
        });
        assert_eq!(validation_message(result), "workspace name required");
    }

    #[test]
    fn existing_mode_requires_an_id() {
        let result = validate_workspace_choice(&WorkspaceChoice {
            mode: Some(WorkspaceMode::Existing),
            name: None,
            id: Some(String::new()),
        });
        assert_eq!(validation_message(result), "workspace id required");
    }

    #[test]
    fn mode_contradicting_the_supplied_field_is_rejected() {
        let result = validate_workspace_choice(&WorkspaceChoice {
            mode: Some(WorkspaceMode::New),
            name: None,
            id: Some("w1".to_owned()),
        });
        assert_eq!(validation_message(result), "exactly one of name/id required");
    }

    #[test]
    fn lookup_key_is_case_insensitive() {
        let upper = WorkspaceName::new("Acme Inc");
        let lower = WorkspaceName::new("acme inc");
        assert_eq!(
            upper.map(|name| name.lookup_key()).ok(),
            lower.map(|name| name.lookup_key()).ok()
        );
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "w".repeat(WORKSPACE_NAME_MAX_LENGTH + 1);
        assert!(WorkspaceName::new(name).is_err());
    }
}
