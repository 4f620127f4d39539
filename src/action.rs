use std::fmt::{Display, Formatter};

use crate::plan::Action;

/// Classification of a resource change, derived from its ordered action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionAlias {
    NoOp,
    Create,
    Delete,
    Update,
    /// Replacement that creates the new object before destroying the old one.
    CreateDelete,
    /// Replacement that destroys the old object before creating the new one.
    DeleteCreate,
}

pub const ALL_ACTION_ALIASES: [ActionAlias; 6] = [
    ActionAlias::NoOp,
    ActionAlias::Create,
    ActionAlias::Delete,
    ActionAlias::Update,
    ActionAlias::CreateDelete,
    ActionAlias::DeleteCreate,
];

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ActionAliasError {
    #[error("unrecognized change actions [{}]", format_actions(.actions))]
    Unrecognized { actions: Vec<Action> },
}

impl ActionAlias {
    pub fn from_actions(actions: &[Action]) -> Result<Self, ActionAliasError> {
        match actions {
            [Action::NoOp] => Ok(Self::NoOp),
            [Action::Create] => Ok(Self::Create),
            [Action::Delete] => Ok(Self::Delete),
            [Action::Update] => Ok(Self::Update),
            [Action::Create, Action::Delete] => Ok(Self::CreateDelete),
            [Action::Delete, Action::Create] => Ok(Self::DeleteCreate),
            _ => Err(ActionAliasError::Unrecognized {
                actions: actions.to_vec(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Update => "update",
            Self::CreateDelete => "create-delete",
            Self::DeleteCreate => "delete-create",
        }
    }

    pub fn is_replace(self) -> bool {
        matches!(self, Self::CreateDelete | Self::DeleteCreate)
    }
}

impl Display for ActionAlias {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn format_actions(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|action| action.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
