use std::fmt;
use std::str::FromStr;

/// Name of the reserved query parameter that selects the server-side action.
pub const ACTION_PARAM: &str = "_action";

/// Server-side operation selector carried by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Load,
    List,
    Create,
    Commit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Load,
        Action::List,
        Action::Create,
        Action::Commit,
        Action::Delete,
    ];

    /// Wire literal for the `_action` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Load => "Load",
            Action::List => "List",
            Action::Create => "Create",
            Action::Commit => "Commit",
            Action::Delete => "Delete",
        }
    }

    /// Whether the response carries `resultSets` rather than a status pair.
    pub fn returns_rows(self) -> bool {
        matches!(self, Action::Load | Action::List | Action::Create)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an `_action` value outside the five known literals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
