use crate::Chips;
use serde::Serialize;

/// A betting decision submitted against the seat that is to act.
/// Raise carries the increment above the current highest bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Check,
    Call,
    Fold,
    Raise(Chips),
    AllIn,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Check => "check",
            Action::Call => "call",
            Action::Fold => "fold",
            Action::Raise(_) => "raise",
            Action::AllIn => "all_in",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Raise(amount) => write!(f, "raise {}", amount),
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// A recent-action history entry, broadcast verbatim in state frames.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRecord {
    pub player: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Chips>,
}

impl ActionRecord {
    pub fn new(player: &str, action: &str, amount: Option<Chips>) -> Self {
        Self {
            player: player.to_string(),
            action: action.to_string(),
            amount,
        }
    }
}
