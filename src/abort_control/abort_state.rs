use strum_macros::Display;

/// The stages of the abort sequence, in the order they are reached.
///
/// Transitions are strictly monotonic: the sequence never moves backward and
/// every transition fires at most once. `CanardsDeployed` is skipped entirely
/// by configurations without pitch control. `Jettisoned` is terminal.
#[derive(serde::Serialize, serde::Deserialize, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub enum AbortState {
    #[default]
    Idle,
    Aborted,
    CanardsDeployed,
    Jettisoned,
}

impl AbortState {
    /// Whether the sequence has reached its terminal stage.
    pub fn is_terminal(&self) -> bool { *self == AbortState::Jettisoned }
}

impl From<&str> for AbortState {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "aborted" => AbortState::Aborted,
            "canards_deployed" => AbortState::CanardsDeployed,
            "jettisoned" => AbortState::Jettisoned,
            _ => AbortState::Idle,
        }
    }
}

impl From<AbortState> for &'static str {
    fn from(value: AbortState) -> Self {
        match value {
            AbortState::Idle => "idle",
            AbortState::Aborted => "aborted",
            AbortState::CanardsDeployed => "canards_deployed",
            AbortState::Jettisoned => "jettisoned",
        }
    }
}
