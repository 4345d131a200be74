/// Lifecycle of one asynchronous user action.
///
/// Transitions are `Idle -> Loading -> Success | Error`. Whoever renders a
/// terminal state is expected to reset it back to `Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperationStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl OperationStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, OperationStatus::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Success | OperationStatus::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            OperationStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}
