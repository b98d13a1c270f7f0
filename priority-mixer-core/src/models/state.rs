use super::error::MixerError;

/// Mix session state machine.
///
/// State transitions:
/// ```text
/// idle → running → stopping → stopped
///           ↓
///         failed
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum MixState {
    Idle,
    Running { iterations: u64 },
    Stopping,
    Stopped { iterations: u64 },
    Failed(MixerError),
}

impl MixState {
    /// Completed iterations, if the state tracks them.
    pub fn iterations(&self) -> Option<u64> {
        match self {
            Self::Running { iterations } | Self::Stopped { iterations } => Some(*iterations),
            _ => None,
        }
    }
}
