use thiserror::Error;

/// Errors that can occur while setting up or running a mix session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MixerError {
    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("failed to open stream {name}: {reason}")]
    DeviceOpenFailed { name: String, reason: String },

    #[error("read from {name} failed: {reason}")]
    ReadFailed { name: String, reason: String },

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl MixerError {
    /// Whether this error happened before the mix loop started.
    ///
    /// Setup failures map to exit status -1 in the binary.
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationFailed(_) | Self::DeviceOpenFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_failures_are_classified() {
        assert!(MixerError::ConfigurationFailed("bad".into()).is_setup_failure());
        assert!(MixerError::DeviceOpenFailed {
            name: "Source1".into(),
            reason: "no such entity".into(),
        }
        .is_setup_failure());
        assert!(!MixerError::WriteFailed("broken pipe".into()).is_setup_failure());
        assert!(!MixerError::ReadFailed {
            name: "Microphone".into(),
            reason: "timeout".into(),
        }
        .is_setup_failure());
    }

    #[test]
    fn display_names_the_stream() {
        let err = MixerError::DeviceOpenFailed {
            name: "Source2".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "failed to open stream Source2: connection refused");
    }
}
