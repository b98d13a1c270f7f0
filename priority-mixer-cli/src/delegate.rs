use std::sync::atomic::{AtomicU64, Ordering};

use priority_mixer_core::{MixDelegate, MixLevels, MixState, MixerError};

/// Forwards session events to the `log` facade.
///
/// Levels are logged at debug level once every `report_every` frames.
pub struct LogDelegate {
    frames: AtomicU64,
    report_every: u64,
}

impl LogDelegate {
    pub fn new(report_every: u64) -> Self {
        Self {
            frames: AtomicU64::new(0),
            report_every: report_every.max(1),
        }
    }
}

impl MixDelegate for LogDelegate {
    fn on_state_changed(&self, state: &MixState) {
        match state {
            MixState::Failed(e) => log::error!("Mix session failed: {}", e),
            other => log::debug!("{}", state_message(other)),
        }
    }

    fn on_levels_updated(&self, levels: &MixLevels) {
        let frames = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        if frames % self.report_every == 0 {
            log::debug!(
                "Output level: rms {:.3}, peak {:.3}",
                levels.rms_level,
                levels.peak_level
            );
        }
    }

    fn on_error(&self, error: &MixerError) {
        log::trace!("Mix error reported: {:?}", error);
    }
}

fn state_message(state: &MixState) -> String {
    let name = match state {
        MixState::Idle => "idle",
        MixState::Running { .. } => "running",
        MixState::Stopping => "stopping",
        MixState::Stopped { .. } => "stopped",
        MixState::Failed(_) => "failed",
    };
    match state.iterations() {
        Some(n) => format!("Mix session {} after {} iterations", name, n),
        None => format!("Mix session {}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_message_carries_iteration_count() {
        assert_eq!(
            state_message(&MixState::Stopped { iterations: 3 }),
            "Mix session stopped after 3 iterations"
        );
    }

    #[test]
    fn stopping_message_has_no_count() {
        assert_eq!(state_message(&MixState::Stopping), "Mix session stopping");
    }

    #[test]
    fn report_interval_is_at_least_one() {
        let delegate = LogDelegate::new(0);
        assert_eq!(delegate.report_every, 1);
        delegate.on_levels_updated(&MixLevels::default());
        assert_eq!(delegate.frames.load(Ordering::Relaxed), 1);
    }
}
