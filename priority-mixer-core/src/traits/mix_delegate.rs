use crate::models::audio_models::MixLevels;
use crate::models::error::MixerError;
use crate::models::state::MixState;

/// Event delegate for mix session notifications.
///
/// All methods are called from the thread running the mix loop, between
/// blocking device calls. Keep them cheap.
pub trait MixDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &MixState);

    /// Called after every written frame with its levels.
    fn on_levels_updated(&self, levels: &MixLevels);

    /// Called when a read, write or recording error occurs.
    fn on_error(&self, error: &MixerError);
}
