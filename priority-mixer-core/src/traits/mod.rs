pub mod audio_backend;
pub mod mix_delegate;
