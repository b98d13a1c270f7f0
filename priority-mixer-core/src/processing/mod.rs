pub mod pcm;
pub mod priority_mixer;
pub mod wav_format;
