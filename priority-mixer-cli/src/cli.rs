use std::path::PathBuf;

use clap::Parser;

use priority_mixer_core::{MixerConfiguration, MixerError};

/// Exit status for configuration and device-open failures.
pub const SETUP_FAILURE: i32 = -1;

/// Exit status when the mix loop dies on an output write error.
///
/// The loop ends the same way as after Ctrl+C, but the status is non-zero
/// so callers can tell a dead output from a requested stop (which exits 0).
pub const RUNTIME_FAILURE: i32 = 1;

/// Capture several audio sources, mix them by priority, and play the result.
///
/// With no arguments the microphone (highest priority) is mixed with two
/// more recording streams at priorities 10 and 5.
#[derive(Parser, Debug)]
#[command(name = "priority-mixer", version)]
pub struct Args {
    /// JSON configuration file (camelCase keys, all optional)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Volume cut per non-primary source, in [0, 1]
    #[arg(short, long)]
    pub attenuation: Option<f64>,

    /// Samples read from each source per iteration
    #[arg(long)]
    pub frame_size: Option<usize>,

    /// PulseAudio server to connect to
    #[arg(long)]
    pub server: Option<String>,

    /// Also record the mixed output to this WAV file
    #[arg(short, long)]
    pub record: Option<PathBuf>,
}

/// Load the configuration file, if any, and apply command-line overrides.
pub fn load_config(args: &Args) -> Result<MixerConfiguration, MixerError> {
    let mut config = match &args.config {
        Some(path) => MixerConfiguration::from_json_file(path)?,
        None => MixerConfiguration::default(),
    };

    if let Some(factor) = args.attenuation {
        config.attenuation_factor = factor;
    }
    if let Some(frame_size) = args.frame_size {
        config.frame_size = frame_size;
    }
    if args.server.is_some() {
        config.server = args.server.clone();
    }
    if args.record.is_some() {
        config.record_path = args.record.clone();
    }

    config.validate().map_err(MixerError::ConfigurationFailed)?;
    Ok(config)
}

pub fn exit_code(error: &MixerError) -> i32 {
    if error.is_setup_failure() {
        SETUP_FAILURE
    } else {
        RUNTIME_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("priority-mixer").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn no_arguments_gives_defaults() {
        let config = load_config(&parse(&[])).unwrap();
        assert_eq!(config, MixerConfiguration::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = load_config(&parse(&[
            "--attenuation",
            "0.5",
            "--frame-size",
            "256",
            "--server",
            "unix:/run/pulse/native",
            "--record",
            "mix.wav",
        ]))
        .unwrap();

        assert_eq!(config.attenuation_factor, 0.5);
        assert_eq!(config.frame_size, 256);
        assert_eq!(config.server.as_deref(), Some("unix:/run/pulse/native"));
        assert_eq!(config.record_path, Some(PathBuf::from("mix.wav")));
    }

    #[test]
    fn flags_override_file() {
        let path = std::env::temp_dir().join("priority_mixer_cli_test_config.json");
        fs::write(&path, r#"{ "attenuationFactor": 0.1, "frameSize": 512 }"#).unwrap();

        let config = load_config(&parse(&[
            "--config",
            path.to_str().unwrap(),
            "--attenuation",
            "0.3",
        ]))
        .unwrap();

        assert_eq!(config.attenuation_factor, 0.3);
        assert_eq!(config.frame_size, 512);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn invalid_attenuation_is_setup_failure() {
        let err = load_config(&parse(&["--attenuation", "1.5"])).unwrap_err();
        assert_eq!(exit_code(&err), SETUP_FAILURE);
    }

    #[test]
    fn missing_config_file_is_setup_failure() {
        let err = load_config(&parse(&["--config", "/nonexistent/priority-mixer.json"])).unwrap_err();
        assert_eq!(exit_code(&err), SETUP_FAILURE);
    }

    #[test]
    fn exit_codes() {
        let open_failed = MixerError::DeviceOpenFailed {
            name: "Source1".into(),
            reason: "No such entity".into(),
        };
        assert_eq!(exit_code(&open_failed), -1);
        assert_eq!(exit_code(&MixerError::WriteFailed("broken".into())), 1);
    }

    #[test]
    fn write_failure_is_runtime_failure() {
        let err = MixerError::WriteFailed("Connection terminated".into());
        assert_eq!(exit_code(&err), RUNTIME_FAILURE);
        assert_ne!(RUNTIME_FAILURE, 0);
    }
}
