mod cli;
mod delegate;

use clap::Parser;

use cli::Args;
use priority_mixer_core::MixerConfiguration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match cli::load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Error: {}", e);
            std::process::exit(cli::SETUP_FAILURE);
        }
    };

    std::process::exit(mix(config));
}

#[cfg(target_os = "linux")]
fn mix(config: MixerConfiguration) -> i32 {
    use std::sync::Arc;

    use priority_mixer_core::MixSession;
    use priority_mixer_pulse::PulseBackend;

    // Roughly one level report per second of audio.
    let report_every = (config.sample_spec.rate as usize / config.frame_size) as u64;

    let backend = PulseBackend::new(config.server.clone());
    let mut session = match MixSession::open(&backend, config) {
        Ok(session) => session,
        Err(e) => return cli::exit_code(&e),
    };
    session.set_delegate(Arc::new(delegate::LogDelegate::new(report_every)));

    let stop = session.stop_handle();
    let handler = ctrlc::set_handler(move || {
        if !stop.is_running() {
            // Second interrupt while a device call is still blocking.
            std::process::exit(130);
        }
        log::info!("Interrupt received, stopping after the current frame");
        stop.stop();
    });
    if let Err(e) = handler {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }

    log::info!("Start capturing and processing audio. Press Ctrl+C to stop.");

    match session.run() {
        Ok(summary) => {
            log::info!(
                "Mixed {} frames in {:.1}s ({} partial)",
                summary.stats.iterations,
                summary.elapsed.as_secs_f64(),
                summary.stats.partial_iterations
            );
            if let Some(recording) = summary.recording {
                log::info!(
                    "Recording saved to {} (sha256 {})",
                    recording.file_path.display(),
                    recording.checksum
                );
            }
            0
        }
        Err(e) => cli::exit_code(&e),
    }
}

#[cfg(not(target_os = "linux"))]
fn mix(_config: MixerConfiguration) -> i32 {
    log::error!("Error: the PulseAudio backend is only available on Linux");
    cli::SETUP_FAILURE
}
