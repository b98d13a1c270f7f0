use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::audio_models::{AudioSource, MixLevels, MixStats};
use crate::models::config::MixerConfiguration;
use crate::models::error::MixerError;
use crate::models::recording_result::{RecordingMetadata, RecordingResult};
use crate::models::state::MixState;
use crate::processing::priority_mixer::PriorityMixer;
use crate::storage::metadata;
use crate::storage::wav_recorder::WavRecorder;
use crate::traits::audio_backend::{AudioBackend, CaptureStream, PlaybackStream};
use crate::traits::mix_delegate::MixDelegate;

/// Internal session state shared with [`MixMonitor`], protected by `parking_lot::Mutex`.
struct SessionState {
    state: MixState,
    levels: MixLevels,
    stats: MixStats,
}

impl SessionState {
    fn new() -> Self {
        Self {
            state: MixState::Idle,
            levels: MixLevels::default(),
            stats: MixStats::default(),
        }
    }
}

/// Cooperative stop flag for [`MixSession::run`].
///
/// The loop checks the flag once per iteration, so a stop takes effect after
/// the blocking reads and write of the current frame complete.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Read-only view of a session that can be handed to other threads.
#[derive(Clone)]
pub struct MixMonitor {
    session_state: Arc<Mutex<SessionState>>,
}

impl MixMonitor {
    pub fn state(&self) -> MixState {
        self.session_state.lock().state.clone()
    }

    pub fn levels(&self) -> MixLevels {
        self.session_state.lock().levels
    }

    pub fn stats(&self) -> MixStats {
        self.session_state.lock().stats.clone()
    }
}

/// What a cleanly stopped session returns.
#[derive(Debug, Clone, PartialEq)]
pub struct MixSummary {
    pub stats: MixStats,
    pub elapsed: Duration,
    pub recording: Option<RecordingResult>,
}

/// Blocking priority mix loop.
///
/// Generic over capture and playback streams via the `AudioBackend` traits.
/// Owns every stream for its whole lifetime; dropping the session releases
/// them all.
///
/// Data flow per iteration:
/// ```text
/// [Source 1] ─┐
/// [Source 2] ─┼→ sort by priority → wrapping sum → attenuate → [Playback]
/// [Source N] ─┘                                          └→ [WavRecorder]
/// ```
pub struct MixSession<C: CaptureStream, P: PlaybackStream> {
    sources: Vec<AudioSource<C>>,
    output: P,
    mixer: PriorityMixer,
    config: MixerConfiguration,
    session_state: Arc<Mutex<SessionState>>,
    delegate: Option<Arc<dyn MixDelegate>>,
    stop: StopHandle,

    // Reused every iteration
    accumulator: Vec<i16>,
    frame: Vec<i16>,

    recorder: Option<WavRecorder>,
}

impl<C: CaptureStream, P: PlaybackStream> MixSession<C, P> {
    /// Open every configured source, then the output, through `backend`.
    ///
    /// On the first failure every stream opened so far is dropped, which
    /// releases it, and `DeviceOpenFailed` is returned.
    pub fn open<B>(backend: &B, config: MixerConfiguration) -> Result<Self, MixerError>
    where
        B: AudioBackend<Capture = C, Playback = P>,
    {
        config.validate().map_err(MixerError::ConfigurationFailed)?;

        let mut sources = Vec::with_capacity(config.sources.len());
        for descriptor in &config.sources {
            let stream = backend
                .open_capture(descriptor, &config.sample_spec)
                .inspect_err(|e| log::error!("Error: opening source failed: {}", e))?;
            log::info!(
                "Opened capture stream {} (priority {})",
                descriptor.name,
                descriptor.priority
            );
            sources.push(AudioSource::new(
                descriptor.name.clone(),
                descriptor.priority,
                stream,
            ));
        }

        let output = backend
            .open_playback(&config.output, &config.sample_spec)
            .inspect_err(|e| log::error!("Error: opening output failed: {}", e))?;
        log::info!("Opened playback stream {}", config.output.name);

        Self::new(sources, output, config)
    }

    /// Build a session from already opened streams.
    pub fn new(
        sources: Vec<AudioSource<C>>,
        output: P,
        config: MixerConfiguration,
    ) -> Result<Self, MixerError> {
        config.validate().map_err(MixerError::ConfigurationFailed)?;

        let recorder = match &config.record_path {
            Some(path) => {
                let mut recorder = WavRecorder::new(path.clone(), config.sample_spec);
                recorder.open().map_err(|e| {
                    MixerError::ConfigurationFailed(format!(
                        "cannot record to {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Some(recorder)
            }
            None => None,
        };

        Ok(Self {
            sources,
            output,
            mixer: PriorityMixer::new(config.attenuation_factor),
            accumulator: vec![0; config.frame_size],
            frame: vec![0; config.frame_size],
            config,
            session_state: Arc::new(Mutex::new(SessionState::new())),
            delegate: None,
            stop: StopHandle::new(),
            recorder,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn MixDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn monitor(&self) -> MixMonitor {
        MixMonitor {
            session_state: Arc::clone(&self.session_state),
        }
    }

    pub fn state(&self) -> MixState {
        self.session_state.lock().state.clone()
    }

    pub fn stats(&self) -> MixStats {
        self.session_state.lock().stats.clone()
    }

    /// Source names and priorities in their current order.
    pub fn sources(&self) -> Vec<(&str, i32)> {
        self.sources
            .iter()
            .map(|s| (s.name.as_str(), s.priority))
            .collect()
    }

    /// Run mix iterations until the stop handle fires or the output fails.
    ///
    /// On a cooperative stop the output is drained and any recording is
    /// finalized. A write failure is fatal and returned as the error.
    pub fn run(&mut self) -> Result<MixSummary, MixerError> {
        let started = Instant::now();
        log::info!(
            "Mixing {} sources into {} ({} samples per frame)",
            self.sources.len(),
            self.config.output.name,
            self.config.frame_size
        );
        self.set_state(MixState::Running { iterations: 0 });

        while self.stop.is_running() {
            if let Err(e) = self.mix_once().map(|_| ()) {
                log::error!("Error: mix loop stopped: {}", e);
                self.notify_error(&e);
                self.finish_recording(started.elapsed());
                self.set_state(MixState::Failed(e.clone()));
                return Err(e);
            }
        }

        self.set_state(MixState::Stopping);

        if let Err(e) = self.output.drain() {
            log::warn!("Failed to drain output: {}", e);
        }

        let elapsed = started.elapsed();
        let recording = self.finish_recording(elapsed);
        let stats = self.stats();
        self.set_state(MixState::Stopped {
            iterations: stats.iterations,
        });
        log::info!("Mixing stopped after {} iterations", stats.iterations);

        Ok(MixSummary {
            stats,
            elapsed,
            recording,
        })
    }

    /// One iteration: sort, read, sum, attenuate, record, write.
    ///
    /// A source read failure ends the read pass for this iteration only; the
    /// frames summed before it are still played. Returns the frame that was
    /// written.
    pub fn mix_once(&mut self) -> Result<&[i16], MixerError> {
        PriorityMixer::sort_by_priority(&mut self.sources);
        self.accumulator.fill(0);

        let mut frames_read = 0u64;
        let mut read_error = None;
        for source in self.sources.iter_mut() {
            if let Err(e) = source.stream.read_frame(&mut self.frame) {
                read_error = Some(e);
                break;
            }
            PriorityMixer::accumulate(&mut self.accumulator, &self.frame);
            frames_read += 1;
        }

        if let Some(ref e) = read_error {
            log::error!("Error: {}", e);
            self.notify_error(e);
        }

        // Attenuation depends on how many sources exist, not how many were read.
        self.mixer.attenuate(&mut self.accumulator, self.sources.len());

        self.output.write_frame(&self.accumulator)?;

        // Only frames that reached the output go into the recording.
        self.record_frame();

        let levels = MixLevels {
            rms_level: PriorityMixer::rms_level(&self.accumulator),
            peak_level: PriorityMixer::peak_level(&self.accumulator),
        };
        {
            let mut guard = self.session_state.lock();
            let s = &mut *guard;
            s.levels = levels;
            s.stats.iterations += 1;
            s.stats.frames_read += frames_read;
            s.stats.bytes_written += self.config.sample_spec.bytes_for(self.accumulator.len()) as u64;
            if read_error.is_some() {
                s.stats.read_errors += 1;
                s.stats.partial_iterations += 1;
            }
            if let MixState::Running { iterations } = &mut s.state {
                *iterations = s.stats.iterations;
            }
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_levels_updated(&levels);
        }
        log::trace!("Mixed {} of {} sources", frames_read, self.sources.len());

        Ok(&self.accumulator)
    }

    // --- Internal helpers ---

    fn set_state(&self, new_state: MixState) {
        {
            let mut s = self.session_state.lock();
            s.state = new_state.clone();
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    fn notify_error(&self, error: &MixerError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }

    /// Tee the current accumulator into the recorder, dropping it on failure.
    fn record_frame(&mut self) {
        let Some(recorder) = self.recorder.as_mut() else {
            return;
        };
        if let Err(e) = recorder.write_samples(&self.accumulator) {
            log::error!("Recording disabled: {}", e);
            self.recorder = None;
            self.notify_error(&e);
        }
    }

    /// Close the recorder and write its metadata sidecar.
    fn finish_recording(&mut self, elapsed: Duration) -> Option<RecordingResult> {
        let mut recorder = self.recorder.take()?;
        let file_path = recorder.file_path().to_path_buf();

        let checksum = match recorder.close() {
            Ok(checksum) => checksum,
            Err(e) => {
                log::error!("Failed to finalize recording: {}", e);
                self.notify_error(&e);
                return None;
            }
        };

        let duration_secs = recorder.duration_secs();
        let metadata = RecordingMetadata::new(
            duration_secs,
            &file_path.to_string_lossy(),
            &checksum,
            &self.config.sample_spec,
            self.config.attenuation_factor,
            &self.config.sources,
        );
        if let Err(e) = metadata::write_metadata(&metadata, &file_path) {
            log::warn!("{}", e);
        }

        log::info!(
            "Recorded {:.1}s of mix ({:.1}s wall clock) to {}",
            duration_secs,
            elapsed.as_secs_f64(),
            file_path.display()
        );

        Some(RecordingResult {
            file_path,
            duration_secs,
            metadata,
            checksum,
        })
    }
}
