use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::export::pipeline::ExportPipeline;
use crate::models::config::CaptureConfiguration;
use crate::models::error::{CaptureError, Degradation, StatusEvent};
use crate::models::media_models::{CaptureMode, MediaKind};
use crate::models::recording_result::{RecordingMetadata, RecordingResult};
use crate::models::state::CaptureState;
use crate::processing::chunk_buffer::ChunkBuffer;
use crate::processing::resolution::{self, QualityTier};
use crate::session::clock::{ElapsedClock, CLOCK_TICK};
use crate::session::collector::ChunkCollector;
use crate::session::compatibility::{check_compatibility, CompatibilityReport};
use crate::session::negotiation::negotiate_encoder;
use crate::session::notifier::Notifier;
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::capture_provider::{CaptureProvider, MediaStream};
use crate::traits::encoder::{EncoderBackend, EncoderState, MediaEncoder};

/// Proof of ownership of the active recording, returned by `start` and
/// required by `stop`. Not cloneable: only the starter can stop.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// Mutable state shared with the clock thread.
struct SessionState {
    state: CaptureState,
    capture_start: Option<Instant>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            capture_start: None,
        }
    }

    fn elapsed(&self) -> Duration {
        self.capture_start.map(|s| s.elapsed()).unwrap_or_default()
    }
}

/// Resources exclusively owned by the one active recording.
struct ActiveRecording {
    token: Uuid,
    config: CaptureConfiguration,
    tier: &'static QualityTier,
    bitrate: u32,
    stream: MediaStream,
    encoder: Box<dyn MediaEncoder>,
    native_kind: MediaKind,
    collector: ChunkCollector,
    clock: ElapsedClock,
    started_at: chrono::DateTime<chrono::Utc>,
}

/// Screen recording state machine.
///
/// Generic over the platform's capture provider and encoder backend. Owns at
/// most one stream and one encoder at a time; `start` while not idle is
/// rejected with `SessionBusy`.
///
/// ```text
/// [CaptureProvider] → MediaStream → [MediaEncoder] ─events─→ [ChunkCollector] → [ChunkBuffer]
///                                                                                    │ stop
///                                          RecordingResult ← [ExportPipeline] ← MediaBlob
/// ```
pub struct CaptureSession<P: CaptureProvider, B: EncoderBackend> {
    provider: P,
    backend: B,
    pipeline: ExportPipeline,
    session_state: Arc<Mutex<SessionState>>,
    chunks: Arc<Mutex<ChunkBuffer>>,
    notifier: Notifier,
    active: Option<ActiveRecording>,
}

impl<P: CaptureProvider, B: EncoderBackend> CaptureSession<P, B> {
    pub fn new(provider: P, backend: B, pipeline: ExportPipeline) -> Self {
        Self {
            provider,
            backend,
            pipeline,
            session_state: Arc::new(Mutex::new(SessionState::new())),
            chunks: Arc::new(Mutex::new(ChunkBuffer::new())),
            notifier: Notifier::default(),
            active: None,
        }
    }

    /// Register the status collaborator. Clock and collector threads of a
    /// recording already in progress keep reporting to the previous one.
    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.notifier = Notifier::new(Some(delegate));
    }

    pub fn state(&self) -> CaptureState {
        self.session_state.lock().state.clone()
    }

    /// Time since recording started, zero when not recording.
    pub fn elapsed(&self) -> Duration {
        self.session_state.lock().elapsed()
    }

    /// Bytes collected so far for the in-progress recording.
    pub fn buffered_bytes(&self) -> usize {
        self.chunks.lock().byte_len()
    }

    pub fn check_compatibility(&self) -> CompatibilityReport {
        check_compatibility(&self.provider, &self.backend)
    }

    /// Probe the highest tier the provider accepts. Only valid while idle.
    pub fn detect_max_supported_tier(&mut self) -> Result<&'static QualityTier, CaptureError> {
        if !self.session_state.lock().state.is_idle() {
            return Err(CaptureError::SessionBusy);
        }
        Ok(resolution::detect_max_supported(&mut self.provider))
    }

    /// Start a recording. Transitions: idle → acquiring → recording.
    ///
    /// Fatal errors return the session to idle with every acquired track
    /// stopped. Audio and turbo failures are reported as degradations and
    /// do not abort.
    pub fn start(&mut self, config: CaptureConfiguration) -> Result<SessionToken, CaptureError> {
        if !self.session_state.lock().state.is_idle() {
            return Err(self.report(CaptureError::SessionBusy));
        }
        config
            .validate()
            .map_err(|e| self.report(CaptureError::ConfigurationFailed(e)))?;

        let tier = resolution::resolve(&config.tier_id);
        let bitrate = resolution::bitrate_for(tier, config.turbo);
        log::info!(
            "Starting capture: {} ({} bps, turbo={}, audio={}, format={})",
            tier.label,
            bitrate,
            config.turbo,
            config.enable_audio,
            config.output_format
        );

        self.set_state(CaptureState::Acquiring);
        self.notifier.status(StatusEvent::Acquiring);

        let constraints = resolution::constraints_for(tier);
        let mut stream = match self.provider.acquire_display(&constraints, config.enable_audio) {
            Ok(stream) => stream,
            Err(e) => {
                self.set_state(CaptureState::Idle);
                return Err(self.report(e));
            }
        };

        if config.enable_audio && config.mode == CaptureMode::Desktop {
            match self.provider.acquire_microphone() {
                Ok(mic) => stream.merge(mic),
                Err(e) => self.notifier.degraded(Degradation::AudioDegraded(e.to_string())),
            }
        }

        let negotiated = match negotiate_encoder(&self.backend, config.output_format, bitrate, &stream) {
            Ok(n) => n,
            Err(e) => return Err(self.abort_start(&mut stream, e)),
        };
        let mut encoder = negotiated.encoder;

        self.chunks.lock().open();
        let (sink, events) = mpsc::channel();
        let mut collector = match ChunkCollector::spawn(events, Arc::clone(&self.chunks), self.notifier.clone()) {
            Ok(c) => c,
            Err(e) => return Err(self.abort_start(&mut stream, e)),
        };

        if let Err(e) = encoder.start(config.timeslice, sink) {
            collector.drain(Duration::ZERO);
            return Err(self.abort_start(&mut stream, e));
        }

        {
            let mut s = self.session_state.lock();
            s.capture_start = Some(Instant::now());
        }
        self.set_state(CaptureState::Recording { elapsed_secs: 0 });

        let clock = match self.start_clock() {
            Ok(c) => c,
            Err(e) => {
                if let Err(stop_err) = stop_encoder(encoder.as_mut()) {
                    self.notifier.error(stop_err);
                }
                collector.drain(Duration::ZERO);
                return Err(self.abort_start(&mut stream, e));
            }
        };
        self.notifier.status(StatusEvent::Recording);

        if config.turbo {
            let reduced = resolution::turbo_constraints(tier);
            for track in stream.video_tracks_mut() {
                if let Err(e) = track.apply_constraints(&reduced) {
                    self.notifier
                        .degraded(Degradation::QualityDegraded(format!("{}: {}", track.label(), e)));
                }
            }
        }

        let token = Uuid::new_v4();
        self.active = Some(ActiveRecording {
            token,
            config,
            tier,
            bitrate,
            stream,
            encoder,
            native_kind: negotiated.native_kind,
            collector,
            clock,
            started_at: chrono::Utc::now(),
        });
        Ok(SessionToken(token))
    }

    /// Stop the recording owned by `token` and export it.
    /// Transitions: recording → stopping → idle.
    ///
    /// Returns `None` without emitting anything when idle or when `token`
    /// belongs to an earlier recording.
    pub fn stop(&mut self, token: &SessionToken) -> Option<RecordingResult> {
        let owns_active = self.active.as_ref().is_some_and(|a| a.token == token.0);
        if !owns_active {
            log::debug!("Stop ignored: no active recording for token {}", token.0);
            return None;
        }
        let mut active = self.active.take()?;

        self.set_state(CaptureState::Stopping);
        self.notifier.status(StatusEvent::Stopped);

        // Tracks, clock and collector are released even when the platform
        // already ended the encoder.
        if let Err(e) = stop_encoder(active.encoder.as_mut()) {
            self.notifier.error(e);
        }
        active.stream.stop_all();
        active.clock.stop();
        active.collector.drain(active.config.stop_confirmation_timeout);

        let duration = self.session_state.lock().elapsed();
        let blob = self.chunks.lock().finalize(active.native_kind);
        log::info!("Recording finalized: {} bytes over {:.1}s", blob.len(), duration.as_secs_f64());

        self.notifier.status(StatusEvent::Processing);
        let artifact = self.pipeline.process(blob, active.config.output_format);
        for degradation in &artifact.degradations {
            self.notifier.degraded(degradation.clone());
        }

        let metadata = RecordingMetadata::new(
            &artifact,
            active.tier,
            active.bitrate,
            duration.as_secs_f64(),
            active.stream.has_audio(),
            active.config.turbo,
            active.started_at,
        );

        self.session_state.lock().capture_start = None;
        self.set_state(CaptureState::Idle);

        Some(RecordingResult { artifact, metadata })
    }

    // --- Internal helpers ---

    fn set_state(&self, new_state: CaptureState) {
        self.session_state.lock().state = new_state.clone();
        self.notifier.state(&new_state);
    }

    /// Report a fatal error and hand it back for returning.
    fn report(&self, error: CaptureError) -> CaptureError {
        self.notifier.error(error.clone());
        error
    }

    /// Fatal path after acquisition: release tracks, drop buffered chunks,
    /// return to idle.
    fn abort_start(&self, stream: &mut MediaStream, error: CaptureError) -> CaptureError {
        stream.stop_all();
        self.chunks.lock().close();

        self.session_state.lock().capture_start = None;
        self.set_state(CaptureState::Idle);
        self.report(error)
    }

    /// Elapsed-time ticker: refreshes the recording state and notifies once
    /// per tick.
    fn start_clock(&self) -> Result<ElapsedClock, CaptureError> {
        let session_state = Arc::clone(&self.session_state);
        let notifier = self.notifier.clone();

        ElapsedClock::start(CLOCK_TICK, move || {
            let mut s = session_state.lock();
            if !s.state.is_recording() {
                return;
            }
            let elapsed = s.elapsed();
            s.state = CaptureState::Recording {
                elapsed_secs: elapsed.as_secs(),
            };
            drop(s);
            notifier.elapsed(elapsed);
        })
    }
}

/// Request an encoder stop unless the platform has already ended it.
fn stop_encoder(encoder: &mut dyn MediaEncoder) -> Result<(), CaptureError> {
    if encoder.state() == EncoderState::Inactive {
        log::debug!("Encoder already inactive, not requesting stop");
        return Ok(());
    }
    encoder.stop()
}

impl<P: CaptureProvider, B: EncoderBackend> Drop for CaptureSession<P, B> {
    fn drop(&mut self) {
        if let Some(mut active) = self.active.take() {
            log::warn!("Capture session dropped while recording, releasing tracks");
            if let Err(e) = stop_encoder(active.encoder.as_mut()) {
                self.notifier.error(e);
            }
            active.stream.stop_all();
            active.clock.stop();
            active.collector.drain(Duration::ZERO);
            self.chunks.lock().close();
        }
    }
}
