//! # Session Controller
//!
//! Owns the lifecycle of one capture session at a time.
//!
//! ## State machine
//!
//! ```text
//! Inactive ──start()──> Negotiating ──granted──> Active ──run()/end()──> Ending ──> Inactive
//!                            │
//!                            └──refused──> Inactive
//! ```
//!
//! Everything tied to a live session (reference space, hit-test source,
//! capture rules) lives in a [`SessionContext`] created by `start()` and
//! dropped by `end()`. Pose lookups need a `&ReferenceSpace`, which only
//! exists inside that context.


use std::fmt;
use std::ops::ControlFlow;
use std::time::Instant;

use roomscan_export::{export, ArtifactSink, ExportedArtifact};
use roomscan_mesh::{DetectedSurface, SurfaceKind};
use serde::Serialize;

use crate::accumulator::{CaptureRules, SurfaceAccumulator};
use crate::clock::{Clock, SystemClock};
use crate::error::{CaptureError, CaptureIssue, CaptureResult};
use crate::host::{
    ArHost, Capability, FrameDelivery, HitTestSource, ReferenceSpace, SessionId,
    SessionRequestError,
};
use crate::observer::{NoopObserver, SessionObserver};
use crate::poller::{FinishReason, FramePoller, FrameSource};
use crate::settings::CaptureConfig;
use crate::signal::EndSignal;
use crate::termination::Termination;

/// Lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Inactive,
    Negotiating,
    Active,
    Ending,
}

impl SessionState {
    /// Returns true if `next` is a legal successor of this state.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Inactive, Negotiating)
                | (Negotiating, Active)
                | (Negotiating, Inactive)
                | (Active, Ending)
                | (Ending, Inactive)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SessionState::Inactive => "inactive",
            SessionState::Negotiating => "negotiating",
            SessionState::Active => "active",
            SessionState::Ending => "ending",
        };
        f.write_str(text)
    }
}

/// Resources owned by a live session.
#[derive(Debug)]
pub struct SessionContext {
    session: SessionId,
    reference_space: ReferenceSpace,
    hit_test_source: Option<HitTestSource>,
    rules: CaptureRules,
    degraded: Vec<Capability>,
    started_at: Instant,
}

impl SessionContext {
    pub fn new(
        session: SessionId,
        reference_space: ReferenceSpace,
        hit_test_source: Option<HitTestSource>,
        rules: CaptureRules,
        started_at: Instant,
    ) -> Self {
        Self {
            session,
            reference_space,
            hit_test_source,
            rules,
            degraded: Vec::new(),
            started_at,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn reference_space(&self) -> &ReferenceSpace {
        &self.reference_space
    }

    pub fn hit_test_source(&self) -> Option<&HitTestSource> {
        self.hit_test_source.as_ref()
    }

    pub fn rules(&self) -> CaptureRules {
        self.rules
    }

    /// Optional capabilities the session runs without.
    pub fn degraded(&self) -> &[Capability] {
        &self.degraded
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Where the exported artifact went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub filename: String,
    pub mime_type: String,
    pub bytes: usize,
}

impl From<&ExportedArtifact> for ArtifactSummary {
    fn from(artifact: &ExportedArtifact) -> Self {
        Self {
            filename: artifact.filename.clone(),
            mime_type: artifact.mime_type.clone(),
            bytes: artifact.len(),
        }
    }
}

/// Outcome of [`SessionController::run`].
#[derive(Debug)]
pub struct CaptureReport {
    pub session: SessionId,
    pub finish: FinishReason,
    /// Frames delivered by the host and processed.
    pub frames: u64,
    pub surfaces: usize,
    pub meshes: usize,
    pub planes: usize,
    pub hit_points: usize,
    pub degraded: Vec<Capability>,
    /// Records skipped because of an error, plus session-level warnings.
    pub issues: Vec<CaptureIssue>,
    /// `None` when nothing was captured.
    pub artifact: Option<ArtifactSummary>,
}

impl CaptureReport {
    /// Returns true if an artifact was delivered.
    pub fn exported(&self) -> bool {
        self.artifact.is_some()
    }
}

/// Adapts a host session to the poller's frame source.
struct HostFrames<'a, H> {
    host: &'a mut H,
    session: SessionId,
}

impl<H: ArHost> FrameSource for HostFrames<'_, H> {
    type Frame = H::Frame;

    fn next_frame(&mut self) -> FrameDelivery<H::Frame> {
        self.host.request_frame(self.session)
    }
}

/// Drives a capture session against an [`ArHost`].
///
/// # Example
///
/// ```rust
/// use roomscan_capture::{CaptureConfig, Capability, SessionController, SessionState};
/// use roomscan_capture::replay::{Recording, ReplayHost};
/// use roomscan_export::MemorySink;
///
/// let host = ReplayHost::new(Recording::default());
/// let mut controller = SessionController::new(host, CaptureConfig::default()).unwrap();
/// controller.start(&[Capability::MeshDetection], &[]).unwrap();
///
/// let mut sink = MemorySink::new();
/// let report = controller.run(&mut sink).unwrap();
/// assert!(!report.exported());
/// assert_eq!(controller.state(), SessionState::Inactive);
/// ```
pub struct SessionController<H: ArHost, C: Clock = SystemClock> {
    host: H,
    clock: C,
    config: CaptureConfig,
    state: SessionState,
    context: Option<SessionContext>,
    accumulator: SurfaceAccumulator,
    end_signal: EndSignal,
    observer: Box<dyn SessionObserver>,
    issues: Vec<CaptureIssue>,
}

impl<H: ArHost> SessionController<H, SystemClock> {
    /// Creates a controller measuring time with the wall clock.
    pub fn new(host: H, config: CaptureConfig) -> CaptureResult<Self> {
        Self::with_clock(host, SystemClock, config)
    }
}

impl<H: ArHost, C: Clock> SessionController<H, C> {
    /// Creates a controller with an explicit time source.
    pub fn with_clock(host: H, clock: C, config: CaptureConfig) -> CaptureResult<Self> {
        config.validate()?;
        Ok(Self {
            host,
            clock,
            accumulator: SurfaceAccumulator::new(config.redetection),
            config,
            state: SessionState::Inactive,
            context: None,
            end_signal: EndSignal::new(),
            observer: Box::new(NoopObserver),
            issues: Vec::new(),
        })
    }

    /// Replaces the lifecycle observer.
    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Live session resources, if a session is active.
    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }

    /// Surfaces captured by the current or most recent session.
    pub fn surfaces(&self) -> &[DetectedSurface] {
        self.accumulator.surfaces()
    }

    /// Per-record failures collected by the current session. Still readable
    /// after `run` fails with `ExportIo`; a successful run moves them into
    /// its report.
    pub fn issues(&self) -> &[CaptureIssue] {
        &self.issues
    }

    pub fn accumulator(&self) -> &SurfaceAccumulator {
        &self.accumulator
    }

    /// Handle to raise from another thread or callback to stop the capture
    /// at the next frame boundary. A new signal is issued per session.
    pub fn end_signal(&self) -> EndSignal {
        self.end_signal.clone()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Negotiates a session and makes it active.
    ///
    /// Every `required` capability must be supported. Optional capabilities
    /// that are not granted are recorded as degraded and capture continues
    /// without them.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if a session is already running
    /// - `NotSupported` / `NotAllowed` if the host refuses the session
    /// - `Host` if the reference space cannot be resolved
    pub fn start(
        &mut self,
        required: &[Capability],
        optional: &[Capability],
    ) -> CaptureResult<SessionId> {
        if self.state != SessionState::Inactive {
            return Err(CaptureError::InvalidState {
                expected: SessionState::Inactive,
                actual: self.state,
            });
        }
        self.set_state(SessionState::Negotiating);

        if let Some(missing) = required
            .iter()
            .find(|&&capability| !self.host.is_capability_supported(capability))
        {
            return Err(self.reject(CaptureError::NotSupported(missing.to_string())));
        }

        let granted = match self.host.request_session(required, optional) {
            Ok(granted) => granted,
            Err(SessionRequestError::NotSupported(reason)) => {
                return Err(self.reject(CaptureError::NotSupported(reason)));
            }
            Err(SessionRequestError::NotAllowed(reason)) => {
                return Err(self.reject(CaptureError::NotAllowed(reason)));
            }
        };
        let session = granted.id;

        let reference_space = match self
            .host
            .resolve_reference_space(session, self.config.reference_space)
        {
            Ok(space) => space,
            Err(err) => {
                self.host.end_session(session);
                return Err(self.reject(CaptureError::Host(err.to_string())));
            }
        };

        self.accumulator = SurfaceAccumulator::new(self.config.redetection);
        self.issues.clear();
        self.end_signal = EndSignal::new();

        let mut degraded: Vec<Capability> = optional
            .iter()
            .copied()
            .filter(|capability| !granted.enabled.contains(capability))
            .collect();

        let mut rules = CaptureRules::from_enabled(&granted.enabled);
        let mut hit_test_source = None;
        if rules.hit_points {
            match self.host.request_hit_test_source(session, &reference_space) {
                Ok(source) => hit_test_source = Some(source),
                Err(err) => {
                    tracing::warn!(%session, error = %err, "Hit-test source unavailable");
                    rules.hit_points = false;
                    if !degraded.contains(&Capability::HitTest) {
                        degraded.push(Capability::HitTest);
                    }
                }
            }
        }

        for &capability in &degraded {
            tracing::warn!(%session, %capability, "Continuing without optional capability");
            self.issues.push(CaptureIssue::session(
                CaptureError::CapabilityDegraded { capability },
            ));
        }
        if rules.is_empty() {
            tracing::warn!(%session, "No detection capability granted; nothing will be captured");
        }

        self.host.on_session_end(session, self.end_signal.clone());

        let mut context = SessionContext::new(
            session,
            reference_space,
            hit_test_source,
            rules,
            self.clock.now(),
        );
        context.degraded = degraded;

        self.observer.session_started(session, &context.degraded);
        self.context = Some(context);
        self.set_state(SessionState::Active);

        tracing::info!(
            %session,
            meshes = rules.meshes,
            planes = rules.planes,
            hit_points = rules.hit_points,
            "Capture session started"
        );
        Ok(session)
    }

    /// Polls frames until the capture finishes, exports and ends the session.
    ///
    /// The buffer is frozen and exported exactly once, and only if it is
    /// non-empty when polling stops.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if no session is active
    /// - `ExportIo` if serialization or delivery fails; the session has
    ///   already ended when this is returned, and [`Self::issues`] plus
    ///   [`Self::surfaces`] still describe what was captured
    pub fn run(&mut self, sink: &mut dyn ArtifactSink) -> CaptureResult<CaptureReport> {
        let Self {
            host,
            clock,
            config,
            state,
            context,
            accumulator,
            end_signal,
            issues,
            ..
        } = self;

        let Some(context) = context.as_ref().filter(|_| *state == SessionState::Active) else {
            return Err(CaptureError::InvalidState {
                expected: SessionState::Active,
                actual: *state,
            });
        };
        let session = context.session();

        let mut termination =
            Termination::new(config.termination, config.max_duration(), context.started_at());
        let mut poller = FramePoller::new(end_signal.clone(), config.max_frames);
        let mut frames = HostFrames { host, session };

        let finish = poller.run(&mut frames, |index, frame| {
            let summary = accumulator.ingest(context, index, frame);
            issues.extend(summary.issues);
            match termination.observe(accumulator.len(), clock.now()) {
                Some(reason) => ControlFlow::Break(reason),
                None => ControlFlow::Continue(()),
            }
        });

        tracing::info!(
            %session,
            %finish,
            frames = poller.frames(),
            surfaces = accumulator.len(),
            "Capture finished"
        );

        let mut report = CaptureReport {
            session,
            finish,
            frames: poller.frames(),
            surfaces: accumulator.len(),
            meshes: accumulator.buffer().count(SurfaceKind::Mesh),
            planes: accumulator.buffer().count(SurfaceKind::Plane),
            hit_points: accumulator.buffer().count(SurfaceKind::HitPoint),
            degraded: context.degraded().to_vec(),
            issues: Vec::new(),
            artifact: None,
        };

        if !accumulator.is_empty() {
            accumulator.freeze();
            let delivered = export(accumulator.surfaces(), &config.export)
                .and_then(|artifact| sink.deliver(&artifact).map(|()| artifact));

            match delivered {
                Ok(artifact) => {
                    tracing::info!(
                        %session,
                        filename = %artifact.filename,
                        bytes = artifact.len(),
                        "Artifact exported"
                    );
                    self.observer.artifact_exported(&artifact);
                    report.artifact = Some(ArtifactSummary::from(&artifact));
                }
                Err(err) => {
                    tracing::error!(
                        %session,
                        error = %err,
                        frames = report.frames,
                        surfaces = report.surfaces,
                        issues = self.issues.len(),
                        "Export failed"
                    );
                    self.end();
                    return Err(CaptureError::ExportIo(err));
                }
            }
        } else {
            tracing::info!(%session, "Nothing captured; skipping export");
        }

        report.issues = std::mem::take(&mut self.issues);
        self.end();
        Ok(report)
    }

    /// Ends the active session.
    ///
    /// Releases the hit-test source, drops the reference space and tells the
    /// host to end the session. Returns false, doing nothing, when no session
    /// is active.
    pub fn end(&mut self) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        self.set_state(SessionState::Ending);
        self.end_signal.raise();

        let Some(mut context) = self.context.take() else {
            self.set_state(SessionState::Inactive);
            return false;
        };
        if let Some(source) = context.hit_test_source.take() {
            self.host.release_hit_test_source(source);
        }
        let session = context.session;
        drop(context);
        self.host.end_session(session);

        self.set_state(SessionState::Inactive);
        self.observer.session_ended(session);
        tracing::info!(%session, "Capture session ended");
        true
    }

    fn reject(&mut self, error: CaptureError) -> CaptureError {
        tracing::warn!(error = %error, "Session request rejected");
        self.set_state(SessionState::Inactive);
        self.observer.session_rejected(&error);
        error
    }

    fn set_state(&mut self, next: SessionState) {
        if !self.state.can_transition_to(next) {
            tracing::error!(from = %self.state, to = %next, "Unexpected session transition");
        }
        tracing::debug!(from = %self.state, to = %next, "Session state");
        self.state = next;
    }
}

impl<H: ArHost, C: Clock> Drop for SessionController<H, C> {
    fn drop(&mut self) {
        self.end();
    }
}
