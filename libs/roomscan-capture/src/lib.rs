//! # Room Scan Capture
//!
//! Capture pipeline for AR room scanning: negotiate a session with an AR
//! host, accumulate detected surfaces frame by frame, export once the
//! capture completes.
//!
//! ## Architecture
//!
//! ```text
//! SessionController::start()  capability check → session → reference space → hit-test source
//! SessionController::run()
//!     FramePoller ── one frame at a time ──> SurfaceAccumulator ──> AccumulationBuffer
//!          ▲                                                               │
//!          └──────────── Termination (FirstDetection | Window, cap) ◄──────┘
//!     freeze → roomscan_export::export → ArtifactSink
//! SessionController::end()    release hit-test source → drop context → host.end_session
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use roomscan_capture::{CaptureConfig, Capability, SessionController, TerminationRule};
//! use roomscan_capture::replay::{RecordedFrame, RecordedPlane, Recording, ReplayHost};
//! use roomscan_export::MemorySink;
//! use roomscan_mesh::Transform;
//! use glam::DVec3;
//!
//! let floor = RecordedPlane {
//!     id: None,
//!     pose: Some(Transform::IDENTITY),
//!     polygon: vec![DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), DVec3::new(2.0, 0.0, 3.0)],
//! };
//! let recording = Recording::with_frames(vec![RecordedFrame {
//!     planes: vec![floor],
//!     ..RecordedFrame::default()
//! }]);
//!
//! let config = CaptureConfig {
//!     termination: TerminationRule::FirstDetection,
//!     ..CaptureConfig::default()
//! };
//! let mut controller = SessionController::new(ReplayHost::new(recording), config).unwrap();
//! controller.start(&[Capability::PlaneDetection], &[]).unwrap();
//!
//! let mut sink = MemorySink::new();
//! let report = controller.run(&mut sink).unwrap();
//! assert_eq!(report.planes, 1);
//! assert_eq!(sink.artifacts().len(), 1);
//! ```

pub mod accumulator;
pub mod clock;
pub mod error;
pub mod host;
pub mod observer;
pub mod poller;
pub mod replay;
pub mod session;
pub mod settings;
pub mod signal;
pub mod termination;

pub use accumulator::{AccumulationBuffer, CaptureRules, FrameSummary, SurfaceAccumulator};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CaptureError, CaptureIssue, CaptureResult};
pub use host::{
    ArHost, Capability, FrameDelivery, FrameSnapshot, GrantedSession, HitTestSource, HostError,
    RawHit, RawMesh, RawPlane, ReferenceSpace, ReferenceSpaceKind, SessionId,
    SessionRequestError, SpaceHandle,
};
pub use observer::{EventLog, NoopObserver, SessionEvent, SessionObserver};
pub use poller::{FinishReason, FramePoller, FrameSource, PollStep};
pub use session::{ArtifactSummary, CaptureReport, SessionContext, SessionController, SessionState};
pub use settings::{CaptureConfig, ConfigError, RedetectionPolicy, TerminationRule};
pub use signal::EndSignal;
pub use termination::Termination;
