//! # AR Host Interface
//!
//! The contract the capture pipeline needs from an AR runtime: capability
//! negotiation, reference-space and hit-test resolution, frame delivery and
//! session teardown.
//!
//! Resource handles ([`ReferenceSpace`], [`HitTestSource`]) are neither
//! `Clone` nor `Copy`. A session context owns them, and releasing a hit-test
//! source consumes it, so it can be released at most once.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use roomscan_mesh::{SurfaceId, Transform};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signal::EndSignal;

/// Sensing feature a session can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    MeshDetection,
    PlaneDetection,
    HitTest,
    LocalFloor,
    DomOverlay,
}

impl Capability {
    /// Feature name as the host spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::MeshDetection => "mesh-detection",
            Capability::PlaneDetection => "plane-detection",
            Capability::HitTest => "hit-test",
            Capability::LocalFloor => "local-floor",
            Capability::DomOverlay => "dom-overlay",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a capability name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown capability: {0}")]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mesh-detection" => Ok(Capability::MeshDetection),
            "plane-detection" => Ok(Capability::PlaneDetection),
            "hit-test" => Ok(Capability::HitTest),
            "local-floor" => Ok(Capability::LocalFloor),
            "dom-overlay" => Ok(Capability::DomOverlay),
            other => Err(UnknownCapability(other.to_string())),
        }
    }
}

/// Kind of reference space poses are resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceSpaceKind {
    Local,
    #[default]
    LocalFloor,
    Viewer,
}

/// Opaque session handle issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Opaque handle of an object space (a detected mesh, plane or hit result).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpaceHandle(pub u64);

/// A resolved reference space.
#[derive(Debug, PartialEq, Eq)]
pub struct ReferenceSpace {
    handle: SpaceHandle,
    kind: ReferenceSpaceKind,
}

impl ReferenceSpace {
    /// Wraps a host handle. Only hosts should construct these.
    pub fn new(handle: SpaceHandle, kind: ReferenceSpaceKind) -> Self {
        Self { handle, kind }
    }

    pub fn handle(&self) -> SpaceHandle {
        self.handle
    }

    pub fn kind(&self) -> ReferenceSpaceKind {
        self.kind
    }
}

/// A live hit-test subscription.
#[derive(Debug, PartialEq, Eq)]
pub struct HitTestSource {
    handle: u64,
}

impl HitTestSource {
    /// Wraps a host handle. Only hosts should construct these.
    pub fn new(handle: u64) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> u64 {
        self.handle
    }
}

/// Outcome of a successful session request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedSession {
    pub id: SessionId,
    /// Capabilities the session actually provides.
    pub enabled: Vec<Capability>,
}

/// Why the host refused a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionRequestError {
    /// The device or runtime lacks a required capability.
    #[error("not supported: {0}")]
    NotSupported(String),
    /// Permission or policy denial.
    #[error("not allowed: {0}")]
    NotAllowed(String),
}

/// Unrecoverable host failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// A detected mesh as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMesh {
    pub id: Option<SurfaceId>,
    pub space: SpaceHandle,
    /// Flat `[x, y, z, ...]` in mesh space.
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

/// A detected plane as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlane {
    pub id: Option<SurfaceId>,
    pub space: SpaceHandle,
    /// Polygon in plane space; `y` is ignored.
    pub polygon: Vec<DVec3>,
}

/// One hit-test result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHit {
    pub space: SpaceHandle,
}

/// What the host hands back when the next frame is requested.
#[derive(Debug)]
pub enum FrameDelivery<F> {
    Frame(F),
    /// No further frame will be delivered for this session.
    Ended,
}

/// Per-frame view of the host's sensing state.
pub trait FrameSnapshot {
    /// Meshes detected in this frame.
    fn meshes(&self) -> &[RawMesh];

    /// Planes detected in this frame.
    fn planes(&self) -> &[RawPlane];

    /// Hit-test results for `source` in this frame.
    fn hit_test_results(&self, source: &HitTestSource) -> &[RawHit];

    /// Resolves the pose of `space` relative to `reference`, if tracked.
    fn pose(&self, space: SpaceHandle, reference: &ReferenceSpace) -> Option<Transform>;
}

/// AR runtime driving a capture session.
pub trait ArHost {
    type Frame: FrameSnapshot;

    fn is_capability_supported(&self, capability: Capability) -> bool;

    fn request_session(
        &mut self,
        required: &[Capability],
        optional: &[Capability],
    ) -> Result<GrantedSession, SessionRequestError>;

    fn resolve_reference_space(
        &mut self,
        session: SessionId,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpace, HostError>;

    fn request_hit_test_source(
        &mut self,
        session: SessionId,
        space: &ReferenceSpace,
    ) -> Result<HitTestSource, HostError>;

    fn release_hit_test_source(&mut self, source: HitTestSource);

    /// Registers the signal to raise when the host ends the session on its
    /// own (user gesture, system interruption). Fires at most once.
    fn on_session_end(&mut self, session: SessionId, signal: EndSignal);

    /// Suspension point: blocks until the next frame is available or the
    /// session is over.
    fn request_frame(&mut self, session: SessionId) -> FrameDelivery<Self::Frame>;

    fn end_session(&mut self, session: SessionId);
}
