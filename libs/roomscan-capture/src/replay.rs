//! # Replay Host
//!
//! An in-memory [`ArHost`] that plays back a recorded session. It backs the
//! command-line tool and the tests.
//!
//! ## Recording format
//!
//! ```json
//! {
//!   "supported": ["mesh-detection", "plane-detection", "local-floor"],
//!   "frame_interval_ms": 16,
//!   "frames": [
//!     {
//!       "meshes": [{
//!         "id": 1,
//!         "pose": { "position": [0, 0, -1], "orientation": [0, 0, 0, 1] },
//!         "vertices": [0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0],
//!         "indices": [0, 1, 2, 0, 2, 3]
//!       }],
//!       "planes": [{ "pose": null, "polygon": [[0, 0, 0], [2, 0, 0], [2, 0, 3]] }],
//!       "hits": []
//!     }
//!   ]
//! }
//! ```
//!
//! A record whose `pose` is `null` (or missing) cannot be resolved, the way
//! a host reports a surface that has lost tracking.

use glam::DVec3;
use roomscan_mesh::{SurfaceId, Transform};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::clock::ManualClock;
use crate::host::{
    ArHost, Capability, FrameDelivery, FrameSnapshot, GrantedSession, HitTestSource, HostError,
    RawHit, RawMesh, RawPlane, ReferenceSpace, ReferenceSpaceKind, SessionId,
    SessionRequestError, SpaceHandle,
};
use crate::signal::EndSignal;

/// How the host answers a session request regardless of capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    NotSupported,
    NotAllowed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordedMesh {
    pub id: Option<SurfaceId>,
    pub pose: Option<Transform>,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordedPlane {
    pub id: Option<SurfaceId>,
    pub pose: Option<Transform>,
    pub polygon: Vec<DVec3>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordedHit {
    pub pose: Option<Transform>,
}

/// Detection records of one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordedFrame {
    pub meshes: Vec<RecordedMesh>,
    pub planes: Vec<RecordedPlane>,
    pub hits: Vec<RecordedHit>,
}

impl RecordedFrame {
    /// A frame with no detections.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A recorded AR session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recording {
    /// Capabilities the device reports as supported.
    pub supported: Vec<Capability>,
    /// Refuse every session request this way.
    pub deny: Option<Denial>,
    /// Reference space kinds the host can resolve.
    pub reference_spaces: Vec<ReferenceSpaceKind>,
    /// Whether a hit-test source can be created when hit testing is granted.
    pub hit_test_available: bool,
    /// Time between frames, applied to an attached [`ManualClock`].
    pub frame_interval_ms: u64,
    pub frames: Vec<RecordedFrame>,
    /// Simulates the user ending the session after this many frames.
    pub end_after_frames: Option<u64>,
}

impl Default for Recording {
    fn default() -> Self {
        Self {
            supported: vec![
                Capability::MeshDetection,
                Capability::PlaneDetection,
                Capability::HitTest,
                Capability::LocalFloor,
            ],
            deny: None,
            reference_spaces: vec![
                ReferenceSpaceKind::Local,
                ReferenceSpaceKind::LocalFloor,
                ReferenceSpaceKind::Viewer,
            ],
            hit_test_available: true,
            frame_interval_ms: 16,
            frames: Vec::new(),
            end_after_frames: None,
        }
    }
}

impl Recording {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Recording with the given frames and default host behaviour.
    pub fn with_frames(frames: Vec<RecordedFrame>) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }
}

/// One delivered frame of a replay.
#[derive(Debug)]
pub struct ReplayFrame {
    meshes: Vec<RawMesh>,
    planes: Vec<RawPlane>,
    hits: Vec<RawHit>,
    /// Pose of each object space, indexed by handle.
    poses: Vec<Option<Transform>>,
    reference: Option<SpaceHandle>,
    hit_source: Option<u64>,
}

impl ReplayFrame {
    fn new(recorded: &RecordedFrame, reference: Option<SpaceHandle>, hit_source: Option<u64>) -> Self {
        let mut poses = Vec::new();
        let mut next_space = |pose: Option<Transform>| {
            poses.push(pose);
            SpaceHandle(poses.len() as u64 - 1)
        };

        let meshes = recorded
            .meshes
            .iter()
            .map(|m| RawMesh {
                id: m.id,
                space: next_space(m.pose),
                vertices: m.vertices.clone(),
                indices: m.indices.clone(),
            })
            .collect();
        let planes = recorded
            .planes
            .iter()
            .map(|p| RawPlane {
                id: p.id,
                space: next_space(p.pose),
                polygon: p.polygon.clone(),
            })
            .collect();
        let hits = recorded
            .hits
            .iter()
            .map(|h| RawHit {
                space: next_space(h.pose),
            })
            .collect();

        Self {
            meshes,
            planes,
            hits,
            poses,
            reference,
            hit_source,
        }
    }
}

impl FrameSnapshot for ReplayFrame {
    fn meshes(&self) -> &[RawMesh] {
        &self.meshes
    }

    fn planes(&self) -> &[RawPlane] {
        &self.planes
    }

    fn hit_test_results(&self, source: &HitTestSource) -> &[RawHit] {
        if self.hit_source == Some(source.handle()) {
            &self.hits
        } else {
            &[]
        }
    }

    fn pose(&self, space: SpaceHandle, reference: &ReferenceSpace) -> Option<Transform> {
        if self.reference != Some(reference.handle()) {
            return None;
        }
        let index = usize::try_from(space.0).ok()?;
        self.poses.get(index).copied().flatten()
    }
}

/// Host call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub sessions_requested: u32,
    pub frames_requested: u64,
    pub frames_delivered: u64,
    pub hit_test_sources: u32,
    pub hit_test_releases: u32,
    pub sessions_ended: u32,
}

/// [`ArHost`] that plays a [`Recording`].
#[derive(Debug)]
pub struct ReplayHost {
    recording: Recording,
    clock: Option<ManualClock>,
    session: Option<SessionId>,
    cursor: usize,
    next_handle: u64,
    reference: Option<SpaceHandle>,
    hit_source: Option<u64>,
    end_signal: Option<EndSignal>,
    stats: ReplayStats,
}

impl ReplayHost {
    pub fn new(recording: Recording) -> Self {
        Self {
            recording,
            clock: None,
            session: None,
            cursor: 0,
            next_handle: 1,
            reference: None,
            hit_source: None,
            end_signal: None,
            stats: ReplayStats::default(),
        }
    }

    /// Advances `clock` by the frame interval before each delivered frame.
    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    fn handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn is_live(&self, session: SessionId) -> bool {
        self.session == Some(session)
    }
}

impl ArHost for ReplayHost {
    type Frame = ReplayFrame;

    fn is_capability_supported(&self, capability: Capability) -> bool {
        self.recording.supported.contains(&capability)
    }

    fn request_session(
        &mut self,
        required: &[Capability],
        optional: &[Capability],
    ) -> Result<GrantedSession, SessionRequestError> {
        self.stats.sessions_requested += 1;
        match self.recording.deny {
            Some(Denial::NotSupported) => {
                return Err(SessionRequestError::NotSupported("immersive-ar".to_string()))
            }
            Some(Denial::NotAllowed) => {
                return Err(SessionRequestError::NotAllowed("immersive-ar".to_string()))
            }
            None => {}
        }
        if let Some(missing) = required
            .iter()
            .find(|&&capability| !self.is_capability_supported(capability))
        {
            return Err(SessionRequestError::NotSupported(missing.to_string()));
        }

        let mut enabled = required.to_vec();
        for &capability in optional {
            if self.is_capability_supported(capability) && !enabled.contains(&capability) {
                enabled.push(capability);
            }
        }

        let id = SessionId(self.handle());
        self.session = Some(id);
        self.cursor = 0;
        self.stats.frames_delivered = 0;
        Ok(GrantedSession { id, enabled })
    }

    fn resolve_reference_space(
        &mut self,
        session: SessionId,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpace, HostError> {
        if !self.is_live(session) {
            return Err(HostError(format!("{session} is not active")));
        }
        if !self.recording.reference_spaces.contains(&kind) {
            return Err(HostError(format!("reference space {kind:?} is unavailable")));
        }
        let handle = SpaceHandle(self.handle());
        self.reference = Some(handle);
        Ok(ReferenceSpace::new(handle, kind))
    }

    fn request_hit_test_source(
        &mut self,
        session: SessionId,
        _space: &ReferenceSpace,
    ) -> Result<HitTestSource, HostError> {
        if !self.is_live(session) || !self.recording.hit_test_available {
            return Err(HostError("hit-test source unavailable".to_string()));
        }
        let handle = self.handle();
        self.hit_source = Some(handle);
        self.stats.hit_test_sources += 1;
        Ok(HitTestSource::new(handle))
    }

    fn release_hit_test_source(&mut self, source: HitTestSource) {
        self.stats.hit_test_releases += 1;
        if self.hit_source == Some(source.handle()) {
            self.hit_source = None;
        }
    }

    fn on_session_end(&mut self, _session: SessionId, signal: EndSignal) {
        self.end_signal = Some(signal);
    }

    fn request_frame(&mut self, session: SessionId) -> FrameDelivery<ReplayFrame> {
        self.stats.frames_requested += 1;
        if !self.is_live(session) {
            return FrameDelivery::Ended;
        }
        let Some(recorded) = self.recording.frames.get(self.cursor) else {
            return FrameDelivery::Ended;
        };

        let frame = ReplayFrame::new(recorded, self.reference, self.hit_source);
        self.cursor += 1;
        self.stats.frames_delivered += 1;

        if let Some(clock) = &self.clock {
            clock.advance(Duration::from_millis(self.recording.frame_interval_ms));
        }
        if self.recording.end_after_frames == Some(self.stats.frames_delivered) {
            if let Some(signal) = &self.end_signal {
                signal.raise();
            }
        }
        FrameDelivery::Frame(frame)
    }

    fn end_session(&mut self, session: SessionId) {
        if self.is_live(session) {
            self.session = None;
            self.reference = None;
            self.end_signal = None;
        }
        self.stats.sessions_ended += 1;
    }
}
