//! # Surface Accumulator
//!
//! Turns the raw detection records of each frame into [`DetectedSurface`]s
//! and appends them to the session's buffer.
//!
//! ## Per-record pipeline
//!
//! ```text
//! record ─ rule enabled? ─ redetection policy ─ resolve pose ─ build geometry ─ push
//!              │ no              │ skip            │ None          │ Err
//!              ▼                 ▼                 ▼               ▼
//!           ignored           skipped        PoseUnresolved  GeometryValidation
//! ```
//!
//! Failures skip only the record; the rest of the frame is still processed.
//! Records are visited meshes first, then planes, then hit-test results.

use glam::DVec2;
use roomscan_mesh::{
    build_geometry, DetectedSurface, GeometryError, SurfaceId, SurfaceKind, Transform,
};

use crate::error::{CaptureError, CaptureIssue, CaptureResult};
use crate::host::{Capability, FrameSnapshot, RawMesh, RawPlane, ReferenceSpace, SpaceHandle};
use crate::session::SessionContext;
use crate::settings::RedetectionPolicy;

/// Append-only, ordered store of captured surfaces.
///
/// Frozen once export begins; entries are never removed or reordered.
#[derive(Debug, Default)]
pub struct AccumulationBuffer {
    surfaces: Vec<DetectedSurface>,
    frozen: bool,
}

impl AccumulationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a surface and returns its position.
    pub fn push(&mut self, surface: DetectedSurface) -> CaptureResult<usize> {
        if self.frozen {
            return Err(CaptureError::BufferFrozen);
        }
        self.surfaces.push(surface);
        Ok(self.surfaces.len() - 1)
    }

    /// Makes the buffer read-only. Freezing twice is harmless.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surfaces(&self) -> &[DetectedSurface] {
        &self.surfaces
    }

    /// Returns true if a surface with this host id is already stored.
    pub fn contains_id(&self, id: SurfaceId) -> bool {
        self.surfaces.iter().any(|s| s.id() == Some(id))
    }

    /// Number of stored surfaces of `kind`.
    pub fn count(&self, kind: SurfaceKind) -> usize {
        self.surfaces.iter().filter(|s| s.kind() == kind).count()
    }
}

/// Which record kinds are captured in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureRules {
    pub meshes: bool,
    pub planes: bool,
    pub hit_points: bool,
}

impl CaptureRules {
    /// Rules for the capabilities a session actually provides.
    pub fn from_enabled(enabled: &[Capability]) -> Self {
        Self {
            meshes: enabled.contains(&Capability::MeshDetection),
            planes: enabled.contains(&Capability::PlaneDetection),
            hit_points: enabled.contains(&Capability::HitTest),
        }
    }

    /// Returns true if no record kind is captured.
    pub fn is_empty(&self) -> bool {
        !(self.meshes || self.planes || self.hit_points)
    }
}

/// What happened to the records of one frame.
#[derive(Debug, Default)]
pub struct FrameSummary {
    pub frame: u64,
    pub appended: usize,
    /// Records dropped by the redetection policy.
    pub skipped: usize,
    /// Records dropped because of an error.
    pub issues: Vec<CaptureIssue>,
}

/// Converts frame records into surfaces for one session.
#[derive(Debug, Default)]
pub struct SurfaceAccumulator {
    buffer: AccumulationBuffer,
    policy: RedetectionPolicy,
}

impl SurfaceAccumulator {
    pub fn new(policy: RedetectionPolicy) -> Self {
        Self {
            buffer: AccumulationBuffer::new(),
            policy,
        }
    }

    pub fn buffer(&self) -> &AccumulationBuffer {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn surfaces(&self) -> &[DetectedSurface] {
        self.buffer.surfaces()
    }

    /// Freezes the buffer ahead of export.
    pub fn freeze(&mut self) {
        self.buffer.freeze();
    }

    /// Processes every record of one frame.
    pub fn ingest<F: FrameSnapshot>(
        &mut self,
        context: &SessionContext,
        frame_index: u64,
        frame: &F,
    ) -> FrameSummary {
        let mut summary = FrameSummary {
            frame: frame_index,
            ..FrameSummary::default()
        };
        let rules = context.rules();
        let reference = context.reference_space();

        if rules.meshes {
            for raw in frame.meshes() {
                let result = self.mesh_surface(frame, reference, frame_index, raw);
                self.record(result, &mut summary);
            }
        }

        if rules.planes {
            for raw in frame.planes() {
                let result = self.plane_surface(frame, reference, frame_index, raw);
                self.record(result, &mut summary);
            }
        }

        if rules.hit_points {
            if let Some(source) = context.hit_test_source() {
                for hit in frame.hit_test_results(source) {
                    let result =
                        resolve_pose(frame, hit.space, reference, SurfaceKind::HitPoint, frame_index)
                            .map(|pose| Some(DetectedSurface::HitPoint { pose }));
                    self.record(result, &mut summary);
                }
            }
        }

        tracing::trace!(
            frame = frame_index,
            appended = summary.appended,
            skipped = summary.skipped,
            issues = summary.issues.len(),
            total = self.buffer.len(),
            "Frame ingested"
        );
        summary
    }

    fn mesh_surface<F: FrameSnapshot>(
        &self,
        frame: &F,
        reference: &ReferenceSpace,
        frame_index: u64,
        raw: &RawMesh,
    ) -> CaptureResult<Option<DetectedSurface>> {
        if self.is_redetection(raw.id) {
            return Ok(None);
        }
        let pose = resolve_pose(frame, raw.space, reference, SurfaceKind::Mesh, frame_index)?;
        let geometry = build_geometry(&raw.vertices, &raw.indices).map_err(|source| {
            CaptureError::GeometryValidation {
                kind: SurfaceKind::Mesh,
                frame: frame_index,
                source,
            }
        })?;
        Ok(Some(DetectedSurface::Mesh {
            id: raw.id,
            geometry,
            pose,
        }))
    }

    fn plane_surface<F: FrameSnapshot>(
        &self,
        frame: &F,
        reference: &ReferenceSpace,
        frame_index: u64,
        raw: &RawPlane,
    ) -> CaptureResult<Option<DetectedSurface>> {
        if self.is_redetection(raw.id) {
            return Ok(None);
        }
        let pose = resolve_pose(frame, raw.space, reference, SurfaceKind::Plane, frame_index)?;

        let polygon: Vec<DVec2> = raw.polygon.iter().map(|p| DVec2::new(p.x, p.z)).collect();
        let invalid = |message: &str| CaptureError::GeometryValidation {
            kind: SurfaceKind::Plane,
            frame: frame_index,
            source: GeometryError::degenerate(message),
        };
        if polygon.len() < 3 {
            return Err(invalid("plane polygon has fewer than 3 points"));
        }
        if !polygon.iter().all(|p| p.is_finite()) {
            return Err(invalid("plane polygon has a non-finite point"));
        }

        let surface = DetectedSurface::plane(raw.id, polygon, pose);
        if let DetectedSurface::Plane { dimensions, .. } = &surface {
            if !dimensions.has_area() {
                return Err(invalid("plane polygon has zero extent"));
            }
        }
        Ok(Some(surface))
    }

    fn is_redetection(&self, id: Option<SurfaceId>) -> bool {
        match (self.policy, id) {
            (RedetectionPolicy::KeepFirst, Some(id)) => self.buffer.contains_id(id),
            _ => false,
        }
    }

    fn record(
        &mut self,
        result: CaptureResult<Option<DetectedSurface>>,
        summary: &mut FrameSummary,
    ) {
        match result {
            Ok(Some(surface)) => {
                let kind = surface.kind();
                match self.buffer.push(surface) {
                    Ok(position) => {
                        tracing::debug!(frame = summary.frame, %kind, position, "Surface captured");
                        summary.appended += 1;
                    }
                    Err(err) => summary.issues.push(CaptureIssue::in_frame(summary.frame, err)),
                }
            }
            Ok(None) => {
                tracing::debug!(frame = summary.frame, "Re-detected surface skipped");
                summary.skipped += 1;
            }
            Err(err) => {
                tracing::warn!(frame = summary.frame, error = %err, "Record skipped");
                summary.issues.push(CaptureIssue::in_frame(summary.frame, err));
            }
        }
    }
}

fn resolve_pose<F: FrameSnapshot>(
    frame: &F,
    space: SpaceHandle,
    reference: &ReferenceSpace,
    kind: SurfaceKind,
    frame_index: u64,
) -> CaptureResult<Transform> {
    frame
        .pose(space, reference)
        .map(|pose| Transform::new(pose.position, pose.orientation))
        .ok_or(CaptureError::PoseUnresolved {
            kind,
            frame: frame_index,
        })
}
