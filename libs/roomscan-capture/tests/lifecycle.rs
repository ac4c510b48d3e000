//! Session negotiation, cancellation and teardown against the replay host.

mod common;

use common::{empty_frames, floor_plane, frame_with, init_tracing, quad_mesh};
use roomscan_capture::replay::{Denial, RecordedMesh, Recording, ReplayHost};
use roomscan_capture::{
    CaptureConfig, CaptureError, Capability, FinishReason, SessionController, SessionState,
};
use roomscan_export::{ArtifactSink, ExportError, ExportResult, ExportedArtifact, MemorySink};

fn controller(recording: Recording) -> SessionController<ReplayHost> {
    init_tracing();
    SessionController::new(ReplayHost::new(recording), CaptureConfig::default()).unwrap()
}

/// Sink whose storage always fails.
struct BrokenSink;

impl ArtifactSink for BrokenSink {
    fn deliver(&mut self, artifact: &ExportedArtifact) -> ExportResult<()> {
        Err(ExportError::InvalidFilename(artifact.filename.clone()))
    }
}

#[test]
fn unsupported_required_capability_never_activates() {
    let mut controller = controller(Recording {
        supported: vec![Capability::PlaneDetection],
        ..Recording::with_frames(empty_frames(3))
    });

    let err = controller
        .start(&[Capability::MeshDetection], &[])
        .unwrap_err();
    assert!(matches!(err, CaptureError::NotSupported(ref what) if what == "mesh-detection"));
    assert_eq!(controller.state(), SessionState::Inactive);

    let stats = controller.host().stats();
    assert_eq!(stats.sessions_requested, 0);
    assert_eq!(stats.frames_requested, 0);

    assert!(matches!(
        controller.run(&mut MemorySink::new()),
        Err(CaptureError::InvalidState { .. })
    ));
    assert_eq!(controller.host().stats().frames_requested, 0);
}

#[test]
fn host_refusals_keep_their_kind() {
    let mut refused = controller(Recording {
        deny: Some(Denial::NotSupported),
        ..Recording::default()
    });
    assert!(matches!(
        refused.start(&[Capability::MeshDetection], &[]),
        Err(CaptureError::NotSupported(_))
    ));

    let mut denied = controller(Recording {
        deny: Some(Denial::NotAllowed),
        ..Recording::default()
    });
    assert!(matches!(
        denied.start(&[Capability::MeshDetection], &[]),
        Err(CaptureError::NotAllowed(_))
    ));
    assert_eq!(denied.state(), SessionState::Inactive);
    assert_eq!(denied.host().stats().frames_requested, 0);
}

#[test]
fn end_is_idempotent_and_releases_once() {
    let mut controller = controller(Recording::default());
    controller
        .start(&[Capability::MeshDetection], &[Capability::HitTest])
        .unwrap();
    assert_eq!(controller.state(), SessionState::Active);

    assert!(controller.end());
    assert!(!controller.end());

    assert_eq!(controller.state(), SessionState::Inactive);
    let stats = controller.host().stats();
    assert_eq!(stats.hit_test_sources, 1);
    assert_eq!(stats.hit_test_releases, 1);
    assert_eq!(stats.sessions_ended, 1);
}

#[test]
fn run_then_end_releases_once() {
    let mut controller = controller(Recording::with_frames(empty_frames(2)));
    controller
        .start(&[Capability::MeshDetection], &[Capability::HitTest])
        .unwrap();

    let report = controller.run(&mut MemorySink::new()).unwrap();
    assert_eq!(report.finish, FinishReason::HostEnded);
    assert!(!controller.end());

    let stats = controller.host().stats();
    assert_eq!(stats.hit_test_releases, 1);
    assert_eq!(stats.sessions_ended, 1);
}

#[test]
fn host_initiated_end_cancels_at_next_boundary() {
    let mut controller = controller(Recording {
        end_after_frames: Some(2),
        ..Recording::with_frames(empty_frames(5))
    });
    controller.start(&[Capability::MeshDetection], &[]).unwrap();

    let report = controller.run(&mut MemorySink::new()).unwrap();
    assert_eq!(report.finish, FinishReason::Cancelled);
    assert_eq!(report.frames, 2);
    assert_eq!(controller.host().stats().frames_requested, 2);
}

#[test]
fn end_signal_from_another_thread_stops_before_any_frame() {
    let mut controller = controller(Recording::with_frames(empty_frames(5)));
    controller.start(&[Capability::MeshDetection], &[]).unwrap();

    let signal = controller.end_signal();
    std::thread::spawn(move || signal.raise()).join().unwrap();

    let report = controller.run(&mut MemorySink::new()).unwrap();
    assert_eq!(report.finish, FinishReason::Cancelled);
    assert_eq!(report.frames, 0);
    assert_eq!(controller.host().stats().frames_requested, 0);
    assert_eq!(controller.state(), SessionState::Inactive);
}

#[test]
fn cancelled_capture_still_exports_what_it_has() {
    let mut controller = controller(Recording {
        end_after_frames: Some(1),
        ..Recording::with_frames(vec![
            frame_with(vec![quad_mesh(None)], vec![]),
            frame_with(vec![quad_mesh(None)], vec![]),
        ])
    });
    controller.start(&[Capability::MeshDetection], &[]).unwrap();

    let mut sink = MemorySink::new();
    let report = controller.run(&mut sink).unwrap();
    assert_eq!(report.finish, FinishReason::Cancelled);
    assert_eq!(report.meshes, 1);
    assert_eq!(sink.artifacts().len(), 1);
}

#[test]
fn degraded_hit_test_continues_capture() {
    let mut controller = controller(Recording {
        hit_test_available: false,
        ..Recording::with_frames(vec![frame_with(vec![], vec![floor_plane(None)])])
    });
    controller
        .start(&[Capability::PlaneDetection], &[Capability::HitTest])
        .unwrap();
    assert!(!controller.context().unwrap().rules().hit_points);

    let report = controller.run(&mut MemorySink::new()).unwrap();
    assert_eq!(report.degraded, vec![Capability::HitTest]);
    assert!(report.issues.iter().any(|issue| issue.frame.is_none()
        && matches!(
            issue.error,
            CaptureError::CapabilityDegraded {
                capability: Capability::HitTest
            }
        )));
    assert_eq!(report.planes, 1);
    assert!(report.exported());
    assert_eq!(controller.host().stats().hit_test_releases, 0);
}

#[test]
fn export_failure_is_reported_after_session_ends() {
    let untracked = RecordedMesh {
        pose: None,
        ..quad_mesh(Some(9))
    };
    let mut controller = controller(Recording::with_frames(vec![frame_with(
        vec![quad_mesh(None), untracked],
        vec![],
    )]));
    controller.start(&[Capability::MeshDetection], &[]).unwrap();

    let err = controller.run(&mut BrokenSink).unwrap_err();
    assert!(matches!(err, CaptureError::ExportIo(_)));
    assert_eq!(controller.state(), SessionState::Inactive);
    assert_eq!(controller.host().stats().sessions_ended, 1);

    // What was captured survives the failed export
    assert_eq!(controller.surfaces().len(), 1);
    assert!(matches!(
        controller.issues(),
        [issue] if matches!(issue.error, CaptureError::PoseUnresolved { .. })
    ));
}
