//! Replay runner: recording in, artifact on disk out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use roomscan_capture::replay::{Recording, ReplayHost};
use roomscan_capture::{
    CaptureConfig, CaptureError, CaptureReport, Capability, ManualClock, SessionController,
    SessionId, SessionObserver,
};
use roomscan_export::{ExportedArtifact, FileSink};
use tracing_subscriber::EnvFilter;

use crate::args::ReplayArgs;

/// Installs the log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// How a replay ended, from the user's point of view.
#[derive(Debug)]
pub enum Outcome {
    /// An artifact was written.
    Saved { path: PathBuf, report: CaptureReport },
    /// The session ran but nothing was captured.
    NothingCaptured { report: CaptureReport },
    NotSupported(String),
    NotAllowed(String),
}

impl Outcome {
    /// Status line shown to the user.
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Saved { .. } => "ROOM MESH SAVED",
            Outcome::NothingCaptured { .. } => "NOTHING CAPTURED",
            Outcome::NotSupported(_) => "AR NOT SUPPORTED",
            Outcome::NotAllowed(_) => "AR NOT ALLOWED",
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Outcome::Saved { .. })
    }
}

/// Loads capture settings, falling back to defaults without a file.
pub fn load_config(path: Option<&Path>) -> Result<CaptureConfig> {
    let Some(path) = path else {
        return Ok(CaptureConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings '{}'", path.display()))?;
    CaptureConfig::from_json(&text)
        .with_context(|| format!("Invalid settings in '{}'", path.display()))
}

/// Logs lifecycle notifications the way the capture button labels them.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn session_started(&mut self, session: SessionId, degraded: &[Capability]) {
        tracing::info!(%session, ?degraded, "STOP AR");
    }

    fn artifact_exported(&mut self, artifact: &ExportedArtifact) {
        tracing::info!(filename = %artifact.filename, bytes = artifact.len(), "Room mesh exported");
    }

    fn session_ended(&mut self, session: SessionId) {
        tracing::debug!(%session, "START AR");
    }
}

/// Runs one capture session against a recording.
///
/// Refusals by the host are outcomes, not errors; I/O, settings and export
/// failures are errors.
pub fn replay(args: &ReplayArgs) -> Result<Outcome> {
    let text = std::fs::read_to_string(&args.recording)
        .with_context(|| format!("Failed to read recording '{}'", args.recording.display()))?;
    let recording = Recording::from_json(&text)
        .with_context(|| format!("Invalid recording '{}'", args.recording.display()))?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(format) = args.format {
        config.export.format = format;
    }
    if let Some(filename) = &args.filename {
        config.export.filename = Some(filename.clone());
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create '{}'", args.out.display()))?;

    // Session time follows the recording's frame interval, not the wall clock
    let clock = ManualClock::new();
    let host = ReplayHost::new(recording).with_clock(clock.clone());
    let mut controller =
        SessionController::with_clock(host, clock, config)?.with_observer(ConsoleObserver);

    match controller.start(&args.require, &args.optional) {
        Ok(_) => {}
        Err(CaptureError::NotSupported(reason)) => return Ok(Outcome::NotSupported(reason)),
        Err(CaptureError::NotAllowed(reason)) => return Ok(Outcome::NotAllowed(reason)),
        Err(err) => return Err(err.into()),
    }

    let mut sink = FileSink::new(&args.out);
    let report = controller.run(&mut sink)?;

    for issue in &report.issues {
        tracing::warn!(frame = ?issue.frame, "{}", issue.error);
    }

    Ok(match sink.written().first() {
        Some(path) => Outcome::Saved {
            path: path.clone(),
            report,
        },
        None => Outcome::NothingCaptured { report },
    })
}
