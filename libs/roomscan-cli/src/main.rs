//! `roomscan` binary.
//!
//! ```bash
//! roomscan replay session.json --out scans/
//! roomscan replay session.json --format json --config capture.json
//! RUST_LOG=roomscan_capture=trace roomscan replay session.json
//! ```

use std::process::ExitCode;

use clap::Parser;
use roomscan_cli::{init_tracing, replay, Cli, Command, Outcome};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Replay(args) => replay(args),
    };

    match result {
        Ok(outcome) => {
            println!("{}", outcome.status());
            match &outcome {
                Outcome::Saved { path, report } => {
                    println!(
                        "{} ({} surfaces from {} frames, {})",
                        path.display(),
                        report.surfaces,
                        report.frames,
                        report.finish
                    );
                    ExitCode::SUCCESS
                }
                Outcome::NothingCaptured { report } => {
                    println!("{} frames, {}", report.frames, report.finish);
                    ExitCode::SUCCESS
                }
                Outcome::NotSupported(reason) | Outcome::NotAllowed(reason) => {
                    eprintln!("{reason}");
                    ExitCode::from(2)
                }
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
