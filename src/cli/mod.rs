pub mod login;
pub mod remove;
pub mod update;

use std::process::ExitCode;
use wingetup::core::{format_error_with_help, WingetResult};
use wingetup::update::{AbortReason, SessionOutcome};

/// Exit status for a finished workflow.
///
/// Aborts other than Ctrl-C are not failures: the reason was already shown.
pub fn outcome_exit_code(outcome: SessionOutcome) -> ExitCode {
    match outcome {
        SessionOutcome::Completed(..) => ExitCode::SUCCESS,
        SessionOutcome::Aborted(AbortReason::Interrupted) => {
            eprintln!("\nCancelled");
            ExitCode::from(130)
        }
        SessionOutcome::Aborted(_) => ExitCode::SUCCESS,
        SessionOutcome::Failed(e) => {
            eprintln!("\n{}", format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}

/// Exit status for commands that only succeed or fail
pub fn result_exit_code(result: WingetResult<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
