//! Shared plumbing for the dashguard binaries.

pub mod commands;
pub mod logging;

use std::process::ExitCode;

/// Maps a 0/1 status onto the process exit code.
pub fn exit_code(code: i32) -> ExitCode {
    if code == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
