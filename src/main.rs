//! pj - track and open local projects

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = pj::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
