//! datefile - name, match, and enumerate date-named files

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = datefile::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
