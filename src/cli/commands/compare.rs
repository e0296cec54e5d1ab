//! Compare command - byte-exact comparison of two files

use crate::cli::args::CompareArgs;
use crate::compare::compare_files;
use crate::error::{LazyDeployError, LazyDeployResult};
use std::process::ExitCode;

/// Execute the compare command; `ExitCode::FAILURE` when the files differ
pub fn execute(args: CompareArgs) -> LazyDeployResult<ExitCode> {
    for path in [&args.left, &args.right] {
        if !path.is_file() {
            return Err(LazyDeployError::PathNotFound(path.clone()));
        }
    }

    if compare_files(&args.left, &args.right) == 0 {
        println!("identical");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("different");
        Ok(ExitCode::FAILURE)
    }
}
