//! Mason Packager - post-build distribution for .nuspec based projects.
//!
//! This binary merges manifest includes, runs packaging commands, collects
//! artifacts and prunes superseded packages for one project.

use mason_packager::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  • {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
