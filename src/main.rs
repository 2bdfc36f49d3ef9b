//! coopguard - point-to-point agent exchange for chicken food safety.

use clap::Parser;
use std::process::ExitCode;

use coopguard::cli::Commands;
use coopguard::logging;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Commands::parse();

    // Held until exit so the file writer flushes
    let _logs = match logging::init(args.log_profile()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Run the command
    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
