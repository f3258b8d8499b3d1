//! ExifGate CLI - canonical EXIF metadata for remote images.
//!
//! Fetches an image by URL, reads its EXIF block and prints a clean JSON
//! record. The same lookup can be served over HTTP behind a TOTP gate.
//!
//! # Usage
//!
//! ```bash
//! # Look up one image
//! exifgate lookup https://example.com/photo.jpg
//!
//! # Several images, one result per line
//! exifgate lookup https://a.example/1.jpg https://a.example/2.jpg --format jsonl
//!
//! # Enroll an authenticator app, then serve the endpoint
//! exifgate otp secret
//! exifgate serve --bind 0.0.0.0:8080
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// ExifGate - canonical EXIF metadata for remote images.
#[derive(Parser, Debug)]
#[command(name = "exifgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up the EXIF metadata of one or more image URLs
    Lookup(cli::lookup::LookupArgs),

    /// Manage the one-time-password secret
    Otp(cli::otp::OtpArgs),

    /// Serve the lookup endpoint over HTTP
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match exifgate_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `exifgate config path`."
            );
            exifgate_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("ExifGate v{}", exifgate_core::VERSION);

    match cli.command {
        Commands::Lookup(args) => cli::lookup::execute(args, config).await,
        Commands::Otp(args) => cli::otp::execute(args, config).await,
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
