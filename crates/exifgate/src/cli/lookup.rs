//! The `exifgate lookup` command.

use clap::{Args, ValueEnum};
use exifgate_core::output::OutputFormat as CoreOutputFormat;
use exifgate_core::{Config, ExifLookup, LookupOptions, OutputWriter};
use std::io::{self, BufWriter};

/// Arguments for the `lookup` command.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Image URLs to look up
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Output format (defaults to `output.format` from the config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Ignore cached results
    #[arg(long)]
    pub no_cache: bool,
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Execute the lookup command.
pub async fn execute(args: LookupArgs, config: Config) -> anyhow::Result<()> {
    let format = match args.format {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Json),
    };
    let pretty = args.pretty || config.output.pretty;
    let options = LookupOptions {
        bypass_cache: args.no_cache,
    };

    let lookup = ExifLookup::from_config(&config)?;
    let mut writer = OutputWriter::new(BufWriter::new(io::stdout()), format, pretty);

    let mut failed = 0;
    for url in &args.urls {
        let response = lookup.respond_with_options(url, &options).await;
        if !response.success {
            failed += 1;
        }
        writer.write(url, response)?;
    }
    writer.finish()?;

    tracing::info!(
        "Looked up {} URL(s): {} succeeded, {} failed",
        args.urls.len(),
        args.urls.len() - failed,
        failed
    );
    Ok(())
}
