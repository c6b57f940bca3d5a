//! zugferd-invoices: render every invoice of a record source as ZUGFeRD
//! XML, HTML or PDF.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use zugferd_invoices::PipelineError;
use zugferd_invoices::batch::{BatchOptions, DirectorySink, run_batch};
use zugferd_invoices::config::Config;
use zugferd_invoices::profile::ProfileKind;
use zugferd_invoices::render::{OutputFormat, extract_embedded_xml};
use zugferd_invoices::store::{InvoiceRepository, MemorySource};

#[derive(Parser)]
#[command(name = "zugferd-invoices")]
#[command(author, version, about = "Render invoices as ZUGFeRD XML, HTML and PDF", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON record source (overrides [source].path)
    #[arg(short, long, global = true)]
    source: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render every invoice (the default)
    Render {
        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// basic or comfort
        #[arg(short, long)]
        profile: Option<ProfileKind>,

        /// Output format; repeat for several
        #[arg(short, long = "format")]
        formats: Vec<OutputFormat>,

        /// File name prefix (defaults to the profile name)
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Print the assembled invoices
    Dump,
    /// Print the XML attached to a PDF
    Extract {
        pdf: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(source) = cli.source {
        config.source.path = source;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command.unwrap_or(Command::Render {
        out: None,
        profile: None,
        formats: Vec::new(),
        prefix: None,
    }) {
        Command::Render {
            out,
            profile,
            formats,
            prefix,
        } => {
            if let Some(out) = out {
                config.output.directory = out;
            }
            if let Some(profile) = profile {
                config.output.profile = profile;
            }
            if !formats.is_empty() {
                config.output.formats = formats;
            }
            if prefix.is_some() {
                config.output.prefix = prefix;
            }
            render(&config)
        }
        Command::Dump => dump(&config),
        Command::Extract { pdf } => extract(&pdf),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "failed");
            ExitCode::FAILURE
        }
    }
}

fn render(config: &Config) -> Result<(), PipelineError> {
    let repo = InvoiceRepository::new(MemorySource::open(&config.source.path)?);
    let mut sink = DirectorySink::new(&config.output.directory);
    let options = BatchOptions {
        profile: config.output.profile,
        formats: config.output.formats.clone(),
        prefix: config.output.prefix.clone(),
    };
    let report = run_batch(&repo, &config.projection, &options, &mut sink)?;
    for skipped in &report.skipped {
        warn!(invoice_id = skipped.id, reason = %skipped.reason, "not rendered");
    }
    info!(
        directory = %sink.dir().display(),
        rendered = report.rendered.len(),
        skipped = report.skipped.len(),
        "done"
    );
    Ok(())
}

fn dump(config: &Config) -> Result<(), PipelineError> {
    let repo = InvoiceRepository::new(MemorySource::open(&config.source.path)?);
    for row in repo.invoice_rows()? {
        match repo.get_invoice(&row) {
            Ok(invoice) => println!("{invoice}"),
            Err(e) if e.is_per_invoice() => warn!(invoice_id = row.id, error = %e, "skipped"),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn extract(pdf: &Path) -> Result<(), PipelineError> {
    let bytes = std::fs::read(pdf)?;
    print!("{}", extract_embedded_xml(&bytes)?);
    Ok(())
}
