use anyhow::{Context, Result};
use clap::Parser;

use octomeasure_cli::cli::{Cli, Commands};
use octomeasure_cli::config::loader::load_config;
use octomeasure_cli::output::{print_error, print_outcome, print_success, print_warning};
use octomeasure_cli::{CommandContext, MeasureFile, observability};

#[tokio::main]
async fn main() {
    // Load .env file if present; a missing file is not an error
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let cli = Cli::parse();

    let cfg = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            print_error(&format!("Configuration error: {e}"));
            std::process::exit(2);
        }
    };
    observability::apply_logging_level(&cfg.logging.level);

    if let Err(e) = run(cli, cfg).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, cfg: octomeasure_cli::AppConfig) -> Result<()> {
    let format = cli.format.unwrap_or_default();

    if let Commands::Config = cli.command {
        print!("{}", toml::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let path = cli
        .measure
        .as_deref()
        .context("No measure file; pass --measure or set OCTOMEASURE_MEASURE")?;
    let file = MeasureFile::open(path)?;
    let ctx = CommandContext::new(file, &cfg, cli.user.clone());

    let outcome = ctx.execute(&cli.command).await?;
    print_outcome(&outcome, format)?;

    if cli.dry_run {
        if ctx.file().is_modified() {
            print_warning(&format!("Dry run: {} not written", path.display()));
        }
    } else if ctx.file().write_back()? {
        print_success(&format!("Saved {}", path.display()));
    }
    Ok(())
}
