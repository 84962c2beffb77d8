//! Point d'entrée CLI pour fields2isoxml

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

fn load_env() {
    if dotenvy::dotenv().is_err() {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Convertir des limites de champ en fichier ISO 11783 TASKDATA.XML
#[derive(Parser)]
#[command(name = "fields2isoxml")]
#[command(author, version)]
#[command(about = "Convert field boundary polygons to an ISO 11783 TASKDATA.XML file")]
#[command(long_about = "Convert field boundary polygons (GeoJSON) to an ISO 11783 TASKDATA.XML file.\n\nCoordinates are reprojected to WGS84 (EPSG:4326) when the input uses another CRS.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Convert(ref args) => {
            info!(input = %args.input.display(), output = %args.output.display(), "Convert to TASKDATA");
            cli::cmd_convert(args, cli.quiet)?;
        }
        Commands::Inspect { ref path } => {
            cli::cmd_inspect(path)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
