//! Définition et implémentation des commandes CLI
//!
//! - `convert`: GeoJSON → TASKDATA.XML
//! - `inspect`: résumé d'un TASKDATA.XML existant

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::{debug, info, warn};

use fields2isoxml::{
    CancellationToken, Config, ConversionReport, Converter, Crs, DefaultReprojection,
    GeoJsonSource,
};

#[derive(Subcommand)]
pub enum Commands {
    /// Convert field boundaries (GeoJSON) to an ISO 11783 TASKDATA.XML file
    Convert(ConvertArgs),

    /// Print a summary of an existing TASKDATA.XML file
    Inspect {
        /// Path to the TASKDATA.XML file
        path: PathBuf,
    },
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Input GeoJSON file (FeatureCollection of field boundaries)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output TASKDATA.XML path
    #[arg(short, long, default_value = "TASKDATA.XML")]
    pub output: PathBuf,

    /// Feature attribute holding the field name (défaut : env ISOXML_NAME_ATTRIBUTE / Name)
    #[arg(long)]
    pub name_attribute: Option<String>,

    /// Source CRS, overrides the one declared in the input (ex: 2154, EPSG:25832)
    #[arg(long)]
    pub srid: Option<String>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a JSON conversion report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Indent the XML output with N spaces
    #[arg(long)]
    pub indent: Option<usize>,

    /// ManagementSoftwareManufacturer (défaut : env ISOXML_MANUFACTURER)
    #[arg(long)]
    pub manufacturer: Option<String>,

    /// ManagementSoftwareVersion (défaut : env ISOXML_SOFTWARE_VERSION)
    #[arg(long)]
    pub software_version: Option<String>,
}

impl ConvertArgs {
    /// Configuration effective: fichier/env puis options CLI
    fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(ref name) = self.name_attribute {
            config.name_attribute = name.clone();
        }
        if let Some(ref manufacturer) = self.manufacturer {
            config.manufacturer = manufacturer.clone();
        }
        if let Some(ref version) = self.software_version {
            config.software_version = version.clone();
        }
        if self.indent.is_some() {
            config.indent = self.indent;
        }
        Ok(config)
    }
}

/// Commande `convert`
pub fn cmd_convert(args: &ConvertArgs, quiet: bool) -> Result<()> {
    let config = args.resolve_config()?;
    debug!(?config, "Effective configuration");

    let crs_override = args
        .srid
        .as_deref()
        .map(Crs::parse)
        .transpose()
        .context("Invalid --srid")?;

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("Received interrupt, cancelling conversion");
        handler_token.cancel();
    })
    .context("Failed to set signal handler")?;

    if !quiet {
        println!("=== Convert {} ===", args.input.display());
        println!("Output: {}", args.output.display());
        println!("Name attribute: {}", config.name_attribute);
        if let Some(ref crs) = crs_override {
            println!("Source CRS (override): {}", crs);
        }
    }

    let source = GeoJsonSource::open(&args.input, &config.name_attribute, crs_override)
        .context(format!("Failed to read {}", args.input.display()))?;

    let converter = Converter::new(&config);
    let mut report = ConversionReport::new(
        &args.input.display().to_string(),
        &args.output.display().to_string(),
    );
    let mut last = 0u8;
    let result = converter.run_into(
        source,
        &DefaultReprojection,
        &args.output,
        |percent| {
            if percent >= last.saturating_add(10) || percent == 100 {
                info!(progress = percent, "Encoding");
                last = percent;
            }
        },
        &cancel,
        &mut report,
    );

    // Le rapport garde SCR, compteurs et avertissements, même en échec
    if !quiet {
        report.display();
    }
    if let Some(ref path) = args.report {
        save_report(&report, path)?;
    }

    result.context("Conversion failed")
}

fn save_report(report: &ConversionReport, path: &Path) -> Result<()> {
    report
        .save_to_file(path)
        .context(format!("Failed to write report {}", path.display()))?;
    info!(path = %path.display(), "Report saved");
    Ok(())
}

/// Commande `inspect`
pub fn cmd_inspect(path: &Path) -> Result<()> {
    let xml = std::fs::read_to_string(path)
        .context(format!("Failed to read {}", path.display()))?;
    let doc = isoxml::parse_task_data(&xml)
        .context(format!("Invalid TASKDATA file {}", path.display()))?;

    println!("=== {} ===", path.display());
    println!(
        "Version: {}.{} (origin {})",
        doc.version_major, doc.version_minor, doc.data_transfer_origin
    );
    println!(
        "Management software: {} {}",
        doc.management_software_manufacturer, doc.management_software_version
    );
    println!(
        "Partfields: {} ({} points)",
        doc.partfields.len(),
        doc.point_count()
    );
    for pfd in &doc.partfields {
        println!("  {} {:<30} {} points", pfd.id, pfd.designator, pfd.point_count());
    }

    Ok(())
}
