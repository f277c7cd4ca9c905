//! cdfio CLI - Command-line tool for inspecting CDF files.
//!
//! This is the main entry point for the cdfio command-line application.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memmap2::Mmap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cdfio::{parse_bytes_parallel, Attribute, Cdf, DescriptorOrder, ParseOptions, ValueOrder, Values};

/// cdfio - NASA Common Data Format inspection tool
#[derive(Parser)]
#[command(name = "cdfio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Fail on record chains that end before their declared length
    #[arg(long, global = true)]
    strict: bool,

    /// Read every descriptor field big-endian, whatever the file declares
    #[arg(long, global = true)]
    network_order: bool,

    /// Decode attribute values with the declared encoding instead of little-endian
    #[arg(long, global = true)]
    declared_values: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show file-level metadata for every CDF matching the patterns
    Info {
        /// File paths or glob patterns
        #[arg(required = true, env = "CDFIO_INPUT")]
        patterns: Vec<String>,
    },

    /// List the attributes of a CDF file
    Attrs {
        /// Path to the CDF file
        #[arg(env = "CDFIO_INPUT")]
        file: PathBuf,

        /// Print the attributes as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::default().with_strict_chains(self.strict);
        if self.network_order {
            options = options.with_descriptor_order(DescriptorOrder::Network);
        }
        if self.declared_values {
            options = options.with_value_order(ValueOrder::Declared);
        }
        options
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "cdfio=info",
        1 => "cdfio=debug",
        _ => "cdfio=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let options = cli.parse_options();

    match &cli.command {
        Commands::Info { patterns } => {
            cmd_info(patterns, options)?;
        }
        Commands::Attrs { file, json } => {
            cmd_attrs(file, *json, options)?;
        }
    }

    Ok(())
}

fn cmd_info(patterns: &[String], options: ParseOptions) -> Result<()> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let matches = glob::glob(pattern).with_context(|| format!("Invalid pattern: {pattern}"))?;
        for entry in matches {
            paths.push(entry.context("Failed to read path")?);
        }
    }
    if paths.is_empty() {
        anyhow::bail!("No files match the given patterns");
    }

    let mut errors = 0;
    for path in &paths {
        match Cdf::open_with(path, options) {
            Ok(cdf) => print_info(path, &cdf),
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                errors += 1;
            }
        }
    }

    if paths.len() > 1 {
        println!("\nTotal: {} files ({} errors)", paths.len(), errors);
    }
    if errors == paths.len() {
        anyhow::bail!("No file could be parsed");
    }

    Ok(())
}

fn print_info(path: &Path, cdf: &Cdf) {
    let info = cdf.info();
    println!("{}", path.display());
    println!("  Format:      {} (version {})", info.generation, info.version_string());
    println!("  Encoding:    {:?}", info.encoding);
    println!("  Compressed:  {}", info.compressed);
    println!("  Majority:    {}", if info.is_row_major() { "row" } else { "column" });
    println!("  Variables:   {} r, {} z", info.nr_vars, info.nz_vars);
    println!("  Attributes:  {}", info.num_attr);
    println!("  Leap second: {}", info.leap_second_last_updated);
    if !info.copyright.is_empty() {
        println!("  Copyright:   {}", info.copyright.trim_end());
    }
}

fn cmd_attrs(path: &Path, json: bool, options: ParseOptions) -> Result<()> {
    let file = File::open(path).context("Failed to open CDF file")?;
    let mmap = unsafe { Mmap::map(&file).context("Failed to map CDF file")? };

    let start = Instant::now();
    let cdf = parse_bytes_parallel(&mmap, options).context("Failed to parse CDF file")?;
    tracing::info!(elapsed = ?start.elapsed(), "parsed {}", path.display());

    let sorted: BTreeMap<&str, &Attribute> = cdf
        .attributes()
        .iter()
        .map(|(name, attribute)| (name.as_str(), attribute))
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&sorted).context("Failed to serialize attributes")?;
        println!("{out}");
        return Ok(());
    }

    for attribute in sorted.values() {
        println!(
            "{:>4} {:<8} {:<24} {}",
            attribute.number,
            if attribute.scope.is_global() { "global" } else { "variable" },
            attribute.name,
            describe(attribute.values.as_ref())
        );
    }
    println!("\nTotal: {} attributes", sorted.len());

    Ok(())
}

/// One-line rendering of an attribute's values.
fn describe(values: Option<&Values>) -> String {
    match values {
        None => "-".to_string(),
        Some(values) => match values.as_str() {
            Some(text) => format!("{text:?}"),
            None => format!("{values:?}"),
        },
    }
}
