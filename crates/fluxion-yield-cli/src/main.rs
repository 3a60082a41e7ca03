// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result};
use clap::Parser;
use fluxion_yield::ReportConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "fluxion-yield")]
#[command(author, version, about = "Inverter yield and efficiency report")]
#[command(
    long_about = "Reads exported inverter telemetry, derives AC/DC energy and conversion\n\
    efficiency, prints the days of maximum, average and minimum production, and\n\
    renders daily and monthly charts as PNG files.\n\
    \nExamples:\n  \
    fluxion-yield                                  # 'Dados tratados.xlsx' -> graficos_gerados/\n  \
    fluxion-yield --input export.csv --output-dir charts\n  \
    fluxion-yield --config yield.toml"
)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Telemetry spreadsheet (.xlsx, .xls, .ods or .csv)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Directory for the generated charts
    #[arg(short, long, value_name = "PATH")]
    output_dir: Option<PathBuf>,

    /// Worksheet name (defaults to the first sheet)
    #[arg(long)]
    sheet: Option<String>,
}

impl Cli {
    fn resolve_config(self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ReportConfig::default(),
        };

        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if self.sheet.is_some() {
            config.sheet = self.sheet;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = cli.resolve_config()?;
    info!(
        "Input: {} | Output: {}",
        config.input_path.display(),
        config.output_dir.display()
    );

    let mut stdout = std::io::stdout().lock();
    fluxion_yield::run(&config, &mut stdout)
        .with_context(|| format!("Yield report failed for {}", config.input_path.display()))?;

    Ok(())
}
