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

//! End-to-end report run: load → derive → aggregate → select → plot → report.

use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::aggregate::{DailyEnergy, MonthlyAggregates, daily_energy, monthly_aggregates};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::extremes::select_extremal_days;
use crate::loader::load_telemetry;
use crate::plot::{
    MONTHLY_EFFICIENCY_CHART, MONTHLY_ENERGY_CHART, day_profile, ensure_output_dir,
    render_day_chart, render_monthly_chart,
};
use crate::report::{format_day, format_report};
use crate::transform::derive_samples;
use crate::types::{ExtremalDays, ProductionKind, Sample, TelemetryRow};

/// Everything derived from one telemetry file
#[derive(Debug, Clone)]
pub struct YieldAnalysis {
    pub samples: Vec<Sample>,
    pub daily: DailyEnergy,
    pub monthly: MonthlyAggregates,
    pub days: ExtremalDays,
}

impl YieldAnalysis {
    /// Derive metrics and aggregates from loaded rows.
    ///
    /// Fails with `EmptySeries` when no row carries a valid timestamp.
    pub fn from_rows(rows: Vec<TelemetryRow>) -> Result<Self> {
        info!("Processing {} samples", rows.len());
        let samples = derive_samples(rows);
        let daily = daily_energy(&samples);
        let monthly = monthly_aggregates(&samples);
        let days = select_extremal_days(&daily)?;

        info!(
            "Aggregated {} days across {} months",
            daily.len(),
            monthly.energy_kwh.len()
        );

        Ok(Self {
            samples,
            daily,
            monthly,
            days,
        })
    }

    #[must_use]
    pub fn report(&self) -> String {
        format_report(&self.daily, &self.days)
    }

    /// Render all five charts into `config.output_dir`.
    ///
    /// Charts are drawn into a staging directory first and moved into place
    /// only once every chart succeeded, so a failed run leaves earlier output
    /// untouched.
    pub fn write_charts(&self, config: &ReportConfig) -> Result<Vec<PathBuf>> {
        ensure_output_dir(&config.output_dir)?;
        let staging = tempfile::Builder::new()
            .prefix(".fluxion-yield-")
            .tempdir_in(&config.output_dir)?;

        let mut file_names = Vec::with_capacity(5);

        for kind in ProductionKind::ALL {
            let day = kind.day(&self.days);
            let title = format!("{} ({})", kind.chart_title(), format_day(day));
            render_day_chart(
                &staging.path().join(kind.file_name()),
                config.chart,
                &title,
                &day_profile(&self.samples, day),
            )?;
            file_names.push(kind.file_name());
        }

        render_monthly_chart(
            &staging.path().join(MONTHLY_ENERGY_CHART.file_name),
            config.chart,
            &MONTHLY_ENERGY_CHART,
            &self.monthly.energy_kwh,
        )?;
        file_names.push(MONTHLY_ENERGY_CHART.file_name);

        render_monthly_chart(
            &staging.path().join(MONTHLY_EFFICIENCY_CHART.file_name),
            config.chart,
            &MONTHLY_EFFICIENCY_CHART,
            &self.monthly.efficiency_pct,
        )?;
        file_names.push(MONTHLY_EFFICIENCY_CHART.file_name);

        let mut written = Vec::with_capacity(file_names.len());
        for name in file_names {
            let target = config.output_dir.join(name);
            std::fs::rename(staging.path().join(name), &target)?;
            info!("Chart saved to {}", target.display());
            written.push(target);
        }

        Ok(written)
    }
}

/// Run the whole report for `config`, writing the text summary to `out`
pub fn run<W: Write>(config: &ReportConfig, out: &mut W) -> Result<YieldAnalysis> {
    config.validate()?;

    let rows = load_telemetry(&config.input_path, config.sheet.as_deref())?;
    let analysis = YieldAnalysis::from_rows(rows)?;
    analysis.write_charts(config)?;

    out.write_all(analysis.report().as_bytes())?;
    out.flush()?;

    Ok(analysis)
}
