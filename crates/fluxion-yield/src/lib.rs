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

//! FluxION Yield Report
//!
//! Offline analysis of exported inverter telemetry.
//!
//! ## Features
//!
//! - **Loading**: Excel/OpenDocument workbooks and CSV exports with localized headers
//! - **Derivation**: per-sample AC/DC energy, AC power and conversion efficiency
//! - **Aggregation**: daily energy, monthly energy and mean monthly efficiency
//! - **Reporting**: best, typical and worst production days as text and PNG charts

pub mod aggregate;
pub mod config;
pub mod error;
pub mod extremes;
pub mod loader;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod transform;
pub mod types;

pub use aggregate::{DailyEnergy, MonthlyAggregates, daily_energy, monthly_aggregates};
pub use config::{ChartConfig, ReportConfig};
pub use error::{DataLoadError, EmptySeriesError, Result, YieldError};
pub use extremes::select_extremal_days;
pub use loader::load_telemetry;
pub use pipeline::{YieldAnalysis, run};
pub use report::format_report;
pub use transform::derive_samples;
pub use types::*;
