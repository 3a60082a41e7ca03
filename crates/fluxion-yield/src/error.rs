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

//! Error types for the yield report crate

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures while reading the telemetry spreadsheet
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("telemetry file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported telemetry format '{extension}' for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("worksheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("no header row found")]
    MissingHeader,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: column '{column}' is not numeric (found '{value}')")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

/// The daily energy series had nothing to select from
#[derive(Debug, Error)]
#[error("daily energy series is empty, no dated samples to aggregate")]
pub struct EmptySeriesError;

#[derive(Debug, Error)]
pub enum YieldError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    EmptySeries(#[from] EmptySeriesError),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to render chart {}: {reason}", path.display())]
    Chart { path: PathBuf, reason: String },

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, YieldError>;
