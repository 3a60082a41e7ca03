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

//! Telemetry spreadsheet loading.
//!
//! Workbooks are read with calamine, CSV exports with the csv crate. Both are
//! flattened into a [`Table`] of [`Cell`]s and then mapped onto
//! [`TelemetryRow`]s by header name.

use calamine::{Data, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::DataLoadError;
use crate::types::{DateParts, ElectricalReading, TelemetryRow};

/// Locale-specific date/time headers and their canonical names
pub const HEADER_RENAMES: [(&str, &str); 5] = [
    ("Ano", "year"),
    ("Mês", "month"),
    ("Dia", "day"),
    ("Hora", "hour"),
    ("Minuto", "minute"),
];

pub const COL_AC_VOLTAGE: &str = "Vac[V]";
pub const COL_AC_CURRENT: &str = "Ica[A]";
pub const COL_POWER_FACTOR: &str = "FP";
pub const COL_DC_VOLTAGE: &str = "Vcc1[V MPPT1]";
pub const COL_DC_CURRENT: &str = "Icc1[A]";
pub const COL_PERIOD: &str = "Período[h]";

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// A single spreadsheet cell, independent of the source format
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify a textual cell (CSV field) as empty, numeric or text
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else if let Some(value) = parse_finite(trimmed) {
            Cell::Number(value)
        } else {
            Cell::Text(trimmed.to_owned())
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Finite numeric value; `NaN` and infinities count as non-numeric
    fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v).filter(|v| v.is_finite()),
            Cell::Text(s) => parse_finite(s),
            Cell::Empty => None,
        }
    }

    /// Integer-like value: integers, integral floats, or integer strings
    fn as_integer(&self) -> Option<i64> {
        let value = self.as_number()?;
        if value.is_finite() && value.fract() == 0.0 {
            #[expect(clippy::cast_possible_truncation)]
            let integer = value as i64;
            Some(integer)
        } else {
            None
        }
    }

    fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl From<&Data> for Cell {
    #[expect(clippy::cast_precision_loss)]
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(v) => Cell::Number(*v as f64),
            Data::Float(v) => Cell::Number(*v),
            Data::String(s) if s.trim().is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.trim().to_owned()),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// Rows of cells as read from the source, header row included
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// 1-based sheet row number of `rows[0]`
    pub first_row: usize,
    pub rows: Vec<Vec<Cell>>,
}

/// Anything that can produce a table of telemetry cells
pub trait TableSource {
    fn read_table(&self) -> Result<Table, DataLoadError>;
}

/// Excel/OpenDocument workbook read through calamine
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    path: PathBuf,
    sheet: Option<String>,
}

impl WorkbookSource {
    pub fn new<P: AsRef<Path>>(path: P, sheet: Option<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet,
        }
    }

    fn workbook_error(&self, source: calamine::Error) -> DataLoadError {
        DataLoadError::Workbook {
            path: self.path.clone(),
            source,
        }
    }
}

impl TableSource for WorkbookSource {
    fn read_table(&self) -> Result<Table, DataLoadError> {
        let mut workbook =
            open_workbook_auto(&self.path).map_err(|source| self.workbook_error(source))?;

        let range = match &self.sheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|n| n == name) {
                    return Err(DataLoadError::SheetNotFound(name.clone()));
                }
                workbook.worksheet_range(name)
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or(DataLoadError::NoWorksheet)?,
        }
        .map_err(|source| self.workbook_error(source))?;

        let first_row = range.start().map_or(1, |(row, _)| row as usize + 1);
        let rows = range
            .rows()
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();

        Ok(Table { first_row, rows })
    }
}

/// Comma-separated export with the same headers as the workbook
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn csv_error(&self, source: csv::Error) -> DataLoadError {
        DataLoadError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl TableSource for CsvSource {
    fn read_table(&self) -> Result<Table, DataLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|source| self.csv_error(source))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| self.csv_error(source))?;
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        Ok(Table { first_row: 1, rows })
    }
}

/// Pick a table source from the file extension
pub fn source_for_path(
    path: &Path,
    sheet: Option<&str>,
) -> Result<Box<dyn TableSource>, DataLoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if extension == "csv" {
        Ok(Box::new(CsvSource::new(path)))
    } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        Ok(Box::new(WorkbookSource::new(path, sheet.map(str::to_owned))))
    } else {
        Err(DataLoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        })
    }
}

/// Read the telemetry file at `path` into ordered rows
pub fn load_telemetry(
    path: &Path,
    sheet: Option<&str>,
) -> Result<Vec<TelemetryRow>, DataLoadError> {
    info!("Reading telemetry file {}", path.display());

    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let table = source_for_path(path, sheet)?.read_table()?;
    let rows = parse_table(table)?;

    let undated = rows.iter().filter(|r| r.timestamp.is_none()).count();
    if undated > 0 {
        warn!(
            "{} of {} rows have no valid timestamp and are left out of daily totals",
            undated,
            rows.len()
        );
    }
    info!("Loaded {} telemetry rows", rows.len());

    Ok(rows)
}

/// Canonical column name for a header cell
#[must_use]
pub fn canonical_header(header: &str) -> &str {
    let header = header.trim();
    HEADER_RENAMES
        .iter()
        .find(|(source, _)| *source == header)
        .map_or(header, |(_, canonical)| canonical)
}

/// Column positions of every required field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    year: usize,
    month: usize,
    day: usize,
    hour: usize,
    minute: usize,
    ac_voltage: usize,
    ac_current: usize,
    power_factor: usize,
    dc_voltage: usize,
    dc_current: usize,
    period: usize,
}

impl ColumnMap {
    fn from_header(header: &[Cell]) -> Result<Self, DataLoadError> {
        let names: Vec<String> = header
            .iter()
            .map(|cell| canonical_header(&cell.display()).to_owned())
            .collect();
        debug!("Canonical headers: {:?}", names);

        let mut missing = Vec::new();
        let mut find = |name: &str| match names.iter().position(|n| n == name) {
            Some(idx) => idx,
            None => {
                missing.push(name.to_owned());
                0
            }
        };

        let map = Self {
            year: find("year"),
            month: find("month"),
            day: find("day"),
            hour: find("hour"),
            minute: find("minute"),
            ac_voltage: find(COL_AC_VOLTAGE),
            ac_current: find(COL_AC_CURRENT),
            power_factor: find(COL_POWER_FACTOR),
            dc_voltage: find(COL_DC_VOLTAGE),
            dc_current: find(COL_DC_CURRENT),
            period: find(COL_PERIOD),
        };

        if missing.is_empty() {
            Ok(map)
        } else {
            Err(DataLoadError::MissingColumns(missing))
        }
    }
}

/// Map a raw table (header row first) onto telemetry rows.
///
/// Blank rows are skipped. Malformed date parts produce a row with a null
/// timestamp; malformed electrical values abort the load.
pub fn parse_table(table: Table) -> Result<Vec<TelemetryRow>, DataLoadError> {
    let mut rows = table
        .rows
        .into_iter()
        .enumerate()
        .map(|(idx, cells)| (table.first_row + idx, cells))
        .filter(|(_, cells)| !cells.iter().all(Cell::is_empty));

    let (_, header) = rows.next().ok_or(DataLoadError::MissingHeader)?;
    let columns = ColumnMap::from_header(&header)?;

    rows.map(|(row_number, cells)| parse_row(row_number, &cells, &columns))
        .collect()
}

fn parse_row(
    row_number: usize,
    cells: &[Cell],
    columns: &ColumnMap,
) -> Result<TelemetryRow, DataLoadError> {
    let cell = |idx: usize| cells.get(idx).unwrap_or(&Cell::Empty);

    let int_part = |idx: usize| cell(idx).as_integer();
    let parts = DateParts {
        year: int_part(columns.year).and_then(|v| i32::try_from(v).ok()),
        month: int_part(columns.month).and_then(|v| u32::try_from(v).ok()),
        day: int_part(columns.day).and_then(|v| u32::try_from(v).ok()),
        hour: int_part(columns.hour).and_then(|v| u32::try_from(v).ok()),
        minute: int_part(columns.minute).and_then(|v| u32::try_from(v).ok()),
    };

    let number = |idx: usize, column: &str| {
        let value = cell(idx);
        value.as_number().ok_or_else(|| DataLoadError::InvalidValue {
            row: row_number,
            column: column.to_owned(),
            value: value.display(),
        })
    };

    let reading = ElectricalReading {
        ac_voltage_v: number(columns.ac_voltage, COL_AC_VOLTAGE)?,
        ac_current_a: number(columns.ac_current, COL_AC_CURRENT)?,
        power_factor: number(columns.power_factor, COL_POWER_FACTOR)?,
        dc_voltage_v: number(columns.dc_voltage, COL_DC_VOLTAGE)?,
        dc_current_a: number(columns.dc_current, COL_DC_CURRENT)?,
        period_h: number(columns.period, COL_PERIOD)?,
    };

    Ok(TelemetryRow::new(parts, reading))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [&str; 11] = [
        "Ano",
        "Mês",
        "Dia",
        "Hora",
        "Minuto",
        "Vac[V]",
        "Ica[A]",
        "FP",
        "Vcc1[V MPPT1]",
        "Icc1[A]",
        "Período[h]",
    ];

    fn text_row(fields: &[&str]) -> Vec<Cell> {
        fields.iter().map(|f| Cell::from_text(f)).collect()
    }

    fn table(data: &[&[&str]]) -> Table {
        let mut rows = vec![text_row(&HEADER)];
        rows.extend(data.iter().map(|r| text_row(r)));
        Table { first_row: 1, rows }
    }

    #[test]
    fn test_canonical_header() {
        assert_eq!(canonical_header("Ano"), "year");
        assert_eq!(canonical_header(" Mês "), "month");
        assert_eq!(canonical_header("Minuto"), "minute");
        assert_eq!(canonical_header("Vac[V]"), "Vac[V]");
    }

    #[test]
    fn test_parse_table_builds_timestamps() {
        let rows = parse_table(table(&[
            &["2024", "1", "5", "10", "15", "220", "5", "1", "300", "4", "0.0833"],
            &["2024", "1", "5", "10", "20", "221", "6", "0.98", "310", "4.5", "0.0833"],
        ]))
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].timestamp.unwrap().to_string(),
            "2024-01-05 10:15:00"
        );
        assert_eq!(rows[1].reading.power_factor, 0.98);
        assert_eq!(rows[1].reading.dc_current_a, 4.5);
    }

    #[test]
    fn test_bad_date_parts_keep_row() {
        let rows = parse_table(table(&[
            &["2024", "2", "31", "10", "0", "220", "5", "1", "300", "4", "1"],
            &["2024", "2", "x", "10", "0", "220", "5", "1", "300", "4", "1"],
            &["2024", "2", "1", "10", "0", "220", "5", "1", "300", "4", "1"],
        ]))
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].timestamp.is_none());
        assert!(rows[1].timestamp.is_none());
        assert_eq!(rows[1].parts.day, None);
        assert!(rows[2].timestamp.is_some());
    }

    #[test]
    fn test_integral_float_date_parts() {
        let mut t = table(&[]);
        t.rows.push(vec![
            Cell::Number(2024.0),
            Cell::Number(3.0),
            Cell::Number(1.0),
            Cell::Number(8.0),
            Cell::Number(45.0),
            Cell::Number(220.0),
            Cell::Number(5.0),
            Cell::Number(1.0),
            Cell::Number(300.0),
            Cell::Number(4.0),
            Cell::Number(0.25),
        ]);
        let rows = parse_table(t).unwrap();
        assert_eq!(rows[0].timestamp.unwrap().to_string(), "2024-03-01 08:45:00");

        let mut t = table(&[]);
        t.rows.push(vec![
            Cell::Number(2024.0),
            Cell::Number(3.5),
            Cell::Number(1.0),
            Cell::Number(8.0),
            Cell::Number(45.0),
            Cell::Number(220.0),
            Cell::Number(5.0),
            Cell::Number(1.0),
            Cell::Number(300.0),
            Cell::Number(4.0),
            Cell::Number(0.25),
        ]);
        let rows = parse_table(t).unwrap();
        assert!(rows[0].timestamp.is_none());
        assert!(rows[0].parts.year_month().is_none());
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let t = Table {
            first_row: 1,
            rows: vec![text_row(&["Ano", "Mês", "Dia", "Hora", "Minuto", "Vac[V]", "FP"])],
        };
        match parse_table(t) {
            Err(DataLoadError::MissingColumns(cols)) => {
                assert_eq!(
                    cols,
                    vec!["Ica[A]", "Vcc1[V MPPT1]", "Icc1[A]", "Período[h]"]
                );
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_electrical_value_is_fatal() {
        let err = parse_table(table(&[
            &["2024", "1", "5", "10", "15", "220", "5", "1", "300", "4", "1"],
            &["2024", "1", "5", "10", "20", "n/a", "5", "1", "300", "4", "1"],
        ]))
        .unwrap_err();

        match err {
            DataLoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Vac[V]");
                assert_eq!(value, "n/a");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_electrical_value_is_fatal() {
        for bad in ["NaN", "inf", "-infinity"] {
            let err = parse_table(table(&[
                &["2024", "1", "10", "10", "0", "220", "5", "1", "300", "4", "1"],
                &["2024", "1", "11", "10", "0", "220", bad, "1", "300", "4", "1"],
            ]))
            .unwrap_err();

            match err {
                DataLoadError::InvalidValue { row, column, value } => {
                    assert_eq!(row, 3);
                    assert_eq!(column, "Ica[A]");
                    assert_eq!(value, bad);
                }
                other => panic!("expected InvalidValue for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_cell_from_text() {
        assert_eq!(Cell::from_text("  "), Cell::Empty);
        assert_eq!(Cell::from_text(" 2.5 "), Cell::Number(2.5));
        assert_eq!(Cell::from_text("NaN"), Cell::Text("NaN".to_owned()));
        assert_eq!(Cell::from_text("abc"), Cell::Text("abc".to_owned()));
    }

    #[test]
    fn test_cell_from_workbook_data() {
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
        assert_eq!(Cell::from(&Data::Int(2024)), Cell::Number(2024.0));
        assert_eq!(Cell::from(&Data::Float(0.25)), Cell::Number(0.25));
        assert_eq!(
            Cell::from(&Data::String(" 220 ".to_owned())),
            Cell::Text("220".to_owned())
        );
        assert_eq!(Cell::from(&Data::String("   ".to_owned())), Cell::Empty);
        assert_eq!(
            Cell::from(&Data::Bool(true)),
            Cell::Text("true".to_owned())
        );

        // Numeric strings from workbooks still parse as numbers
        assert_eq!(Cell::from(&Data::String("4.5".to_owned())).as_number(), Some(4.5));
        assert_eq!(Cell::from(&Data::Float(f64::NAN)).as_number(), None);
        assert_eq!(Cell::from(&Data::Float(8.0)).as_integer(), Some(8));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let mut t = Table {
            first_row: 1,
            rows: vec![vec![Cell::Empty, Cell::Empty]],
        };
        t.rows.push(text_row(&HEADER));
        t.rows.push(vec![Cell::Empty; 11]);
        t.rows.push(text_row(&[
            "2024", "1", "5", "10", "15", "220", "5", "1", "300", "4", "1",
        ]));

        let rows = parse_table(t).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_empty_table_has_no_header() {
        assert!(matches!(
            parse_table(Table::default()),
            Err(DataLoadError::MissingHeader)
        ));
    }

    #[test]
    fn test_source_for_unknown_extension() {
        let err = source_for_path(Path::new("telemetry.json"), None)
            .err()
            .unwrap();
        assert!(matches!(err, DataLoadError::UnsupportedFormat { .. }));
        assert!(source_for_path(Path::new("Dados tratados.XLSX"), None).is_ok());
        assert!(source_for_path(Path::new("export.csv"), None).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = load_telemetry(Path::new("/nonexistent/Dados tratados.xlsx"), None).unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound(_)));
    }
}
