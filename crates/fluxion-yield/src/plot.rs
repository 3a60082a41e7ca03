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

//! PNG chart rendering for daily profiles and monthly summaries.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;

use crate::config::ChartConfig;
use crate::error::{Result, YieldError};
use crate::types::{Sample, YearMonth};

type ChartResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// One point of a per-day power/efficiency profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub time: DateTime<Utc>,
    pub power_kw: f64,
    pub efficiency_pct: f64,
}

/// Static description of a monthly bar chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyChart {
    pub title: &'static str,
    pub y_desc: &'static str,
    pub file_name: &'static str,
}

pub const MONTHLY_ENERGY_CHART: MonthlyChart = MonthlyChart {
    title: "Energia Mensal Produzida (CA)",
    y_desc: "Energia (kWh)",
    file_name: "energia_mensal.png",
};

pub const MONTHLY_EFFICIENCY_CHART: MonthlyChart = MonthlyChart {
    title: "Eficiência Mensal do Inversor",
    y_desc: "Eficiência (%)",
    file_name: "eficiencia_mensal.png",
};

/// A single bar in a month-grouped bar chart, in axis units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyBar {
    pub year: i32,
    pub month: u32,
    pub x0: f64,
    pub x1: f64,
    pub value: f64,
}

/// Bars grouped by month with one bar per year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedBars {
    /// Month of each group, in axis order
    pub months: Vec<u32>,
    /// Years present, in legend order
    pub years: Vec<i32>,
    pub bars: Vec<MonthlyBar>,
}

const GROUP_WIDTH: f64 = 0.8;

/// Lay out monthly values: group `i` spans `[i, i + 1)` on the x axis
#[must_use]
pub fn grouped_bars(values: &BTreeMap<YearMonth, f64>) -> GroupedBars {
    let mut months: Vec<u32> = values.keys().map(|ym| ym.month).collect();
    months.sort_unstable();
    months.dedup();

    let mut years: Vec<i32> = values.keys().map(|ym| ym.year).collect();
    years.dedup();

    #[expect(clippy::cast_precision_loss)]
    let bar_width = GROUP_WIDTH / years.len().max(1) as f64;
    let offset = (1.0 - GROUP_WIDTH) / 2.0;

    let mut bars = Vec::with_capacity(values.len());
    for (key, &value) in values {
        let group = months.iter().position(|&m| m == key.month).unwrap_or(0);
        let slot = years.iter().position(|&y| y == key.year).unwrap_or(0);
        #[expect(clippy::cast_precision_loss)]
        let x0 = group as f64 + offset + slot as f64 * bar_width;
        bars.push(MonthlyBar {
            year: key.year,
            month: key.month,
            x0,
            x1: x0 + bar_width,
            value,
        });
    }

    GroupedBars {
        months,
        years,
        bars,
    }
}

/// Samples of `day` as a time-ordered power/efficiency profile
#[must_use]
pub fn day_profile(samples: &[Sample], day: NaiveDate) -> Vec<ProfilePoint> {
    let mut points: Vec<ProfilePoint> = samples
        .iter()
        .filter(|s| s.date == Some(day))
        .filter_map(|s| {
            s.timestamp.map(|ts| ProfilePoint {
                time: ts.and_utc(),
                power_kw: s.metrics.power_ac_kw,
                efficiency_pct: s.metrics.efficiency_pct,
            })
        })
        .collect();
    points.sort_by_key(|p| p.time);
    points
}

/// Axis range covering `values` with 10% headroom, anchored at zero
#[must_use]
pub fn value_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let lo = if lo < 0.0 { lo * 1.1 } else { 0.0 };
    let hi = if hi > 0.0 { hi * 1.1 } else { 0.0 };
    if hi - lo > f64::EPSILON {
        lo..hi
    } else {
        lo..lo + 1.0
    }
}

/// Time axis range of a profile, widened when it covers a single instant
#[must_use]
pub fn time_range(points: &[ProfilePoint]) -> Option<Range<DateTime<Utc>>> {
    let first = points.first()?.time;
    let last = points.last()?.time;
    if last > first {
        Some(first..last)
    } else {
        Some(first - Duration::minutes(30)..last + Duration::minutes(30))
    }
}

/// Month of the group centred on `x`; other positions stay unlabelled
fn month_label(months: &[u32], x: f64) -> String {
    let idx = (x - 0.5).round();
    if idx < 0.0 || (x - 0.5 - idx).abs() > 1e-6 {
        return String::new();
    }
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = idx as usize;
    months.get(idx).map(ToString::to_string).unwrap_or_default()
}

/// Create the output directory; succeeds when it already exists
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Render the power/efficiency profile of one day
pub fn render_day_chart(
    path: &Path,
    size: ChartConfig,
    title: &str,
    points: &[ProfilePoint],
) -> Result<()> {
    draw_day_chart(path, size, title, points).map_err(|e| YieldError::Chart {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Render a month-grouped bar chart of `values`
pub fn render_monthly_chart(
    path: &Path,
    size: ChartConfig,
    chart: &MonthlyChart,
    values: &BTreeMap<YearMonth, f64>,
) -> Result<()> {
    draw_monthly_chart(path, size, chart, values).map_err(|e| YieldError::Chart {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn draw_day_chart(
    path: &Path,
    size: ChartConfig,
    title: &str,
    points: &[ProfilePoint],
) -> ChartResult {
    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let Some(x_range) = time_range(points) else {
        root.present()?;
        return Ok(());
    };
    let power_range = value_range(points.iter().map(|p| p.power_kw));
    let efficiency_range = value_range(points.iter().map(|p| p.efficiency_pct));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .right_y_label_area_size(65)
        .build_cartesian_2d(x_range.clone(), power_range)?
        .set_secondary_coord(x_range, efficiency_range);

    chart
        .configure_mesh()
        .x_desc("Horário")
        .y_desc("Potência (kW)")
        .x_labels(12)
        .y_labels(10)
        .x_label_formatter(&|dt| dt.format("%H:%M").to_string())
        .y_label_style(("sans-serif", 12, &BLUE))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Eficiência (%)")
        .label_style(("sans-serif", 12, &RED))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.time, p.power_kw)),
            &BLUE,
        ))?
        .label("Potência CA (kW)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_secondary_series(LineSeries::new(
            points.iter().map(|p| (p.time, p.efficiency_pct)),
            &RED,
        ))?
        .label("Eficiência (%)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_monthly_chart(
    path: &Path,
    size: ChartConfig,
    meta: &MonthlyChart,
    values: &BTreeMap<YearMonth, f64>,
) -> ChartResult {
    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    plot_monthly(&root, meta, values)?;
    root.present()?;
    Ok(())
}

fn plot_monthly<DB>(
    root: &DrawingArea<DB, Shift>,
    meta: &MonthlyChart,
    values: &BTreeMap<YearMonth, f64>,
) -> ChartResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let layout = grouped_bars(values);
    let group_count = layout.months.len().max(1);
    #[expect(clippy::cast_precision_loss)]
    let x_end = group_count as f64;
    let y_range = value_range(layout.bars.iter().map(|b| b.value));

    let mut chart = ChartBuilder::on(root)
        .caption(meta.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(0.0..x_end, y_range)?;

    // Half-unit steps put a key point on every group centre
    let months = layout.months.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Mês")
        .y_desc(meta.y_desc)
        .x_labels(group_count * 2 + 1)
        .x_label_formatter(&|x| month_label(&months, *x))
        .draw()?;

    for (slot, year) in layout.years.iter().enumerate() {
        let color = Palette99::pick(slot).to_rgba();
        chart
            .draw_series(layout.bars.iter().filter(|b| b.year == *year).map(|b| {
                Rectangle::new([(b.x0, 0.0), (b.x1, b.value)], color.filled())
            }))?
            .label(format!("Ano {year}"))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DerivedMetrics, ElectricalReading};

    fn sample_at(day: u32, hour: u32, minute: u32, power_kw: f64) -> Sample {
        let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        Sample {
            timestamp: date.and_hms_opt(hour, minute, 0),
            date: Some(date),
            year_month: Some(YearMonth::new(2024, 6)),
            reading: ElectricalReading {
                ac_voltage_v: 220.0,
                ac_current_a: 5.0,
                power_factor: 1.0,
                dc_voltage_v: 300.0,
                dc_current_a: 4.0,
                period_h: 0.25,
            },
            metrics: DerivedMetrics {
                energy_ac_kwh: power_kw * 0.25,
                energy_dc_kwh: 0.3,
                power_ac_kw: power_kw,
                efficiency_pct: 95.0,
            },
        }
    }

    #[test]
    fn test_day_profile_filters_and_sorts() {
        let samples = vec![
            sample_at(1, 12, 0, 2.0),
            sample_at(2, 9, 0, 7.0),
            sample_at(1, 8, 30, 0.5),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let profile = day_profile(&samples, day);

        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].power_kw, 0.5);
        assert_eq!(profile[1].power_kw, 2.0);
    }

    #[test]
    fn test_value_range() {
        let r = value_range([1.0, 5.0, 3.0]);
        assert_eq!(r.start, 0.0);
        assert!((r.end - 5.5).abs() < 1e-12);

        let r = value_range([-2.0, 4.0]);
        assert!((r.start + 2.2).abs() < 1e-12);

        let r = value_range(std::iter::empty());
        assert_eq!(r, 0.0..1.0);

        let r = value_range([0.0, 0.0, f64::NAN]);
        assert_eq!(r, 0.0..1.0);
    }

    #[test]
    fn test_time_range_single_point_is_widened() {
        let samples = vec![sample_at(1, 12, 0, 2.0)];
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let profile = day_profile(&samples, day);
        let range = time_range(&profile).unwrap();
        assert_eq!(range.end - range.start, Duration::minutes(60));

        assert!(time_range(&[]).is_none());
    }

    #[test]
    fn test_grouped_bars_layout() {
        let values: BTreeMap<YearMonth, f64> = [
            (YearMonth::new(2023, 11), 300.0),
            (YearMonth::new(2023, 12), 250.0),
            (YearMonth::new(2024, 1), 280.0),
            (YearMonth::new(2024, 11), 310.0),
        ]
        .into_iter()
        .collect();

        let layout = grouped_bars(&values);
        assert_eq!(layout.months, vec![1, 11, 12]);
        assert_eq!(layout.years, vec![2023, 2024]);
        assert_eq!(layout.bars.len(), 4);

        let nov_2023 = layout
            .bars
            .iter()
            .find(|b| b.year == 2023 && b.month == 11)
            .unwrap();
        let nov_2024 = layout
            .bars
            .iter()
            .find(|b| b.year == 2024 && b.month == 11)
            .unwrap();
        // Same group, adjacent slots, inside [1, 2)
        assert!((nov_2023.x0 - 1.1).abs() < 1e-12);
        assert!((nov_2023.x1 - nov_2024.x0).abs() < 1e-12);
        assert!(nov_2024.x1 <= 2.0);
    }

    #[test]
    fn test_month_label() {
        let months = vec![1, 11, 12];
        assert_eq!(month_label(&months, 0.5), "1");
        assert_eq!(month_label(&months, 2.5), "12");
        assert_eq!(month_label(&months, 3.5), "");
        assert_eq!(month_label(&months, -1.0), "");
        // Group boundaries carry no label
        assert_eq!(month_label(&months, 1.0), "");
        assert_eq!(month_label(&months, 2.0), "");
    }

    #[test]
    fn test_monthly_chart_to_svg() {
        let values: BTreeMap<YearMonth, f64> = [
            (YearMonth::new(2023, 11), 300.0),
            (YearMonth::new(2023, 12), 250.0),
            (YearMonth::new(2024, 1), 280.0),
            (YearMonth::new(2024, 11), 310.0),
        ]
        .into_iter()
        .collect();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (800, 480)).into_drawing_area();
            plot_monthly(&root, &MONTHLY_ENERGY_CHART, &values).unwrap();
            root.present().unwrap();
        }

        assert!(svg.contains("<rect"));
        assert!(svg.contains("Ano 2023"));
        assert!(svg.contains("Ano 2024"));
    }

    #[test]
    fn test_ensure_output_dir_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("graficos_gerados");
        ensure_output_dir(&dir).unwrap();
        ensure_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    #[ignore = "requires system fonts"]
    fn test_render_charts_to_png() {
        let tmp = tempfile::tempdir().unwrap();
        let samples = vec![sample_at(1, 8, 0, 0.5), sample_at(1, 12, 0, 2.0)];
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let day_path = tmp.path().join("producao_maxima.png");
        render_day_chart(
            &day_path,
            ChartConfig::default(),
            "Produção Máxima (01/06/2024)",
            &day_profile(&samples, day),
        )
        .unwrap();
        assert!(day_path.metadata().unwrap().len() > 0);

        let values: BTreeMap<YearMonth, f64> =
            [(YearMonth::new(2024, 6), 42.0)].into_iter().collect();
        let bar_path = tmp.path().join(MONTHLY_ENERGY_CHART.file_name);
        render_monthly_chart(&bar_path, ChartConfig::default(), &MONTHLY_ENERGY_CHART, &values)
            .unwrap();
        assert!(bar_path.metadata().unwrap().len() > 0);
    }
}
