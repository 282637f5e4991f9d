// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SVG line chart: cumulative kilometers per year against the goal line.
//!
//! Drawn with plotters at twice the logical resolution (stroke widths are
//! whole device pixels) and scaled back down to a 1000x500 view box.

use crate::error::{AppError, Result};
use crate::render::series::YearSeries;
use plotters::coord::combinators::BindKeyPoints;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 500;
const PAD_TOP: u32 = 30;
const PAD_RIGHT: u32 = 30;
const PAD_BOTTOM: u32 = 40;
const PAD_LEFT: u32 = 60;

/// Device pixels per view box unit.
const SCALE: u32 = 2;

/// Horizontal axis length in days, leap year or not.
const X_DAYS: u32 = 365;
const Y_TICKS: u32 = 5;
const FONT_SIZE: u32 = 11;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
/// Day offsets of month starts in a common year, plus year end.
const MONTH_STARTS: [u32; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

const GOAL_COLOR: &str = "#999999";
const GRID_COLOR: &str = "#e0e0e0";
const AXIS_COLOR: &str = "#cccccc";
const LABEL_COLOR: &str = "#666666";
const LEGEND_TEXT_COLOR: &str = "#333333";
/// Goal line dash and gap lengths, in view box units.
const GOAL_DASH: (u32, u32) = (6, 4);

/// Stroke styling for one year line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
}

impl SeriesStyle {
    fn shape(&self) -> ShapeStyle {
        ShapeStyle::from(&hex_color(self.color).mix(self.opacity)).stroke_width(px_width(self.width))
    }
}

const CURRENT_YEAR_STYLE: SeriesStyle = SeriesStyle {
    color: "#FC4C02",
    width: 2.5,
    opacity: 1.0,
};
const PREVIOUS_YEAR_STYLE: SeriesStyle = SeriesStyle {
    color: "#1a73e8",
    width: 1.5,
    opacity: 0.7,
};
const EARLIER_YEAR_STYLE: SeriesStyle = SeriesStyle {
    color: "#34a853",
    width: 1.5,
    opacity: 0.7,
};
const FALLBACK_STYLE: SeriesStyle = SeriesStyle {
    color: "#888888",
    width: 1.0,
    opacity: 0.5,
};

/// Style for `year` when `current_year` is the emphasized one.
pub fn series_style(year: i32, current_year: i32) -> SeriesStyle {
    match current_year - year {
        0 => CURRENT_YEAR_STYLE,
        1 => PREVIOUS_YEAR_STYLE,
        2 => EARLIER_YEAR_STYLE,
        _ => FALLBACK_STYLE,
    }
}

/// Vertical extent of the plot.
#[derive(Debug, Clone, Copy)]
pub struct Scale {
    pub y_max: f64,
}

impl Scale {
    /// Vertical axis tops out at the next multiple of 100 km above the goal
    /// and every plotted value.
    pub fn fit(series: &[YearSeries], goal_km: f64) -> Self {
        let max_km = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.cum_km))
            .fold(goal_km, f64::max);
        let y_max = ((max_km / 100.0).ceil() * 100.0).max(100.0);
        Self { y_max }
    }

    /// Gridline values from 0 to `y_max`.
    pub fn ticks(&self) -> Vec<f64> {
        (0..=Y_TICKS)
            .map(|i| self.y_max / f64::from(Y_TICKS) * f64::from(i))
            .collect()
    }
}

/// Horizontal position of `day`; day 366 of a leap year is pinned to the
/// last gridline.
pub fn day_position(day: u32) -> f64 {
    f64::from(day.min(X_DAYS))
}

/// Plot points for a series, `None` if it has fewer than two points.
pub fn series_points(series: &YearSeries) -> Option<Vec<(f64, f64)>> {
    if !series.is_drawable() {
        return None;
    }
    Some(
        series
            .points
            .iter()
            .map(|p| (day_position(p.day), p.cum_km))
            .collect(),
    )
}

/// Parse "#rrggbb" into a color.
fn hex_color(hex: &str) -> RGBColor {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    RGBColor(channel(0), channel(2), channel(4))
}

/// Stroke width in device pixels.
fn px_width(width: f64) -> u32 {
    (width * f64::from(SCALE)).round() as u32
}

fn px(units: u32) -> u32 {
    units * SCALE
}

fn month_midpoints() -> Vec<f64> {
    MONTH_STARTS
        .windows(2)
        .map(|w| f64::from(w[0] + w[1]) / 2.0)
        .collect()
}

fn month_label(day: f64) -> String {
    MONTH_STARTS
        .windows(2)
        .position(|w| day >= f64::from(w[0]) && day < f64::from(w[1]))
        .map(|i| MONTHS[i].to_string())
        .unwrap_or_default()
}

fn drawing_error<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Internal(anyhow::anyhow!("Chart rendering failed: {}", err))
}

/// Render the comparison chart. `series` may hold any number of years;
/// the three most recent get distinct colors.
pub fn render_chart(current_year: i32, series: &[YearSeries], goal_km: f64) -> Result<String> {
    let scale = Scale::fit(series, goal_km);

    let mut svg_buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut svg_buffer, (px(WIDTH), px(HEIGHT)))
            .into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let x_range = (0.0..f64::from(X_DAYS)).with_key_points(month_midpoints());
        let y_range = (0.0..scale.y_max).with_key_points(scale.ticks());

        let mut chart = ChartBuilder::on(&root)
            .margin_top(px(PAD_TOP))
            .margin_right(px(PAD_RIGHT))
            .x_label_area_size(px(PAD_BOTTOM))
            .y_label_area_size(px(PAD_LEFT))
            .build_cartesian_2d(x_range, y_range)
            .map_err(drawing_error)?;

        let label_color = hex_color(LABEL_COLOR);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(hex_color(GRID_COLOR))
            .axis_style(hex_color(AXIS_COLOR))
            .label_style(("sans-serif", f64::from(px(FONT_SIZE)), &label_color))
            .x_label_formatter(&|x| month_label(*x))
            .y_label_formatter(&|y| format!("{}", y.round()))
            .draw()
            .map_err(drawing_error)?;

        // Constant pace toward the goal
        chart
            .draw_series(DashedLineSeries::new(
                vec![(0.0, 0.0), (f64::from(X_DAYS), goal_km)],
                px(GOAL_DASH.0),
                px(GOAL_DASH.1),
                ShapeStyle::from(&hex_color(GOAL_COLOR)).stroke_width(px_width(1.5)),
            ))
            .map_err(drawing_error)?;

        // Oldest first so the current year ends up on top
        for s in series.iter().rev() {
            let Some(points) = series_points(s) else {
                continue;
            };
            let style = series_style(s.year, current_year);
            chart
                .draw_series(LineSeries::new(points, style.shape()))
                .map_err(drawing_error)?;
        }

        draw_legend(&root, current_year, series, goal_km)?;

        root.present().map_err(drawing_error)?;
    }

    Ok(scale_to_view_box(&svg_buffer))
}

/// Legend: current year, prior years newest first, then the goal.
fn draw_legend(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    current_year: i32,
    series: &[YearSeries],
    goal_km: f64,
) -> Result<()> {
    let mut prior: Vec<i32> = series
        .iter()
        .map(|s| s.year)
        .filter(|&y| y != current_year)
        .collect();
    prior.sort_unstable_by(|a, b| b.cmp(a));
    prior.dedup();

    let mut items: Vec<(String, &str, bool)> =
        vec![(current_year.to_string(), CURRENT_YEAR_STYLE.color, false)];
    items.extend(
        prior
            .into_iter()
            .map(|y| (y.to_string(), series_style(y, current_year).color, false)),
    );
    items.push((
        format!("Goal ({}km)", format_thousands(goal_km)),
        GOAL_COLOR,
        true,
    ));

    let text_color = hex_color(LEGEND_TEXT_COLOR);
    let text_style = ("sans-serif", f64::from(px(FONT_SIZE)))
        .into_font()
        .color(&text_color)
        .pos(Pos::new(HPos::Left, VPos::Center));

    let lx = px(WIDTH - PAD_RIGHT - 120) as i32;
    for (i, (label, color, dashed)) in items.iter().enumerate() {
        let ly = px(PAD_TOP + 10 + 18 * i as u32) as i32;
        let line_color = hex_color(color);

        let segments: Vec<(i32, i32)> = if *dashed {
            let (dash, gap) = (px(GOAL_DASH.0) as i32, px(GOAL_DASH.1) as i32);
            vec![(0, dash), (dash + gap, 2 * dash + gap)]
        } else {
            vec![(0, px(20) as i32)]
        };
        for (from, to) in segments {
            root.draw(&PathElement::new(
                vec![(lx + from, ly), (lx + to, ly)],
                ShapeStyle::from(&line_color).stroke_width(px(2)),
            ))
            .map_err(drawing_error)?;
        }

        root.draw(&Text::new(
            label.clone(),
            (lx + px(26) as i32, ly),
            text_style.clone(),
        ))
        .map_err(drawing_error)?;
    }

    Ok(())
}

/// Swap the device-pixel `<svg>` header for the logical view box.
fn scale_to_view_box(svg: &str) -> String {
    let body_start = svg
        .find("<svg")
        .and_then(|start| svg[start..].find('>').map(|end| start + end + 1))
        .unwrap_or(0);
    let body_end = svg.rfind("</svg>").unwrap_or(svg.len());

    format!(
        r#"<svg viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" style="width:100%;height:auto"><g transform="scale({s})">{body}</g></svg>"#,
        w = WIDTH,
        h = HEIGHT,
        s = 1.0 / f64::from(SCALE),
        body = svg[body_start..body_end].trim(),
    )
}

/// Whole kilometers with comma thousands separators, e.g. 1100 -> "1,100".
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
