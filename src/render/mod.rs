// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard rendering.
//!
//! Pure functions of the stored activities and the current instant:
//! calendar math, cumulative year curves, goal metrics, the SVG chart and the
//! HTML pages around it.

pub mod calendar;
pub mod chart;
pub mod metrics;
pub mod page;
pub mod series;

pub use metrics::YearMetrics;
pub use page::{render_connect_page, render_dashboard, render_sync_result};
pub use series::{build_year_series, SeriesPoint, YearSeries};
