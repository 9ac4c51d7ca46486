//! chartscale
//!
//! Axis scaling for data charts: decides the numeric domain an axis covers and
//! how its tick labels are laid out. Pairs with the `chartscale` CLI.
//!
//! ### Features
//! - Domain resolution per chart family (bar, line, combo, area, scatter, ...)
//!   honoring user bounds, confidence intervals, padding and suppressed data
//! - Tick counts per viewport and label collision detection with rotation
//! - Box plot statistics, number and date label formatting
//! - Brush filtering of rows by a pixel range over a date axis
//! - Load chart configs (JSON) and data rows (CSV or JSON)
//!
//! ### Example
//! ```no_run
//! use chartscale::{DomainInputs, HeuristicMeasure, TickLayoutOptions};
//! use chartscale::{extrema, input, ticks};
//!
//! let config = input::load_config("chart.json")?;
//! let rows = input::load_rows("data.csv")?;
//! let e = extrema::series_extrema(&config, &rows).unwrap_or_default();
//! let inputs = DomainInputs::new(&config, Some(rows.as_slice()), e.min_value, e.max_value, e.exist_positive_value);
//! let domain = chartscale::resolve_domain(&inputs)?.or_fallback();
//!
//! let values = ticks::linear_tick_values(domain.min, domain.max, 5);
//! let axis = ticks::linear_axis_ticks(&values, &domain, 800.0, |v| format!("{v}"));
//! let plan = chartscale::resolve_tick_layout(
//!     &axis,
//!     &TickLayoutOptions::for_x_axis(&config),
//!     config.font_size.px(),
//!     800.0,
//!     &HeuristicMeasure,
//! );
//! println!("{:#?}", plan);
//! # Ok::<(), chartscale::AxisError>(())
//! ```

pub mod boxplot;
pub mod brush;
pub mod dates;
pub mod domain;
pub mod error;
pub mod extrema;
pub mod format;
pub mod input;
pub mod models;
pub mod text;
pub mod ticks;

pub use domain::{DomainInputs, resolve_domain};
pub use error::{AxisError, Result};
pub use models::{ChartConfig, DataRow, ResolvedDomain, TickPlan};
pub use text::{HeuristicMeasure, TextMeasure};
pub use ticks::{AxisTick, TickLayoutOptions, resolve_tick_layout};
