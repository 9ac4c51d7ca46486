//! Domain resolution: from raw extrema and chart settings to the `[min, max]`
//! an axis scale maps onto pixels.
//!
//! The adjustments run as an ordered pipeline of named steps (see [`PIPELINE`]).
//! Order matters: later steps deliberately override earlier ones, e.g. the
//! stacked area floor runs after every padding step.
//!
//! ```
//! use chartscale::domain::{resolve_domain, DomainInputs};
//! use chartscale::models::{ChartConfig, DataRow, VisualizationType};
//!
//! let config = ChartConfig {
//!     visualization_type: VisualizationType::ScatterPlot,
//!     ..Default::default()
//! };
//! let rows: Vec<DataRow> = Vec::new();
//! let inputs = DomainInputs::new(&config, Some(rows.as_slice()), 2.0, 10.0, true);
//! let domain = resolve_domain(&inputs)?;
//! assert!((domain.max - 11.0).abs() < 1e-9);
//! # Ok::<(), chartscale::AxisError>(())
//! ```

pub mod rules;
pub mod steps;

use crate::error::Result;
use crate::models::{ChartConfig, DataRow, ResolvedDomain};
use rules::{VariantRules, rules_for};

/// Everything the resolver reads. Borrowed for the duration of one call.
#[derive(Debug, Clone, Copy)]
pub struct DomainInputs<'a> {
    pub config: &'a ChartConfig,
    /// `None` short-circuits to an all-zero domain.
    pub data: Option<&'a [DataRow]>,
    /// Smallest in-scope series value (suppressed and excluded rows ignored).
    pub min_value: f64,
    pub max_value: f64,
    /// Whether any in-scope value is `>= 0`.
    pub exist_positive_value: bool,
    /// Every combo series is a (possibly dashed) line.
    pub is_all_line: bool,
    /// Filtered rows as shown in the data table; used for suppression checks.
    pub table_data: &'a [DataRow],
    /// Result of the external line-to-bar conversion heuristic.
    pub line_to_bar: bool,
}

impl<'a> DomainInputs<'a> {
    pub fn new(
        config: &'a ChartConfig,
        data: Option<&'a [DataRow]>,
        min_value: f64,
        max_value: f64,
        exist_positive_value: bool,
    ) -> Self {
        Self {
            config,
            data,
            min_value,
            max_value,
            exist_positive_value,
            is_all_line: false,
            table_data: data.unwrap_or(&[]),
            line_to_bar: false,
        }
    }

    pub fn with_all_line(mut self, is_all_line: bool) -> Self {
        self.is_all_line = is_all_line;
        self
    }

    pub fn with_table_data(mut self, table_data: &'a [DataRow]) -> Self {
        self.table_data = table_data;
        self
    }

    pub fn with_line_to_bar(mut self, line_to_bar: bool) -> Self {
        self.line_to_bar = line_to_bar;
        self
    }

    /// Rows, empty when absent.
    pub fn rows(&self) -> &'a [DataRow] {
        self.data.unwrap_or(&[])
    }
}

/// Upper bound that may still be waiting for a data-derived value.
///
/// While unset it compares like the smallest positive number, so only a
/// positive candidate can claim it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxBound {
    Unset,
    Value(f64),
}

impl MaxBound {
    /// Keep the larger of the current bound and `candidate`.
    pub fn raise_to(self, candidate: f64) -> Self {
        match self {
            MaxBound::Unset if candidate > 0.0 => MaxBound::Value(candidate),
            MaxBound::Unset => MaxBound::Unset,
            MaxBound::Value(v) if v > candidate => MaxBound::Value(v),
            MaxBound::Value(_) if candidate.is_nan() => self,
            MaxBound::Value(_) => MaxBound::Value(candidate),
        }
    }

    pub fn value_or(self, fallback: f64) -> f64 {
        match self {
            MaxBound::Value(v) => v,
            MaxBound::Unset => fallback,
        }
    }

    pub fn is_unset(self) -> bool {
        matches!(self, MaxBound::Unset)
    }
}

/// The `{min, max}` pair threaded through the pipeline, plus combo axis maxima.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainState {
    pub min: f64,
    pub max: MaxBound,
    pub left_max: f64,
    pub right_max: f64,
}

impl Default for DomainState {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: MaxBound::Unset,
            left_max: 0.0,
            right_max: 0.0,
        }
    }
}

impl DomainState {
    fn finish(self) -> ResolvedDomain {
        ResolvedDomain {
            min: self.min,
            max: self.max.value_or(0.0),
            left_max: self.left_max,
            right_max: self.right_max,
        }
    }
}

/// What a step sees: the call inputs plus the rules of the chart family.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub inputs: &'a DomainInputs<'a>,
    pub rules: &'static VariantRules,
}

impl<'a> StepContext<'a> {
    pub fn new(inputs: &'a DomainInputs<'a>) -> Result<Self> {
        Ok(Self {
            inputs,
            rules: rules_for(inputs.config.visualization_type)?,
        })
    }

    pub fn config(&self) -> &'a ChartConfig {
        self.inputs.config
    }
}

pub type Step = fn(&StepContext<'_>, DomainState) -> DomainState;

/// The adjustment steps in execution order.
pub const PIPELINE: [(&str, Step); 14] = [
    ("validate_overrides", steps::validate_overrides),
    ("extend_bar_confidence", steps::extend_bar_confidence),
    ("extend_forecast_bands", steps::extend_forecast_bands),
    ("combo_axis_maxima", steps::combo_axis_maxima),
    ("bar_zero_floor", steps::bar_zero_floor),
    ("combo_all_line_min", steps::combo_all_line_min),
    ("deviation_bar_min", steps::deviation_bar_min),
    ("line_min", steps::line_min),
    ("resolve_unset_max", steps::resolve_unset_max),
    ("percent_padding", steps::percent_padding),
    ("lollipop_headroom", steps::lollipop_headroom),
    ("enable_padding", steps::enable_padding),
    ("stacked_area_floor", steps::stacked_area_floor),
    ("scatter_headroom", steps::scatter_headroom),
];

/// Resolve the value-axis domain.
///
/// Never fails on odd data: invalid overrides are ignored and absent data gives
/// `[0, 0]`. An `Err` means a broken internal invariant.
pub fn resolve_domain(inputs: &DomainInputs<'_>) -> Result<ResolvedDomain> {
    if inputs.data.is_none() {
        return Ok(ResolvedDomain::default());
    }
    let ctx = StepContext::new(inputs)?;
    let mut state = DomainState::default();
    for (name, step) in PIPELINE {
        let next = step(&ctx, state);
        if next != state {
            log::debug!(
                "{name}: min {} -> {}, max {:?} -> {:?}",
                state.min,
                next.min,
                state.max,
                next.max
            );
        }
        state = next;
    }
    let domain = state.finish();
    if let Err(e) = domain.validate() {
        log::warn!("{:?} chart: {e}", inputs.config.visualization_type);
    }
    Ok(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_max_only_yields_to_positive_candidates() {
        assert_eq!(MaxBound::Unset.raise_to(-3.0), MaxBound::Unset);
        assert_eq!(MaxBound::Unset.raise_to(0.0), MaxBound::Unset);
        assert_eq!(MaxBound::Unset.raise_to(4.0), MaxBound::Value(4.0));
        assert_eq!(MaxBound::Value(5.0).raise_to(4.0), MaxBound::Value(5.0));
        assert_eq!(MaxBound::Value(5.0).raise_to(6.0), MaxBound::Value(6.0));
        assert_eq!(MaxBound::Value(5.0).raise_to(f64::NAN), MaxBound::Value(5.0));
    }

    #[test]
    fn absent_data_is_zero_domain() {
        let cfg = ChartConfig::default();
        let inputs = DomainInputs::new(&cfg, None, -4.0, 9.0, true);
        assert_eq!(resolve_domain(&inputs).unwrap(), ResolvedDomain::default());
    }

    #[test]
    fn pipeline_names_are_unique() {
        let mut names: Vec<&str> = PIPELINE.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PIPELINE.len());
    }
}
