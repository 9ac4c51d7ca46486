//! The individual domain adjustments. Each takes and returns the running
//! [`DomainState`]; a step that does not apply returns it unchanged.

use super::{DomainState, MaxBound, StepContext};
use crate::domain::rules::ZeroFloor;
use crate::extrema::column_values;
use crate::format::js_number_text;
use crate::models::{AxisSide, AxisType, DataRow, SeriesDescriptor, SeriesRole};

const NEGATIVE_BAR_HEADROOM: f64 = 1.1;
const CI_NEGATIVE_BUFFER: f64 = 1.1;
const SCATTER_HEADROOM: f64 = 1.1;

/// Entered min accepted by the initial gate.
fn entered_min_valid(ctx: &StepContext<'_>, entered: f64) -> bool {
    let min_value = ctx.inputs.min_value;
    if ctx.config().y_axis.is_logarithmic() {
        entered >= 0.0
    } else {
        (entered <= 0.0 && min_value >= 0.0) || (entered <= min_value && min_value < 0.0)
    }
}

/// Entered min accepted by the later line-chart checks: strictly below the data.
fn entered_min_below_data(ctx: &StepContext<'_>, entered: f64) -> bool {
    let min_value = ctx.inputs.min_value;
    if ctx.config().y_axis.is_logarithmic() {
        entered >= 0.0 && entered < min_value
    } else {
        entered < min_value
    }
}

/// Step 1: accept entered overrides that do not cut off data.
pub fn validate_overrides(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    let inputs = ctx.inputs;
    let axis = &ctx.config().y_axis;

    state.min = match axis.min {
        Some(entered) if entered_min_valid(ctx, entered) => entered,
        _ => inputs.min_value,
    };
    state.max = match axis.max {
        Some(entered) => {
            let valid = if inputs.exist_positive_value {
                entered >= inputs.max_value
            } else {
                entered >= 0.0
            };
            if valid {
                MaxBound::Value(entered)
            } else {
                MaxBound::Unset
            }
        }
        None => MaxBound::Unset,
    };
    state
}

/// Step 2: make room for bar error bars.
pub fn extend_bar_confidence(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    if !ctx.rules.ci_extension {
        return state;
    }
    let Some(keys) = ctx.config().confidence_keys.as_ref() else {
        return state;
    };
    let (Some(lower), Some(upper)) = (keys.lower.as_deref(), keys.upper.as_deref()) else {
        return state;
    };
    let values: Vec<f64> = column_values(ctx.inputs.rows(), upper)
        .chain(column_values(ctx.inputs.rows(), lower))
        .collect();
    if values.is_empty() {
        return state;
    }

    let axis = &ctx.config().y_axis;
    let padding = if axis.enable_padding {
        1.0 + axis.scale_padding() / 100.0
    } else {
        1.0
    };
    let buffer = if state.min < 0.0 { CI_NEGATIVE_BUFFER } else { 0.0 };
    let ci_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) * padding;
    let ci_min = values.iter().copied().fold(f64::INFINITY, f64::min) * padding * buffer;

    state.max = state.max.raise_to(ci_max);
    if !(state.min < ci_min) {
        state.min = ci_min;
    }
    state
}

/// Step 3: include every forecasting interval column.
pub fn extend_forecast_bands(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    let columns = ctx.config().forecasting_columns();
    if columns.is_empty() {
        return state;
    }
    let rows = ctx.inputs.rows();
    let high = columns
        .iter()
        .flat_map(|c| column_values(rows, &c.high))
        .fold(f64::NEG_INFINITY, f64::max);
    let low = columns
        .iter()
        .flat_map(|c| column_values(rows, &c.low))
        .fold(f64::INFINITY, f64::min);

    if high.is_finite() {
        state.max = state.max.raise_to(high);
    }
    if low.is_finite() && low < state.min {
        state.min = low;
    }
    state
}

/// Largest value over one axis' series. Stacked bars on the left axis also
/// accumulate a running sum of their per-series maxima.
fn axis_series_max(
    ctx: &StepContext<'_>,
    rows: &[DataRow],
    series: &[&SeriesDescriptor],
    side: AxisSide,
) -> f64 {
    let stack_bars = ctx.config().is_stacked() && side == AxisSide::Left;
    let mut max = 0.0_f64;
    let mut stacked_bar_max = 0.0_f64;
    for s in series {
        let series_max = column_values(rows, &s.data_key).fold(f64::NEG_INFINITY, f64::max);
        if !series_max.is_finite() {
            log::debug!("combo series {:?} has no numeric values", s.data_key);
            continue;
        }
        if stack_bars && s.role == SeriesRole::Bar {
            stacked_bar_max += series_max;
        }
        if series_max > max {
            max = series_max;
        }
        if max < stacked_bar_max {
            max = stacked_bar_max;
        }
    }
    max
}

/// Step 4: per-axis maxima for dual-axis combo charts.
pub fn combo_axis_maxima(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    if !ctx.rules.combo_axes {
        return state;
    }
    let rows = ctx.inputs.rows();
    let (left, right): (Vec<&SeriesDescriptor>, Vec<&SeriesDescriptor>) = ctx
        .config()
        .series
        .iter()
        .partition(|s| s.axis == AxisSide::Left);

    state.left_max = axis_series_max(ctx, rows, &left, AxisSide::Left);
    state.right_max = axis_series_max(ctx, rows, &right, AxisSide::Right);
    if let Some(entered) = ctx.config().y_axis.max
        && state.left_max < entered
    {
        state.left_max = entered;
    }
    state
}

/// Step 5: bars grow from zero; negative bars get extra room below.
pub fn bar_zero_floor(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    let applies = ctx.inputs.line_to_bar
        || match ctx.rules.zero_floor {
            ZeroFloor::Always => true,
            ZeroFloor::UnlessAllLine => !ctx.inputs.is_all_line,
            ZeroFloor::Never => false,
        };
    if !applies {
        return state;
    }
    if state.min > 0.0 {
        state.min = 0.0;
    } else if state.min < 0.0 {
        state.min *= NEGATIVE_BAR_HEADROOM;
    }
    state
}

/// Step 6: combo charts made only of lines.
pub fn combo_all_line_min(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    if !ctx.rules.all_line_min || !ctx.inputs.is_all_line {
        return state;
    }
    match ctx.config().y_axis.min {
        None if state.min > 0.0 => state.min = 0.0,
        None => {}
        // A typed "0" is present but never wins here.
        Some(entered) => {
            state.min = if entered != 0.0 && entered_min_below_data(ctx, entered) {
                entered
            } else {
                ctx.inputs.min_value
            };
        }
    }
    state
}

/// Step 7: deviation bars keep an entered min only below both data and target.
pub fn deviation_bar_min(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    if !ctx.rules.deviation_min || !(state.min > 0.0) {
        return state;
    }
    let target = ctx.config().x_axis.target;
    state.min = match (ctx.config().y_axis.min, target) {
        (Some(entered), Some(target))
            if entered != 0.0 && entered < ctx.inputs.min_value.min(target) =>
        {
            entered
        }
        _ => 0.0,
    };
    state
}

/// True when the first or last table row carries a styled suppression marker in
/// a series column (or in the rule's own column when it names one).
pub fn has_boundary_suppression(ctx: &StepContext<'_>) -> bool {
    let config = ctx.config();
    let rules: Vec<_> = config
        .preliminary_data
        .iter()
        .filter(|r| r.is_suppression())
        .collect();
    if rules.is_empty() {
        return false;
    }
    let table = ctx.inputs.table_data;
    let boundary = [table.first(), table.last()];
    boundary.into_iter().flatten().any(|row| {
        rules.iter().any(|rule| match rule.column.as_deref() {
            Some(column) if !column.is_empty() => {
                row.get(column).is_some_and(|c| c.is_marker(&rule.value))
            }
            _ => config
                .series_keys()
                .filter_map(|k| row.get(k))
                .any(|c| c.is_marker(&rule.value)),
        })
    })
}

/// Step 8: line charts may start above zero.
pub fn line_min(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    if !ctx.rules.line_min || ctx.inputs.line_to_bar {
        return state;
    }
    let entered = ctx
        .config()
        .y_axis
        .min
        .filter(|e| entered_min_below_data(ctx, *e));
    state.min = if let Some(entered) = entered {
        entered
    } else if has_boundary_suppression(ctx) {
        0.0
    } else if ctx.config().y_axis.axis_type == AxisType::Categorical {
        0.0
    } else {
        ctx.inputs.min_value
    };
    state
}

/// Step 9: fall back to the data max, or zero when every value is negative.
pub fn resolve_unset_max(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    if state.max.is_unset() {
        let max = if ctx.inputs.exist_positive_value {
            ctx.inputs.max_value
        } else {
            0.0
        };
        state.max = MaxBound::Value(max);
    }
    state
}

/// Step 10: widen both ends by a fraction of the domain width.
pub fn percent_padding(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    let Some(percent) = ctx.config().y_axis.padding_percent.filter(|p| *p != 0.0) else {
        return state;
    };
    let max = state.max.value_or(0.0);
    let mut delta = (max - state.min) * percent;
    if !delta.is_finite() {
        delta = 0.0;
    }
    state.min -= delta;
    state.max = MaxBound::Value(max + delta);
    state
}

/// Step 11: lollipop value labels need room above long numbers.
pub fn lollipop_headroom(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    let config = ctx.config();
    if !config.is_lollipop_chart || !config.y_axis.display_numbers_on_bar {
        return state;
    }
    let Some(primary) = config.series.first() else {
        return state;
    };
    let largest =
        column_values(ctx.inputs.rows(), &primary.data_key).fold(f64::NEG_INFINITY, f64::max);
    if !largest.is_finite() {
        return state;
    }
    let factor = match js_number_text(largest).len() {
        9..=12 => 1.3,
        5..=7 => 1.1,
        _ => 1.0,
    };
    state.max = MaxBound::Value(state.max.value_or(0.0) * factor);
    state
}

/// Step 12: the general padding toggle. Negative domains pad both ends twice as much.
pub fn enable_padding(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    let axis = &ctx.config().y_axis;
    if !axis.enable_padding {
        return state;
    }
    let pad = axis.scale_padding();
    let max = state.max.value_or(0.0);
    if state.min < 0.0 {
        let factor = 1.0 + (pad * 2.0) / 100.0;
        state.max = MaxBound::Value(max * factor);
        state.min *= factor;
    } else {
        state.max = MaxBound::Value(max * (1.0 + pad / 100.0));
    }
    state
}

/// Step 13: stacked areas always start at zero.
pub fn stacked_area_floor(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    if ctx.rules.stacked_floor && ctx.config().is_stacked() {
        state.min = 0.0;
    }
    state
}

/// Step 14.
pub fn scatter_headroom(ctx: &StepContext<'_>, mut state: DomainState) -> DomainState {
    if ctx.rules.scatter_headroom {
        state.max = MaxBound::Value(state.max.value_or(0.0) * SCATTER_HEADROOM);
    }
    state
}
