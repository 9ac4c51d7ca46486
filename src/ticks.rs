//! Tick layout: how many ticks an axis gets, and whether their labels collide.
//!
//! Collision detection lays the labels out hypothetically, left to right, with
//! the leftover width spread evenly between them. If any label's right edge
//! passes the next label's left edge the ticks are "touching"; responsive
//! charts then rotate the labels and reserve vertical room for them.

use crate::models::{
    ChartConfig, Orientation, PlannedTick, ResolvedDomain, TextAnchor, TickPlan, Viewport, VisualizationType,
};
use crate::text::{TextMeasure, width_or_zero};
use serde::{Deserialize, Serialize};

/// Length of a tick mark in pixels.
pub const DEFAULT_TICK_LENGTH: f64 = 8.0;
/// Extra room below rotated labels.
pub const ROTATED_LABEL_MARGIN: f64 = 20.0;
const BASE_ACCUMULATOR: f64 = 100.0;
const MULTI_WORD_ACCUMULATOR: f64 = 180.0;
const DEFAULT_MAX_ROTATION: f64 = 90.0;
/// Rotations steeper than this center labels vertically on the tick.
const STEEP_ROTATION: f64 = -50.0;

/// A candidate tick produced by the scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    pub value: f64,
    pub formatted_label: String,
    pub pixel_position: f64,
}

/// Rotation settings for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickLayoutOptions {
    pub responsive: bool,
    /// Rotation used when responsive labels touch; unset or zero means 90°.
    pub max_tick_rotation: Option<f64>,
    /// Static rotation when no responsive rotation applies.
    pub tick_rotation: Option<f64>,
    /// Treat labels as touching regardless of spacing (years shown once).
    pub show_long_label_once: bool,
}

impl TickLayoutOptions {
    /// Options for the bottom axis of `config`. Responsive vertical charts
    /// drop the static rotation: labels lie flat until they touch.
    pub fn for_x_axis(config: &ChartConfig) -> Self {
        let responsive_vertical =
            config.is_responsive_ticks && config.orientation == Orientation::Vertical;
        Self {
            responsive: config.is_responsive_ticks,
            max_tick_rotation: config.x_axis.max_tick_rotation,
            tick_rotation: if responsive_vertical {
                None
            } else {
                config.x_axis.tick_rotation
            },
            show_long_label_once: config.x_axis.show_years_once,
        }
    }

    /// Options for the mirrored value axes of a paired bar chart: the touching
    /// rotation comes from the x axis, the static one from the y axis.
    pub fn for_paired_bar(config: &ChartConfig) -> Self {
        Self {
            responsive: config.is_responsive_ticks,
            max_tick_rotation: config.x_axis.max_tick_rotation,
            tick_rotation: config.y_axis.tick_rotation,
            show_long_label_once: false,
        }
    }

    fn touching_rotation(&self) -> f64 {
        self.max_tick_rotation
            .filter(|r| *r != 0.0)
            .unwrap_or(DEFAULT_MAX_ROTATION)
    }

    fn static_rotation(&self) -> f64 {
        self.tick_rotation.unwrap_or(0.0)
    }
}

fn font_for(font_size_px: f64) -> String {
    format!("normal {font_size_px}px sans-serif")
}

/// Hypothetical left edges: first label at 0, each next one after the previous
/// label plus `spacing`.
fn left_edges(widths: &[f64], spacing: f64) -> Vec<f64> {
    let mut positions = Vec::with_capacity(widths.len());
    let mut at = 0.0;
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            at += spacing;
        }
        positions.push(at);
        at += w;
    }
    positions
}

fn any_touching(widths: &[f64], positions: &[f64]) -> bool {
    widths
        .iter()
        .zip(positions.windows(2))
        .any(|(w, pair)| pair[0] + w > pair[1])
}

/// Negate a rotation, keeping zero unsigned.
fn negated(deg: f64) -> f64 {
    if deg == 0.0 { 0.0 } else { -deg }
}

/// Lay out bottom-axis tick labels inside `pixel_width`.
///
/// Labels the measurer cannot size count as zero wide. The returned
/// `margin_top` must be added to the chart height by the caller.
pub fn resolve_tick_layout(
    ticks: &[AxisTick],
    options: &TickLayoutOptions,
    font_size_px: f64,
    pixel_width: f64,
    measure: &dyn TextMeasure,
) -> TickPlan {
    if ticks.is_empty() {
        return TickPlan::default();
    }
    let font = font_for(font_size_px);
    let widths: Vec<f64> = ticks
        .iter()
        .map(|t| width_or_zero(measure, &t.formatted_label, &font))
        .collect();
    let tick_width_max = widths.iter().copied().fold(0.0, f64::max);

    let multi_word = ticks
        .iter()
        .any(|t| t.formatted_label.contains(char::is_whitespace));
    let accumulator = if multi_word {
        MULTI_WORD_ACCUMULATOR
    } else {
        BASE_ACCUMULATOR
    };
    let sum_of_tick_width: f64 = widths.iter().sum::<f64>() + accumulator;
    let gaps = ticks.len().saturating_sub(1);
    let spacing = if gaps == 0 {
        0.0
    } else {
        (pixel_width - sum_of_tick_width) / gaps as f64
    };

    let positions = left_edges(&widths, spacing);
    let touching = options.show_long_label_once || any_touching(&widths, &positions);

    let rotation = if options.responsive && touching {
        negated(options.touching_rotation())
    } else {
        negated(options.static_rotation())
    };
    let margin_top = if options.responsive && touching {
        tick_width_max + DEFAULT_TICK_LENGTH + ROTATED_LABEL_MARGIN
    } else {
        0.0
    };
    let wrap_width = (touching && !options.responsive && options.static_rotation() == 0.0)
        .then(|| 100.0 / ticks.len() as f64);

    log::debug!(
        "{} ticks in {pixel_width}px: spacing {spacing:.1}, touching {touching}, rotation {rotation}",
        ticks.len()
    );

    let planned = ticks
        .iter()
        .map(|t| PlannedTick {
            value: t.value,
            formatted_label: t.formatted_label.clone(),
            pixel_position: t.pixel_position,
            rotation_angle: rotation,
            text_anchor: if rotation != 0.0 {
                TextAnchor::End
            } else {
                TextAnchor::Middle
            },
            vertical_anchor: if rotation < STEEP_ROTATION {
                TextAnchor::Middle
            } else {
                TextAnchor::Start
            },
            wrap_width,
        })
        .collect();

    TickPlan {
        ticks: planned,
        ticks_overlapping: touching,
        margin_top,
        tick_width_max,
    }
}

/// Paired bar charts split the width in two mirrored halves. The first tick
/// (the shared zero) is left out of the collision check and never rotated, and
/// spacing is spread over the remaining tick count.
pub fn resolve_paired_bar_layout(
    ticks: &[AxisTick],
    options: &TickLayoutOptions,
    font_size_px: f64,
    half_width: f64,
    measure: &dyn TextMeasure,
) -> TickPlan {
    if ticks.is_empty() {
        return TickPlan::default();
    }
    let font = font_for(font_size_px);
    let rest = &ticks[1..];
    let widths: Vec<f64> = rest
        .iter()
        .map(|t| width_or_zero(measure, &t.formatted_label, &font))
        .collect();
    let overlapping = if rest.is_empty() {
        false
    } else {
        let sum: f64 = widths.iter().sum::<f64>() + BASE_ACCUMULATOR;
        let spacing = (half_width - sum) / rest.len() as f64;
        any_touching(&widths, &left_edges(&widths, spacing))
    };
    let angle = if options.responsive && overlapping {
        options.touching_rotation()
    } else {
        options.static_rotation()
    };

    let planned = ticks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let rotation_angle = if i == 0 { 0.0 } else { angle };
            PlannedTick {
                value: t.value,
                formatted_label: t.formatted_label.clone(),
                pixel_position: t.pixel_position,
                rotation_angle,
                text_anchor: if rotation_angle != 0.0 {
                    TextAnchor::End
                } else {
                    TextAnchor::Middle
                },
                vertical_anchor: if rotation_angle != 0.0 {
                    TextAnchor::Middle
                } else {
                    TextAnchor::Start
                },
                wrap_width: None,
            }
        })
        .collect();

    TickPlan {
        ticks: planned,
        ticks_overlapping: overlapping,
        margin_top: 0.0,
        tick_width_max: widths.iter().copied().fold(0.0, f64::max),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    X,
    Y,
}

/// What the tick-count policy reads besides the config.
#[derive(Debug, Clone, Copy)]
pub struct TickCountContext<'a> {
    pub config: &'a ChartConfig,
    pub viewport: Option<Viewport>,
    /// Number of data rows; horizontal charts get one y tick per row.
    pub data_len: usize,
    pub domain: ResolvedDomain,
}

/// Half-up rounding, as browsers round.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

fn auto_count(max: f64) -> i64 {
    if max <= 3.0 { 2 } else { 4 }
}

/// Tick count for an axis; `None` leaves the choice to the scale.
///
/// Counts that would exceed the (rounded) domain max are capped so small
/// integer domains do not repeat labels. A cap below zero yields zero.
pub fn count_num_of_ticks(axis: AxisKind, ctx: &TickCountContext<'_>) -> Option<u32> {
    let config = ctx.config;
    let horizontal = config.is_horizontal();
    let rounding = config.data_format.round_to.is_some();
    let (min, max) = (ctx.domain.min, ctx.domain.max);

    let count: Option<i64> = match axis {
        AxisKind::Y => {
            let configured = config.y_axis.tick_count_for(ctx.viewport).map(i64::from);
            let mut count = if horizontal {
                configured.or(Some(ctx.data_len as i64))
            } else {
                configured
            };
            if count.is_none() && !rounding {
                count = Some(auto_count(max));
            }
            match count {
                Some(c) if c as f64 > max => {
                    let capped = round_half_up(max) as i64;
                    Some(if min < 0.0 { capped * 2 } else { capped })
                }
                other => other,
            }
        }
        AxisKind::X => {
            if config.visualization_type == VisualizationType::ForestPlot {
                Some(config.y_axis.num_ticks.map(i64::from).unwrap_or(4))
            } else {
                let configured = config.x_axis.tick_count_for(ctx.viewport).map(i64::from);
                if horizontal && configured.is_none() && !rounding {
                    Some(auto_count(max))
                } else {
                    configured
                }
            }
        }
    };
    count.map(|c| c.clamp(0, u32::MAX as i64) as u32)
}

/// `count` evenly spaced values from `min` to `max` inclusive (at least two).
pub fn linear_tick_values(min: f64, max: f64, count: usize) -> Vec<f64> {
    let n = count.max(2);
    let span = max - min;
    (0..n)
        .map(|i| min + span * (i as f64 / (n - 1) as f64))
        .collect()
}

/// Manual-step mode: every `step`-th distinct axis value, in data order.
pub fn manual_tick_values<T: PartialEq + Clone>(values: &[T], step: usize) -> Vec<T> {
    let step = step.max(1);
    let mut distinct: Vec<T> = Vec::with_capacity(values.len());
    for v in values {
        if !distinct.contains(v) {
            distinct.push(v.clone());
        }
    }
    distinct
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % step == 0)
        .map(|(_, v)| v)
        .collect()
}

/// Position `values` on a linear `[min, max] -> [0, pixel_width]` mapping and
/// label them with `formatter`.
pub fn linear_axis_ticks<F>(
    values: &[f64],
    domain: &ResolvedDomain,
    pixel_width: f64,
    formatter: F,
) -> Vec<AxisTick>
where
    F: Fn(f64) -> String,
{
    let span = domain.max - domain.min;
    values
        .iter()
        .map(|&v| AxisTick {
            value: v,
            formatted_label: formatter(v),
            pixel_position: if span.abs() < 1e-12 {
                0.0
            } else {
                (v - domain.min) / span * pixel_width
            },
        })
        .collect()
}
