//! Which domain adjustments apply to which chart family.

use crate::error::{AxisError, Result};
use crate::models::VisualizationType;

/// How the zero floor of step 5 applies to a chart family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroFloor {
    #[default]
    Never,
    Always,
    /// Combo charts: only when at least one series is not a line.
    UnlessAllLine,
}

/// Per-family switches read by the pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariantRules {
    pub ci_extension: bool,
    pub zero_floor: ZeroFloor,
    pub combo_axes: bool,
    pub all_line_min: bool,
    pub deviation_min: bool,
    pub line_min: bool,
    /// Applies only with the `stacked` subtype.
    pub stacked_floor: bool,
    pub scatter_headroom: bool,
}

const NONE: VariantRules = VariantRules {
    ci_extension: false,
    zero_floor: ZeroFloor::Never,
    combo_axes: false,
    all_line_min: false,
    deviation_min: false,
    line_min: false,
    stacked_floor: false,
    scatter_headroom: false,
};

static RULES: [(VisualizationType, VariantRules); 12] = [
    (
        VisualizationType::Line,
        VariantRules {
            line_min: true,
            ..NONE
        },
    ),
    (
        VisualizationType::Bar,
        VariantRules {
            ci_extension: true,
            zero_floor: ZeroFloor::Always,
            ..NONE
        },
    ),
    (
        VisualizationType::Combo,
        VariantRules {
            zero_floor: ZeroFloor::UnlessAllLine,
            combo_axes: true,
            all_line_min: true,
            ..NONE
        },
    ),
    (
        VisualizationType::AreaChart,
        VariantRules {
            stacked_floor: true,
            ..NONE
        },
    ),
    (VisualizationType::BoxPlot, NONE),
    (
        VisualizationType::ScatterPlot,
        VariantRules {
            scatter_headroom: true,
            ..NONE
        },
    ),
    (
        VisualizationType::DeviationBar,
        VariantRules {
            deviation_min: true,
            ..NONE
        },
    ),
    (VisualizationType::Forecasting, NONE),
    (VisualizationType::PairedBar, NONE),
    (VisualizationType::ForestPlot, NONE),
    (VisualizationType::BumpChart, NONE),
    (VisualizationType::SparkLine, NONE),
];

/// Look up the rules for a chart family. A miss is a bug in the table, not an
/// input problem.
pub fn rules_for(viz: VisualizationType) -> Result<&'static VariantRules> {
    RULES
        .iter()
        .find(|(v, _)| *v == viz)
        .map(|(_, r)| r)
        .ok_or_else(|| AxisError::Internal(format!("no domain rules registered for {viz:?}")))
}
