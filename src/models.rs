use crate::error::{AxisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cell of tabular chart data.
///
/// Source data usually arrives as strings (CSV, spreadsheet exports), so numeric
/// access goes through [`CellValue::as_f64`], which also parses numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric view of the cell. Empty or non-numeric text (e.g. suppression
    /// markers like `"*"`) yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    t.parse::<f64>().ok().filter(|v| v.is_finite())
                }
            }
            _ => None,
        }
    }

    /// Strict marker comparison: only text cells equal to `marker` match.
    pub fn is_marker(&self, marker: &str) -> bool {
        matches!(self, CellValue::Text(s) if s == marker)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

/// One data row: column name to value. Rows keep their source order in the
/// surrounding `Vec`.
pub type DataRow = BTreeMap<String, CellValue>;

/// Serde helper: parse an optional `f64` from a JSON number, a numeric string,
/// an empty string or `null`. Unparseable text is treated as unset, matching
/// how the editor stores half-typed overrides.
fn de_opt_f64_lenient<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct LenientVisitor;

    impl<'de> Visitor<'de> for LenientVisitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number, a numeric string, an empty string or null")
        }

        fn visit_f64<E>(self, v: f64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v).filter(|v| v.is_finite()))
        }

        fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v as f64))
        }

        fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v as f64))
        }

        fn visit_str<E>(self, s: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            let t = s.trim();
            if t.is_empty() {
                return Ok(None);
            }
            Ok(t.parse::<f64>().ok().filter(|v| v.is_finite()))
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

fn de_opt_u32_lenient<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(de_opt_f64_lenient(deserializer)?
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u32))
}

/// Serde helper: a rule value typed as text or as a bare number. Numbers keep
/// their browser text form so they compare equal to the cells they mark.
fn de_string_lenient<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string, a number, a boolean or null")
        }

        fn visit_str<E>(self, s: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(s.to_string())
        }

        fn visit_f64<E>(self, v: f64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(crate::format::js_number_text(v))
        }

        fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_bool<E>(self, v: bool) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

/// A per-viewport tick count as typed in the editor; blank or junk is unset.
#[derive(Debug, Deserialize)]
struct LenientCount(#[serde(deserialize_with = "de_opt_u32_lenient")] Option<u32>);

fn de_viewport_ticks<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<Viewport, u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<BTreeMap<Viewport, LenientCount>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(vp, LenientCount(n))| n.map(|n| (vp, n)))
        .collect())
}

/// Chart families known to the resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VisualizationType {
    #[default]
    Line,
    Bar,
    Combo,
    #[serde(rename = "Area Chart")]
    AreaChart,
    #[serde(rename = "Box Plot")]
    BoxPlot,
    #[serde(rename = "Scatter Plot")]
    ScatterPlot,
    #[serde(rename = "Deviation Bar")]
    DeviationBar,
    Forecasting,
    #[serde(rename = "Paired Bar")]
    PairedBar,
    #[serde(rename = "Forest Plot")]
    ForestPlot,
    #[serde(rename = "Bump Chart")]
    BumpChart,
    #[serde(rename = "Spark Line")]
    SparkLine,
}

impl VisualizationType {
    pub const ALL: [VisualizationType; 12] = [
        VisualizationType::Line,
        VisualizationType::Bar,
        VisualizationType::Combo,
        VisualizationType::AreaChart,
        VisualizationType::BoxPlot,
        VisualizationType::ScatterPlot,
        VisualizationType::DeviationBar,
        VisualizationType::Forecasting,
        VisualizationType::PairedBar,
        VisualizationType::ForestPlot,
        VisualizationType::BumpChart,
        VisualizationType::SparkLine,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationSubType {
    #[default]
    Regular,
    Stacked,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Scale family of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[default]
    #[serde(alias = "linear", alias = "continuous")]
    Numeric,
    #[serde(alias = "date-time")]
    Date,
    Categorical,
    Logarithmic,
}

/// Responsive breakpoints, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Xxs,
    Xs,
    Sm,
    Md,
    Lg,
}

impl Viewport {
    /// Breakpoint for a container width in pixels.
    pub fn from_width(width_px: f64) -> Self {
        if width_px > 1200.0 {
            Viewport::Lg
        } else if width_px > 992.0 {
            Viewport::Md
        } else if width_px > 768.0 {
            Viewport::Sm
        } else if width_px > 576.0 {
            Viewport::Xs
        } else {
            Viewport::Xxs
        }
    }
}

/// Named chart font sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn px(self) -> f64 {
        match self {
            FontSize::Small => 16.0,
            FontSize::Medium => 18.0,
            FontSize::Large => 20.0,
        }
    }
}

/// Visual role of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeriesRole {
    #[default]
    Line,
    Bar,
    #[serde(rename = "dashed-sm")]
    DashedSmall,
    #[serde(rename = "dashed-md")]
    DashedMedium,
    #[serde(rename = "dashed-lg")]
    DashedLarge,
    Forecasting,
    #[serde(rename = "Area Chart")]
    Area,
    #[serde(other)]
    Other,
}

impl SeriesRole {
    /// Solid or dashed line.
    pub fn is_line(self) -> bool {
        matches!(
            self,
            SeriesRole::Line
                | SeriesRole::DashedSmall
                | SeriesRole::DashedMedium
                | SeriesRole::DashedLarge
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisSide {
    #[default]
    Left,
    Right,
}

/// A `{low, high}` column pair holding interval bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CiColumns {
    pub low: String,
    pub high: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesDescriptor {
    pub data_key: String,
    #[serde(rename = "type")]
    pub role: SeriesRole,
    pub axis: AxisSide,
    pub confidence_intervals: Vec<CiColumns>,
}

/// Column names of the bar chart error bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfidenceKeys {
    pub lower: Option<String>,
    pub upper: Option<String>,
}

/// A preliminary-data annotation; only styled `suppression` entries affect the axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PreliminaryRule {
    #[serde(rename = "type")]
    pub kind: String,
    pub column: Option<String>,
    #[serde(deserialize_with = "de_string_lenient")]
    pub value: String,
    pub style: Option<String>,
}

impl PreliminaryRule {
    pub fn is_suppression(&self) -> bool {
        self.kind == "suppression" && self.style.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Number display settings shared by tick labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DataFormat {
    #[serde(deserialize_with = "de_opt_u32_lenient")]
    pub round_to: Option<u32>,
    pub abbreviated: bool,
    pub comma_separator: bool,
    pub prefix: String,
    pub suffix: String,
    pub locale: Option<String>,
}

/// Per-axis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisConfig {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    pub data_key: String,
    /// Entered minimum; `None` when the field is empty.
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub min: Option<f64>,
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub max: Option<f64>,
    /// Fraction of the domain width added to both ends.
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub padding_percent: Option<f64>,
    pub enable_padding: bool,
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub scale_padding: Option<f64>,
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub tick_rotation: Option<f64>,
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub max_tick_rotation: Option<f64>,
    pub manual: bool,
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub manual_step: Option<f64>,
    #[serde(deserialize_with = "de_opt_u32_lenient")]
    pub num_ticks: Option<u32>,
    #[serde(deserialize_with = "de_viewport_ticks")]
    pub viewport_num_ticks: BTreeMap<Viewport, u32>,
    #[serde(deserialize_with = "de_opt_f64_lenient")]
    pub target: Option<f64>,
    pub display_numbers_on_bar: bool,
    pub show_years_once: bool,
    pub date_parse_format: Option<String>,
    pub date_display_format: Option<String>,
}

impl AxisConfig {
    pub fn is_logarithmic(&self) -> bool {
        self.axis_type == AxisType::Logarithmic
    }

    pub fn scale_padding(&self) -> f64 {
        self.scale_padding.unwrap_or(0.0)
    }

    /// Configured tick count, with a viewport override taking precedence.
    /// Zero counts as unset.
    pub fn tick_count_for(&self, viewport: Option<Viewport>) -> Option<u32> {
        viewport
            .and_then(|vp| self.viewport_num_ticks.get(&vp).copied())
            .filter(|n| *n > 0)
            .or(self.num_ticks.filter(|n| *n > 0))
    }
}

/// The chart configuration fields consumed by the resolvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub visualization_type: VisualizationType,
    pub visualization_sub_type: VisualizationSubType,
    pub orientation: Orientation,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub series: Vec<SeriesDescriptor>,
    pub confidence_keys: Option<ConfidenceKeys>,
    pub preliminary_data: Vec<PreliminaryRule>,
    pub is_lollipop_chart: bool,
    pub is_responsive_ticks: bool,
    pub font_size: FontSize,
    pub data_format: DataFormat,
}

impl ChartConfig {
    /// Decode a JSON configuration object.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(AxisError::from)
    }

    /// Forest plots lay out their value axis horizontally.
    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
            || self.visualization_type == VisualizationType::ForestPlot
    }

    pub fn is_stacked(&self) -> bool {
        self.visualization_sub_type == VisualizationSubType::Stacked
    }

    pub fn series_keys(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.data_key.as_str())
    }

    /// `(low, high)` interval columns of every forecasting series.
    pub fn forecasting_columns(&self) -> Vec<&CiColumns> {
        self.series
            .iter()
            .filter(|s| s.role == SeriesRole::Forecasting)
            .flat_map(|s| s.confidence_intervals.iter())
            .collect()
    }

    /// CSS-like font string used for label measurement.
    pub fn label_font(&self) -> String {
        format!("normal {}px sans-serif", self.font_size.px())
    }
}

/// Output of the domain resolver. `left_max`/`right_max` only carry meaning for
/// dual-axis combo charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDomain {
    pub min: f64,
    pub max: f64,
    pub left_max: f64,
    pub right_max: f64,
}

impl ResolvedDomain {
    /// Reject NaN, infinite or inverted domains.
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(AxisError::DegenerateDomain {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn is_usable(&self) -> bool {
        self.validate().is_ok()
    }

    /// This domain when usable, otherwise `[0, 1]` with the combo maxima cleared.
    pub fn or_fallback(self) -> Self {
        if self.is_usable() {
            self
        } else {
            log::warn!(
                "falling back from degenerate domain [{}, {}]",
                self.min,
                self.max
            );
            ResolvedDomain {
                min: 0.0,
                max: 1.0,
                left_max: 0.0,
                right_max: 0.0,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// One laid-out tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTick {
    pub value: f64,
    pub formatted_label: String,
    pub pixel_position: f64,
    /// Degrees, negative rotates counter-clockwise.
    pub rotation_angle: f64,
    pub text_anchor: TextAnchor,
    pub vertical_anchor: TextAnchor,
    /// Wrap width for labels that touch and cannot rotate.
    pub wrap_width: Option<f64>,
}

/// Tick layout result. `margin_top` must be added to the chart's height budget
/// by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TickPlan {
    pub ticks: Vec<PlannedTick>,
    pub ticks_overlapping: bool,
    pub margin_top: f64,
    pub tick_width_max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entered_bounds_accept_strings_numbers_and_blanks() {
        let cfg: AxisConfig =
            serde_json::from_str(r#"{"min": "", "max": "250", "paddingPercent": 0.1}"#).unwrap();
        assert_eq!(cfg.min, None);
        assert_eq!(cfg.max, Some(250.0));
        assert_eq!(cfg.padding_percent, Some(0.1));

        let cfg: AxisConfig = serde_json::from_str(r#"{"min": null, "max": "abc"}"#).unwrap();
        assert_eq!(cfg.min, None);
        assert_eq!(cfg.max, None);
    }

    #[test]
    fn viewport_override_wins_and_zero_is_unset() {
        let cfg: AxisConfig =
            serde_json::from_str(r#"{"numTicks": "5", "viewportNumTicks": {"xs": 3}}"#).unwrap();
        assert_eq!(cfg.tick_count_for(Some(Viewport::Xs)), Some(3));
        assert_eq!(cfg.tick_count_for(Some(Viewport::Lg)), Some(5));
        assert_eq!(cfg.tick_count_for(None), Some(5));

        let zero: AxisConfig = serde_json::from_str(r#"{"numTicks": 0}"#).unwrap();
        assert_eq!(zero.tick_count_for(None), None);
    }

    #[test]
    fn half_filled_editor_fields_still_load() {
        let cfg = ChartConfig::from_json(
            r#"{
                "xAxis": {"numTicks": "", "viewportNumTicks": {"xs": "", "sm": "3", "md": 4}},
                "preliminaryData": [{"type": "suppression", "value": 0, "style": "dashed"}],
                "series": [{"dataKey": "y", "confidenceIntervals": [{"showInTooltip": true}]}]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.x_axis.num_ticks, None);
        assert_eq!(cfg.x_axis.tick_count_for(Some(Viewport::Xs)), None);
        assert_eq!(cfg.x_axis.tick_count_for(Some(Viewport::Sm)), Some(3));
        assert_eq!(cfg.x_axis.tick_count_for(Some(Viewport::Md)), Some(4));
        assert_eq!(cfg.preliminary_data[0].value, "0");
        assert!(cfg.preliminary_data[0].is_suppression());
        assert_eq!(cfg.series[0].confidence_intervals[0], CiColumns::default());
    }

    #[test]
    fn config_parses_visualization_names() {
        let cfg = ChartConfig::from_json(
            r#"{
                "visualizationType": "Deviation Bar",
                "visualizationSubType": "stacked",
                "yAxis": {"type": "logarithmic"},
                "series": [{"dataKey": "y", "type": "dashed-md", "axis": "Right"}]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.visualization_type, VisualizationType::DeviationBar);
        assert!(cfg.is_stacked());
        assert!(cfg.y_axis.is_logarithmic());
        assert!(cfg.series[0].role.is_line());
        assert_eq!(cfg.series[0].axis, AxisSide::Right);
    }

    #[test]
    fn cell_numeric_view_skips_markers() {
        assert_eq!(CellValue::from("12.5").as_f64(), Some(12.5));
        assert_eq!(CellValue::from("*").as_f64(), None);
        assert_eq!(CellValue::from("").as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
        assert!(CellValue::from("*").is_marker("*"));
        assert!(!CellValue::from(0.0).is_marker("0"));
    }

    #[test]
    fn inverted_domain_is_degenerate() {
        let d = ResolvedDomain {
            min: 5.0,
            max: 1.0,
            ..Default::default()
        };
        assert!(d.validate().is_err());
        assert_eq!(d.or_fallback().max, 1.0);
        assert_eq!(d.or_fallback().min, 0.0);
    }
}
