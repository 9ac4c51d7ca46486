use chartscale::models::{ChartConfig, Orientation, ResolvedDomain, Viewport, VisualizationType};
use chartscale::text::HeuristicMeasure;
use chartscale::ticks::{
    AxisKind, AxisTick, TickCountContext, TickLayoutOptions, count_num_of_ticks,
    linear_axis_ticks, resolve_tick_layout,
};

fn year_ticks() -> Vec<AxisTick> {
    ["2020", "2021", "2022"]
        .iter()
        .enumerate()
        .map(|(i, l)| AxisTick {
            value: 2020.0 + i as f64,
            formatted_label: l.to_string(),
            pixel_position: i as f64 * 40.0,
        })
        .collect()
}

#[test]
fn crowded_years_rotate_when_responsive() {
    let mut config = ChartConfig::default();
    config.is_responsive_ticks = true;
    let plan = resolve_tick_layout(
        &year_ticks(),
        &TickLayoutOptions::for_x_axis(&config),
        config.font_size.px(),
        120.0,
        &HeuristicMeasure,
    );
    assert!(plan.ticks_overlapping);
    assert!(plan.ticks.iter().all(|t| t.rotation_angle != 0.0));
    assert!(plan.margin_top > plan.tick_width_max);
}

#[test]
fn wide_axis_keeps_years_flat() {
    let mut config = ChartConfig::default();
    config.is_responsive_ticks = true;
    let plan = resolve_tick_layout(
        &year_ticks(),
        &TickLayoutOptions::for_x_axis(&config),
        config.font_size.px(),
        1200.0,
        &HeuristicMeasure,
    );
    assert!(!plan.ticks_overlapping);
    assert_eq!(plan.margin_top, 0.0);
    // layout never moves ticks
    assert_eq!(plan.ticks[2].pixel_position, 80.0);
}

fn ctx(config: &ChartConfig, min: f64, max: f64) -> TickCountContext<'_> {
    TickCountContext {
        config,
        viewport: None,
        data_len: 7,
        domain: ResolvedDomain {
            min,
            max,
            ..Default::default()
        },
    }
}

#[test]
fn y_tick_count_defaults_and_caps() {
    let mut config = ChartConfig::default();
    assert_eq!(count_num_of_ticks(AxisKind::Y, &ctx(&config, 0.0, 100.0)), Some(4));
    assert_eq!(count_num_of_ticks(AxisKind::Y, &ctx(&config, 0.0, 3.0)), Some(2));

    config.y_axis.num_ticks = Some(10);
    assert_eq!(count_num_of_ticks(AxisKind::Y, &ctx(&config, 0.0, 4.4)), Some(4));
    assert_eq!(count_num_of_ticks(AxisKind::Y, &ctx(&config, -2.0, 4.5)), Some(10));

    config.data_format.round_to = Some(1);
    config.y_axis.num_ticks = None;
    assert_eq!(count_num_of_ticks(AxisKind::Y, &ctx(&config, 0.0, 100.0)), None);
}

#[test]
fn horizontal_charts_get_a_tick_per_row() {
    let mut config = ChartConfig::default();
    config.orientation = Orientation::Horizontal;
    assert_eq!(count_num_of_ticks(AxisKind::Y, &ctx(&config, 0.0, 100.0)), Some(7));
    assert_eq!(count_num_of_ticks(AxisKind::X, &ctx(&config, 0.0, 100.0)), Some(4));
}

#[test]
fn viewport_override_wins() {
    let mut config = ChartConfig::default();
    config.x_axis.num_ticks = Some(8);
    config.x_axis.viewport_num_ticks.insert(Viewport::Xs, 3);
    let mut c = ctx(&config, 0.0, 100.0);
    assert_eq!(count_num_of_ticks(AxisKind::X, &c), Some(8));
    c.viewport = Some(Viewport::Xs);
    assert_eq!(count_num_of_ticks(AxisKind::X, &c), Some(3));
}

#[test]
fn forest_plot_bottom_axis_uses_y_setting() {
    let mut config = ChartConfig::default();
    config.visualization_type = VisualizationType::ForestPlot;
    assert_eq!(count_num_of_ticks(AxisKind::X, &ctx(&config, 0.0, 2.0)), Some(4));
    config.y_axis.num_ticks = Some(6);
    assert_eq!(count_num_of_ticks(AxisKind::X, &ctx(&config, 0.0, 2.0)), Some(6));
}

#[test]
fn linear_axis_maps_domain_to_pixels() {
    let domain = ResolvedDomain {
        min: -10.0,
        max: 10.0,
        ..Default::default()
    };
    let t = linear_axis_ticks(&[-10.0, 0.0, 10.0], &domain, 500.0, |v| format!("{v}"));
    assert_eq!(t[0].pixel_position, 0.0);
    assert_eq!(t[1].pixel_position, 250.0);
    assert_eq!(t[2].pixel_position, 500.0);
}
