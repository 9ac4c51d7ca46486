use chartscale::domain::{DomainInputs, resolve_domain};
use chartscale::extrema::series_extrema;
use chartscale::models::{
    AxisType, CellValue, ChartConfig, DataRow, SeriesDescriptor, VisualizationSubType,
    VisualizationType,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn xy_rows(points: &[(f64, f64)]) -> Vec<DataRow> {
    points
        .iter()
        .map(|(x, y)| {
            [
                ("x".to_string(), CellValue::from(*x)),
                ("y".to_string(), CellValue::from(*y)),
            ]
            .into_iter()
            .collect()
        })
        .collect()
}

fn chart(viz: VisualizationType) -> ChartConfig {
    let mut config = ChartConfig {
        visualization_type: viz,
        series: vec![SeriesDescriptor {
            data_key: "y".into(),
            ..Default::default()
        }],
        ..Default::default()
    };
    config.x_axis.data_key = "x".into();
    config
}

#[test]
fn max_covers_data_without_overrides() {
    let rows = xy_rows(&[(1.0, 3.0), (2.0, 42.5), (3.0, -7.0)]);
    for viz in VisualizationType::ALL {
        let config = chart(viz);
        let inputs = DomainInputs::new(&config, Some(rows.as_slice()), -7.0, 42.5, true);
        let d = resolve_domain(&inputs).unwrap();
        assert!(d.max >= 42.5, "{viz:?} max {} below data", d.max);
    }
}

#[test]
fn bar_positive_min_floors_to_zero_and_negative_grows() {
    let rows = xy_rows(&[(1.0, 4.0), (2.0, 9.0)]);
    for viz in [VisualizationType::Bar, VisualizationType::Combo] {
        let config = chart(viz);
        let pos = DomainInputs::new(&config, Some(rows.as_slice()), 4.0, 9.0, true);
        assert_eq!(resolve_domain(&pos).unwrap().min, 0.0);
        let neg = DomainInputs::new(&config, Some(rows.as_slice()), -2.0, 9.0, true);
        assert!(approx(resolve_domain(&neg).unwrap().min, -2.2));
    }
}

#[test]
fn resolving_twice_is_bit_identical() {
    let rows = xy_rows(&[(1.0, -1.5), (2.0, 17.25)]);
    let mut config = chart(VisualizationType::Bar);
    config.y_axis.padding_percent = Some(0.1);
    config.y_axis.enable_padding = true;
    let inputs = DomainInputs::new(&config, Some(rows.as_slice()), -1.5, 17.25, true);
    let a = resolve_domain(&inputs).unwrap();
    let b = resolve_domain(&inputs).unwrap();
    assert_eq!(a.min.to_bits(), b.min.to_bits());
    assert_eq!(a.max.to_bits(), b.max.to_bits());
    assert_eq!(a, b);
}

#[test]
fn stacked_area_always_starts_at_zero() {
    let rows = xy_rows(&[(1.0, -4.0), (2.0, 8.0)]);
    let mut config = chart(VisualizationType::AreaChart);
    config.visualization_sub_type = VisualizationSubType::Stacked;
    config.y_axis.min = Some(-20.0);
    config.y_axis.padding_percent = Some(0.5);
    config.y_axis.enable_padding = true;
    let inputs = DomainInputs::new(&config, Some(rows.as_slice()), -4.0, 8.0, true);
    assert_eq!(resolve_domain(&inputs).unwrap().min, 0.0);
}

#[test]
fn scatter_adds_ten_percent_headroom() {
    let rows = xy_rows(&[(1.0, 2.0), (2.0, 30.0)]);
    let config = chart(VisualizationType::ScatterPlot);
    let inputs = DomainInputs::new(&config, Some(rows.as_slice()), 2.0, 30.0, true);
    assert!(approx(resolve_domain(&inputs).unwrap().max, 33.0));
}

#[test]
fn bar_scenario_with_negative_value() {
    // min -5 is scaled by 1.1 rather than floored to zero
    let rows = xy_rows(&[(1.0, -5.0), (2.0, 10.0)]);
    let config = chart(VisualizationType::Bar);
    let e = series_extrema(&config, &rows).unwrap();
    assert_eq!((e.min_value, e.max_value), (-5.0, 10.0));
    let inputs = DomainInputs::new(
        &config,
        Some(rows.as_slice()),
        e.min_value,
        e.max_value,
        e.exist_positive_value,
    );
    let d = resolve_domain(&inputs).unwrap();
    assert!(approx(d.min, -5.5));
    assert_eq!(d.max, 10.0);
}

#[test]
fn deviation_bar_keeps_low_entered_min() {
    let rows = xy_rows(&[(1.0, -3.0), (2.0, 6.0)]);
    let mut config = chart(VisualizationType::DeviationBar);
    config.x_axis.target = Some(5.0);
    config.y_axis.min = Some(-10.0);
    let inputs = DomainInputs::new(&config, Some(rows.as_slice()), -3.0, 6.0, true);
    assert_eq!(resolve_domain(&inputs).unwrap().min, -10.0);
}

#[test]
fn log_line_rejects_negative_entered_min() {
    let rows = xy_rows(&[(1.0, 2.0), (2.0, 500.0)]);
    let mut config = chart(VisualizationType::Line);
    config.y_axis.axis_type = AxisType::Logarithmic;
    config.y_axis.min = Some(-1.0);
    let inputs = DomainInputs::new(&config, Some(rows.as_slice()), 2.0, 500.0, true);
    assert_eq!(resolve_domain(&inputs).unwrap().min, 2.0);
}

#[test]
fn absent_data_gives_zero_domain() {
    let config = chart(VisualizationType::Bar);
    let inputs = DomainInputs::new(&config, None, 3.0, 9.0, true);
    let d = resolve_domain(&inputs).unwrap();
    assert_eq!((d.min, d.max), (0.0, 0.0));
}

#[test]
fn config_json_drives_the_resolver() {
    let config = ChartConfig::from_json(
        r#"{
            "visualizationType": "Scatter Plot",
            "yAxis": { "max": "40" },
            "series": [{ "dataKey": "y", "type": "Line" }]
        }"#,
    )
    .unwrap();
    let rows = xy_rows(&[(1.0, 1.0), (2.0, 20.0)]);
    let inputs = DomainInputs::new(&config, Some(rows.as_slice()), 1.0, 20.0, true);
    assert!(approx(resolve_domain(&inputs).unwrap().max, 44.0));
}

#[test]
fn line_drawn_as_bars_takes_the_bar_floor() {
    let rows = xy_rows(&[(1.0, 4.0), (2.0, 9.0)]);
    let config = chart(VisualizationType::Line);

    let plain = DomainInputs::new(&config, Some(rows.as_slice()), 4.0, 9.0, true);
    assert_eq!(resolve_domain(&plain).unwrap().min, 4.0);

    let pos = plain.with_line_to_bar(true);
    assert_eq!(resolve_domain(&pos).unwrap().min, 0.0);

    let neg = DomainInputs::new(&config, Some(rows.as_slice()), -2.0, 9.0, true).with_line_to_bar(true);
    assert!(approx(resolve_domain(&neg).unwrap().min, -2.2));
}
