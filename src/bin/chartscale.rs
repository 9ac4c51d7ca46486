use anyhow::{Context, Result};
use chartscale::boxplot::{self, BoxPlotGroup};
use chartscale::brush;
use chartscale::extrema::{self, SeriesExtrema};
use chartscale::format::{format_number, log_tick_display_value};
use chartscale::models::{
    AxisType, CellValue, ChartConfig, DataRow, FontSize, ResolvedDomain, TickPlan, Viewport,
    VisualizationType,
};
use chartscale::ticks::{self, AxisKind, AxisTick, TickCountContext, TickLayoutOptions};
use chartscale::{DomainInputs, HeuristicMeasure, dates, input, resolve_domain};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chartscale",
    version,
    about = "Resolve chart axis domains and tick label layout"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the value domain and tick layout for a chart config and its data.
    Resolve(ResolveArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ViewportArg {
    Xxs,
    Xs,
    Sm,
    Md,
    Lg,
}

impl From<ViewportArg> for Viewport {
    fn from(v: ViewportArg) -> Self {
        match v {
            ViewportArg::Xxs => Viewport::Xxs,
            ViewportArg::Xs => Viewport::Xs,
            ViewportArg::Sm => Viewport::Sm,
            ViewportArg::Md => Viewport::Md,
            ViewportArg::Lg => Viewport::Lg,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FontArg {
    Small,
    Medium,
    Large,
}

impl From<FontArg> for FontSize {
    fn from(f: FontArg) -> Self {
        match f {
            FontArg::Small => FontSize::Small,
            FontArg::Medium => FontSize::Medium,
            FontArg::Large => FontSize::Large,
        }
    }
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// Chart configuration (JSON).
    #[arg(short, long)]
    config: PathBuf,
    /// Data rows (.csv, or .json array of objects).
    #[arg(short, long)]
    data: PathBuf,
    /// Chart width in pixels (default 1000).
    #[arg(long, default_value_t = 1000.0)]
    width: f64,
    /// Breakpoint override; derived from --width when omitted.
    #[arg(long, value_enum)]
    viewport: Option<ViewportArg>,
    /// Label font size override.
    #[arg(long, value_enum)]
    font_size: Option<FontArg>,
    /// Brushed pixel range over the date axis as X0:X1; only rows inside it
    /// feed the domain.
    #[arg(long, value_parser = parse_brush)]
    brush: Option<(f64, f64)>,
    /// Also write the report to this JSON file.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Report {
    viewport: Viewport,
    extrema: Option<SeriesExtrema>,
    domain: ResolvedDomain,
    value_ticks: Vec<AxisTick>,
    /// Layout of the mirrored value axis, paired bar charts only.
    #[serde(skip_serializing_if = "Option::is_none")]
    paired_axis: Option<TickPlan>,
    category_axis: TickPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    box_plots: Option<Vec<BoxPlotGroup>>,
}

fn parse_brush(s: &str) -> std::result::Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| "expected X0:X1".to_string())?;
    let px = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid pixel offset {v:?}: {e}"))
    };
    Ok((px(a)?, px(b)?))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args),
    }
}

fn cell_label(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => chartscale::format::js_number_text(*n),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Null => String::new(),
    }
}

/// Distinct category labels in data order; date axes are reformatted with the
/// year shown once per run.
fn category_labels(config: &ChartConfig, rows: &[DataRow]) -> Vec<String> {
    let axis = &config.x_axis;
    let raw: Vec<String> = rows
        .iter()
        .filter_map(|r| r.get(axis.data_key.as_str()))
        .map(cell_label)
        .collect();
    let distinct = ticks::manual_tick_values(&raw, 1);
    if axis.axis_type != AxisType::Date {
        return distinct;
    }
    let parse = axis.date_parse_format.as_deref();
    let display = axis.date_display_format.as_deref();
    let mut previous = None;
    distinct
        .into_iter()
        .map(|label| match dates::parse_date(&label, parse) {
            Some(d) => {
                let prev = if axis.show_years_once { previous } else { None };
                previous = Some(d);
                dates::format_date(d, prev, display)
            }
            None => label,
        })
        .collect()
}

fn category_ticks(labels: &[String], width: f64) -> Vec<AxisTick> {
    let band = if labels.is_empty() {
        0.0
    } else {
        width / labels.len() as f64
    };
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| AxisTick {
            value: i as f64,
            formatted_label: l.clone(),
            pixel_position: band * (i as f64 + 0.5),
        })
        .collect()
}

fn cmd_resolve(args: ResolveArgs) -> Result<()> {
    let mut config = input::load_config(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let mut rows = input::load_rows(&args.data)
        .with_context(|| format!("reading data {}", args.data.display()))?;
    if let Some(f) = args.font_size {
        config.font_size = f.into();
    }
    let viewport = args
        .viewport
        .map(Viewport::from)
        .unwrap_or_else(|| Viewport::from_width(args.width));

    if let Some(selection) = args.brush {
        let before = rows.len();
        rows = brush::brush_filter(
            &rows,
            &config.x_axis.data_key,
            config.x_axis.date_parse_format.as_deref(),
            selection,
            args.width,
        );
        eprintln!("Brush kept {} of {} rows", rows.len(), before);
    }

    let found = extrema::series_extrema(&config, &rows);
    let e = found.unwrap_or_default();
    let inputs = DomainInputs::new(
        &config,
        Some(rows.as_slice()),
        e.min_value,
        e.max_value,
        e.exist_positive_value,
    )
    .with_all_line(extrema::is_all_line(&config));
    let domain = resolve_domain(&inputs)?.or_fallback();
    log::info!(
        "domain [{}, {}] from {} values ({} skipped)",
        domain.min,
        domain.max,
        e.count,
        e.skipped
    );

    let count_ctx = TickCountContext {
        config: &config,
        viewport: Some(viewport),
        data_len: rows.len(),
        domain,
    };
    let value_count = ticks::count_num_of_ticks(AxisKind::Y, &count_ctx).unwrap_or(5) as usize;
    let log_axis = config.y_axis.is_logarithmic();
    let values = ticks::linear_tick_values(domain.min, domain.max, value_count);
    let value_ticks = ticks::linear_axis_ticks(&values, &domain, args.width, |v| {
        let shown = if log_axis { log_tick_display_value(v) } else { v };
        format_number(shown, &config.data_format)
    });

    let font_px = config.font_size.px();
    let paired_axis = (config.visualization_type == VisualizationType::PairedBar).then(|| {
        ticks::resolve_paired_bar_layout(
            &value_ticks,
            &TickLayoutOptions::for_paired_bar(&config),
            font_px,
            args.width / 2.0,
            &HeuristicMeasure,
        )
    });

    let mut labels = category_labels(&config, &rows);
    if config.x_axis.manual {
        let step = config.x_axis.manual_step.unwrap_or(1.0).max(1.0) as usize;
        labels = ticks::manual_tick_values(&labels, step);
    } else if let Some(limit) = ticks::count_num_of_ticks(AxisKind::X, &count_ctx)
        && limit > 0
        && labels.len() > limit as usize
    {
        let step = labels.len().div_ceil(limit as usize);
        labels = ticks::manual_tick_values(&labels, step);
    }
    let category_axis = ticks::resolve_tick_layout(
        &category_ticks(&labels, args.width),
        &TickLayoutOptions::for_x_axis(&config),
        font_px,
        args.width,
        &HeuristicMeasure,
    );

    let box_plots = (config.visualization_type == VisualizationType::BoxPlot)
        .then(|| boxplot::create_plots(&config, &rows));

    let report = Report {
        viewport,
        extrema: found,
        domain,
        value_ticks,
        paired_axis,
        category_axis,
        box_plots,
    };
    if let Some(path) = args.out.as_ref() {
        input::save_json(&report, path)?;
        eprintln!("Wrote report to {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
