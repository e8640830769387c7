//! Chart drawing with ratatui widgets.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Direction, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType, Paragraph, Widget,
};

use super::{buffer_to_text, CanvasSize};
use crate::chart::{ChartKind, ChartSpec};
use crate::db::{format_float, QueryResult, Value};

/// Bars are scaled so the largest magnitude maps to this value.
const BAR_SCALE: f64 = 1000.0;

/// Widest vertical bar.
const MAX_BAR_WIDTH: u16 = 12;

/// Height of the metric box.
const METRIC_HEIGHT: u16 = 5;

const SERIES_COLORS: [Color; 3] = [Color::Cyan, Color::Yellow, Color::Magenta];

/// One category with its series values.
struct Point {
    label: String,
    values: Vec<f64>,
}

/// Draws the chart described by `spec` as text.
///
/// Returns `None` when the result has no rows or lacks a named column.
pub fn render_chart(spec: &ChartSpec, result: &QueryResult, size: CanvasSize) -> Option<String> {
    if result.is_empty() {
        return None;
    }

    let series: Vec<usize> = spec
        .series
        .iter()
        .map(|name| result.column_index(name))
        .collect::<Option<_>>()?;

    if spec.kind == ChartKind::Metric {
        let value = result.rows.first()?.get(*series.first()?)?;
        return Some(render_metric(&spec.title, value, size));
    }

    let category = result.column_index(spec.category.as_deref()?)?;
    let points: Vec<Point> = result
        .rows
        .iter()
        .map(|row| Point {
            label: row
                .get(category)
                .map(Value::to_display_string)
                .unwrap_or_default(),
            values: series
                .iter()
                .map(|&i| row.get(i).and_then(Value::as_f64).unwrap_or(0.0))
                .collect(),
        })
        .collect();

    let text = match spec.kind {
        ChartKind::Bar => render_bars(spec, &points, size),
        ChartKind::GroupedBar => render_grouped_bars(spec, &points, size),
        ChartKind::HorizontalBar => render_horizontal_bars(&spec.title, &points, size, false),
        ChartKind::Pie => render_horizontal_bars(&spec.title, &points, size, true),
        ChartKind::Line => render_line(spec, &points, size),
        ChartKind::Metric => return None,
    };
    Some(text)
}

fn draw(widget: impl Widget, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer);
    buffer_to_text(&buffer)
}

fn titled_block(title: &str) -> Block<'_> {
    Block::bordered().title(Span::raw(format!(" {title} ")))
}

/// Scale factor mapping the largest magnitude to `BAR_SCALE`.
fn bar_scale(points: &[Point]) -> f64 {
    let max = points
        .iter()
        .flat_map(|p| p.values.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max > 0.0 {
        BAR_SCALE / max
    } else {
        1.0
    }
}

/// A bar whose length is the magnitude and whose label is the signed value.
fn bar(value: f64, scale: f64, color: Color) -> Bar<'static> {
    Bar::default()
        .value((value.abs() * scale).round() as u64)
        .text_value(format_float(value))
        .style(Style::default().fg(color))
}

fn vertical_bar_width(width: u16, bars: usize, gap: u16) -> u16 {
    let inner = width.saturating_sub(2);
    let slots = u16::try_from(bars.max(1)).unwrap_or(u16::MAX);
    (inner / slots).saturating_sub(gap).clamp(1, MAX_BAR_WIDTH)
}

fn render_bars(spec: &ChartSpec, points: &[Point], size: CanvasSize) -> String {
    let scale = bar_scale(points);
    let bars: Vec<Bar> = points
        .iter()
        .map(|p| {
            bar(p.values[0], scale, SERIES_COLORS[0]).label(Line::from(p.label.clone()))
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(&spec.title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(vertical_bar_width(size.width, bars.len(), 1))
        .bar_gap(1)
        .max(BAR_SCALE as u64);

    draw(chart, size.width, size.height)
}

fn render_grouped_bars(spec: &ChartSpec, points: &[Point], size: CanvasSize) -> String {
    let scale = bar_scale(points);
    let series_count = spec.series.len().max(1);

    let groups: Vec<(String, Vec<Bar>)> = points
        .iter()
        .map(|p| {
            let bars = p
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| bar(v, scale, SERIES_COLORS[i % SERIES_COLORS.len()]))
                .collect();
            (p.label.clone(), bars)
        })
        .collect();

    let title = format!("{} ({})", spec.title, spec.series.join(" / "));
    let group_gap: u16 = 2;
    let slots = points.len() * series_count;
    let bar_width = vertical_bar_width(
        size.width.saturating_sub(
            group_gap.saturating_mul(u16::try_from(points.len()).unwrap_or(u16::MAX)),
        ),
        slots,
        0,
    );

    let mut chart = BarChart::default()
        .block(titled_block(&title))
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(group_gap)
        .max(BAR_SCALE as u64);

    for (label, bars) in &groups {
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(label.clone()))
                .bars(bars),
        );
    }

    draw(chart, size.width, size.height)
}

/// Horizontal bars, one line per category.
///
/// With `as_share`, bar lengths and labels are percentages of the total,
/// which is how pie charts are shown in a terminal.
fn render_horizontal_bars(
    title: &str,
    points: &[Point],
    size: CanvasSize,
    as_share: bool,
) -> String {
    let bars: Vec<Bar> = if as_share {
        let total: f64 = points.iter().map(|p| p.values[0].abs()).sum();
        points
            .iter()
            .map(|p| {
                let share = if total > 0.0 {
                    p.values[0].abs() / total * 100.0
                } else {
                    0.0
                };
                Bar::default()
                    .value((share * 10.0).round() as u64)
                    .text_value(format!("{share:.1}%"))
                    .label(Line::from(p.label.clone()))
                    .style(Style::default().fg(SERIES_COLORS[0]))
            })
            .collect()
    } else {
        let scale = bar_scale(points);
        points
            .iter()
            .map(|p| {
                bar(p.values[0], scale, SERIES_COLORS[0]).label(Line::from(p.label.clone()))
            })
            .collect()
    };

    let title = if as_share {
        format!("{title} (share of total)")
    } else {
        title.to_string()
    };
    let height = u16::try_from(bars.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .max(size.height.min(5));
    let max = if as_share { 1000 } else { BAR_SCALE as u64 };

    let chart = BarChart::default()
        .block(titled_block(&title))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0)
        .max(max);

    draw(chart, size.width, height)
}

fn render_line(spec: &ChartSpec, points: &[Point], size: CanvasSize) -> String {
    let series_data: Vec<Vec<(f64, f64)>> = (0..spec.series.len())
        .map(|s| {
            points
                .iter()
                .enumerate()
                .map(|(x, p)| (x as f64, p.values[s]))
                .collect()
        })
        .collect();

    let (min_y, max_y) = points
        .iter()
        .flat_map(|p| p.values.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let (min_y, max_y) = if min_y < max_y {
        (min_y, max_y)
    } else {
        (min_y - 1.0, max_y + 1.0)
    };
    let max_x = points.len().saturating_sub(1).max(1) as f64;

    let datasets: Vec<Dataset> = spec
        .series
        .iter()
        .zip(&series_data)
        .enumerate()
        .map(|(i, (name, data))| {
            Dataset::default()
                .name(name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(data)
        })
        .collect();

    let x_labels = axis_labels(points);
    let y_labels = vec![
        Span::raw(format_float(min_y)),
        Span::raw(format_float((min_y + max_y) / 2.0)),
        Span::raw(format_float(max_y)),
    ];

    let chart = Chart::new(datasets)
        .block(titled_block(&spec.title))
        .x_axis(
            Axis::default()
                .title(spec.category.clone().unwrap_or_default())
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(Axis::default().bounds([min_y, max_y]).labels(y_labels));

    draw(chart, size.width, size.height)
}

/// First, middle and last category labels for the x axis.
///
/// The axis draws no labels unless it gets at least two.
fn axis_labels(points: &[Point]) -> Vec<Span<'static>> {
    let picks: Vec<usize> = match points.len() {
        0 => vec![],
        1 => vec![0, 0],
        2 => vec![0, 1],
        n => vec![0, n / 2, n - 1],
    };
    picks
        .into_iter()
        .map(|i| Span::raw(points[i].label.clone()))
        .collect()
}

fn render_metric(title: &str, value: &Value, size: CanvasSize) -> String {
    let text = value.to_display_string();
    let width = u16::try_from(text.chars().count().max(title.chars().count()) + 8)
        .unwrap_or(u16::MAX)
        .min(size.width);

    let widget = Paragraph::new(Line::from(text))
        .alignment(Alignment::Center)
        .block(titled_block(title));

    draw(widget, width, METRIC_HEIGHT)
}
