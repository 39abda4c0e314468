use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::format_value;
use crate::charts::{Bar, BarGroup, Bubble, ChartSpec, Mark, Series};

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

const FONT: &str = "sans-serif";

fn palette(i: usize) -> RGBColor {
    let (r, g, b) = Palette99::pick(i).rgb();
    RGBColor(r, g, b)
}

/// Headroom above the tallest value.
fn upper(max: f64) -> f64 {
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

/// Label for a category axis tick; ticks between categories stay blank.
fn category_label(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

fn category_range(n: usize) -> std::ops::Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    match &spec.mark {
        Mark::Bar { bars } => draw_bars(root, spec, bars)?,
        Mark::GroupedBar { series, groups } => draw_grouped_bars(root, spec, series, groups)?,
        Mark::Bubble {
            x_categories,
            y_categories,
            bubbles,
        } => draw_bubbles(root, spec, x_categories, y_categories, bubbles)?,
        Mark::Line { series, x_domain } => draw_lines(root, spec, series, *x_domain)?,
        Mark::Area {
            series,
            x_domain,
            opacity,
        } => draw_areas(root, spec, series, *x_domain, *opacity)?,
    }
    root.present()?;
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    bars: &[Bar],
) -> DrawResult<DB> {
    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
    let y_max = upper(bars.iter().map(|b| b.value).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(160)
        .y_label_area_size(70)
        .build_cartesian_2d(category_range(bars.len()), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len().max(1))
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90))
        .y_label_formatter(&|y| format_value(*y, spec.y_format))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, bar.value)], palette(i).filled())
    }))?;

    Ok(())
}

fn draw_grouped_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    series: &[String],
    groups: &[BarGroup],
) -> DrawResult<DB> {
    let y_max = upper(
        groups
            .iter()
            .flat_map(|g| g.bars.iter().map(|b| b.value))
            .fold(0.0, f64::max),
    );
    let lines = groups.iter().map(|g| g.label.len()).max().unwrap_or(1) as u32;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(20 + 15 * lines)
        .y_label_area_size(70)
        .build_cartesian_2d(category_range(groups.len()), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|y| format_value(*y, spec.y_format))
        .y_desc(spec.y_label.as_str())
        .draw()?;

    let width = 0.8 / series.len().max(1) as f64;
    for (j, name) in series.iter().enumerate() {
        let color = palette(j);
        chart
            .draw_series(groups.iter().enumerate().filter_map(move |(i, g)| {
                let bar = g.bars.get(j)?;
                let x0 = i as f64 - 0.4 + width * j as f64;
                Some(Rectangle::new(
                    [(x0, 0.0), (x0 + width, bar.value)],
                    color.filled(),
                ))
            }))?
            .label(name.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
    }

    // Wrapped genre labels, one text line per wrapped segment.
    let style =
        TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for (i, group) in groups.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(i as f64, 0.0));
        for (k, line) in group.label.iter().enumerate() {
            root.draw_text(line, &style, (px, py + 8 + 15 * k as i32))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_bubbles<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    x_categories: &[String],
    y_categories: &[String],
    bubbles: &[Bubble],
) -> DrawResult<DB> {
    let max_count = bubbles.iter().map(|b| b.count).max().unwrap_or(1).max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(160)
        .y_label_area_size(140)
        .build_cartesian_2d(
            category_range(x_categories.len()),
            category_range(y_categories.len()),
        )?;

    chart
        .configure_mesh()
        .x_labels(x_categories.len().max(1))
        .y_labels(y_categories.len().max(1))
        .x_label_formatter(&|x| category_label(x_categories, *x))
        .y_label_formatter(&|y| category_label(y_categories, *y))
        .x_label_style((FONT, 11).into_font().transform(FontTransform::Rotate90))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    let position =
        |categories: &[String], value: &str| categories.iter().position(|c| c == value);

    chart.draw_series(bubbles.iter().filter_map(|b| {
        let x = position(x_categories, &b.x)?;
        let y = position(y_categories, &b.y)?;
        let radius = 3.0 + 12.0 * (b.count as f64 / max_count).sqrt();
        Some(Circle::new(
            (x as f64, y as f64),
            radius as i32,
            palette(y).mix(0.8).filled(),
        ))
    }))?;

    Ok(())
}

fn x_extent(series: &[Series]) -> (f64, f64) {
    let xs = series.iter().flat_map(|s| s.points.iter().map(|p| p.0));
    let (lo, hi) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

fn y_upper(series: &[Series]) -> f64 {
    upper(
        series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .fold(0.0, f64::max),
    )
}

fn draw_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    series: &[Series],
    x_domain: Option<(f64, f64)>,
) -> DrawResult<DB> {
    let (x_lo, x_hi) = x_domain.unwrap_or_else(|| x_extent(series));

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_upper(series))?;

    chart
        .configure_mesh()
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format_value(*y, spec.y_format))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    for (i, s) in series.iter().enumerate() {
        let color = palette(i);
        let points = s
            .points
            .iter()
            .copied()
            .filter(|(x, _)| *x >= x_lo && *x <= x_hi);
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(s.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_areas<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    series: &[Series],
    x_domain: (f64, f64),
    opacity: f64,
) -> DrawResult<DB> {
    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_domain.0..x_domain.1, 0f64..y_upper(series))?;

    chart
        .configure_mesh()
        .y_label_formatter(&|y| format_value(*y, spec.y_format))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    for (i, s) in series.iter().enumerate() {
        let color = palette(i);
        chart
            .draw_series(
                AreaSeries::new(s.points.iter().copied(), 0.0, color.mix(opacity).filled())
                    .border_style(color.stroke_width(1)),
            )?
            .label(s.name.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}
