//! One function per chart. Each is a pure read over its input table.

use chrono::Datelike;
use std::collections::BTreeMap;

use super::stats::{kernel_density, mean};
use super::types::{Bar, BarGroup, Bubble, ChartSpec, Mark, Series, ValueFormat};
use crate::error::RenderError;
use crate::merge::MergedMovie;
use crate::tables::types::{REVENUE_SEGMENTS, Revenue, VoiceActor};

pub const TOP_N: usize = 10;
pub const GENRE_LABEL_WIDTH: usize = 11;
pub const FIRST_REVENUE_YEAR: i32 = 1991;
pub const LAST_REVENUE_YEAR: i32 = 2016;
pub const DENSITY_STEPS: usize = 200;
pub const DENSITY_EXTENT: (f64, f64) = (0.0, 100_000.0);

/// Placeholder the upstream voice actor table uses for an unknown actor.
const VOICE_ACTOR_PLACEHOLDER: &str = "None";

const GROSS_SERIES: [&str; 2] = ["total_gross", "inflation_adjusted_gross"];

fn count_values<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Counts sorted descending. Ties keep alphabetical order.
fn ranked(counts: BTreeMap<&str, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> =
        counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Ranks by count and keeps the first `n`; ties at the cut fall to the
/// stable order.
pub fn top_n(counts: BTreeMap<&str, usize>, n: usize) -> Vec<(String, usize)> {
    let mut ranked = ranked(counts);
    ranked.truncate(n);
    ranked
}

fn bars(ranked: Vec<(String, usize)>) -> Vec<Bar> {
    ranked
        .into_iter()
        .map(|(label, count)| Bar {
            label,
            value: count as f64,
        })
        .collect()
}

fn count_chart(
    name: &'static str,
    field: &'static str,
    title: &str,
    ranked: Vec<(String, usize)>,
) -> Result<ChartSpec, RenderError> {
    if ranked.is_empty() {
        return Err(RenderError::EmptyEncoding { chart: name, field });
    }
    Ok(ChartSpec {
        name,
        title: title.to_string(),
        x_label: field.to_string(),
        y_label: "Count of Records".to_string(),
        y_format: ValueFormat::Plain,
        mark: Mark::Bar { bars: bars(ranked) },
    })
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap_label(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let used = current.chars().count();
            let needed = if current.is_empty() {
                word.len()
            } else {
                used + 1 + word.len()
            };
            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.extend(word.iter());
                break;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                continue;
            }
            let rest = word.split_off(width.max(1));
            lines.push(word.into_iter().collect());
            word = rest;
            if word.is_empty() {
                break;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn genre_count(merged: &[MergedMovie]) -> Result<ChartSpec, RenderError> {
    let counts = count_values(merged.iter().filter_map(|m| m.genre.as_deref()));
    count_chart("genre_count", "genre", "Movies per genre", ranked(counts))
}

pub fn rating_count(merged: &[MergedMovie]) -> Result<ChartSpec, RenderError> {
    let counts = count_values(merged.iter().filter_map(|m| m.mpaa_rating.as_deref()));
    count_chart(
        "rating_count",
        "MPAA_rating",
        "Movies per MPAA rating",
        ranked(counts),
    )
}

pub fn director_count(merged: &[MergedMovie]) -> Result<ChartSpec, RenderError> {
    let counts = count_values(merged.iter().filter_map(|m| m.director.as_deref()));
    count_chart(
        "director_count",
        "director",
        "Top 10 directors by movie count",
        top_n(counts, TOP_N),
    )
}

pub fn voice_actor_count(voice_actors: &[VoiceActor]) -> Result<ChartSpec, RenderError> {
    let counts = count_values(
        voice_actors
            .iter()
            .filter_map(|v| v.voice_actor.as_deref())
            .filter(|actor| *actor != VOICE_ACTOR_PLACEHOLDER),
    );
    count_chart(
        "voice_actor_count",
        "voice-actor",
        "Top 10 voice actors by role count",
        top_n(counts, TOP_N),
    )
}

pub fn director_genres(merged: &[MergedMovie]) -> Result<ChartSpec, RenderError> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for m in merged {
        if let (Some(director), Some(genre)) = (m.director.as_deref(), m.genre.as_deref()) {
            *counts.entry((director, genre)).or_insert(0) += 1;
        }
    }
    if counts.is_empty() {
        return Err(RenderError::EmptyEncoding {
            chart: "director_genres",
            field: "director",
        });
    }

    let mut x_categories: Vec<String> = counts.keys().map(|(d, _)| d.to_string()).collect();
    x_categories.dedup();
    let mut y_categories: Vec<String> = counts.keys().map(|(_, g)| g.to_string()).collect();
    y_categories.sort();
    y_categories.dedup();

    let bubbles = counts
        .into_iter()
        .map(|((x, y), count)| Bubble {
            x: x.to_string(),
            y: y.to_string(),
            count,
        })
        .collect();

    Ok(ChartSpec {
        name: "director_genres",
        title: "Genres per director".to_string(),
        x_label: "director".to_string(),
        y_label: "genre".to_string(),
        y_format: ValueFormat::Plain,
        mark: Mark::Bubble {
            x_categories,
            y_categories,
            bubbles,
        },
    })
}

fn gross_sums<'a>(rows: impl Iterator<Item = &'a MergedMovie>) -> [f64; 2] {
    rows.fold([0.0, 0.0], |acc, m| {
        [
            acc[0] + m.total_gross.unwrap_or(0.0),
            acc[1] + m.inflation_adjusted_gross.unwrap_or(0.0),
        ]
    })
}

pub fn genre_chart(merged: &[MergedMovie]) -> Result<ChartSpec, RenderError> {
    let mut by_genre: BTreeMap<&str, Vec<&MergedMovie>> = BTreeMap::new();
    for m in merged {
        if let Some(genre) = m.genre.as_deref() {
            by_genre.entry(genre).or_default().push(m);
        }
    }
    if by_genre.is_empty() {
        return Err(RenderError::EmptyEncoding {
            chart: "genre_chart",
            field: "genre",
        });
    }

    let mut sums: Vec<(&str, [f64; 2])> = by_genre
        .into_iter()
        .map(|(genre, rows)| (genre, gross_sums(rows.into_iter())))
        .collect();
    sums.sort_by(|a, b| mean(&b.1).total_cmp(&mean(&a.1)));

    let groups = sums
        .into_iter()
        .map(|(genre, values)| BarGroup {
            label: wrap_label(genre, GENRE_LABEL_WIDTH),
            bars: GROSS_SERIES
                .iter()
                .zip(values)
                .map(|(series, value)| Bar {
                    label: series.to_string(),
                    value,
                })
                .collect(),
        })
        .collect();

    Ok(ChartSpec {
        name: "genre_chart",
        title: "Gross per genre".to_string(),
        x_label: "genre".to_string(),
        y_label: "value".to_string(),
        y_format: ValueFormat::Currency,
        mark: Mark::GroupedBar {
            series: GROSS_SERIES.iter().map(|s| s.to_string()).collect(),
            groups,
        },
    })
}

pub fn year_chart(merged: &[MergedMovie]) -> Result<ChartSpec, RenderError> {
    let mut by_year: BTreeMap<i32, [f64; 2]> = BTreeMap::new();
    for m in merged {
        let Some(date) = m.release_date else { continue };
        if date.year() < FIRST_REVENUE_YEAR {
            continue;
        }
        let entry = by_year.entry(date.year()).or_insert([0.0, 0.0]);
        entry[0] += m.total_gross.unwrap_or(0.0);
        entry[1] += m.inflation_adjusted_gross.unwrap_or(0.0);
    }
    if by_year.is_empty() {
        return Err(RenderError::EmptyEncoding {
            chart: "year_chart",
            field: "release_date",
        });
    }

    let series = GROSS_SERIES
        .iter()
        .enumerate()
        .map(|(i, name)| Series {
            name: name.to_string(),
            points: by_year
                .iter()
                .map(|(year, sums)| (*year as f64, sums[i]))
                .collect(),
        })
        .collect();

    Ok(ChartSpec {
        name: "year_chart",
        title: "Gross per release year".to_string(),
        x_label: "release_date (year)".to_string(),
        y_label: "Sum of value".to_string(),
        y_format: ValueFormat::Currency,
        mark: Mark::Line {
            series,
            x_domain: None,
        },
    })
}

pub fn revenue_chart(revenue: &[Revenue]) -> Result<ChartSpec, RenderError> {
    let points: Vec<(f64, f64)> = revenue
        .iter()
        .filter_map(|r| Some((r.year?.year() as f64, r.total?)))
        .collect();
    if points.is_empty() {
        return Err(RenderError::EmptyEncoding {
            chart: "revenue_chart",
            field: "Total",
        });
    }

    Ok(ChartSpec {
        name: "revenue_chart",
        title: "Total revenue per year".to_string(),
        x_label: "Year".to_string(),
        y_label: "Total".to_string(),
        y_format: ValueFormat::Currency,
        mark: Mark::Line {
            series: vec![Series {
                name: "Total".to_string(),
                points,
            }],
            x_domain: Some((FIRST_REVENUE_YEAR as f64, LAST_REVENUE_YEAR as f64)),
        },
    })
}

pub fn revenue_density(revenue: &[Revenue]) -> Result<ChartSpec, RenderError> {
    let series: Vec<Series> = REVENUE_SEGMENTS
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            let values: Vec<f64> = revenue.iter().filter_map(|r| r.segments()[i]).collect();
            if values.is_empty() {
                return None;
            }
            Some(Series {
                name: name.to_string(),
                points: kernel_density(&values, DENSITY_EXTENT, DENSITY_STEPS),
            })
        })
        .collect();
    if series.is_empty() {
        return Err(RenderError::EmptyEncoding {
            chart: "revenue_density",
            field: "value",
        });
    }

    Ok(ChartSpec {
        name: "revenue_density",
        title: "Revenue segment density".to_string(),
        x_label: "value".to_string(),
        y_label: "density".to_string(),
        y_format: ValueFormat::Scientific,
        mark: Mark::Area {
            series,
            x_domain: DENSITY_EXTENT,
            opacity: 0.45,
        },
    })
}
