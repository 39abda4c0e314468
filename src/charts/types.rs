//! Serializable chart descriptions, independent of any renderer.

use serde::Serialize;

/// How values on the quantitative axis are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    Plain,
    /// Dollar amounts with an SI suffix, e.g. `$1.2G`.
    Currency,
    Scientific,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// One column of a grouped bar chart: a wrapped label and one bar per series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub label: Vec<String>,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    pub x: String,
    pub y: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mark", rename_all = "snake_case")]
pub enum Mark {
    /// One bar per category, each in its own color.
    Bar { bars: Vec<Bar> },
    GroupedBar {
        series: Vec<String>,
        groups: Vec<BarGroup>,
    },
    /// Categorical x/y grid with a circle sized by count.
    Bubble {
        x_categories: Vec<String>,
        y_categories: Vec<String>,
        bubbles: Vec<Bubble>,
    },
    Line {
        series: Vec<Series>,
        x_domain: Option<(f64, f64)>,
    },
    /// Overlaid translucent areas.
    Area {
        series: Vec<Series>,
        x_domain: (f64, f64),
        opacity: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// File stem the chart is saved under.
    pub name: &'static str,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_format: ValueFormat,
    #[serde(flatten)]
    pub mark: Mark,
}

impl ChartSpec {
    /// Number of distinct categories (bars, groups, or series) in the chart.
    pub fn category_count(&self) -> usize {
        match &self.mark {
            Mark::Bar { bars } => bars.len(),
            Mark::GroupedBar { groups, .. } => groups.len(),
            Mark::Bubble { bubbles, .. } => bubbles.len(),
            Mark::Line { series, .. } | Mark::Area { series, .. } => series.len(),
        }
    }
}
