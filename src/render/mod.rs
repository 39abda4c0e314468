//! Turning chart descriptions into image files.
//!
//! [`ChartRenderer`] is the seam between chart construction and output.
//! [`PlottersRenderer`] is the production implementation; the format is
//! chosen from the target file's extension.

mod draw;

use plotters::prelude::*;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::charts::ChartSpec;
use crate::error::RenderError;

/// The two image formats charts can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    /// Picks the format from a path's extension.
    pub fn for_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl FromStr for ImageFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            _ => Err(RenderError::UnsupportedFormat(s.to_string())),
        }
    }
}

pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<(), RenderError>;
}

/// Draws charts with `plotters`, to a bitmap for png and to SVG for svg.
pub struct PlottersRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<(), RenderError> {
        let format = ImageFormat::for_path(path)?;
        debug!(chart = spec.name, path = %path.display(), ?format, "Rendering chart");

        let size = (self.width, self.height);
        let drawn = match format {
            ImageFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                draw::draw(&root, spec).map_err(|e| e.to_string())
            }
            ImageFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                draw::draw(&root, spec).map_err(|e| e.to_string())
            }
        };

        drawn.map_err(|message| RenderError::Draw {
            chart: spec.name.to_string(),
            message,
        })
    }
}

/// Formats an axis value per the chart's [`ValueFormat`](crate::charts::ValueFormat).
pub fn format_value(value: f64, format: crate::charts::ValueFormat) -> String {
    use crate::charts::ValueFormat;

    match format {
        ValueFormat::Plain => {
            if value.fract() == 0.0 {
                format!("{value:.0}")
            } else {
                format!("{value:.2}")
            }
        }
        ValueFormat::Currency => format!("${}", si(value)),
        ValueFormat::Scientific => format!("{value:.1e}"),
    }
}

/// Three significant digits with an SI suffix and trailing zeros trimmed.
fn si(value: f64) -> String {
    const PREFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "k")];

    let (scaled, suffix) = PREFIXES
        .iter()
        .find(|(scale, _)| value.abs() >= *scale)
        .map(|(scale, suffix)| (value / scale, *suffix))
        .unwrap_or((value, ""));

    let digits = if scaled.abs() >= 100.0 {
        0
    } else if scaled.abs() >= 10.0 {
        1
    } else {
        2
    };
    let mut text = format!("{scaled:.digits$}");
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{text}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ValueFormat;

    #[test]
    fn test_image_format_from_extension() {
        assert_eq!(
            ImageFormat::for_path(Path::new("out/genre_count.png")).unwrap(),
            ImageFormat::Png
        );
        assert_eq!(
            ImageFormat::for_path(Path::new("out/genre_count.SVG")).unwrap(),
            ImageFormat::Svg
        );
    }

    #[test]
    fn test_image_format_rejects_others() {
        for path in ["chart.jpg", "chart.pdf", "chart"] {
            let err = ImageFormat::for_path(Path::new(path)).unwrap_err();
            assert!(matches!(err, RenderError::UnsupportedFormat(_)));
        }
    }

    #[test]
    fn test_renderer_rejects_unsupported_format_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genre_count.gif");
        let spec = ChartSpec {
            name: "genre_count",
            title: "t".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            y_format: ValueFormat::Plain,
            mark: crate::charts::Mark::Bar { bars: vec![] },
        };

        let err = PlottersRenderer::default().render(&spec, &path).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(ref ext) if ext == "gif"));
        assert!(!path.exists());
    }

    #[test]
    fn test_renderer_draws_bar_chart_to_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genre_count.svg");
        let spec = ChartSpec {
            name: "genre_count",
            title: "Movies per genre".to_string(),
            x_label: "genre".to_string(),
            y_label: "Count of Records".to_string(),
            y_format: ValueFormat::Plain,
            mark: crate::charts::Mark::Bar {
                bars: vec![
                    crate::charts::Bar {
                        label: "Adventure".to_string(),
                        value: 12.0,
                    },
                    crate::charts::Bar {
                        label: "Comedy".to_string(),
                        value: 7.0,
                    },
                ],
            },
        };

        PlottersRenderer::default().render(&spec, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<rect"));
        assert!(svg.contains("Movies per genre"));
    }

    #[test]
    fn test_currency_format() {
        assert_eq!(format_value(1_500_000_000.0, ValueFormat::Currency), "$1.5G");
        assert_eq!(format_value(250_000_000.0, ValueFormat::Currency), "$250M");
        assert_eq!(format_value(12_000.0, ValueFormat::Currency), "$12k");
        assert_eq!(format_value(0.0, ValueFormat::Currency), "$0");
    }

    #[test]
    fn test_plain_format() {
        assert_eq!(format_value(12.0, ValueFormat::Plain), "12");
        assert_eq!(format_value(0.5, ValueFormat::Plain), "0.50");
    }
}
