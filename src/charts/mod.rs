//! Exploratory chart derivations over the merged and un-joined tables.

pub mod builders;
pub mod stats;
pub mod types;

pub use types::{Bar, BarGroup, Bubble, ChartSpec, Mark, Series, ValueFormat};

use crate::clean::CleanTables;
use crate::error::RenderError;
use crate::merge::MergedMovie;

/// File stems of every chart, in build order.
pub const CHART_NAMES: [&str; 9] = [
    "genre_count",
    "rating_count",
    "director_count",
    "director_genres",
    "genre_chart",
    "year_chart",
    "revenue_chart",
    "voice_actor_count",
    "revenue_density",
];

/// Builds every chart. Stops at the first chart whose input is empty.
pub fn build_all(
    merged: &[MergedMovie],
    tables: &CleanTables,
) -> Result<Vec<ChartSpec>, RenderError> {
    Ok(vec![
        builders::genre_count(merged)?,
        builders::rating_count(merged)?,
        builders::director_count(merged)?,
        builders::director_genres(merged)?,
        builders::genre_chart(merged)?,
        builders::year_chart(merged)?,
        builders::revenue_chart(&tables.revenue)?,
        builders::voice_actor_count(&tables.voice_actors)?,
        builders::revenue_density(&tables.revenue)?,
    ])
}
