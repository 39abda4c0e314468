//! Row types for the five source tables, in raw and cleaned form.
//!
//! Raw rows keep every cell as it appears upstream (currency and dates as
//! strings) so the cleaner can report exactly which value failed to coerce.
//! Cleaned rows carry the final column names and typed values, and are what
//! the clean stage writes and the eda stage reads back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Table;
use super::dates::{iso_date, year_month};

// ---------------------------------------------------------------------------
// Raw
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RawCharacter {
    pub movie_title: String,
    pub release_date: Option<String>,
    pub hero: Option<String>,
    #[serde(rename = "villian", alias = "villain")]
    pub villain: Option<String>,
    pub song: Option<String>,
}

impl Table for RawCharacter {
    const NAME: &'static str = "characters";
    const COLUMNS: &'static [&'static str] =
        &["movie_title", "release_date", "hero", "villian", "song"];
    const ALIASES: &'static [(&'static str, &'static str)] = &[("villain", "villian")];
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDirector {
    pub name: String,
    pub director: Option<String>,
}

impl Table for RawDirector {
    const NAME: &'static str = "director";
    const COLUMNS: &'static [&'static str] = &["name", "director"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMovieGross {
    pub movie_title: String,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    #[serde(rename = "MPAA_rating")]
    pub mpaa_rating: Option<String>,
    pub total_gross: Option<String>,
    pub inflation_adjusted_gross: Option<String>,
}

impl Table for RawMovieGross {
    const NAME: &'static str = "movies_total_gross";
    const COLUMNS: &'static [&'static str] = &[
        "movie_title",
        "release_date",
        "genre",
        "MPAA_rating",
        "total_gross",
        "inflation_adjusted_gross",
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRevenue {
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Studio Entertainment[NI 1]")]
    pub studio_entertainment: Option<f64>,
    #[serde(rename = "Disney Consumer Products[NI 2]")]
    pub consumer_products: Option<f64>,
    #[serde(rename = "Disney Interactive[NI 3][Rev 1]")]
    pub interactive: Option<f64>,
    #[serde(rename = "Walt Disney Parks and Resorts")]
    pub parks_and_resorts: Option<f64>,
    #[serde(rename = "Disney Media Networks")]
    pub media_networks: Option<f64>,
    #[serde(rename = "Total")]
    pub total: Option<f64>,
}

impl Table for RawRevenue {
    const NAME: &'static str = "revenue_1991_2016";
    const COLUMNS: &'static [&'static str] = &[
        "Year",
        "Studio Entertainment[NI 1]",
        "Disney Consumer Products[NI 2]",
        "Disney Interactive[NI 3][Rev 1]",
        "Walt Disney Parks and Resorts",
        "Disney Media Networks",
        "Total",
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVoiceActor {
    pub character: Option<String>,
    #[serde(rename = "voice-actor")]
    pub voice_actor: Option<String>,
    pub movie: String,
}

impl Table for RawVoiceActor {
    const NAME: &'static str = "voice_actors";
    const COLUMNS: &'static [&'static str] = &["character", "voice-actor", "movie"];
}

// ---------------------------------------------------------------------------
// Cleaned
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub movie_title: String,
    #[serde(with = "year_month")]
    pub release_date: Option<NaiveDate>,
    pub hero: Option<String>,
    #[serde(rename = "villian", alias = "villain")]
    pub villain: Option<String>,
    pub song: Option<String>,
}

impl Table for Character {
    const NAME: &'static str = "characters";
    const COLUMNS: &'static [&'static str] =
        &["movie_title", "release_date", "hero", "villian", "song"];
    const ALIASES: &'static [(&'static str, &'static str)] = &[("villain", "villian")];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub movie_title: String,
    pub director: Option<String>,
}

impl Table for Director {
    const NAME: &'static str = "director";
    const COLUMNS: &'static [&'static str] = &["movie_title", "director"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieGross {
    pub movie_title: String,
    #[serde(with = "year_month")]
    pub release_date: Option<NaiveDate>,
    pub genre: Option<String>,
    #[serde(rename = "MPAA_rating")]
    pub mpaa_rating: Option<String>,
    pub total_gross: Option<f64>,
    pub inflation_adjusted_gross: Option<f64>,
}

impl Table for MovieGross {
    const NAME: &'static str = "movies_total_gross";
    const COLUMNS: &'static [&'static str] = RawMovieGross::COLUMNS;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    #[serde(rename = "Year", with = "iso_date")]
    pub year: Option<NaiveDate>,
    #[serde(rename = "Studio Entertainment")]
    pub studio_entertainment: Option<f64>,
    #[serde(rename = "Disney Consumer Products")]
    pub consumer_products: Option<f64>,
    #[serde(rename = "Disney Interactive")]
    pub interactive: Option<f64>,
    #[serde(rename = "Walt Disney Parks and Resorts")]
    pub parks_and_resorts: Option<f64>,
    #[serde(rename = "Disney Media Networks")]
    pub media_networks: Option<f64>,
    #[serde(rename = "Total")]
    pub total: Option<f64>,
}

/// Revenue segment column names, in column order.
pub const REVENUE_SEGMENTS: [&str; 6] = [
    "Studio Entertainment",
    "Disney Consumer Products",
    "Disney Interactive",
    "Walt Disney Parks and Resorts",
    "Disney Media Networks",
    "Total",
];

impl Revenue {
    /// Segment values in [`REVENUE_SEGMENTS`] order.
    pub fn segments(&self) -> [Option<f64>; 6] {
        [
            self.studio_entertainment,
            self.consumer_products,
            self.interactive,
            self.parks_and_resorts,
            self.media_networks,
            self.total,
        ]
    }
}

impl Table for Revenue {
    const NAME: &'static str = "revenue_1991_2016";
    const COLUMNS: &'static [&'static str] = &[
        "Year",
        "Studio Entertainment",
        "Disney Consumer Products",
        "Disney Interactive",
        "Walt Disney Parks and Resorts",
        "Disney Media Networks",
        "Total",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceActor {
    pub character: Option<String>,
    #[serde(rename = "voice-actor")]
    pub voice_actor: Option<String>,
    pub movie_title: String,
}

impl Table for VoiceActor {
    const NAME: &'static str = "voice_actors";
    const COLUMNS: &'static [&'static str] = &["character", "voice-actor", "movie_title"];
}
