//! The clean stage: normalize the five raw tables and write them back out.
//!
//! All five tables are read and cleaned in memory before anything is
//! written, so a data error leaves the output directory untouched.

pub mod overrides;
pub mod rules;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

use crate::config::{
    CLEAN_CHARACTERS, CLEAN_DIRECTOR, CLEAN_MOVIES_TOTAL_GROSS, CLEAN_REVENUE,
    CLEAN_VOICE_ACTORS, StagePaths,
};
use crate::error::DataFormatError;
use crate::tables::types::{
    Character, Director, MovieGross, RawCharacter, RawDirector, RawMovieGross, RawRevenue,
    RawVoiceActor, Revenue, VoiceActor,
};
use crate::tables::{Table, read_table, to_csv_bytes, write_atomic};

/// The five source tables exactly as downloaded.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub characters: Vec<RawCharacter>,
    pub director: Vec<RawDirector>,
    pub movies_total_gross: Vec<RawMovieGross>,
    pub revenue: Vec<RawRevenue>,
    pub voice_actors: Vec<RawVoiceActor>,
}

/// The five tables after normalization.
#[derive(Debug, Clone, Default)]
pub struct CleanTables {
    pub characters: Vec<Character>,
    pub director: Vec<Director>,
    pub movies_total_gross: Vec<MovieGross>,
    pub revenue: Vec<Revenue>,
    pub voice_actors: Vec<VoiceActor>,
}

/// Opens `path` and reads it as a `T` table.
pub fn load_file<T>(path: &str) -> Result<Vec<T>>
where
    T: Table + DeserializeOwned,
{
    let file = File::open(path).with_context(|| format!("failed to open '{path}'"))?;
    read_table(file).with_context(|| format!("failed to load '{path}'"))
}

impl RawTables {
    pub fn load(paths: &StagePaths) -> Result<Self> {
        let s = &paths.sources;
        Ok(Self {
            characters: load_file(&s.characters)?,
            director: load_file(&s.director)?,
            movies_total_gross: load_file(&s.movies_total_gross)?,
            revenue: load_file(&s.revenue)?,
            voice_actors: load_file(&s.voice_actors)?,
        })
    }
}

impl CleanTables {
    /// Reads tables previously written by [`CleanTables::write_to`].
    pub fn load(paths: &StagePaths) -> Result<Self> {
        let s = &paths.sources;
        Ok(Self {
            characters: load_file(&s.characters)?,
            director: load_file(&s.director)?,
            movies_total_gross: load_file(&s.movies_total_gross)?,
            revenue: load_file(&s.revenue)?,
            voice_actors: load_file(&s.voice_actors)?,
        })
    }

    /// Writes all five tables into `dir`, creating it if needed.
    ///
    /// Every table is serialized before the first file is touched.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let outputs = [
            (CLEAN_CHARACTERS, to_csv_bytes(&self.characters)?),
            (CLEAN_DIRECTOR, to_csv_bytes(&self.director)?),
            (CLEAN_MOVIES_TOTAL_GROSS, to_csv_bytes(&self.movies_total_gross)?),
            (CLEAN_REVENUE, to_csv_bytes(&self.revenue)?),
            (CLEAN_VOICE_ACTORS, to_csv_bytes(&self.voice_actors)?),
        ];

        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create '{}'", dir.display()))?;

        for (name, bytes) in outputs {
            let path = dir.join(name);
            write_atomic(&path, &bytes)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
        }
        Ok(())
    }
}

/// Applies every table's normalization rules.
pub fn clean_tables(raw: RawTables) -> Result<CleanTables, DataFormatError> {
    Ok(CleanTables {
        characters: rules::clean_characters(raw.characters)?,
        director: rules::clean_director(raw.director),
        movies_total_gross: rules::clean_movies_total_gross(raw.movies_total_gross)?,
        revenue: rules::clean_revenue(raw.revenue)?,
        voice_actors: rules::clean_voice_actors(raw.voice_actors),
    })
}

/// Entry point for the `clean` subcommand.
#[tracing::instrument(skip(paths), fields(out_dir = %paths.out_dir.display()))]
pub fn run(paths: &StagePaths) -> Result<()> {
    let raw = RawTables::load(paths)?;
    let cleaned = clean_tables(raw)?;

    info!(
        characters = cleaned.characters.len(),
        director = cleaned.director.len(),
        movies_total_gross = cleaned.movies_total_gross.len(),
        revenue = cleaned.revenue.len(),
        voice_actors = cleaned.voice_actors.len(),
        "Tables cleaned"
    );

    cleaned.write_to(&paths.out_dir)?;
    info!("Cleaned tables written");
    Ok(())
}
