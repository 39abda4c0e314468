//! Explicit per-stage path configuration.
//!
//! Every stage takes the same shape of input: one location per source table
//! plus an output directory. `main` builds a [`StagePaths`] from the command
//! line and hands it to the stage entry point.

use std::path::{Path, PathBuf};

/// File names the download stage writes into its output directory.
pub const RAW_CHARACTERS: &str = "disney-characters.csv";
pub const RAW_DIRECTOR: &str = "disney_director.csv";
pub const RAW_MOVIES_TOTAL_GROSS: &str = "disney_movies_total_gross.csv";
pub const RAW_REVENUE: &str = "disney_revenue_1991_2016.csv";
pub const RAW_VOICE_ACTORS: &str = "disney_voice_actors.csv";

/// File names the clean stage writes into its output directory.
pub const CLEAN_CHARACTERS: &str = "disney_characters.csv";
pub const CLEAN_DIRECTOR: &str = "disney_director.csv";
pub const CLEAN_MOVIES_TOTAL_GROSS: &str = "disney_movies_total_gross.csv";
pub const CLEAN_REVENUE: &str = "disney_revenue_1991_2016.csv";
pub const CLEAN_VOICE_ACTORS: &str = "disney_voice_actors.csv";

/// Locations of the five source tables. Interpreted as URLs by the download
/// stage and as file paths by the others.
#[derive(Debug, Clone)]
pub struct Sources {
    pub characters: String,
    pub director: String,
    pub movies_total_gross: String,
    pub revenue: String,
    pub voice_actors: String,
}

impl Sources {
    /// Points every source at its conventional file name inside `dir`.
    pub fn in_dir(dir: &Path, names: [&str; 5]) -> Self {
        let at = |name: &str| dir.join(name).to_string_lossy().into_owned();
        Self {
            characters: at(names[0]),
            director: at(names[1]),
            movies_total_gross: at(names[2]),
            revenue: at(names[3]),
            voice_actors: at(names[4]),
        }
    }

    /// The raw files as laid out by the download stage.
    pub fn raw_in(dir: &Path) -> Self {
        Self::in_dir(
            dir,
            [
                RAW_CHARACTERS,
                RAW_DIRECTOR,
                RAW_MOVIES_TOTAL_GROSS,
                RAW_REVENUE,
                RAW_VOICE_ACTORS,
            ],
        )
    }

    /// The cleaned files as laid out by the clean stage.
    pub fn cleaned_in(dir: &Path) -> Self {
        Self::in_dir(
            dir,
            [
                CLEAN_CHARACTERS,
                CLEAN_DIRECTOR,
                CLEAN_MOVIES_TOTAL_GROSS,
                CLEAN_REVENUE,
                CLEAN_VOICE_ACTORS,
            ],
        )
    }
}

#[derive(Debug, Clone)]
pub struct StagePaths {
    pub sources: Sources,
    pub out_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaned_in_joins_names() {
        let sources = Sources::cleaned_in(Path::new("data/processed"));
        assert!(sources.characters.ends_with("disney_characters.csv"));
        assert!(sources.revenue.starts_with("data/processed"));
    }

    #[test]
    fn test_raw_and_cleaned_character_names_differ() {
        assert_ne!(RAW_CHARACTERS, CLEAN_CHARACTERS);
    }
}
