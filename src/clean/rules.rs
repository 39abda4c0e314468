//! Per-table normalization rules.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::overrides::{
    self, ALADDIN_RELEASE, ALADDIN_TITLE, AMBIGUOUS_DIRECTOR_TITLES, RELEASE_DATE_OVERRIDES,
    RowKey, TITLE_OVERRIDES,
};
use crate::error::DataFormatError;
use crate::tables::dates::parse_date;
use crate::tables::types::{
    Character, Director, MovieGross, RawCharacter, RawDirector, RawMovieGross, RawRevenue,
    RawVoiceActor, Revenue, VoiceActor,
};

/// Strips `$` and `,` and parses what is left as a float. Only finite,
/// non-negative amounts are accepted.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let stripped: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    stripped
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

fn coerce_currency(
    table: &'static str,
    column: &'static str,
    row: usize,
    raw: Option<String>,
) -> Result<Option<f64>, DataFormatError> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => match parse_currency(&value) {
            Some(amount) => Ok(Some(amount)),
            None => Err(DataFormatError::ValueCoercion {
                table,
                column,
                row,
                value,
            }),
        },
    }
}

fn coerce_date(
    table: &'static str,
    column: &'static str,
    row: usize,
    raw: Option<String>,
) -> Result<Option<NaiveDate>, DataFormatError> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => match parse_date(&value) {
            Some(date) => Ok(Some(date)),
            None => Err(DataFormatError::ValueCoercion {
                table,
                column,
                row,
                value,
            }),
        },
    }
}

/// Removes embedded newlines; an empty result becomes null.
fn scrub(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.replace('\n', "")).filter(|s| !s.is_empty())
}

pub fn clean_characters(raw: Vec<RawCharacter>) -> Result<Vec<Character>, DataFormatError> {
    let aladdin = overrides::date(ALADDIN_RELEASE);

    raw.into_iter()
        .enumerate()
        .map(|(row, r)| -> Result<Character, DataFormatError> {
            let movie_title = r.movie_title.replace('\n', "");
            let mut release_date =
                coerce_date("characters", "release_date", row, scrub(r.release_date))?;
            if movie_title == ALADDIN_TITLE {
                release_date = aladdin;
            }
            Ok(Character {
                movie_title,
                release_date,
                hero: scrub(r.hero),
                villain: scrub(r.villain),
                song: scrub(r.song),
            })
        })
        .collect()
}

pub fn clean_director(raw: Vec<RawDirector>) -> Vec<Director> {
    let before = raw.len();
    let cleaned: Vec<Director> = raw
        .into_iter()
        .filter(|r| !AMBIGUOUS_DIRECTOR_TITLES.contains(&r.name.as_str()))
        .map(|r| Director {
            movie_title: r.name,
            director: r.director,
        })
        .collect();

    let dropped = before - cleaned.len();
    if dropped != AMBIGUOUS_DIRECTOR_TITLES.len() {
        warn!(
            dropped,
            expected = AMBIGUOUS_DIRECTOR_TITLES.len(),
            "Unexpected number of ambiguous director rows"
        );
    }
    cleaned
}

pub fn clean_movies_total_gross(
    raw: Vec<RawMovieGross>,
) -> Result<Vec<MovieGross>, DataFormatError> {
    const TABLE: &str = "movies_total_gross";
    let aladdin = overrides::date(ALADDIN_RELEASE);

    let keys: Vec<RowKey<'_>> =
        overrides::occurrences(raw.iter().map(|r| r.movie_title.as_str()));
    let mut applied: HashSet<RowKey<'static>> = HashSet::new();
    let mut rows = Vec::with_capacity(raw.len());

    for (row, (r, key)) in raw.iter().zip(&keys).enumerate() {
        let mut release_date = coerce_date(TABLE, "release_date", row, r.release_date.clone())?;
        if r.movie_title == ALADDIN_TITLE {
            release_date = aladdin;
        }

        if let Some((target, ymd)) = RELEASE_DATE_OVERRIDES
            .iter()
            .find(|(k, _)| k == key)
        {
            debug!(title = target.title, row, "Overriding release date");
            release_date = overrides::date(*ymd);
            applied.insert(*target);
        }

        let mut movie_title = r.movie_title.clone();
        if let Some((target, title)) = TITLE_OVERRIDES.iter().find(|(k, _)| k == key) {
            debug!(from = target.title, to = *title, row, "Disambiguating title");
            movie_title = title.to_string();
            applied.insert(*target);
        }

        rows.push(MovieGross {
            movie_title,
            release_date,
            genre: r.genre.clone(),
            mpaa_rating: r.mpaa_rating.clone(),
            total_gross: coerce_currency(TABLE, "total_gross", row, r.total_gross.clone())?,
            inflation_adjusted_gross: coerce_currency(
                TABLE,
                "inflation_adjusted_gross",
                row,
                r.inflation_adjusted_gross.clone(),
            )?,
        });
    }

    for (key, _) in RELEASE_DATE_OVERRIDES {
        if !applied.contains(key) {
            warn!(
                title = key.title,
                occurrence = key.occurrence,
                "Release date override target not found"
            );
        }
    }
    for (key, _) in TITLE_OVERRIDES {
        if !applied.contains(key) {
            warn!(
                title = key.title,
                occurrence = key.occurrence,
                "Title override target not found"
            );
        }
    }

    Ok(rows)
}

pub fn clean_revenue(raw: Vec<RawRevenue>) -> Result<Vec<Revenue>, DataFormatError> {
    raw.into_iter()
        .enumerate()
        .map(|(row, r)| -> Result<Revenue, DataFormatError> {
            Ok(Revenue {
                year: coerce_date("revenue_1991_2016", "Year", row, r.year)?,
                studio_entertainment: r.studio_entertainment,
                consumer_products: r.consumer_products,
                interactive: r.interactive,
                parks_and_resorts: r.parks_and_resorts,
                media_networks: r.media_networks,
                total: r.total,
            })
        })
        .collect()
}

pub fn clean_voice_actors(raw: Vec<RawVoiceActor>) -> Vec<VoiceActor> {
    raw.into_iter()
        .map(|r| VoiceActor {
            character: r.character,
            voice_actor: r.voice_actor,
            movie_title: r.movie,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn gross(title: &str, date: &str, total: &str) -> RawMovieGross {
        RawMovieGross {
            movie_title: title.to_string(),
            release_date: Some(date.to_string()),
            genre: Some("Adventure".to_string()),
            mpaa_rating: Some("G".to_string()),
            total_gross: Some(total.to_string()),
            inflation_adjusted_gross: Some(total.to_string()),
        }
    }

    fn character(title: &str, date: &str) -> RawCharacter {
        RawCharacter {
            movie_title: title.to_string(),
            release_date: Some(date.to_string()),
            hero: Some("Hero\n".to_string()),
            villain: Some("\n".to_string()),
            song: None,
        }
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$1,000.50"), Some(1000.50));
        assert_eq!(parse_currency("$184,925,485"), Some(184_925_485.0));
        assert_eq!(parse_currency("$0"), Some(0.0));
        assert_eq!(parse_currency("n/a"), None);
    }

    #[test]
    fn test_non_finite_or_negative_currency_is_an_error() {
        for raw in ["NaN", "$inf", "-$5"] {
            let err = clean_movies_total_gross(vec![gross("Bambi", "Aug 13, 1942", raw)])
                .unwrap_err();
            match err {
                DataFormatError::ValueCoercion { column, value, .. } => {
                    assert_eq!(column, "total_gross");
                    assert_eq!(value, raw);
                }
                other => panic!("{raw}: unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_non_numeric_currency_is_an_error() {
        let err = clean_movies_total_gross(vec![gross("Bambi", "Aug 13, 1942", "unknown")])
            .unwrap_err();
        match err {
            DataFormatError::ValueCoercion {
                column, row, value, ..
            } => {
                assert_eq!(column, "total_gross");
                assert_eq!(row, 0);
                assert_eq!(value, "unknown");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_currency_is_null() {
        let mut raw = gross("Bambi", "Aug 13, 1942", "$1");
        raw.inflation_adjusted_gross = Some(String::new());
        let rows = clean_movies_total_gross(vec![raw]).unwrap();
        assert_eq!(rows[0].total_gross, Some(1.0));
        assert_eq!(rows[0].inflation_adjusted_gross, None);
    }

    #[test]
    fn test_aladdin_release_date_is_overridden() {
        let movies =
            clean_movies_total_gross(vec![gross("Aladdin", "Nov 11, 1992", "$217,350,219")])
                .unwrap();
        assert_eq!(movies[0].release_date, ymd(1992, 11, 1));

        let characters = clean_characters(vec![character("Aladdin", "November 25, 1992")]).unwrap();
        assert_eq!(characters[0].release_date, ymd(1992, 11, 1));
    }

    #[test]
    fn test_character_newlines_and_empties() {
        let rows = clean_characters(vec![character("Bambi\n", "August 13, 1942")]).unwrap();
        assert_eq!(rows[0].movie_title, "Bambi");
        assert_eq!(rows[0].hero.as_deref(), Some("Hero"));
        assert_eq!(rows[0].villain, None);
        assert_eq!(rows[0].song, None);
        assert_eq!(rows[0].release_date, ymd(1942, 8, 13));
    }

    #[test]
    fn test_bad_character_date_is_an_error() {
        let err = clean_characters(vec![character("Bambi", "someday")]).unwrap_err();
        assert!(matches!(
            err,
            DataFormatError::ValueCoercion { column: "release_date", .. }
        ));
    }

    #[test]
    fn test_gross_release_date_overrides() {
        let rows = clean_movies_total_gross(vec![
            gross("The Aristocats", "Apr 24, 1980", "$1"),
            gross("Brother Bear", "Oct 24, 2003", "$1"),
            gross("The Princess and the Frog", "Nov 25, 2009", "$1"),
        ])
        .unwrap();
        assert_eq!(rows[0].release_date, ymd(1970, 12, 24));
        assert_eq!(rows[1].release_date, ymd(2003, 11, 1));
        assert_eq!(rows[2].release_date, ymd(2009, 12, 11));
    }

    #[test]
    fn test_re_releases_are_disambiguated() {
        let rows = clean_movies_total_gross(vec![
            gross("The Jungle Book", "Oct 18, 1967", "$1"),
            gross("Cinderella", "Feb 15, 1950", "$1"),
            gross("The Jungle Book", "Dec 25, 1994", "$1"),
            gross("Cinderella", "Mar 13, 2015", "$1"),
            gross("The Jungle Book", "Apr 15, 2016", "$1"),
        ])
        .unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.movie_title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "The Jungle Book",
                "Cinderella",
                "The Jungle Book (b)",
                "Cinderella (b)",
                "The Jungle Book (c)",
            ]
        );
    }

    #[test]
    fn test_director_drops_fantasia_rows() {
        let raw = ["Pinocchio", "Fantasia", "Bambi", "Fantasia 2000"]
            .iter()
            .map(|name| RawDirector {
                name: name.to_string(),
                director: Some("full credits".to_string()),
            })
            .collect();
        let rows = clean_director(raw);
        let titles: Vec<&str> = rows.iter().map(|r| r.movie_title.as_str()).collect();
        assert_eq!(titles, vec!["Pinocchio", "Bambi"]);
    }

    #[test]
    fn test_revenue_year_becomes_date() {
        let rows = clean_revenue(vec![RawRevenue {
            year: Some("1991".to_string()),
            studio_entertainment: Some(2593.0),
            consumer_products: Some(724.0),
            interactive: None,
            parks_and_resorts: Some(2794.0),
            media_networks: None,
            total: Some(6111.0),
        }])
        .unwrap();
        assert_eq!(rows[0].year, ymd(1991, 1, 1));
        assert_eq!(rows[0].total, Some(6111.0));
    }

    #[test]
    fn test_voice_actor_movie_renamed() {
        let rows = clean_voice_actors(vec![RawVoiceActor {
            character: Some("Abu".to_string()),
            voice_actor: Some("Frank Welker".to_string()),
            movie: "Aladdin".to_string(),
        }]);
        assert_eq!(rows[0].movie_title, "Aladdin");
    }
}
