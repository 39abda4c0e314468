//! Joins the cleaned tables into one wide row per movie (and per re-release).

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use tracing::debug;

use crate::clean::CleanTables;
use crate::tables::types::{Character, Director, MovieGross, VoiceActor};

/// One voiced character in a movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastMember {
    pub character: Option<String>,
    pub voice_actor: Option<String>,
}

/// A row of the fully merged table. Any field a source did not supply is null.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedMovie {
    pub movie_title: String,
    pub release_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub mpaa_rating: Option<String>,
    pub total_gross: Option<f64>,
    pub inflation_adjusted_gross: Option<f64>,
    pub hero: Option<String>,
    pub villain: Option<String>,
    pub song: Option<String>,
    pub director: Option<String>,
    /// `None` when the movie has no recorded voice cast.
    pub cast: Option<Vec<CastMember>>,
}

impl MergedMovie {
    fn titled(movie_title: &str) -> Self {
        Self {
            movie_title: movie_title.to_string(),
            ..Default::default()
        }
    }

    fn from_gross(m: &MovieGross) -> Self {
        Self {
            movie_title: m.movie_title.clone(),
            release_date: m.release_date,
            genre: m.genre.clone(),
            mpaa_rating: m.mpaa_rating.clone(),
            total_gross: m.total_gross,
            inflation_adjusted_gross: m.inflation_adjusted_gross,
            ..Default::default()
        }
    }

    fn with_characters(mut self, c: &Character) -> Self {
        self.hero = c.hero.clone();
        self.villain = c.villain.clone();
        self.song = c.song.clone();
        self
    }
}

/// Full outer join of `left` and `right` on the given keys.
///
/// Every left row appears once per matching right row, or once with `None`
/// if nothing matches. Right rows that matched nothing follow, in order.
/// Null keys compare equal to each other.
pub fn outer_join<L, R, K>(
    left: &[L],
    right: &[R],
    left_key: impl Fn(&L) -> K,
    right_key: impl Fn(&R) -> K,
) -> Vec<(Option<L>, Option<R>)>
where
    L: Clone,
    R: Clone,
    K: Eq + Hash,
{
    let mut index: HashMap<K, Vec<usize>> = HashMap::new();
    for (i, r) in right.iter().enumerate() {
        index.entry(right_key(r)).or_default().push(i);
    }

    let mut matched = vec![false; right.len()];
    let mut out = Vec::with_capacity(left.len().max(right.len()));

    for l in left {
        match index.get(&left_key(l)) {
            Some(hits) => {
                for &i in hits {
                    matched[i] = true;
                    out.push((Some(l.clone()), Some(right[i].clone())));
                }
            }
            None => out.push((Some(l.clone()), None)),
        }
    }

    for (r, seen) in right.iter().zip(matched) {
        if !seen {
            out.push((None, Some(r.clone())));
        }
    }

    out
}

/// Collapses voice actor rows into one ordered cast list per movie, keyed by
/// title in sorted order.
pub fn group_cast(voice_actors: &[VoiceActor]) -> BTreeMap<String, Vec<CastMember>> {
    let mut grouped: BTreeMap<String, Vec<CastMember>> = BTreeMap::new();
    for row in voice_actors {
        grouped
            .entry(row.movie_title.clone())
            .or_default()
            .push(CastMember {
                character: row.character.clone(),
                voice_actor: row.voice_actor.clone(),
            });
    }
    grouped
}

/// Gross ⟗ characters on (title, release date), then ⟗ director on title,
/// then ⟗ grouped voice cast on title.
pub fn merge(tables: &CleanTables) -> Vec<MergedMovie> {
    let with_characters: Vec<MergedMovie> = outer_join(
        &tables.movies_total_gross,
        &tables.characters,
        |m| (m.movie_title.clone(), m.release_date),
        |c| (c.movie_title.clone(), c.release_date),
    )
    .into_iter()
    .filter_map(|pair| match pair {
        (Some(m), Some(c)) => Some(MergedMovie::from_gross(&m).with_characters(&c)),
        (Some(m), None) => Some(MergedMovie::from_gross(&m)),
        (None, Some(c)) => Some(MergedMovie {
            release_date: c.release_date,
            ..MergedMovie::titled(&c.movie_title).with_characters(&c)
        }),
        (None, None) => None,
    })
    .collect();
    debug!(rows = with_characters.len(), "Joined gross with characters");

    let with_director: Vec<MergedMovie> = outer_join(
        &with_characters,
        &tables.director,
        |m| m.movie_title.clone(),
        |d: &Director| d.movie_title.clone(),
    )
    .into_iter()
    .filter_map(|pair| match pair {
        (Some(m), Some(d)) => Some(MergedMovie {
            director: d.director,
            ..m
        }),
        (Some(m), None) => Some(m),
        (None, Some(d)) => Some(MergedMovie {
            director: d.director,
            ..MergedMovie::titled(&d.movie_title)
        }),
        (None, None) => None,
    })
    .collect();
    debug!(rows = with_director.len(), "Joined director");

    let cast: Vec<(String, Vec<CastMember>)> =
        group_cast(&tables.voice_actors).into_iter().collect();

    let merged: Vec<MergedMovie> = outer_join(
        &with_director,
        &cast,
        |m| m.movie_title.clone(),
        |(title, _)| title.clone(),
    )
    .into_iter()
    .filter_map(|pair| match pair {
        (Some(m), Some((_, members))) => Some(MergedMovie {
            cast: Some(members),
            ..m
        }),
        (Some(m), None) => Some(m),
        (None, Some((title, members))) => Some(MergedMovie {
            cast: Some(members),
            ..MergedMovie::titled(&title)
        }),
        (None, None) => None,
    })
    .collect();
    debug!(rows = merged.len(), "Joined voice cast");

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(y: i32, m: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, 1)
    }

    fn gross(title: &str, date: Option<NaiveDate>, genre: Option<&str>) -> MovieGross {
        MovieGross {
            movie_title: title.to_string(),
            release_date: date,
            genre: genre.map(str::to_string),
            mpaa_rating: None,
            total_gross: Some(1.0),
            inflation_adjusted_gross: Some(2.0),
        }
    }

    fn character(title: &str, date: Option<NaiveDate>, hero: &str) -> Character {
        Character {
            movie_title: title.to_string(),
            release_date: date,
            hero: Some(hero.to_string()),
            villain: None,
            song: None,
        }
    }

    fn director(title: &str, name: &str) -> Director {
        Director {
            movie_title: title.to_string(),
            director: Some(name.to_string()),
        }
    }

    fn voice(title: &str, character: &str, actor: &str) -> VoiceActor {
        VoiceActor {
            character: Some(character.to_string()),
            voice_actor: Some(actor.to_string()),
            movie_title: title.to_string(),
        }
    }

    fn sample() -> CleanTables {
        CleanTables {
            characters: vec![
                character("Cinderella", ym(1950, 2), "Cinderella"),
                character("Bambi", ym(1942, 8), "Bambi"),
            ],
            director: vec![
                director("Cinderella", "Wilfred Jackson"),
                director("Pinocchio", "Ben Sharpsteen"),
            ],
            movies_total_gross: vec![
                gross("Cinderella", ym(1950, 2), Some("Drama")),
                gross("Cinderella (b)", ym(2015, 3), Some("Drama")),
                gross("Bambi", ym(1942, 9), None),
            ],
            revenue: vec![],
            voice_actors: vec![
                voice("Cinderella", "Cinderella", "Ilene Woods"),
                voice("Cinderella", "Lady Tremaine", "Eleanor Audley"),
                voice("Dumbo", "Timothy Q. Mouse", "Edward Brophy"),
            ],
        }
    }

    #[test]
    fn test_outer_join_keeps_unmatched_both_sides() {
        let left = vec![1, 2, 3];
        let right = vec![3, 4];
        let joined = outer_join(&left, &right, |l| *l, |r| *r);
        assert_eq!(
            joined,
            vec![
                (Some(1), None),
                (Some(2), None),
                (Some(3), Some(3)),
                (None, Some(4)),
            ]
        );
    }

    #[test]
    fn test_outer_join_many_to_many() {
        let left = vec![("a", 1), ("a", 2)];
        let right = vec![("a", 10), ("a", 20)];
        let joined = outer_join(&left, &right, |l| l.0, |r| r.0);
        assert_eq!(joined.len(), 4);
    }

    #[test]
    fn test_outer_join_null_keys_match() {
        let left: Vec<Option<i32>> = vec![None];
        let right: Vec<Option<i32>> = vec![None, None];
        let joined = outer_join(&left, &right, |l| *l, |r| *r);
        assert_eq!(joined.len(), 2);
        assert!(joined.iter().all(|(l, r)| l.is_some() && r.is_some()));
    }

    #[test]
    fn test_group_cast_is_ordered_pairs() {
        let grouped = group_cast(&sample().voice_actors);
        let cinderella = &grouped["Cinderella"];
        assert_eq!(cinderella.len(), 2);
        assert_eq!(cinderella[0].character.as_deref(), Some("Cinderella"));
        assert_eq!(cinderella[0].voice_actor.as_deref(), Some("Ilene Woods"));
        assert_eq!(cinderella[1].character.as_deref(), Some("Lady Tremaine"));
        assert_eq!(cinderella[1].voice_actor.as_deref(), Some("Eleanor Audley"));
    }

    #[test]
    fn test_merge_preserves_every_row() {
        let tables = sample();
        let merged = merge(&tables);

        let grouped_cast = group_cast(&tables.voice_actors).len();
        let largest = [
            tables.movies_total_gross.len(),
            tables.characters.len(),
            tables.director.len(),
            grouped_cast,
        ]
        .into_iter()
        .max()
        .unwrap();
        assert!(merged.len() >= largest);

        // Bambi's dates disagree, so gross and characters stay separate rows.
        let bambi: Vec<_> = merged.iter().filter(|m| m.movie_title == "Bambi").collect();
        assert_eq!(bambi.len(), 2);

        for title in ["Pinocchio", "Dumbo", "Cinderella (b)"] {
            assert!(merged.iter().any(|m| m.movie_title == title), "{title} missing");
        }
    }

    #[test]
    fn test_merge_combines_matching_rows() {
        let merged = merge(&sample());
        let cinderella = merged
            .iter()
            .find(|m| m.movie_title == "Cinderella")
            .unwrap();
        assert_eq!(cinderella.genre.as_deref(), Some("Drama"));
        assert_eq!(cinderella.hero.as_deref(), Some("Cinderella"));
        assert_eq!(cinderella.director.as_deref(), Some("Wilfred Jackson"));
        assert_eq!(cinderella.cast.as_ref().map(Vec::len), Some(2));

        let remake = merged
            .iter()
            .find(|m| m.movie_title == "Cinderella (b)")
            .unwrap();
        assert_eq!(remake.director, None);
        assert_eq!(remake.cast, None);
    }
}
