//! CSV loading and persistence for the five source tables.

pub mod dates;
pub mod types;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::DataFormatError;

/// A table that can be read from a CSV with a known header.
pub trait Table: Sized {
    /// Short name used in logs and errors.
    const NAME: &'static str;
    /// Columns that must be present in the header.
    const COLUMNS: &'static [&'static str];
    /// `(alternative, canonical)` header spellings accepted for a column.
    const ALIASES: &'static [(&'static str, &'static str)] = &[];
}

/// Checks that every column of `T` is present in `headers`.
pub fn require_columns<T: Table>(headers: &csv::StringRecord) -> Result<(), DataFormatError> {
    for &column in T::COLUMNS {
        let present = headers.iter().any(|h| {
            h == column
                || T::ALIASES
                    .iter()
                    .any(|&(alias, canonical)| canonical == column && h == alias)
        });
        if !present {
            return Err(DataFormatError::MissingColumn {
                table: T::NAME,
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Reads every row of a CSV into `T`, after checking the header.
pub fn read_table<T, R>(reader: R) -> Result<Vec<T>, DataFormatError>
where
    T: Table + DeserializeOwned,
    R: Read,
{
    let mut rdr = ReaderBuilder::new().trim(Trim::Headers).from_reader(reader);
    let headers = rdr.headers()?.clone();
    require_columns::<T>(&headers)?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result?;
        rows.push(record);
    }

    debug!(table = T::NAME, rows = rows.len(), "Table loaded");
    Ok(rows)
}

/// Serializes rows to CSV bytes with a header line.
pub fn to_csv_bytes<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, DataFormatError> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| DataFormatError::Csv(csv::Error::from(e.into_error())))
}

/// Writes `bytes` to `path`, replacing any existing file.
///
/// The bytes land in a `.tmp` sibling first and are renamed into place, so a
/// reader never observes a half-written table.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, bytes)?;
    fs::rename(tmp, path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::types::{RawCharacter, RawDirector, VoiceActor};
    use super::*;

    #[test]
    fn test_read_table_checks_header() {
        let csv = "name,directed_by\nBambi,David Hand\n";
        let err = read_table::<RawDirector, _>(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataFormatError::MissingColumn { table: "director", ref column } if column == "director"
        ));
    }

    #[test]
    fn test_read_table_accepts_aliased_header() {
        let csv = "movie_title,release_date,hero,villain,song\n\
                   Bambi,\"August 13, 1942\",Bambi,Hunter,Little April Shower\n";
        let rows = read_table::<RawCharacter, _>(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].villain.as_deref(), Some("Hunter"));
    }

    #[test]
    fn test_read_table_trims_header_whitespace() {
        let csv = " name , director \nBambi,David Hand\n";
        let rows = read_table::<RawDirector, _>(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].name, "Bambi");
    }

    #[test]
    fn test_to_csv_bytes_writes_header_and_nulls() {
        let rows = vec![VoiceActor {
            character: Some("Abu".to_string()),
            voice_actor: None,
            movie_title: "Aladdin".to_string(),
        }];
        let bytes = to_csv_bytes(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "character,voice-actor,movie_title\nAbu,,Aladdin\n");
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");

        write_atomic(&path, b"a\n1\n").unwrap();
        write_atomic(&path, b"a\n2\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n2\n");
        assert!(!dir.path().join("table.csv.tmp").exists());
    }
}
