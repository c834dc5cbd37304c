use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DataError, Result};
use crate::league::League;
use crate::table::Table;

pub fn export_path(dir: &Path, league: League) -> PathBuf {
    dir.join(format!("{}.csv", league.id()))
}

/// Writes `table` as comma-delimited UTF-8 CSV with a header row. Missing
/// cells become empty fields. The file is swapped in from a `.tmp` sibling.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<()> {
    let export_err = |source: io::Error| DataError::Export {
        path: path.to_path_buf(),
        source,
    };

    let bytes = table_to_csv(table).map_err(export_err)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(export_err)?;
    }
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, bytes).map_err(export_err)?;
    fs::rename(&tmp, path).map_err(export_err)?;
    Ok(())
}

pub fn table_to_csv(table: &Table) -> io::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|cell| match cell {
            Some(value) => value.to_string(),
            None => String::new(),
        }))?;
    }
    wtr.into_inner().map_err(|err| err.into_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn renders_header_and_blank_missing_cells() {
        let table = Table::from_rows(
            vec!["game_id".to_string(), "HomeTeam".to_string(), "lat".to_string()],
            vec![
                vec![Some("a1b2c3d4".into()), Some("Arsenal".into()), Some(Value::Float(51.5549))],
                vec![Some("e5f6g7h8".into()), Some("Unmapped, FC".into()), None],
            ],
        );
        let text = String::from_utf8(table_to_csv(&table).unwrap()).unwrap();
        assert_eq!(
            text,
            "game_id,HomeTeam,lat\na1b2c3d4,Arsenal,51.5549\ne5f6g7h8,\"Unmapped, FC\",\n"
        );
    }

    #[test]
    fn export_file_is_named_after_the_league() {
        assert_eq!(
            export_path(Path::new("out"), League::SerieA),
            PathBuf::from("out/serie_a.csv")
        );
    }
}
