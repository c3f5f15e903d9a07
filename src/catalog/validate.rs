// src/catalog/validate.rs
// Sanity checks for a catalog CSV before it is used for quizzing.

use std::path::Path;

use crate::error::CatalogError;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "image_url",
    "species_code",
    "common_name",
    "group_id",
    "license",
    "credit",
];

/// Checks that every required column exists and no row leaves one blank.
/// Returns the number of data rows on success.
pub fn validate_csv(path: &Path) -> Result<usize, CatalogError> {
    // Short rows count as blank trailing columns rather than a parse error.
    let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CatalogError::MissingColumns(missing));
    }

    let indices: Vec<(&str, usize)> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|col| headers.iter().position(|h| h == *col).map(|i| (*col, i)))
        .collect();

    let mut rows = 0;
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        for &(column, idx) in &indices {
            if record.get(idx).map_or(true, |v| v.trim().is_empty()) {
                return Err(CatalogError::BlankValue {
                    column: column.to_string(),
                    // +1 for the header, +1 for 1-based lines
                    line: row_idx + 2,
                });
            }
        }
        rows += 1;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validate_ok() {
        let file = csv_file("image_url,species_code,common_name,group_id,license,credit\nu,x,y,g,l,c\n");
        assert_eq!(validate_csv(file.path()).unwrap(), 1);
    }

    #[test]
    fn test_validate_missing_columns() {
        let file = csv_file("image_url,common_name\nhttps://example.com,img\n");
        match validate_csv(file.path()) {
            Err(CatalogError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["species_code", "group_id", "license", "credit"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_blank_value() {
        let file = csv_file(
            "image_url,species_code,common_name,group_id,license,credit\n\
             u,x,y,g,l,c\n\
             u,z,,g,l,c\n",
        );
        match validate_csv(file.path()) {
            Err(CatalogError::BlankValue { column, line }) => {
                assert_eq!(column, "common_name");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_short_row_is_blank_value() {
        let file = csv_file(
            "image_url,species_code,common_name,group_id,license,credit\n\
             u,x,y\n",
        );
        match validate_csv(file.path()) {
            Err(CatalogError::BlankValue { column, line }) => {
                assert_eq!(column, "group_id");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
