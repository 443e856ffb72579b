//! Gazetteer file loading.
//!
//! Gazetteer files are JSON arrays of `{literal, type, subcategory}` objects.
//! Encoding and schema problems are rejected here, at load time; the matcher
//! never sees an invalid entry.

use std::path::Path;

use tracing::debug;

use super::{GazetteerEntry, GazetteerError};

/// Load and validate the entries of one gazetteer file.
pub fn load_entries(path: &Path) -> Result<Vec<GazetteerEntry>, GazetteerError> {
    let bytes = std::fs::read(path).map_err(|source| GazetteerError::FileRead {
        path: path.display().to_string(),
        source,
    })?;

    // Reject non-UTF-8 input here rather than letting match-time slicing panic.
    let content = String::from_utf8(bytes).map_err(|_| GazetteerError::InvalidEncoding {
        path: path.display().to_string(),
    })?;

    let entries: Vec<GazetteerEntry> =
        serde_json::from_str(&content).map_err(|source| GazetteerError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    debug!(
        path = %path.display(),
        entries = entries.len(),
        "loaded gazetteer file"
    );

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_valid_json_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"literal": "Evergreen Terrace", "type": "location", "subcategory": "landmarks"}}]"#
        )
        .unwrap();

        let entries = load_entries(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].literal, "Evergreen Terrace");
        assert_eq!(entries[0].subcategory, "landmarks");
    }

    #[test]
    fn rejects_non_utf8_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x5b, 0xff, 0xfe, 0x5d]).unwrap();

        assert!(matches!(
            load_entries(file.path()),
            Err(GazetteerError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn rejects_missing_files() {
        assert!(matches!(
            load_entries(Path::new("/nonexistent/gazetteer.json")),
            Err(GazetteerError::FileRead { .. })
        ));
    }
}
