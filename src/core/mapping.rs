//! Substitution table loaded from a comma-delimited mapping file.
//!
//! Each line is `key,value[,ignored...]`. The `value` is the pattern searched
//! for; the `key` is what replaces it. Lines with fewer than two fields are
//! skipped. There is no header row and no quoting.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Default mapping file name, resolved against the working directory.
pub const DEFAULT_MAPPING_FILE: &str = "IDMapping.csv";

/// One `(key, value)` row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingPair {
    /// Replacement text.
    pub key: String,
    /// Search pattern.
    pub value: String,
}

/// Ordered, read-only substitution table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    pairs: Vec<MappingPair>,
}

impl Mapping {
    /// Build a mapping from `(key, value)` pairs, enforcing the same rules as
    /// the file loader.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut builder = Builder::new("<inline>");
        for (index, (key, value)) in pairs.into_iter().enumerate() {
            builder.push(index + 1, key.into(), value.into())?;
        }
        Ok(builder.finish())
    }

    /// Parse mapping text. `source` names the origin in error details.
    pub fn parse(text: &str, source: &str) -> Result<Self> {
        let mut builder = Builder::new(source);
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        for (index, line) in text.lines().enumerate() {
            let mut fields = line.split(',');
            let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
                continue;
            };
            builder.push(index + 1, key.to_string(), value.to_string())?;
        }

        Ok(builder.finish())
    }

    /// Load and parse a mapping file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::mapping_not_found(path.display().to_string()));
        }

        let text = crate::utils::io::read_text(path, &format!("read mapping {}", path.display()))?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MappingPair> {
        self.pairs.iter()
    }

    pub fn pairs(&self) -> &[MappingPair] {
        &self.pairs
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a MappingPair;
    type IntoIter = std::slice::Iter<'a, MappingPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

struct Builder<'s> {
    source: &'s str,
    pairs: Vec<MappingPair>,
    seen: HashMap<String, usize>,
}

impl<'s> Builder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            pairs: Vec::new(),
            seen: HashMap::new(),
        }
    }

    fn push(&mut self, line: usize, key: String, value: String) -> Result<()> {
        if value.is_empty() {
            return Err(Error::mapping_invalid_line(
                self.source,
                line,
                format!("empty search value for key '{}'", key),
            ));
        }

        if let Some(&first_line) = self.seen.get(&key) {
            return Err(Error::mapping_duplicate_key(
                self.source,
                key,
                first_line,
                line,
            ));
        }

        self.seen.insert(key.clone(), line);
        self.pairs.push(MappingPair { key, value });
        Ok(())
    }

    fn finish(self) -> Mapping {
        Mapping { pairs: self.pairs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_keeps_file_order_and_ignores_extra_fields() {
        let mapping = Mapping::parse("A,Z\nB,Y,comment,more\n", "test").unwrap();

        let pairs: Vec<(&str, &str)> = mapping
            .iter()
            .map(|p| (p.key.as_str(), p.value.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "Z"), ("B", "Y")]);
    }

    #[test]
    fn parse_skips_lines_with_fewer_than_two_fields() {
        let mapping = Mapping::parse("\nonlyone\nA,Z\n   \n", "test").unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.pairs()[0].key, "A");
    }

    #[test]
    fn parse_only_malformed_lines_yields_empty_mapping() {
        let mapping = Mapping::parse("one\ntwo\n\n", "test").unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn parse_handles_crlf_and_missing_trailing_newline() {
        let mapping = Mapping::parse("A,Z\r\nB,Y", "test").unwrap();
        assert_eq!(mapping.pairs()[0].value, "Z");
        assert_eq!(mapping.pairs()[1].value, "Y");
    }

    #[test]
    fn parse_strips_leading_byte_order_mark() {
        let mapping = Mapping::parse("\u{feff}A,Z\nB,Y\n", "test").unwrap();
        assert_eq!(mapping.pairs()[0].key, "A");
        assert_eq!(mapping.pairs()[1].key, "B");
    }

    #[test]
    fn load_strips_byte_order_mark_from_exported_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("IDMapping.csv");
        std::fs::write(&path, b"\xef\xbb\xbfA,Z\r\n").unwrap();

        let mapping = Mapping::load(&path).unwrap();

        assert_eq!(mapping.pairs()[0].key, "A");
        assert_eq!(mapping.pairs()[0].value, "Z");
    }

    #[test]
    fn parse_does_not_trim_fields() {
        let mapping = Mapping::parse(" A, Z", "test").unwrap();
        assert_eq!(mapping.pairs()[0].key, " A");
        assert_eq!(mapping.pairs()[0].value, " Z");
    }

    #[test]
    fn parse_rejects_duplicate_keys() {
        let err = Mapping::parse("A,Z\nB,Y\nA,X\n", "test").unwrap_err();
        assert_eq!(err.code.as_str(), "mapping.duplicate_key");
        assert_eq!(err.details["firstLine"], 1);
        assert_eq!(err.details["duplicateLine"], 3);
    }

    #[test]
    fn parse_rejects_empty_value() {
        let err = Mapping::parse("A,\n", "test").unwrap_err();
        assert_eq!(err.code.as_str(), "mapping.invalid_line");
    }

    #[test]
    fn load_missing_file_is_mapping_not_found() {
        let dir = tempdir().unwrap();
        let err = Mapping::load(&dir.path().join("IDMapping.csv")).unwrap_err();
        assert_eq!(err.code.as_str(), "mapping.not_found");
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("IDMapping.csv");
        std::fs::write(&path, "A,Z\n").unwrap();

        let mapping = Mapping::load(&path).unwrap();
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn from_pairs_applies_same_rules() {
        assert!(Mapping::from_pairs([("A", "Z"), ("A", "Y")]).is_err());
        assert_eq!(Mapping::from_pairs([("A", "Z")]).unwrap().len(), 1);
    }
}
