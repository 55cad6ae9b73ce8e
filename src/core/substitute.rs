//! Value -> key substitution over a piece of text.
//!
//! Two strategies exist because pairs can interact: when one pair's key is
//! another pair's value, applying them one after the other cascades.
//! `Sequential` reproduces that cascade in mapping order; `Simultaneous`
//! matches every value against the original text in a single pass.

use crate::error::{Error, Result};
use crate::mapping::{Mapping, MappingPair};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Replace each pair in mapping order against the running buffer.
    #[default]
    Sequential,
    /// Single left-to-right scan of the original text, longest value wins.
    Simultaneous,
}

impl Strategy {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "sequential" => Ok(Strategy::Sequential),
            "simultaneous" => Ok(Strategy::Simultaneous),
            _ => Err(Error::validation_invalid_argument(
                "strategy",
                format!("Unknown strategy '{}'. Use: sequential, simultaneous", s),
                None,
                Some(vec!["sequential".to_string(), "simultaneous".to_string()]),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Simultaneous => "simultaneous",
        }
    }
}

/// Result of substituting over one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub replacements: usize,
}

impl Substitution {
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Substitute every mapped value with its key in `text`.
pub fn apply(text: &str, mapping: &Mapping, strategy: Strategy) -> Substitution {
    match strategy {
        Strategy::Sequential => apply_sequential(text, mapping),
        Strategy::Simultaneous => apply_simultaneous(text, mapping),
    }
}

fn apply_sequential(text: &str, mapping: &Mapping) -> Substitution {
    let mut buffer = text.to_string();
    let mut replacements = 0;

    for pair in mapping {
        let count = buffer.matches(pair.value.as_str()).count();
        if count == 0 {
            continue;
        }
        buffer = buffer.replace(pair.value.as_str(), &pair.key);
        replacements += count;
    }

    Substitution {
        text: buffer,
        replacements,
    }
}

fn apply_simultaneous(text: &str, mapping: &Mapping) -> Substitution {
    // Longest-first so a shorter value never claims part of a longer match.
    // The sort is stable: equal lengths keep mapping order.
    let mut candidates: Vec<&MappingPair> = mapping.iter().collect();
    candidates.sort_by(|a, b| b.value.len().cmp(&a.value.len()));

    let mut output = String::with_capacity(text.len());
    let mut replacements = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        if let Some(pair) = candidates.iter().find(|p| rest.starts_with(p.value.as_str())) {
            output.push_str(&pair.key);
            pos += pair.value.len();
            replacements += 1;
            continue;
        }

        // Advance by one char; `pos` always sits on a char boundary.
        let Some(ch) = rest.chars().next() else {
            break;
        };
        output.push(ch);
        pos += ch.len_utf8();
    }

    Substitution {
        text: output,
        replacements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> Mapping {
        Mapping::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn sequential_replaces_every_occurrence() {
        let m = mapping(&[("A", "Z")]);
        let result = apply("value=Z, other=ZZ", &m, Strategy::Sequential);
        assert_eq!(result.text, "value=A, other=AA");
        assert_eq!(result.replacements, 3);
    }

    #[test]
    fn sequential_cascades_in_mapping_order() {
        // Y -> X, then X -> W: the X produced by the first pair is rewritten again.
        let m = mapping(&[("X", "Y"), ("W", "X")]);
        let result = apply("Y", &m, Strategy::Sequential);
        assert_eq!(result.text, "W");
    }

    #[test]
    fn simultaneous_does_not_cascade() {
        let m = mapping(&[("X", "Y"), ("W", "X")]);
        let result = apply("YX", &m, Strategy::Simultaneous);
        assert_eq!(result.text, "XW");
        assert_eq!(result.replacements, 2);
    }

    #[test]
    fn simultaneous_prefers_longest_value() {
        let m = mapping(&[("short", "ab"), ("long", "abc")]);
        let result = apply("abcab", &m, Strategy::Simultaneous);
        assert_eq!(result.text, "longshort");
    }

    #[test]
    fn simultaneous_handles_multibyte_text() {
        let m = mapping(&[("A", "Z")]);
        let result = apply("ünïZcödé", &m, Strategy::Simultaneous);
        assert_eq!(result.text, "ünïAcödé");
    }

    #[test]
    fn empty_mapping_is_identity() {
        let m = Mapping::default();
        for strategy in [Strategy::Sequential, Strategy::Simultaneous] {
            let result = apply("anything at all", &m, strategy);
            assert_eq!(result.text, "anything at all");
            assert!(!result.changed());
        }
    }

    #[test]
    fn strategy_from_str_rejects_unknown() {
        assert_eq!(Strategy::from_str("simultaneous").unwrap(), Strategy::Simultaneous);
        let err = Strategy::from_str("parallel").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }
}
