//! # Prefixed parameter names
//!
//! Timing models carry families of parameters whose name is a prefix followed
//! by an index: spin derivatives (`F0`, `F1`, …), DMX ranges (`DMX_0001`,
//! `DMXR1_0001`), noise parameters (`T2EFAC1`). [`split_prefixed_name`] takes
//! such a name apart.
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pulsar_errors::PrefixError;

/// Name patterns, tried in order.
///
/// * `T2EFAC2`-like: letters, digits, letters, then the index
/// * `F12`-like: letters then the index
/// * `DMXR1_3`-like: alphanumerics ending with `_`, then the index
static PREFIX_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^([a-zA-Z]*\d+[a-zA-Z]+)(\d+)$"),
        Regex::new(r"^([a-zA-Z]+)(\d+)$"),
        Regex::new(r"^([a-zA-Z0-9]+_)(\d+)$"),
    ]
    .map(|re| re.expect("prefix patterns are valid regular expressions"))
});

/// A name split into its prefix and index.
///
/// `prefix + index_str` rebuilds the original name; `index_str` keeps any
/// leading zeros that `index` loses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefixedName {
    pub prefix: String,
    pub index_str: String,
    pub index: u64,
}

impl PrefixedName {
    /// The original name.
    pub fn name(&self) -> String {
        format!("{}{}", self.prefix, self.index_str)
    }

    /// Same family, another index, formatted with the same zero padding.
    pub fn with_index(&self, index: u64) -> PrefixedName {
        let index_str = format!("{:0width$}", index, width = self.index_str.len());
        PrefixedName {
            prefix: self.prefix.clone(),
            index_str,
            index,
        }
    }
}

impl std::fmt::Display for PrefixedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix, self.index_str)
    }
}

/// Split a prefixed name into prefix, index text and index value.
///
/// A pattern match is only accepted when it agrees with the underscores of the
/// name: if `name` contains `_`, the prefix must contain it too, otherwise the
/// next pattern is tried.
///
/// Arguments
/// ---------
/// * `name`: a parameter name such as `"DMX_0123"`
///
/// Return
/// ------
/// * the decomposed name, or [`PrefixError::Unrecognized`] when no pattern fits
///
/// Example
/// -------
/// ```
/// use pulsar_utils::prefix::split_prefixed_name;
///
/// let dmx = split_prefixed_name("DMX_0123").unwrap();
/// assert_eq!((dmx.prefix.as_str(), dmx.index_str.as_str(), dmx.index), ("DMX_", "0123", 123));
/// assert!(split_prefixed_name("PEPOCH").is_err());
/// ```
pub fn split_prefixed_name(name: &str) -> Result<PrefixedName, PrefixError> {
    let has_underscore = name.contains('_');
    PREFIX_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(name))
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .find(|(prefix, _)| !has_underscore || prefix.contains('_'))
        .and_then(|(prefix, index_str)| {
            Some(PrefixedName {
                prefix: prefix.to_string(),
                index_str: index_str.to_string(),
                index: index_str.parse().ok()?,
            })
        })
        .ok_or_else(|| PrefixError::Unrecognized(name.to_string()))
}

#[cfg(test)]
mod prefix_test {
    use super::*;

    fn split(name: &str) -> (String, String, u64) {
        let p = split_prefixed_name(name).unwrap();
        (p.prefix, p.index_str, p.index)
    }

    #[test]
    fn test_split_prefixed_name() {
        assert_eq!(split("DMX_0123"), ("DMX_".into(), "0123".into(), 123));
        assert_eq!(split("T2EFAC17"), ("T2EFAC".into(), "17".into(), 17));
        assert_eq!(split("F12"), ("F".into(), "12".into(), 12));
        assert_eq!(split("DMXR1_2"), ("DMXR1_".into(), "2".into(), 2));
        assert_eq!(split("GLF0_1"), ("GLF0_".into(), "1".into(), 1));
    }

    #[test]
    fn test_unrecognized_prefix() {
        for name in ["PEPOCH", "", "_12", "F", "DMX_", "RAJ"] {
            assert_eq!(
                split_prefixed_name(name),
                Err(PrefixError::Unrecognized(name.to_string()))
            );
        }
    }

    #[test]
    fn test_name_reconstruction() {
        let p = split_prefixed_name("DMX_0007").unwrap();
        assert_eq!(p.name(), "DMX_0007");
        assert_eq!(p.to_string(), "DMX_0007");
        assert_eq!(p.with_index(42).name(), "DMX_0042");
        assert_eq!(p.with_index(12345).index_str, "12345");
    }
}
