//! Replacement pairs and the `from|to` argument validator.
//!
//! Arguments are treated as raw bytes: every byte of the command-line string
//! maps to exactly one byte of the pattern, no character decoding happens.

use std::ffi::OsStr;
use std::fmt;
use std::os::unix::ffi::OsStrExt;
use thiserror::Error;

/// Separator between the `from` and `to` halves of an argument.
pub const DELIMITER: u8 = b'|';

/// An ordered (from, to) byte-sequence pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementPair {
    /// Bytes to search for
    pub from: Vec<u8>,
    /// Bytes written over every match
    pub to: Vec<u8>,
}

impl ReplacementPair {
    /// Build a validated pair: equal byte length, non-identical halves.
    pub fn new(from: impl Into<Vec<u8>>, to: impl Into<Vec<u8>>) -> Result<Self, ArgumentError> {
        let pair = Self {
            from: from.into(),
            to: to.into(),
        };
        if pair.from.len() != pair.to.len() {
            return Err(ArgumentError::UnequalLength {
                from_len: pair.from.len(),
                to_len: pair.to.len(),
            });
        }
        if pair.from == pair.to {
            return Err(ArgumentError::Identical);
        }
        Ok(pair)
    }

    /// Parse a raw `from|to` argument.
    pub fn parse(arg: &[u8]) -> Result<Self, ArgumentError> {
        let count = arg.iter().filter(|&&b| b == DELIMITER).count();
        if count != 1 {
            return Err(ArgumentError::Delimiter { count });
        }
        let pos = arg
            .iter()
            .position(|&b| b == DELIMITER)
            .ok_or(ArgumentError::Delimiter { count: 0 })?;
        Self::new(&arg[..pos], &arg[pos + 1..])
    }

    /// Whether writing `to` over a match of `from` keeps the target layout.
    ///
    /// Always true for pairs built through [`ReplacementPair::new`]; the
    /// engine re-checks because the fields are public.
    pub fn is_length_preserving(&self) -> bool {
        !self.from.is_empty() && self.from.len() == self.to.len()
    }
}

impl fmt::Display for ReplacementPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}",
            String::from_utf8_lossy(&self.from),
            String::from_utf8_lossy(&self.to)
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("expected exactly one '|' delimiter, found {count}")]
    Delimiter { count: usize },

    #[error("'from' is {from_len} bytes but 'to' is {to_len} bytes")]
    UnequalLength { from_len: usize, to_len: usize },

    #[error("'from' and 'to' are identical")]
    Identical,
}

/// An argument the validator dropped, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// The argument as given, lossily decoded for display
    pub argument: String,
    pub reason: ArgumentError,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            ArgumentError::Delimiter { .. } => write!(f, "Ignored argument: '{}'", self.argument),
            _ => write!(f, "Invalid argument: '{}'", self.argument),
        }
    }
}

/// Ordered list of replacement pairs, applied in sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementList {
    pairs: Vec<ReplacementPair>,
}

impl ReplacementList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw arguments, keeping the valid pairs in order.
    ///
    /// Invalid arguments never abort the batch; they come back in the
    /// second element so the caller can report them.
    pub fn from_args<I, S>(args: I) -> (Self, Vec<Rejected>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut list = Self::new();
        let mut rejected = Vec::new();

        for arg in args {
            let raw = arg.as_ref().as_bytes();
            match ReplacementPair::parse(raw) {
                Ok(pair) => list.push(pair),
                Err(reason) => rejected.push(Rejected {
                    argument: String::from_utf8_lossy(raw).into_owned(),
                    reason,
                }),
            }
        }

        (list, rejected)
    }

    pub fn push(&mut self, pair: ReplacementPair) {
        self.pairs.push(pair);
    }

    pub fn pairs(&self) -> &[ReplacementPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Length of the longest `from` pattern, 0 for an empty list.
    pub fn longest_pattern(&self) -> usize {
        self.pairs.iter().map(|p| p.from.len()).max().unwrap_or(0)
    }
}

impl From<Vec<ReplacementPair>> for ReplacementList {
    fn from(pairs: Vec<ReplacementPair>) -> Self {
        Self { pairs }
    }
}

impl<'a> IntoIterator for &'a ReplacementList {
    type Item = &'a ReplacementPair;
    type IntoIter = std::slice::Iter<'a, ReplacementPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    #[test]
    fn test_parse_valid_pair() {
        let pair = ReplacementPair::parse(b"system|vendor").unwrap();
        assert_eq!(pair.from, b"system");
        assert_eq!(pair.to, b"vendor");
        assert!(pair.is_length_preserving());
    }

    #[test]
    fn test_parse_rejects_missing_delimiter() {
        let result = ReplacementPair::parse(b"system");
        assert_eq!(result, Err(ArgumentError::Delimiter { count: 0 }));
    }

    #[test]
    fn test_parse_rejects_multiple_delimiters() {
        let result = ReplacementPair::parse(b"a|b|c");
        assert_eq!(result, Err(ArgumentError::Delimiter { count: 2 }));
    }

    #[test]
    fn test_parse_rejects_unequal_length() {
        let result = ReplacementPair::parse(b"system|odm");
        assert_eq!(
            result,
            Err(ArgumentError::UnequalLength {
                from_len: 6,
                to_len: 3
            })
        );
    }

    #[test]
    fn test_parse_rejects_identical() {
        assert_eq!(
            ReplacementPair::parse(b"system|system"),
            Err(ArgumentError::Identical)
        );
        // Both halves empty is the degenerate identical case
        assert_eq!(ReplacementPair::parse(b"|"), Err(ArgumentError::Identical));
    }

    #[test]
    fn test_parse_counts_bytes_not_chars() {
        // "é" is two bytes, so it pairs with a two-byte ASCII string
        let pair = ReplacementPair::parse("é|ab".as_bytes()).unwrap();
        assert_eq!(pair.from, vec![0xC3, 0xA9]);
        assert_eq!(pair.to, b"ab");
        assert!(ReplacementPair::parse("é|a".as_bytes()).is_err());
    }

    #[test]
    fn test_from_args_keeps_order_and_reports_rejections() {
        let args = ["system|vendor", "bogus", "odm|xyz", "abc|ab", "aa|aa"];
        let (list, rejected) = ReplacementList::from_args(args);

        assert_eq!(list.len(), 2);
        assert_eq!(list.pairs()[0].from, b"system");
        assert_eq!(list.pairs()[1].from, b"odm");
        assert_eq!(list.longest_pattern(), 6);

        assert_eq!(rejected.len(), 3);
        assert_eq!(rejected[0].to_string(), "Ignored argument: 'bogus'");
        assert_eq!(rejected[1].to_string(), "Invalid argument: 'abc|ab'");
        assert_eq!(rejected[2].to_string(), "Invalid argument: 'aa|aa'");
    }

    #[test]
    fn test_from_args_accepts_non_utf8_bytes() {
        let arg = OsString::from_vec(vec![0xFF, 0x00, b'|', 0x01, 0xFE]);
        let (list, rejected) = ReplacementList::from_args([arg]);
        assert!(rejected.is_empty());
        assert_eq!(list.pairs()[0].from, vec![0xFF, 0x00]);
        assert_eq!(list.pairs()[0].to, vec![0x01, 0xFE]);
    }

    #[test]
    fn test_empty_list() {
        let (list, rejected) = ReplacementList::from_args(Vec::<&str>::new());
        assert!(list.is_empty());
        assert!(rejected.is_empty());
        assert_eq!(list.longest_pattern(), 0);
    }
}
