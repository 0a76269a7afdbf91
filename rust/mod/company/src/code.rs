//! Company code assignment.
//!
//! Codes are zero-padded decimal strings (`0001`, `0002`, ...). A new code
//! is the largest existing code plus one. When the largest code is not a
//! number (legacy data), the new record's own identity seeds the code.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Digits in a generated code.
pub const CODE_WIDTH: usize = 4;

/// How existing codes are compared when looking for the largest one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeOrdering {
    /// Numeric codes compare by value; any non-numeric code ranks above them.
    #[default]
    Numeric,
    /// Plain byte-wise string comparison, as older deployments did.
    Lexicographic,
}

impl FromStr for CodeOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(CodeOrdering::Numeric),
            "lexicographic" => Ok(CodeOrdering::Lexicographic),
            other => Err(format!(
                "unknown code ordering {:?} (expected \"numeric\" or \"lexicographic\")",
                other
            )),
        }
    }
}

impl fmt::Display for CodeOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodeOrdering::Numeric => "numeric",
            CodeOrdering::Lexicographic => "lexicographic",
        })
    }
}

impl CodeOrdering {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            CodeOrdering::Lexicographic => a.cmp(b),
            CodeOrdering::Numeric => match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            },
        }
    }

    /// Largest non-empty code under this ordering.
    pub fn max_code<'a, I>(&self, codes: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        codes
            .into_iter()
            .filter(|c| !c.is_empty())
            .max_by(|a, b| self.compare(a, b))
    }
}

/// Zero-pad `n` to [`CODE_WIDTH`] digits.
pub fn format_code(n: u64) -> String {
    format!("{:0width$}", n, width = CODE_WIDTH)
}

/// Compute the code for a new record.
///
/// `existing` holds the codes of every other record. `identity` is the new
/// record's persistent id, used when the largest code does not parse.
pub fn next_code<'a, I>(existing: I, identity: i64, ordering: CodeOrdering) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let n = match ordering.max_code(existing) {
        None => 1,
        Some(max) => match max.parse::<u64>() {
            Ok(n) => n + 1,
            Err(_) => {
                tracing::debug!(max, identity, "largest code is not numeric, using identity");
                identity.max(0) as u64
            }
        },
    };
    format_code(n)
}
