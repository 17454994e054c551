//! Rank Bucketer
//!
//! Maps a coerced rank to one of five disjoint status bands.
//! Bands are half-open, low bound inclusive:
//!
//! | Rank                     | Status    |
//! |--------------------------|-----------|
//! | absent, NaN, or negative | `missing` |
//! | [0, 3)                   | `1-3`     |
//! | [3, 10)                  | `4-10`    |
//! | [10, 30)                 | `11-30`   |
//! | [30, inf]                | `31+`     |

use serde::Serialize;
use std::fmt;

/// Rank position band
///
/// Variants are declared in report order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RankStatus {
    #[serde(rename = "1-3")]
    Top3,
    #[serde(rename = "4-10")]
    Top10,
    #[serde(rename = "11-30")]
    Top30,
    #[serde(rename = "31+")]
    Beyond30,
    #[serde(rename = "missing")]
    Missing,
}

impl RankStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankStatus::Top3 => "1-3",
            RankStatus::Top10 => "4-10",
            RankStatus::Top30 => "11-30",
            RankStatus::Beyond30 => "31+",
            RankStatus::Missing => "missing",
        }
    }
}

impl fmt::Display for RankStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign the status band for a rank
pub fn bucket(rank: Option<f64>) -> RankStatus {
    match rank {
        Some(r) if r.is_nan() || r < 0.0 => RankStatus::Missing,
        Some(r) if r < 3.0 => RankStatus::Top3,
        Some(r) if r < 10.0 => RankStatus::Top10,
        Some(r) if r < 30.0 => RankStatus::Top30,
        Some(_) => RankStatus::Beyond30,
        None => RankStatus::Missing,
    }
}
