use std::{fmt, str::FromStr};

use crate::foundation::error::{BlendError, BlendResult};

/// Per-pixel accumulation rule applied to every layer above the bottommost one.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Weighted mean of all contributions.
    #[default]
    Average,
    /// Per-channel minimum.
    Darken,
    /// Per-channel maximum.
    Lighten,
    /// Recover the color underneath a semi-transparent cover ("un-blend").
    InverseNormal,
    /// Estimate the overlay factor of a reference color.
    ExtractNormal,
    /// Per-channel median of raw samples.
    Median,
}

impl BlendMode {
    /// Every mode, in menu order.
    pub const ALL: [BlendMode; 6] = [
        BlendMode::Average,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::InverseNormal,
        BlendMode::ExtractNormal,
        BlendMode::Median,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Average => "Average",
            Self::Darken => "Darken",
            Self::Lighten => "Lighten",
            Self::InverseNormal => "Inverse Normal",
            Self::ExtractNormal => "Extract Normal",
            Self::Median => "Median",
        }
    }

    /// Machine name used in JSON and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::InverseNormal => "inverse_normal",
            Self::ExtractNormal => "extract_normal",
            Self::Median => "median",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BlendMode {
    type Err = BlendError;

    /// Accepts keys and labels, ignoring case, with `-`, `_` or space as separators.
    fn from_str(s: &str) -> BlendResult<Self> {
        let norm: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL
            .into_iter()
            .find(|m| m.key() == norm)
            .ok_or_else(|| {
                BlendError::validation(format!(
                    "unknown blend mode '{s}' (expected one of: {})",
                    Self::ALL.map(Self::key).join(", ")
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/mode.rs"]
mod tests;
