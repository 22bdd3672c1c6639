//! Size unit conversion utilities.
//!
//! This module maps raw byte counts to human-readable strings in a unit chosen
//! by the user. All units are base-1024 (a "KB" here is 1024 bytes), matching
//! what the interactive menu has always printed.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bytes in one kilobyte; each larger unit scales by this factor again.
pub const BYTES_PER_UNIT: u64 = 1024;

/// Display unit for a byte count.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Kilobytes (1024 bytes)
    #[default]
    Kb,

    /// Megabytes (1024² bytes)
    Mb,

    /// Gigabytes (1024³ bytes)
    Gb,

    /// Terabytes (1024⁴ bytes)
    Tb,

    /// Plain byte count, no scaling
    #[value(name = "bytes")]
    #[serde(rename = "bytes")]
    Raw,
}

/// Returned when a unit selector is not one of the recognized choices.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid unit selector '{0}': expected a (KB), b (MB), c (GB) or d (TB)")]
pub struct InvalidUnitSelector(pub String);

impl Unit {
    /// The units offered by the interactive menu, in menu order.
    pub const MENU: [Self; 4] = [Self::Kb, Self::Mb, Self::Gb, Self::Tb];

    /// Power of 1024 this unit scales by (`Raw` is 0).
    #[must_use]
    pub const fn exponent(self) -> u32 {
        match self {
            Self::Raw => 0,
            Self::Kb => 1,
            Self::Mb => 2,
            Self::Gb => 3,
            Self::Tb => 4,
        }
    }

    /// Suffix printed after a converted value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kb => "KB",
            Self::Mb => "MB",
            Self::Gb => "GB",
            Self::Tb => "TB",
            Self::Raw => "Bytes",
        }
    }

    /// Menu letter for this unit, if it has one.
    #[must_use]
    pub const fn menu_key(self) -> Option<char> {
        match self {
            Self::Kb => Some('a'),
            Self::Mb => Some('b'),
            Self::Gb => Some('c'),
            Self::Tb => Some('d'),
            Self::Raw => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = InvalidUnitSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit_choice(s)
    }
}

/// Parse a user-supplied unit selector.
///
/// Accepts the menu letters (`a` = KB, `b` = MB, `c` = GB, `d` = TB) as well as
/// the unit names themselves (`kb`, `mb`, `gb`, `tb`). Surrounding whitespace
/// and case are ignored.
///
/// # Errors
///
/// Returns [`InvalidUnitSelector`] for anything else, including the empty string.
///
/// # Examples
///
/// ```
/// # use disk_utility::utils::size::{parse_unit_choice, Unit};
/// assert_eq!(parse_unit_choice(" B ").unwrap(), Unit::Mb);
/// assert!(parse_unit_choice("z").is_err());
/// ```
pub fn parse_unit_choice(input: &str) -> Result<Unit, InvalidUnitSelector> {
    match input.trim().to_lowercase().as_str() {
        "a" | "kb" => Ok(Unit::Kb),
        "b" | "mb" => Ok(Unit::Mb),
        "c" | "gb" => Ok(Unit::Gb),
        "d" | "tb" => Ok(Unit::Tb),
        _ => Err(InvalidUnitSelector(input.to_string())),
    }
}

/// Render `size_bytes` in `unit` with three decimal places.
///
/// `Unit::Raw` prints the integer byte count followed by `Bytes`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_in_unit(size_bytes: u64, unit: Unit) -> String {
    if unit == Unit::Raw {
        return format!("{size_bytes} Bytes");
    }

    let divisor = BYTES_PER_UNIT.pow(unit.exponent()) as f64;
    format!("{:.3} {}", size_bytes as f64 / divisor, unit.label())
}

/// Render `size_bytes` using a raw selector string.
///
/// An unrecognized selector is not an error: the size is printed as plain
/// bytes. Callers that need strict validation use [`parse_unit_choice`] first.
#[must_use]
pub fn convert(size_bytes: u64, selector: &str) -> String {
    format_in_unit(size_bytes, parse_unit_choice(selector).unwrap_or(Unit::Raw))
}
