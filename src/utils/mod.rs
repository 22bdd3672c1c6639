//! Utility functions and helpers.
//!
//! This module contains utility functions used throughout the application,
//! such as unit conversion and size formatting helpers.

pub mod size;

pub use size::{InvalidUnitSelector, Unit, convert, format_in_unit, parse_unit_choice};
