//! # GCodeView Core
//!
//! Core types and utilities shared by the GCodeView crates.
//! Provides the position model, plane selection, numeric tolerances,
//! and the unified error type.

pub mod constants;
pub mod data;
pub mod error;

pub use data::{Plane, Position};

pub use error::{Error, Result, SettingsError};
