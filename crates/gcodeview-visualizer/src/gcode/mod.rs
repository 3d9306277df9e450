//! G-Code interpretation
//!
//! This module provides:
//! - Comment stripping and line preprocessing
//! - Word parsing into typed fields
//! - The motion state machine that turns lines into waypoints

pub mod command;
pub mod parser;
pub mod processors;

pub use command::*;
pub use parser::*;
pub use processors::*;
