//! # MillView Core
//!
//! Core types and utilities for MillView.
//! Provides the tool path data model (moves, tool diameter, render scale, colors),
//! decoding of the simulator's move list format, and error types.

pub mod color;
pub mod error;
pub mod moves;
pub mod types;
pub mod units;

pub use color::Color;
pub use error::{Error, MoveError, Result, ToolError};
pub use moves::{Move, MoveList};
pub use types::{shared, shared_none, Shared, SharedOption, UiCallback, UiDataCallback, WeakShared};
pub use units::{RenderUnit, ToolDiameter};
