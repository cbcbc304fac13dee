//! Storyboarder project file module.
//!
//! This module provides:
//! - `model`: Document, Board and AudioEntry as found in `.storyboarder` files

pub mod model;

pub use model::*;
