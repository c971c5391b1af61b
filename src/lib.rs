//! Bollinger Bands overlay engine.
//!
//! [`indicator::rolling`] holds the windowed statistics and
//! [`indicator::bollinger`] builds the basis, upper and lower bands on top of
//! them. The remaining modules load price series, read settings and write
//! the computed overlay for a chart renderer.

pub mod config;
pub mod error;
pub mod indicator;
pub mod loader;
pub mod model;
pub mod report;
pub mod style;
