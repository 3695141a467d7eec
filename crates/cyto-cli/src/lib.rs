//! CLI library components for the cell count pipeline.

pub mod logging;
pub mod render;
