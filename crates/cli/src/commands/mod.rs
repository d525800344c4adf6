//! Subcommand implementations

pub mod image;
pub mod invoke;
pub mod render;
