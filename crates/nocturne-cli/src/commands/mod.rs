//! Command implementations for the nocturne CLI.

pub mod classify;
pub mod encode;
pub mod pipeline;
pub mod render;
pub mod validate;
