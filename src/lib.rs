pub mod logging;
pub mod commands;

pub mod error;
pub mod mrc;
pub mod pipeline;
pub mod resolution;
pub mod scale;
