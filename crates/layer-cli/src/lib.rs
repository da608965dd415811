//! Library side of the `layer-atlas` command line tool.

pub mod commands;
pub mod logging;
pub mod tree;
