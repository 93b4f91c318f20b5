mod reader;

pub mod parse;
pub mod signal;
pub mod timescale;
pub mod types;
