// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Errors surfaced by the trace parser and the PWL emitter.

/// Everything that can abort a parse or an export.
///
/// Ambiguous (`x`/`z`) values are not errors: they only exclude the
/// affected signal from export.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the trace or writing the PWL output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The token stream is malformed.
    #[error("failed to parse vcd: {0}")]
    Parse(String),

    /// A value change names an identifier that no scope declares.
    #[error("un-recognized identifier `{id_code}` at tick {tick}")]
    UnresolvedIdentifier { id_code: String, tick: u64 },

    /// A decoded value needs more bits than the signal was declared with.
    #[error("value for signal {name} requires {bits} bits but only {width} are declared")]
    ValueTooWide { name: String, bits: u64, width: u64 },

    /// Time conversion was attempted before any `$timescale`.
    #[error("no timescale declared before the first value change")]
    MissingTimescale,
}

impl From<String> for Error {
    fn from(msg: String) -> Error {
        Error::Parse(msg)
    }
}
