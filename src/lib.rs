// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

mod error;
pub use error::Error;

mod vcd;
pub use vcd::parse::{parse_tokens, parse_vcd, parse_vcd_with, TrackMode, ORPHANED_SCOPE_NAME};
pub use vcd::parse::{ScopeKind, Token, Tokenizer, VarDecl, VarType};
pub use vcd::signal::{Bits, Signal, SignalKind};
pub use vcd::timescale::{TimeScale, TimeUnit, TIMESCALE_ROUNDING};
pub use vcd::types::{Metadata, Scope, ScopeIdx, SignalIdx, VcdDocument, Version};

pub mod pwl;
pub use pwl::{PwlConfig, RiseFall};

pub use num::BigUint;
