// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! part of the vcd parser that applies value changes to the signals
//! declared earlier
use num::BigUint;
use tracing::{debug, warn};

use super::super::timescale::TimeUnit;
use super::super::types::{SignalIdx, VcdDocument};
use super::{ParserState, TrackMode};
use crate::Error;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum BinaryParserErrTypes {
    XValue,
    ZValue,
    UValue,
    WValue,
    DontCare,
    OtherValue(char),
    Empty,
}

impl BinaryParserErrTypes {
    fn is_ambiguous(&self) -> bool {
        matches!(
            self,
            BinaryParserErrTypes::XValue
                | BinaryParserErrTypes::ZValue
                | BinaryParserErrTypes::UValue
                | BinaryParserErrTypes::WValue
                | BinaryParserErrTypes::DontCare
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum LogicValue {
    Known(BigUint),
    /// Contains an unknown or undriven state somewhere.
    Ambiguous,
}

// Weak drives (`h`/`l`) count as their strong level.
fn binary_str_to_biguint(binary_str: &str) -> Result<BigUint, BinaryParserErrTypes> {
    if binary_str.is_empty() {
        return Err(BinaryParserErrTypes::Empty);
    }

    let mut digits = Vec::with_capacity(binary_str.len());
    for chr in binary_str.bytes() {
        match chr {
            b'1' | b'h' | b'H' => digits.push(1u8),
            b'0' | b'l' | b'L' => digits.push(0u8),
            b'x' | b'X' => return Err(BinaryParserErrTypes::XValue),
            b'z' | b'Z' => return Err(BinaryParserErrTypes::ZValue),
            b'u' | b'U' => return Err(BinaryParserErrTypes::UValue),
            b'w' | b'W' => return Err(BinaryParserErrTypes::WValue),
            b'-' => return Err(BinaryParserErrTypes::DontCare),
            _ => return Err(BinaryParserErrTypes::OtherValue(chr as char)),
        }
    }

    BigUint::from_radix_be(&digits, 2).ok_or(BinaryParserErrTypes::Empty)
}

pub(super) fn decode_value(binary_str: &str) -> Result<LogicValue, String> {
    match binary_str_to_biguint(binary_str) {
        Ok(value) => Ok(LogicValue::Known(value)),
        // If we encounter x or z in a value, we can recover: the signal
        // is simply never exported.
        Err(e) if e.is_ambiguous() => Ok(LogicValue::Ambiguous),
        Err(e) => Err(format!(
            "Error near {}:{}. Error {e:?} while decoding value `{binary_str}`.",
            file!(),
            line!()
        )),
    }
}

fn resolve(vcd: &VcdDocument, state: &ParserState, id_code: &str) -> Result<Vec<SignalIdx>, Error> {
    match state.mode {
        // intermediary signals are skipped without cost
        TrackMode::TopOnly => Ok(vcd
            .top
            .as_ref()
            .and_then(|top| top.lookup(id_code))
            .into_iter()
            .collect()),
        TrackMode::Everything => match vcd.sig_map.get(id_code) {
            Some(aliases) => Ok(aliases.clone()),
            // declared, but as a variable type that is not modelled
            None if vcd.sig_names.contains_key(id_code) => Ok(vec![]),
            None => Err(Error::UnresolvedIdentifier {
                id_code: id_code.to_string(),
                tick: state.tick,
            }),
        },
    }
}

/// Applies one scalar or vector value change at the current tick, to every
/// tracked signal declared under `id_code`.
pub(super) fn apply_value_change(
    vcd: &mut VcdDocument,
    state: &ParserState,
    id_code: &str,
    value: &str,
) -> Result<(), Error> {
    let timescale = vcd.metadata.timescale.ok_or(Error::MissingTimescale)?;

    let targets = resolve(vcd, state, id_code)?;
    if targets.is_empty() {
        return Ok(());
    }
    let decoded = decode_value(value)?;

    for SignalIdx(signal_idx) in targets {
        let signal = &mut vcd.all_signals[signal_idx];
        match &decoded {
            LogicValue::Ambiguous => {
                warn!(
                    "{signal}: Skipping ambiguous signal value definition at tick {}: {value}",
                    state.tick
                );
                signal.mark_ambiguous();
            }
            LogicValue::Known(number) => {
                signal.update(state.tick, number)?;
                debug!(
                    "Setting {} to '{number}' at time: {}ns",
                    signal.name(),
                    timescale.convert(state.tick, TimeUnit::Ns)
                );
            }
        }
    }

    Ok(())
}
