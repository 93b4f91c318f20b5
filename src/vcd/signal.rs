// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::collections::BTreeMap;
use std::fmt;

use num::{BigUint, Zero};

use crate::Error;

/// Declared kind of a signal. Registers and wires behave identically; the
/// kind only shows up in diagnostics.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignalKind {
    Register,
    Wire,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Register => f.write_str("reg"),
            SignalKind::Wire => f.write_str("wire"),
        }
    }
}

/// A fixed length bit vector. Index 0 is the most significant bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bits(Vec<bool>);

impl Bits {
    pub fn zeros(len: usize) -> Bits {
        Bits(vec![false; len])
    }

    /// Decodes `value` into exactly `len` bits, MSB first. Returns `None`
    /// when the value does not fit.
    pub fn from_biguint(value: &BigUint, len: usize) -> Option<Bits> {
        if value.bits() > len as u64 {
            return None;
        }

        let bits = (0..len)
            .map(|idx| value.bit((len - 1 - idx) as u64))
            .collect();
        Some(Bits(bits))
    }

    pub fn to_biguint(&self) -> BigUint {
        let mut value = BigUint::zero();
        for (idx, bit) in self.0.iter().rev().enumerate() {
            if *bit {
                value.set_bit(idx as u64, true);
            }
        }
        value
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<bool> {
        self.0.get(idx).copied()
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// A declared `reg` or `wire` together with every value it took on.
#[derive(Debug, Clone)]
pub struct Signal {
    pub(super) name: String,
    pub(super) kind: SignalKind,
    // bus width, such as `output reg [7:0] RTSEL`
    pub(super) width: u32,
    // array depth, such as `output reg [8:0] WEM[31:0]`; 0 for scalars and buses
    pub(super) dim: u32,
    // A signal only records a value when the trace changes it. Ticks are
    // raw simulation time; conversion happens at emission.
    pub(super) timeline: BTreeMap<u64, Bits>,
    pub(super) current: Bits,
    pub(super) export_safe: bool,
}

impl Signal {
    pub fn new(name: impl Into<String>, kind: SignalKind, width: u32) -> Signal {
        Signal::array(name, kind, width, 0)
    }

    pub fn array(name: impl Into<String>, kind: SignalKind, width: u32, dim: u32) -> Signal {
        let bit_count = width as usize * dim.max(1) as usize;
        Signal {
            name: name.into(),
            kind,
            width,
            dim,
            timeline: BTreeMap::new(),
            current: Bits::zeros(bit_count),
            export_safe: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Total number of stored bits: `width` for scalars and buses,
    /// `dim * width` for arrays.
    pub fn bit_count(&self) -> usize {
        self.current.len()
    }

    pub fn timeline(&self) -> &BTreeMap<u64, Bits> {
        &self.timeline
    }

    /// Last value applied by [`Signal::update`], all zeros before any.
    pub fn current(&self) -> &Bits {
        &self.current
    }

    pub fn is_export_safe(&self) -> bool {
        self.export_safe
    }

    /// Permanently excludes this signal from PWL export.
    pub fn mark_ambiguous(&mut self) {
        self.export_safe = false;
    }

    /// Records `value` at `tick`. A second update for the same tick
    /// replaces the first.
    pub fn update(&mut self, tick: u64, value: &BigUint) -> Result<(), Error> {
        let bits = Bits::from_biguint(value, self.bit_count()).ok_or_else(|| {
            Error::ValueTooWide {
                name: self.name.clone(),
                bits: value.bits(),
                width: self.bit_count() as u64,
            }
        })?;

        tracing::debug!("Update assignment for {:<20} | {tick}: {bits}", self.name);
        self.current = bits.clone();
        self.timeline.insert(tick, bits);
        Ok(())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 1 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}[{}:0]", self.name, self.width - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_is_msb_first() {
        let bits = Bits::from_biguint(&BigUint::from(0b0101u32), 4).unwrap();
        assert_eq!(
            (0..4).map(|idx| bits.get(idx).unwrap()).collect::<Vec<_>>(),
            vec![false, true, false, true]
        );
        assert_eq!(bits.to_string(), "0101");
    }

    #[test]
    fn decode_round_trips_every_value_that_fits() {
        for width in 1..=9usize {
            for v in 0u32..(1 << width) {
                let value = BigUint::from(v);
                let bits = Bits::from_biguint(&value, width).unwrap();
                assert_eq!(bits.len(), width);
                assert_eq!(bits.to_biguint(), value);
            }
        }

        let wide = BigUint::parse_bytes(b"1f0000000000000000000000000001", 16).unwrap();
        let bits = Bits::from_biguint(&wide, 128).unwrap();
        assert_eq!(bits.to_biguint(), wide);
    }

    #[test]
    fn decode_rejects_values_wider_than_declared() {
        for width in 1..=8usize {
            let too_wide = BigUint::from(1u32) << width;
            assert!(Bits::from_biguint(&too_wide, width).is_none());
        }
    }

    #[test]
    fn update_overflow_is_value_too_wide() {
        let mut sig = Signal::new("RTSEL", SignalKind::Register, 3);
        let err = sig.update(0, &BigUint::from(8u32)).unwrap_err();
        match err {
            Error::ValueTooWide { name, bits, width } => {
                assert_eq!(name, "RTSEL");
                assert_eq!(bits, 4);
                assert_eq!(width, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(sig.timeline().is_empty());
    }

    #[test]
    fn last_write_for_a_tick_wins() {
        let mut sig = Signal::new("D", SignalKind::Wire, 2);
        sig.update(10, &BigUint::from(1u32)).unwrap();
        sig.update(10, &BigUint::from(2u32)).unwrap();
        sig.update(20, &BigUint::from(3u32)).unwrap();

        let entries: Vec<_> = sig
            .timeline()
            .iter()
            .map(|(tick, bits)| (*tick, bits.to_string()))
            .collect();
        assert_eq!(entries, vec![(10, "10".to_string()), (20, "11".to_string())]);
        assert_eq!(sig.current().to_string(), "11");
    }

    #[test]
    fn ambiguity_is_sticky() {
        let mut sig = Signal::new("A", SignalKind::Register, 1);
        assert!(sig.is_export_safe());
        sig.mark_ambiguous();
        sig.update(3, &BigUint::from(1u32)).unwrap();
        assert!(!sig.is_export_safe());
    }

    #[test]
    fn arrays_store_every_element() {
        let sig = Signal::array("WEM", SignalKind::Register, 9, 32);
        assert_eq!(sig.bit_count(), 9 * 32);
        assert_eq!(sig.to_string(), "WEM[8:0]");
    }
}
