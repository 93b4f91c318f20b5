// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Emits SPICE piece-wise linear voltage sources from a parsed trace.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::vcd::signal::Signal;
use crate::vcd::timescale::{TimeScale, TimeUnit};
use crate::vcd::types::VcdDocument;
use crate::Error;

pub mod expr;
use expr::{Param, TimeExpr};
pub use expr::{format_minimal, RiseFall};

/// The one signal that ramps with `tcrf` instead of `trf`.
pub const CLOCK_SIGNAL_NAME: &str = "CLK";

/// Supply rail a logical 1 is tied to.
pub const HIGH_LEVEL: &str = "vvdd";
pub const LOW_LEVEL: &str = "0";

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PwlConfig {
    pub rise_fall: RiseFall,
    /// Unit every emitted time (and the rise/fall values) is expressed in.
    pub unit: TimeUnit,
}

impl PwlConfig {
    pub fn new(trf: f64, tcrf: f64) -> PwlConfig {
        PwlConfig {
            rise_fall: RiseFall::new(trf, tcrf),
            unit: TimeUnit::Ns,
        }
    }

    pub fn with_unit(self, unit: TimeUnit) -> PwlConfig {
        PwlConfig { unit, ..self }
    }
}

impl Default for PwlConfig {
    fn default() -> PwlConfig {
        PwlConfig::new(0.0, 0.0)
    }
}

fn level(bit: bool) -> &'static str {
    if bit {
        HIGH_LEVEL
    } else {
        LOW_LEVEL
    }
}

/// Every physical bit of `signal` as `(pwl name, index into the stored bits)`,
/// MSB and outer dimension first.
pub fn bit_positions(signal: &Signal) -> Vec<(String, usize)> {
    let name = signal.name();
    let width = signal.width() as usize;
    let dim = signal.dim() as usize;

    if dim > 0 {
        // `WEM[31:0]` of 9 bits each becomes WEM31[8] .. WEM0[0]
        (0..dim)
            .flat_map(|n| {
                (0..width).map(move |m| {
                    (
                        format!("{name}{}[{}]", dim - 1 - n, width - 1 - m),
                        n * width + m,
                    )
                })
            })
            .collect()
    } else if width > 1 {
        (0..width)
            .map(|k| (format!("{name}[{}]", width - 1 - k), k))
            .collect()
    } else {
        vec![(name.to_string(), 0)]
    }
}

/// PWL text for one signal: a `V` directive per physical bit. Signals that
/// ever saw an ambiguous value, or never got a value, produce nothing.
pub fn signal_pwl(signal: &Signal, timescale: &TimeScale, config: &PwlConfig) -> String {
    if !signal.is_export_safe() {
        info!("Skipping piece-wise linear for x-state signal: {signal}");
        return String::new();
    }
    if signal.timeline().is_empty() {
        warn!("Skipping piece-wise linear for {signal}: no value was ever assigned");
        return String::new();
    }

    let unit = config.unit.as_str();
    let rise_fall = &config.rise_fall;
    let param = if signal.name() == CLOCK_SIGNAL_NAME {
        Param::Tcrf
    } else {
        Param::Trf
    };
    let ramp = rise_fall.value(param) != 0.0;

    let mut lines = String::new();
    for (pwl_name, bit_idx) in bit_positions(signal) {
        lines.push_str(&format!("V{pwl_name} {pwl_name} 0 pwl(\n"));

        let mut previous: Option<&str> = None;
        for (tick, bits) in signal.timeline() {
            let current = level(bits.get(bit_idx).unwrap_or(false));

            match previous {
                // the first known value is the power-up state at t = 0
                None => lines.push_str(&format!("0 {current}\n")),
                Some(prev) if prev != current => {
                    let t = timescale.convert(*tick, config.unit);
                    let t_expr = TimeExpr::time(t).resolve(1.0, unit, rise_fall);
                    if ramp {
                        let t_rf = TimeExpr::time(t).plus(param).resolve(1.0, unit, rise_fall);
                        lines.push_str(&format!("+'{t_expr}' {prev} '{t_rf}' {current}\n"));
                    } else {
                        lines.push_str(&format!("+'{t_expr}' {current}\n"));
                    }
                }
                Some(_) => {}
            }

            previous = Some(current);
        }

        lines.push_str(")\n\n");
    }

    lines
}

impl VcdDocument {
    /// PWL text for every signal of the top scope, in declaration order.
    pub fn to_pwl(&self, config: &PwlConfig) -> Result<String, Error> {
        let top = match self.top() {
            Some(top) => top,
            None => {
                warn!("No top module in trace, nothing to export");
                return Ok(String::new());
            }
        };
        let timescale = self.timescale().ok_or(Error::MissingTimescale)?;

        let ids = top.signals().map(|(id, _)| id).collect::<Vec<_>>();
        info!("\tmodule: {} | vars: {ids:?}", top.name());

        let mut data = String::new();
        for (_, signal_idx) in top.signals() {
            let signal = self.signal(signal_idx);
            info!("Generate piece-wise linear for {} {signal}", signal.kind());
            data.push_str(&signal_pwl(signal, &timescale, config));
        }

        Ok(data)
    }

    /// Writes [`VcdDocument::to_pwl`] to `path`. Nothing is created when
    /// generation fails.
    pub fn export_pwl(&self, path: impl AsRef<Path>, config: &PwlConfig) -> Result<(), Error> {
        let data = self.to_pwl(config)?;

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(data.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
