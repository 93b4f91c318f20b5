// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fmt;
use std::str::FromStr;

/// Converted times are rounded to this many decimal places.
pub const TIMESCALE_ROUNDING: usize = 3;

// exact powers of ten, indexed by exponent
const POW10: [f64; 16] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    S,
    Ms,
    Us,
    Ns,
    Ps,
    Fs,
}

impl TimeUnit {
    /// Number of this unit in one second, as a power of ten.
    pub fn exponent(self) -> u32 {
        match self {
            TimeUnit::S => 0,
            TimeUnit::Ms => 3,
            TimeUnit::Us => 6,
            TimeUnit::Ns => 9,
            TimeUnit::Ps => 12,
            TimeUnit::Fs => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::S => "s",
            TimeUnit::Ms => "ms",
            TimeUnit::Us => "us",
            TimeUnit::Ns => "ns",
            TimeUnit::Ps => "ps",
            TimeUnit::Fs => "fs",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" => Ok(TimeUnit::S),
            "ms" => Ok(TimeUnit::Ms),
            "us" => Ok(TimeUnit::Us),
            "ns" => Ok(TimeUnit::Ns),
            "ps" => Ok(TimeUnit::Ps),
            "fs" => Ok(TimeUnit::Fs),
            _ => Err(format!(
                "{s} is not a valid unit of time : expected one of \
                 [\"s\", \"ms\", \"us\", \"ns\", \"ps\", \"fs\"]"
            )),
        }
    }
}

/// The `$timescale` of a trace: one tick lasts `base_num` `base_unit`s.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeScale {
    pub base_num: u32,
    pub base_unit: TimeUnit,
}

impl TimeScale {
    pub fn new(base_num: u32, base_unit: TimeUnit) -> TimeScale {
        TimeScale {
            base_num,
            base_unit,
        }
    }

    /// Converts a tick count into `target` units, rounded to
    /// [`TIMESCALE_ROUNDING`] decimal places.
    pub fn convert(&self, ticks: u64, target: TimeUnit) -> f64 {
        let raw = ticks as f64 * self.base_num as f64;
        let (to, from) = (target.exponent(), self.base_unit.exponent());

        let scaled = if to >= from {
            raw * POW10[(to - from) as usize]
        } else {
            raw / POW10[(from - to) as usize]
        };

        round_places(scaled, TIMESCALE_ROUNDING)
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base_num, self.base_unit)
    }
}

fn round_places(value: f64, places: usize) -> f64 {
    let scale = POW10[places];
    (value * scale).round() / scale
}
