// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Time expressions of the form `t`, `t + trf` and `t + tcrf`.
use std::fmt;

/// A named rise/fall parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Param {
    /// Rise/fall time of ordinary signals.
    Trf,
    /// Rise/fall time of the clock.
    Tcrf,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Trf => f.write_str("trf"),
            Param::Tcrf => f.write_str("tcrf"),
        }
    }
}

/// Values bound to [`Param`]s, in the emitter's target time unit.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct RiseFall {
    pub trf: f64,
    pub tcrf: f64,
}

impl RiseFall {
    pub fn new(trf: f64, tcrf: f64) -> RiseFall {
        RiseFall { trf, tcrf }
    }

    pub fn value(&self, param: Param) -> f64 {
        match param {
            Param::Trf => self.trf,
            Param::Tcrf => self.tcrf,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Term {
    Literal(f64),
    Param(Param),
}

/// A sum of terms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeExpr {
    terms: Vec<Term>,
}

impl TimeExpr {
    pub fn time(t: f64) -> TimeExpr {
        TimeExpr {
            terms: vec![Term::Literal(t)],
        }
    }

    pub fn plus(mut self, param: Param) -> TimeExpr {
        self.terms.push(Term::Param(param));
        self
    }

    /// Evaluates the expression against `rise_fall`.
    ///
    /// Literals are summed into a single number, scaled by `base` and
    /// suffixed with `unit`. Parameters are substituted by their values and
    /// appended without a unit; a parameter bound to zero drops out.
    /// `5 + trf` with `trf = 1` resolves to `5ns+1`.
    pub fn resolve(&self, base: f64, unit: &str, rise_fall: &RiseFall) -> String {
        let literal: f64 = self
            .terms
            .iter()
            .filter_map(|term| match term {
                Term::Literal(value) => Some(*value),
                Term::Param(_) => None,
            })
            .sum();

        let mut text = format!("{}{unit}", format_minimal(literal * base));

        for term in &self.terms {
            if let Term::Param(param) = term {
                let value = rise_fall.value(*param);
                if value == 0.0 {
                    continue;
                }
                text.push(if value < 0.0 { '-' } else { '+' });
                text.push_str(&format_minimal(value.abs()));
            }
        }

        text
    }
}

/// Shortest decimal rendering of `value` with trailing fractional zeros and
/// a trailing decimal point removed: `5.0` -> `5`, `5.250` -> `5.25`.
pub fn format_minimal(value: f64) -> String {
    let mut text = format!("{value}");

    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }

    if text == "-0" {
        text = "0".to_string();
    }

    text
}
