// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::collections::HashMap;

use chrono::prelude::*;

use super::signal::Signal;
use super::timescale::TimeScale;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(pub String);

#[derive(Debug, Default)]
pub struct Metadata {
    /// `$date` exactly as written in the trace.
    pub date_text: Option<String>,
    /// `$date` parsed, if any permutation of its words was recognised.
    pub date: Option<DateTime<Utc>>,
    pub version: Option<Version>,
    pub timescale: Option<TimeScale>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScopeIdx(pub(super) usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SignalIdx(pub(super) usize);

/// One `$scope`. Signals are kept in declaration order, keyed by the
/// trace's short identifier code.
#[derive(Debug)]
pub struct Scope {
    pub(super) name: String,
    pub(super) signals: Vec<(String, SignalIdx)>,
    // identifier code -> position in `signals`
    positions: HashMap<String, usize>,
}

impl Scope {
    pub(super) fn new(name: impl Into<String>) -> Scope {
        Scope {
            name: name.into(),
            signals: vec![],
            positions: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier codes and signal indices in declaration order.
    pub fn signals(&self) -> impl Iterator<Item = (&str, SignalIdx)> + '_ {
        self.signals.iter().map(|(id, idx)| (id.as_str(), *idx))
    }

    pub fn lookup(&self, id_code: &str) -> Option<SignalIdx> {
        self.positions.get(id_code).map(|pos| self.signals[*pos].1)
    }

    pub fn contains(&self, id_code: &str) -> bool {
        self.lookup(id_code).is_some()
    }

    // A redeclared identifier keeps its original position. Returns the
    // signal it used to point at.
    pub(super) fn add_signal(&mut self, id_code: &str, signal_idx: SignalIdx) -> Option<SignalIdx> {
        match self.positions.get(id_code) {
            Some(pos) => Some(std::mem::replace(&mut self.signals[*pos].1, signal_idx)),
            None => {
                self.positions.insert(id_code.to_string(), self.signals.len());
                self.signals.push((id_code.to_string(), signal_idx));
                None
            }
        }
    }
}

/// A parsed trace. Only [`VcdDocument::top`] is ever exported; every other
/// scope lands in [`VcdDocument::side_scopes`].
#[derive(Debug, Default)]
pub struct VcdDocument {
    pub(super) metadata: Metadata,
    pub(super) top: Option<Scope>,
    pub(super) side_scopes: Vec<Scope>,
    pub(super) all_signals: Vec<Signal>,
    // identifier code -> reference name, e.g. `!` -> `CLK`
    pub(super) sig_names: HashMap<String, String>,
    // identifier code -> every live declaration sharing it; simulators
    // reuse one code for a net seen from several scopes
    pub(super) sig_map: HashMap<String, Vec<SignalIdx>>,
}

impl VcdDocument {
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn timescale(&self) -> Option<TimeScale> {
        self.metadata.timescale
    }

    pub fn top(&self) -> Option<&Scope> {
        self.top.as_ref()
    }

    pub fn side_scopes(&self) -> &[Scope] {
        &self.side_scopes
    }

    /// Every declared signal in declaration order, across all scopes.
    pub fn signals(&self) -> &[Signal] {
        &self.all_signals
    }

    pub fn signal(&self, SignalIdx(idx): SignalIdx) -> &Signal {
        &self.all_signals[idx]
    }

    /// Every signal declared under `id_code`, in declaration order.
    pub fn aliases(&self, id_code: &str) -> &[SignalIdx] {
        match self.sig_map.get(id_code) {
            Some(aliases) => aliases,
            None => &[],
        }
    }

    pub fn signal_name(&self, id_code: &str) -> Option<&str> {
        self.sig_names.get(id_code).map(String::as_str)
    }

    /// Looks a top scope signal up by reference name.
    pub fn top_signal(&self, name: &str) -> Option<&Signal> {
        self.top
            .as_ref()?
            .signals()
            .map(|(_, idx)| self.signal(idx))
            .find(|signal| signal.name() == name)
    }

    pub fn print_scopes(&self) {
        let scopes = self.top.iter().chain(self.side_scopes.iter());
        for (n, scope) in scopes.enumerate() {
            let role = if n == 0 && self.top.is_some() { "top" } else { "side" };
            println!("{role} scope: {}", scope.name);
            for (id_code, idx) in scope.signals() {
                let signal = self.signal(idx);
                println!("  - {} {signal} ({id_code})", signal.kind());
            }
        }
    }
}
