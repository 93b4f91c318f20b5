// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::Read;

use tracing::{debug, info, warn};

use super::signal::{Signal, SignalKind};
use super::types::{Scope, ScopeIdx, SignalIdx, VcdDocument, Version};
use crate::Error;

mod combinator_atoms;
mod types;

mod metadata;
use metadata::*;

mod events;
use events::*;

mod lexer;
pub use lexer::Tokenizer;

mod tokens;
pub use tokens::{ScopeKind, Token, VarDecl, VarType};

/// Variables declared outside of any open scope end up here.
pub const ORPHANED_SCOPE_NAME: &str = "Orphaned Signals";

/// Which value changes the parser records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TrackMode {
    /// Only signals of the top scope get a timeline; every other identifier
    /// is silently dropped.
    #[default]
    TopOnly,
    /// Every declared signal gets a timeline, and an identifier that was
    /// never declared aborts the parse.
    Everything,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ScopeCursor {
    Top,
    Side(ScopeIdx),
}

/// Cursors threaded through the token fold.
#[derive(Debug)]
struct ParserState {
    mode: TrackMode,
    scope: Option<ScopeCursor>,
    orphans: Option<ScopeIdx>,
    tick: u64,
}

impl ParserState {
    fn new(mode: TrackMode) -> ParserState {
        ParserState {
            mode,
            scope: None,
            orphans: None,
            tick: 0,
        }
    }

    fn apply(&mut self, vcd: &mut VcdDocument, token: Token) -> Result<(), Error> {
        match token {
            Token::Date(text) => {
                vcd.metadata.date = parse_date(&text);
                if vcd.metadata.date.is_none() {
                    debug!("Could not interpret date `{text}`, keeping it verbatim");
                }
                vcd.metadata.date_text = Some(text);
            }
            Token::Version(text) => vcd.metadata.version = Some(Version(text)),
            Token::Timescale(text) => {
                info!("Setting timescale: {text}");
                vcd.metadata.timescale = Some(parse_timescale(&text)?);
            }
            Token::Scope { name, .. } => self.enter_scope(vcd, name),
            Token::Upscope => {
                debug!("Leaving scope: {}", self.scope_name(vcd));
                self.scope = None;
            }
            Token::Var(decl) => self.declare(vcd, decl)?,
            Token::EndDefinitions => {
                if let Some(top) = &vcd.top {
                    let names = top
                        .signals()
                        .map(|(_, idx)| vcd.signal(idx).to_string())
                        .collect::<Vec<_>>();
                    info!("Using reg: {}", names.join(", "));
                }
            }
            Token::ChangeTime(tick) => {
                self.tick = tick;
                debug!("Update timestamp: {tick}");
            }
            Token::ChangeScalar { id_code, value } => {
                apply_value_change(vcd, self, &id_code, &value.to_string())?
            }
            Token::ChangeVector { id_code, value } => {
                apply_value_change(vcd, self, &id_code, &value)?
            }
            Token::ChangeReal { id_code, value } | Token::ChangeString { id_code, value } => {
                debug!("Un-supported value `{value}` for `{id_code}`, ignored.");
            }
            Token::Comment(_)
            | Token::DumpVars
            | Token::DumpAll
            | Token::DumpOn
            | Token::DumpOff
            | Token::End => {}
        }

        Ok(())
    }

    fn scope_name<'a>(&self, vcd: &'a VcdDocument) -> &'a str {
        match self.scope {
            Some(ScopeCursor::Top) => vcd.top.as_ref().map_or("", |top| top.name()),
            Some(ScopeCursor::Side(ScopeIdx(idx))) => vcd.side_scopes[idx].name(),
            None => "",
        }
    }

    fn enter_scope(&mut self, vcd: &mut VcdDocument, name: String) {
        debug!("Enter scope: {name}");
        let repeated = vcd.top.as_ref().map(|top| top.name() == name);
        match repeated {
            None => {
                vcd.top = Some(Scope::new(name));
                self.scope = Some(ScopeCursor::Top);
            }
            Some(false) => {
                let scope_idx = ScopeIdx(vcd.side_scopes.len());
                vcd.side_scopes.push(Scope::new(name));
                self.scope = Some(ScopeCursor::Side(scope_idx));
            }
            // the cursor stays where it was
            Some(true) => warn!("Repeated scope entry: {name}. Please check vcd file."),
        }
    }

    fn current_scope<'a>(&mut self, vcd: &'a mut VcdDocument) -> Option<&'a mut Scope> {
        let cursor = match self.scope {
            Some(cursor) => cursor,
            None => {
                let orphans = *self.orphans.get_or_insert_with(|| {
                    vcd.side_scopes.push(Scope::new(ORPHANED_SCOPE_NAME));
                    ScopeIdx(vcd.side_scopes.len() - 1)
                });
                ScopeCursor::Side(orphans)
            }
        };

        match cursor {
            ScopeCursor::Top => vcd.top.as_mut(),
            ScopeCursor::Side(ScopeIdx(idx)) => vcd.side_scopes.get_mut(idx),
        }
    }

    fn declare(&mut self, vcd: &mut VcdDocument, decl: VarDecl) -> Result<(), Error> {
        vcd.sig_names
            .insert(decl.id_code.clone(), decl.reference.clone());

        let kind = match decl.var_type {
            VarType::Reg => SignalKind::Register,
            VarType::Wire => SignalKind::Wire,
            other => {
                debug!(
                    "  ignoring {other} {} ({}) | scope: {}",
                    decl.reference,
                    decl.id_code,
                    self.scope_name(vcd)
                );
                return Ok(());
            }
        };

        if decl.size == 0 {
            return Err(Error::Parse(format!(
                "Error near {}:{}. {kind} {} ({}) is declared with a width of 0.",
                file!(),
                line!(),
                decl.reference,
                decl.id_code
            )));
        }

        let signal = Signal::new(decl.reference, kind, decl.size);
        debug!(
            "  declare {kind}: {} -> {signal} | scope: {}",
            decl.id_code,
            self.scope_name(vcd)
        );

        let signal_idx = SignalIdx(vcd.all_signals.len());
        let replaced = match self.current_scope(vcd) {
            Some(scope) => scope.add_signal(&decl.id_code, signal_idx),
            None => {
                return Err(Error::Parse(format!(
                    "Error near {}:{}. No scope to attach {signal} ({}) to.",
                    file!(),
                    line!(),
                    decl.id_code
                )))
            }
        };
        vcd.all_signals.push(signal);

        let aliases = vcd.sig_map.entry(decl.id_code).or_default();
        if let Some(replaced) = replaced {
            aliases.retain(|idx| *idx != replaced);
        }
        aliases.push(signal_idx);

        Ok(())
    }
}

/// Folds a token stream into a [`VcdDocument`]. The first error ends the
/// parse; no partial document is returned.
pub fn parse_tokens<I>(tokens: I, mode: TrackMode) -> Result<VcdDocument, Error>
where
    I: IntoIterator<Item = Result<Token, String>>,
{
    let mut vcd = VcdDocument::default();
    let mut state = ParserState::new(mode);

    for token in tokens {
        state.apply(&mut vcd, token?)?;
    }

    Ok(vcd)
}

/// Parses a VCD trace, recording only the top scope's signals.
pub fn parse_vcd<R: Read>(reader: R) -> Result<VcdDocument, Error> {
    parse_vcd_with(reader, TrackMode::TopOnly)
}

pub fn parse_vcd_with<R: Read>(reader: R, mode: TrackMode) -> Result<VcdDocument, Error> {
    parse_tokens(Tokenizer::new(reader), mode)
}
