// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Begin,
    Task,
    Function,
    Fork,
    Generate,
    Interface,
}

impl ScopeKind {
    pub(super) const KEYWORDS: [&'static str; 7] = [
        "module",
        "begin",
        "task",
        "function",
        "fork",
        "generate",
        "interface",
    ];

    pub(super) fn from_keyword(word: &str) -> Option<ScopeKind> {
        match word {
            "module" => Some(ScopeKind::Module),
            "begin" => Some(ScopeKind::Begin),
            "task" => Some(ScopeKind::Task),
            "function" => Some(ScopeKind::Function),
            "fork" => Some(ScopeKind::Fork),
            "generate" => Some(ScopeKind::Generate),
            "interface" => Some(ScopeKind::Interface),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VarType {
    Event,
    Integer,
    Parameter,
    Real,
    RealTime,
    Reg,
    Str,
    Supply0,
    Supply1,
    Time,
    Tri,
    TriAnd,
    TriOr,
    TriReg,
    Tri0,
    Tri1,
    WAnd,
    Wire,
    WOr,
    SVInt,
    SVShortInt,
    SVLongInt,
    SVChar,
    SVLogic,
    SVBit,
    SVShortReal,
}

impl VarType {
    pub(super) const KEYWORDS: [&'static str; 29] = [
        "event",
        "integer",
        "parameter",
        "real",
        "realtime",
        "reg",
        "string",
        "supply0",
        "supply1",
        "time",
        "tri",
        "triand",
        "trior",
        "trireg",
        "tri0",
        "tri1",
        "wand",
        "wire",
        "wor",
        "int",
        "int_s",
        "shortint",
        "int_l",
        "longint",
        "char",
        "byte",
        "logic",
        "bit",
        "shortreal",
    ];

    pub(super) fn from_keyword(word: &str) -> Option<VarType> {
        match word {
            "event" => Some(VarType::Event),
            "integer" => Some(VarType::Integer),
            "parameter" => Some(VarType::Parameter),
            "real" => Some(VarType::Real),
            "realtime" => Some(VarType::RealTime),
            "reg" => Some(VarType::Reg),
            "string" => Some(VarType::Str),
            "supply0" => Some(VarType::Supply0),
            "supply1" => Some(VarType::Supply1),
            "time" => Some(VarType::Time),
            "tri" => Some(VarType::Tri),
            "triand" => Some(VarType::TriAnd),
            "trior" => Some(VarType::TriOr),
            "trireg" => Some(VarType::TriReg),
            "tri0" => Some(VarType::Tri0),
            "tri1" => Some(VarType::Tri1),
            "wand" => Some(VarType::WAnd),
            "wire" => Some(VarType::Wire),
            "wor" => Some(VarType::WOr),
            "int" => Some(VarType::SVInt),
            "int_s" | "shortint" => Some(VarType::SVShortInt),
            "int_l" | "longint" => Some(VarType::SVLongInt),
            "char" | "byte" => Some(VarType::SVChar),
            "logic" => Some(VarType::SVLogic),
            "bit" => Some(VarType::SVBit),
            "shortreal" => Some(VarType::SVShortReal),
            _ => None,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            VarType::Event => "event",
            VarType::Integer => "integer",
            VarType::Parameter => "parameter",
            VarType::Real => "real",
            VarType::RealTime => "realtime",
            VarType::Reg => "reg",
            VarType::Str => "string",
            VarType::Supply0 => "supply0",
            VarType::Supply1 => "supply1",
            VarType::Time => "time",
            VarType::Tri => "tri",
            VarType::TriAnd => "triand",
            VarType::TriOr => "trior",
            VarType::TriReg => "trireg",
            VarType::Tri0 => "tri0",
            VarType::Tri1 => "tri1",
            VarType::WAnd => "wand",
            VarType::Wire => "wire",
            VarType::WOr => "wor",
            VarType::SVInt => "int",
            VarType::SVShortInt => "shortint",
            VarType::SVLongInt => "longint",
            VarType::SVChar => "byte",
            VarType::SVLogic => "logic",
            VarType::SVBit => "bit",
            VarType::SVShortReal => "shortreal",
        };
        f.write_str(keyword)
    }
}

/// `$var reg 8 # RTSEL [7:0] $end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub var_type: VarType,
    pub size: u32,
    pub id_code: String,
    pub reference: String,
    /// Optional bit range written after the reference, e.g. `[7:0]`.
    pub index: Option<String>,
}

/// One lexical item of a VCD trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Date(String),
    Version(String),
    /// Raw `$timescale` body such as `1 ns` or `10ps`.
    Timescale(String),
    Comment(String),
    Scope { kind: ScopeKind, name: String },
    Upscope,
    Var(VarDecl),
    EndDefinitions,
    ChangeTime(u64),
    ChangeScalar { id_code: String, value: char },
    /// Binary digits following `b`, without the prefix.
    ChangeVector { id_code: String, value: String },
    ChangeReal { id_code: String, value: String },
    ChangeString { id_code: String, value: String },
    DumpVars,
    DumpAll,
    DumpOn,
    DumpOff,
    /// `$end` closing a `$dumpvars`-style section.
    End,
}
