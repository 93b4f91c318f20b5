// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::Read;

use super::super::reader::{next_word, WordReader};
use super::types::ParseResult;

pub(super) fn digit(chr: u8) -> bool {
    chr.is_ascii_digit()
}

pub(super) fn take_while(word: &str, cond: fn(u8) -> bool) -> ParseResult<'_> {
    let new_start = word.bytes().take_while(|chr| cond(*chr)).count();

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

pub(super) fn tag<'a>(word: &'a str, pattern: &str) -> ParseResult<'a> {
    let new_start = word
        .bytes()
        .zip(pattern.bytes())
        .take_while(|(c_lhs, c_rhs)| c_lhs == c_rhs)
        .count();

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

/// Consumes the next word and checks that it is exactly `keyword`.
pub(super) fn ident<R: Read>(word_reader: &mut WordReader<R>, keyword: &str) -> Result<(), String> {
    let (word, cursor) = next_word!(word_reader)?;

    if word == keyword {
        Ok(())
    } else {
        Err(format!(
            "Error near {}:{}. found keyword `{word}` but expected `{keyword}` on {cursor:?}",
            file!(),
            line!()
        ))
    }
}
