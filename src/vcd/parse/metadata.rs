// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use chrono::prelude::*;
use itertools::Itertools;

use super::super::timescale::{TimeScale, TimeUnit};
use super::combinator_atoms::{digit, take_while};
use super::types::ParseResult;

// layouts seen in the wild, tried in order
const DATE_FORMATS: [&str; 3] = ["%a %b %e %T %Y", "%b %e %Y %T", "%Y-%m-%d %T"];

fn parse_date_layout(text: &str) -> Option<DateTime<Utc>> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Best effort parse of a `$date` body.
///
/// A date is typically composed of the 5 following words which can occur
/// in any order: {Day, Month, Date(number in month), hh:mm:ss, year}. When
/// the text does not match a known layout as written and has exactly five
/// words, every permutation is tried.
pub(super) fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let words = text.split_ascii_whitespace().collect::<Vec<&str>>();
    let normalized = words.join(" ");

    if let Some(date) = parse_date_layout(&normalized) {
        return Some(date);
    }

    if words.len() != 5 {
        return None;
    }

    words
        .iter()
        .permutations(words.len())
        .find_map(|permutation| parse_date_layout(&permutation.into_iter().join(" ")))
}

/// Parses a `$timescale` body. We might see `1ps` or `1 ps`.
pub(super) fn parse_timescale(text: &str) -> Result<TimeScale, String> {
    let mut words = text.split_ascii_whitespace();

    let word = words.next().ok_or_else(|| {
        format!(
            "Error near {}:{}. Empty timescale declaration.",
            file!(),
            line!()
        )
    })?;

    let res = take_while(word, digit);
    let base_num: u32 = res
        .assert_match()?
        .parse()
        .map_err(|e| format!("Error near {}:{}. {e}", file!(), line!()))?;
    let ParseResult { matched, residual } = res;

    if base_num == 0 {
        return Err(format!(
            "Error near {}:{}. Timescale `{text}` must be positive.",
            file!(),
            line!()
        ));
    }

    let unit = if residual.is_empty() {
        words.next().ok_or_else(|| {
            format!(
                "Error near {}:{}. Timescale `{text}` is missing a unit.",
                file!(),
                line!()
            )
        })?
    } else {
        residual
    };
    let base_unit = unit
        .parse::<TimeUnit>()
        .map_err(|e| format!("Error near {}:{}. {e}", file!(), line!()))?;

    if let Some(extra) = words.next() {
        return Err(format!(
            "Error near {}:{}. Unexpected `{extra}` after timescale {matched}{unit}.",
            file!(),
            line!()
        ));
    }

    Ok(TimeScale::new(base_num, base_unit))
}
