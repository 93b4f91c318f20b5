// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::collections::VecDeque;
use std::io;
use std::io::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Line(pub(super) usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Word(pub(super) usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Cursor(pub(super) Line, pub(super) Word);

// number of lines pulled from the underlying reader per refill
const LINES_PER_REFILL: usize = 10;

/// Splits any byte source into whitespace separated words, remembering the
/// line and word position of each one for error messages.
pub(super) struct WordReader<R: Read> {
    reader: io::BufReader<R>,
    eof: bool,
    buffer: String,
    curr_line: usize,
    words: VecDeque<(String, Cursor)>,
}

impl<R: Read> WordReader<R> {
    pub(super) fn new(file: R) -> WordReader<R> {
        WordReader {
            reader: io::BufReader::new(file),
            eof: false,
            buffer: String::new(),
            curr_line: 0,
            words: VecDeque::new(),
        }
    }

    /// Returns the next word, or `Ok(None)` once the source is exhausted.
    pub(super) fn next_word(&mut self) -> Result<Option<(String, Cursor)>, String> {
        // keep reading until we either find a word or run out of lines,
        // blank lines would otherwise look like the end of the file
        while self.words.is_empty() && !self.eof {
            self.refill()?;
        }

        Ok(self.words.pop_front())
    }

    fn refill(&mut self) -> Result<(), String> {
        for _ in 0..LINES_PER_REFILL {
            self.buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.buffer).map_err(|e| {
                format!(
                    "Error near {}:{}. Failed to read line {} of vcd file: {e}",
                    file!(),
                    line!(),
                    self.curr_line + 1
                )
            })?;

            // we've reached the end of the file, no further attempts are necessary
            if bytes_read == 0 {
                self.eof = true;
                break;
            }

            self.curr_line += 1;
            for (word_idx, word) in self.buffer.split_ascii_whitespace().enumerate() {
                let position = Cursor(Line(self.curr_line), Word(word_idx + 1));
                self.words.push_back((word.to_string(), position));
            }
        }

        Ok(())
    }
}

/// Pulls the next word out of a [`WordReader`], turning the end of the file
/// into an error. Meant for places where the grammar requires another word.
macro_rules! next_word {
    ($word_reader:expr) => {
        $word_reader.next_word().and_then(|word| {
            word.ok_or_else(|| {
                format!(
                    "Error near {}:{}. Did not expect to reach end of file here.",
                    file!(),
                    line!()
                )
            })
        })
    };
}

pub(super) use next_word;
