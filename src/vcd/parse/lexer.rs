// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Splits a VCD trace into [`Token`]s, one keyword section or value change
//! at a time.
use std::io::Read;

use super::super::reader::{next_word, Cursor, WordReader};
use super::combinator_atoms::{ident, tag};
use super::tokens::{ScopeKind, Token, VarDecl, VarType};
use super::types::ParseResult;

/// Pull-based lexer over any byte source. Yields `None` at end of stream.
pub struct Tokenizer<R: Read> {
    word_reader: WordReader<R>,
    failed: bool,
}

impl<R: Read> Tokenizer<R> {
    pub fn new(reader: R) -> Tokenizer<R> {
        Tokenizer {
            word_reader: WordReader::new(reader),
            failed: false,
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, String> {
        let (word, cursor) = match self.word_reader.next_word()? {
            Some(word) => word,
            None => return Ok(None),
        };

        let token = match word.as_bytes()[0] {
            b'$' => self.keyword(&word, cursor)?,
            b'#' => {
                let tick = word[1..].parse::<u64>().map_err(|e| {
                    format!(
                        "Error near {}:{}. Failed to parse `{word}` as a timestamp at {cursor:?}: {e}",
                        file!(),
                        line!()
                    )
                })?;
                Token::ChangeTime(tick)
            }
            b'0' | b'1' | b'x' | b'X' | b'z' | b'Z' | b'u' | b'U' | b'w' | b'W' | b'-'
            | b'h' | b'H' | b'l' | b'L' => {
                // scalars glue the identifier onto the value, `1!`
                let id_code = &word[1..];
                if id_code.is_empty() {
                    return Err(format!(
                        "Error near {}:{}. Scalar value change `{word}` has no identifier at {cursor:?}",
                        file!(),
                        line!()
                    ));
                }
                Token::ChangeScalar {
                    id_code: id_code.to_string(),
                    value: word.as_bytes()[0] as char,
                }
            }
            b'b' | b'B' => {
                let (id_code, _) = next_word!(self.word_reader)?;
                Token::ChangeVector {
                    id_code,
                    value: word[1..].to_string(),
                }
            }
            b'r' | b'R' => {
                let (id_code, _) = next_word!(self.word_reader)?;
                Token::ChangeReal {
                    id_code,
                    value: word[1..].to_string(),
                }
            }
            b's' | b'S' => {
                let (id_code, _) = next_word!(self.word_reader)?;
                Token::ChangeString {
                    id_code,
                    value: word[1..].to_string(),
                }
            }
            _ => {
                return Err(format!(
                    "Error near {}:{}. Unexpected word `{word}` at {cursor:?}",
                    file!(),
                    line!()
                ))
            }
        };

        Ok(Some(token))
    }

    fn keyword(&mut self, word: &str, cursor: Cursor) -> Result<Token, String> {
        let ParseResult { residual, .. } = tag(word, "$");

        let token = match residual {
            "date" => Token::Date(self.text_until_end()?),
            "version" => Token::Version(self.text_until_end()?),
            "timescale" => Token::Timescale(self.text_until_end()?),
            "comment" => Token::Comment(self.text_until_end()?),
            "scope" => self.scope()?,
            "upscope" => {
                ident(&mut self.word_reader, "$end")?;
                Token::Upscope
            }
            "var" => Token::Var(self.var()?),
            "enddefinitions" => {
                ident(&mut self.word_reader, "$end")?;
                Token::EndDefinitions
            }
            "dumpvars" => Token::DumpVars,
            "dumpall" => Token::DumpAll,
            "dumpon" => Token::DumpOn,
            "dumpoff" => Token::DumpOff,
            "end" => Token::End,
            _ => {
                return Err(format!(
                    "Error near {}:{}. Unknown keyword `{word}` at {cursor:?}",
                    file!(),
                    line!()
                ))
            }
        };

        Ok(token)
    }

    // collects every word up to `$end`, joined by single spaces
    fn text_until_end(&mut self) -> Result<String, String> {
        let mut words = Vec::<String>::new();
        loop {
            let (word, _) = next_word!(self.word_reader)?;
            if word == "$end" {
                return Ok(words.join(" "));
            }
            words.push(word);
        }
    }

    fn scope(&mut self) -> Result<Token, String> {
        // $scope module reg_mag_i $end
        //        ^^^^^^ - scope kind
        let (keyword, cursor) = next_word!(self.word_reader)?;
        let kind = ScopeKind::from_keyword(&keyword).ok_or_else(|| {
            format!(
                "Error near {}:{}. found keyword `{keyword}` but expected one of \
                 {:?} on {cursor:?}",
                file!(),
                line!(),
                ScopeKind::KEYWORDS
            )
        })?;

        // $scope module reg_mag_i $end
        //               ^^^^^^^^^ - scope name
        // Some simulators emit scopes without names; those come through
        // with an empty name.
        let (name, _) = next_word!(self.word_reader)?;
        if name == "$end" {
            return Ok(Token::Scope {
                kind,
                name: String::new(),
            });
        }

        // $scope module reg_mag_i $end
        //                         ^^^^ - end keyword
        ident(&mut self.word_reader, "$end")?;
        Ok(Token::Scope { kind, name })
    }

    fn var(&mut self) -> Result<VarDecl, String> {
        // $var reg 8 # RTSEL [7:0] $end
        //      ^^^ - var_type
        let (word, cursor) = next_word!(self.word_reader)?;
        let var_type = VarType::from_keyword(&word).ok_or_else(|| {
            format!(
                "Error near {}:{}. found keyword `{word}` but expected one of \
                 {:?} on {cursor:?}",
                file!(),
                line!(),
                VarType::KEYWORDS
            )
        })?;

        // $var reg 8 # RTSEL [7:0] $end
        //          ^ - size
        let (word, cursor) = next_word!(self.word_reader)?;
        let size = word.parse::<u32>().map_err(|e| {
            format!(
                "Error near {}:{}. Failed to parse `{word}` as a bit width on {cursor:?}: {e}",
                file!(),
                line!()
            )
        })?;

        // $var reg 8 # RTSEL [7:0] $end
        //            ^ - id_code
        let (id_code, _) = next_word!(self.word_reader)?;

        // $var reg 8 # RTSEL [7:0] $end
        //              ^^^^^ ^^^^^ - reference and optional index, until $end
        let mut reference = Vec::<String>::new();
        let mut index = None;
        loop {
            let (word, _) = next_word!(self.word_reader)?;
            match word.as_str() {
                "$end" => break,
                other if other.starts_with('[') => index = Some(word),
                _ => reference.push(word),
            }
        }

        if reference.is_empty() {
            return Err(format!(
                "Error near {}:{}. Variable `{id_code}` declared without a name on {cursor:?}",
                file!(),
                line!()
            ));
        }

        Ok(VarDecl {
            var_type,
            size,
            id_code,
            reference: reference.join(" "),
            index,
        })
    }
}

impl<R: Read> Iterator for Tokenizer<R> {
    type Item = Result<Token, String>;

    fn next(&mut self) -> Option<Self::Item> {
        // the lexer does not try to resynchronise after an error
        if self.failed {
            return None;
        }

        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Result<Vec<Token>, String> {
        Tokenizer::new(text.as_bytes()).collect()
    }

    #[test]
    fn header_sections() {
        let tokens = lex(
            "$date\n  Mon Sep 29 11:05:02 2025\n$end\n\
             $version Icarus Verilog $end\n\
             $timescale 1ns $end\n\
             $comment anything goes here $end",
        )
        .unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Date("Mon Sep 29 11:05:02 2025".to_string()),
                Token::Version("Icarus Verilog".to_string()),
                Token::Timescale("1ns".to_string()),
                Token::Comment("anything goes here".to_string()),
            ]
        );
    }

    #[test]
    fn declarations() {
        let tokens = lex(
            "$scope module tb $end\n\
             $var reg 1 ! CLK $end\n\
             $var wire 4 \" DATA [3:0] $end\n\
             $scope module $end\n\
             $upscope $end\n\
             $enddefinitions $end",
        )
        .unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Scope {
                    kind: ScopeKind::Module,
                    name: "tb".to_string()
                },
                Token::Var(VarDecl {
                    var_type: VarType::Reg,
                    size: 1,
                    id_code: "!".to_string(),
                    reference: "CLK".to_string(),
                    index: None,
                }),
                Token::Var(VarDecl {
                    var_type: VarType::Wire,
                    size: 4,
                    id_code: "\"".to_string(),
                    reference: "DATA".to_string(),
                    index: Some("[3:0]".to_string()),
                }),
                Token::Scope {
                    kind: ScopeKind::Module,
                    name: String::new()
                },
                Token::Upscope,
                Token::EndDefinitions,
            ]
        );
    }

    #[test]
    fn value_changes() {
        let tokens = lex("#0 $dumpvars 0! b0101 \" x# $end #15 1! r1.5 $ sHi %").unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::ChangeTime(0),
                Token::DumpVars,
                Token::ChangeScalar {
                    id_code: "!".to_string(),
                    value: '0'
                },
                Token::ChangeVector {
                    id_code: "\"".to_string(),
                    value: "0101".to_string()
                },
                Token::ChangeScalar {
                    id_code: "#".to_string(),
                    value: 'x'
                },
                Token::End,
                Token::ChangeTime(15),
                Token::ChangeScalar {
                    id_code: "!".to_string(),
                    value: '1'
                },
                Token::ChangeReal {
                    id_code: "$".to_string(),
                    value: "1.5".to_string()
                },
                Token::ChangeString {
                    id_code: "%".to_string(),
                    value: "Hi".to_string()
                },
            ]
        );
    }

    #[test]
    fn malformed_input_stops_the_stream() {
        let mut tokens = Tokenizer::new("#0 $bogus $end 1!".as_bytes());
        assert_eq!(tokens.next(), Some(Ok(Token::ChangeTime(0))));
        let err = tokens.next().unwrap().unwrap_err();
        assert!(err.contains("Unknown keyword `$bogus`"));
        assert_eq!(tokens.next(), None);
    }

    #[test]
    fn truncated_sections_are_errors() {
        assert!(lex("$timescale 1 ns").is_err());
        assert!(lex("$var reg 1 !").is_err());
        assert!(lex("$var reg x ! a $end").is_err());
        assert!(lex("$scope entity top $end").is_err());
        assert!(lex("#abc").is_err());
        assert!(lex("b0101").is_err());
        assert!(lex("1").is_err());
    }
}
