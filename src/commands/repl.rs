//! Interactive command loop
//!
//! Each input line is split into words (single and double quotes group words, a backslash
//! escapes the next character outside single quotes) and parsed with the same clap definition
//! as the command line. Errors are printed and the loop goes on; `exit`, `quit` or the end of
//! the input leave it.

use crate::areas::repository::Repository;
use crate::commands::Command;
use crate::errors::Result;
use clap::{Parser, Subcommand};
use std::io::BufRead;
use thiserror::Error;

pub const PROMPT: &str = "minigit> ";

#[derive(Debug, Parser)]
#[command(name = "minigit", no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Debug, Subcommand)]
enum ReplCommand {
    #[command(flatten)]
    Core(Command),
    #[command(name = "exit", visible_alias = "quit", about = "Leave the interactive session")]
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
    #[error("trailing backslash")]
    TrailingEscape,
}

/// Split a command line into words
pub fn tokenize(line: &str) -> std::result::Result<Vec<String>, TokenizeError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some(next) if next == c => break,
                        Some('\\') if c == '"' => {
                            current.push(chars.next().ok_or(TokenizeError::UnterminatedQuote(c))?)
                        }
                        Some(next) => current.push(next),
                        None => return Err(TokenizeError::UnterminatedQuote(c)),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next().ok_or(TokenizeError::TrailingEscape)?);
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }

    Ok(words)
}

impl Repository {
    /// Read commands from `input` until `exit`, `quit` or end of input
    ///
    /// Only I/O failures on the session itself end the loop with an error.
    pub fn repl(&self, mut input: impl BufRead) -> Result<()> {
        let mut line = String::new();

        loop {
            {
                let mut writer = self.writer();
                write!(writer, "{PROMPT}")?;
                writer.flush()?;
            }

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(self.writer())?;
                break;
            }

            let words = match tokenize(&line) {
                Ok(words) if words.is_empty() => continue,
                Ok(words) => words,
                Err(error) => {
                    writeln!(self.writer(), "error: {error}")?;
                    continue;
                }
            };

            match ReplLine::try_parse_from(words) {
                Ok(ReplLine {
                    command: ReplCommand::Exit,
                }) => break,
                Ok(ReplLine {
                    command: ReplCommand::Core(command),
                }) => {
                    if let Err(error) = self.execute(&command) {
                        tracing::debug!(?error, "command failed");
                        writeln!(self.writer(), "error: {error}")?;
                    }
                }
                Err(error) => {
                    write!(self.writer(), "{}", error.render())?;
                }
            }
        }

        Ok(())
    }
}
