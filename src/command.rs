//! Line-oriented commands against a sheet.
//!
//! ```text
//! set A1 =B1+1     set a cell (the rest of the line is the cell text)
//! get A1           print a cell's value
//! text A1          print a cell's raw text
//! clear A1         clear a cell
//! size             print the printable size as "<rows> <cols>"
//! values           print all values, tab separated
//! texts            print all texts, tab separated
//! ```

use std::fmt::Write;

use cellgraph_core::{CellRef, Sheet};

use crate::error::{CellgraphError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Set { pos: CellRef, text: String },
    Get(CellRef),
    Text(CellRef),
    Clear(CellRef),
    Size,
    Values,
    Texts,
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str, line_no: usize) -> Result<Option<Command>> {
        let trimmed = line.trim_start();
        if trimmed.trim_end().is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = split_word(trimmed);
        let parse_error = |message: String| CellgraphError::Parse {
            line: line_no,
            message,
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "set" => {
                let (name, text) = split_word(rest.trim_start());
                let pos = parse_ref(name).map_err(parse_error)?;
                // The cell text is everything after one separating whitespace character.
                let text = text.strip_prefix(char::is_whitespace).unwrap_or(text);
                Command::Set {
                    pos,
                    text: text.trim_end_matches(['\r', '\n']).to_string(),
                }
            }
            "get" => Command::Get(single_ref(rest).map_err(parse_error)?),
            "text" => Command::Text(single_ref(rest).map_err(parse_error)?),
            "clear" => Command::Clear(single_ref(rest).map_err(parse_error)?),
            "size" => Command::Size,
            "values" => Command::Values,
            "texts" => Command::Texts,
            other => return Err(parse_error(format!("Unknown command: {}", other))),
        };
        Ok(Some(command))
    }

    /// Run the command, appending anything it prints to `out`.
    pub fn execute(&self, sheet: &mut Sheet, out: &mut String) -> Result<()> {
        match self {
            Command::Set { pos, text } => sheet.set_cell(*pos, text)?,
            Command::Get(pos) => {
                if let Some(value) = sheet.value(*pos)? {
                    write!(out, "{}", value).ok();
                }
                out.push('\n');
            }
            Command::Text(pos) => {
                if let Some(text) = sheet.text(*pos)? {
                    out.push_str(&text);
                }
                out.push('\n');
            }
            Command::Clear(pos) => sheet.clear_cell(*pos)?,
            Command::Size => {
                let size = sheet.printable_size();
                writeln!(out, "{} {}", size.rows, size.cols).ok();
            }
            Command::Values => {
                sheet.print_values(out).ok();
            }
            Command::Texts => {
                sheet.print_texts(out).ok();
            }
        }
        Ok(())
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

fn parse_ref(name: &str) -> std::result::Result<CellRef, String> {
    if name.is_empty() {
        return Err("Missing cell reference".to_string());
    }
    name.parse::<CellRef>()
}

fn single_ref(rest: &str) -> std::result::Result<CellRef, String> {
    let mut words = rest.split_whitespace();
    let pos = parse_ref(words.next().unwrap_or(""))?;
    if let Some(extra) = words.next() {
        return Err(format!("Unexpected argument: {}", extra));
    }
    Ok(pos)
}
