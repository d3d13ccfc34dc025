//! Interactive prompt for search parameters
//!
//! Reads the textual menu and the four search inputs, producing a typed
//! [`Attempt`] per cycle. Rejected input is a value, not a caught panic:
//! the session controller decides what a diagnostic means for the state
//! machine. Generic over reader and writer so tests drive it with
//! in-memory buffers.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::domain::search::{InputError, SearchParameters};

/// One cycle of user interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// User chose to exit (or the input stream ended)
    Exit,
    /// A fully validated set of search parameters
    Search(SearchParameters),
    /// Rejected input; report the diagnostic and re-prompt from the top
    Invalid(InputError),
}

pub struct Prompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print the startup banner once at session start
    pub fn banner(&mut self) -> Result<()> {
        writeln!(self.writer, "www.national.co.uk | tyre-scout")?;
        Ok(())
    }

    /// Run one full prompt cycle: menu, then dimensions and postcode
    pub fn next_attempt(&mut self) -> Result<Attempt> {
        let choice = match self.read_line("1 to Continue\n0 to Exit\n> ")? {
            Some(line) => line,
            None => return Ok(Attempt::Exit),
        };
        match choice.trim().parse::<i64>() {
            Ok(0) => return Ok(Attempt::Exit),
            Ok(_) => {}
            Err(_) => {
                return Ok(Attempt::Invalid(InputError::NotAnInteger {
                    field: "menu",
                    raw: choice,
                }))
            }
        }

        let width = match self.read_dimension("Width: ")? {
            Ok(value) => value,
            Err(e) => return Ok(Attempt::Invalid(e)),
        };
        let aspect_ratio = match self.read_dimension("Aspect ratio: ")? {
            Ok(value) => value,
            Err(e) => return Ok(Attempt::Invalid(e)),
        };
        let rim_size = match self.read_dimension("Rim size: ")? {
            Ok(value) => value,
            Err(e) => return Ok(Attempt::Invalid(e)),
        };

        let postcode = match self.read_line("Postcode: ")? {
            Some(line) => line,
            None => return Ok(Attempt::Exit),
        };

        match SearchParameters::new(width, aspect_ratio, rim_size, &postcode) {
            Ok(params) => Ok(Attempt::Search(params)),
            Err(e) => Ok(Attempt::Invalid(e)),
        }
    }

    /// Print a report line back to the user
    pub fn report(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{message}")?;
        Ok(())
    }

    fn read_dimension(&mut self, label: &'static str) -> Result<Result<u32, InputError>> {
        let raw = match self.read_line(label)? {
            Some(line) => line,
            // Stream ended mid-attempt; surface as a rejected attempt so
            // the session sees Exit on its next menu read
            None => String::new(),
        };
        Ok(raw
            .trim()
            .parse::<u32>()
            .map_err(|_| InputError::NotAnInteger { field: label, raw }))
    }

    /// Prompt and read one line; `None` means the input stream is closed
    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.writer, "{label}")?;
        self.writer.flush()?;

        let mut line = String::new();
        let bytes = self
            .reader
            .read_line(&mut line)
            .context("Failed to read user input")?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
