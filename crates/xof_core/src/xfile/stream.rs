//! Line-buffered character source with one-character pushback.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::Path;

/// Reads the backing source one line at a time and hands out characters.
///
/// Exactly one character of pushback is supported; the tokenizer never
/// needs more. The stream closes when dropped.
pub struct CharacterStream {
    reader: Box<dyn BufRead>,
    line: Vec<char>,
    index: usize,
    unget: Option<char>,
}

impl CharacterStream {
    /// Open a file as a character stream.
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(Box::new(BufReader::new(File::open(path)?))))
    }

    /// Stream over in-memory content (used by tests and string loading).
    pub fn from_string(content: &str) -> Self {
        Self::new(Box::new(Cursor::new(content.to_string())))
    }

    fn new(reader: Box<dyn BufRead>) -> Self {
        Self {
            reader,
            line: Vec::new(),
            index: 0,
            unget: None,
        }
    }

    /// Next character, or `None` at end of input.
    pub fn get_char(&mut self) -> io::Result<Option<char>> {
        if let Some(ch) = self.unget.take() {
            return Ok(Some(ch));
        }
        if self.index >= self.line.len() {
            let mut buf = String::new();
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line = buf.chars().collect();
            self.index = 0;
        }
        let ch = self.line[self.index];
        self.index += 1;
        Ok(Some(ch))
    }

    /// Push back exactly one character; overwrites any pending pushback.
    pub fn unget_char(&mut self, ch: char) {
        self.unget = Some(ch);
    }
}
