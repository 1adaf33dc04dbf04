//! XML parser implementation
//!
//! Builds the element tree only. Text, CDATA, comments, processing
//! instructions and the DOCTYPE are checked for well-formedness and then
//! dropped; none of them take part in structural verification.

use indexmap::IndexMap;
use tracing::trace;

use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::model::{Document, NodeId};

/// Limits applied while parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// Start tag as read from the input
#[derive(Debug)]
struct StartTag {
    name: String,
    attributes: IndexMap<String, String>,
    self_closing: bool,
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    input_len: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            input_len: input.len(),
        }
    }

    /// Parse a complete document
    pub fn parse(&mut self) -> Result<Document> {
        if self.config.max_size > 0 && self.input_len > self.config.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                self.cursor.position(),
            ));
        }

        self.skip_utf8_bom();
        self.skip_misc(true)?;
        if self.cursor.is_eof() {
            return Err(Error::at(ErrorKind::MissingRoot, self.cursor.position()));
        }

        let root = self.parse_start_tag()?;
        self.check_depth(1)?;
        let mut document = Document::new(root.name.clone(), root.attributes);
        let mut open: Vec<(NodeId, String)> = Vec::new();
        if !root.self_closing {
            open.push((document.root(), root.name));
        }

        while let Some(&(parent, _)) = open.last() {
            if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated element"));
            }

            if self.cursor.starts_with(b"</") {
                self.parse_end_tag(&mut open)?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if self.cursor.starts_with(b"<![CDATA[") {
                self.cursor.advance_by(9);
                self.skip_until(b"]]>")?;
            } else if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!") {
                return Err(self.error_here(ErrorKind::InvalidToken, "unexpected declaration"));
            } else if self.cursor.current() == Some(b'<') {
                let depth = open.len().saturating_add(1);
                self.check_depth(depth)?;
                let tag = self.parse_start_tag()?;
                let id = document
                    .append_child(parent, tag.name.clone(), tag.attributes)
                    .ok_or_else(|| self.error_here(ErrorKind::InvalidToken, "dangling parent"))?;
                trace!(name = %tag.name, depth, "element");
                if !tag.self_closing {
                    open.push((id, tag.name));
                }
            } else {
                self.skip_text()?;
            }
        }

        self.skip_misc(false)?;
        if !self.cursor.is_eof() {
            return Err(Error::at(ErrorKind::TrailingContent, self.cursor.position()));
        }

        Ok(document)
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        let max = self.config.max_depth;
        if max > 0 && depth > usize::from(max) {
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded { max },
                self.cursor.position(),
            ));
        }
        Ok(())
    }

    fn parse_start_tag(&mut self) -> Result<StartTag> {
        self.expect_byte(b'<')?;
        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        let self_closing = self.cursor.consume(b'/');
        self.expect_byte(b'>')?;

        Ok(StartTag {
            name,
            attributes,
            self_closing,
        })
    }

    fn parse_end_tag(&mut self, open: &mut Vec<(NodeId, String)>) -> Result<()> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        let found = self.parse_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')?;

        match open.pop() {
            Some((_, expected)) if expected == found => Ok(()),
            Some((_, expected)) => Err(Error::new(
                ErrorKind::MismatchedTag { expected, found },
                Span::new(start, self.cursor.position()),
            )),
            None => Err(Error::at(ErrorKind::InvalidToken, start)),
        }
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            let had_space = matches!(
                self.cursor.current(),
                Some(b' ' | b'\t' | b'\r' | b'\n')
            );
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) if !had_space => {
                    return Err(self.error_here(
                        ErrorKind::InvalidToken,
                        "expected whitespace before attribute",
                    ));
                }
                Some(_) => {}
                None => return Err(Error::at(ErrorKind::UnexpectedEof, self.cursor.position())),
            }

            let name_pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, name_pos));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(
                    self.error_here(ErrorKind::InvalidToken, "expected quoted attribute value")
                )
            }
        };
        self.cursor.advance();

        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_str(raw, start_pos)?;
                return decode_entities(text, start_pos);
            }
            if b == b'<' {
                return Err(self.error_here(ErrorKind::InvalidToken, "'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated attribute value"))
    }

    fn skip_text(&mut self) -> Result<()> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_str(raw, start_pos)?;
        decode_entities(text, start_pos).map(|_| ())
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => self.cursor.advance(),
            Some(_) => return Err(Error::at(ErrorKind::InvalidName, start_pos)),
            None => return Err(Error::at(ErrorKind::UnexpectedEof, start_pos)),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        bytes_to_str(raw, start_pos).map(str::to_string)
    }

    /// Skip whitespace, comments and processing instructions outside the root
    fn skip_misc(&mut self, prolog: bool) -> Result<()> {
        let mut seen_doctype = false;
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if prolog && !seen_doctype && self.cursor.starts_with(b"<!DOCTYPE") {
                self.skip_doctype()?;
                seen_doctype = true;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_doctype(&mut self) -> Result<()> {
        // cursor at "<!DOCTYPE"; an internal subset may contain '>' inside brackets
        let mut brackets = 0u32;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match b {
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                b'>' if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated doctype"))
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.cursor.advance_by(4);
        self.skip_until(b"-->")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        self.cursor.advance_by(2);
        self.skip_until(b"?>")
    }

    fn skip_utf8_bom(&mut self) {
        if self.cursor.starts_with(&[0xEF, 0xBB, 0xBF]) {
            self.cursor.advance_by(3);
        }
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else if self.cursor.is_eof() {
            Err(Error::at(ErrorKind::UnexpectedEof, self.cursor.position()))
        } else {
            Err(self.error_here(
                ErrorKind::InvalidToken,
                &format!("expected '{}'", char::from(expected)),
            ))
        }
    }

    fn error_here(&self, kind: ErrorKind, message: &str) -> Error {
        Error::with_message(kind, Span::at(self.cursor.position()), message)
    }
}

fn bytes_to_str(bytes: &[u8], pos: Pos) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        let (head, tail) = rest.split_at(amp);
        result.push_str(head);

        let tail = tail.get(1..).unwrap_or_default();
        let Some(end) = tail.find(';') else {
            return Err(Error::at(
                ErrorKind::InvalidEntity {
                    entity: tail.to_string(),
                },
                pos,
            ));
        };
        let (entity, after) = tail.split_at(end);

        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(entity),
        };
        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::at(
                    ErrorKind::InvalidEntity {
                        entity: entity.to_string(),
                    },
                    pos,
                ))
            }
        }
        rest = after.get(1..).unwrap_or_default();
    }
    result.push_str(rest);

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
