//! Streaming attribute rewrite for XML/SVG markup
//!
//! Markup arrives as the body of an escaped string literal. It is un-escaped,
//! decoded one token at a time by [`Tokens`], and re-encoded token by token;
//! only start elements carrying the target attribute are rebuilt. Nothing but
//! the current token is held between steps, so memory does not grow with the
//! depth or length of the document beyond its input and output buffers.

use std::borrow::Cow;
use std::fmt::Write as _;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{self, Result};

/// Prologue placed in front of every rewritten document
pub const PROLOGUE: &str = r#"<?xml version="1.0" encoding="UTF-8"?><!DOCTYPE svg>"#;

/// Rewrite every attribute whose local name is `attr_name` to `new_value`.
///
/// Returns the prologue followed by the rewritten markup. Any malformed input
/// fails the whole call; no partial output is returned.
pub fn rewrite_attribute(escaped: &str, attr_name: &str, new_value: &str) -> Result<String> {
    let markup = unescape(escaped)?;
    let replacement = escape(new_value);

    let mut buffer = Vec::with_capacity(PROLOGUE.len() + markup.len());
    buffer.extend_from_slice(PROLOGUE.as_bytes());
    let mut writer = Writer::new(buffer);

    let mut tokens = Tokens::new(&markup);
    while let Some(token) = tokens.next() {
        let event = match token? {
            Event::Start(start) => {
                Event::Start(rewrite_start(start, attr_name, &replacement, tokens.offset())?)
            }
            Event::Empty(start) => {
                Event::Empty(rewrite_start(start, attr_name, &replacement, tokens.offset())?)
            }
            // Replaced by the prologue
            Event::Decl(_) | Event::DocType(_) => continue,
            other => other,
        };
        writer
            .write_event(event)
            .map_err(error::markup::encode_failed)?;
    }

    String::from_utf8(writer.into_inner()).map_err(error::markup::encode_failed)
}

/// Un-escape the body of a double-quoted string literal.
///
/// Raw control characters other than a line feed are taken literally, so tab
/// indented markup is accepted; a raw line feed or an unescaped quote fails.
pub fn unescape(escaped: &str) -> Result<String> {
    let mut literal = String::with_capacity(escaped.len() + 2);
    literal.push('"');
    for c in escaped.chars() {
        if c.is_ascii_control() && c != '\n' {
            let _ = write!(literal, "\\u{:04x}", u32::from(c));
        } else {
            literal.push(c);
        }
    }
    literal.push('"');
    serde_json::from_str(&literal).map_err(error::markup::unescape_failed)
}

/// Lazy sequence of markup tokens.
///
/// Ends cleanly only at end of input with every element closed; any decode
/// error is yielded once and ends the sequence.
pub struct Tokens<'a> {
    reader: Reader<&'a [u8]>,
    depth: usize,
    finished: bool,
}

impl<'a> Tokens<'a> {
    pub fn new(markup: &'a str) -> Self {
        Self {
            reader: Reader::from_str(markup),
            depth: 0,
            finished: false,
        }
    }

    /// Byte offset the decoder has reached
    pub fn offset(&self) -> u64 {
        u64::try_from(self.reader.buffer_position()).unwrap_or(u64::MAX)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Event<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.reader.read_event() {
            Ok(Event::Eof) => {
                self.finished = true;
                if self.depth == 0 {
                    None
                } else {
                    Some(Err(error::markup::decode_failed(
                        self.offset(),
                        format!("{} element(s) left open at end of input", self.depth),
                    )))
                }
            }
            Ok(event) => {
                match &event {
                    Event::Start(_) => self.depth += 1,
                    Event::End(_) => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                }
                Some(Ok(event))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(error::markup::decode_failed(self.offset(), e)))
            }
        }
    }
}

/// Rebuild `start` with the target attribute replaced.
///
/// Elements without the attribute pass through untouched.
fn rewrite_start<'a>(
    start: BytesStart<'a>,
    attr_name: &str,
    replacement: &str,
    position: u64,
) -> Result<BytesStart<'a>> {
    let mut matched = false;
    for attr in start.attributes() {
        let attr = attr.map_err(|e| error::markup::decode_failed(position, e))?;
        if attr.key.local_name().as_ref() == attr_name.as_bytes() {
            matched = true;
        }
    }
    if !matched {
        return Ok(start);
    }

    let mut rewritten = start.clone();
    rewritten.clear_attributes();
    for attr in start.attributes() {
        let mut attr = attr.map_err(|e| error::markup::decode_failed(position, e))?;
        if attr.key.local_name().as_ref() == attr_name.as_bytes() {
            attr.value = Cow::Owned(replacement.as_bytes().to_vec());
        } else if attr.value.contains(&b'"') {
            // Values from single-quoted attributes are re-emitted double-quoted
            let value = String::from_utf8_lossy(&attr.value).replace('"', "&quot;");
            attr.value = Cow::Owned(value.into_bytes());
        }
        rewritten.push_attribute(attr);
    }
    Ok(rewritten)
}
