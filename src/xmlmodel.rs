use std::io::{Cursor, Read};

use xml::reader::{Events, ParserConfig, XmlEvent};

use crate::error::Error;

/// One unit of the markup stream the transducer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Open { name: String, attrs: Attributes },
    Close { name: String },
}

impl Token {
    pub fn open(name: &str, attrs: &[(&str, &str)]) -> Self {
        Token::Open {
            name: name.to_string(),
            attrs: Attributes(
                attrs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }

    pub fn close(name: &str) -> Self {
        Token::Close { name: name.to_string() }
    }

    pub fn text(text: &str) -> Self {
        Token::Text(text.to_string())
    }

    /// Reconstruct the literal markup for this token. Tag names keep the
    /// spelling they had in the source document.
    pub fn markup(&self) -> String {
        match self {
            Token::Text(t) => t.clone(),
            Token::Open { name, attrs } => {
                let attrs: String = attrs
                    .iter()
                    .map(|(k, v)| format!(" {}=\"{}\"", k, escape_attr(v)))
                    .collect();
                format!("<{}{}>", name, attrs)
            }
            Token::Close { name } => format!("</{}>", name),
        }
    }
}

/// Ordered (name, value) attribute pairs of an opening tag. Lookups ignore
/// case but the pairs keep their original spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(pub Vec<(String, String)>);

impl Attributes {
    /// Value of the named attribute. Missing and empty attributes are both
    /// `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.0.iter()
    }
}

/// Remove <!DOCTYPE ...> blocks before parsing so xml-rs does not choke on
/// entity declarations some AIML sets carry.
fn strip_doctype(xml: &str) -> String {
    if !xml.contains("<!DOCTYPE") {
        return xml.to_string();
    }
    let bytes = xml.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(b"<!DOCTYPE") {
            // Skip until the matching '>' (handling a '[' ... ']' internal subset)
            i += 9;
            let mut depth = 0usize;
            while i < bytes.len() {
                match bytes[i] {
                    b'[' => depth += 1,
                    b']' => depth = depth.saturating_sub(1),
                    b'>' if depth == 0 => {
                        i += 1;
                        break;
                    }
                    _ => {}
                }
                i += 1;
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Streaming tokenizer over an XML document.
///
/// Yields text runs (character data and CDATA alike), opening tags and
/// closing tags. Whitespace-only runs, comments, processing instructions and
/// the document prolog are dropped. Iteration stops at the end of the
/// document or after the first read error.
pub struct Tokens<R: Read> {
    events: Events<R>,
    done: bool,
}

impl<R: Read> Tokens<R> {
    pub fn new(reader: R) -> Self {
        let events = ParserConfig::new()
            .trim_whitespace(false)
            .whitespace_to_characters(false)
            .cdata_to_characters(true)
            .coalesce_characters(true)
            .create_reader(reader)
            .into_iter();
        Tokens { events, done: false }
    }
}

impl<R: Read> Iterator for Tokens<R> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let event = match self.events.next()? {
                Ok(event) => event,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            match event {
                XmlEvent::StartElement { name, attributes, .. } => {
                    let attrs = attributes
                        .into_iter()
                        .map(|a| (a.name.local_name, a.value))
                        .collect();
                    return Some(Ok(Token::Open {
                        name: name.local_name,
                        attrs: Attributes(attrs),
                    }));
                }
                XmlEvent::EndElement { name } => {
                    return Some(Ok(Token::Close { name: name.local_name }));
                }
                XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                    return Some(Ok(Token::Text(text)));
                }
                XmlEvent::EndDocument => self.done = true,
                _ => {}
            }
        }
        None
    }
}

/// Tokenize a whole in-memory document.
pub fn tokenize(text: &str) -> Tokens<Cursor<Vec<u8>>> {
    Tokens::new(Cursor::new(strip_doctype(text).into_bytes()))
}
