//! Pattern string parsing
//!
//! A pattern is a run of literal text and converter references:
//!
//! ```text
//! #color(#date{2006-01-02}){cyan} #color(#level) #message #fields
//! ```
//!
//! A reference is `#` followed by an identifier, optionally followed by a
//! child sequence in `(...)` and/or raw comma-separated options in `{...}`,
//! in either order. `#`, parentheses and braces that do not belong to a
//! converter head are literal text, but parentheses and braces must still
//! balance across the whole pattern. Converter names are not checked here.

use crate::core::error::{LoggerError, Result};
use std::fmt;
use std::str::FromStr;

/// Character that introduces a converter reference
pub const MARKER: char = '#';

/// One element of a parsed pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternNode {
    /// Text copied verbatim into the output
    Literal(String),
    /// Reference to a named converter
    Converter {
        name: String,
        options: Vec<String>,
        children: Vec<PatternNode>,
    },
}

impl PatternNode {
    /// Shorthand for a converter without options or children
    pub fn converter(name: impl Into<String>) -> Self {
        PatternNode::Converter {
            name: name.into(),
            options: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        PatternNode::Literal(text.into())
    }
}

/// A parsed pattern: an ordered sequence of top-level nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    nodes: Vec<PatternNode>,
}

impl Pattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut parser = PatternParser {
            src: pattern,
            pos: 0,
        };
        let nodes = parser.parse_sequence(None)?;
        Ok(Self { nodes })
    }

    pub fn from_nodes(nodes: Vec<PatternNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[PatternNode] {
        &self.nodes
    }

    /// Names of every converter referenced, depth first
    pub fn converter_names(&self) -> Vec<&str> {
        fn collect<'a>(nodes: &'a [PatternNode], names: &mut Vec<&'a str>) {
            for node in nodes {
                if let PatternNode::Converter { name, children, .. } = node {
                    names.push(name);
                    collect(children, names);
                }
            }
        }

        let mut names = Vec::new();
        collect(&self.nodes, &mut names);
        names
    }
}

impl FromStr for Pattern {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Pattern::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes)
    }
}

fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[PatternNode]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        match node {
            PatternNode::Literal(text) => f.write_str(text)?,
            PatternNode::Converter {
                name,
                options,
                children,
            } => {
                // A following literal that could extend the head needs both
                // slots spelled out to terminate it.
                let closed = match nodes.get(i + 1) {
                    Some(PatternNode::Literal(text)) => text
                        .chars()
                        .next()
                        .is_some_and(|c| c == '(' || c == '{' || is_ident_char(c)),
                    _ => false,
                };

                write!(f, "{}{}", MARKER, name)?;
                if closed || !children.is_empty() {
                    f.write_str("(")?;
                    write_nodes(f, children)?;
                    f.write_str(")")?;
                }
                if closed || !options.is_empty() {
                    write!(f, "{{{}}}", options.join(","))?;
                }
            }
        }
    }
    Ok(())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct PatternParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> PatternParser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Parse nodes until end of input, or until the `)` matching `open`
    fn parse_sequence(&mut self, open: Option<usize>) -> Result<Vec<PatternNode>> {
        let mut nodes = Vec::new();
        let mut literal = String::new();
        let mut literal_parens: Vec<usize> = Vec::new();
        let mut literal_braces: Vec<usize> = Vec::new();

        while let Some(c) = self.peek() {
            match c {
                MARKER if self.peek_second().is_some_and(is_ident_start) => {
                    flush_literal(&mut literal, &mut nodes);
                    let node = self.parse_converter()?;
                    nodes.push(node);
                }
                '(' => {
                    literal_parens.push(self.pos);
                    literal.push(c);
                    self.bump();
                }
                ')' => {
                    if literal_parens.pop().is_some() {
                        literal.push(c);
                        self.bump();
                    } else if open.is_some() {
                        if let Some(&brace) = literal_braces.first() {
                            return Err(LoggerError::parse(brace, "unclosed '{'"));
                        }
                        self.bump();
                        flush_literal(&mut literal, &mut nodes);
                        return Ok(nodes);
                    } else {
                        return Err(LoggerError::parse(self.pos, "unmatched ')'"));
                    }
                }
                '{' => {
                    literal_braces.push(self.pos);
                    literal.push(c);
                    self.bump();
                }
                '}' => {
                    if literal_braces.pop().is_some() {
                        literal.push(c);
                        self.bump();
                    } else {
                        return Err(LoggerError::parse(self.pos, "unmatched '}'"));
                    }
                }
                _ => {
                    literal.push(c);
                    self.bump();
                }
            }
        }

        if let Some(&paren) = literal_parens.first() {
            return Err(LoggerError::parse(paren, "unclosed '('"));
        }
        if let Some(&brace) = literal_braces.first() {
            return Err(LoggerError::parse(brace, "unclosed '{'"));
        }
        if let Some(open) = open {
            return Err(LoggerError::parse(open, "unclosed '('"));
        }

        flush_literal(&mut literal, &mut nodes);
        Ok(nodes)
    }

    /// Parse `#name`, then at most one `(...)` and at most one `{...}`
    fn parse_converter(&mut self) -> Result<PatternNode> {
        self.bump();
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        let name = self.src[start..self.pos].to_string();

        let mut children = None;
        let mut options = None;
        loop {
            match self.peek() {
                Some('(') if children.is_none() => {
                    let open = self.pos;
                    self.bump();
                    children = Some(self.parse_sequence(Some(open))?);
                }
                Some('{') if options.is_none() => {
                    let open = self.pos;
                    self.bump();
                    options = Some(self.parse_options(open)?);
                }
                _ => break,
            }
        }

        Ok(PatternNode::Converter {
            name,
            options: options.unwrap_or_default(),
            children: children.unwrap_or_default(),
        })
    }

    /// Read raw option text up to the `}` matching `open`
    ///
    /// Nested braces are kept as part of the option text; commas at the top
    /// level separate options. Nothing inside is otherwise interpreted.
    fn parse_options(&mut self, open: usize) -> Result<Vec<String>> {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(c) = self.peek() {
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => {
                    let raw = &self.src[start..self.pos];
                    self.bump();
                    return Ok(split_options(raw));
                }
                '}' => depth -= 1,
                _ => {}
            }
            self.bump();
        }

        Err(LoggerError::parse(open, "unclosed '{'"))
    }
}

fn flush_literal(literal: &mut String, nodes: &mut Vec<PatternNode>) {
    if !literal.is_empty() {
        nodes.push(PatternNode::Literal(std::mem::take(literal)));
    }
}

fn split_options(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut options = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                options.push(raw[start..i].to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    options.push(raw[start..].to_string());
    options
}
