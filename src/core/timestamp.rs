//! Timestamp layouts for the `#date` converter
//!
//! A layout is written either as a reference-date example
//! (`2006-01-02 15:04:05.000`, where each component of the fixed reference
//! moment `Mon Jan 2 15:04:05 MST 2006` stands for that component) or
//! directly as a strftime format (`%Y-%m-%d`). Reference layouts are
//! translated once into strftime so formatting an event is a single
//! `chrono` call.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Layout used when `#date` carries no option
pub const DEFAULT_DATE_LAYOUT: &str = "2006-01-02";

// Longest tokens first so `2006` wins over `2` and `.000000` over `.000`.
const REFERENCE_TOKENS: &[(&str, &str)] = &[
    (".000000000", "%.9f"),
    (".000000", "%.6f"),
    ("January", "%B"),
    ("Monday", "%A"),
    ("-07:00", "%:z"),
    ("Z07:00", "%:z"),
    ("-0700", "%z"),
    ("Z0700", "%z"),
    (".000", "%.3f"),
    ("2006", "%Y"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("002", "%j"),
    ("01", "%m"),
    ("02", "%d"),
    ("_2", "%e"),
    ("06", "%y"),
    ("15", "%H"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

/// A validated strftime layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLayout {
    strftime: String,
}

impl DateLayout {
    /// Build a layout from a `#date` option
    ///
    /// An empty option selects [`DEFAULT_DATE_LAYOUT`]. Options containing
    /// `%` are taken as strftime verbatim.
    pub fn parse(option: &str) -> Result<Self> {
        let option = if option.is_empty() {
            DEFAULT_DATE_LAYOUT
        } else {
            option
        };

        let strftime = if option.contains('%') {
            option.to_string()
        } else {
            translate_reference_layout(option)
        };

        if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "date",
                format!("invalid date layout '{}'", option),
            ));
        }

        Ok(Self { strftime })
    }

    /// The strftime format this layout resolved to
    #[must_use]
    pub fn as_strftime(&self) -> &str {
        &self.strftime
    }

    /// Render a timestamp in its own offset with this layout
    pub fn format<'a>(&'a self, datetime: &DateTime<FixedOffset>) -> impl fmt::Display + 'a {
        datetime.format(&self.strftime)
    }
}

impl Default for DateLayout {
    fn default() -> Self {
        Self {
            strftime: translate_reference_layout(DEFAULT_DATE_LAYOUT),
        }
    }
}

/// Translate a reference-date layout into an equivalent strftime format
#[must_use]
pub fn translate_reference_layout(layout: &str) -> String {
    let mut out = String::with_capacity(layout.len() * 2);
    let mut rest = layout;

    'outer: while let Some(c) = rest.chars().next() {
        for (token, format) in REFERENCE_TOKENS {
            if rest.starts_with(token) {
                out.push_str(format);
                rest = &rest[token.len()..];
                continue 'outer;
            }
        }

        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}
