//! Converters: the compiled, executable form of a pattern
//!
//! Each converter appends one part of a log line to a caller-supplied
//! buffer. A [`ConverterChain`] runs its converters in order; converters such
//! as `#color` own a nested chain of their own.

use crate::core::log_event::LogEvent;
use crate::core::timestamp::DateLayout;
use crate::core::error::{LoggerError, Result};
use colored::Color;
use std::borrow::Cow;
use std::fmt;
use std::io::Write;

const COLOR_RESET: &[u8] = b"\x1b[0m";

/// A converter supplied by the caller rather than built in
///
/// Registered through [`ConverterRegistry`](super::ConverterRegistry); each
/// compiled reference gets its own instance, so `convert` may keep scratch
/// state in `self`.
pub trait CustomConverter: Send {
    fn attach_options(&mut self, _options: &[String]) -> Result<()> {
        Ok(())
    }

    fn attach_child(&mut self, _child: ConverterChain) {}

    fn convert(&mut self, event: &LogEvent, out: &mut Vec<u8>);
}

pub enum Converter {
    /// Fixed text between converter references
    Literal(String),
    Color(ColorConverter),
    Level,
    Date(DateLayout),
    Logger(LoggerConverter),
    Message,
    Fields,
    Custom(Box<dyn CustomConverter>),
}

impl Converter {
    pub fn color() -> Self {
        Converter::Color(ColorConverter::default())
    }

    pub fn date() -> Self {
        Converter::Date(DateLayout::default())
    }

    pub fn logger() -> Self {
        Converter::Logger(LoggerConverter::default())
    }

    pub fn custom<C: CustomConverter + 'static>(converter: C) -> Self {
        Converter::Custom(Box::new(converter))
    }

    /// Apply the raw `{...}` options of the pattern reference
    pub fn attach_options(&mut self, options: &[String]) -> Result<()> {
        match self {
            Converter::Color(color) => {
                color.attach_options(options);
                Ok(())
            }
            Converter::Date(layout) => {
                if let Some(option) = options.first() {
                    *layout = DateLayout::parse(option)?;
                }
                Ok(())
            }
            Converter::Logger(logger) => logger.attach_options(options),
            Converter::Custom(custom) => custom.attach_options(options),
            Converter::Literal(_) | Converter::Level | Converter::Message | Converter::Fields => {
                Ok(())
            }
        }
    }

    /// Hand over the compiled `(...)` children; ignored by leaf converters
    pub fn attach_child(&mut self, child: ConverterChain) {
        match self {
            Converter::Color(color) => color.child = child,
            Converter::Custom(custom) => custom.attach_child(child),
            _ => {}
        }
    }

    pub fn convert(&mut self, event: &LogEvent, out: &mut Vec<u8>) {
        match self {
            Converter::Literal(text) => out.extend_from_slice(text.as_bytes()),
            Converter::Color(color) => color.convert(event, out),
            Converter::Level => out.extend_from_slice(event.level.to_str().as_bytes()),
            Converter::Date(layout) => {
                // Writing into a Vec cannot fail; layouts are validated up front
                let _ = write!(out, "{}", layout.format(&event.timestamp));
            }
            Converter::Logger(logger) => logger.convert(event, out),
            Converter::Message => {
                if event.message.is_empty() {
                    out.push(b'-');
                } else {
                    out.extend_from_slice(event.message.as_bytes());
                }
            }
            Converter::Fields => {
                for (i, (key, value)) in event.fields.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    let start = out.len();
                    let _ = write!(out, "{}={}", key, value);
                    escape_line_breaks(out, start);
                }
            }
            Converter::Custom(custom) => custom.convert(event, out),
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converter::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Converter::Color(color) => f.debug_tuple("Color").field(color).finish(),
            Converter::Level => f.write_str("Level"),
            Converter::Date(layout) => f.debug_tuple("Date").field(layout).finish(),
            Converter::Logger(logger) => f.debug_tuple("Logger").field(logger).finish(),
            Converter::Message => f.write_str("Message"),
            Converter::Fields => f.write_str("Fields"),
            Converter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Ordered converters executed head to tail
#[derive(Debug, Default)]
pub struct ConverterChain {
    converters: Vec<Converter>,
}

impl ConverterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, converter: Converter) {
        self.converters.push(converter);
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Converter> {
        self.converters.iter()
    }

    pub fn convert(&mut self, event: &LogEvent, out: &mut Vec<u8>) {
        for converter in &mut self.converters {
            converter.convert(event, out);
        }
    }
}

/// Escape `\n`, `\r` and `\t` in `out[start..]` so one event stays one line
fn escape_line_breaks(out: &mut Vec<u8>, start: usize) {
    if !out[start..]
        .iter()
        .any(|b| matches!(b, b'\n' | b'\r' | b'\t'))
    {
        return;
    }
    let written = out.split_off(start);
    for b in written {
        match b {
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            _ => out.push(b),
        }
    }
}

/// Look up a color by its pattern name (`cyan`, `redbr`, ...)
pub fn color_by_name(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "blackbr" => Color::BrightBlack,
        "redbr" => Color::BrightRed,
        "greenbr" => Color::BrightGreen,
        "yellowbr" => Color::BrightYellow,
        "bluebr" => Color::BrightBlue,
        "magentabr" => Color::BrightMagenta,
        "cyanbr" => Color::BrightCyan,
        "whitebr" => Color::BrightWhite,
        _ => return None,
    };
    Some(color)
}

fn write_color(out: &mut Vec<u8>, color: Color) {
    out.extend_from_slice(b"\x1b[");
    out.extend_from_slice(color.to_fg_str().as_bytes());
    out.push(b'm');
}

/// `#color(...){name}`: wraps its children in ANSI color codes
///
/// A direct `#level` child is colored by severity instead, after which the
/// outer color is re-applied for any remaining children.
#[derive(Debug, Default)]
pub struct ColorConverter {
    color: Option<Color>,
    child: ConverterChain,
    buf: Vec<u8>,
}

impl ColorConverter {
    fn attach_options(&mut self, options: &[String]) {
        if let Some(name) = options.first() {
            self.color = Some(color_by_name(name).unwrap_or(Color::White));
        }
    }

    fn convert(&mut self, event: &LogEvent, out: &mut Vec<u8>) {
        self.buf.clear();
        if let Some(color) = self.color {
            write_color(&mut self.buf, color);
        }

        let count = self.child.converters.len();
        for (i, converter) in self.child.converters.iter_mut().enumerate() {
            if let Converter::Level = converter {
                write_color(&mut self.buf, event.level.color_code());
                converter.convert(event, &mut self.buf);
                self.buf.extend_from_slice(COLOR_RESET);
                if let Some(color) = self.color {
                    if i + 1 < count {
                        write_color(&mut self.buf, color);
                    }
                }
            } else {
                converter.convert(event, &mut self.buf);
            }
        }

        self.buf.extend_from_slice(COLOR_RESET);
        out.extend_from_slice(&self.buf);
    }
}

/// `#logger{N}`: the event's logger name, abbreviated to about `N` characters
#[derive(Debug, Default)]
pub struct LoggerConverter {
    width: Option<usize>,
}

impl LoggerConverter {
    fn attach_options(&mut self, options: &[String]) -> Result<()> {
        let Some(option) = options.first() else {
            return Ok(());
        };
        let width: usize = option.trim().parse().map_err(|_| {
            LoggerError::config("logger", format!("width '{}' is not a number", option))
        })?;
        self.width = (width > 0).then_some(width);
        Ok(())
    }

    fn convert(&mut self, event: &LogEvent, out: &mut Vec<u8>) {
        match event.logger.as_deref() {
            Some(name) if !name.is_empty() => {
                let name = match self.width {
                    Some(width) => abbreviate(name, width),
                    None => Cow::Borrowed(name),
                };
                let start = out.len();
                out.extend_from_slice(name.as_bytes());
                escape_line_breaks(out, start);
            }
            _ => out.push(b'-'),
        }
    }
}

/// Shorten `/`- and `.`-separated leading segments to their first character
/// until the name is shorter than `width`; the segment after the last `/` is
/// kept whole.
pub fn abbreviate(name: &str, width: usize) -> Cow<'_, str> {
    if name.len() <= width {
        return Cow::Borrowed(name);
    }
    let last_slash = match name.rfind('/') {
        Some(index) if index > 0 => index,
        _ => return Cow::Borrowed(name),
    };

    let (head, tail) = name.split_at(last_slash);
    let mut abbr = String::with_capacity(width.max(tail.len() + 8));
    let mut seg_start = 0;

    for (i, c) in head.char_indices() {
        if c == '/' || c == '.' {
            if let Some(first) = head[seg_start..i].chars().next() {
                abbr.push(first);
            }
            abbr.push(c);
            seg_start = i + 1;

            if abbr.len() + (name.len() - seg_start) < width {
                abbr.push_str(&name[seg_start..]);
                return Cow::Owned(abbr);
            }
        }
    }

    if let Some(first) = head[seg_start..].chars().next() {
        abbr.push(first);
    }
    abbr.push_str(tail);
    Cow::Owned(abbr)
}
