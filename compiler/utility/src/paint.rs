//! Colored output for stderr and in-memory buffers.
//!
//! Diagnostics are painted to stderr. Tests paint to a buffer with colors turned off.

use crate::SmallVec;
use derivation::{Elements, FromStr, Str};
use std::io::{self, BufWriter, StderrLock, Write};
use supports_color::Stream;

pub use anstyle::{AnsiColor, Effects, Style};

/// Paint to a `String`.
///
/// Convenience function that calls [`Painter::bytes`] under the hood.
pub fn paint_to_string(
    paint: impl FnOnce(&mut Painter) -> io::Result<()>,
    choice: ColorChoice,
) -> io::Result<String> {
    let mut painter = Painter::bytes(choice);
    paint(&mut painter)?;
    String::from_utf8(painter.buffer())
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))
}

/// Paint to locked and buffered stderr.
///
/// Convenience function that calls [`Painter::stderr`] under the hood.
pub fn epaint(
    paint: impl FnOnce(&mut Painter) -> io::Result<()>,
    choice: ColorChoice,
) -> io::Result<()> {
    let mut painter = Painter::stderr(choice);
    paint(&mut painter)?;
    painter.flush()
}

/// A writer keeping track of nested styles.
pub struct Painter {
    writer: Writer,
    colorize: bool,
    stack: SmallVec<Style, 3>,
}

impl Painter {
    pub fn bytes(choice: ColorChoice) -> Self {
        let colorize = choice.resolve(None);
        let writer = Writer::Bytes(Vec::new());

        Self::new(writer, colorize)
    }

    pub fn stderr(choice: ColorChoice) -> Self {
        let colorize = choice.resolve(Some(Stream::Stderr));
        let writer = Writer::Stderr(BufWriter::new(std::io::stderr().lock()));

        Self::new(writer, colorize)
    }

    fn new(writer: Writer, colorize: bool) -> Self {
        Self {
            writer,
            colorize,
            stack: SmallVec::new(),
        }
    }

    pub fn set(&mut self, style: impl IntoStyle) -> io::Result<()> {
        if !self.colorize {
            return Ok(());
        }

        let style = style.into_style();
        self.stack.push(style);
        style.write_to(&mut self.writer)
    }

    /// Restore the style that was active before the last [`Self::set`].
    pub fn unset(&mut self) -> io::Result<()> {
        if !self.colorize {
            return Ok(());
        }

        if let Some(style) = self.stack.pop() {
            style.write_reset_to(&mut self.writer)?;
        }

        for style in &self.stack {
            style.write_to(&mut self.writer)?;
        }

        Ok(())
    }

    pub fn buffer(self) -> Vec<u8> {
        match self.writer {
            Writer::Bytes(bytes) => bytes,
            Writer::Stderr(_) => Vec::new(),
        }
    }
}

impl Write for Painter {
    fn write(&mut self, buffer: &[u8]) -> io::Result<usize> {
        self.writer.write(buffer)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

enum Writer {
    Stderr(BufWriter<StderrLock<'static>>),
    Bytes(Vec<u8>),
}

impl Write for Writer {
    fn write(&mut self, buffer: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stderr(stderr) => stderr.write(buffer),
            Self::Bytes(bytes) => bytes.write(buffer),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stderr(stderr) => stderr.flush(),
            Self::Bytes(bytes) => bytes.flush(),
        }
    }
}

/// When to use color.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, FromStr, Str, Elements)]
#[format(dash_case)]
pub enum ColorChoice {
    /// Only if the stream supports it.
    #[default]
    Auto,
    Never,
    Always,
}

impl ColorChoice {
    /// Whether to colorize the given stream. Buffers are never colorized automatically.
    fn resolve(self, stream: Option<Stream>) -> bool {
        match (self, stream) {
            (Self::Auto, Some(stream)) => {
                supports_color::on_cached(stream).is_some_and(|level| level.has_basic)
            }
            (Self::Never, _) | (Self::Auto, None) => false,
            (Self::Always, _) => true,
        }
    }
}

pub trait IntoStyle {
    fn into_style(self) -> Style;
}

impl IntoStyle for Style {
    fn into_style(self) -> Style {
        self
    }
}

impl IntoStyle for AnsiColor {
    fn into_style(self) -> Style {
        self.on_default()
    }
}

impl IntoStyle for Effects {
    fn into_style(self) -> Style {
        Style::new().effects(self)
    }
}

pub trait ColorExt {
    /// Use the color as the background.
    fn to_bg(self) -> Style;
}

impl ColorExt for AnsiColor {
    fn to_bg(self) -> Style {
        Style::new().bg_color(Some(self.into()))
    }
}

#[cfg(test)]
mod test {
    use super::{AnsiColor, ColorChoice, paint_to_string};
    use std::io::Write;

    #[test]
    fn buffer_is_not_colorized_automatically() {
        let text = paint_to_string(
            |painter| {
                painter.set(AnsiColor::Red)?;
                write!(painter, "alert")?;
                painter.unset()
            },
            ColorChoice::Auto,
        )
        .unwrap();

        assert_eq!(text, "alert");
    }

    #[test]
    fn unset_restores_outer_style() {
        let text = paint_to_string(
            |painter| {
                painter.set(AnsiColor::Red)?;
                painter.set(AnsiColor::Blue)?;
                write!(painter, "inner")?;
                painter.unset()?;
                write!(painter, "outer")?;
                painter.unset()
            },
            ColorChoice::Always,
        )
        .unwrap();

        let red = AnsiColor::Red.on_default();
        assert!(text.ends_with(&format!("{}outer{}", red.render(), red.render_reset())));
        assert!(text.contains("inner"));
    }
}
