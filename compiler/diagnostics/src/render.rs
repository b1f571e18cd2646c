//! The code responsible for rendering diagnostics.

use super::{BareDiagnostic, Field, Listing, Severity, Subseverity};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;
use utility::{
    INDENT,
    paint::{AnsiColor, Effects, Painter},
    write_indented_list,
};


impl BareDiagnostic {
    /// The plain text of the diagnostic: the message, the body and the subdiagnostics.
    ///
    /// This is the representation golden files compare against.
    pub fn text(&self) -> String {
        let mut text = self.message.as_deref().unwrap_or_default().to_owned();
        text += &render_body(&self.body);

        for subdiagnostic in &self.subdiagnostics {
            text += "\n";
            text += subdiagnostic.severity.name();
            text += ": ";
            text += &subdiagnostic.message;
        }

        text
    }

    /// Paint the diagnostic including its header and anchor.
    pub fn render(&self, p: &mut Painter) -> io::Result<()> {
        render_header(self, p)?;

        if let Some(anchor) = &self.anchor {
            writeln!(p)?;
            p.set(palette::FRAME)?;
            write!(p, "{PADDING}{}{} ", Line::DownAndRight.get(), Line::Horizontal.get())?;
            p.unset()?;
            write!(p, "{}", anchor.owner)?;

            if !anchor.source.is_empty() {
                p.set(palette::FRAME)?;
                write!(p, " at ")?;
                p.unset()?;
                write!(p, "{}", anchor.source)?;
            }
        }

        let body = render_body(&self.body);
        let body = body.strip_prefix('\n').unwrap_or(&body);

        if !body.is_empty() {
            render_bar(p)?;

            for line in body.split('\n') {
                render_bar(p)?;
                if !line.is_empty() {
                    write!(p, " {line}")?;
                }
            }
        }

        for subdiagnostic in &self.subdiagnostics {
            render_subdiagnostic(subdiagnostic.severity, &subdiagnostic.message, p)?;
        }

        Ok(())
    }
}

fn render_header(diagnostic: &BareDiagnostic, p: &mut Painter) -> io::Result<()> {
    diagnostic.severity.render(p)?;

    if let Some(code) = diagnostic.code {
        p.set(diagnostic.severity.color())?;
        write!(p, "[{code}]")?;
        p.unset()?;
    }

    if let Some(message) = &diagnostic.message {
        write!(p, ": ")?;
        p.set(Effects::BOLD)?;
        write!(p, "{message}")?;
        p.unset()?;
    }

    Ok(())
}

fn render_body(body: &[Field]) -> String {
    let mut text = String::new();

    for field in body {
        match field {
            Field::Line(line) => {
                text += "\n";
                text += line;
            }
            Field::Listing(listing) => render_listing(listing, &mut text),
        }
    }

    text
}

fn render_listing(listing: &Listing, text: &mut String) {
    if let Some(heading) = &listing.heading {
        text.push('\n');
        text.push_str(&INDENT.repeat(listing.level.saturating_sub(1)));
        text.push_str(heading);
    }

    write_indented_list(text, &listing.items, listing.level, listing.limit);
}

fn render_bar(p: &mut Painter) -> io::Result<()> {
    writeln!(p)?;
    p.set(palette::FRAME)?;
    write!(p, "{PADDING}{}", Line::Vertical.get())?;
    p.unset()
}

fn render_subdiagnostic(severity: Subseverity, message: &str, p: &mut Painter) -> io::Result<()> {
    writeln!(p)?;
    write!(p, "{PADDING}")?;
    severity.render(p)?;
    write!(p, ": ")?;

    let mut lines = message.split('\n');

    if let Some(line) = lines.next() {
        write!(p, "{line}")?;
    }

    let spacing = " ".repeat(severity.name().width() + 1);

    for line in lines {
        writeln!(p)?;
        if !line.is_empty() {
            write!(p, "{PADDING}{spacing} {line}")?;
        }
    }

    Ok(())
}

const PADDING: &str = " ";

impl Severity {
    const fn label(self) -> &'static str {
        match self {
            Self::Bug => "internal error",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }

    const fn color(self) -> AnsiColor {
        match self {
            Self::Bug | Self::Error => palette::ERROR,
            Self::Warning => palette::WARNING,
            Self::Note => palette::HELP,
        }
    }

    fn render(self, p: &mut Painter) -> io::Result<()> {
        p.set(self.color().on_default().bold())?;
        write!(p, "{}", self.label())?;
        p.unset()
    }
}

impl Subseverity {
    const COLOR: AnsiColor = palette::HELP;

    fn render(self, p: &mut Painter) -> io::Result<()> {
        p.set(Self::COLOR.on_default().bold())?;
        write!(p, "{}", self.name())?;
        p.unset()
    }
}

#[derive(Clone, Copy)]
enum Line {
    Horizontal,
    Vertical,
    DownAndRight,
}

impl Line {
    const fn get(self) -> &'static str {
        match self {
            Self::Horizontal => "─",
            Self::Vertical => "│",
            Self::DownAndRight => "┌",
        }
    }
}

mod palette {
    use utility::paint::AnsiColor;

    pub(super) const FRAME: AnsiColor = AnsiColor::BrightBlue;
    pub(super) const ERROR: AnsiColor = AnsiColor::BrightRed;
    pub(super) const WARNING: AnsiColor = AnsiColor::BrightYellow;
    pub(super) const HELP: AnsiColor = AnsiColor::BrightCyan;
}
