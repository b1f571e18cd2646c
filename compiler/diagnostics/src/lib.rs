//! The diagnostics system.
//!
//! Diagnostics are structured records: a one-line message, an ordered body of
//! typed fields and a list of subdiagnostics. The text of a diagnostic is only
//! produced by the renderer which applies indentation and list truncation.

use derivation::Str;
use std::ops::Deref;
use utility::Str;

pub use code::ErrorCode;
pub use reporter::Reporter;

mod code;
mod render;

pub mod error;
pub mod reporter;

/// A complex diagnostic message anchored at a component or module.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
#[must_use]
pub struct Diagnostic {
    bare: Box<BareDiagnostic>,
}

impl Diagnostic {
    fn new(severity: Severity) -> Self {
        Self {
            bare: Box::new(BareDiagnostic::new(severity)),
        }
    }

    /// Create a diagnostic for an internal error.
    pub fn bug() -> Self {
        Self::new(Severity::Bug)
    }

    /// Create a diagnostic for a user error.
    pub fn error() -> Self {
        Self::new(Severity::Error)
    }

    /// Create a diagnostic for a warning.
    pub fn warning() -> Self {
        Self::new(Severity::Warning)
    }

    /// Create a diagnostic of the given severity.
    pub fn with_severity(severity: Severity) -> Self {
        Self::new(severity)
    }

    pub fn code(mut self, code: ErrorCode) -> Self {
        self.bare.code = Some(code);
        self
    }

    /// Add a text message describing the issue.
    ///
    /// # Guidelines
    ///
    /// * The message should not contain any line breaks, use [fields](Self::line) instead
    /// * The message should be able to stand on its own without the body
    pub fn message(mut self, message: impl Into<Str>) -> Self {
        self.bare.message = Some(message.into());
        self
    }

    /// Anchor the diagnostic at a component or module together with a source-location token.
    pub fn anchor(mut self, owner: impl Into<Str>, source: impl Into<Str>) -> Self {
        self.bare.anchor = Some(Anchor {
            owner: owner.into(),
            source: source.into(),
        });
        self
    }

    /// Set the signature of the entity the diagnostic is about.
    ///
    /// Diagnostics sharing an anchor are ordered by their subject.
    pub fn subject(mut self, subject: impl Into<Str>) -> Self {
        self.bare.subject = Some(subject.into());
        self
    }

    /// Append a line of text to the body. The line may contain line breaks.
    pub fn line(mut self, line: impl Into<Str>) -> Self {
        self.bare.body.push(Field::Line(line.into()));
        self
    }

    /// Append an indented list to the body.
    pub fn listing(mut self, listing: Listing) -> Self {
        self.bare.body.push(Field::Listing(listing));
        self
    }

    fn subdiagnostic(mut self, severity: Subseverity, message: Str) -> Self {
        self.bare
            .subdiagnostics
            .push(Subdiagnostic { severity, message });
        self
    }

    /// Add further clarifying information. May span multiple lines.
    pub fn note(self, message: impl Into<Str>) -> Self {
        self.subdiagnostic(Subseverity::Note, message.into())
    }

    /// Add steps or tips to solve the diagnosed issue.
    pub fn help(self, message: impl Into<Str>) -> Self {
        self.subdiagnostic(Subseverity::Help, message.into())
    }

    pub fn with(self, builder: impl FnOnce(Self) -> Self) -> Self {
        builder(self)
    }

    /// Report the diagnostic.
    pub fn report(self, reporter: &Reporter) -> error::Health {
        reporter.report(self)
    }
}

impl Deref for Diagnostic {
    type Target = BareDiagnostic;

    fn deref(&self) -> &Self::Target {
        &self.bare
    }
}

// The field order determines the order of buffered diagnostics:
// by anchor first, then by subject.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct BareDiagnostic {
    pub anchor: Option<Anchor>,
    pub subject: Option<Str>,
    pub code: Option<ErrorCode>,
    pub message: Option<Str>,
    pub body: Vec<Field>,
    pub subdiagnostics: Vec<Subdiagnostic>,
    pub severity: Severity,
}

impl BareDiagnostic {
    fn new(severity: Severity) -> Self {
        Self {
            anchor: None,
            subject: None,
            code: None,
            message: None,
            body: Vec::new(),
            subdiagnostics: Vec::new(),
            severity,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Bug | Severity::Error)
    }
}

/// The component or module a diagnostic is reported on.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct Anchor {
    pub owner: Str,
    /// An opaque source-location token supplied by the front-end.
    pub source: Str,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub enum Field {
    Line(Str),
    Listing(Listing),
}

/// An indented list, optionally preceded by a heading one level less indented.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct Listing {
    pub heading: Option<Str>,
    pub level: usize,
    pub items: Vec<Str>,
    /// The maximum number of items shown, the rest is summarized.
    pub limit: Option<usize>,
}

impl Listing {
    pub fn new(items: impl IntoIterator<Item = impl Into<Str>>) -> Self {
        Self {
            heading: None,
            level: 1,
            items: items.into_iter().map(Into::into).collect(),
            limit: None,
        }
    }

    pub fn heading(mut self, heading: impl Into<Str>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Part of a [diagnostic](Diagnostic) providing extra text messages.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct Subdiagnostic {
    pub severity: Subseverity,
    pub message: Str,
}

/// Level of severity of a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Debug, PartialOrd, Ord, Hash, Str)]
#[format(dash_case)]
pub enum Severity {
    /// An internal error.
    Bug,
    /// A user error.
    Error,
    Warning,
    Note,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, PartialOrd, Ord, Str)]
#[format(dash_case)]
pub enum Subseverity {
    /// An auxiliary note.
    Note,
    /// A message containing steps to solve an issue.
    Help,
}
