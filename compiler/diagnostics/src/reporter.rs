//! The diagnostic reporter.

use super::{Diagnostic, error::Health};
use std::{
    collections::BTreeSet,
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};
use utility::paint::{ColorChoice, epaint};

/// A diagnostic reporter.
pub struct Reporter {
    kind: ReporterKind,
}

impl Reporter {
    fn new(kind: ReporterKind) -> Self {
        Self { kind }
    }

    pub fn silent() -> Self {
        Self::new(ReporterKind::Silent)
    }

    pub fn buffer(diagnostics: Buffer) -> Self {
        Self::new(ReporterKind::Buffer(diagnostics))
    }

    pub fn stderr(choice: ColorChoice) -> Self {
        Self::new(ReporterKind::Stderr(choice))
    }

    // @Task only return a witness for non-silent reporters
    pub(super) fn report(&self, diagnostic: Diagnostic) -> Health {
        let health = if diagnostic.is_error() {
            Health::Tainted(ErasedReportedError::new())
        } else {
            Health::Untainted
        };

        match &self.kind {
            ReporterKind::Silent => {}
            ReporterKind::Buffer(diagnostics) => {
                diagnostics
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(diagnostic);
            }
            ReporterKind::Stderr(choice) => {
                // A failure to write to stderr cannot be reported anywhere else.
                let _ = epaint(
                    |painter| {
                        diagnostic.render(painter)?;
                        writeln!(painter)?;
                        writeln!(painter)
                    },
                    *choice,
                );
            }
        }

        health
    }
}

enum ReporterKind {
    Silent,
    Buffer(Buffer),
    Stderr(ColorChoice),
}

/// A thread-safe, append-only and ordered collection of diagnostics.
pub type Buffer = Arc<Mutex<BTreeSet<Diagnostic>>>;

/// Take all diagnostics out of the buffer in their canonical order.
pub fn drain(buffer: &Buffer) -> Vec<Diagnostic> {
    std::mem::take(&mut *buffer.lock().unwrap_or_else(PoisonError::into_inner))
        .into_iter()
        .collect()
}

/// A witness to a [reported](Diagnostic::report) error.
///
/// A value of this type is a proof that an error was reported. Using this as an
/// error type instead of `()` makes it harder to accidentally return an error
/// without reporting anything since such a witness can only be constructed by
/// [`Diagnostic::report`] or by [`Self::new_unchecked`].
///
/// # Soundness Holes
///
/// Values of this type can be obtained from a silent reporter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErasedReportedError(());

impl ErasedReportedError {
    const fn new() -> Self {
        Self(())
    }

    /// Obtain a witness without reporting anything.
    ///
    /// Only use this if the error was reported by other means.
    pub const fn new_unchecked() -> Self {
        Self::new()
    }
}
