//! The analysis session: the declaration model, the options and the reporter.

use declaration::DeclarationModel;
use diagnostics::{Reporter, reporter::Buffer};

pub use options::{Options, Policy, Validation};

mod options;

pub struct Session<'ctx> {
    model: &'ctx DeclarationModel,
    options: Options,
    reporter: Reporter,
}

impl<'ctx> Session<'ctx> {
    pub fn new(model: &'ctx DeclarationModel, options: Options, reporter: Reporter) -> Self {
        Self {
            model,
            options,
            reporter,
        }
    }

    /// Create a session whose diagnostics are collected in the returned buffer.
    pub fn buffered(model: &'ctx DeclarationModel, options: Options) -> (Self, Buffer) {
        let buffer = Buffer::default();
        let session = Self::new(model, options, Reporter::buffer(buffer.clone()));
        (session, buffer)
    }

    pub fn model(&self) -> &'ctx DeclarationModel {
        self.model
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }
}
