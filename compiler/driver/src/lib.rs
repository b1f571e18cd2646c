//! The entry point of the binding analysis.
//!
//! The passes run in the following order:
//!
//! 1. The [declaration model](DeclarationModel) is checked for contract violations.
//!    The analysis halts if there are any.
//! 2. The entry points of all components are [resolved](resolver::resolve).
//!    With full-graph validation enabled, every key declared by a component is
//!    [resolved as well](resolver::resolve_full).
//! 3. The resolved graphs are [validated](validator::validate).

use declaration::{ComponentIndex, DeclarationModel};
use diagnostics::{
    Diagnostic, Reporter,
    error::{Health, Result},
    reporter::drain,
};
use index_map::IndexMap;
use resolver::{BindingGraph, ResolvedGraph};
use session::{Options, Session};
use std::ffi::OsString;
use tracing::{debug, info_span};
use utility::paint::ColorChoice;

pub mod cli;
pub mod logging;

/// The result of analyzing a declaration model.
pub struct Analysis {
    /// The resolved graphs or [`None`] if the declaration model is invalid.
    pub graph: Option<BindingGraph>,
    /// Ordered by anchor, then by subject.
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    /// The resolved graph of every component.
    pub fn graphs(&self) -> Option<&IndexMap<ComponentIndex, ResolvedGraph>> {
        self.graph.as_ref().map(|graph| &graph.components)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|diagnostic| diagnostic.is_error())
    }
}

/// Analyze the model collecting all diagnostics.
pub fn analyze(model: &DeclarationModel, options: Options) -> Analysis {
    let (session, buffer) = Session::buffered(model, options);
    let graph = run(&session).ok();

    Analysis {
        graph,
        diagnostics: drain(&buffer),
    }
}

/// Analyze the model reporting diagnostics through the reporter of the session.
///
/// Fails if the declaration model is invalid. Otherwise, the graph is returned
/// even if errors were reported.
pub fn run(session: &Session<'_>) -> Result<BindingGraph> {
    let model = session.model();
    let components = model.components().len();
    let _span = info_span!("analysis", components).entered();

    model.validate(session.reporter())?;

    let graph = resolver::resolve(session);
    debug!(nodes = graph.nodes.len(), bindings = graph.bindings.len(), "resolved");

    let full_graph = session
        .options()
        .full_graph_validation
        .severity()
        .map(|_| resolver::resolve_full(session));
    if let Some(full_graph) = &full_graph {
        debug!(nodes = full_graph.nodes.len(), "resolved full graphs");
    }

    let health = validator::validate(session, &graph, full_graph.as_ref());

    debug!(tainted = health.is_tainted(), "validated");

    Ok(graph)
}

/// Analyze the model as configured by the processor arguments printing diagnostics to stderr.
///
/// The first argument is the name of the program.
pub fn main<I, T>(model: &DeclarationModel, arguments: I) -> Result
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    logging::initialize();

    let arguments = match cli::parse_options(arguments) {
        Ok(arguments) => arguments,
        Err(error) => {
            let message = error.to_string();
            let message = message.trim_end();
            let message = message.strip_prefix("error: ").unwrap_or(message);

            return Diagnostic::error()
                .message(message.to_owned())
                .report(&Reporter::stderr(ColorChoice::Auto))
                .into();
        }
    };

    let analysis = analyze(model, arguments.options);
    let reporter = Reporter::stderr(arguments.color);
    let mut health = Health::Untainted;

    for diagnostic in analysis.diagnostics {
        health.absorb(diagnostic.report(&reporter));
    }

    health.into()
}
