//! Validation of resolved binding graphs.
//!
//! Every validator runs over all graphs and reports its diagnostics through the
//! reporter of the session. Validation never stops at the first error.
//!
//! The graph of a component tree consists of the nodes reachable from the entry
//! points of its components. With full-graph validation enabled, every component
//! and every module is first checked on its own including the bindings nothing
//! requests. Missing bindings are not reported for those graphs. The reachable
//! graph of a tree is only validated if its full graphs are free of errors.

use declaration::{
    ComponentIndex, ComponentNode, DeclarationModel, Installation, ModuleIndex, Type,
};
use diagnostics::{Diagnostic, ErrorCode, Listing, Reporter, Severity, error::Health};
use resolver::{BindingGraph, NodeIndex, Resolution};
use session::{Options, Session};
use tracing::{debug, debug_span};
use trace::TraceBuilder;
use utility::{HashMap, Str};

mod conflict;
mod cycle;
mod member;
mod missing;
mod multibinding;
mod scope;

/// Validate the graphs of every component tree.
///
/// With full-graph validation enabled, `full_graph` has to be resolved with
/// [`resolver::resolve_full`]. Every module and every component is then checked on
/// its own first. A component tree whose full graphs contain errors is not validated
/// any further.
pub fn validate(
    session: &Session<'_>,
    graph: &BindingGraph,
    full_graph: Option<&BindingGraph>,
) -> Health {
    let model = session.model();
    let severity = session.options().full_graph_validation.severity();
    let full_graph = full_graph.zip(severity);
    let mut health = Health::Untainted;

    if let Some((_, severity)) = full_graph {
        for module in model.modules().indices() {
            health.absorb(validate_module(session, module, severity));
        }
    }

    for root in model.roots() {
        let name = &model.component(root).name;
        let _span = debug_span!("tree", root = %name).entered();

        let components: Vec<_> = model
            .top_down()
            .filter(|&component| model.root(component) == root)
            .collect();

        if let Some((full_graph, severity)) = full_graph {
            let full_health = validate_full_graphs(session, full_graph, &components, severity);
            health.absorb(full_health);

            if full_health.is_tainted() {
                debug!("skipping the reachable graph of an invalid full graph");
                continue;
            }
        }

        let validator = Validator::new(
            model,
            session.options(),
            session.reporter(),
            graph,
            Mode::Reachable,
            components,
        );
        health.absorb(validator.run());
    }

    health
}

/// Validate each of the given components on its own.
fn validate_full_graphs(
    session: &Session<'_>,
    graph: &BindingGraph,
    components: &[ComponentIndex],
    severity: Severity,
) -> Health {
    let model = session.model();
    let mut health = Health::Untainted;

    for &component in components {
        let name = &model.component(component).name;
        let _span = debug_span!("full graph", component = %name).entered();

        let validator = Validator::new(
            model,
            session.options(),
            session.reporter(),
            graph,
            Mode::FullGraph { severity },
            vec![component],
        );
        health.absorb(validator.run());
    }

    health
}

/// Validate a module by resolving its bindings in a component of its own.
fn validate_module(session: &Session<'_>, module: ModuleIndex, severity: Severity) -> Health {
    let original = session.model().module(module);
    let _span = debug_span!("module graph", module = %original.name).entered();

    let arguments = original.parameters.iter().cloned().map(Type::Parameter);
    let mut model = session.model().clone();
    let component = model.add_component(
        ComponentNode::new(original.name.clone())
            .install(Installation::new(module, arguments))
            .source(original.source.clone()),
    );

    let resolution_session = Session::new(&model, session.options().clone(), Reporter::silent());
    let graph = resolver::resolve_declared(&resolution_session, component);

    let validator = Validator::new(
        &model,
        session.options(),
        session.reporter(),
        &graph,
        Mode::Module {
            name: original.name.clone(),
            source: original.source.clone(),
            severity,
        },
        vec![component],
    );
    validator.run()
}

enum Mode {
    /// The nodes reachable from the entry points of a component tree.
    Reachable,
    /// Everything a single component declares or requests.
    FullGraph { severity: Severity },
    /// Everything a module declares.
    Module {
        name: Str,
        source: Str,
        severity: Severity,
    },
}

struct Validator<'a> {
    model: &'a DeclarationModel,
    options: &'a Options,
    reporter: &'a Reporter,
    graph: &'a BindingGraph,
    mode: Mode,
    components: Vec<ComponentIndex>,
    /// The nodes under validation in breadth-first order.
    nodes: Vec<NodeIndex>,
    resolutions: HashMap<NodeIndex, &'a Resolution>,
    traces: TraceBuilder<'a>,
    health: Health,
}

impl<'a> Validator<'a> {
    fn new(
        model: &'a DeclarationModel,
        options: &'a Options,
        reporter: &'a Reporter,
        graph: &'a BindingGraph,
        mode: Mode,
        components: Vec<ComponentIndex>,
    ) -> Self {
        let nodes = graph.reachable(
            components
                .iter()
                .flat_map(|&component| graph.roots(component)),
        );

        let mut resolutions = HashMap::default();
        let resolved = graph
            .components
            .values()
            .flat_map(|component| component.resolutions.values());
        for resolved in resolved {
            resolutions.entry(resolved.node).or_insert(&resolved.resolution);
        }

        let traces = match &mode {
            Mode::Module { .. } => TraceBuilder::new(graph, model, []),
            _ => TraceBuilder::new(graph, model, components.iter().copied()),
        };

        Self {
            model,
            options,
            reporter,
            graph,
            mode,
            components,
            nodes,
            resolutions,
            traces,
            health: Health::Untainted,
        }
    }

    fn run(mut self) -> Health {
        debug!(nodes = self.nodes.len(), "validating");

        if let Mode::Reachable = self.mode {
            self.report_missing_bindings();
            self.report_scope_violations();
            self.report_nullable_bindings();
            self.report_private_members();
        }

        self.report_conflicts();
        self.report_map_key_conflicts();
        self.report_duplicate_set_contributions();
        self.report_incompatibly_scoped_bindings();
        self.report_dependency_cycles();

        self.health
    }

    fn is_full_graph(&self) -> bool {
        !matches!(self.mode, Mode::Reachable)
    }

    /// Whether the node is checked by the graph under validation.
    ///
    /// The full graph of a component only checks the nodes it hosts itself since the
    /// nodes hosted by its ancestors are checked by their own full graphs.
    fn is_checked(&self, node: NodeIndex) -> bool {
        match self.mode {
            Mode::FullGraph { .. } => self.components.contains(&self.graph.nodes[node].owner),
            Mode::Reachable | Mode::Module { .. } => true,
        }
    }

    fn severity(&self) -> Severity {
        match self.mode {
            Mode::Reachable => Severity::Error,
            Mode::FullGraph { severity } | Mode::Module { severity, .. } => severity,
        }
    }

    /// Start a diagnostic anchored at the given component.
    ///
    /// Diagnostics of full graphs are anchored at the component or module under validation instead.
    fn diagnostic(&self, code: ErrorCode, component: ComponentIndex) -> Diagnostic {
        self.diagnostic_with_severity(code, component, self.severity())
    }

    fn diagnostic_with_severity(
        &self,
        code: ErrorCode,
        component: ComponentIndex,
        severity: Severity,
    ) -> Diagnostic {
        let diagnostic = Diagnostic::with_severity(severity).code(code);

        match &self.mode {
            Mode::Reachable => {
                let component = self.model.component(component);
                diagnostic.anchor(component.name.clone(), component.source.clone())
            }
            Mode::FullGraph { .. } => {
                let component = self.components.first().map_or(component, |&own| own);
                let component = self.model.component(component);
                diagnostic.anchor(component.name.clone(), component.source.clone())
            }
            Mode::Module { name, source, .. } => diagnostic.anchor(name.clone(), source.clone()),
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.health.absorb(diagnostic.report(self.reporter));
    }

    fn display_cap(&self) -> usize {
        self.options.duplicate_binding_display_cap
    }

    /// The trace to the node as a listing if the node is reachable from an entry point.
    fn trace_listing(&self, node: NodeIndex) -> Option<Listing> {
        let trace = self.traces.trace(node)?;
        Some(Listing::new(self.traces.render(&trace)))
    }

    fn resolution(&self, node: NodeIndex) -> Option<&'a Resolution> {
        self.resolutions.get(&node).copied()
    }

    fn component_name(&self, component: ComponentIndex) -> &'a str {
        &self.model.component(component).name
    }
}
