//! Scope violations and incompatibly scoped bindings.

use super::{Mode, Validator};
use catalog::{Binding, BindingKind};
use diagnostics::{ErrorCode, Listing};
use resolver::ScopeViolation;
use tracing::debug;
use utility::HashSet;

impl Validator<'_> {
    /// Report scoped bindings that had to be hosted below the component with their scope.
    pub(crate) fn report_scope_violations(&mut self) {
        let graph = self.graph;
        let nodes: HashSet<_> = self.nodes.iter().copied().collect();

        for violation in &graph.scope_violations {
            if nodes.contains(&violation.node) && self.components.contains(&violation.requester) {
                self.report_scope_violation(violation);
            }
        }
    }

    fn report_scope_violation(&mut self, violation: &ScopeViolation) {
        let key = self.graph.key(violation.node);
        debug!(%key, scope = %violation.scope, "scope violation");

        let diagnostic = self
            .diagnostic(ErrorCode::E004, violation.requester)
            .message(format!(
                "{key} is scoped with {} but cannot be hosted by {} \
                 since its dependency {} is not available there",
                violation.scope,
                self.component_name(violation.scope_owner),
                violation.dependency.requested_type(),
            ))
            .subject(key.to_string())
            .line(format!(
                "It is hosted by {} instead.",
                self.component_name(violation.requester)
            ))
            .with(|diagnostic| match self.trace_listing(violation.node) {
                Some(trace) => diagnostic.listing(trace),
                None => diagnostic,
            });

        self.report(diagnostic);
    }

    /// Report components hosting bindings whose scope they do not declare.
    pub(crate) fn report_incompatibly_scoped_bindings(&mut self) {
        if let Mode::Module { name, .. } = &self.mode {
            let name = name.clone();
            self.report_module_scopes(&name);
            return;
        }

        let graph = self.graph;
        // Those are reported as scope violations already.
        let violations: HashSet<_> = graph
            .scope_violations
            .iter()
            .map(|violation| violation.node)
            .collect();

        for index in 0..self.components.len() {
            let component = self.components[index];
            let node = self.model.component(component);

            let offending: Vec<_> = self
                .nodes
                .iter()
                .filter(|&&index| {
                    graph.nodes[index].owner == component && !violations.contains(&index)
                })
                .filter_map(|&index| graph.binding(index))
                .filter(|binding| {
                    binding
                        .scope
                        .as_ref()
                        .is_some_and(|scope| !node.is_scoped_with(scope))
                })
                .map(render_scoped_binding)
                .collect();

            if offending.is_empty() {
                continue;
            }

            debug!(
                component = %node.name,
                bindings = offending.len(),
                "incompatibly scoped bindings"
            );

            let message = if node.scopes.is_empty() {
                format!("{} (unscoped) may not reference scoped bindings:", node.name)
            } else {
                format!(
                    "{} scoped with {} may not reference bindings with different scopes:",
                    node.name,
                    node.scope_list()
                )
            };

            let diagnostic = self
                .diagnostic(ErrorCode::E006, component)
                .message(message)
                .subject(node.ty.to_string())
                .listing(Listing::new(offending));

            self.report(diagnostic);
        }
    }

    /// A module may only contain bindings of a single scope.
    fn report_module_scopes(&mut self, name: &str) {
        let graph = self.graph;

        let scoped: Vec<&Binding> = self
            .nodes
            .iter()
            .filter_map(|&node| graph.binding(node))
            .filter(|binding| binding.scope.is_some() && !binding.is_implicit())
            .collect();

        let scopes: HashSet<_> = scoped
            .iter()
            .filter_map(|binding| binding.scope.as_ref())
            .collect();
        if scopes.len() <= 1 {
            return;
        }

        let Some(&component) = self.components.first() else {
            return;
        };

        let diagnostic = self
            .diagnostic(ErrorCode::E006, component)
            .message(format!("{name} contains bindings with different scopes:"))
            .subject(name.to_owned())
            .listing(Listing::new(scoped.into_iter().map(render_scoped_binding)));

        self.report(diagnostic);
    }
}

fn render_scoped_binding(binding: &Binding) -> String {
    let scope = binding
        .scope
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();

    match binding.kind {
        BindingKind::Injection => format!("{scope} class {}", binding.key.ty),
        _ => format!("{scope} {binding}"),
    }
}
