//! Nullability and private members.

use super::Validator;
use declaration::RequestKind;
use diagnostics::{ErrorCode, Listing};
use resolver::Edge;
use tracing::debug;

impl Validator<'_> {
    /// Report non-nullable instance requests satisfied by nullable bindings.
    pub(crate) fn report_nullable_bindings(&mut self) {
        let graph = self.graph;
        let model = self.model;
        let mut offenses = Vec::new();

        for &component in &self.components {
            let node = model.component(component);
            let entry_points = graph.components[component].entry_points.iter();

            for (entry_point, edge) in node.entry_points.iter().zip(entry_points) {
                let site = format!("[{0}] {0}.{1}()", node.name, entry_point.member);
                offenses.push((edge, site));
            }
        }

        for &source in &self.nodes {
            for (edge, _) in graph.successors(source) {
                if let Some(site) = self.traces.render_request_site(source, edge) {
                    offenses.push((edge, site));
                }
            }
        }

        for (edge, site) in offenses {
            self.report_nullable_binding(edge, site);
        }
    }

    fn report_nullable_binding(&mut self, edge: &Edge, site: String) {
        let Some(request) = &edge.request else {
            return;
        };
        if request.nullable || !matches!(request.kind, RequestKind::Instance) {
            return;
        }
        let graph = self.graph;
        let Some(binding) = graph.target(edge).and_then(|node| graph.binding(node)) else {
            return;
        };
        if !binding.nullable {
            return;
        }
        debug!(key = %request.key, "nullable binding for a non-nullable request");

        let severity = self.options.nullable_policy.severity();
        let diagnostic = self
            .diagnostic_with_severity(ErrorCode::E010, edge.context, severity)
            .message(format!("{} is not nullable, but is being provided by {binding}", request.key))
            .subject(request.key.to_string())
            .listing(Listing::new([site]).heading("It is requested at:"));

        self.report(diagnostic);
    }

    /// Report injectable constructors that are private.
    pub(crate) fn report_private_members(&mut self) {
        let graph = self.graph;
        let severity = self.options.private_member_policy.severity();

        for index in 0..self.nodes.len() {
            let node = self.nodes[index];
            let Some(binding) = graph.binding(node) else {
                continue;
            };
            if !binding.private {
                continue;
            }
            debug!(key = %binding.key, "private member");

            let diagnostic = self
                .diagnostic_with_severity(ErrorCode::E011, graph.nodes[node].owner, severity)
                .message(format!(
                    "{} cannot be injected through a private constructor",
                    binding.key
                ))
                .subject(binding.key.to_string())
                .with(|diagnostic| match self.trace_listing(node) {
                    Some(trace) => diagnostic.listing(trace),
                    None => diagnostic,
                });

            self.report(diagnostic);
        }
    }
}
