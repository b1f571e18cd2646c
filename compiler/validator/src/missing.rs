//! Missing bindings.

use super::Validator;
use catalog::Catalog;
use declaration::{ComponentIndex, Key};
use diagnostics::{ErrorCode, Listing};
use resolver::{NodeIndex, NodeKind};
use tracing::debug;
use utility::write_indented_list;

impl Validator<'_> {
    pub(crate) fn report_missing_bindings(&mut self) {
        let graph = self.graph;
        let missing: Vec<_> = self
            .nodes
            .iter()
            .filter_map(|&node| match &graph.nodes[node].kind {
                NodeKind::Missing(key) => Some((node, key)),
                _ => None,
            })
            .collect();

        for (node, key) in missing {
            debug!(%key, "missing binding");
            self.report_missing_binding(node, key);
        }
    }

    fn report_missing_binding(&mut self, node: NodeIndex, key: &Key) {
        let message = if Catalog::could_be_implicit(key) {
            format!(
                "{key} cannot be provided without an injectable constructor \
                 or a provision declaration"
            )
        } else {
            format!("{key} cannot be provided without a provision declaration")
        };

        let mut diagnostic = self
            .diagnostic(ErrorCode::E001, self.graph.nodes[node].owner)
            .message(message)
            .subject(key.to_string());

        if let Some(trace) = self.traces.trace(node) {
            let cap = self.display_cap();
            let other_sites = self.traces.other_request_sites(node, &trace);
            let other_entry_points = self.traces.other_entry_points(node, &trace);

            diagnostic = diagnostic.listing(Listing::new(self.traces.render(&trace)));

            if !other_sites.is_empty() {
                diagnostic = diagnostic.listing(
                    Listing::new(other_sites)
                        .heading("It is also requested at:")
                        .limit(cap),
                );
            }
            if !other_entry_points.is_empty() {
                diagnostic = diagnostic.listing(
                    Listing::new(other_entry_points)
                        .heading("The following other entry points also depend on it:")
                        .limit(cap),
                );
            }
        }

        let root = self.model.root(self.graph.nodes[node].owner);

        if let Some(note) = self.bindings_elsewhere(root, |other| other == key) {
            diagnostic = diagnostic.note(format!(
                "{key} is provided in the following other components:{note}"
            ));
        }
        if let Some(note) =
            self.bindings_elsewhere(root, |other| other != key && other.is_similar_to(key))
        {
            diagnostic = diagnostic.note(format!(
                "a similar binding is provided in the following other components:{note}"
            ));
        }

        self.report(diagnostic);
    }

    /// The explicit bindings of the tree matching the predicate, rendered as
    /// `[Component] binding` lines.
    fn bindings_elsewhere(
        &self,
        root: ComponentIndex,
        predicate: impl Fn(&Key) -> bool,
    ) -> Option<String> {
        let lines: Vec<_> = self
            .graph
            .bindings
            .values()
            .filter(|binding| predicate(&binding.key))
            .filter_map(|binding| {
                let component = binding.component?;
                (self.model.root(component) == root)
                    .then(|| format!("[{}] {binding}", self.component_name(component)))
            })
            .collect();

        if lines.is_empty() {
            return None;
        }

        let mut note = String::new();
        write_indented_list(&mut note, lines, 1, Some(self.display_cap()));
        Some(note)
    }
}
