//! Duplicate bindings and incompatible multibinding declarations.

use super::Validator;
use catalog::BindingIndex;
use declaration::{Key, MultibindingKind};
use diagnostics::{ErrorCode, Listing};
use resolver::{NodeIndex, NodeKind, Resolution};
use tracing::debug;

impl Validator<'_> {
    pub(crate) fn report_conflicts(&mut self) {
        let graph = self.graph;

        for index in 0..self.nodes.len() {
            let node = self.nodes[index];
            let NodeKind::Conflict(key) = &graph.nodes[node].kind else {
                continue;
            };
            if !self.is_checked(node) {
                continue;
            }

            match self.resolution(node) {
                Some(Resolution::Duplicate { candidates }) => {
                    debug!(%key, candidates = candidates.len(), "duplicate binding");
                    self.report_duplicate_binding(node, key, candidates);
                }
                Some(Resolution::Incompatible {
                    kind,
                    contributions,
                    declarations,
                    unique,
                }) => {
                    debug!(%key, "incompatible bindings");
                    self.report_incompatible_bindings(
                        node,
                        key,
                        *kind,
                        contributions,
                        declarations,
                        unique,
                    );
                }
                _ => {}
            }
        }
    }

    fn report_duplicate_binding(
        &mut self,
        node: NodeIndex,
        key: &Key,
        candidates: &[BindingIndex],
    ) {
        let bindings = self.render_bindings(candidates);

        let diagnostic = self
            .diagnostic(ErrorCode::E002, self.graph.nodes[node].owner)
            .message(format!("{key} is bound multiple times:"))
            .subject(key.to_string())
            .listing(Listing::new(bindings).limit(self.display_cap()))
            .with(|diagnostic| {
                match self.trace_listing(node).filter(|_| !self.is_full_graph()) {
                    Some(trace) => diagnostic.listing(trace.heading("It is requested via:")),
                    None => diagnostic,
                }
            });

        self.report(diagnostic);
    }

    fn report_incompatible_bindings(
        &mut self,
        node: NodeIndex,
        key: &Key,
        kind: MultibindingKind,
        contributions: &[BindingIndex],
        declarations: &[BindingIndex],
        unique: &[BindingIndex],
    ) {
        let multibindings = self.render_bindings(contributions.iter().chain(declarations));
        let unique = self.render_bindings(unique);

        let diagnostic = self
            .diagnostic(ErrorCode::E003, self.graph.nodes[node].owner)
            .message(format!("{key} has incompatible bindings or declarations:"))
            .subject(key.to_string())
            .listing(
                Listing::new(multibindings)
                    .heading(format!("{} bindings and declarations:", kind.name()))
                    .level(2),
            )
            .listing(
                Listing::new(unique)
                    .heading("Unique bindings and declarations:")
                    .level(2),
            );

        self.report(diagnostic);
    }

    /// Render bindings as `<kind> <signature>`.
    pub(crate) fn render_bindings<'b>(
        &self,
        bindings: impl IntoIterator<Item = &'b BindingIndex>,
    ) -> Vec<String> {
        bindings
            .into_iter()
            .map(|&binding| self.graph.bindings[binding].to_string())
            .collect()
    }
}
