//! Map keys and set contributions.

use super::Validator;
use catalog::{BindingIndex, BindingKind, Producer};
use declaration::{Key, MultibindingKind};
use diagnostics::{ErrorCode, Listing};
use resolver::{NodeIndex, NodeKind, Resolution};
use tracing::debug;

impl<'a> Validator<'a> {
    /// The reachable aggregates of the given kind with their contributions.
    fn multibindings(
        &self,
        wanted: MultibindingKind,
    ) -> Vec<(NodeIndex, &'a Key, &'a [BindingIndex])> {
        let graph = self.graph;

        self.nodes
            .iter()
            .filter(|&&node| self.is_checked(node))
            .filter_map(|&node| {
                let NodeKind::Aggregate(key) = &graph.nodes[node].kind else {
                    return None;
                };
                match self.resolution(node)? {
                    Resolution::Multibound { kind, contributions, .. } if *kind == wanted => {
                        Some((node, key, contributions.as_slice()))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    pub(crate) fn report_map_key_conflicts(&mut self) {
        for (node, key, contributions) in self.multibindings(MultibindingKind::Map) {
            let graph = self.graph;
            let map_key = |binding: BindingIndex| {
                let contribution = graph.bindings[binding].key.contribution.as_ref();
                contribution.and_then(|contribution| contribution.map_key())
            };

            for group in group_by(contributions, |&binding| map_key(binding)) {
                if group.len() < 2 {
                    continue;
                }
                debug!(%key, "conflicting map keys");

                let diagnostic = self
                    .diagnostic(ErrorCode::E007, graph.nodes[node].owner)
                    .message(format!("The same map key is bound more than once for {key}"))
                    .subject(key.to_string())
                    .listing(
                        Listing::new(self.render_bindings(&group)).limit(self.display_cap()),
                    );
                self.report(diagnostic);
            }

            let annotation =
                |binding: BindingIndex| map_key(binding).map(|map_key| &map_key.annotation);
            let annotations = group_by(contributions, |&binding| annotation(binding));
            if annotations.len() < 2 {
                continue;
            }
            debug!(%key, "inconsistent map key annotations");

            let mut diagnostic = self
                .diagnostic(ErrorCode::E008, graph.nodes[node].owner)
                .message(format!("{key} uses more than one map key annotation type"))
                .subject(key.to_string());

            for group in annotations {
                let Some(annotation) = group.first().and_then(|&binding| annotation(binding)) else {
                    continue;
                };
                diagnostic = diagnostic.listing(
                    Listing::new(self.render_bindings(&group))
                        .heading(format!("{annotation}:"))
                        .level(2)
                        .limit(self.display_cap()),
                );
            }

            self.report(diagnostic);
        }
    }

    /// Report set contributions delegating to the same key.
    pub(crate) fn report_duplicate_set_contributions(&mut self) {
        for (node, key, contributions) in self.multibindings(MultibindingKind::Set) {
            let graph = self.graph;
            let delegates: Vec<_> = contributions
                .iter()
                .copied()
                .filter(|&binding| {
                    graph.bindings[binding].kind == BindingKind::SetElement(Producer::Delegate)
                })
                .collect();

            let target = |binding: BindingIndex| {
                let dependencies = &graph.bindings[binding].dependencies;
                dependencies.first().map(|request| &request.key)
            };

            for group in group_by(&delegates, |&binding| target(binding)) {
                if group.len() < 2 {
                    continue;
                }
                let Some(target) = target(group[0]) else {
                    continue;
                };
                debug!(%key, %target, "duplicate set contributions");

                let diagnostic = self
                    .diagnostic(ErrorCode::E009, graph.nodes[node].owner)
                    .message(format!(
                        "Multiple set contributions into {key} \
                         for the same contribution key: {target}"
                    ))
                    .subject(key.to_string())
                    .listing(
                        Listing::new(self.render_bindings(&group)).limit(self.display_cap()),
                    );
                self.report(diagnostic);
            }
        }
    }
}

/// Group the bindings by the given property keeping the order of first occurrence.
fn group_by<K: PartialEq>(
    bindings: &[BindingIndex],
    property: impl Fn(&BindingIndex) -> K,
) -> Vec<Vec<BindingIndex>> {
    let mut groups: Vec<(K, Vec<BindingIndex>)> = Vec::new();

    for binding in bindings {
        let value = property(binding);
        match groups.iter_mut().find(|(other, _)| *other == value) {
            Some((_, group)) => group.push(*binding),
            None => groups.push((value, vec![*binding])),
        }
    }

    groups.into_iter().map(|(_, group)| group).collect()
}
