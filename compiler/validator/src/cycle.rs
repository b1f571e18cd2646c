//! Dependency cycles.

use super::Validator;
use diagnostics::{ErrorCode, Listing};
use resolver::NodeIndex;
use tracing::debug;
use utility::{HashMap, HashSet, cycle::find_cycles};

impl Validator<'_> {
    /// Report every distinct cycle of eager edges once.
    pub(crate) fn report_dependency_cycles(&mut self) {
        let graph = self.graph;
        let positions: HashMap<_, _> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(position, &node)| (node, position))
            .collect();

        let cycles = find_cycles(self.nodes.iter().copied(), |node| {
            graph
                .successors(node)
                .filter(move |(edge, _)| graph.is_eager(node, edge))
                .map(|(_, successor)| successor)
        });

        let mut seen = HashSet::default();

        for mut cycle in cycles {
            let mut members = cycle.clone();
            members.sort_unstable();
            // A full graph only checks the cycles whose least node it hosts.
            let checked = members.first().is_some_and(|&node| self.is_checked(node));
            if !checked || !seen.insert(members) {
                continue;
            }

            // Start with the node closest to the entry points.
            let start = cycle
                .iter()
                .enumerate()
                .min_by_key(|(_, node)| positions.get(node).map_or(usize::MAX, |&at| at))
                .map_or(0, |(index, _)| index);
            cycle.rotate_left(start);

            self.report_dependency_cycle(&cycle);
        }
    }

    fn report_dependency_cycle(&mut self, cycle: &[NodeIndex]) {
        let Some(&start) = cycle.first() else {
            return;
        };
        let graph = self.graph;
        let key = graph.key(start);
        debug!(%key, length = cycle.len(), "dependency cycle");

        let mut steps: Vec<_> = cycle
            .iter()
            .zip(cycle.iter().cycle().skip(1))
            .filter_map(|(&source, &target)| {
                let (edge, _) = graph.successors(source).find(|&(edge, successor)| {
                    successor == target && graph.is_eager(source, edge)
                })?;
                self.traces.render_step(source, edge)
            })
            .collect();
        steps.push("...".to_owned());

        let diagnostic = self
            .diagnostic(ErrorCode::E005, graph.nodes[start].owner)
            .message("Found a dependency cycle:")
            .subject(key.to_string())
            .listing(Listing::new(steps))
            .with(|diagnostic| match self.trace_listing(start) {
                Some(trace) => diagnostic.listing(trace.heading("The cycle is requested via:")),
                None => diagnostic,
            });

        self.report(diagnostic);
    }
}
