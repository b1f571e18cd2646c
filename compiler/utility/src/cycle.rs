//! Cycle detection in directed graphs.

use crate::HashMap;
use std::hash::Hash;

/// A cycle given as the sequence of nodes in traversal order.
///
/// The edge from the last node back to the first one closes the cycle.
pub type Cycle<N> = Vec<N>;

/// Find the cycles of the graph spanned by the given roots and successor function.
///
/// The traversal is depth-first and visits roots and successors in the given order,
/// so the result is deterministic. Every back edge yields one cycle.
pub fn find_cycles<N, S>(
    roots: impl IntoIterator<Item = N>,
    successors: impl Fn(N) -> S,
) -> Vec<Cycle<N>>
where
    N: Copy + Eq + Hash,
    S: IntoIterator<Item = N>,
{
    let mut cycles = Vec::new();
    let mut visited = HashMap::default();

    for root in roots {
        if visited.contains_key(&root) {
            continue;
        }

        let mut worklist = vec![root];
        let mut frames = vec![successors(root).into_iter()];
        visited.insert(root, Status::Ongoing);

        while let Some(frame) = frames.last_mut() {
            match frame.next() {
                Some(node) => match visited.get(&node) {
                    Some(Status::Ongoing) => {
                        let start = worklist
                            .iter()
                            .position(|&some_node| some_node == node)
                            .unwrap_or_default();
                        cycles.push(worklist[start..].to_vec());
                    }
                    Some(Status::Finished) => {}
                    None => {
                        visited.insert(node, Status::Ongoing);
                        worklist.push(node);
                        frames.push(successors(node).into_iter());
                    }
                },
                None => {
                    frames.pop();
                    if let Some(node) = worklist.pop() {
                        visited.insert(node, Status::Finished);
                    }
                }
            }
        }
    }

    cycles
}

enum Status {
    Ongoing,
    Finished,
}

#[cfg(test)]
mod test {
    use super::find_cycles;

    fn cycles(edges: &[(u8, u8)], roots: &[u8]) -> Vec<Vec<u8>> {
        find_cycles(roots.iter().copied(), |node| {
            edges
                .iter()
                .filter(move |&&(source, _)| source == node)
                .map(|&(_, target)| target)
        })
    }

    #[test]
    fn empty_graph() {
        assert_eq!(cycles(&[], &[]), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn no_cycle() {
        assert_eq!(cycles(&[(1, 4), (4, 9), (3, 8), (1, 9)], &[1, 3]), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn self_loop() {
        assert_eq!(cycles(&[(0, 0)], &[0]), vec![vec![0]]);
    }

    #[test]
    fn cycle_reached_through_prefix() {
        assert_eq!(cycles(&[(0, 1), (1, 2), (2, 3), (3, 1)], &[0]), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn two_cycles_in_traversal_order() {
        assert_eq!(
            cycles(&[(0, 1), (1, 0), (0, 2), (2, 2)], &[0]),
            vec![vec![0, 1], vec![2]]
        );
    }
}
