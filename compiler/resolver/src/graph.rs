//! The resolved binding graph.

use catalog::{Binding, BindingIndex};
use declaration::{ComponentIndex, Key, MultibindingKind, Request, Scope, Type};
use index_map::IndexMap;
use std::{collections::BTreeMap, fmt};
use utility::HashSet;

/// The resolved bindings of all components of a declaration model.
pub struct BindingGraph {
    pub bindings: IndexMap<BindingIndex, Binding>,
    pub nodes: IndexMap<NodeIndex, Node>,
    pub components: IndexMap<ComponentIndex, ResolvedGraph>,
    pub scope_violations: Vec<ScopeViolation>,
}

impl BindingGraph {
    pub fn resolved(&self, component: ComponentIndex, key: &Key) -> Option<&Resolved> {
        self.components[component].resolutions.get(key)
    }

    /// The node the given edge leads to.
    pub fn target(&self, edge: &Edge) -> Option<NodeIndex> {
        self.resolved(edge.context, &edge.key).map(|resolved| resolved.node)
    }

    /// The outgoing edges of a node together with their targets.
    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = (&Edge, NodeIndex)> + '_ {
        self.nodes[node]
            .edges
            .iter()
            .filter_map(|edge| Some((edge, self.target(edge)?)))
    }

    /// Whether the value behind the edge is needed to construct the source node.
    pub fn is_eager(&self, from: NodeIndex, edge: &Edge) -> bool {
        match &edge.request {
            Some(request) => !request.kind.is_indirection(),
            None => match &self.nodes[from].kind {
                NodeKind::Aggregate(key) => !is_framework_map(key),
                _ => true,
            },
        }
    }

    pub fn binding(&self, node: NodeIndex) -> Option<&Binding> {
        match self.nodes[node].kind {
            NodeKind::Binding(binding) => Some(&self.bindings[binding]),
            _ => None,
        }
    }

    pub fn key(&self, node: NodeIndex) -> &Key {
        match &self.nodes[node].kind {
            &NodeKind::Binding(binding) => &self.bindings[binding].key,
            NodeKind::Aggregate(key) | NodeKind::Missing(key) | NodeKind::Conflict(key) => key,
        }
    }

    /// The entry points of the component followed by its declared keys.
    pub fn roots(&self, component: ComponentIndex) -> impl Iterator<Item = &Edge> + '_ {
        let graph = &self.components[component];
        graph.entry_points.iter().chain(&graph.declared)
    }

    /// The nodes reachable from the given edges in breadth-first order.
    pub fn reachable<'a>(&self, roots: impl IntoIterator<Item = &'a Edge>) -> Vec<NodeIndex> {
        let mut visited = HashSet::default();
        let mut order: Vec<_> = roots
            .into_iter()
            .filter_map(|edge| self.target(edge))
            .filter(|&node| visited.insert(node))
            .collect();

        let mut index = 0;
        while let Some(&node) = order.get(index) {
            for (_, successor) in self.successors(node) {
                if visited.insert(successor) {
                    order.push(successor);
                }
            }
            index += 1;
        }

        order
    }
}

/// A map with framework values like `Map<K, Provider<V>>` does not need its values eagerly.
fn is_framework_map(key: &Key) -> bool {
    fn simple_name(ty: &Type) -> Option<&str> {
        ty.path()?.rsplit('.').next()
    }

    simple_name(&key.ty) == Some("Map")
        && key
            .ty
            .arguments()
            .get(1)
            .and_then(simple_name)
            .is_some_and(|name| matches!(name, "Provider" | "Lazy"))
}

/// The resolutions made in the context of a single component.
#[derive(Debug)]
pub struct ResolvedGraph {
    pub component: ComponentIndex,
    /// Ordered by key for a deterministic iteration order.
    pub resolutions: BTreeMap<Key, Resolved>,
    pub entry_points: Vec<Edge>,
    /// The keys declared by the component if it is resolved as a full graph.
    pub declared: Vec<Edge>,
    /// The nodes owned by the component in creation order.
    pub hosted: Vec<NodeIndex>,
}

impl ResolvedGraph {
    pub(crate) fn new(component: ComponentIndex) -> Self {
        Self {
            component,
            resolutions: BTreeMap::new(),
            entry_points: Vec::new(),
            declared: Vec::new(),
            hosted: Vec::new(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Resolved {
    pub node: NodeIndex,
    pub resolution: Resolution,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Resolution {
    Bound {
        binding: BindingIndex,
    },
    Multibound {
        kind: MultibindingKind,
        contributions: Vec<BindingIndex>,
        declarations: Vec<BindingIndex>,
    },
    Missing,
    Duplicate {
        candidates: Vec<BindingIndex>,
    },
    /// Multibinding contributions or declarations next to unique bindings.
    Incompatible {
        kind: MultibindingKind,
        contributions: Vec<BindingIndex>,
        declarations: Vec<BindingIndex>,
        unique: Vec<BindingIndex>,
    },
}

impl Resolution {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// A binding or an aggregate hosted by a component.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub owner: ComponentIndex,
    pub edges: Vec<Edge>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind {
    Binding(BindingIndex),
    /// The multibinding assembled from its contributions.
    Aggregate(Key),
    /// A key without bindings. There is one per key and component tree.
    Missing(Key),
    /// A key with duplicate or incompatible bindings.
    Conflict(Key),
}

/// A dependency.
///
/// The target is looked up by key in the resolutions of the context component.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Edge {
    pub key: Key,
    /// The request made or [`None`] for edges from an aggregate to its contributions
    /// and for the declared keys of full graphs.
    pub request: Option<Request>,
    pub context: ComponentIndex,
}

/// A scoped implicit binding that could not be hosted by the component with its scope.
#[derive(Clone, Debug)]
pub struct ScopeViolation {
    pub node: NodeIndex,
    pub scope: Scope,
    pub scope_owner: ComponentIndex,
    pub requester: ComponentIndex,
    /// The dependency that is unavailable at the scope owner.
    pub dependency: Request,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, index_map::Index)]
pub struct NodeIndex(pub u32);

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}n", self.0)
    }
}
