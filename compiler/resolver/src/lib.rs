//! The binding resolver.
//!
//! It resolves the entry points of every component and their transitive
//! dependencies against the bindings visible in the lineage of the component
//! and decides which component hosts (owns) each binding. Components are
//! resolved top-down, each parent before its children.
//!
//! Resolution never fails. Missing, duplicate and incompatible bindings are
//! recorded in the [binding graph](BindingGraph) for the validator to report.
//!
//! # Ownership
//!
//! * An explicit binding is owned by the component declaring it. It *floats*
//!   down toward the requesting component if one of its transitive dependencies
//!   has multibinding contributions or further bindings declared below the
//!   declaring component. It never floats because of a dependency that is
//!   missing at the declaring component.
//! * A scoped binding is owned by the nearest component in the lineage declaring
//!   the scope. Explicit scoped bindings stay at their declaring component.
//! * An aggregate is owned by the deepest component contributing to it.
//! * An unscoped implicit binding is owned by the deepest owner among its
//!   dependencies which shares it across sibling components. A missing
//!   dependency pins it to the requesting component.
//!
//! The dependencies of a node are resolved in the context of its owner.

use catalog::{BindingIndex, Catalog};
use declaration::{ComponentIndex, Key, MultibindingKind, Request};
use index_map::IndexMap;
use session::Session;
use tracing::{debug, debug_span, trace};
use utility::{HashMap, HashSet};

pub use graph::{
    BindingGraph, Edge, Node, NodeIndex, NodeKind, Resolution, Resolved, ResolvedGraph,
    ScopeViolation,
};

mod graph;
mod ownership;
#[cfg(test)]
mod test;

/// Resolve the entry points of all components.
pub fn resolve(session: &Session<'_>) -> BindingGraph {
    let mut resolver = GraphResolver::new(session);
    resolver.resolve_entry_points();
    resolver.finish()
}

/// Resolve the entry points and every key declared by the components themselves.
///
/// Used for full-graph validation where bindings are checked even if nothing requests them.
pub fn resolve_full(session: &Session<'_>) -> BindingGraph {
    let mut resolver = GraphResolver::new(session);
    resolver.resolve_entry_points();
    resolver.resolve_declared_keys();
    resolver.finish()
}

/// Resolve only the keys declared by a single component.
pub fn resolve_declared(session: &Session<'_>, component: ComponentIndex) -> BindingGraph {
    let mut resolver = GraphResolver::new(session);
    resolver.resolve_declared_keys_of(component);
    resolver.finish()
}

struct GraphResolver<'sess, 'ctx> {
    session: &'sess Session<'ctx>,
    catalog: Catalog<'ctx>,
    nodes: IndexMap<NodeIndex, Node>,
    interned: HashMap<(NodeKind, ComponentIndex), NodeIndex>,
    components: IndexMap<ComponentIndex, ResolvedGraph>,
    /// The resolutions currently being computed. Revisiting one means a cycle.
    in_progress: HashSet<(ComponentIndex, Key)>,
    scope_violations: Vec<ScopeViolation>,
}

impl<'sess, 'ctx> GraphResolver<'sess, 'ctx> {
    fn new(session: &'sess Session<'ctx>) -> Self {
        let model = session.model();

        Self {
            session,
            catalog: Catalog::new(model),
            nodes: IndexMap::default(),
            interned: HashMap::default(),
            components: model.top_down().map(ResolvedGraph::new).collect(),
            in_progress: HashSet::default(),
            scope_violations: Vec::new(),
        }
    }

    fn resolve_entry_points(&mut self) {
        let model = self.session.model();

        for component in model.top_down() {
            let node = model.component(component);
            let _span = debug_span!("component", name = %node.name).entered();

            for entry_point in &node.entry_points {
                let request = &entry_point.request;
                self.resolve(component, &request.key);

                self.components[component].entry_points.push(Edge {
                    key: request.key.clone(),
                    request: Some(request.clone()),
                    context: component,
                });
            }
        }
    }

    fn resolve_declared_keys(&mut self) {
        let model = self.session.model();

        for component in model.top_down() {
            self.resolve_declared_keys_of(component);
        }
    }

    fn resolve_declared_keys_of(&mut self, component: ComponentIndex) {
        let model = self.session.model();
        let name = &model.component(component).name;
        let _span = debug_span!("component", name = %name).entered();

        for key in self.catalog.declared_keys(component) {
            self.resolve(component, &key);

            self.components[component].declared.push(Edge {
                key,
                request: None,
                context: component,
            });
        }
    }

    fn finish(self) -> BindingGraph {
        BindingGraph {
            bindings: self.catalog.into_bindings(),
            nodes: self.nodes,
            components: self.components,
            scope_violations: self.scope_violations,
        }
    }

    /// Resolve a key in the context of a component.
    ///
    /// Returns [`None`] if the resolution of the key is already in progress.
    /// The resolution is available from the resolved graph of the component once
    /// the outermost resolution of the key finishes.
    fn resolve(&mut self, component: ComponentIndex, key: &Key) -> Option<NodeIndex> {
        if let Some(resolved) = self.components[component].resolutions.get(key) {
            return Some(resolved.node);
        }

        let entry = (component, key.clone());
        if !self.in_progress.insert(entry.clone()) {
            trace!(%key, "cyclic resolution");
            return None;
        }

        let resolved = self.resolve_uncached(component, key);
        self.in_progress.remove(&entry);

        let owner = self.nodes[resolved.node].owner;
        debug!(
            %key,
            resolution = ?resolved.resolution,
            owner = %self.session.model().component(owner).name,
            "resolved"
        );

        let node = resolved.node;
        self.components[component]
            .resolutions
            .insert(key.clone(), resolved);
        Some(node)
    }

    fn resolve_uncached(&mut self, component: ComponentIndex, key: &Key) -> Resolved {
        let model = self.session.model();

        let mut unique = Vec::new();
        let mut contributions = Vec::new();
        let mut declarations = Vec::new();

        for level in model.lineage(component) {
            let explicit = self.catalog.explicit(level, key);
            unique.extend(explicit.iter().map(|&binding| (binding, level)));

            if !key.is_contribution() {
                let contributed = self.catalog.contributions(level, key);
                contributions.extend(contributed.iter().map(|&binding| (binding, level)));

                let declared = self.catalog.declarations(level, key);
                declarations.extend(declared.iter().map(|&binding| (binding, level)));
            }
        }

        let is_multibound = !contributions.is_empty() || !declarations.is_empty();

        if is_multibound && !unique.is_empty() {
            let kind = self.multibinding_kind(&contributions, &declarations);
            let candidates = unique.iter().chain(&contributions).chain(&declarations);
            let owner = self.deepest(candidates);

            return Resolved {
                node: self.intern(NodeKind::Conflict(key.clone()), owner, Vec::new()),
                resolution: Resolution::Incompatible {
                    kind,
                    contributions: bindings(&contributions),
                    declarations: bindings(&declarations),
                    unique: bindings(&unique),
                },
            };
        }

        if is_multibound {
            return self.resolve_aggregate(key, &contributions, &declarations);
        }

        match *unique {
            [] => match self.catalog.implicit_binding(key) {
                Some(binding) => self.resolve_binding(component, binding, None),
                None => Resolved {
                    node: self.intern(
                        NodeKind::Missing(key.clone()),
                        model.root(component),
                        Vec::new(),
                    ),
                    resolution: Resolution::Missing,
                },
            },
            [(binding, level)] => self.resolve_binding(component, binding, Some(level)),
            _ => {
                let owner = self.deepest(&unique);

                Resolved {
                    node: self.intern(NodeKind::Conflict(key.clone()), owner, Vec::new()),
                    resolution: Resolution::Duplicate {
                        candidates: bindings(&unique),
                    },
                }
            }
        }
    }

    fn resolve_binding(
        &mut self,
        requester: ComponentIndex,
        binding: BindingIndex,
        declarer: Option<ComponentIndex>,
    ) -> Resolved {
        let (owner, violation) = self.owner(requester, binding, declarer);

        let edges = self
            .catalog
            .binding(binding)
            .dependencies
            .iter()
            .map(|dependency| Edge {
                key: dependency.key.clone(),
                request: Some(dependency.clone()),
                context: owner,
            })
            .collect();
        let node = self.intern(NodeKind::Binding(binding), owner, edges);

        if let Some((scope, scope_owner, dependency)) = violation {
            self.scope_violations.push(ScopeViolation {
                node,
                scope,
                scope_owner,
                requester,
                dependency,
            });
        }

        Resolved {
            node,
            resolution: Resolution::Bound { binding },
        }
    }

    fn resolve_aggregate(
        &mut self,
        key: &Key,
        contributions: &[(BindingIndex, ComponentIndex)],
        declarations: &[(BindingIndex, ComponentIndex)],
    ) -> Resolved {
        let kind = self.multibinding_kind(contributions, declarations);
        let owner = self.deepest(contributions.iter().chain(declarations));

        let edges = contributions
            .iter()
            .map(|&(binding, _)| Edge {
                key: self.catalog.binding(binding).key.clone(),
                request: None,
                context: owner,
            })
            .collect();

        Resolved {
            node: self.intern(NodeKind::Aggregate(key.clone()), owner, edges),
            resolution: Resolution::Multibound {
                kind,
                contributions: bindings(contributions),
                declarations: bindings(declarations),
            },
        }
    }

    /// Obtain the node of the given kind and owner creating it if necessary.
    ///
    /// The edges of a new node are resolved right away.
    fn intern(&mut self, kind: NodeKind, owner: ComponentIndex, edges: Vec<Edge>) -> NodeIndex {
        if let Some(&node) = self.interned.get(&(kind.clone(), owner)) {
            return node;
        }

        let node = self.nodes.insert(Node {
            kind: kind.clone(),
            owner,
            edges: edges.clone(),
        });
        self.interned.insert((kind, owner), node);
        self.components[owner].hosted.push(node);

        for edge in edges {
            self.resolve(edge.context, &edge.key);
        }

        node
    }

    fn multibinding_kind(
        &self,
        contributions: &[(BindingIndex, ComponentIndex)],
        declarations: &[(BindingIndex, ComponentIndex)],
    ) -> MultibindingKind {
        contributions
            .iter()
            .chain(declarations)
            .find_map(|&(binding, _)| self.catalog.binding(binding).kind.multibinding_kind())
            .unwrap_or(MultibindingKind::Set)
    }

    /// The deepest of the given components which all lie on a single lineage.
    fn deepest<'a, T: 'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a (T, ComponentIndex)>,
    ) -> ComponentIndex {
        let model = self.session.model();

        candidates
            .into_iter()
            .map(|&(_, component)| component)
            .max_by_key(|&component| model.depth(component))
            .unwrap_or(ComponentIndex(0))
    }

    fn resolution(&self, component: ComponentIndex, key: &Key) -> Option<&Resolution> {
        self.components[component]
            .resolutions
            .get(key)
            .map(|resolved| &resolved.resolution)
    }
}

fn bindings(candidates: &[(BindingIndex, ComponentIndex)]) -> Vec<BindingIndex> {
    candidates.iter().map(|&(binding, _)| binding).collect()
}

type Violation = (declaration::Scope, ComponentIndex, Request);
