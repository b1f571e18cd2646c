//! Dependency traces.
//!
//! A trace is the path of requests from an entry point to an offending node.
//! It is rendered with the offending key first and the entry point last:
//!
//! ```text
//!     Foo is injected at
//!         [AppComponent] Bar(…, foo)
//!     Bar is requested at
//!         [AppComponent] AppComponent.bar()
//! ```
//!
//! Entry points are preferred by the depth of their component (rootmost first),
//! then by the length of the path and finally by declaration order.

use declaration::{ComponentIndex, DeclarationModel};
use resolver::{BindingGraph, Edge, NodeIndex};
use std::{collections::VecDeque, ptr};
use utility::{HashMap, HashSet, INDENT};


pub struct TraceBuilder<'a> {
    graph: &'a BindingGraph,
    model: &'a DeclarationModel,
    /// Sorted by depth, component and declaration order.
    roots: Vec<Root<'a>>,
}

impl<'a> TraceBuilder<'a> {
    /// Consider the entry points of the given components.
    pub fn new(
        graph: &'a BindingGraph,
        model: &'a DeclarationModel,
        components: impl IntoIterator<Item = ComponentIndex>,
    ) -> Self {
        let mut roots: Vec<_> = components
            .into_iter()
            .flat_map(|component| {
                graph.components[component]
                    .entry_points
                    .iter()
                    .enumerate()
                    .map(move |(position, edge)| Root {
                        component,
                        depth: model.depth(component),
                        position,
                        edge,
                    })
            })
            .collect();
        roots.sort_by_key(|root| (root.depth, root.component, root.position));

        Self {
            graph,
            model,
            roots,
        }
    }

    /// Consider the entry points of all components of the tree the given component belongs to.
    pub fn for_tree(
        graph: &'a BindingGraph,
        model: &'a DeclarationModel,
        component: ComponentIndex,
    ) -> Self {
        let root = model.root(component);
        let components = model.top_down().filter(|&other| model.root(other) == root);
        Self::new(graph, model, components)
    }

    /// Find the preferred path from an entry point to the target.
    pub fn trace(&self, target: NodeIndex) -> Option<Trace<'a>> {
        let mut start = 0;

        while start < self.roots.len() {
            let depth = self.roots[start].depth;
            let end = self.roots[start..]
                .iter()
                .position(|root| root.depth != depth)
                .map_or(self.roots.len(), |offset| start + offset);

            if let Some(trace) = self.search(&self.roots[start..end], target) {
                return Some(trace);
            }

            start = end;
        }

        None
    }

    /// Breadth-first search from several entry points at once.
    fn search(&self, roots: &[Root<'a>], target: NodeIndex) -> Option<Trace<'a>> {
        // For every discovered node, the step it was discovered by.
        let mut discovered: HashMap<NodeIndex, Discovery<'a>> = HashMap::default();
        let mut queue = VecDeque::new();

        for (index, root) in roots.iter().enumerate() {
            let Some(node) = self.graph.target(root.edge) else {
                continue;
            };
            if discovered.contains_key(&node) {
                continue;
            }

            discovered.insert(node, Discovery::Root(index));
            queue.push_back(node);
        }

        while let Some(node) = queue.pop_front() {
            if node == target {
                break;
            }

            for (edge, successor) in self.graph.successors(node) {
                if discovered.contains_key(&successor) {
                    continue;
                }

                discovered.insert(successor, Discovery::Step { source: node, edge });
                queue.push_back(successor);
            }
        }

        let mut steps = Vec::new();
        let mut current = target;

        loop {
            match *discovered.get(&current)? {
                Discovery::Root(index) => {
                    steps.reverse();
                    return Some(Trace {
                        root: roots[index],
                        steps,
                    });
                }
                Discovery::Step { source, edge } => {
                    steps.push(Step { source, edge });
                    current = source;
                }
            }
        }
    }

    /// Whether the target is reachable from the entry point.
    fn reaches(&self, root: &Root<'a>, target: NodeIndex) -> bool {
        self.graph.reachable([root.edge]).contains(&target)
    }

    /// Render the trace, offending key first.
    pub fn render(&self, trace: &Trace<'a>) -> Vec<String> {
        let mut lines: Vec<_> = trace
            .steps
            .iter()
            .rev()
            .filter_map(|step| self.render_step(step.source, step.edge))
            .collect();

        let request = trace.root.edge.request.as_ref();
        let requested = request.map_or_else(
            || trace.root.edge.key.to_string(),
            |request| request.requested_type().to_string(),
        );
        let mut entry_point = format!(
            "{requested} is requested at\n{INDENT}{}",
            self.render_entry_point(&trace.root)
        );

        if trace.root.depth > 0 {
            entry_point += &format!(" [{}]", self.model.path(trace.root.component));
        }

        lines.push(entry_point);
        lines
    }

    /// Render a step as `<key> is injected at` followed by the request site.
    pub fn render_step(&self, source: NodeIndex, edge: &Edge) -> Option<String> {
        let request = edge.request.as_ref()?;
        let site = self.render_request_site(source, edge)?;

        Some(format!("{} is injected at\n{INDENT}{site}", request.requested_type()))
    }

    /// Render the site of a request as `[Component] Element(…, name, …)`.
    pub fn render_request_site(&self, source: NodeIndex, edge: &Edge) -> Option<String> {
        let request = edge.request.as_ref()?;
        let binding = self.graph.binding(source)?;

        let position = binding
            .dependencies
            .iter()
            .position(|dependency| dependency == request)
            .unwrap_or_default();

        let mut parameters = Vec::new();
        if position > 0 {
            parameters.push("…");
        }
        parameters.push(&*request.name);
        if position + 1 < binding.dependencies.len() {
            parameters.push("…");
        }

        Some(format!(
            "[{}] {}({})",
            self.model.component(edge.context).name,
            binding.element,
            parameters.join(", ")
        ))
    }

    fn render_entry_point(&self, root: &Root<'_>) -> String {
        let component = self.model.component(root.component);
        let member = component
            .entry_points
            .get(root.position)
            .map_or("", |entry_point| &entry_point.member);

        format!("[{0}] {0}.{member}()", component.name)
    }

    /// The other sites requesting the target, excluding the last step of the trace.
    ///
    /// Entry points are not request sites, see [`Self::other_entry_points`].
    pub fn other_request_sites(&self, target: NodeIndex, trace: &Trace<'a>) -> Vec<String> {
        let excluded = trace.steps.last().map(|step| (step.source, step.edge));
        let reachable = self.graph.reachable(self.roots.iter().map(|root| root.edge));

        let mut seen = HashSet::default();
        let mut sites = Vec::new();

        for node in reachable {
            for (edge, successor) in self.graph.successors(node) {
                let is_excluded = excluded
                    .is_some_and(|(source, other)| source == node && ptr::eq(other, edge));
                if successor != target || is_excluded {
                    continue;
                }
                if let Some(site) = self.render_request_site(node, edge)
                    && seen.insert(site.clone())
                {
                    sites.push(site);
                }
            }
        }

        sites
    }

    /// The entry points other than the one of the trace that depend on the target.
    pub fn other_entry_points(&self, target: NodeIndex, trace: &Trace<'a>) -> Vec<String> {
        self.roots
            .iter()
            .filter(|root| !ptr::eq(root.edge, trace.root.edge) && self.reaches(root, target))
            .map(|root| self.render_entry_point(root))
            .collect()
    }
}

/// A path from an entry point to a node.
pub struct Trace<'a> {
    pub root: Root<'a>,
    /// The steps from the entry point downward.
    pub steps: Vec<Step<'a>>,
}

impl Trace<'_> {
    /// The component of the entry point.
    pub fn component(&self) -> ComponentIndex {
        self.root.component
    }
}

/// An entry point.
#[derive(Clone, Copy)]
pub struct Root<'a> {
    pub component: ComponentIndex,
    depth: usize,
    position: usize,
    pub edge: &'a Edge,
}

#[derive(Clone, Copy)]
pub struct Step<'a> {
    pub source: NodeIndex,
    pub edge: &'a Edge,
}

#[derive(Clone, Copy)]
enum Discovery<'a> {
    Root(usize),
    Step { source: NodeIndex, edge: &'a Edge },
}
