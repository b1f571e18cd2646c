use crate::{BindingGraph, NodeKind, Resolution, resolve, resolve_full};
use declaration::{
    ComponentIndex, ComponentNode, Constructor, Declaration, DeclarationModel, Injectable,
    MultibindingKind, RequestKind,
    test::{ModelBuilder, key, provides, request},
};
use session::{Options, Session};

fn resolved(model: &DeclarationModel) -> BindingGraph {
    let (session, _) = Session::buffered(model, Options::default());
    resolve(&session)
}

fn owner<'m>(
    graph: &BindingGraph,
    model: &'m DeclarationModel,
    component: ComponentIndex,
    key_: &str,
) -> &'m str {
    let resolved = graph.resolved(component, &key(key_)).unwrap();
    &model.component(graph.nodes[resolved.node].owner).name
}

fn elements(graph: &BindingGraph, bindings: &[catalog::BindingIndex]) -> Vec<String> {
    bindings
        .iter()
        .map(|&binding| graph.bindings[binding].element.to_string())
        .collect()
}

#[test]
fn child_inherits_binding_of_parent() {
    let mut builder = ModelBuilder::new();
    let module = builder.module("M", [provides("String"), provides("Integer")]);
    let a = builder.root("A", &[module], &["Integer"]);
    let b = builder.child("B", a, &[], &["String"]);
    let model = builder.build();
    let graph = resolved(&model);

    let resolved = graph.resolved(b, &key("String")).unwrap();
    let Resolution::Bound { binding } = &resolved.resolution else {
        panic!("expected a bound resolution");
    };
    assert_eq!(graph.bindings[*binding].to_string(), "provision String M.string()");
    assert_eq!(owner(&graph, &model, b, "String"), "A");
    assert!(graph.components[a].hosted.contains(&resolved.node));
}

#[test]
fn duplicate_bindings_keep_declaration_order() {
    let mut builder = ModelBuilder::new();
    let m1 = builder.module("M1", [provides("Foo")]);
    let m2 = builder.module("M2", [provides("Foo")]);
    let component = builder.root("C", &[m2, m1], &["Foo"]);
    let model = builder.build();
    let graph = resolved(&model);

    let resolved = graph.resolved(component, &key("Foo")).unwrap();
    let Resolution::Duplicate { candidates } = &resolved.resolution else {
        panic!("expected duplicate bindings");
    };
    assert_eq!(elements(&graph, candidates), ["M2.foo", "M1.foo"]);
}

#[test]
fn set_contribution_and_unique_binding_are_incompatible() {
    let mut builder = ModelBuilder::new();
    let m1 = builder.module(
        "M1",
        [Declaration::provides(key("Set<String>").into_set_element("M1.string"), "string")],
    );
    let m2 = builder.module("M2", [Declaration::provides(key("Set<String>"), "strings")]);
    let component = builder.root("C", &[m1, m2], &["Set<String>"]);
    let model = builder.build();
    let graph = resolved(&model);

    let Resolution::Incompatible { kind, contributions, declarations, unique } =
        &graph.resolved(component, &key("Set<String>")).unwrap().resolution
    else {
        panic!("expected incompatible bindings");
    };
    assert_eq!(*kind, MultibindingKind::Set);
    assert_eq!(elements(&graph, contributions), ["M1.string"]);
    assert!(declarations.is_empty());
    assert_eq!(elements(&graph, unique), ["M2.strings"]);
}

#[test]
fn aggregates_collect_contributions_of_the_lineage() {
    let mut builder = ModelBuilder::new();
    let parent_module = builder.module(
        "ParentModule",
        [Declaration::provides(key("Set<String>").into_set_element("parent"), "parent")],
    );
    let child_module = builder.module(
        "ChildModule",
        [Declaration::provides(key("Set<String>").into_set_element("child"), "child")],
    );
    let parent = builder.root("Parent", &[parent_module], &["Set<String>"]);
    let child = builder.child("Child", parent, &[child_module], &["Set<String>"]);
    let model = builder.build();
    let graph = resolved(&model);

    let contributions = |component| {
        let resolved = graph.resolved(component, &key("Set<String>")).unwrap();
        match &resolved.resolution {
            Resolution::Multibound { contributions, .. } => elements(&graph, contributions),
            resolution => panic!("unexpected resolution {resolution:?}"),
        }
    };

    assert_eq!(contributions(parent), ["ParentModule.parent"]);
    assert_eq!(contributions(child), ["ParentModule.parent", "ChildModule.child"]);
    assert_eq!(owner(&graph, &model, parent, "Set<String>"), "Parent");
    assert_eq!(owner(&graph, &model, child, "Set<String>"), "Child");

    let aggregate = graph.resolved(child, &key("Set<String>")).unwrap().node;
    let owners: Vec<_> = graph
        .successors(aggregate)
        .map(|(_, node)| &*model.component(graph.nodes[node].owner).name)
        .collect();
    assert_eq!(owners, ["Parent", "Child"]);
}

#[test]
fn multibinding_declaration_without_contributions_is_empty() {
    let mut builder = ModelBuilder::new();
    let module = builder.module(
        "M",
        [Declaration::multibinds(key("Map<String, Foo>"), MultibindingKind::Map, "foos")],
    );
    let component = builder.root("C", &[module], &["Map<String, Foo>"]);
    let model = builder.build();
    let graph = resolved(&model);

    assert!(matches!(
        &graph.resolved(component, &key("Map<String, Foo>")).unwrap().resolution,
        Resolution::Multibound { kind: MultibindingKind::Map, contributions, declarations }
            if contributions.is_empty() && declarations.len() == 1
    ));
}

#[test]
fn implicit_bindings_are_shared_by_siblings() {
    let mut builder = ModelBuilder::new();
    builder.injectable("Foo", &[]);
    let root = builder.root("Root", &[], &[]);
    let left = builder.child("Left", root, &[], &["Foo"]);
    let right = builder.child("Right", root, &[], &["Foo"]);
    let model = builder.build();
    let graph = resolved(&model);

    assert_eq!(owner(&graph, &model, left, "Foo"), "Root");
    assert_eq!(
        graph.resolved(left, &key("Foo")).unwrap().node,
        graph.resolved(right, &key("Foo")).unwrap().node
    );
}

#[test]
fn implicit_bindings_are_hosted_by_the_deepest_dependency_owner() {
    let mut builder = ModelBuilder::new();
    builder.injectable("Foo", &["Bar", "Baz"]);
    builder.injectable("Baz", &[]);
    let child_module = builder.module("ChildModule", [provides("Bar")]);
    let root = builder.root("Root", &[], &[]);
    let child = builder.child("Child", root, &[child_module], &["Foo"]);
    let model = builder.build();
    let graph = resolved(&model);

    assert_eq!(owner(&graph, &model, child, "Foo"), "Child");
    assert_eq!(owner(&graph, &model, child, "Baz"), "Root");
}

#[test]
fn missing_dependency_pins_implicit_binding_to_requester() {
    let mut builder = ModelBuilder::new();
    builder.injectable("Foo", &["Unbound"]);
    let root = builder.root("Root", &[], &[]);
    let left = builder.child("Left", root, &[], &["Foo", "Unbound"]);
    let right = builder.child("Right", root, &[], &["Unbound"]);
    let model = builder.build();
    let graph = resolved(&model);

    assert_eq!(owner(&graph, &model, left, "Foo"), "Left");
    assert_eq!(owner(&graph, &model, left, "Unbound"), "Root");

    let missing: Vec<_> = graph
        .nodes
        .values()
        .filter(|node| matches!(node.kind, NodeKind::Missing(_)))
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(
        graph.resolved(left, &key("Unbound")).unwrap().node,
        graph.resolved(right, &key("Unbound")).unwrap().node
    );
}

#[test]
fn scoped_implicit_binding_is_hosted_by_component_with_scope() {
    let mut builder = ModelBuilder::new();
    builder.add_injectable(
        Injectable::new("Cache")
            .scoped("@Singleton")
            .constructor(Constructor::new()),
    );
    let root = builder.component(ComponentNode::new("Root").scoped("@Singleton"));
    let child = builder.child("Child", root, &[], &["Cache"]);
    let model = builder.build();
    let graph = resolved(&model);

    assert_eq!(owner(&graph, &model, child, "Cache"), "Root");
    assert!(graph.scope_violations.is_empty());
}

#[test]
fn scoped_binding_with_unavailable_dependency_is_hosted_by_requester() {
    let mut builder = ModelBuilder::new();
    builder.add_injectable(
        Injectable::new("Cache")
            .scoped("@Singleton")
            .constructor(Constructor::new().depends_on(request("Session"))),
    );
    let child_module = builder.module("ChildModule", [provides("Session")]);
    let root = builder.component(ComponentNode::new("Root").scoped("@Singleton"));
    let child = builder.child("Child", root, &[child_module], &["Cache"]);
    let model = builder.build();
    let graph = resolved(&model);

    assert_eq!(owner(&graph, &model, child, "Cache"), "Child");

    let [violation] = &*graph.scope_violations else {
        panic!("expected exactly one scope violation");
    };
    assert_eq!(violation.scope.to_string(), "@Singleton");
    assert_eq!(violation.scope_owner, root);
    assert_eq!(violation.requester, child);
    assert_eq!(violation.dependency.key, key("Session"));
}

#[test]
fn explicit_binding_floats_to_component_with_local_contributions() {
    let mut builder = ModelBuilder::new();
    let root_module = builder.module(
        "RootModule",
        [
            provides("Foo").depends_on(request("Set<String>")),
            Declaration::provides(key("Set<String>").into_set_element("root"), "root"),
        ],
    );
    let child_module = builder.module(
        "ChildModule",
        [Declaration::provides(key("Set<String>").into_set_element("child"), "child")],
    );
    let root = builder.root("Root", &[root_module], &["Foo"]);
    let child = builder.child("Child", root, &[child_module], &["Foo"]);
    let model = builder.build();
    let graph = resolved(&model);

    assert_eq!(owner(&graph, &model, root, "Foo"), "Root");
    assert_eq!(owner(&graph, &model, child, "Foo"), "Child");
    assert_ne!(
        graph.resolved(root, &key("Foo")).unwrap().node,
        graph.resolved(child, &key("Foo")).unwrap().node
    );
}

#[test]
fn explicit_binding_does_not_float_for_dependency_missing_at_declarer() {
    let mut builder = ModelBuilder::new();
    let root_module = builder.module("RootModule", [provides("Foo").depends_on(request("Bar"))]);
    let child_module = builder.module("ChildModule", [provides("Bar")]);
    let root = builder.root("Root", &[root_module], &[]);
    let child = builder.child("Child", root, &[child_module], &["Foo"]);
    let model = builder.build();
    let graph = resolved(&model);

    assert_eq!(owner(&graph, &model, child, "Foo"), "Root");
    assert!(graph.resolved(root, &key("Bar")).unwrap().resolution.is_missing());
    let bar = graph.resolved(child, &key("Bar"));
    assert!(!bar.is_some_and(|resolved| resolved.resolution.is_missing()));
}

#[test]
fn cycles_terminate_and_link_both_ways() {
    let mut builder = ModelBuilder::new();
    builder.injectable("A", &["B"]);
    builder.add_injectable(Injectable::new("B").constructor(
        Constructor::new().depends_on(request("A").kind(RequestKind::Provider)),
    ));
    let component = builder.root("C", &[], &["A"]);
    let model = builder.build();
    let graph = resolved(&model);

    let a = graph.resolved(component, &key("A")).unwrap().node;
    let (edge, b) = graph.successors(a).next().unwrap();
    assert!(graph.is_eager(a, edge));

    let (edge, back) = graph.successors(b).next().unwrap();
    assert_eq!(back, a);
    assert!(!graph.is_eager(b, edge));
}

#[test]
fn full_resolution_includes_declared_keys() {
    let mut builder = ModelBuilder::new();
    let module = builder.module("M", [provides("Foo").depends_on(request("Bar"))]);
    let component = builder.root("C", &[module], &[]);
    let model = builder.build();
    let (session, _) = Session::buffered(&model, Options::default());

    assert!(resolve(&session).components[component].resolutions.is_empty());

    let graph = resolve_full(&session);
    let declared: Vec<_> = graph.components[component]
        .declared
        .iter()
        .map(|edge| edge.key.to_string())
        .collect();
    assert_eq!(declared, ["C", "Foo"]);
    let bar = graph.resolved(component, &key("Bar")).unwrap();
    assert!(bar.resolution.is_missing());
}

#[test]
fn resolution_is_deterministic() {
    let build = || {
        let mut builder = ModelBuilder::new();
        builder.injectable("Foo", &["Bar", "Set<Baz>"]);
        let module = builder.module(
            "M",
            [
                provides("Bar"),
                Declaration::provides(key("Set<Baz>").into_set_element("one"), "one"),
                Declaration::provides(key("Set<Baz>").into_set_element("two"), "two"),
            ],
        );
        let root = builder.root("Root", &[module], &["Foo"]);
        builder.child("Child", root, &[], &["Foo", "Set<Baz>"]);
        builder.build()
    };

    let render = |model: &DeclarationModel| {
        let graph = resolved(model);
        let nodes: Vec<_> = graph
            .nodes
            .values()
            .map(|node| (&node.kind, node.owner))
            .collect();
        format!("{nodes:?}")
    };

    assert_eq!(render(&build()), render(&build()));
}
