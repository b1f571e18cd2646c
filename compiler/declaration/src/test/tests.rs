use super::{ModelBuilder, key, member_name, provides, request};
use crate::{
    ComponentNode, Constructor, Declaration, DeclarationModel, Injectable, Installation, Module,
    MultibindingKind, Type,
};
use diagnostics::{Reporter, reporter::Buffer};

fn validate(model: &DeclarationModel) -> Vec<String> {
    let buffer = Buffer::default();
    let result = model.validate(&Reporter::buffer(buffer.clone()));
    let messages: Vec<_> = diagnostics::reporter::drain(&buffer)
        .into_iter()
        .map(|diagnostic| diagnostic.text())
        .collect();

    assert_eq!(result.is_err(), !messages.is_empty());
    messages
}

#[test]
fn parse_qualified_key() {
    let key = key("@Named(\"x\") List<String>");

    assert_eq!(key.qualifier.as_ref().map(|qualifier| &*qualifier.0), Some("@Named(\"x\")"));
    assert_eq!(key.to_string(), "@Named(\"x\") List<String>");
    assert_eq!(member_name(&key), "list");
    assert_eq!(request("test.FooBar").name, "fooBar");
}

#[test]
fn lineage_and_paths() {
    let mut builder = ModelBuilder::new();
    let parent = builder.root("Parent", &[], &[]);
    let child = builder.child("Child", parent, &[], &[]);
    let grandchild = builder.child("Grandchild", child, &[], &[]);
    let sibling = builder.child("Sibling", parent, &[], &[]);
    let model = builder.build();

    assert_eq!(&*model.lineage(grandchild), &[parent, child, grandchild]);
    assert_eq!(model.path(grandchild), "Parent → Child → Grandchild");
    assert_eq!(model.component(parent).children, [child, sibling]);
    assert_eq!(model.root(grandchild), parent);
    assert_eq!(model.depth(grandchild), 2);
    assert!(model.is_ancestor(child, grandchild));
    assert!(!model.is_ancestor(sibling, grandchild));
    assert!(validate(&model).is_empty());
}

#[test]
fn unknown_parent_is_invalid() {
    let mut model = DeclarationModel::new();
    let root = model.add_component(ComponentNode::new("Root"));
    model.add_component(ComponentNode::new("Orphan").parent(crate::ComponentIndex(7)));
    model.add_component(ComponentNode::new("Child").parent(root));

    assert_eq!(
        validate(&model),
        ["the parent of component Orphan is not a previously declared component"]
    );
}

#[test]
fn mismatching_type_arguments_are_invalid() {
    let mut builder = ModelBuilder::new();
    let generic = builder.add_module(Module::new("GenericModule").parameter("T"));
    builder.component(
        ComponentNode::new("AppComponent")
            .install(generic)
            .install(Installation::new(generic, [Type::named("String")])),
    );

    assert_eq!(
        validate(&builder.build()),
        ["GenericModule expects 1 type argument but AppComponent supplies 0"]
    );
}

#[test]
fn inclusion_cycle_is_invalid() {
    let mut model = DeclarationModel::new();
    let first = model.add_module(Module::new("First").include(crate::ModuleIndex(1)));
    model.add_module(Module::new("Second").include(first));

    let messages = validate(&model);

    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0],
        "First includes itself\nInclusion chain:\n    First\n    Second\n    First"
    );
}

#[test]
fn malformed_declarations_are_invalid() {
    let mut builder = ModelBuilder::new();
    builder.module(
        "MalformedModule",
        [
            provides("Fine"),
            Declaration::binds(key("Foo"), "bindFoo", request("FooImpl"))
                .depends_on(request("Bar")),
            Declaration::multibinds(key("Set<Foo>"), MultibindingKind::Set, "foos")
                .scoped("@Singleton"),
        ],
    );

    assert_eq!(
        validate(&builder.build()),
        [
            "the delegation MalformedModule.bindFoo has 2 dependencies but has to have exactly one",
            "the multibinding declaration MalformedModule.foos may not be scoped",
        ]
    );
}

#[test]
fn several_constructors_are_invalid() {
    let mut builder = ModelBuilder::new();
    builder.add_injectable(
        Injectable::new("Foo")
            .constructor(Constructor::new())
            .constructor(Constructor::new().depends_on(request("Bar"))),
    );
    builder.injectable("Bar", &[]);

    let model = builder.build();

    assert_eq!(
        validate(&model),
        ["Foo has 2 injectable constructors but at most one is allowed"]
    );
    let eligible = |index| model.injectable(index).eligible_constructor().is_some();
    assert!(!eligible(crate::InjectableIndex(0)));
    assert!(eligible(crate::InjectableIndex(1)));
}

#[test]
fn generic_injectable_lookup() {
    let mut builder = ModelBuilder::new();
    let index = builder.add_injectable(
        Injectable::new("Box")
            .parameter("T")
            .constructor(Constructor::new().depends_on(request("T"))),
    );
    let model = builder.build();

    assert_eq!(model.lookup_injectable(&key("Box<String>").ty), Some(index));
    assert_eq!(model.injectable(index).ty.to_string(), "Box<T>");
    assert_eq!(model.lookup_injectable(&key("Crate").ty), None);
}
