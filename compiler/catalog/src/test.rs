use super::{BindingKind, Catalog, Producer};
use declaration::{
    ComponentDependency, ComponentNode, Constructor, Declaration, Injectable, Installation, MapKey,
    Module, MultibindingKind, Request, RequestKind, Type,
    test::{ModelBuilder, key, provides, request},
};

fn rendered(catalog: &Catalog<'_>, component: declaration::ComponentIndex) -> Vec<String> {
    catalog
        .local_bindings(component)
        .iter()
        .map(|&binding| catalog.binding(binding).to_string())
        .collect()
}

#[test]
fn module_bindings_in_declaration_order() {
    let mut builder = ModelBuilder::new();
    let module = builder.module(
        "AppModule",
        [
            provides("String").depends_on(request("Integer")),
            Declaration::binds(key("Foo"), "bindFoo", request("FooImpl")),
            Declaration::multibinds(key("Set<Bar>"), MultibindingKind::Set, "bars"),
            provides("Set<Bar>").depends_on(request("Baz").kind(RequestKind::Lazy)),
        ],
    );
    let component = builder.root("AppComponent", &[module], &[]);
    let model = builder.build();
    let catalog = Catalog::new(&model);

    assert_eq!(
        rendered(&catalog, component),
        [
            "component AppComponent",
            "provision String AppModule.string(Integer)",
            "delegation Foo AppModule.bindFoo(FooImpl)",
            "multibinding declaration Set<Bar> AppModule.bars()",
            "provision Set<Bar> AppModule.set(Lazy<Baz>)",
        ]
    );
    assert_eq!(catalog.explicit(component, &key("Set<Bar>")).len(), 1);
    assert_eq!(catalog.declarations(component, &key("Set<Bar>")).len(), 1);
    assert!(catalog.explicit(component, &key("Bar")).is_empty());
}

#[test]
fn contributions_are_indexed_by_base_key() {
    let mut builder = ModelBuilder::new();
    let element = key("Set<String>").into_set_element("Elements.one");
    let entry = key("Map<String, Integer>")
        .into_map_entry(MapKey::new("@StringKey", "\"a\""), "Entries.a");
    let module = builder.module(
        "Elements",
        [
            Declaration::provides(element.clone(), "one"),
            Declaration::binds(entry.clone(), "a", request("Integer")),
        ],
    );
    let component = builder.root("AppComponent", &[module], &[]);
    let model = builder.build();
    let catalog = Catalog::new(&model);

    let contributions = catalog.contributions(component, &key("Set<String>"));
    assert_eq!(contributions.len(), 1);
    assert_eq!(catalog.explicit(component, &element), contributions);
    assert!(catalog.explicit(component, &key("Set<String>")).is_empty());

    let entries = catalog.contributions(component, &key("Map<String, Integer>"));
    assert_eq!(catalog.binding(entries[0]).kind, BindingKind::MapEntry(Producer::Delegate));
    assert_eq!(
        catalog.binding(entries[0]).to_string(),
        "map contribution @StringKey(\"a\") Map<String, Integer> Elements.a(Integer)"
    );
    assert_eq!(
        catalog.declared_keys(component),
        [key("AppComponent"), key("Set<String>"), key("Map<String, Integer>")]
    );
}

#[test]
fn generic_modules_are_substituted_through_includes() {
    let mut builder = ModelBuilder::new();
    let inner = builder.add_module(
        Module::new("InnerModule")
            .parameter("E")
            .declare(Declaration::provides(
                declaration::Key::new(Type::generic("List", [Type::parameter("E")])),
                "list",
            )),
    );
    let outer = builder.add_module(
        Module::new("OuterModule")
            .parameter("T")
            .include(Installation::new(inner, [Type::parameter("T")])),
    );
    let component = builder.component(
        ComponentNode::new("AppComponent")
            .install(Installation::new(outer, [Type::named("String")])),
    );
    let model = builder.build();
    let catalog = Catalog::new(&model);

    assert_eq!(catalog.explicit(component, &key("List<String>")).len(), 1);
}

#[test]
fn modules_installed_by_ancestors_are_not_installed_again() {
    let mut builder = ModelBuilder::new();
    let shared = builder.module("SharedModule", [provides("Foo")]);
    let child_module = builder.add_module(
        Module::new("ChildModule")
            .include(shared)
            .declare(provides("Bar")),
    );
    let parent = builder.root("Parent", &[shared], &[]);
    let child = builder.child("Child", parent, &[child_module], &[]);
    let model = builder.build();
    let catalog = Catalog::new(&model);

    assert_eq!(catalog.explicit(parent, &key("Foo")).len(), 1);
    assert!(catalog.explicit(child, &key("Foo")).is_empty());
    assert_eq!(catalog.explicit(child, &key("Bar")).len(), 1);
}

#[test]
fn component_level_bindings() {
    let mut builder = ModelBuilder::new();
    let child = ComponentNode::new("Child").creator(Type::named("Child.Builder"));
    let parent = builder.root("Parent", &[], &[]);
    let child = builder.component(child.parent(parent));
    let module = builder.add_module(Module::new("ParentModule").subcomponent(child));
    let root = builder.component(
        ComponentNode::new("AppComponent")
            .install(module)
            .bound_instance(Declaration::provides(key("Integer"), "seed").nullable())
            .dependency(
                ComponentDependency::new(Type::named("Backend"))
                    .provision(Declaration::provides(key("Database"), "database")),
            ),
    );
    let model = builder.build();
    let catalog = Catalog::new(&model);

    assert_eq!(
        rendered(&catalog, root),
        [
            "component AppComponent",
            "bound instance Integer AppComponent.seed()",
            "component dependency Backend",
            "dependency provision Database Backend.database()",
            "subcomponent creator Child.Builder ParentModule",
        ]
    );
    assert!(catalog.binding(catalog.explicit(root, &key("Integer"))[0]).nullable);
}

#[test]
fn implicit_bindings_substitute_type_arguments() {
    let mut builder = ModelBuilder::new();
    builder.add_injectable(
        Injectable::new("Box")
            .parameter("T")
            .scoped("@Singleton")
            .constructor(
                Constructor::new()
                    .depends_on(Request::new(Type::parameter("T"), "value"))
                    .private(),
            ),
    );
    builder.injectable("Foo", &["Bar"]);
    let model = builder.build();
    let mut catalog = Catalog::new(&model);

    let boxed = catalog.implicit_binding(&key("Box<String>")).unwrap();
    let binding = catalog.binding(boxed);

    assert_eq!(binding.to_string(), "injectable constructor Box<String>(String)");
    assert!(binding.is_implicit() && binding.private);
    let scope = binding.scope.as_ref().map(ToString::to_string);
    assert_eq!(scope.as_deref(), Some("@Singleton"));
    assert_eq!(catalog.implicit_binding(&key("Box<String>")), Some(boxed));
    assert_eq!(catalog.bindings().len(), 1);
}

#[test]
fn ineligible_keys_have_no_implicit_binding() {
    let mut builder = ModelBuilder::new();
    builder.injectable("Foo", &[]);
    builder.add_injectable(
        Injectable::new("Ambiguous")
            .constructor(Constructor::new())
            .constructor(Constructor::new()),
    );
    let model = builder.build();
    let mut catalog = Catalog::new(&model);

    assert!(catalog.implicit_binding(&key("@Named(\"x\") Foo")).is_none());
    assert!(catalog.implicit_binding(&key("Foo<String>")).is_none());
    assert!(catalog.implicit_binding(&key("Ambiguous")).is_none());
    assert!(catalog.implicit_binding(&key("Unknown")).is_none());
    assert!(catalog.implicit_binding(&key("Foo")).is_some());
}
