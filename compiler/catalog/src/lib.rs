//! The binding catalog.
//!
//! For every component, the catalog collects the bindings the component declares
//! itself: the bindings of its transitively included modules, the subcomponent
//! creators those modules list and the component-level bindings (the component
//! itself, its bound instances and its dependencies). Lookups through the lineage
//! of a component, i.e. inherited visibility, are left to the resolver which walks
//! the local bindings from the root downward. Implicit bindings are synthesized on
//! demand from injectable constructors and memoized per key.

use declaration::{
    ComponentIndex, Declaration, DeclarationKind, DeclarationModel, Installation, Key, ModuleIndex,
    Substitution, Type,
};
use index_map::IndexMap;
use std::collections::hash_map::Entry;
use tracing::{debug, trace};
use utility::{HashMap, HashSet, SmallVec, Str};

pub use binding::{Binding, BindingIndex, BindingKind, Declarer, Producer, Signature};

mod binding;
#[cfg(test)]
mod test;

pub struct Catalog<'ctx> {
    model: &'ctx DeclarationModel,
    bindings: IndexMap<BindingIndex, Binding>,
    locals: IndexMap<ComponentIndex, LocalBindings>,
    implicit: HashMap<Key, Option<BindingIndex>>,
}

impl<'ctx> Catalog<'ctx> {
    /// Collect the local bindings of every component.
    ///
    /// Components are visited top-down so that a module already installed by an
    /// ancestor is not installed again.
    pub fn new(model: &'ctx DeclarationModel) -> Self {
        let mut catalog = Self {
            model,
            bindings: IndexMap::default(),
            locals: IndexMap::with_capacity(model.components().len()),
            implicit: HashMap::default(),
        };

        for component in model.top_down() {
            let locals = catalog.collect(component);
            catalog.locals.insert(locals);
        }

        catalog
    }

    pub fn model(&self) -> &'ctx DeclarationModel {
        self.model
    }

    pub fn bindings(&self) -> &IndexMap<BindingIndex, Binding> {
        &self.bindings
    }

    pub fn into_bindings(self) -> IndexMap<BindingIndex, Binding> {
        self.bindings
    }

    pub fn binding(&self, index: BindingIndex) -> &Binding {
        &self.bindings[index]
    }

    /// The non-multibinding bindings of the given key declared by the component.
    ///
    /// Multibinding contributions are found by their marked key.
    pub fn explicit(&self, component: ComponentIndex, key: &Key) -> &[BindingIndex] {
        self.locals[component]
            .unique
            .get(key)
            .map(|bindings| bindings.as_slice())
            .unwrap_or_default()
    }

    /// The multibinding contributions to the given base key declared by the component.
    pub fn contributions(&self, component: ComponentIndex, key: &Key) -> &[BindingIndex] {
        self.locals[component]
            .contributions
            .get(key)
            .map(|bindings| bindings.as_slice())
            .unwrap_or_default()
    }

    /// The multibinding declarations of the given key declared by the component.
    pub fn declarations(&self, component: ComponentIndex, key: &Key) -> &[BindingIndex] {
        self.locals[component]
            .declarations
            .get(key)
            .map(|bindings| bindings.as_slice())
            .unwrap_or_default()
    }

    /// Whether the component declares any binding for the given key or base key.
    pub fn declares(&self, component: ComponentIndex, key: &Key) -> bool {
        !self.explicit(component, key).is_empty()
            || !self.contributions(component, key).is_empty()
            || !self.declarations(component, key).is_empty()
    }

    /// All bindings declared by the component in declaration order.
    pub fn local_bindings(&self, component: ComponentIndex) -> &[BindingIndex] {
        &self.locals[component].order
    }

    /// The keys declared by the component with their contribution markers stripped.
    pub fn declared_keys(&self, component: ComponentIndex) -> Vec<Key> {
        let mut seen = HashSet::default();

        self.local_bindings(component)
            .iter()
            .map(|&binding| self.bindings[binding].key.base())
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }

    /// The implicit binding of the given key if the key is eligible.
    ///
    /// A key is eligible if it is unqualified, no multibinding contribution, fully
    /// instantiated and if its type has exactly one injectable constructor.
    pub fn implicit_binding(&mut self, key: &Key) -> Option<BindingIndex> {
        if let Some(&binding) = self.implicit.get(key) {
            return binding;
        }

        let binding = self.synthesize_implicit_binding(key);
        self.implicit.insert(key.clone(), binding);
        binding
    }

    /// Whether the key could be bound by an injectable constructor at all.
    pub fn could_be_implicit(key: &Key) -> bool {
        key.qualifier.is_none() && key.contribution.is_none() && !key.ty.has_parameters()
    }

    fn synthesize_implicit_binding(&mut self, key: &Key) -> Option<BindingIndex> {
        if !Self::could_be_implicit(key) {
            return None;
        }

        let index = self.model.lookup_injectable(&key.ty)?;
        let injectable = self.model.injectable(index);
        let constructor = injectable.eligible_constructor()?;

        if injectable.parameters.len() != key.ty.arguments().len() {
            return None;
        }

        let substitution = Substitution::new(&injectable.parameters, key.ty.arguments());
        let source = if constructor.source.is_empty() {
            injectable.source.clone()
        } else {
            constructor.source.clone()
        };

        let binding = self.bindings.insert(Binding {
            kind: BindingKind::Injection,
            key: key.clone(),
            scope: injectable.scope.clone(),
            dependencies: constructor
                .dependencies
                .iter()
                .map(|dependency| dependency.substitute(&substitution))
                .collect(),
            declarer: Declarer::Injectable(index),
            component: None,
            element: key.ty.to_string().into(),
            nullable: false,
            private: constructor.private,
            source,
        });

        debug!(%key, ?binding, "synthesized implicit binding");
        Some(binding)
    }

    fn collect(&mut self, component: ComponentIndex) -> LocalBindings {
        let node = self.model.component(component);
        let mut locals = LocalBindings::default();

        locals.installed = match node.parent {
            Some(parent) if self.locals.contains(parent) => self.locals[parent].installed.clone(),
            _ => HashSet::default(),
        };

        let component_binding = Binding {
            kind: BindingKind::ComponentProvision,
            key: Key::new(node.ty.clone()),
            scope: None,
            dependencies: Vec::new(),
            declarer: Declarer::Component(component),
            component: Some(component),
            element: node.name.clone(),
            nullable: false,
            private: false,
            source: node.source.clone(),
        };
        self.add(&mut locals, component_binding);

        for instance in &node.bound_instances {
            let binding =
                self.component_member(component, BindingKind::BoundInstance, instance, &node.name);
            self.add(&mut locals, binding);
        }

        for dependency in &node.dependencies {
            let dependency_name: Str = dependency.ty.to_string().into();

            let binding = Binding {
                kind: BindingKind::ComponentDependency,
                key: Key::new(dependency.ty.clone()),
                scope: None,
                dependencies: Vec::new(),
                declarer: Declarer::Component(component),
                component: Some(component),
                element: dependency_name.clone(),
                nullable: false,
                private: false,
                source: dependency.source.clone(),
            };
            self.add(&mut locals, binding);

            for provision in &dependency.provisions {
                let binding = self.component_member(
                    component,
                    BindingKind::ComponentDependencyProvision,
                    provision,
                    &dependency_name,
                );
                self.add(&mut locals, binding);
            }
        }

        let mut installations = Vec::new();
        for installation in &node.modules {
            self.install(
                installation,
                &Substitution::default(),
                &mut locals.installed,
                &mut installations,
            );
        }

        let mut creators = HashSet::default();
        for (module, arguments) in installations {
            let installed_module = self.model.module(module);
            let substitution = Substitution::new(&installed_module.parameters, &arguments);

            for declaration in &installed_module.declarations {
                let binding = self.module_binding(component, module, declaration, &substitution);
                self.add(&mut locals, binding);
            }

            for &subcomponent in &installed_module.subcomponents {
                let Some(creator) = self
                    .model
                    .components()
                    .get(subcomponent)
                    .and_then(|subcomponent| subcomponent.creator.clone())
                else {
                    continue;
                };

                if !creators.insert(creator.clone()) {
                    continue;
                }

                let binding = Binding {
                    kind: BindingKind::SubcomponentCreator,
                    key: Key::new(creator),
                    scope: None,
                    dependencies: Vec::new(),
                    declarer: Declarer::Module(module),
                    component: Some(component),
                    element: installed_module.name.clone(),
                    nullable: false,
                    private: false,
                    source: installed_module.source.clone(),
                };
                self.add(&mut locals, binding);
            }
        }

        trace!(component = %node.name, bindings = locals.order.len(), "collected local bindings");
        locals
    }

    /// Install a module and its transitive includes unless an ancestor already did.
    ///
    /// Type arguments are substituted by the enclosing substitution first.
    fn install(
        &self,
        installation: &Installation,
        substitution: &Substitution<'_>,
        installed: &mut HashSet<(ModuleIndex, Vec<Type>)>,
        installations: &mut Vec<(ModuleIndex, Vec<Type>)>,
    ) {
        let arguments: Vec<_> = installation
            .arguments
            .iter()
            .map(|argument| argument.substitute(substitution))
            .collect();

        if !installed.insert((installation.module, arguments.clone())) {
            return;
        }

        installations.push((installation.module, arguments.clone()));

        let module = self.model.module(installation.module);
        let substitution = Substitution::new(&module.parameters, &arguments);

        for include in &module.includes {
            self.install(include, &substitution, installed, installations);
        }
    }

    fn module_binding(
        &self,
        component: ComponentIndex,
        module: ModuleIndex,
        declaration: &Declaration,
        substitution: &Substitution<'_>,
    ) -> Binding {
        let producer = |producer: Producer| match &declaration.key.contribution {
            Some(contribution) => match contribution.multibinding_kind() {
                declaration::MultibindingKind::Set => BindingKind::SetElement(producer),
                declaration::MultibindingKind::Map => BindingKind::MapEntry(producer),
            },
            None => match producer {
                Producer::Provision => BindingKind::Provision,
                Producer::Delegate => BindingKind::Delegate,
            },
        };

        let kind = match declaration.kind {
            DeclarationKind::Provides => producer(Producer::Provision),
            DeclarationKind::Binds => producer(Producer::Delegate),
            DeclarationKind::Multibinds(kind) => BindingKind::Multibinds(kind),
        };

        let module_name = &self.model.module(module).name;

        Binding {
            kind,
            key: declaration.key.substitute(substitution),
            scope: declaration.scope.clone(),
            dependencies: declaration
                .dependencies
                .iter()
                .map(|dependency| dependency.substitute(substitution))
                .collect(),
            declarer: Declarer::Module(module),
            component: Some(component),
            element: format!("{module_name}.{}", declaration.member).into(),
            nullable: declaration.nullable,
            private: false,
            source: declaration.source.clone(),
        }
    }

    fn component_member(
        &self,
        component: ComponentIndex,
        kind: BindingKind,
        member: &Declaration,
        owner: &Str,
    ) -> Binding {
        Binding {
            kind,
            key: member.key.clone(),
            scope: member.scope.clone(),
            dependencies: Vec::new(),
            declarer: Declarer::Component(component),
            component: Some(component),
            element: format!("{owner}.{}", member.member).into(),
            nullable: member.nullable,
            private: false,
            source: member.source.clone(),
        }
    }

    fn add(&mut self, locals: &mut LocalBindings, binding: Binding) {
        let key = binding.key.clone();
        let kind = binding.kind;
        let index = self.bindings.insert(binding);

        locals.order.push(index);

        match kind {
            BindingKind::Multibinds(_) => push(&mut locals.declarations, key, index),
            BindingKind::SetElement(_) | BindingKind::MapEntry(_) => {
                push(&mut locals.contributions, key.base(), index);
                push(&mut locals.unique, key, index);
            }
            _ => push(&mut locals.unique, key, index),
        }
    }
}

fn push(map: &mut HashMap<Key, SmallVec<BindingIndex, 1>>, key: Key, binding: BindingIndex) {
    match map.entry(key) {
        Entry::Occupied(mut entry) => entry.get_mut().push(binding),
        Entry::Vacant(entry) => {
            entry.insert(utility::smallvec![binding]);
        }
    }
}

#[derive(Default)]
struct LocalBindings {
    /// Non-multibinding bindings and contributions by their marked key.
    unique: HashMap<Key, SmallVec<BindingIndex, 1>>,
    /// Multibinding contributions by their base key.
    contributions: HashMap<Key, SmallVec<BindingIndex, 1>>,
    /// Multibinding declarations.
    declarations: HashMap<Key, SmallVec<BindingIndex, 1>>,
    order: Vec<BindingIndex>,
    /// The module installations visible in the component including those of ancestors.
    installed: HashSet<(ModuleIndex, Vec<Type>)>,
}
