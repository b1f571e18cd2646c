//! The declaration model consumed by the binding resolver.
//!
//! The model is built by a front-end through [`DeclarationModel::add_component`],
//! [`DeclarationModel::add_module`] and [`DeclarationModel::add_injectable`] and
//! is read-only afterwards. Its input contract is checked by
//! [`DeclarationModel::validate`].

use index_map::{Index, IndexMap};
use std::fmt;
use utility::{HashMap, SmallVec, Str, smallvec};

pub use key::{Contribution, Key, MapKey, MultibindingKind, Qualifier, Scope};
pub use model::{
    ComponentDependency, ComponentNode, Constructor, Declaration, DeclarationKind, EntryPoint,
    Injectable, Installation, Module,
};
pub use request::{Request, RequestKind};
pub use ty::{Substitution, Type};

mod key;
mod model;
mod request;
mod ty;
mod validate;

#[cfg(any(test, feature = "test"))]
pub mod test;

#[derive(Default, Clone)]
pub struct DeclarationModel {
    components: IndexMap<ComponentIndex, ComponentNode>,
    modules: IndexMap<ModuleIndex, Module>,
    injectables: IndexMap<InjectableIndex, Injectable>,
    injectables_by_path: HashMap<Str, SmallVec<InjectableIndex, 1>>,
}

impl DeclarationModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component to the tree.
    ///
    /// The parent has to be added before its children.
    pub fn add_component(&mut self, mut component: ComponentNode) -> ComponentIndex {
        let index = self.components.next_index();

        component.children.clear();
        if let Some(parent) = component.parent
            && parent.value() < index.value()
        {
            self.components[parent].children.push(index);
        }

        self.components.insert(component)
    }

    pub fn add_module(&mut self, module: Module) -> ModuleIndex {
        self.modules.insert(module)
    }

    pub fn add_injectable(&mut self, injectable: Injectable) -> InjectableIndex {
        let path = injectable.ty.path().unwrap_or_default().to_owned();
        let index = self.injectables.insert(injectable);

        self.injectables_by_path
            .entry(path.into())
            .and_modify(|indices| indices.push(index))
            .or_insert_with(|| smallvec![index]);

        index
    }

    pub fn components(&self) -> &IndexMap<ComponentIndex, ComponentNode> {
        &self.components
    }

    pub fn modules(&self) -> &IndexMap<ModuleIndex, Module> {
        &self.modules
    }

    pub fn injectables(&self) -> &IndexMap<InjectableIndex, Injectable> {
        &self.injectables
    }

    pub fn component(&self, index: ComponentIndex) -> &ComponentNode {
        &self.components[index]
    }

    pub fn module(&self, index: ModuleIndex) -> &Module {
        &self.modules[index]
    }

    pub fn injectable(&self, index: InjectableIndex) -> &Injectable {
        &self.injectables[index]
    }

    /// The injectable type with the type constructor of the given type.
    pub fn lookup_injectable(&self, ty: &Type) -> Option<InjectableIndex> {
        let path = ty.path()?;
        self.injectables_by_path
            .get(path)
            .and_then(|indices| indices.first().copied())
    }

    /// The root components in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = ComponentIndex> + '_ {
        self.components
            .iter()
            .filter(|(_, component)| component.parent.is_none())
            .map(|(index, _)| index)
    }

    /// The ancestors of the given component including itself, from the root downward.
    pub fn lineage(&self, component: ComponentIndex) -> SmallVec<ComponentIndex, 4> {
        let mut lineage = SmallVec::new();
        let mut current = Some(component);

        while let Some(index) = current {
            lineage.push(index);
            current = self.components[index].parent;
        }

        lineage.reverse();
        lineage
    }

    pub fn root(&self, component: ComponentIndex) -> ComponentIndex {
        let mut component = component;
        while let Some(parent) = self.components[component].parent {
            component = parent;
        }
        component
    }

    pub fn depth(&self, component: ComponentIndex) -> usize {
        self.lineage(component).len() - 1
    }

    /// Whether `ancestor` is a (non-strict) ancestor of `component`.
    pub fn is_ancestor(&self, ancestor: ComponentIndex, component: ComponentIndex) -> bool {
        self.lineage(component).contains(&ancestor)
    }

    /// The component path `A → B → C` used in dependency traces.
    pub fn path(&self, component: ComponentIndex) -> String {
        self.lineage(component)
            .into_iter()
            .map(|index| &*self.components[index].name)
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// All components in an order where every parent precedes its children.
    pub fn top_down(&self) -> impl Iterator<Item = ComponentIndex> + '_ {
        self.components.indices()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, index_map::Index)]
pub struct ComponentIndex(pub u16);

impl fmt::Debug for ComponentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}c", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, index_map::Index)]
pub struct ModuleIndex(pub u16);

impl fmt::Debug for ModuleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, index_map::Index)]
pub struct InjectableIndex(pub u32);

impl fmt::Debug for InjectableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}i", self.0)
    }
}
