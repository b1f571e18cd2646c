//! Helpers for building declaration models in tests.

use crate::{
    ComponentIndex, ComponentNode, Constructor, Declaration, DeclarationModel, Injectable,
    InjectableIndex, Key, Module, ModuleIndex, Request, Type,
};

#[cfg(test)]
mod tests;

/// Parse a key written like `@Named("x") Map<String, Foo>`.
///
/// A leading word starting with `@` is taken as the qualifier.
///
/// # Panics
///
/// If the type is malformed.
pub fn key(source: &str) -> Key {
    let (qualifier, ty) = match source.strip_prefix('@') {
        Some(_) => match source.split_once(' ') {
            Some((qualifier, ty)) => (Some(qualifier), ty),
            None => (None, source),
        },
        None => (None, source),
    };

    let ty: Type = ty
        .parse()
        .unwrap_or_else(|error| panic!("invalid type ‘{source}’: {error}"));
    let key = Key::new(ty);

    match qualifier {
        Some(qualifier) => key.qualified(qualifier.to_owned()),
        None => key,
    }
}

/// An instance request for the given key named after the requested type.
pub fn request(source: &str) -> Request {
    let key = key(source);
    let name = member_name(&key);
    Request::new(key, name)
}

/// The conventional member name for a key: its simple type name in lower camel case.
pub fn member_name(key: &Key) -> String {
    let path = key.ty.path().unwrap_or("value");
    let simple = path.rsplit('.').next().unwrap_or(path);
    let mut characters = simple.chars();

    match characters.next() {
        Some(first) => first.to_lowercase().chain(characters).collect(),
        None => String::new(),
    }
}

/// A provision `Module.member()` of the given key without dependencies.
pub fn provides(source: &str) -> Declaration {
    let key = key(source);
    let member = member_name(&key);
    Declaration::provides(key, member)
}

#[derive(Default)]
pub struct ModelBuilder {
    model: DeclarationModel,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(
        &mut self,
        name: &str,
        declarations: impl IntoIterator<Item = Declaration>,
    ) -> ModuleIndex {
        let module = declarations
            .into_iter()
            .fold(Module::new(name.to_owned()), Module::declare);
        self.model.add_module(module)
    }

    pub fn add_module(&mut self, module: Module) -> ModuleIndex {
        self.model.add_module(module)
    }

    /// A root component installing the given modules and requesting the given keys.
    pub fn root(
        &mut self,
        name: &str,
        modules: &[ModuleIndex],
        entry_points: &[&str],
    ) -> ComponentIndex {
        let component = Self::component_node(name, modules, entry_points);
        self.model.add_component(component)
    }

    pub fn child(
        &mut self,
        name: &str,
        parent: ComponentIndex,
        modules: &[ModuleIndex],
        entry_points: &[&str],
    ) -> ComponentIndex {
        let component = Self::component_node(name, modules, entry_points).parent(parent);
        self.model.add_component(component)
    }

    pub fn component(&mut self, component: ComponentNode) -> ComponentIndex {
        self.model.add_component(component)
    }

    fn component_node(name: &str, modules: &[ModuleIndex], entry_points: &[&str]) -> ComponentNode {
        let component = modules
            .iter()
            .fold(ComponentNode::new(name.to_owned()), |component, &module| {
                component.install(module)
            });

        entry_points.iter().fold(component, |component, entry_point| {
            let request = request(entry_point);
            component.entry_point(request.name.clone(), request)
        })
    }

    /// An injectable type whose single constructor requests the given keys.
    pub fn injectable(&mut self, ty: &str, dependencies: &[&str]) -> InjectableIndex {
        let constructor = dependencies
            .iter()
            .map(|dependency| request(dependency))
            .fold(Constructor::new(), Constructor::depends_on);

        self.model
            .add_injectable(Injectable::new(ty.to_owned()).constructor(constructor))
    }

    pub fn add_injectable(&mut self, injectable: Injectable) -> InjectableIndex {
        self.model.add_injectable(injectable)
    }

    pub fn build(self) -> DeclarationModel {
        self.model
    }
}
