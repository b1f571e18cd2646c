//! Components, modules and injectable types as supplied by the front-end.

use crate::{
    ComponentIndex, ModuleIndex,
    key::{Key, MultibindingKind, Scope},
    request::Request,
    ty::Type,
};
use utility::Str;

/// A node of the component tree.
#[derive(Clone, Debug)]
pub struct ComponentNode {
    pub name: Str,
    pub ty: Type,
    pub parent: Option<ComponentIndex>,
    /// Derived when a child is added to the model.
    pub children: Vec<ComponentIndex>,
    pub scopes: Vec<Scope>,
    pub modules: Vec<Installation>,
    pub entry_points: Vec<EntryPoint>,
    pub dependencies: Vec<ComponentDependency>,
    pub bound_instances: Vec<Declaration>,
    /// The type of the creator (builder or factory) of a subcomponent.
    pub creator: Option<Type>,
    pub source: Str,
}

impl ComponentNode {
    pub fn new(name: impl Into<Str>) -> Self {
        let name = name.into();

        Self {
            ty: Type::named(name.clone()),
            name,
            parent: None,
            children: Vec::new(),
            scopes: Vec::new(),
            modules: Vec::new(),
            entry_points: Vec::new(),
            dependencies: Vec::new(),
            bound_instances: Vec::new(),
            creator: None,
            source: Str::default(),
        }
    }

    #[must_use]
    pub fn parent(mut self, parent: ComponentIndex) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn scoped(mut self, scope: impl Into<Str>) -> Self {
        self.scopes.push(Scope::new(scope));
        self
    }

    #[must_use]
    pub fn install(mut self, installation: impl Into<Installation>) -> Self {
        self.modules.push(installation.into());
        self
    }

    #[must_use]
    pub fn entry_point(mut self, member: impl Into<Str>, request: Request) -> Self {
        self.entry_points.push(EntryPoint {
            member: member.into(),
            request,
        });
        self
    }

    #[must_use]
    pub fn dependency(mut self, dependency: ComponentDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    #[must_use]
    pub fn bound_instance(mut self, instance: Declaration) -> Self {
        self.bound_instances.push(instance);
        self
    }

    #[must_use]
    pub fn creator(mut self, creator: Type) -> Self {
        self.creator = Some(creator);
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<Str>) -> Self {
        self.source = source.into();
        self
    }

    pub fn is_scoped_with(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }

    /// The scopes joined for display, e.g. `@Singleton @Reusable`.
    pub fn scope_list(&self) -> String {
        self.scopes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A provision method or a members-injection method of a component.
#[derive(Clone, Debug)]
pub struct EntryPoint {
    pub member: Str,
    pub request: Request,
}

/// A type whose provision members are made available to the component.
#[derive(Clone, Debug)]
pub struct ComponentDependency {
    pub ty: Type,
    pub provisions: Vec<Declaration>,
    pub source: Str,
}

impl ComponentDependency {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            provisions: Vec::new(),
            source: Str::default(),
        }
    }

    #[must_use]
    pub fn provision(mut self, provision: Declaration) -> Self {
        self.provisions.push(provision);
        self
    }
}

/// The installation of a possibly generic module.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Installation {
    pub module: ModuleIndex,
    pub arguments: Vec<Type>,
}

impl Installation {
    pub fn new(module: ModuleIndex, arguments: impl IntoIterator<Item = Type>) -> Self {
        Self {
            module,
            arguments: arguments.into_iter().collect(),
        }
    }
}

impl From<ModuleIndex> for Installation {
    fn from(module: ModuleIndex) -> Self {
        Self::new(module, [])
    }
}

/// A named group of binding declarations.
#[derive(Clone, Debug)]
pub struct Module {
    pub name: Str,
    pub parameters: Vec<Str>,
    pub includes: Vec<Installation>,
    pub declarations: Vec<Declaration>,
    /// Subcomponents whose creators are bindable in the installing component.
    pub subcomponents: Vec<ComponentIndex>,
    pub source: Str,
}

impl Module {
    pub fn new(name: impl Into<Str>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            includes: Vec::new(),
            declarations: Vec::new(),
            subcomponents: Vec::new(),
            source: Str::default(),
        }
    }

    #[must_use]
    pub fn parameter(mut self, parameter: impl Into<Str>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    #[must_use]
    pub fn include(mut self, installation: impl Into<Installation>) -> Self {
        self.includes.push(installation.into());
        self
    }

    #[must_use]
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    #[must_use]
    pub fn subcomponent(mut self, component: ComponentIndex) -> Self {
        self.subcomponents.push(component);
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<Str>) -> Self {
        self.source = source.into();
        self
    }
}

/// A binding declaration.
///
/// Also used for the bound instances of components and for the provisions
/// of component dependencies where the kind is [`DeclarationKind::Provides`].
#[derive(Clone, Debug)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// The bound key. Multibinding contributions carry their marker on the key.
    pub key: Key,
    pub scope: Option<Scope>,
    pub dependencies: Vec<Request>,
    pub member: Str,
    pub nullable: bool,
    pub source: Str,
}

impl Declaration {
    fn new(kind: DeclarationKind, key: Key, member: Str) -> Self {
        Self {
            kind,
            key,
            scope: None,
            dependencies: Vec::new(),
            member,
            nullable: false,
            source: Str::default(),
        }
    }

    pub fn provides(key: impl Into<Key>, member: impl Into<Str>) -> Self {
        Self::new(DeclarationKind::Provides, key.into(), member.into())
    }

    pub fn binds(key: impl Into<Key>, member: impl Into<Str>, target: Request) -> Self {
        Self::new(DeclarationKind::Binds, key.into(), member.into()).depends_on(target)
    }

    pub fn multibinds(key: impl Into<Key>, kind: MultibindingKind, member: impl Into<Str>) -> Self {
        Self::new(DeclarationKind::Multibinds(kind), key.into(), member.into())
    }

    #[must_use]
    pub fn depends_on(mut self, request: Request) -> Self {
        self.dependencies.push(request);
        self
    }

    #[must_use]
    pub fn scoped(mut self, scope: impl Into<Str>) -> Self {
        self.scope = Some(Scope::new(scope));
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<Str>) -> Self {
        self.source = source.into();
        self
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeclarationKind {
    Provides,
    Binds,
    Multibinds(MultibindingKind),
}

/// A type with an injectable constructor.
#[derive(Clone, Debug)]
pub struct Injectable {
    /// The type applied to its own parameters.
    pub ty: Type,
    pub parameters: Vec<Str>,
    pub scope: Option<Scope>,
    pub constructors: Vec<Constructor>,
    pub source: Str,
}

impl Injectable {
    pub fn new(path: impl Into<Str>) -> Self {
        Self {
            ty: Type::named(path),
            parameters: Vec::new(),
            scope: None,
            constructors: Vec::new(),
            source: Str::default(),
        }
    }

    #[must_use]
    pub fn parameter(mut self, parameter: impl Into<Str>) -> Self {
        let parameter = parameter.into();

        if let Type::Named { arguments, .. } = &mut self.ty {
            arguments.push(Type::Parameter(parameter.clone()));
        }
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn scoped(mut self, scope: impl Into<Str>) -> Self {
        self.scope = Some(Scope::new(scope));
        self
    }

    #[must_use]
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<Str>) -> Self {
        self.source = source.into();
        self
    }

    /// The constructor used for implicit bindings.
    pub fn eligible_constructor(&self) -> Option<&Constructor> {
        match &*self.constructors {
            [constructor] => Some(constructor),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Constructor {
    pub dependencies: Vec<Request>,
    pub private: bool,
    pub source: Str,
}

impl Constructor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn depends_on(mut self, request: Request) -> Self {
        self.dependencies.push(request);
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }
}
