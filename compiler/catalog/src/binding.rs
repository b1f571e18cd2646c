//! Bindings: producers of a single key.

use declaration::{
    ComponentIndex, InjectableIndex, Key, MultibindingKind, Request, Scope, ModuleIndex,
};
use std::fmt;
use utility::Str;

/// A producer of a value of a key.
///
/// Bindings are immutable once constructed and live in the arena of the catalog.
#[derive(Clone, Debug)]
pub struct Binding {
    pub kind: BindingKind,
    pub key: Key,
    pub scope: Option<Scope>,
    pub dependencies: Vec<Request>,
    pub declarer: Declarer,
    /// The component the binding is declared in or [`None`] if it is implicit.
    pub component: Option<ComponentIndex>,
    /// The name of the declaring element, e.g. `Module.member` or the constructed type.
    pub element: Str,
    pub nullable: bool,
    /// Whether the binding injects into a private member.
    pub private: bool,
    pub source: Str,
}

impl Binding {
    pub fn is_implicit(&self) -> bool {
        self.component.is_none()
    }

    pub fn is_contribution(&self) -> bool {
        matches!(self.kind, BindingKind::SetElement(_) | BindingKind::MapEntry(_))
    }

    /// The signature of the binding without its kind, e.g. `Foo Module.foo(Bar)`.
    pub fn signature(&self) -> Signature<'_> {
        Signature(self)
    }

    fn has_parameter_list(&self) -> bool {
        !matches!(
            self.kind,
            BindingKind::ComponentProvision
                | BindingKind::ComponentDependency
                | BindingKind::SubcomponentCreator
        )
    }
}

/// Renders a binding as `<kind> <signature>`.
impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.signature())
    }
}

pub struct Signature<'a>(&'a Binding);

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = self.0;

        match binding.kind {
            BindingKind::Injection
            | BindingKind::ComponentProvision
            | BindingKind::ComponentDependency => {}
            BindingKind::MapEntry(_) => {
                if let Some(map_key) = binding.key.contribution.as_ref().and_then(|c| c.map_key()) {
                    write!(f, "{map_key} ")?;
                }
                write!(f, "{} ", binding.key)?;
            }
            _ => write!(f, "{} ", binding.key)?,
        }

        write!(f, "{}", binding.element)?;

        if binding.has_parameter_list() {
            write!(f, "(")?;
            for (index, dependency) in binding.dependencies.iter().enumerate() {
                if index != 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", dependency.requested_type())?;
            }
            write!(f, ")")?;
        }

        Ok(())
    }
}

/// The kind of a binding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BindingKind {
    /// An implicit binding backed by an injectable constructor.
    Injection,
    Provision,
    Delegate,
    SetElement(Producer),
    MapEntry(Producer),
    /// The declaration of a possibly empty multibinding.
    Multibinds(MultibindingKind),
    /// The component itself.
    ComponentProvision,
    /// The instance of a component dependency.
    ComponentDependency,
    /// A provision member of a component dependency.
    ComponentDependencyProvision,
    BoundInstance,
    SubcomponentCreator,
}

impl BindingKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Injection => "injectable constructor",
            Self::Provision => "provision",
            Self::Delegate => "delegation",
            Self::SetElement(_) => "set contribution",
            Self::MapEntry(_) => "map contribution",
            Self::Multibinds(_) => "multibinding declaration",
            Self::ComponentProvision => "component",
            Self::ComponentDependency => "component dependency",
            Self::ComponentDependencyProvision => "dependency provision",
            Self::BoundInstance => "bound instance",
            Self::SubcomponentCreator => "subcomponent creator",
        }
    }

    pub const fn multibinding_kind(self) -> Option<MultibindingKind> {
        match self {
            Self::SetElement(_) => Some(MultibindingKind::Set),
            Self::MapEntry(_) => Some(MultibindingKind::Map),
            Self::Multibinds(kind) => Some(kind),
            _ => None,
        }
    }

    pub const fn is_delegate(self) -> bool {
        matches!(
            self,
            Self::Delegate
                | Self::SetElement(Producer::Delegate)
                | Self::MapEntry(Producer::Delegate)
        )
    }
}

/// How a multibinding contribution produces its value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Producer {
    Provision,
    Delegate,
}

/// The declaration a binding stems from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Declarer {
    Module(ModuleIndex),
    Component(ComponentIndex),
    Injectable(InjectableIndex),
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, index_map::Index)]
pub struct BindingIndex(pub u32);

impl fmt::Debug for BindingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}b", self.0)
    }
}
