//! Binding keys.

use crate::ty::{Substitution, Type};
use std::fmt;
use utility::Str;

/// What a binding is bound to and what a request asks for.
///
/// Keys are plain values. Two keys are equal if their types, qualifiers and
/// contribution markers are structurally equal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Key {
    pub ty: Type,
    pub qualifier: Option<Qualifier>,
    pub contribution: Option<Contribution>,
}

impl Key {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            qualifier: None,
            contribution: None,
        }
    }

    #[must_use]
    pub fn qualified(mut self, qualifier: impl Into<Str>) -> Self {
        self.qualifier = Some(Qualifier(qualifier.into()));
        self
    }

    /// Mark the key as a contribution to the set of the same base key.
    #[must_use]
    pub fn into_set_element(mut self, origin: impl Into<Str>) -> Self {
        self.contribution = Some(Contribution::SetElement {
            origin: origin.into(),
        });
        self
    }

    /// Mark the key as a contribution to the map of the same base key.
    #[must_use]
    pub fn into_map_entry(mut self, map_key: MapKey, origin: impl Into<Str>) -> Self {
        self.contribution = Some(Contribution::MapEntry {
            map_key,
            origin: origin.into(),
        });
        self
    }

    /// The key without its contribution marker.
    pub fn base(&self) -> Self {
        Self {
            ty: self.ty.clone(),
            qualifier: self.qualifier.clone(),
            contribution: None,
        }
    }

    pub fn is_contribution(&self) -> bool {
        self.contribution.is_some()
    }

    #[must_use]
    pub fn substitute(&self, substitution: &Substitution<'_>) -> Self {
        Self {
            ty: self.ty.substitute(substitution),
            qualifier: self.qualifier.clone(),
            contribution: self.contribution.clone(),
        }
    }

    /// Whether the key refers to a different binding of a structurally related type.
    pub fn is_similar_to(&self, other: &Self) -> bool {
        self.base() != other.base() && self.ty.has_same_constructor(&other.ty)
    }
}

impl From<Type> for Key {
    fn from(ty: Type) -> Self {
        Self::new(ty)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(qualifier) = &self.qualifier {
            write!(f, "{qualifier} ")?;
        }
        write!(f, "{}", self.ty)
    }
}

/// An opaque tag distinguishing keys of the same type.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Qualifier(pub Str);

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The multibinding-contribution marker of a key.
///
/// The origin identifies the contributing declaration which keeps distinct
/// contributions to the same multibinding apart.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Contribution {
    SetElement { origin: Str },
    MapEntry { map_key: MapKey, origin: Str },
}

impl Contribution {
    pub fn multibinding_kind(&self) -> MultibindingKind {
        match self {
            Self::SetElement { .. } => MultibindingKind::Set,
            Self::MapEntry { .. } => MultibindingKind::Map,
        }
    }

    pub fn map_key(&self) -> Option<&MapKey> {
        match self {
            Self::SetElement { .. } => None,
            Self::MapEntry { map_key, .. } => Some(map_key),
        }
    }
}

/// The key of a map contribution: the annotation type and the literal value.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MapKey {
    pub annotation: Str,
    pub value: Str,
}

impl MapKey {
    pub fn new(annotation: impl Into<Str>, value: impl Into<Str>) -> Self {
        Self {
            annotation: annotation.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.annotation, self.value)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum MultibindingKind {
    Set,
    Map,
}

impl MultibindingKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Set => "Set",
            Self::Map => "Map",
        }
    }
}

/// A scope annotation.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Scope(pub Str);

impl Scope {
    pub fn new(name: impl Into<Str>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::{Key, MapKey};
    use crate::ty::Type;

    fn key(ty: &str) -> Key {
        Key::new(ty.parse::<Type>().unwrap())
    }

    #[test]
    fn display_omits_contribution_marker() {
        let element = key("String")
            .qualified("@Named(\"x\")")
            .into_set_element("M.element");

        assert_eq!(element.to_string(), "@Named(\"x\") String");
        assert_eq!(element.base(), key("String").qualified("@Named(\"x\")"));
    }

    #[test]
    fn distinct_contributions_are_distinct_keys() {
        let first = key("Integer").into_map_entry(MapKey::new("@StringKey", "\"a\""), "M.first");
        let second = key("Integer").into_map_entry(MapKey::new("@StringKey", "\"a\""), "M.second");

        assert_ne!(first, second);
        assert_eq!(first.base(), second.base());
    }

    #[test]
    fn similarity() {
        assert!(key("List<String>").is_similar_to(&key("List<Integer>")));
        assert!(key("Foo").qualified("@Q").is_similar_to(&key("Foo")));
        assert!(!key("Foo").is_similar_to(&key("Foo")));
        assert!(!key("Foo").is_similar_to(&key("Bar")));
    }
}
