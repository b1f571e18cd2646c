//! Dependency requests.

use crate::{key::Key, ty::Substitution};
use std::fmt;
use utility::Str;

/// A request for a key made by a binding parameter or by an entry point.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Request {
    pub key: Key,
    pub kind: RequestKind,
    /// The parameter or member name used in dependency traces.
    pub name: Str,
    /// Whether the requesting site accepts a nullable value.
    pub nullable: bool,
}

impl Request {
    pub fn new(key: impl Into<Key>, name: impl Into<Str>) -> Self {
        Self {
            key: key.into(),
            kind: RequestKind::Instance,
            name: name.into(),
            nullable: false,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: RequestKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn substitute(&self, substitution: &Substitution<'_>) -> Self {
        Self {
            key: self.key.substitute(substitution),
            kind: self.kind,
            name: self.name.clone(),
            nullable: self.nullable,
        }
    }

    /// The requested type including its indirection wrapper, e.g. `@Q Provider<Foo>`.
    pub fn requested_type(&self) -> RequestedType<'_> {
        RequestedType(self)
    }
}

pub struct RequestedType<'a>(&'a Request);

impl fmt::Display for RequestedType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = self.0;

        if let Some(qualifier) = &request.key.qualifier {
            write!(f, "{qualifier} ")?;
        }

        match request.kind {
            RequestKind::Instance => write!(f, "{}", request.key.ty),
            RequestKind::Provider => write!(f, "Provider<{}>", request.key.ty),
            RequestKind::Lazy => write!(f, "Lazy<{}>", request.key.ty),
            RequestKind::ProviderOfLazy => write!(f, "Provider<Lazy<{}>>", request.key.ty),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum RequestKind {
    #[default]
    Instance,
    Provider,
    Lazy,
    ProviderOfLazy,
}

impl RequestKind {
    /// Whether the value is obtained lazily which breaks dependency cycles.
    pub const fn is_indirection(self) -> bool {
        !matches!(self, Self::Instance)
    }
}

#[cfg(test)]
mod test {
    use super::{Request, RequestKind};
    use crate::{key::Key, ty::Type};

    #[test]
    fn requested_type_wraps_indirections() {
        let key = Key::new(Type::named("Foo")).qualified("@Q");

        let instance = Request::new(key.clone(), "foo");
        let lazy = Request::new(key, "foo").kind(RequestKind::ProviderOfLazy);

        assert_eq!(instance.requested_type().to_string(), "@Q Foo");
        assert_eq!(lazy.requested_type().to_string(), "@Q Provider<Lazy<Foo>>");
        assert!(!instance.kind.is_indirection());
        assert!(lazy.kind.is_indirection());
    }
}
