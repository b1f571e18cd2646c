//! Structural type descriptors.

use std::{fmt, str::FromStr};
use utility::Str;

/// A type signature.
///
/// Types are compared structurally. Type parameters only occur in generic
/// declarations and are replaced by [substitution](Type::substitute) before
/// keys are compared.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Type {
    Named { path: Str, arguments: Vec<Type> },
    Parameter(Str),
}

impl Type {
    pub fn named(path: impl Into<Str>) -> Self {
        Self::Named {
            path: path.into(),
            arguments: Vec::new(),
        }
    }

    pub fn generic(path: impl Into<Str>, arguments: impl IntoIterator<Item = Type>) -> Self {
        Self::Named {
            path: path.into(),
            arguments: arguments.into_iter().collect(),
        }
    }

    pub fn parameter(name: impl Into<Str>) -> Self {
        Self::Parameter(name.into())
    }

    /// The path of the type constructor if the type is not a parameter.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Named { path, .. } => Some(path),
            Self::Parameter(_) => None,
        }
    }

    pub fn arguments(&self) -> &[Type] {
        match self {
            Self::Named { arguments, .. } => arguments,
            Self::Parameter(_) => &[],
        }
    }

    /// Whether the type mentions a type parameter anywhere.
    pub fn has_parameters(&self) -> bool {
        match self {
            Self::Named { arguments, .. } => arguments.iter().any(Self::has_parameters),
            Self::Parameter(_) => true,
        }
    }

    /// Replace the given parameters by the corresponding arguments.
    ///
    /// Parameters without a corresponding argument are left untouched.
    #[must_use]
    pub fn substitute(&self, substitution: &Substitution<'_>) -> Self {
        if substitution.is_empty() {
            return self.clone();
        }

        match self {
            Self::Named { path, arguments } => Self::Named {
                path: path.clone(),
                arguments: arguments
                    .iter()
                    .map(|argument| argument.substitute(substitution))
                    .collect(),
            },
            Self::Parameter(name) => substitution
                .lookup(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
        }
    }

    /// Whether both types have the same type constructor.
    ///
    /// Used to find bindings that are similar to a missing one.
    pub fn has_same_constructor(&self, other: &Self) -> bool {
        matches!((self.path(), other.path()), (Some(this), Some(other)) if this == other)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { path, arguments } => {
                write!(f, "{path}")?;

                if !arguments.is_empty() {
                    write!(f, "<")?;
                    for (index, argument) in arguments.iter().enumerate() {
                        if index != 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{argument}")?;
                    }
                    write!(f, ">")?;
                }

                Ok(())
            }
            Self::Parameter(name) => write!(f, "{name}"),
        }
    }
}

/// Parse a type like `Map<String, Provider<Foo>>`. All names are parsed as named types.
impl FromStr for Type {
    type Err = ParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { source, index: 0 };
        let ty = parser.parse_type()?;
        parser.skip_whitespace();

        if parser.index != source.len() {
            return Err(ParseError { index: parser.index });
        }

        Ok(ty)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ParseError {
    pub index: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed type at byte {}", self.index)
    }
}

struct Parser<'a> {
    source: &'a str,
    index: usize,
}

impl Parser<'_> {
    fn parse_type(&mut self) -> Result<Type, ParseError> {
        self.skip_whitespace();

        let start = self.index;
        while let Some(character) = self.peek() {
            if character.is_alphanumeric()
                || matches!(character, '_' | '.' | '$' | '[' | ']' | '?')
            {
                self.index += character.len_utf8();
            } else {
                break;
            }
        }

        if start == self.index {
            return Err(ParseError { index: self.index });
        }

        let path = self.source[start..self.index].to_owned();
        let mut arguments = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some('<') {
            self.index += 1;

            loop {
                arguments.push(self.parse_type()?);
                self.skip_whitespace();

                match self.peek() {
                    Some(',') => self.index += 1,
                    Some('>') => {
                        self.index += 1;
                        break;
                    }
                    _ => return Err(ParseError { index: self.index }),
                }
            }
        }

        Ok(Type::generic(path, arguments))
    }

    fn peek(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(character) = self.peek().filter(|character| character.is_whitespace()) {
            self.index += character.len_utf8();
        }
    }
}

/// A mapping from type parameters to type arguments.
#[derive(Clone, Copy, Default)]
pub struct Substitution<'a> {
    parameters: &'a [Str],
    arguments: &'a [Type],
}

impl<'a> Substitution<'a> {
    /// Pair up parameters and arguments. Extra entries on either side are ignored.
    pub fn new(parameters: &'a [Str], arguments: &'a [Type]) -> Self {
        Self {
            parameters,
            arguments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() || self.arguments.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<&'a Type> {
        self.parameters
            .iter()
            .position(|parameter| parameter == name)
            .and_then(|index| self.arguments.get(index))
    }
}

#[cfg(test)]
mod test {
    use super::{Substitution, Type};
    use utility::Str;

    #[test]
    fn parse_and_display_nested_generics() {
        let ty: Type = "Map< String ,Provider<test.Foo>>".parse().unwrap();

        assert_eq!(
            ty,
            Type::generic(
                "Map",
                [
                    Type::named("String"),
                    Type::generic("Provider", [Type::named("test.Foo")]),
                ]
            )
        );
        assert_eq!(ty.to_string(), "Map<String, Provider<test.Foo>>");
    }

    #[test]
    fn parse_rejects_trailing_input() {
        assert!("Foo>".parse::<Type>().is_err());
        assert!("List<".parse::<Type>().is_err());
        assert!("".parse::<Type>().is_err());
    }

    #[test]
    fn substitute_parameters() {
        let parameters: [Str; 2] = ["K".into(), "V".into()];
        let arguments = [Type::named("String"), Type::generic("List", [Type::named("Integer")])];
        let ty = Type::generic("Map", [Type::parameter("K"), Type::parameter("V")]);

        let substituted = ty.substitute(&Substitution::new(&parameters, &arguments));

        assert_eq!(substituted.to_string(), "Map<String, List<Integer>>");
        assert!(!substituted.has_parameters());
        assert!(ty.has_parameters());
    }

    #[test]
    fn same_constructor_ignores_arguments() {
        let list_of_string: Type = "List<String>".parse().unwrap();
        let list_of_integer: Type = "List<Integer>".parse().unwrap();
        let set_of_string: Type = "Set<String>".parse().unwrap();

        assert!(list_of_string.has_same_constructor(&list_of_integer));
        assert!(!list_of_string.has_same_constructor(&set_of_string));
        assert!(!Type::parameter("T").has_same_constructor(&Type::parameter("T")));
    }
}
