use derivation::Elements;
use std::fmt;

/// A code identifying the kind of a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Elements)]
pub enum ErrorCode {
    E000,
    E001,
    E002,
    E003,
    E004,
    E005,
    E006,
    E007,
    E008,
    E009,
    E010,
    E011,
}

impl ErrorCode {
    /// The kind tag of the diagnostic.
    pub const fn kind(self) -> &'static str {
        match self {
            Self::E000 => "invalid-declaration",
            Self::E001 => "missing-binding",
            Self::E002 => "duplicate-binding",
            Self::E003 => "incompatible-multibinding-declarations",
            Self::E004 => "scope-violation",
            Self::E005 => "dependency-cycle",
            Self::E006 => "incompatibly-scoped-bindings",
            Self::E007 => "conflicting-map-keys",
            Self::E008 => "inconsistent-map-key-annotations",
            Self::E009 => "duplicate-set-contributions",
            Self::E010 => "nullable-to-non-nullable",
            Self::E011 => "private-member",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
