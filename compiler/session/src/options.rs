use derivation::{Elements, FromStr, Str};
use diagnostics::Severity;

/// The processor options.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Options {
    /// Whether every component and module is validated on its own, not only
    /// the parts reachable from entry points.
    pub full_graph_validation: Validation,
    /// The severity of providing a nullable value to a non-nullable request.
    pub nullable_policy: Policy,
    /// The severity of injecting into private members.
    pub private_member_policy: Policy,
    /// The number of candidates listed before the rest is summarized.
    pub duplicate_binding_display_cap: usize,
}

impl Options {
    pub const DEFAULT_DISPLAY_CAP: usize = 10;
}

impl Default for Options {
    fn default() -> Self {
        Self {
            full_graph_validation: Validation::default(),
            nullable_policy: Policy::default(),
            private_member_policy: Policy::default(),
            duplicate_binding_display_cap: Self::DEFAULT_DISPLAY_CAP,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, FromStr, Str, Elements)]
#[format(dash_case)]
pub enum Validation {
    #[default]
    None,
    Error,
    Warning,
}

impl Validation {
    /// The severity of diagnostics reported on full graphs if enabled.
    pub const fn severity(self) -> Option<Severity> {
        match self {
            Self::None => None,
            Self::Error => Some(Severity::Error),
            Self::Warning => Some(Severity::Warning),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, FromStr, Str, Elements)]
#[format(dash_case)]
pub enum Policy {
    #[default]
    Error,
    Warning,
}

impl Policy {
    pub const fn severity(self) -> Severity {
        match self {
            Self::Error => Severity::Error,
            Self::Warning => Severity::Warning,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Options, Policy, Validation};
    use derivation::Elements;
    use diagnostics::Severity;

    #[test]
    fn defaults() {
        let options = Options::default();

        assert_eq!(options.full_graph_validation, Validation::None);
        assert_eq!(options.nullable_policy.severity(), Severity::Error);
        assert_eq!(options.duplicate_binding_display_cap, 10);
    }

    #[test]
    fn textual_representation() {
        assert_eq!("warning".parse(), Ok(Validation::Warning));
        assert_eq!("Warning".parse::<Policy>(), Err(()));
        let names: Vec<_> = Validation::elements()
            .map(|validation| validation.name())
            .collect();
        assert_eq!(names, ["none", "error", "warning"]);
    }
}
