//! Error handling mechanisms.

use crate::reporter::ErasedReportedError;

pub type Result<T = (), E = ErasedReportedError> = std::result::Result<T, E>;

/// Whether any error was reported so far.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[must_use]
pub enum Health {
    #[default]
    Untainted,
    Tainted(ErasedReportedError),
}

impl Health {
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Untainted, Self::Untainted) => Self::Untainted,
            (Self::Tainted(error), _) | (_, Self::Tainted(error)) => Self::Tainted(error),
        }
    }

    pub fn taint(&mut self, error: ErasedReportedError) {
        if *self == Self::Untainted {
            *self = Self::Tainted(error);
        }
    }

    /// Combine the given health into this one.
    pub fn absorb(&mut self, other: Self) {
        *self = self.and(other);
    }

    pub fn is_tainted(self) -> bool {
        matches!(self, Self::Tainted(_))
    }
}

impl From<Result> for Health {
    fn from(result: Result) -> Self {
        match result {
            Ok(()) => Self::Untainted,
            Err(error) => Self::Tainted(error),
        }
    }
}

impl From<Health> for Result {
    fn from(health: Health) -> Self {
        match health {
            Health::Untainted => Ok(()),
            Health::Tainted(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Health, Result};
    use crate::reporter::ErasedReportedError;

    #[test]
    fn tainted_health_stays_tainted() {
        let error = ErasedReportedError::new_unchecked();
        let mut health = Health::Untainted;

        health.absorb(Health::Untainted);
        assert_eq!(health, Health::Untainted);

        health.absorb(Health::Tainted(error));
        health.absorb(Health::Untainted);
        assert_eq!(Result::from(health), Err(error));
    }
}
