//! Utility functionality and definitions.

use std::{
    fmt,
    io::{self, Write},
};

pub use difference::{Changeset, Difference};
pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
pub use smallvec::smallvec;

pub mod cycle;
pub mod paint;

pub type Str = std::borrow::Cow<'static, str>;

pub type SmallVec<T, const N: usize> = smallvec::SmallVec<[T; N]>;

pub const INDENT: &str = "    ";

pub trait ListingExt {
    fn list(self, conjunction: Conjunction) -> String;
}

impl<I> ListingExt for I
where
    I: Iterator + Clone,
    I::Item: fmt::Display,
{
    fn list(self, conjunction: Conjunction) -> String {
        use std::fmt::Write;

        let mut this = self.peekable();
        let mut first = true;
        let mut result = String::new();

        while let Some(item) = this.next() {
            if !first {
                if this.peek().is_some() {
                    result += ", ";
                } else {
                    let _ = write!(result, " {conjunction} ");
                }
            }

            let _ = write!(result, "{item}");
            first = false;
        }

        result
    }
}

#[derive(Clone, Copy)]
pub enum Conjunction {
    And,
    Or,
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "and",
            Self::Or => "or",
        })
    }
}

/// Use the singular or the plural form of the given word depending on the given amount.
///
/// # Examples
///
/// ```
/// # use utility::pluralize;
/// assert_eq!(pluralize!(1, "other"), "other");
/// assert_eq!(pluralize!(15, "other"), "others");
/// assert_eq!(pluralize!(0, "person", "people"), "people");
/// ```
#[macro_export]
macro_rules! pluralize {
    ($amount:expr, $singular:expr, $plural:expr $(,)?) => {
        match $amount {
            1 => ::std::borrow::Cow::<'_, str>::from($singular),
            _ => $plural.into(),
        }
    };
    ($amount:expr, $singular:literal $(,)?) => {
        match $amount {
            1 => $singular,
            _ => concat!($singular, "s"),
        }
    };
}

pub trait QuoteExt {
    fn quote(self) -> String;
}

impl<D: fmt::Display> QuoteExt for D {
    fn quote(self) -> String {
        format!("‘{self}’")
    }
}

/// Render an indented list, showing at most `limit` items.
///
/// Each item starts on a new line indented by `level` times [`INDENT`].
/// Further lines of an item keep their own indentation relative to it.
/// Items beyond the limit are summarized as `and N other(s)`.
pub fn write_indented_list<D: fmt::Display>(
    buffer: &mut String,
    items: impl IntoIterator<Item = D>,
    level: usize,
    limit: Option<usize>,
) {
    use std::fmt::Write;

    let indentation = INDENT.repeat(level);
    let mut items = items.into_iter();
    let mut shown = 0;

    for item in items.by_ref() {
        let item = item.to_string();
        let mut lines = item.split('\n');

        if let Some(line) = lines.next() {
            let _ = write!(buffer, "\n{indentation}{line}");
        }
        for line in lines {
            let _ = write!(buffer, "\n{indentation}{line}");
        }

        shown += 1;
        if limit.is_some_and(|limit| shown == limit) {
            break;
        }
    }

    let remaining = items.count();
    if remaining > 0 {
        let _ = write!(
            buffer,
            "\n{indentation}and {remaining} {}",
            pluralize!(remaining, "other")
        );
    }
}

pub trait ChangesetExt {
    /// Render the changeset line by line with a ledge marking additions and removals.
    fn render_with_ledge(&self, painter: &mut paint::Painter) -> io::Result<()>;
}

impl ChangesetExt for Changeset {
    fn render_with_ledge(&self, painter: &mut paint::Painter) -> io::Result<()> {
        use paint::{AnsiColor, ColorExt};

        for difference in &self.diffs {
            let (ledge, color, lines) = match difference {
                Difference::Same(lines) => (" ", None, lines),
                Difference::Add(lines) => ("+", Some(AnsiColor::Green), lines),
                Difference::Rem(lines) => ("-", Some(AnsiColor::Red), lines),
            };

            for line in lines.split('\n') {
                match color {
                    Some(color) => {
                        painter.set(color.to_bg())?;
                        write!(painter, "{ledge}")?;
                        painter.unset()?;
                        painter.set(color)?;
                        writeln!(painter, " {line}")?;
                        painter.unset()?;
                    }
                    None => writeln!(painter, "{ledge} {line}")?,
                }
            }
        }

        Ok(())
    }
}
