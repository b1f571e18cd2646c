//! The processor arguments.
//!
//! Options are passed as `-A <key>[=<value>]`, e.g. `-A full-graph-validation=warning`.
//! A bare key means `true` which selects the severity error.

use clap::{
    Arg, ArgAction,
    builder::{PossibleValue, TypedValueParser},
};
use derivation::{Elements, FromStr, Str};
use session::{Options, Policy, Validation};
use std::ffi::{OsStr, OsString};
use utility::{Conjunction, ListingExt, QuoteExt, paint::ColorChoice};

#[cfg(test)]
mod test;

pub struct Arguments {
    pub options: Options,
    pub color: ColorChoice,
}

/// Parse the processor arguments. The first argument is the name of the program.
pub fn parse_options<I, T>(arguments: I) -> Result<Arguments, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(arguments)?;

    let mut options = Options::default();

    if let Some(processor_options) = matches.get_many::<ProcessorOption>(option::PROCESSOR_OPTION) {
        for &option in processor_options {
            option.apply(&mut options);
        }
    }

    let color = matches
        .get_one::<ColorChoice>(option::COLOR)
        .copied()
        .unwrap_or_default();

    Ok(Arguments { options, color })
}

fn command() -> clap::Command {
    clap::Command::new("binding-analysis")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve and validate the binding graphs of a declaration model")
        .args([
            Arg::new(option::PROCESSOR_OPTION)
                .short('A')
                .value_name("KEY[=VALUE]")
                .action(ArgAction::Append)
                .value_parser(ProcessorOptionParser)
                .help("Set a processor option"),
            Arg::new(option::COLOR)
                .long("color")
                .value_name("WHEN")
                .value_parser(ColorChoiceParser)
                .help("Control when to use color"),
        ])
}

/// A processor option together with its value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ProcessorOption {
    FullGraphValidation(Validation),
    NullablePolicy(Policy),
    PrivateMemberPolicy(Policy),
    DuplicateBindingDisplayCap(usize),
}

impl ProcessorOption {
    fn apply(self, options: &mut Options) {
        match self {
            Self::FullGraphValidation(validation) => options.full_graph_validation = validation,
            Self::NullablePolicy(policy) => options.nullable_policy = policy,
            Self::PrivateMemberPolicy(policy) => options.private_member_policy = policy,
            Self::DuplicateBindingDisplayCap(cap) => options.duplicate_binding_display_cap = cap,
        }
    }
}

#[derive(Clone, Copy, FromStr, Str, Elements)]
#[format(dash_case)]
enum OptionKey {
    FullGraphValidation,
    NullablePolicy,
    PrivateMemberPolicy,
    DuplicateBindingDisplayCap,
}

impl OptionKey {
    fn parse_value(self, value: Option<&str>) -> Option<ProcessorOption> {
        Some(match self {
            Self::FullGraphValidation => ProcessorOption::FullGraphValidation(match value {
                None | Some("true") => Validation::Error,
                Some("false") => Validation::None,
                Some(value) => value.parse().ok()?,
            }),
            Self::NullablePolicy => ProcessorOption::NullablePolicy(parse_policy(value)?),
            Self::PrivateMemberPolicy => ProcessorOption::PrivateMemberPolicy(parse_policy(value)?),
            Self::DuplicateBindingDisplayCap => {
                ProcessorOption::DuplicateBindingDisplayCap(value?.parse().ok()?)
            }
        })
    }

    fn values(self) -> &'static [&'static str] {
        match self {
            Self::FullGraphValidation => &["true", "false", "none", "error", "warning"],
            Self::NullablePolicy | Self::PrivateMemberPolicy => &["true", "error", "warning"],
            Self::DuplicateBindingDisplayCap => &["<COUNT>"],
        }
    }

    fn syntax(self) -> &'static str {
        match self {
            Self::FullGraphValidation => "full-graph-validation[=none|error|warning]",
            Self::NullablePolicy => "nullable-policy[=error|warning]",
            Self::PrivateMemberPolicy => "private-member-policy[=error|warning]",
            Self::DuplicateBindingDisplayCap => "duplicate-binding-display-cap=<COUNT>",
        }
    }
}

fn parse_policy(value: Option<&str>) -> Option<Policy> {
    match value {
        None | Some("true") => Some(Policy::Error),
        Some(value) => value.parse().ok(),
    }
}

#[derive(Clone)]
struct ProcessorOptionParser;

impl TypedValueParser for ProcessorOptionParser {
    type Value = ProcessorOption;

    fn parse_ref(
        &self,
        _: &clap::Command,
        _: Option<&Arg>,
        source: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let source = parse_utf8(source)?;
        let (key, value) = match source.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (source, None),
        };

        let key: OptionKey = key.parse().map_err(|()| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("{} is not a processor option\n", key.quote()),
            )
        })?;

        key.parse_value(value).ok_or_else(|| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!(
                    "{} is not a valid value for {}, expected {}\n",
                    value.unwrap_or_default().quote(),
                    key.name().quote(),
                    key.values().iter().map(QuoteExt::quote).list(Conjunction::Or),
                ),
            )
        })
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue>>> {
        Some(Box::new(
            OptionKey::elements().map(|key| PossibleValue::new(key.syntax())),
        ))
    }
}

#[derive(Clone)]
struct ColorChoiceParser;

impl TypedValueParser for ColorChoiceParser {
    type Value = ColorChoice;

    fn parse_ref(
        &self,
        _: &clap::Command,
        _: Option<&Arg>,
        source: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let source = parse_utf8(source)?;

        source.parse().map_err(|()| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("{} is not a valid color choice\n", source.quote()),
            )
        })
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue>>> {
        Some(Box::new(
            ColorChoice::elements().map(|mode| PossibleValue::new(mode.name())),
        ))
    }
}

fn parse_utf8(source: &OsStr) -> Result<&str, clap::Error> {
    source.to_str().ok_or_else(|| {
        clap::Error::raw(
            clap::error::ErrorKind::InvalidUtf8,
            format!("{} is not valid UTF-8\n", source.to_string_lossy().quote()),
        )
    })
}

mod option {
    pub(super) const PROCESSOR_OPTION: &str = "processor-option";
    pub(super) const COLOR: &str = "color";
}
