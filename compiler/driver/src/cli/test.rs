use super::parse_options;
use session::{Options, Policy, Validation};
use utility::paint::ColorChoice;

fn options(arguments: &[&str]) -> Options {
    let arguments = std::iter::once("binding-analysis").chain(arguments.iter().copied());
    parse_options(arguments).unwrap().options
}

#[test]
fn defaults_without_arguments() {
    let arguments = parse_options(["binding-analysis"]).unwrap();

    assert_eq!(arguments.options, Options::default());
    assert_eq!(arguments.color, ColorChoice::Auto);
}

#[test]
fn bare_key_means_error() {
    let options = options(&["-A", "full-graph-validation", "-A", "nullable-policy"]);

    assert_eq!(options.full_graph_validation, Validation::Error);
    assert_eq!(options.nullable_policy, Policy::Error);
}

#[test]
fn boolean_values() {
    assert_eq!(
        options(&["-A", "full-graph-validation=true"]).full_graph_validation,
        Validation::Error
    );
    assert_eq!(
        options(&["-A", "full-graph-validation=false"]).full_graph_validation,
        Validation::None
    );
}

#[test]
fn later_options_win() {
    let options = options(&[
        "-A",
        "private-member-policy=warning",
        "-A",
        "full-graph-validation=warning",
        "-A",
        "duplicate-binding-display-cap=3",
        "-A",
        "full-graph-validation=error",
    ]);

    assert_eq!(options.private_member_policy, Policy::Warning);
    assert_eq!(options.full_graph_validation, Validation::Error);
    assert_eq!(options.duplicate_binding_display_cap, 3);
}

#[test]
fn color_choice() {
    let arguments = parse_options(["binding-analysis", "--color", "never"]).unwrap();

    assert_eq!(arguments.color, ColorChoice::Never);
}

#[test]
fn reject_unknown_key() {
    assert!(parse_options(["binding-analysis", "-A", "fast-init=true"]).is_err());
}

#[test]
fn reject_invalid_values() {
    assert!(parse_options(["binding-analysis", "-A", "nullable-policy=never"]).is_err());
    assert!(parse_options(["binding-analysis", "-A", "duplicate-binding-display-cap"]).is_err());
    assert!(
        parse_options(["binding-analysis", "-A", "duplicate-binding-display-cap=many"]).is_err()
    );
}
