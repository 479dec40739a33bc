use serde_json::json;
use tagcheck::{ConfigError, Kind, TagError, Validator};

#[test]
fn empty_string_fails_required() {
    let report = Validator::new().validate_value("", "required").unwrap();

    assert_eq!(report.len(), 1);
    let error = &report.errors[0];
    assert_eq!(error.tag, "required");
    assert_eq!(error.actual_tag, "required");
    assert_eq!(error.path, "");
    assert_eq!(error.field, "");
    assert_eq!(
        error.message,
        "Key: '' Error:Field validation for '' failed on the 'required' tag"
    );
}

#[test]
fn numeric_string_passes() {
    let report = Validator::new()
        .validate_value("12345", "required,numeric")
        .unwrap();
    assert!(report.is_valid());
}

#[test]
fn parameterized_rule_reports_its_param() {
    let report = Validator::new()
        .validate_value("222222222222222", "required,numeric,min=5,max=10")
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.errors[0].tag, "max");
    assert_eq!(report.errors[0].param, "10");
    assert_eq!(report.errors[0].value, json!("222222222222222"));
}

#[test]
fn first_failure_stops_the_level() {
    let report = Validator::new()
        .validate_value("", "required,numeric,min=5")
        .unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.errors[0].tag, "required");
}

#[test]
fn pair_mode_compares_with_related_value() {
    let validator = Validator::new();

    let report = validator.validate_pair("rahasia", "salah", "eqfield").unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.errors[0].tag, "eqfield");

    let report = validator.validate_pair("rahasia", "rahasia", "eqfield").unwrap();
    assert!(report.is_valid());
}

#[test]
fn pair_mode_numeric_comparison() {
    let validator = Validator::new();
    assert!(validator.validate_pair(&10, &5, "gtfield").unwrap().is_valid());
    assert!(!validator.validate_pair(&5, &10, "gtfield").unwrap().is_valid());
    assert!(validator.validate_pair(&5, &5.0, "eqfield").unwrap().is_valid());
}

#[test]
fn empty_tag_checks_nothing() {
    let report = Validator::new().validate_value("", "").unwrap();
    assert!(report.is_valid());
}

#[test]
fn skip_tag_checks_nothing() {
    let report = Validator::new().validate_value("", "-").unwrap();
    assert!(report.is_valid());
}

#[test]
fn omitempty_skips_zero_values_only() {
    let validator = Validator::new();
    assert!(validator.validate_value("", "omitempty,email").unwrap().is_valid());

    let report = validator.validate_value("nope", "omitempty,email").unwrap();
    assert_eq!(report.tags(), vec![("", "email")]);
}

#[test]
fn absent_value_fails_everything_but_isdefault() {
    let validator = Validator::new();
    let absent: Option<String> = None;

    assert!(!validator.validate_value(&absent, "required").unwrap().is_valid());
    assert!(!validator.validate_value(&absent, "min=1").unwrap().is_valid());
    assert!(validator.validate_value(&absent, "isdefault").unwrap().is_valid());
}

#[test]
fn present_option_is_validated_as_inner_value() {
    let validator = Validator::new();
    let present = Some("abc".to_string());
    assert!(validator.validate_value(&present, "required,len=3").unwrap().is_valid());
}

#[test]
fn present_zero_counts_as_zero() {
    let validator = Validator::new();
    let present = Some(0i64);

    let report = validator.validate_value(&present, "required").unwrap();
    assert_eq!(report.tags(), vec![("", "required")]);
    assert!(validator.validate_value(&present, "isdefault").unwrap().is_valid());
    assert!(validator.validate_value(&present, "omitempty,min=10").unwrap().is_valid());
    assert!(validator.validate_value(&Some(7i64), "required,min=5").unwrap().is_valid());
}

#[test]
fn or_group_passes_when_later_branch_passes_after_unsupported_one() {
    let validator = Validator::new();
    assert!(validator.validate_value(&5i64, "contains=@|numeric").unwrap().is_valid());
    assert!(validator.validate_value(&5i64, "numeric|contains=@").unwrap().is_valid());
}

#[test]
fn or_group_surfaces_first_setup_error_when_no_branch_passes() {
    let err = Validator::new()
        .validate_value(&5i64, "alpha|contains=@|startswith=x")
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnsupportedKind {
            path: String::new(),
            tag: "contains".to_string(),
            kind: "int".to_string(),
        }
    );
}

#[test]
fn pair_mode_compares_large_integers_exactly() {
    let validator = Validator::new();
    let signed = 9_007_199_254_740_993i64;
    let unsigned = 9_007_199_254_740_992u64;

    let report = validator.validate_pair(&signed, &unsigned, "eqfield").unwrap();
    assert_eq!(report.tags(), vec![("", "eqfield")]);
    assert!(validator.validate_pair(&signed, &unsigned, "nefield").unwrap().is_valid());
    assert!(validator.validate_pair(&signed, &unsigned, "gtfield").unwrap().is_valid());
    assert!(!validator.validate_pair(&unsigned, &signed, "gtefield").unwrap().is_valid());
    assert!(validator.validate_pair(&signed, &(unsigned + 1), "eqfield").unwrap().is_valid());
    assert!(validator.validate_pair(&-1i64, &u64::MAX, "ltfield").unwrap().is_valid());
}

#[test]
fn json_values_are_traversed() {
    let value = json!({ "b": "", "a": "ok", "c": [1, 0] });
    let report = Validator::new()
        .validate_value(&value, "dive,required")
        .unwrap();
    assert_eq!(report.tags(), vec![("[b]", "required")]);
}

#[test]
fn unknown_rule_is_a_config_error() {
    let err = Validator::new().validate_value("x", "required,bogus").unwrap_err();
    assert!(
        matches!(
            &err,
            ConfigError::Tag {
                source: TagError::UnknownRule { name },
                ..
            } if name == "bogus"
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn dive_on_scalar_is_a_config_error() {
    let err = Validator::new().validate_value("abc", "dive,required").unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidDive {
            path: String::new(),
            kind: Kind::Scalar,
        }
    );
}

#[test]
fn same_tag_is_parsed_once() {
    let validator = Validator::new();
    for input in ["a", "bb", ""] {
        validator.validate_value(input, "required,min=2").unwrap();
    }
    assert_eq!(validator.cached_plans(), 1);
}
