use super::common::*;
use tagcheck::serialize::to_json;
use tagcheck::{ValidationReport, Validator, ValidatorConfig};

#[test]
fn default_messages_follow_key_format() {
    let report = Validator::new()
        .validate_struct(&LoginRequest::new("", "pass"))
        .unwrap();
    assert_eq!(
        report.to_string(),
        "Key: 'Email' Error:Field validation for 'Email' failed on the 'required' tag\n\
         Key: 'Password' Error:Field validation for 'Password' failed on the 'min' tag"
    );
}

#[test]
fn registered_template_replaces_default() {
    let mut validator = Validator::new();
    validator.register_message("required", "{field} is required");
    validator.register_message("min", "{field} must be at least {param} characters, got '{value}'");

    let report = validator
        .validate_struct(&LoginRequest::new("", "pass"))
        .unwrap();
    let messages: Vec<&str> = report.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Email is required", "Password must be at least 5 characters, got 'pass'"]
    );
}

#[test]
fn templates_are_keyed_by_reported_tag() {
    let mut config = ValidatorConfig::default();
    config
        .aliases
        .insert("varchar".to_string(), "required,max=255".to_string());
    config
        .messages
        .insert("varchar".to_string(), "{path} must be a short text".to_string());
    let validator = Validator::with_config(config).unwrap();

    let report = validator.validate_value(&vec![String::new()], "dive,varchar").unwrap();
    assert_eq!(report.errors[0].message, "[0] must be a short text");
}

#[test]
fn report_serializes_to_json() {
    let report = Validator::new().validate_struct(&sample_user()).unwrap();
    let json = to_json(&report).unwrap();

    assert!(json.contains("\"path\": \"Hobbies[3]\""));
    let back: ValidationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[cfg(feature = "yaml")]
#[test]
fn report_serializes_to_yaml() {
    let report = Validator::new()
        .validate_struct(&LoginRequest::new("", "password"))
        .unwrap();
    let yaml = tagcheck::serialize::to_yaml(&report).unwrap();
    assert!(yaml.contains("Email"));
    assert!(yaml.contains("required"));
}
