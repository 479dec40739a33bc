use tagcheck::{ConfigError, FieldLevel, Validator, fields};

fn must_valid_username(fl: &FieldLevel<'_>) -> bool {
    match fl.value().as_str() {
        Some(value) => value == value.to_uppercase() && value.chars().count() >= 5,
        None => true,
    }
}

fn must_valid_pin(fl: &FieldLevel<'_>) -> bool {
    let Ok(length) = fl.param().parse::<usize>() else {
        return false;
    };
    fl.value()
        .as_str()
        .is_some_and(|s| s.len() == length && s.chars().all(|c| c.is_ascii_digit()))
}

pub struct SignUp {
    pub username: String,
    pub password: String,
}

fields!(SignUp {
    username as "Username": "required,username",
    password as "Password": "required,min=5",
});

pub struct PinLogin {
    pub phone: String,
    pub pin: String,
}

fields!(PinLogin {
    phone as "Phone": "required,number",
    pin as "Pin": "required,pin=6",
});

pub struct Login {
    pub username: String,
    pub password: String,
}

fields!(Login {
    username as "Username": "required,email|numeric",
    password as "Password": "required",
});

#[test]
fn custom_rule_runs_like_builtin() {
    let mut validator = Validator::new();
    validator.register_rule("username", must_valid_username).unwrap();

    let ok = SignUp {
        username: "RIZKY".to_string(),
        password: "passwordbanget".to_string(),
    };
    assert!(validator.validate_struct(&ok).unwrap().is_valid());

    let lower = SignUp {
        username: "rizky".to_string(),
        ..ok
    };
    let report = validator.validate_struct(&lower).unwrap();
    assert_eq!(report.tags(), vec![("Username", "username")]);
}

#[test]
fn custom_rule_reads_its_param() {
    let mut validator = Validator::new();
    validator.register_rule("pin", must_valid_pin).unwrap();

    let ok = PinLogin {
        phone: "082222222222".to_string(),
        pin: "123123".to_string(),
    };
    assert!(validator.validate_struct(&ok).unwrap().is_valid());

    let short = PinLogin {
        pin: "12312".to_string(),
        ..ok
    };
    let report = validator.validate_struct(&short).unwrap();
    assert_eq!(report.tags(), vec![("Pin", "pin")]);
    assert_eq!(report.errors[0].param, "6");
}

#[test]
fn or_group_passes_when_any_branch_passes() {
    let validator = Validator::new();
    for username in ["123456543", "rizky@example.com"] {
        let login = Login {
            username: username.to_string(),
            password: "rizky".to_string(),
        };
        assert!(validator.validate_struct(&login).unwrap().is_valid());
    }
}

#[test]
fn failed_or_group_reports_first_branch() {
    let login = Login {
        username: "not a number".to_string(),
        password: "rizky".to_string(),
    };
    let report = Validator::new().validate_struct(&login).unwrap();
    assert_eq!(report.tags(), vec![("Username", "email")]);
}

#[test]
fn or_group_mixes_custom_and_builtin() {
    let mut validator = Validator::new();
    validator
        .register_rule("hex", |fl: &FieldLevel<'_>| {
            fl.value()
                .as_str()
                .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit()))
        })
        .unwrap();

    assert!(validator.validate_value("ff00", "numeric|hex").unwrap().is_valid());
    assert!(validator.validate_value("1234", "hex|numeric").unwrap().is_valid());
    let report = validator.validate_value("zz", "hex|numeric").unwrap();
    assert_eq!(report.errors[0].tag, "hex");
}

#[test]
fn last_registration_wins() {
    let mut validator = Validator::new();
    validator.register_rule("flag", |_| true).unwrap();
    assert!(validator.validate_value("x", "flag").unwrap().is_valid());
    assert_eq!(validator.cached_plans(), 1);

    validator.register_rule("flag", |_| false).unwrap();
    assert_eq!(validator.cached_plans(), 0);
    assert!(!validator.validate_value("x", "flag").unwrap().is_valid());
}

#[test]
fn builtin_can_be_replaced() {
    let mut validator = Validator::new();
    validator.register_rule("email", |_| true).unwrap();
    assert!(validator.validate_value("rizk", "email").unwrap().is_valid());
}

#[test]
fn invalid_rule_names_are_rejected() {
    let mut validator = Validator::new();
    for name in ["", "bad name", "min=1", "a|b", "dive", "keys", "endkeys", "omitempty"] {
        let err = validator.register_rule(name, |_| true).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidName { .. }),
            "expected InvalidName for {name:?}, got {err}"
        );
    }
}

#[test]
fn custom_rule_sees_field_context() {
    let mut validator = Validator::new();
    validator
        .register_rule("path_is", |fl: &FieldLevel<'_>| {
            fl.path() == fl.param() && fl.tag() == "path_is"
        })
        .unwrap();

    let items = vec![String::from("a")];
    assert!(validator.validate_value(&items, "dive,path_is=[0]").unwrap().is_valid());
}
