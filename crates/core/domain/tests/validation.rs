use domain::validation::{check_password_change, check_system_create, check_user_create, require_name};
use domain::{MIN_PASSWORD_LEN, ValidationError};

#[test]
fn system_create_collects_every_violation() {
    let errors = check_system_create(" ", "", "abc", "abd").expect_err("invalid");
    assert_eq!(errors.errors().len(), 4);
    assert!(errors.contains(&ValidationError::Required("name")));
    assert!(errors.contains(&ValidationError::Required("owner name")));
    assert!(errors.contains(&ValidationError::PasswordTooShort {
        min: MIN_PASSWORD_LEN
    }));
    assert!(errors.contains(&ValidationError::PasswordMismatch));
}

#[test]
fn user_create_accepts_valid_form() {
    assert!(check_user_create("Yuki", "wine", "wine").is_ok());
}

#[test]
fn password_change_requires_old_password() {
    let errors = check_password_change("", "merlot", "merlot").expect_err("invalid");
    assert_eq!(errors.errors(), &[ValidationError::Required("password")]);
}

#[test]
fn require_name_trims() {
    assert_eq!(require_name("  Tank B ", "name").expect("valid"), "Tank B");
    let errors = require_name("\t", "name").expect_err("empty");
    assert_eq!(errors.to_string(), "name is required");
}
