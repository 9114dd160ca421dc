// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local form validation run before any call to the auth provider.

use crate::error::AppError;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

const MISSING_CREDENTIALS: &str = "Please enter your email and password";
const MIN_PASSWORD_LEN: usize = 6;

/// Sign-in form.
#[derive(Debug, Clone, Validate)]
pub struct SignInForm {
    #[validate(custom(function = "validate_present"))]
    pub email: String,
    #[validate(custom(function = "validate_present"))]
    pub password: String,
}

/// Account creation form.
#[derive(Debug, Clone, Validate)]
pub struct SignUpForm {
    #[validate(custom(function = "validate_email_field"))]
    pub email: String,
    #[validate(custom(function = "validate_new_password"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(custom(function = "validate_display_name"))]
    pub display_name: String,
}

impl SignInForm {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    /// Validate, reporting the first failing field.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| first_error(&e, &["email", "password"]))
    }
}

impl SignUpForm {
    /// Validate, reporting the first failing field in form order.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|e| {
            first_error(
                &e,
                &["email", "password", "confirm_password", "display_name"],
            )
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_present(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(validation_error("required", MISSING_CREDENTIALS));
    }
    Ok(())
}

fn validate_email_field(value: &str) -> Result<(), ValidationError> {
    validate_present(value)?;
    if !value.validate_email() {
        return Err(validation_error(
            "email",
            "Please enter a valid email address",
        ));
    }
    Ok(())
}

fn validate_new_password(value: &str) -> Result<(), ValidationError> {
    validate_present(value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(validation_error(
            "password_length",
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

fn validate_display_name(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(validation_error("required", "Please enter your name"));
    }
    Ok(())
}

/// Convert validation errors into a single `BadRequest`, taking fields in
/// the given order so the message is deterministic.
fn first_error(errors: &ValidationErrors, order: &[&str]) -> AppError {
    let fields = errors.field_errors();

    let message = order
        .iter()
        .filter_map(|name| {
            fields
                .iter()
                .find(|(field, _)| field.to_string() == *name)
                .and_then(|(_, errs)| errs.first())
        })
        .map(|err| {
            err.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {}", err.code))
        })
        .next()
        .unwrap_or_else(|| "Invalid form".to_string());

    AppError::BadRequest(message)
}
