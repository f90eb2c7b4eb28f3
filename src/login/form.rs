//! Login form rules. Validation is synchronous and runs before any network
//! call; failures are returned per field so a UI can render them inline.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

const EMAIL_MIN_CHARS: usize = 2;
const EMAIL_MAX_CHARS: usize = 50;
const PASSWORD_MIN_CHARS: usize = 8;

/// Local part of `A-Z 0-9 _ ' + - .` ending in a non-dot, dotted domain labels
/// and an alphabetic TLD of two or more letters.
const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$";

/// Raw values as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Input that passed [`validate`].
#[derive(Clone, Debug)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

/// Messages for every rule a field broke, in rule order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Vec<String>,
    pub password: Vec<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.password.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [("email", &self.email), ("password", &self.password)];
        let mut first = true;
        for (name, messages) in fields {
            if messages.is_empty() {
                continue;
            }
            if !first {
                write!(formatter, "; ")?;
            }
            write!(formatter, "{name}: {}", messages.join(", "))?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Checks the form and returns credentials ready for submission.
///
/// # Errors
/// Returns every broken rule, grouped by field.
pub fn validate(form: &LoginForm) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::default();

    let email_chars = utf16_len(&form.email);
    if email_chars < EMAIL_MIN_CHARS {
        errors.email.push(too_short(EMAIL_MIN_CHARS));
    }
    if email_chars > EMAIL_MAX_CHARS {
        errors
            .email
            .push(format!("String must contain at most {EMAIL_MAX_CHARS} character(s)"));
    }
    if !valid_email(&form.email) {
        errors.email.push("Invalid email".to_string());
    }

    if utf16_len(form.password.expose_secret()) < PASSWORD_MIN_CHARS {
        errors.password.push(too_short(PASSWORD_MIN_CHARS));
    }

    if errors.is_empty() {
        Ok(Credentials {
            email: form.email.clone(),
            password: form.password.clone(),
        })
    } else {
        Err(errors)
    }
}

/// Length in UTF-16 code units, the unit browsers count form input in.
fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn too_short(min: usize) -> String {
    format!("String must contain at least {min} character(s)")
}

pub(crate) fn valid_email(email: &str) -> bool {
    if email.starts_with('.') || email.contains("..") {
        return false;
    }
    Regex::new(EMAIL_PATTERN).is_ok_and(|regex| regex.is_match(email))
}
