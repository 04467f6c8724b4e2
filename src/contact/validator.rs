//! Contact form validation

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Minimum message length, in characters, after trimming
pub const MIN_MESSAGE_CHARS: usize = 10;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Raw form fields as submitted. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Build a form from decoded `key=value` pairs. When a field is repeated
    /// the first value wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = Self::default();
        let (mut name, mut email, mut message) = (false, false, false);

        for (key, value) in pairs {
            let (field, seen) = match key.as_str() {
                "name" => (&mut form.name, &mut name),
                "email" => (&mut form.email, &mut email),
                "message" => (&mut form.message, &mut message),
                _ => continue,
            };
            if !*seen {
                *field = value;
                *seen = true;
            }
        }

        form
    }

    /// Copy of the form with surrounding whitespace removed from every field
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// A submission that passed every rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Check a submission, reporting every violated rule at once
pub fn validate(form: &ContactForm) -> Result<ValidContact, Vec<String>> {
    let form = form.trimmed();
    let mut errors = Vec::new();

    if form.name.is_empty() {
        errors.push("Please enter your name.".to_string());
    }
    if !is_valid_email(&form.email) {
        errors.push("Please enter a valid email address.".to_string());
    }
    if form.message.chars().count() < MIN_MESSAGE_CHARS {
        errors.push(format!(
            "Message must be at least {} characters.",
            MIN_MESSAGE_CHARS
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidContact {
        name: form.name,
        email: form.email,
        message: form.message,
    })
}

/// Loose address check: something@something.something, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
