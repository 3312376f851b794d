//! Contact-form field rules. All functions here are pure and total.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use gpui::SharedString;
use regex::Regex;

use super::contact::ContactFormFields;
use super::controller::FieldKey;
use super::validation::ValidationError;

/// Minimum lengths are counted in UTF-16 code units after trimming, the unit
/// browsers report for an input's value.
pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

/// Whitespace as browsers trim it: Unicode `White_Space` plus U+FEFF, minus
/// U+0085.
const BROWSER_SPACE: &str = concat!(
    r"\t\n\x0B\x0C\r\x20\x{A0}\x{1680}\x{2000}-\x{200A}",
    r"\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}",
);

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!("[^@{BROWSER_SPACE}]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern is a valid regex")
});

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 3] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Message,
    ];

    pub const fn key(self) -> FieldKey {
        match self {
            ContactField::Name => ContactFormFields::NAME,
            ContactField::Email => ContactFormFields::EMAIL,
            ContactField::Message => ContactFormFields::MESSAGE,
        }
    }

    pub fn from_key(key: FieldKey) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl Display for ContactField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key().as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContactError {
    NameTooShort,
    InvalidEmail,
    MessageTooShort,
}

impl ContactError {
    pub const fn as_str(self) -> &'static str {
        match self {
            ContactError::NameTooShort => "Name must be at least 2 characters long",
            ContactError::InvalidEmail => "Please enter a valid email address",
            ContactError::MessageTooShort => "Message must be at least 10 characters long",
        }
    }
}

impl Display for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for ContactError {}

impl ValidationError for ContactError {
    fn message(&self) -> SharedString {
        self.as_str().into()
    }
}

/// A failing field as reported by a submit attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldValidationError {
    pub field: ContactField,
    pub reason: ContactError,
}

impl Display for FieldValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for FieldValidationError {}

pub fn validate(field: ContactField, text: &str) -> Option<ContactError> {
    match field {
        ContactField::Name => validate_name(text),
        ContactField::Email => validate_email(text),
        ContactField::Message => validate_message(text),
    }
}

pub fn validate_name(text: &str) -> Option<ContactError> {
    (trimmed_len(text) < NAME_MIN_CHARS).then_some(ContactError::NameTooShort)
}

/// Accepts a `local@domain.tld` shape. The input is not trimmed, so
/// surrounding whitespace fails.
pub fn validate_email(text: &str) -> Option<ContactError> {
    (!EMAIL_SHAPE.is_match(text)).then_some(ContactError::InvalidEmail)
}

pub fn validate_message(text: &str) -> Option<ContactError> {
    (trimmed_len(text) < MESSAGE_MIN_CHARS).then_some(ContactError::MessageTooShort)
}

fn is_browser_space(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

fn trimmed_len(text: &str) -> usize {
    text.trim_matches(is_browser_space).encode_utf16().count()
}
