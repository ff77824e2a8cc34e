//! Client-side validation for the person form and CLI arguments.

use std::fmt;
use std::sync::OnceLock;

use persona_api::types::PersonaID;
use regex::Regex;

use crate::error::DirectoryError;
use crate::model::{Person, PersonDraft};

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_AGE_DIGITS: usize = 3;
pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 150;
pub const MAX_PAGE_SIZE: usize = 100;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_EMAIL_LOCAL_LENGTH: usize = 64;

/// Same grammar browsers apply to `type="email"` inputs, minus the length
/// lookaheads which are checked separately.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// Raw, unvalidated values as typed into the person form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonForm {
    pub name: String,
    pub age: String,
    pub email: String,
}

impl PersonForm {
    pub fn new(name: impl Into<String>, age: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            email: email.into(),
        }
    }

    /// Pre-fills the form from an existing record (edit mode).
    pub fn from_person(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            age: person.age.to_string(),
            email: person.email.clone(),
        }
    }
}

/// Form fields, used to group errors for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Age,
    Email,
}

/// A single validation failure on one form field.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("name is required")]
    NameRequired,
    #[error("name must be at most 50 characters")]
    NameTooLong,
    #[error("age is required")]
    AgeRequired,
    #[error("age must contain digits only")]
    AgeNotNumeric,
    #[error("age must be at most 3 digits")]
    AgeTooLong,
    #[error("age must be between 0 and 150")]
    AgeOutOfRange,
    #[error("email is required")]
    EmailRequired,
    #[error("email is not a valid address")]
    EmailInvalid,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            Self::NameRequired | Self::NameTooLong => Field::Name,
            Self::AgeRequired | Self::AgeNotNumeric | Self::AgeTooLong | Self::AgeOutOfRange => {
                Field::Age
            }
            Self::EmailRequired | Self::EmailInvalid => Field::Email,
        }
    }
}

/// Every failure found on one form submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, error: FieldError) -> bool {
        self.errors.contains(&error)
    }

    /// Errors attached to one field.
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.field() == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates the form and converts it into a draft ready to send.
///
/// Name and email are trimmed. Age must be 1-3 ASCII digits in `[0, 150]`.
pub fn validate_person_form(form: &PersonForm) -> Result<PersonDraft, ValidationErrors> {
    let mut errors = Vec::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.push(FieldError::NameRequired);
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(FieldError::NameTooLong);
    }

    let age = validate_age(form.age.trim(), &mut errors);

    let email = form.email.trim();
    if email.is_empty() {
        errors.push(FieldError::EmailRequired);
    } else if !is_valid_email(email) {
        errors.push(FieldError::EmailInvalid);
    }

    match age {
        Some(age) if errors.is_empty() => Ok(PersonDraft {
            name: name.to_string(),
            age,
            email: email.to_string(),
        }),
        _ => Err(ValidationErrors { errors }),
    }
}

fn validate_age(input: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
    if input.is_empty() {
        errors.push(FieldError::AgeRequired);
        return None;
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        errors.push(FieldError::AgeNotNumeric);
        return None;
    }
    let too_long = input.len() > MAX_AGE_DIGITS;
    if too_long {
        errors.push(FieldError::AgeTooLong);
    }
    // Digit strings too long for i64 are out of range as well.
    match input.parse::<i64>() {
        Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) && !too_long => Some(age),
        Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => None,
        _ => {
            errors.push(FieldError::AgeOutOfRange);
            None
        }
    }
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| {
            Regex::new(EMAIL_PATTERN)
                .map_err(|e| tracing::error!("Failed to compile email pattern: {}", e))
                .ok()
        })
        .as_ref()
}

/// Checks email syntax, including the overall and local-part length limits.
pub fn is_valid_email(input: &str) -> bool {
    if input.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    let Some((local, _)) = input.split_once('@') else {
        return false;
    };
    if local.len() > MAX_EMAIL_LOCAL_LENGTH {
        return false;
    }
    email_regex().is_some_and(|re| re.is_match(input))
}

/// Validate a record id typed by the user: a positive integer.
pub fn validate_id(input: &str) -> Result<PersonaID, DirectoryError> {
    match input.trim().parse::<PersonaID>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(DirectoryError::InvalidInput(format!(
            "'{}' is not a valid person id (expected a positive integer)",
            input.trim()
        ))),
    }
}

/// Validate a page size: between 1 and [`MAX_PAGE_SIZE`].
pub fn validate_page_size(size: usize) -> Result<usize, DirectoryError> {
    if (1..=MAX_PAGE_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(DirectoryError::InvalidInput(format!(
            "page size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, size
        )))
    }
}

/// Validate a 1-based page number typed by the user and return the 0-based index.
pub fn validate_page_number(page: usize) -> Result<usize, DirectoryError> {
    if page == 0 {
        return Err(DirectoryError::InvalidInput(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(page - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, age: &str, email: &str) -> PersonForm {
        PersonForm::new(name, age, email)
    }

    // -- Person form --

    #[test]
    fn valid_form_produces_trimmed_draft() {
        let draft = validate_person_form(&form("  Ana Torres ", " 34", "ana@example.com "))
            .unwrap();
        assert_eq!(draft.name, "Ana Torres");
        assert_eq!(draft.age, 34);
        assert_eq!(draft.email, "ana@example.com");
    }

    #[test]
    fn age_bounds_are_inclusive() {
        assert_eq!(validate_person_form(&form("A", "0", "a@b.co")).unwrap().age, 0);
        assert_eq!(validate_person_form(&form("A", "150", "a@b.co")).unwrap().age, 150);
    }

    #[test]
    fn age_200_is_out_of_range() {
        let errors = validate_person_form(&form("Ana", "200", "ana@example.com")).unwrap_err();
        assert_eq!(errors.errors(), &[FieldError::AgeOutOfRange]);
    }

    #[test]
    fn age_four_digits_reports_length_and_range() {
        let errors = validate_person_form(&form("Ana", "1000", "ana@example.com")).unwrap_err();
        assert!(errors.contains(FieldError::AgeTooLong));
        assert!(errors.contains(FieldError::AgeOutOfRange));
    }

    #[test]
    fn age_with_leading_zeros_too_long() {
        let errors = validate_person_form(&form("Ana", "0042", "ana@example.com")).unwrap_err();
        assert_eq!(errors.errors(), &[FieldError::AgeTooLong]);
    }

    #[test]
    fn age_rejects_non_digits() {
        for age in ["-1", "4.5", "abc", "1e2", "３"] {
            let errors = validate_person_form(&form("Ana", age, "ana@example.com")).unwrap_err();
            assert_eq!(errors.errors(), &[FieldError::AgeNotNumeric], "age {:?}", age);
        }
    }

    #[test]
    fn huge_digit_string_is_out_of_range() {
        let errors =
            validate_person_form(&form("Ana", "99999999999999999999999", "a@b.co")).unwrap_err();
        assert!(errors.contains(FieldError::AgeOutOfRange));
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = validate_person_form(&PersonForm::default()).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[
                FieldError::NameRequired,
                FieldError::AgeRequired,
                FieldError::EmailRequired
            ]
        );
    }

    #[test]
    fn whitespace_name_is_required_error() {
        let errors = validate_person_form(&form("   ", "30", "a@b.co")).unwrap_err();
        assert_eq!(errors.errors(), &[FieldError::NameRequired]);
    }

    #[test]
    fn name_length_counts_characters() {
        let fifty = "ñ".repeat(50);
        assert!(validate_person_form(&form(&fifty, "30", "a@b.co")).is_ok());
        let fifty_one = "ñ".repeat(51);
        let errors = validate_person_form(&form(&fifty_one, "30", "a@b.co")).unwrap_err();
        assert_eq!(errors.errors(), &[FieldError::NameTooLong]);
    }

    #[test]
    fn errors_grouped_by_field() {
        let errors = validate_person_form(&form("", "x", "nope")).unwrap_err();
        assert_eq!(errors.for_field(Field::Name).count(), 1);
        assert_eq!(errors.for_field(Field::Age).count(), 1);
        assert_eq!(errors.for_field(Field::Email).count(), 1);
        assert_eq!(
            errors.to_string(),
            "name is required; age must contain digits only; email is not a valid address"
        );
    }

    // -- Email --

    #[test]
    fn email_accepts_common_addresses() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(is_valid_email("user@localhost"));
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@"));
        assert!(!is_valid_email("ana@-example.com"));
        assert!(!is_valid_email("ana..torres@example.com"));
        assert!(!is_valid_email("ana torres@example.com"));
    }

    #[test]
    fn email_length_limits() {
        let local = "a".repeat(65);
        assert!(!is_valid_email(&format!("{}@example.com", local)));
        let domain = format!("{}.com", ["abcdefghij"; 25].join("."));
        assert!(!is_valid_email(&format!("a@{}", domain)));
    }

    // -- Arguments --

    #[test]
    fn id_valid() {
        assert_eq!(validate_id(" 7 ").unwrap(), 7);
    }

    #[test]
    fn id_rejects_zero_negative_and_text() {
        assert!(validate_id("0").is_err());
        assert!(validate_id("-3").is_err());
        assert!(validate_id("seven").is_err());
    }

    #[test]
    fn page_size_bounds() {
        assert!(validate_page_size(0).is_err());
        assert_eq!(validate_page_size(1).unwrap(), 1);
        assert_eq!(validate_page_size(100).unwrap(), 100);
        assert!(validate_page_size(101).is_err());
    }

    #[test]
    fn page_number_to_index() {
        assert!(validate_page_number(0).is_err());
        assert_eq!(validate_page_number(1).unwrap(), 0);
        assert_eq!(validate_page_number(4).unwrap(), 3);
    }
}
