#![forbid(unsafe_code)]

//! Contact-form field rules and the per-field validation state machine.
//!
//! The rules are pure functions over trimmed input ([`Rules::check`]); the
//! DOM-facing half ([`validate_form`]) locates each recognised field inside a
//! form, evaluates the ones marked `required` in [`Field::ORDER`], toggles the
//! `is-invalid` marker, and drives each field's [`FieldState`]:
//!
//! ```text
//! Untouched --> Validating --> Valid
//!                          \-> Invalid(reason)
//! (form reset) ---------------> Untouched
//! ```
//!
//! # Invariants
//!
//! 1. Fields are evaluated in a fixed order, so aggregated messages are
//!    stable for a given input.
//! 2. A field absent from the form, or present without `required`, is never
//!    evaluated and keeps its state.
//! 3. Validation never fails with an `Err`; invalid input is a
//!    [`ValidationReport`] with errors.

use std::fmt;
use std::sync::LazyLock;

use pagekit_core::{Document, NodeId};
use pagekit_runtime::SiteConfig;
use regex::Regex;

/// Marker class for a field that failed validation.
pub const INVALID_CLASS: &str = "is-invalid";

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z\x{00C0}-\x{017F}\s'\-]{2,50}$").expect("name pattern compiles")
});

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\s\-()]{8,20}$").expect("phone pattern compiles"));

/// 2-50 letters (Latin, Latin-1, Latin Extended-A), spaces, hyphens and
/// apostrophes.
#[must_use]
pub fn is_valid_name(value: &str) -> bool {
    NAME_RE.is_match(value)
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// 8-20 characters of digits, `+`, spaces, `-` and parentheses.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Parse the leading decimal integer of `value`, ignoring anything after it.
///
/// Leading whitespace and a single sign are accepted. Returns `None` when no
/// digit follows. Values too large for `i64` saturate.
#[must_use]
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let rest = value.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Recognised contact-form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    CarModel,
    CarYear,
    InsuranceType,
    Message,
    PrivacyConsent,
}

impl Field {
    /// Evaluation order.
    pub const ORDER: [Self; 9] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::CarModel,
        Self::CarYear,
        Self::InsuranceType,
        Self::Message,
        Self::PrivacyConsent,
    ];

    /// Element ids under which the field may appear.
    #[must_use]
    pub const fn element_ids(self) -> &'static [&'static str] {
        match self {
            Self::FirstName => &["firstName", "contact-first-name"],
            Self::LastName => &["lastName", "contact-last-name"],
            Self::Email => &["email", "contact-email"],
            Self::Phone => &["phone", "contact-phone"],
            Self::CarModel => &["carModel"],
            Self::CarYear => &["carYear"],
            Self::InsuranceType => &["insuranceType", "contact-insurance-type"],
            Self::Message => &["message", "contact-message"],
            Self::PrivacyConsent => &["privacyConsent", "contact-privacy"],
        }
    }

    /// Human-readable field name used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::CarModel => "Car model",
            Self::CarYear => "Year",
            Self::InsuranceType => "Insurance type",
            Self::Message => "Message",
            Self::PrivacyConsent => "Privacy consent",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Required,
    InvalidName,
    InvalidEmail,
    InvalidPhone,
    YearOutOfRange { min: i64, max: i64 },
    TooShort { min: usize },
    NotAccepted,
}

/// Coarse classification of a field outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Empty,
    Malformed,
}

impl Reason {
    #[must_use]
    pub const fn verdict(self) -> Verdict {
        match self {
            Self::Required | Self::NotAccepted => Verdict::Empty,
            _ => Verdict::Malformed,
        }
    }
}

/// A failed field with its user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub reason: Reason,
}

impl FieldError {
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.field.label();
        match self.reason {
            Reason::Required => write!(f, "{label} is required"),
            Reason::InvalidName => write!(f, "{label} is not valid (2-50 letters)"),
            Reason::InvalidEmail => f.write_str("Email format is not valid"),
            Reason::InvalidPhone => f.write_str("Phone number is not valid (8-20 digits)"),
            Reason::YearOutOfRange { min, max } => {
                write!(f, "Year must be between {min} and {max}")
            }
            Reason::TooShort { min } => write!(f, "{label} must be at least {min} characters"),
            Reason::NotAccepted => f.write_str("You must accept the privacy policy"),
        }
    }
}

/// Raw input of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput<'a> {
    Text(&'a str),
    Checkbox(bool),
}

/// Inclusive year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min: i64,
    pub max: i64,
}

impl YearBounds {
    /// Bounds from `min`/`max` attribute text, each falling back to
    /// `fallback` when missing or not numeric.
    #[must_use]
    pub fn from_attrs(min: Option<&str>, max: Option<&str>, fallback: Self) -> Self {
        Self {
            min: min.and_then(parse_leading_int).unwrap_or(fallback.min),
            max: max.and_then(parse_leading_int).unwrap_or(fallback.max),
        }
    }

    #[must_use]
    pub const fn contains(self, year: i64) -> bool {
        self.min <= year && year <= self.max
    }
}

/// Site-level rule parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub years: YearBounds,
    pub insurance_placeholder: String,
    pub message_min_chars: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

impl Rules {
    #[must_use]
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            years: YearBounds {
                min: config.year_min,
                max: config.year_max,
            },
            insurance_placeholder: config.insurance_placeholder.clone(),
            message_min_chars: 10,
        }
    }

    /// Evaluate one field. `years` overrides the site-level year range.
    ///
    /// # Errors
    ///
    /// The [`Reason`] the input is rejected for.
    pub fn check(
        &self,
        field: Field,
        input: FieldInput<'_>,
        years: Option<YearBounds>,
    ) -> Result<(), Reason> {
        let text = match input {
            FieldInput::Checkbox(checked) => {
                return if field == Field::PrivacyConsent && !checked {
                    Err(Reason::NotAccepted)
                } else if checked {
                    Ok(())
                } else {
                    Err(Reason::Required)
                };
            }
            FieldInput::Text(raw) => raw.trim(),
        };
        if field == Field::PrivacyConsent {
            return Err(Reason::NotAccepted);
        }
        if text.is_empty() {
            return Err(Reason::Required);
        }
        match field {
            Field::FirstName | Field::LastName if !is_valid_name(text) => Err(Reason::InvalidName),
            Field::Email if !is_valid_email(text) => Err(Reason::InvalidEmail),
            Field::Phone if !is_valid_phone(text) => Err(Reason::InvalidPhone),
            Field::CarYear => {
                let years = years.unwrap_or(self.years);
                match parse_leading_int(text) {
                    None => Err(Reason::Required),
                    Some(year) if !years.contains(year) => Err(Reason::YearOutOfRange {
                        min: years.min,
                        max: years.max,
                    }),
                    Some(_) => Ok(()),
                }
            }
            Field::InsuranceType if text == self.insurance_placeholder => Err(Reason::Required),
            Field::Message if text.chars().count() < self.message_min_chars => {
                Err(Reason::TooShort {
                    min: self.message_min_chars,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Per-field validation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Untouched,
    Validating,
    Valid,
    Invalid(Reason),
}

/// Field states of one form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormState {
    fields: [FieldState; 9],
}

impl FormState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: [FieldState::Untouched; 9],
        }
    }

    #[must_use]
    pub const fn get(&self, field: Field) -> FieldState {
        self.fields[field.index()]
    }

    pub fn begin(&mut self, field: Field) {
        self.fields[field.index()] = FieldState::Validating;
    }

    /// Settle a field that is being validated. Ignored in any other state.
    pub fn settle(&mut self, field: Field, result: Result<(), Reason>) {
        let slot = &mut self.fields[field.index()];
        if *slot != FieldState::Validating {
            return;
        }
        *slot = match result {
            Ok(()) => FieldState::Valid,
            Err(reason) => FieldState::Invalid(reason),
        };
    }

    pub fn reset(&mut self) {
        self.fields = [FieldState::Untouched; 9];
    }
}

/// Outcome of one evaluated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOutcome {
    pub field: Field,
    pub node: NodeId,
    pub result: Result<(), Reason>,
}

impl FieldOutcome {
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        match self.result {
            Ok(()) => Verdict::Valid,
            Err(reason) => reason.verdict(),
        }
    }
}

/// Result of validating a whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub outcomes: Vec<FieldOutcome>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    #[must_use]
    pub fn errors(&self) -> Vec<FieldError> {
        self.outcomes
            .iter()
            .filter_map(|o| {
                o.result.err().map(|reason| FieldError {
                    field: o.field,
                    reason,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors().iter().map(FieldError::message).collect()
    }

    /// Aggregated notification text, or `None` when the form is valid.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let messages = self.messages();
        (!messages.is_empty()).then(|| format!("Error: {}", messages.join(", ")))
    }
}

/// First element inside `form` carrying one of the field's ids.
#[must_use]
pub fn locate(doc: &Document, form: NodeId, field: Field) -> Option<NodeId> {
    let ids = field.element_ids();
    doc.find(form, |el| el.id().is_some_and(|id| ids.contains(&id)))
}

/// Validate every required field of `form`, updating markers and `state`.
pub fn validate_form(
    doc: &mut Document,
    form: NodeId,
    rules: &Rules,
    state: &mut FormState,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    for field in Field::ORDER {
        let Some(node) = locate(doc, form, field) else {
            continue;
        };
        let Some(el) = doc.element(node) else {
            continue;
        };
        if !el.is_required() {
            continue;
        }
        state.begin(field);
        let input = if el.is_checkbox() {
            FieldInput::Checkbox(el.checked())
        } else {
            FieldInput::Text(el.value())
        };
        let years = (field == Field::CarYear)
            .then(|| YearBounds::from_attrs(el.attr("min"), el.attr("max"), rules.years));
        let result = rules.check(field, input, years);
        state.settle(field, result);

        if result.is_ok() {
            doc.remove_class(node, INVALID_CLASS);
        } else {
            doc.add_class(node, INVALID_CLASS);
        }
        report.outcomes.push(FieldOutcome {
            field,
            node,
            result,
        });
    }
    tracing::debug!(
        %form,
        checked = report.outcomes.len(),
        valid = report.is_valid(),
        "form validated"
    );
    report
}
