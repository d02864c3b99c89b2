//! Fuzz harness for contact-form validation.
//!
//! Builds a form from arbitrary field values and runs the full validator.
//! Checks that it never panics, that every evaluated field gets exactly the
//! marker its outcome implies, and that the summary is present iff some
//! field failed.

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pagekit_core::Document;
use pagekit_widgets::validation::{
    Field, FieldInput, FormState, INVALID_CLASS, Rules, parse_leading_int, validate_form,
};

#[derive(Debug, Arbitrary)]
struct Input {
    values: Vec<(u8, String, bool)>,
    year_min: Option<String>,
    year_max: Option<String>,
    consent: bool,
}

fuzz_target!(|input: Input| {
    let rules = Rules::default();
    let mut doc = Document::new();
    let body = doc.body();
    let Ok(form) = doc.build("form").class("c-form").append_to(body) else {
        return;
    };

    for (index, value, required) in input.values.iter().take(16) {
        let field = Field::ORDER[usize::from(*index) % Field::ORDER.len()];
        let id = field.element_ids()[0];
        let mut builder = doc.build("input").id(id).value(value);
        if field == Field::PrivacyConsent {
            builder = builder.attr("type", "checkbox").checked(input.consent);
        }
        if field == Field::CarYear {
            if let Some(min) = &input.year_min {
                builder = builder.attr("min", min);
            }
            if let Some(max) = &input.year_max {
                builder = builder.attr("max", max);
            }
        }
        if *required {
            builder = builder.flag("required");
        }
        let _ = builder.append_to(form);

        let _ = rules.check(field, FieldInput::Text(value), None);
        let _ = parse_leading_int(value);
    }

    let mut state = FormState::new();
    let report = validate_form(&mut doc, form, &rules, &mut state);
    for outcome in &report.outcomes {
        assert_eq!(
            doc.has_class(outcome.node, INVALID_CLASS),
            outcome.result.is_err()
        );
    }
    assert_eq!(report.summary().is_some(), !report.is_valid());
});
