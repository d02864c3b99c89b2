#![forbid(unsafe_code)]

//! Contact-form submission handling.
//!
//! Every `form.c-form` on the page is intercepted on submit. Invalid input
//! yields one aggregated `danger` notification. Valid input goes through a
//! simulated round trip:
//!
//! 1. the submit button is disabled and shows a spinner with "Sending...",
//! 2. the named controls are collected into [`FormData`] and handed to the
//!    host as [`Effect::FormCollected`],
//! 3. after `submit_latency` the button is restored, a success notification
//!    is shown and the form is reset,
//! 4. after `redirect_delay` the host is asked to navigate to
//!    `confirmation_href`.
//!
//! While steps 1-3 are in flight the form ignores further submits.

use pagekit_core::{Document, Element, Event, NodeId};
use pagekit_runtime::ModuleId;

use crate::behavior::{Behavior, Cx, Effect, Mount, Phase, Task};
use crate::notify::Severity;
use crate::validation::{FormState, INVALID_CLASS, Rules, validate_form};

const FORM_CLASS: &str = "c-form";
const SPINNER_CLASS: &str = "spinner-border spinner-border-sm me-2";

pub const SENDING_LABEL: &str = "Sending...";
pub const SUCCESS_MESSAGE: &str = "Thank you! Your request has been sent.";

/// Value of one collected control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

/// Collected form values, in first-seen order of their names.
///
/// A later control with an already-seen name overwrites the value but keeps
/// the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FieldValue)>,
}

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collect every named `input`, `textarea` and `select` under `form`.
#[must_use]
pub fn collect_form_data(doc: &Document, form: NodeId) -> FormData {
    let mut data = FormData::new();
    for node in doc.find_all(form, Element::is_form_control) {
        let Some(el) = doc.element(node) else {
            continue;
        };
        let Some(name) = el.attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        let value = if el.is_checkbox() {
            FieldValue::Checked(el.checked())
        } else {
            FieldValue::Text(el.value().to_owned())
        };
        data.insert(name, value);
    }
    data
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    button: Option<NodeId>,
    label: String,
    /// Original child markup, detached while busy.
    children: Vec<NodeId>,
    spinner: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormEntry {
    node: NodeId,
    state: FormState,
    in_flight: Option<InFlight>,
}

/// Submission behaviour for `.c-form` forms.
#[derive(Debug, Default)]
pub struct Forms {
    forms: Vec<FormEntry>,
    rules: Rules,
}

impl Forms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Field states of a managed form.
    #[must_use]
    pub fn state(&self, form: NodeId) -> Option<&FormState> {
        self.entry(form).map(|entry| &entry.state)
    }

    /// Whether a simulated submission of `form` is in flight.
    #[must_use]
    pub fn is_in_flight(&self, form: NodeId) -> bool {
        self.entry(form).is_some_and(|entry| entry.in_flight.is_some())
    }

    fn entry(&self, form: NodeId) -> Option<&FormEntry> {
        self.forms.iter().find(|entry| entry.node == form)
    }

    fn entry_mut(&mut self, form: NodeId) -> Option<&mut FormEntry> {
        self.forms.iter_mut().find(|entry| entry.node == form)
    }

    fn submit(&mut self, form: NodeId, cx: &mut Cx<'_>) {
        let rules = &self.rules;
        let Some(entry) = self.forms.iter_mut().find(|entry| entry.node == form) else {
            return;
        };
        if entry.in_flight.is_some() {
            tracing::debug!(%form, "submit ignored: submission in flight");
            return;
        }

        let report = validate_form(cx.doc, form, rules, &mut entry.state);
        if let Some(summary) = report.summary() {
            cx.notify(&summary, Severity::Danger);
            return;
        }

        let in_flight = mark_busy(cx.doc, form);
        entry.in_flight = Some(in_flight);

        let data = collect_form_data(cx.doc, form);
        tracing::info!(%form, fields = data.len(), "form submitted");
        cx.emit(Effect::FormCollected { form, data });
        let latency = cx.config.submit_latency();
        cx.schedule(latency, Task::CompleteSubmission(form));
    }

    fn complete(&mut self, form: NodeId, cx: &mut Cx<'_>) {
        let Some(entry) = self.entry_mut(form) else {
            return;
        };
        if let Some(in_flight) = entry.in_flight.take() {
            restore_button(cx.doc, &in_flight);
        }
        entry.state.reset();

        cx.notify(SUCCESS_MESSAGE, Severity::Success);
        cx.doc.reset_form(form);
        for node in cx.doc.find_all(form, |el| el.has_class(INVALID_CLASS)) {
            cx.doc.remove_class(node, INVALID_CLASS);
        }

        let href = cx.config.confirmation_href.clone();
        let delay = cx.config.redirect_delay();
        tracing::debug!(%form, %href, "submission complete");
        cx.schedule(delay, Task::Redirect(href));
    }
}

fn mark_busy(doc: &mut Document, form: NodeId) -> InFlight {
    let button = doc.find(form, |el| el.attr("type") == Some("submit"));
    let Some(button) = button else {
        return InFlight {
            button: None,
            label: String::new(),
            children: Vec::new(),
            spinner: None,
        };
    };
    let label = doc.text(button).to_owned();
    let children = doc.children(button).to_vec();
    for &child in &children {
        doc.detach(child);
    }
    doc.set_disabled(button, true);
    doc.set_text(button, SENDING_LABEL);
    let spinner = doc
        .build("span")
        .class(SPINNER_CLASS)
        .attr("role", "status")
        .attr("aria-hidden", "true")
        .finish();
    let spinner = match doc.prepend_child(button, spinner) {
        Ok(()) => Some(spinner),
        Err(err) => {
            tracing::debug!(%err, "spinner not inserted");
            None
        }
    };
    InFlight {
        button: Some(button),
        label,
        children,
        spinner,
    }
}

fn restore_button(doc: &mut Document, in_flight: &InFlight) {
    if let Some(spinner) = in_flight.spinner {
        doc.detach(spinner);
    }
    if let Some(button) = in_flight.button {
        doc.set_disabled(button, false);
        doc.set_text(button, &in_flight.label);
        for &child in &in_flight.children {
            if let Err(err) = doc.append_child(button, child) {
                tracing::debug!(%err, %child, "button child not restored");
            }
        }
    }
}

impl Behavior for Forms {
    fn module(&self) -> ModuleId {
        ModuleId::Forms
    }

    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount {
        let forms = cx
            .doc
            .find_all(cx.doc.root(), |el| el.is("form") && el.has_class(FORM_CLASS));
        if forms.is_empty() {
            return Mount::Skipped("no .c-form forms");
        }
        self.rules = Rules::from_config(cx.config);
        self.forms = forms
            .into_iter()
            .map(|node| FormEntry {
                node,
                state: FormState::new(),
                in_flight: None,
            })
            .collect();
        Mount::Active
    }

    fn handle(&mut self, phase: Phase, event: &Event, cx: &mut Cx<'_>) {
        let (Phase::Target, Event::Submit(form)) = (phase, event) else {
            return;
        };
        if self.entry(*form).is_none() {
            return;
        }
        cx.prevent_default();
        cx.stop_propagation();
        self.submit(*form, cx);
    }

    fn run_task(&mut self, task: &Task, cx: &mut Cx<'_>) -> bool {
        match task {
            Task::CompleteSubmission(form) => {
                self.complete(*form, cx);
                true
            }
            Task::Redirect(href) => {
                tracing::info!(%href, "redirecting");
                cx.emit(Effect::Navigate { href: href.clone() });
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn form_data_keeps_first_position_on_overwrite() {
        let mut data = FormData::new();
        data.insert("a", FieldValue::Text("1".into()));
        data.insert("b", FieldValue::Checked(false));
        data.insert("a", FieldValue::Text("2".into()));
        let names: Vec<_> = data.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(data.get("a"), Some(&FieldValue::Text("2".into())));
    }

    #[test]
    fn collect_skips_unnamed_and_reads_checkboxes() {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.build("form").append_to(body).unwrap();
        doc.build("input").attr("name", "email").value("a@b.lv").append_to(form).unwrap();
        doc.build("input").value("ignored").append_to(form).unwrap();
        doc.build("input")
            .attr("type", "checkbox")
            .attr("name", "privacy")
            .checked(true)
            .append_to(form)
            .unwrap();
        doc.build("textarea").attr("name", "message").value("hi").append_to(form).unwrap();
        doc.build("button").attr("name", "go").append_to(form).unwrap();

        let data = collect_form_data(&doc, form);
        assert_eq!(data.len(), 3);
        assert_eq!(data.get("email"), Some(&FieldValue::Text("a@b.lv".into())));
        assert_eq!(data.get("privacy"), Some(&FieldValue::Checked(true)));
        assert_eq!(data.get("go"), None);
    }

    #[test]
    fn busy_button_round_trip() {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.build("form").append_to(body).unwrap();
        let button = doc
            .build("button")
            .attr("type", "submit")
            .text("Send")
            .append_to(form)
            .unwrap();

        let in_flight = mark_busy(&mut doc, form);
        assert!(doc.element(button).unwrap().is_disabled());
        assert_eq!(doc.text(button), SENDING_LABEL);
        let spinner = in_flight.spinner.unwrap();
        assert_eq!(doc.children(button).first(), Some(&spinner));
        assert_eq!(doc.attr(spinner, "role"), Some("status"));

        restore_button(&mut doc, &in_flight);
        assert!(!doc.element(button).unwrap().is_disabled());
        assert_eq!(doc.text(button), "Send");
        assert!(doc.children(button).is_empty());
    }

    #[test]
    fn busy_button_hides_and_restores_child_markup() {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.build("form").append_to(body).unwrap();
        let button = doc
            .build("button")
            .attr("type", "submit")
            .text("Send")
            .append_to(form)
            .unwrap();
        let icon = doc.build("span").class("c-icon").append_to(button).unwrap();
        let hint = doc.build("small").text("now").append_to(button).unwrap();

        let in_flight = mark_busy(&mut doc, form);
        let spinner = in_flight.spinner.unwrap();
        assert_eq!(doc.children(button), &[spinner]);
        assert_eq!(doc.parent(icon), None);

        restore_button(&mut doc, &in_flight);
        assert_eq!(doc.children(button), &[icon, hint]);
        assert_eq!(doc.text(button), "Send");
    }
}
