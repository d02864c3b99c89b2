#![forbid(unsafe_code)]

//! Field state machine driven through the `Forms` behaviour.

use std::time::Duration;

use pagekit_core::{Document, Event, NodeId};
use pagekit_runtime::{Scheduler, SiteConfig};
use pagekit_widgets::validation::{Field, FieldState, Reason};
use pagekit_widgets::{Behavior, Cx, Effect, Forms, Mount, NotificationSurface, Phase, Task};

struct Rig {
    doc: Document,
    config: SiteConfig,
    scheduler: Scheduler<Task>,
    surface: NotificationSurface,
    effects: Vec<Effect>,
    forms: Forms,
}

impl Rig {
    fn new(doc: Document) -> Self {
        let config = SiteConfig::default();
        let surface = NotificationSurface::from_config(&config);
        Self {
            doc,
            config,
            scheduler: Scheduler::new(),
            surface,
            effects: Vec::new(),
            forms: Forms::new(),
        }
    }

    fn with_cx<R>(&mut self, f: impl FnOnce(&mut Forms, &mut Cx<'_>) -> R) -> R {
        let mut cx = Cx::new(
            &mut self.doc,
            &self.config,
            &mut self.scheduler,
            &mut self.surface,
            &mut self.effects,
        );
        f(&mut self.forms, &mut cx)
    }

    fn submit(&mut self, form: NodeId) {
        self.with_cx(|forms, cx| forms.handle(Phase::Target, &Event::Submit(form), cx));
    }

    fn run_until(&mut self, until: Duration) {
        while let Some((_, task)) = self.scheduler.pop_due(until) {
            if self.surface.run_task(&mut self.doc, &mut self.scheduler, &task) {
                continue;
            }
            let claimed = self.with_cx(|forms, cx| forms.run_task(&task, cx));
            assert!(claimed, "unclaimed task {task:?}");
        }
    }
}

fn contact_form() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let form = doc.build("form").class("c-form").append_to(body).unwrap();
    let email = doc
        .build("input")
        .id("contact-email")
        .attr("name", "email")
        .flag("required")
        .append_to(form)
        .unwrap();
    let message = doc
        .build("textarea")
        .id("contact-message")
        .attr("name", "message")
        .flag("required")
        .append_to(form)
        .unwrap();
    doc.build("button")
        .attr("type", "submit")
        .text("Send")
        .append_to(form)
        .unwrap();
    (doc, form, email, message)
}

#[test]
fn states_settle_then_reset_after_submission() {
    let (doc, form, email, message) = contact_form();
    let mut rig = Rig::new(doc);
    assert_eq!(rig.with_cx(|forms, cx| forms.mount(cx)), Mount::Active);

    let state = *rig.forms.state(form).unwrap();
    assert_eq!(state.get(Field::Email), FieldState::Untouched);

    rig.doc.set_value(email, "nobody");
    rig.doc.set_value(message, "short");
    rig.submit(form);
    let state = *rig.forms.state(form).unwrap();
    assert_eq!(state.get(Field::Email), FieldState::Invalid(Reason::InvalidEmail));
    assert_eq!(
        state.get(Field::Message),
        FieldState::Invalid(Reason::TooShort { min: 10 })
    );
    assert_eq!(state.get(Field::FirstName), FieldState::Untouched);
    assert!(!rig.forms.is_in_flight(form));

    rig.doc.set_value(email, "anna@example.lv");
    rig.doc.set_value(message, "A longer message body.");
    rig.submit(form);
    assert_eq!(
        rig.forms.state(form).unwrap().get(Field::Email),
        FieldState::Valid
    );
    assert!(rig.forms.is_in_flight(form));

    rig.run_until(Duration::from_millis(1000));
    assert!(!rig.forms.is_in_flight(form));
    assert_eq!(
        rig.forms.state(form).unwrap().get(Field::Email),
        FieldState::Untouched
    );

    rig.run_until(Duration::from_millis(2500));
    assert!(rig.effects.contains(&Effect::Navigate {
        href: "thank_you.html".to_string()
    }));
}

#[test]
fn submits_to_unmanaged_forms_pass_through() {
    let (mut doc, _form, _, _) = contact_form();
    let body = doc.body();
    let plain = doc.build("form").append_to(body).unwrap();
    let mut rig = Rig::new(doc);
    rig.with_cx(|forms, cx| forms.mount(cx));

    let flow = rig.with_cx(|forms, cx| {
        forms.handle(Phase::Target, &Event::Submit(plain), cx);
        cx.flow()
    });
    assert!(!flow.default_prevented);
    assert!(rig.effects.is_empty());
}
