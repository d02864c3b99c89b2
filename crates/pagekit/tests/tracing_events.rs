#![forbid(unsafe_code)]

//! Module mount/skip and submission traces, captured through a registry
//! layer.

mod common;

use std::sync::{Arc, Mutex};

use common::{fill_valid, ms, page};
use pagekit::prelude::*;
use tracing::field::{Field, Visit};
use tracing::{Event as TraceEvent, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Record {
    message: String,
    module: Option<String>,
    reason: Option<String>,
    text: Option<String>,
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<Record>>>);

impl Capture {
    fn records(&self) -> Vec<Record> {
        self.0.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Visit for Record {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "reason" => self.reason = Some(value.to_owned()),
            "module" => self.module = Some(value.to_owned()),
            "text" => self.text = Some(value.to_owned()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "module" => self.module = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &TraceEvent<'_>, _ctx: Context<'_, S>) {
        let mut record = Record::default();
        event.record(&mut record);
        if let Ok(mut records) = self.0.lock() {
            records.push(record);
        }
    }
}

fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Record>) {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, capture.records())
}

#[test]
fn boot_traces_mounts_and_skips() {
    let (_, records) = capture(|| {
        let mut app = App::with_defaults(Document::new());
        app.boot();
        app.init(ModuleId::Forms);
    });

    let mounted: Vec<_> = records
        .iter()
        .filter(|r| r.message == "module mounted")
        .filter_map(|r| r.module.clone())
        .collect();
    assert_eq!(mounted, vec!["anchors", "scroll-to-top"]);

    let skipped = records
        .iter()
        .filter(|r| r.message == "module skipped")
        .collect::<Vec<_>>();
    assert_eq!(skipped.len(), 7);
    assert!(skipped.iter().all(|r| r.reason.is_some()));

    assert!(
        records
            .iter()
            .any(|r| r.message == "init skipped: already initialized")
    );
}

#[test]
fn submission_lifecycle_is_traced() {
    let (_, records) = capture(|| {
        let fixture = page();
        let mut app = App::with_defaults(fixture.doc.clone());
        app.boot();
        fill_valid(&mut app, &fixture);
        app.dispatch(Event::Submit(fixture.form)).unwrap();
        app.advance(ms(2500)).unwrap();
    });
    let messages: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
    for expected in [
        "form validated",
        "form submitted",
        "timer fired",
        "notification shown",
        "submission complete",
        "redirecting",
    ] {
        assert!(messages.contains(&expected), "missing {expected:?} in {messages:?}");
    }
}

#[test]
fn notification_text_is_kept_apart_from_event_message() {
    let (_, records) = capture(|| {
        let mut app = App::with_defaults(Document::new());
        app.boot();
        app.notify("Saved your settings", Severity::Success);
    });
    let shown = records
        .iter()
        .find(|r| r.text.is_some())
        .expect("notification event recorded");
    assert_eq!(shown.message, "notification shown");
    assert_eq!(shown.text.as_deref(), Some("Saved your settings"));
}
