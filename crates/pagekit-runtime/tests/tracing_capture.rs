#![forbid(unsafe_code)]

//! Trace output of the runtime primitives, captured through a registry layer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagekit_runtime::{Lifecycle, ModuleId, Scheduler};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<String>>>);

impl Capture {
    fn messages(&self) -> Vec<String> {
        self.0.lock().map(|lines| lines.clone()).unwrap_or_default()
    }
}

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        if let Ok(mut lines) = self.0.lock() {
            lines.push(message);
        }
    }
}

#[test]
fn scheduler_traces_schedule_and_cancel() {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, || {
        let mut sched = Scheduler::new();
        let id = sched.schedule(Duration::from_millis(5), ());
        assert!(sched.cancel(id));
    });
    let messages = capture.messages();
    assert!(messages.iter().any(|m| m == "timer scheduled"), "{messages:?}");
    assert!(messages.iter().any(|m| m == "timer cancelled"), "{messages:?}");
}

#[test]
fn repeated_init_is_traced_as_skipped() {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, || {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.begin(ModuleId::Accordion));
        assert!(!lifecycle.begin(ModuleId::Accordion));
    });
    let skipped = capture
        .messages()
        .into_iter()
        .filter(|m| m == "init skipped: already initialized")
        .count();
    assert_eq!(skipped, 1);
}
