#![forbid(unsafe_code)]

//! Notification lifecycle through the coordinator.

mod common;

use common::ms;
use pagekit::prelude::*;
use pretty_assertions::assert_eq;

fn app() -> App {
    let mut app = App::with_defaults(Document::new());
    app.boot();
    app
}

#[test]
fn visible_then_faded_then_detached() {
    let mut app = app();
    let id = app.notify("x", Severity::Info);
    let node = app.notifications().get(id).unwrap().node;
    let container = app.notifications().container().unwrap();
    assert_eq!(app.document().children(container), &[node]);
    assert!(app.document().has_class(node, "show"));
    assert!(app.document().has_class(node, "alert-info"));

    app.advance(ms(5000)).unwrap();
    assert!(!app.document().has_class(node, "show"));
    assert_eq!(app.document().parent(node), Some(container));

    app.advance(ms(150)).unwrap();
    assert_eq!(app.document().parent(node), None);
    assert!(app.notifications().live().is_empty());
    assert_eq!(app.pending_timers(), 0);
}

#[test]
fn close_button_removes_immediately_without_second_removal() {
    let mut app = app();
    let id = app.notify("x", None);
    let node = app.notifications().get(id).unwrap().node;
    let close = app.document().find(node, |el| el.has_class("btn-close")).unwrap();
    assert_eq!(app.document().attr(close, "aria-label"), Some("Close"));

    app.advance(ms(1200)).unwrap();
    app.dispatch(Event::Click(close)).unwrap();
    assert_eq!(app.document().parent(node), None);
    assert_eq!(app.pending_timers(), 0);

    assert_eq!(app.advance(ms(10_000)).unwrap(), 0);
    assert!(!app.dismiss(id));
}

#[test]
fn notifications_stack_in_one_container() {
    let mut app = app();
    app.notify("first", Severity::Success);
    app.notify("second", Severity::parse("bogus"));
    app.notify("third", Severity::Danger);

    let container = app.notifications().container().unwrap();
    let doc = app.document();
    assert_eq!(doc.with_class("position-fixed").len(), 1);
    let texts: Vec<&str> = doc
        .children(container)
        .iter()
        .map(|&n| doc.text(n))
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
    let severities: Vec<Severity> = app
        .notifications()
        .live()
        .iter()
        .map(|n| n.severity)
        .collect();
    assert_eq!(
        severities,
        vec![Severity::Success, Severity::Info, Severity::Danger]
    );
}

#[test]
fn staggered_notifications_expire_independently() {
    let mut app = app();
    let early = app.notify("early", None);
    app.advance(ms(2000)).unwrap();
    let late = app.notify("late", None);

    app.advance(ms(3150)).unwrap();
    assert!(app.notifications().get(early).is_none());
    assert!(app.notifications().get(late).is_some());

    app.advance(ms(2000)).unwrap();
    assert!(app.notifications().live().is_empty());
}
