#![forbid(unsafe_code)]
#![allow(dead_code)]

//! Shared page fixture for integration tests.
//!
//! Layout (document offsets):
//!
//! ```text
//! header.l-header      top 0     height 80
//! section#hero         top 0     height 630
//! section#services     top 630   height 400
//! section#contact      top 1030  height 800
//! ```

use std::time::Duration;

use pagekit::prelude::*;

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Handles into the fixture page.
#[derive(Debug, Clone)]
pub struct Page {
    pub doc: Document,
    pub nav: NodeId,
    pub toggle: NodeId,
    pub list: NodeId,
    pub links: Vec<NodeId>,
    pub sections: Vec<NodeId>,
    pub outside: NodeId,
    pub logo: NodeId,
    pub photo: NodeId,
    pub hero_img: NodeId,
    pub accordion_button: NodeId,
    pub panel: NodeId,
    pub form: NodeId,
    pub first_name: NodeId,
    pub last_name: NodeId,
    pub email: NodeId,
    pub phone: NodeId,
    pub car_year: NodeId,
    pub insurance: NodeId,
    pub message: NodeId,
    pub consent: NodeId,
    pub submit: NodeId,
    pub privacy_fragment: NodeId,
    pub privacy_page: NodeId,
}

/// Home page with every module anchor present.
pub fn page() -> Page {
    page_at("/")
}

pub fn page_at(path: &str) -> Page {
    let mut doc = Document::at_path(path);
    let body = doc.body();

    let header = doc
        .build("header")
        .class("l-header")
        .layout(0.0, 80.0)
        .append_to(body)
        .unwrap();
    let logo = doc
        .build("img")
        .class("c-logo__img")
        .attr("src", "logo.svg")
        .append_to(header)
        .unwrap();
    let nav = doc
        .build("nav")
        .id("main-nav")
        .class("c-nav")
        .append_to(header)
        .unwrap();
    let toggle = doc
        .build("button")
        .class("c-nav__toggle")
        .attr("aria-expanded", "false")
        .append_to(nav)
        .unwrap();
    let list = doc.build("ul").class("c-nav__list").append_to(nav).unwrap();
    let mut links = Vec::new();
    for href in ["/", "#services", "#contact", "/about.html"] {
        let item = doc.build("li").append_to(list).unwrap();
        links.push(
            doc.build("a")
                .class("c-nav__link")
                .attr("href", href)
                .append_to(item)
                .unwrap(),
        );
    }

    let main = doc.build("main").append_to(body).unwrap();
    let mut sections = Vec::new();
    for (id, top, height) in [
        ("hero", 0.0, 630.0),
        ("services", 630.0, 400.0),
        ("contact", 1030.0, 800.0),
    ] {
        sections.push(
            doc.build("section")
                .id(id)
                .layout(top, height)
                .append_to(main)
                .unwrap(),
        );
    }
    let outside = doc.build("p").text("Body copy").append_to(sections[0]).unwrap();
    let hero_img = doc
        .build("img")
        .attr("src", "hero.jpg")
        .flag("data-critical")
        .append_to(sections[0])
        .unwrap();
    let photo = doc
        .build("img")
        .attr("src", "missing.jpg")
        .append_to(sections[1])
        .unwrap();

    let accordion = doc.build("div").class("accordion").append_to(sections[1]).unwrap();
    let accordion_button = doc
        .build("button")
        .class("accordion-button collapsed")
        .attr("aria-expanded", "false")
        .attr("data-bs-target", "#faq-1")
        .append_to(accordion)
        .unwrap();
    let panel = doc
        .build("div")
        .id("faq-1")
        .class("accordion-collapse collapse")
        .append_to(accordion)
        .unwrap();

    let form = doc
        .build("form")
        .id("contact-form")
        .class("c-form")
        .append_to(sections[2])
        .unwrap();
    let input = |doc: &mut Document, id: &str, name: &str| {
        doc.build("input")
            .id(id)
            .attr("name", name)
            .flag("required")
            .append_to(form)
            .unwrap()
    };
    let first_name = input(&mut doc, "firstName", "firstName");
    let last_name = input(&mut doc, "lastName", "lastName");
    let email = input(&mut doc, "email", "email");
    let phone = input(&mut doc, "phone", "phone");
    let car_year = input(&mut doc, "carYear", "carYear");
    doc.set_attr(car_year, "min", "1980");
    doc.set_attr(car_year, "max", "2025");
    let insurance = doc
        .build("select")
        .id("insuranceType")
        .attr("name", "insuranceType")
        .flag("required")
        .append_to(form)
        .unwrap();
    let message = doc
        .build("textarea")
        .id("message")
        .attr("name", "message")
        .flag("required")
        .append_to(form)
        .unwrap();
    let consent = doc
        .build("input")
        .id("privacyConsent")
        .attr("type", "checkbox")
        .attr("name", "privacyConsent")
        .flag("required")
        .append_to(form)
        .unwrap();
    let submit = doc
        .build("button")
        .attr("type", "submit")
        .text("Send request")
        .append_to(form)
        .unwrap();

    let footer = doc.build("footer").append_to(body).unwrap();
    let privacy_fragment = doc
        .build("a")
        .attr("href", "#privacy")
        .text("Privacy")
        .append_to(footer)
        .unwrap();
    let privacy_page = doc
        .build("a")
        .attr("href", "/privacy.html")
        .text("Privacy policy")
        .append_to(footer)
        .unwrap();

    Page {
        doc,
        nav,
        toggle,
        list,
        links,
        sections,
        outside,
        logo,
        photo,
        hero_img,
        accordion_button,
        panel,
        form,
        first_name,
        last_name,
        email,
        phone,
        car_year,
        insurance,
        message,
        consent,
        submit,
        privacy_fragment,
        privacy_page,
    }
}

/// Booted app over the fixture page, plus the handles.
pub fn booted(page: Page) -> (App, Page) {
    let mut app = App::with_defaults(page.doc.clone());
    app.boot();
    (app, page)
}

/// Fill every required field with valid input.
pub fn fill_valid(app: &mut App, page: &Page) {
    let doc = app.document_mut();
    doc.set_value(page.first_name, "Jānis");
    doc.set_value(page.last_name, "Bērziņš");
    doc.set_value(page.email, "j@x.lv");
    doc.set_value(page.phone, "+371 20000000");
    doc.set_value(page.car_year, "2018");
    doc.set_value(page.insurance, "casco");
    doc.set_value(page.message, "Please call me back tomorrow.");
    doc.set_checked(page.consent, true);
}

/// Messages of the live notifications, oldest first.
pub fn notification_texts(app: &App) -> Vec<String> {
    app.notifications()
        .live()
        .iter()
        .map(|n| n.message.clone())
        .collect()
}
