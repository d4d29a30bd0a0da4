use super::*;
use crate::config::AppConfig;
use crate::constants::{GENERIC_ERROR_MESSAGE, INVALID_DATA_MESSAGE};
use crate::location::{Location, MemoryLocation};
use crate::query_sync::read_initial;
use crate::submission::{HttpReply, ReplyResult, Transport};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use url::Url;
use web_time::Duration;

/// Location whose URL stays observable after the app takes ownership.
#[derive(Clone)]
struct SharedLocation(Rc<RefCell<MemoryLocation>>);

impl Location for SharedLocation {
    fn url(&self) -> Url {
        self.0.borrow().url()
    }

    fn replace(&mut self, url: &Url) {
        self.0.borrow_mut().replace(url);
    }
}

/// Transport that parks requests until the test answers them.
#[derive(Clone, Default)]
struct ParkedTransport {
    requests: Rc<RefCell<Vec<(Url, Sender<ReplyResult>)>>>,
}

impl ParkedTransport {
    fn answer(&self, status: u16, body: &str) {
        let (_, reply) = self.requests.borrow_mut().remove(0);
        reply
            .send(Ok(HttpReply {
                status,
                body: body.to_string(),
            }))
            .unwrap();
    }
}

impl Transport for ParkedTransport {
    fn get(&self, url: Url, reply: Sender<ReplyResult>) {
        self.requests.borrow_mut().push((url, reply));
    }
}

fn app_at(url: &str) -> (AreaCheckApp, SharedLocation, ParkedTransport) {
    let location = SharedLocation(Rc::new(RefCell::new(MemoryLocation::parse(url).unwrap())));
    let transport = ParkedTransport::default();
    let app = AreaCheckApp::new(
        &AppConfig::default(),
        Box::new(location.clone()),
        Box::new(transport.clone()),
    )
    .unwrap();
    (app, location, transport)
}

/// Run a single headless egui frame with the provided closure.
fn run_ui_with(mut f: impl FnMut(&egui::Context)) -> egui::FullOutput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1024.0, 768.0),
    ));

    let ctx = egui::Context::default();
    ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        f(ctx);
    })
}

const HISTORY: &str = r#"{"user":{"points":[
    {"point":{"x":1,"y":2,"scale":1},"result":true,"calculationTime":0,"calculatedAt":1700000000000},
    {"point":{"x":-3,"y":0.5,"scale":2.5},"result":false,"calculationTime":1,"calculatedAt":1700000005000}
]}}"#;

#[test]
fn startup_reads_url_and_normalizes_it() {
    let (app, location, _) = app_at("http://localhost/?pointX=2.2&pointY=-1.5&scale=2.6&lang=ru");

    assert_eq!(app.form.point().x(), 2.0);
    assert_eq!(app.form.point().y(), -1.5);
    assert_eq!(app.form.scale(), 2.5);
    assert_eq!(app.x_input.text, "2");
    assert_eq!(app.y_input.text, "-1.5");
    assert_eq!(
        location.url().query(),
        Some("pointX=2&pointY=-1.5&scale=2.5&lang=ru")
    );
}

#[test]
fn startup_falls_back_on_bad_url_values() {
    let (app, location, _) = app_at("http://localhost/?pointX=banana&pointY=42");

    assert_eq!(app.form.point().x(), 0.0);
    assert_eq!(app.form.point().y(), 0.0);
    assert_eq!(app.form.scale(), 1.0);
    assert_eq!(location.url().query(), Some("pointX=0&pointY=0&scale=1"));
}

#[test]
fn typed_value_reaches_url_after_debounce() {
    let (mut app, location, _) = app_at("http://localhost/");
    let start = Instant::now();

    app.edit_text(Axis::Y, "4", start);
    app.edit_text(Axis::Y, "4.2", start + Duration::from_millis(100));
    let next = app.tick(start + Duration::from_millis(450));
    assert_eq!(next, Some(start + Duration::from_millis(500)));
    assert_eq!(read_initial(&location.url()).y, Some(0.0));

    app.tick(start + Duration::from_millis(500));
    assert_eq!(app.form.point().y(), 4.2);
    assert_eq!(read_initial(&location.url()).y, Some(4.2));
    assert!(app.errors.is_empty());
}

#[test]
fn rejected_edit_shows_error_and_keeps_state() {
    let (mut app, location, _) = app_at("http://localhost/?pointX=3");
    let start = Instant::now();
    let before = location.url();

    app.edit_text(Axis::X, "10", start);
    app.tick(start + Duration::from_millis(400));

    assert_eq!(app.form.point().x(), 3.0);
    assert_eq!(location.url(), before);
    assert!(app.field(Axis::X).invalid.is_some());
    assert_eq!(
        app.errors.messages().collect::<Vec<_>>(),
        vec!["X should be one of -3 -2 -1 0 1 2 3 4 5"]
    );

    // The notification disappears on its own.
    app.tick(start + Duration::from_millis(4400));
    assert!(app.errors.is_empty());
}

#[test]
fn scale_click_updates_form_and_url() {
    let (mut app, location, _) = app_at("http://localhost/");
    app.select_scale(3.0, Instant::now());

    assert_eq!(app.form.scale(), 3.0);
    assert_eq!(read_initial(&location.url()).scale, Some(3.0));
}

#[test]
fn successful_submit_fills_table_newest_first() {
    let (mut app, _, transport) = app_at("http://localhost:8080/lab/?pointX=1&pointY=2");
    app.submit();

    {
        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].0.as_str(),
            "http://localhost:8080/app?pointX=1&pointY=2&scale=1&isJson="
        );
    }

    transport.answer(200, HISTORY);
    app.tick(Instant::now());

    let xs: Vec<_> = app.results.rows.iter().map(|r| r.x.as_str()).collect();
    assert_eq!(xs, vec!["-3", "1"]);
    assert_eq!(app.results.rows[0].result, "false");
    assert!(app.errors.is_empty());
}

#[test]
fn failed_submits_keep_table_and_show_messages() {
    let (mut app, _, transport) = app_at("http://localhost/");
    app.submit();
    transport.answer(200, HISTORY);
    app.tick(Instant::now());
    let rendered = app.results.clone();

    app.submit();
    app.submit();
    transport.answer(422, "");
    transport.answer(503, "");
    app.tick(Instant::now());

    assert_eq!(app.results, rendered);
    assert_eq!(
        app.errors.messages().collect::<Vec<_>>(),
        vec![INVALID_DATA_MESSAGE, GENERIC_ERROR_MESSAGE]
    );
}

#[test]
fn headless_frame_draws_form_results_and_invalid_field() {
    let (mut app, _, transport) = app_at("http://localhost/");
    app.submit();
    transport.answer(200, HISTORY);
    app.tick(Instant::now());
    app.x_input.invalid = Some("bad".into());

    let now = Instant::now();
    let output = run_ui_with(|ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_form(ui, now);
            app.draw_results(ui);
        });
    });

    assert!(!output.shapes.is_empty());
    // Drawing alone never schedules a validation.
    assert!(!app.input.is_pending(Axis::X));
}

#[test]
fn drawing_leaves_visuals_to_the_host() {
    let (mut app, _, _) = app_at("http://localhost/");
    let ctx = egui::Context::default();
    ctx.set_visuals(egui::Visuals::light());

    let now = Instant::now();
    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| app.draw_form(ui, now));
    });

    assert!(!ctx.style().visuals.dark_mode);
}
