//! Application state of the area check form.
//!
//! [`AreaCheckApp`] owns the form model and wires the text fields, the scale
//! selector, the URL and the endpoint together. Everything that changes state
//! goes through methods here so the drawing code stays thin.

use crate::config::AppConfig;
use crate::constants::SCALE_PARAM;
use crate::input::{InputController, InputOutcome, TextInput};
use crate::location::Location;
use crate::notify::ErrorDisplayer;
use crate::query_sync::{self, read_initial};
use crate::submission::{ResultRows, SubmissionController, Transport};
use crate::types::{Axis, FormState};
use web_time::Instant;

/// Text and validity of one coordinate field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBuffer {
    /// Text as the user typed it
    pub text: String,
    /// Why the text is invalid, if it is
    pub invalid: Option<String>,
}

impl FieldBuffer {
    /// Creates a valid field showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            invalid: None,
        }
    }
}

impl TextInput for FieldBuffer {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_validity(&mut self, message: Option<String>) {
        self.invalid = message;
    }
}

/// The main application structure.
///
/// This struct implements the `eframe::App` trait and handles all user
/// interface rendering and interaction logic.
pub struct AreaCheckApp {
    /// The current selection
    pub form: FormState,
    /// X coordinate text field
    pub x_input: FieldBuffer,
    /// Y coordinate text field
    pub y_input: FieldBuffer,
    /// Debounced validation of the text fields
    pub input: InputController,
    /// Page URL mirroring the selection
    pub location: Box<dyn Location>,
    /// Endpoint access
    pub submission: SubmissionController,
    /// Rendered check history
    pub results: ResultRows,
    /// Error notifications on screen
    pub errors: ErrorDisplayer,
}

impl AreaCheckApp {
    /// Builds the app from the selection found in `location`'s URL.
    ///
    /// The URL is rewritten right away so it always carries the full,
    /// normalized selection.
    ///
    /// # Arguments
    ///
    /// * `config` - Timing and limits
    /// * `location` - Page URL; its query seeds the form and its origin hosts the endpoint
    /// * `transport` - Carries submissions to the endpoint
    ///
    /// # Returns
    ///
    /// The app, or an error if the page URL cannot serve as a base URL.
    pub fn new(
        config: &AppConfig,
        mut location: Box<dyn Location>,
        transport: Box<dyn Transport>,
    ) -> Result<Self, url::ParseError> {
        let page = location.url();
        let form = FormState::from_query(read_initial(&page));
        let submission = SubmissionController::new(&page, transport)?;
        query_sync::write(location.as_mut(), &form);
        log::info!(
            "form ready at x={} y={} scale={}",
            form.point().x(),
            form.point().y(),
            form.scale()
        );

        Ok(Self {
            x_input: FieldBuffer::new(form.point().x().to_string()),
            y_input: FieldBuffer::new(form.point().y().to_string()),
            form,
            input: InputController::new(config.debounce(), config.max_input_len),
            location,
            submission,
            results: ResultRows::default(),
            errors: ErrorDisplayer::new(config.error_timeout()),
        })
    }

    /// The text field of `axis`.
    pub fn field(&self, axis: Axis) -> &FieldBuffer {
        match axis {
            Axis::X => &self.x_input,
            Axis::Y => &self.y_input,
        }
    }

    /// Replaces the text of `axis`'s field as if the user typed it at `now`.
    pub fn edit_text(&mut self, axis: Axis, text: &str, now: Instant) {
        match axis {
            Axis::X => self.x_input.set_text(text),
            Axis::Y => self.y_input.set_text(text),
        }
        self.input.on_input(axis, now);
    }

    /// Applies a click on the scale checkbox carrying `value`.
    pub fn select_scale(&mut self, value: f64, now: Instant) {
        match self.form.set_scale(value) {
            Ok(()) => {
                log::debug!("{SCALE_PARAM} set to {}", self.form.scale());
                query_sync::write(self.location.as_mut(), &self.form);
            }
            Err(err) => {
                log::warn!("rejected scale {value}: {err}");
                self.errors.push(err.message(), now);
            }
        }
    }

    /// Sends the current selection to the endpoint.
    pub fn submit(&mut self) {
        self.submission.submit(&self.form);
    }

    /// Runs due validations, applies arrived replies and expires old errors.
    ///
    /// # Returns
    ///
    /// When the next timer is due, so the caller can schedule a repaint.
    pub fn tick(&mut self, now: Instant) -> Option<Instant> {
        let outcomes = self.input.poll(
            now,
            &mut self.x_input,
            &mut self.y_input,
            &mut self.form,
            self.location.as_mut(),
        );
        for outcome in outcomes {
            if let InputOutcome::Rejected(_, err) = outcome {
                self.errors.push(err.to_string(), now);
            }
        }

        for outcome in self.submission.poll(&mut self.results) {
            if let Err(err) = outcome {
                self.errors.push(err.user_message(), now);
            }
        }

        self.errors.expire(now);

        match (self.input.next_deadline(), self.errors.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
