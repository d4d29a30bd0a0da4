//! Debounced handling of the coordinate text inputs.
//!
//! Every edit restarts a quiet-period timer for its input. When the timer
//! fires, the input's current text is validated and, if it is acceptable,
//! written through the [`Point`](crate::types::Point) setter and mirrored into
//! the page URL. A rejected edit marks the input invalid and leaves the form
//! state exactly as it was.

use crate::constants::{DEBOUNCE_MS, MAX_FLOAT_INPUT_LENGTH};
use crate::error::InputError;
use crate::location::Location;
use crate::query_sync::{self, parse_number};
use crate::schedule::{TimerHandle, TimerQueue};
use crate::types::{Axis, FormState};
use std::collections::HashMap;
use web_time::{Duration, Instant};

/// A text widget the controller reads from and flags.
pub trait TextInput {
    /// Current text of the widget.
    fn text(&self) -> String;

    /// Replaces the widget's text.
    fn set_text(&mut self, text: &str);

    /// Marks the widget invalid with `message`, or valid when `None`.
    fn set_validity(&mut self, message: Option<String>);
}

/// What happened when a debounced validation ran.
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// The value was stored and the URL updated.
    Applied(Axis),
    /// The value was refused; the form state is unchanged.
    Rejected(Axis, InputError),
    /// The input was empty; nothing changed.
    Ignored(Axis),
}

/// Debounces and validates the X and Y text inputs.
#[derive(Debug)]
pub struct InputController {
    debounce: Duration,
    max_len: usize,
    timers: TimerQueue<Axis>,
    pending: HashMap<Axis, TimerHandle>,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_MS), MAX_FLOAT_INPUT_LENGTH)
    }
}

impl InputController {
    /// Creates a controller with the given quiet period and text length limit.
    pub fn new(debounce: Duration, max_len: usize) -> Self {
        Self {
            debounce,
            max_len,
            timers: TimerQueue::new(),
            pending: HashMap::new(),
        }
    }

    /// Records an edit of `axis`'s input at `now`.
    ///
    /// Any validation still pending for that input is cancelled; only the
    /// last edit in a burst gets validated.
    pub fn on_input(&mut self, axis: Axis, now: Instant) {
        if let Some(previous) = self.pending.remove(&axis) {
            self.timers.cancel(previous);
        }
        let handle = self.timers.schedule(now, self.debounce, axis);
        self.pending.insert(axis, handle);
    }

    /// Whether a validation is waiting for `axis`.
    pub fn is_pending(&self, axis: Axis) -> bool {
        self.pending.contains_key(&axis)
    }

    /// When the next pending validation is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Runs every validation that is due at `now`.
    ///
    /// # Arguments
    ///
    /// * `now` - Current time
    /// * `x_input` - The X coordinate widget
    /// * `y_input` - The Y coordinate widget
    /// * `form` - Form state receiving accepted values
    /// * `location` - Page URL to sync after each accepted value
    ///
    /// # Returns
    ///
    /// One outcome per validation that ran, in firing order.
    pub fn poll(
        &mut self,
        now: Instant,
        x_input: &mut dyn TextInput,
        y_input: &mut dyn TextInput,
        form: &mut FormState,
        location: &mut dyn Location,
    ) -> Vec<InputOutcome> {
        self.timers
            .drain_due(now)
            .into_iter()
            .map(|axis| {
                self.pending.remove(&axis);
                let input: &mut dyn TextInput = match axis {
                    Axis::X => &mut *x_input,
                    Axis::Y => &mut *y_input,
                };
                self.validate(axis, input, form, location)
            })
            .collect()
    }

    /// Validates `input`'s current text and applies it to `axis`.
    pub fn validate(
        &self,
        axis: Axis,
        input: &mut dyn TextInput,
        form: &mut FormState,
        location: &mut dyn Location,
    ) -> InputOutcome {
        let text = input.text();
        match self.check_text(axis, &text) {
            Ok(None) => {
                input.set_validity(None);
                InputOutcome::Ignored(axis)
            }
            Ok(Some(value)) => match form.point_mut().set(axis, Some(value)) {
                Ok(()) => {
                    input.set_validity(None);
                    log::debug!("{axis} set to {}", form.point().get(axis));
                    query_sync::write(location, form);
                    InputOutcome::Applied(axis)
                }
                Err(err) => Self::reject(axis, input, err.into()),
            },
            Err(err) => Self::reject(axis, input, err),
        }
    }

    fn check_text(&self, axis: Axis, text: &str) -> Result<Option<f64>, InputError> {
        // Whitespace-only text reads as zero; only truly empty text is skipped.
        let value = if !text.is_empty() && text.trim().is_empty() {
            Some(0.0)
        } else {
            parse_number(text)
        };
        if !text.is_empty() && value.is_none() {
            return Err(InputError::Parse {
                text: text.to_owned(),
            });
        }
        if text.chars().count() > self.max_len {
            return Err(InputError::TooLong { axis });
        }
        Ok(value)
    }

    fn reject(axis: Axis, input: &mut dyn TextInput, err: InputError) -> InputOutcome {
        log::warn!("rejected {axis} input: {err}");
        input.set_validity(Some(err.to_string()));
        InputOutcome::Rejected(axis, err)
    }
}
