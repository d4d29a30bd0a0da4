//! Submitting the selected point and rendering the check history.
//!
//! A submission is fire-and-forget: [`SubmissionController::submit`] hands the
//! request to a [`Transport`] and returns at once. The transport sends its
//! reply back over a channel, and [`SubmissionController::poll`] applies the
//! replies on the UI thread.
//!
//! Nothing stops a second submission while the first is still in flight; the
//! replies are applied in the order they arrive.

use crate::constants::*;
use crate::error::SubmitError;
use crate::query_sync::{build_query_params, merge_query_params};
use crate::types::{AreaCheckResponse, AreaCheckResult, FormState};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::sync::mpsc::{channel, Receiver, Sender};
use url::Url;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

/// What a transport reports back for one request.
pub type ReplyResult = Result<HttpReply, SubmitError>;

/// Issues GET requests in the background.
pub trait Transport {
    /// Starts a GET of `url` and sends the outcome on `reply` once it completes.
    fn get(&self, url: Url, reply: Sender<ReplyResult>);
}

/// One rendered line of the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// X coordinate
    pub x: String,
    /// Y coordinate
    pub y: String,
    /// Scale
    pub scale: String,
    /// Whether the point hit the area
    pub result: String,
    /// Local time of the check
    pub calculated_at: String,
    /// Duration of the check
    pub calculation_time: String,
}

impl TableRow {
    /// Column titles, in cell order.
    pub const HEADERS: [&'static str; 6] = ["X", "Y", "Scale", "Result", "Calculated at", "Time"];

    /// Renders a check result with local times.
    pub fn from_result(entry: &AreaCheckResult) -> Self {
        Self::from_result_in(entry, &Local)
    }

    /// Renders a check result with times in `tz`.
    pub fn from_result_in<Tz>(entry: &AreaCheckResult, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            x: entry.point.x.to_string(),
            y: entry.point.y.to_string(),
            scale: entry.point.scale.to_string(),
            result: entry.result.to_string(),
            calculated_at: format_time(entry.calculated_at, tz),
            calculation_time: entry.calculation_time.to_string(),
        }
    }

    /// The cells in display order.
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.x,
            &self.y,
            &self.scale,
            &self.result,
            &self.calculated_at,
            &self.calculation_time,
        ]
    }
}

/// Formats an epoch-milliseconds timestamp as wall-clock time in `tz`.
pub fn format_time<Tz>(epoch_ms: f64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !epoch_ms.is_finite() {
        return "Invalid Date".to_string();
    }
    match DateTime::from_timestamp_millis(epoch_ms as i64) {
        Some(utc) => utc.with_timezone(tz).format(TIME_FORMAT).to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Where check results are rendered.
pub trait ResultTable {
    /// Removes every row.
    fn clear(&mut self);

    /// Appends a row at the bottom.
    fn insert_row(&mut self, row: TableRow);
}

/// An in-memory results table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRows {
    /// Rendered rows, top to bottom
    pub rows: Vec<TableRow>,
}

impl ResultTable for ResultRows {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn insert_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }
}

/// Sends the form to the area check endpoint and renders what comes back.
pub struct SubmissionController {
    endpoint: Url,
    transport: Box<dyn Transport>,
    sender: Sender<ReplyResult>,
    receiver: Receiver<ReplyResult>,
    submitted: u64,
}

impl SubmissionController {
    /// Creates a controller posting to the endpoint on `page`'s origin.
    ///
    /// # Arguments
    ///
    /// * `page` - URL of the page hosting the form
    /// * `transport` - Carries requests to the endpoint
    ///
    /// # Returns
    ///
    /// The controller, or an error if `page` cannot serve as a base URL.
    pub fn new(page: &Url, transport: Box<dyn Transport>) -> Result<Self, url::ParseError> {
        let endpoint = page.join(INTERSECT_ENDPOINT)?;
        let (sender, receiver) = channel();
        Ok(Self {
            endpoint,
            transport,
            sender,
            receiver,
            submitted: 0,
        })
    }

    /// The URL a submission of `form` requests.
    pub fn request_url(&self, form: &FormState) -> Url {
        let mut url = self.endpoint.clone();
        merge_query_params(&mut url, &build_query_params(form));
        merge_query_params(&mut url, &[(JSON_MARKER_PARAM, "")]);
        url
    }

    /// Starts a check of the current selection.
    pub fn submit(&mut self, form: &FormState) {
        let url = self.request_url(form);
        self.submitted += 1;
        log::info!("submitting check #{}: {url}", self.submitted);
        self.transport.get(url, self.sender.clone());
    }

    /// Number of submissions started so far.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Applies every reply that has arrived since the last poll.
    ///
    /// # Returns
    ///
    /// For each reply, the number of rendered rows or the error to show.
    pub fn poll(&mut self, table: &mut dyn ResultTable) -> Vec<Result<usize, SubmitError>> {
        let mut outcomes = Vec::new();
        while let Ok(reply) = self.receiver.try_recv() {
            outcomes.push(handle_reply(reply, table));
        }
        outcomes
    }
}

/// Maps one reply onto the results table.
///
/// A successful reply replaces the table with the history, newest first. Any
/// failure leaves the table as it was.
pub fn handle_reply(reply: ReplyResult, table: &mut dyn ResultTable) -> Result<usize, SubmitError> {
    let reply = reply.inspect_err(|err| log::warn!("check failed: {err}"))?;
    match reply.status {
        OK_STATUS => {}
        INVALID_DATA_STATUS => {
            log::warn!("endpoint rejected the point");
            return Err(SubmitError::RemoteRejection);
        }
        status => {
            log::warn!("endpoint answered with status {status}");
            return Err(SubmitError::RemoteFailure { status });
        }
    }

    let response = AreaCheckResponse::from_json(&reply.body).map_err(|e| {
        log::warn!("could not decode check response: {e}");
        SubmitError::Decode(e.to_string())
    })?;

    let mut points = response.user.points;
    points.reverse();

    table.clear();
    for entry in &points {
        table.insert_row(TableRow::from_result(entry));
    }
    log::info!("rendered {} check results", points.len());
    Ok(points.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PointParams;
    use chrono::Utc;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records requested URLs and never answers on its own.
    #[derive(Clone, Default)]
    struct RecordingTransport {
        requests: Rc<RefCell<Vec<(Url, Sender<ReplyResult>)>>>,
    }

    impl Transport for RecordingTransport {
        fn get(&self, url: Url, reply: Sender<ReplyResult>) {
            self.requests.borrow_mut().push((url, reply));
        }
    }

    fn result_json(x: f64, at: i64) -> String {
        format!(
            r#"{{"point":{{"x":{x},"y":1.5,"scale":2}},"result":true,"calculationTime":3,"calculatedAt":{at}}}"#
        )
    }

    fn ok_reply(entries: &[String]) -> ReplyResult {
        Ok(HttpReply {
            status: 200,
            body: format!(r#"{{"user":{{"points":[{}]}}}}"#, entries.join(",")),
        })
    }

    fn seeded_table() -> ResultRows {
        let mut table = ResultRows::default();
        table.insert_row(TableRow {
            x: "9".into(),
            y: "9".into(),
            scale: "9".into(),
            result: "false".into(),
            calculated_at: "00:00:00".into(),
            calculation_time: "0".into(),
        });
        table
    }

    #[test]
    fn test_request_url_targets_endpoint_with_json_marker() {
        let page = Url::parse("http://example.org/lab/index.html?pointX=1&utm=x").unwrap();
        let controller = SubmissionController::new(&page, Box::new(RecordingTransport::default())).unwrap();
        let form = FormState::new(PointParams {
            x: Some(2.0),
            y: Some(-1.5),
            scale: Some(3.0),
        })
        .unwrap();

        let url = controller.request_url(&form);
        assert_eq!(
            url.as_str(),
            "http://example.org/app?pointX=2&pointY=-1.5&scale=3&isJson="
        );
    }

    #[test]
    fn test_submit_is_fire_and_forget() {
        let transport = RecordingTransport::default();
        let page = Url::parse("http://example.org/").unwrap();
        let mut controller = SubmissionController::new(&page, Box::new(transport.clone())).unwrap();
        let mut table = seeded_table();

        // Two submissions in flight at once are both sent.
        controller.submit(&FormState::default());
        controller.submit(&FormState::default());
        assert_eq!(transport.requests.borrow().len(), 2);
        assert_eq!(controller.submitted(), 2);
        assert!(controller.poll(&mut table).is_empty());

        let (_, reply) = transport.requests.borrow_mut().remove(0);
        reply.send(ok_reply(&[result_json(1.0, 0)])).unwrap();
        assert_eq!(controller.poll(&mut table), vec![Ok(1)]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_success_renders_newest_first() {
        let mut table = seeded_table();
        let reply = ok_reply(&[result_json(1.0, 1_000), result_json(-2.0, 2_000)]);

        assert_eq!(handle_reply(reply, &mut table), Ok(2));
        let xs: Vec<_> = table.rows.iter().map(|row| row.x.as_str()).collect();
        assert_eq!(xs, vec!["-2", "1"]);
    }

    #[test]
    fn test_rejection_leaves_table_untouched() {
        let mut table = seeded_table();
        let before = table.clone();
        let reply = Ok(HttpReply {
            status: 422,
            body: String::new(),
        });

        let err = handle_reply(reply, &mut table).unwrap_err();
        assert_eq!(err, SubmitError::RemoteRejection);
        assert_eq!(err.user_message(), "Invalid data! Check input");
        assert_eq!(table, before);
    }

    #[test]
    fn test_other_failures_use_generic_message() {
        let mut table = seeded_table();
        let before = table.clone();

        let server_error = handle_reply(
            Ok(HttpReply {
                status: 500,
                body: "boom".into(),
            }),
            &mut table,
        )
        .unwrap_err();
        assert_eq!(server_error, SubmitError::RemoteFailure { status: 500 });
        assert_eq!(server_error.user_message(), GENERIC_ERROR_MESSAGE);

        let transport = handle_reply(Err(SubmitError::Transport("refused".into())), &mut table).unwrap_err();
        assert_eq!(transport.user_message(), GENERIC_ERROR_MESSAGE);

        let garbage = handle_reply(
            Ok(HttpReply {
                status: 200,
                body: "<html>".into(),
            }),
            &mut table,
        )
        .unwrap_err();
        assert!(matches!(garbage, SubmitError::Decode(_)));
        assert_eq!(table, before);
    }

    #[test]
    fn test_row_formatting() {
        let entry = AreaCheckResult {
            point: crate::types::CheckedPoint {
                x: 3.0,
                y: -0.5,
                scale: 1.5,
            },
            result: false,
            calculation_time: 12.0,
            calculated_at: 45_296_000.0,
        };
        let row = TableRow::from_result_in(&entry, &Utc);
        assert_eq!(row.cells(), ["3", "-0.5", "1.5", "false", "12:34:56", "12"]);
        assert_eq!(format_time(f64::NAN, &Utc), "Invalid Date");
    }
}
