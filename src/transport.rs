//! Platform transports for the area check request.
//!
//! In the browser the request goes through `gloo-net`'s fetch wrapper. Native
//! builds use `reqwest` on the tokio runtime that lives alongside the window.

use crate::error::SubmitError;
use crate::submission::{HttpReply, ReplyResult, Transport};
use eframe::egui;
use std::sync::mpsc::Sender;
use url::Url;

/// Sends `result` and wakes the UI so the reply is handled promptly.
fn deliver(reply: &Sender<ReplyResult>, repaint: Option<&egui::Context>, result: ReplyResult) {
    if reply.send(result).is_err() {
        log::debug!("reply dropped, the form is gone");
    }
    if let Some(ctx) = repaint {
        ctx.request_repaint();
    }
}

/// Transport backed by the browser's `fetch`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Default)]
pub struct FetchTransport {
    repaint: Option<egui::Context>,
}

#[cfg(target_arch = "wasm32")]
impl FetchTransport {
    /// Creates a transport that repaints `ctx` whenever a reply arrives.
    pub fn new(ctx: egui::Context) -> Self {
        Self { repaint: Some(ctx) }
    }

    async fn fetch(url: &str) -> ReplyResult {
        use gloo_net::http::Request;

        let response = Request::get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Decode(e.to_string()))?;
        Ok(HttpReply { status, body })
    }
}

#[cfg(target_arch = "wasm32")]
impl Transport for FetchTransport {
    fn get(&self, url: Url, reply: Sender<ReplyResult>) {
        let repaint = self.repaint.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = Self::fetch(url.as_str()).await;
            deliver(&reply, repaint.as_ref(), result);
        });
    }
}

/// Transport running `reqwest` requests on a tokio runtime.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct HttpTransport {
    runtime: tokio::runtime::Handle,
    client: reqwest::Client,
    repaint: Option<egui::Context>,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpTransport {
    /// Creates a transport spawning its requests on `runtime`.
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self {
            runtime,
            client: reqwest::Client::new(),
            repaint: None,
        }
    }

    /// Repaints `ctx` whenever a reply arrives.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Transport for HttpTransport {
    fn get(&self, url: Url, reply: Sender<ReplyResult>) {
        let client = self.client.clone();
        let repaint = self.repaint.clone();
        self.runtime.spawn(async move {
            let result = http_get(&client, url).await;
            deliver(&reply, repaint.as_ref(), result);
        });
    }
}

/// Performs a single GET of `url`.
///
/// Any status is a reply; only connection problems and a body that is not
/// UTF-8 are errors.
#[cfg(not(target_arch = "wasm32"))]
pub async fn http_get(client: &reqwest::Client, url: Url) -> ReplyResult {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| SubmitError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| SubmitError::Transport(e.to_string()))?;
    let body = String::from_utf8(bytes.to_vec()).map_err(|e| SubmitError::Decode(e.to_string()))?;
    Ok(HttpReply { status, body })
}
