//! Access to the page URL.
//!
//! The form only ever needs to read the current URL and to replace it without
//! navigating, so that is all [`Location`] offers. The browser build talks to
//! `window.location` and `window.history`; native builds and tests keep the URL
//! in memory.

use url::Url;

/// Read/replace capability over the page URL.
pub trait Location {
    /// The current page URL.
    fn url(&self) -> Url;

    /// Replaces the page URL without navigation or a new history entry.
    fn replace(&mut self, url: &Url);
}

/// A URL held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryLocation {
    url: Url,
}

impl MemoryLocation {
    /// Creates a location starting at `url`.
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parses `url` and starts there.
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(url)?))
    }
}

impl Location for MemoryLocation {
    fn url(&self) -> Url {
        self.url.clone()
    }

    fn replace(&mut self, url: &Url) {
        self.url = url.clone();
    }
}

/// The URL of the browser tab running the app.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct BrowserLocation {
    last_known: Url,
}

#[cfg(target_arch = "wasm32")]
impl BrowserLocation {
    /// Attaches to the current tab, or `None` outside a browser window.
    pub fn current() -> Option<Self> {
        let last_known = Url::parse(&Self::href()?).ok()?;
        Some(Self { last_known })
    }

    fn href() -> Option<String> {
        web_sys::window()?.location().href().ok()
    }
}

#[cfg(target_arch = "wasm32")]
impl Location for BrowserLocation {
    fn url(&self) -> Url {
        Self::href()
            .and_then(|href| Url::parse(&href).ok())
            .unwrap_or_else(|| self.last_known.clone())
    }

    fn replace(&mut self, url: &Url) {
        self.last_known = url.clone();
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.history() {
            Ok(history) => {
                if let Err(err) =
                    history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url.as_str()))
                {
                    log::warn!("history.replaceState failed: {err:?}");
                }
            }
            Err(err) => log::warn!("no history object: {err:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_location_replaces_url() {
        let mut location = MemoryLocation::parse("http://localhost/?a=1").unwrap();
        let next = Url::parse("http://localhost/?a=2").unwrap();
        location.replace(&next);
        assert_eq!(location.url(), next);
    }
}
