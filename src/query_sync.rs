//! Mirrors the form selection into the page URL and back.
//!
//! The three parameters [`POINT_X_PARAM`], [`POINT_Y_PARAM`] and
//! [`SCALE_PARAM`] carry the selection so a link reopens the form with the
//! same values.

use crate::constants::{POINT_X_PARAM, POINT_Y_PARAM, SCALE_PARAM};
use crate::location::Location;
use crate::types::{FormState, PointParams};
use url::Url;

/// Parses a numeral the way the page's number inputs read it.
///
/// Accepts decimal and exponent forms, unsigned `0x`/`0o`/`0b` integers and
/// the spelled-out `Infinity`. Blank text is absent; anything else that is
/// not a number (`nan`, `inf`, `1,5`) is `None` as well.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return digits
            .chars()
            .try_fold(0.0_f64, |acc, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)));
    }
    // `f64::from_str` also takes `inf`, `infinity` and `nan` in any case.
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Reads the raw selection from `url`.
///
/// Missing or unparseable parameters come back as `None` so the form falls
/// back to its defaults for them.
pub fn read_initial(url: &Url) -> PointParams {
    let read = |name: &str| query_value(url, name).as_deref().and_then(parse_number);
    PointParams {
        x: read(POINT_X_PARAM),
        y: read(POINT_Y_PARAM),
        scale: read(SCALE_PARAM),
    }
}

/// The query parameters describing `form`, in URL order.
pub fn build_query_params(form: &FormState) -> Vec<(&'static str, String)> {
    vec![
        (POINT_X_PARAM, form.point().x().to_string()),
        (POINT_Y_PARAM, form.point().y().to_string()),
        (SCALE_PARAM, form.scale().to_string()),
    ]
}

/// Sets each of `params` on `url`.
///
/// An existing parameter with the same name is overwritten where it stands
/// (later duplicates are dropped); new names are appended. Unrelated
/// parameters keep their values and order.
pub fn merge_query_params<K, V>(url: &mut Url, params: &[(K, V)])
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut merged: Vec<(String, String)> = Vec::new();
    let mut placed = vec![false; params.len()];

    for (key, value) in url.query_pairs() {
        match params.iter().position(|(name, _)| name.as_ref() == key) {
            Some(index) if placed[index] => {}
            Some(index) => {
                placed[index] = true;
                merged.push((key.into_owned(), params[index].1.as_ref().to_owned()));
            }
            None => merged.push((key.into_owned(), value.into_owned())),
        }
    }
    for (index, (name, value)) in params.iter().enumerate() {
        if !placed[index] {
            merged.push((name.as_ref().to_owned(), value.as_ref().to_owned()));
        }
    }

    url.query_pairs_mut().clear().extend_pairs(merged);
}

/// Writes the current selection into `location`'s URL without navigating.
pub fn write(location: &mut dyn Location, form: &FormState) {
    let mut url = location.url();
    merge_query_params(&mut url, &build_query_params(form));
    log::debug!("syncing selection to URL: {url}");
    location.replace(&url);
}
