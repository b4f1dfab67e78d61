//! Authenticity token parser for the small.cat landing page
//!
//! The landing page embeds the session's anti-forgery token in a hidden
//! form input named `authenticity_token`.

use regex::Regex;

use super::attribute;

const TOKEN_FIELD: &str = "authenticity_token";

/// Extracts the authenticity token from landing page HTML
///
/// Only the first hidden `<input>` named `authenticity_token` is
/// considered. Its `value` is returned verbatim; attribute order does not
/// matter.
///
/// # Arguments
/// * `html` - Raw HTML string from the landing page
///
/// # Returns
/// `Some(token)` if the input is present with a non-empty value, `None` otherwise
pub fn parse_authenticity_token(html: &str) -> Option<String> {
    let input_re = Regex::new(r"(?i)<input\b([^>]*)>").ok()?;

    let tag = input_re
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .find(|attrs| {
            attribute(attrs, "name") == Some(TOKEN_FIELD)
                && attribute(attrs, "type").is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
        })?;

    attribute(tag, "value")
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
