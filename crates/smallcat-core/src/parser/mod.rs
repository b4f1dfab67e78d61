//! HTML extraction for small.cat pages
//!
//! The service has no API, so both values the client needs are scraped
//! out of fixed markup. Everything markup-specific lives behind the
//! [`Extractor`] trait so a markup change only touches this module.

pub mod confirmation;
pub mod token;

pub use confirmation::parse_short_url;
pub use token::parse_authenticity_token;

use regex::Regex;

/// Pulls the two scraped values out of raw page HTML
pub trait Extractor: Send + Sync + 'static {
    /// Authenticity token from the landing page
    fn extract_token(&self, html: &str) -> Option<String>;

    /// Short URL from the confirmation page
    fn extract_short_url(&self, html: &str) -> Option<String>;
}

/// Extractor for the markup currently served by small.cat
#[derive(Debug, Clone, Copy, Default)]
pub struct SmallCatMarkup;

impl Extractor for SmallCatMarkup {
    fn extract_token(&self, html: &str) -> Option<String> {
        parse_authenticity_token(html)
    }

    fn extract_short_url(&self, html: &str) -> Option<String> {
        parse_short_url(html)
    }
}

/// Looks up a quoted attribute inside the body of a start tag
///
/// Values are returned verbatim, no entity decoding is applied.
pub(crate) fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let re = Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).ok()?;

    re.captures_iter(tag).find_map(|caps| {
        if !caps.get(1)?.as_str().eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
    })
}
