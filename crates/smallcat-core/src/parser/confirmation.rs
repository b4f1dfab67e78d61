//! Confirmation page parser for small.cat
//!
//! After a submission is redirected, the confirmation page shows the new
//! link as an anchor right below a fixed heading.

use regex::Regex;

use super::attribute;

/// Extracts the short URL from confirmation page HTML
///
/// Looks for the `<h2>Your Small.Cat link is:</h2>` heading followed
/// (after optional whitespace) by an `<a>` element and returns its `href`
/// verbatim.
///
/// # Arguments
/// * `html` - Raw HTML string from the redirect destination
///
/// # Returns
/// `Some(url)` if the heading and anchor are present, `None` otherwise
pub fn parse_short_url(html: &str) -> Option<String> {
    let re = Regex::new(r"(?i)<h2>\s*Your Small\.Cat link is:\s*</h2>\s*<a\b([^>]*)>").ok()?;
    let anchor = re.captures(html)?.get(1)?.as_str();

    attribute(anchor, "href")
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_short_url_canonical_markup() {
        let html = "<div class=\"result\">\n<h2>Your Small.Cat link is:</h2>\n\n  <a href=\"http://small.cat/xyz\" rel=\"nofollow\" class=\"smallcat\">small.cat/xyz</a>\n</div>";
        assert_eq!(parse_short_url(html).as_deref(), Some("http://small.cat/xyz"));
    }

    #[test]
    fn test_parse_short_url_attribute_order() {
        let html = r#"<h2>Your Small.Cat link is:</h2><a class="smallcat" href="http://small.cat/q1">"#;
        assert_eq!(parse_short_url(html).as_deref(), Some("http://small.cat/q1"));
    }

    #[test]
    fn test_parse_short_url_requires_heading() {
        let html = r#"<h2>Something else</h2><a href="http://small.cat/nope">"#;
        assert_eq!(parse_short_url(html), None);
    }

    #[test]
    fn test_parse_short_url_anchor_must_follow_heading() {
        let html = r#"<h2>Your Small.Cat link is:</h2><p>oops</p><a href="http://small.cat/late">"#;
        assert_eq!(parse_short_url(html), None);
    }

    #[test]
    fn test_parse_short_url_ignores_other_anchors() {
        let html = r#"
            <a href="/about">About</a>
            <h2>Your Small.Cat link is:</h2>
            <a href="http://small.cat/abc" rel="nofollow" class="smallcat">
        "#;
        assert_eq!(parse_short_url(html).as_deref(), Some("http://small.cat/abc"));
    }

    #[test]
    fn test_parse_short_url_href_verbatim() {
        let html = r#"<h2>Your Small.Cat link is:</h2><a href=" http://small.cat/a?x=1&amp;y=2 ">"#;
        assert_eq!(
            parse_short_url(html).as_deref(),
            Some(" http://small.cat/a?x=1&amp;y=2 ")
        );
    }

    #[test]
    fn test_parse_short_url_empty_href() {
        let html = r#"<h2>Your Small.Cat link is:</h2><a href="">"#;
        assert_eq!(parse_short_url(html), None);
    }

    proptest! {
        #[test]
        fn prop_short_url_is_captured(slug in "[a-z0-9]{1,12}") {
            let html = format!(
                "<h2>Your Small.Cat link is:</h2>\n\n  <a href=\"http://small.cat/{}\" rel=\"nofollow\" class=\"smallcat\">",
                slug
            );
            let expected = format!("http://small.cat/{}", slug);
            prop_assert_eq!(parse_short_url(&html), Some(expected));
        }
    }
}
