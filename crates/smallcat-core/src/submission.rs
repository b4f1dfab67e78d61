//! Link submission for small.cat
//!
//! Posts the shortening form, follows the redirect with an explicit GET
//! and scrapes the short URL out of the confirmation page.

use std::sync::Arc;

use log::{debug, warn};

use crate::error::{Result, SmallcatError};
use crate::parser::Extractor;
use crate::transport::{Transport, get_following};
use crate::types::{AuthenticityToken, Expiry, SubmissionRequest};

/// Submits a URL and resolves the resulting short link
///
/// Every failure in this stage is reported as `InvalidResponse`; the
/// message names the step that failed. No step is retried.
pub struct SubmissionClient<T, E> {
    transport: Arc<T>,
    extractor: Arc<E>,
    submit_url: String,
}

impl<T, E> Clone for SubmissionClient<T, E> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            extractor: Arc::clone(&self.extractor),
            submit_url: self.submit_url.clone(),
        }
    }
}

impl<T: Transport, E: Extractor> SubmissionClient<T, E> {
    pub fn new(transport: Arc<T>, extractor: Arc<E>, submit_url: impl Into<String>) -> Self {
        Self {
            transport,
            extractor,
            submit_url: submit_url.into(),
        }
    }

    /// Shorten `url` using a token from the same session
    ///
    /// # Returns
    /// The short URL exactly as it appears on the confirmation page
    ///
    /// # Errors
    /// `InvalidResponse` if the POST fails, it is not redirected, the
    /// follow-up GET fails, or the confirmation markup is missing
    pub async fn submit(&self, url: &str, expiry: Expiry, token: AuthenticityToken) -> Result<String> {
        let request = SubmissionRequest::new(url, expiry, token);
        self.submit_request(&request).await
    }

    /// Same as [`submit`](Self::submit) for a prebuilt request
    pub async fn submit_request(&self, request: &SubmissionRequest) -> Result<String> {
        debug!(
            "submitting {} for {} minutes",
            request.url,
            request.expiry.minutes()
        );

        let response = self
            .transport
            .post_form(&self.submit_url, request.form_body())
            .await?;

        let destination = response.destination().ok_or_else(|| {
            warn!("submission returned HTTP {} without a redirect", response.status);
            SmallcatError::invalid_response(format!(
                "submission returned HTTP {} without a redirect",
                response.status
            ))
        })?;

        debug!("following redirect to {}", destination);
        let page = get_following(self.transport.as_ref(), &destination).await?;

        if page.is_error() {
            return Err(SmallcatError::invalid_response(format!(
                "confirmation page returned HTTP {}",
                page.status
            )));
        }

        let html = page.text().ok_or_else(|| {
            SmallcatError::invalid_response("confirmation page is not valid UTF-8")
        })?;

        self.extractor.extract_short_url(html).ok_or_else(|| {
            warn!("no short link on {}", destination);
            SmallcatError::invalid_response("confirmation page has no short link")
        })
    }
}
