//! Authenticity token fetching
//!
//! Loads the landing page once and scrapes the session's anti-forgery
//! token out of it.

use std::sync::Arc;

use log::{debug, warn};

use crate::error::{Result, SmallcatError};
use crate::parser::Extractor;
use crate::transport::{Transport, get_following};
use crate::types::AuthenticityToken;

/// Fetches the anti-forgery token from the landing page
///
/// A single attempt is made, there are no retries. Redirects on the
/// landing page are followed.
pub struct TokenFetcher<T, E> {
    transport: Arc<T>,
    extractor: Arc<E>,
    landing_url: String,
}

impl<T, E> Clone for TokenFetcher<T, E> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            extractor: Arc::clone(&self.extractor),
            landing_url: self.landing_url.clone(),
        }
    }
}

impl<T: Transport, E: Extractor> TokenFetcher<T, E> {
    pub fn new(transport: Arc<T>, extractor: Arc<E>, landing_url: impl Into<String>) -> Self {
        Self {
            transport,
            extractor,
            landing_url: landing_url.into(),
        }
    }

    /// Fetch a fresh authenticity token
    ///
    /// # Errors
    /// - `InvalidResponse` if the request fails, returns an error status
    ///   or the body is not valid UTF-8
    /// - `TokenNotFound` if the page is readable but has no token input
    pub async fn fetch(&self) -> Result<AuthenticityToken> {
        let response = get_following(self.transport.as_ref(), &self.landing_url).await?;

        if response.is_error() {
            return Err(SmallcatError::invalid_response(format!(
                "landing page returned HTTP {}",
                response.status
            )));
        }

        let html = response
            .text()
            .ok_or_else(|| SmallcatError::invalid_response("landing page is not valid UTF-8"))?;

        match self
            .extractor
            .extract_token(html)
            .and_then(AuthenticityToken::new)
        {
            Some(token) => {
                debug!("found authenticity token ({} chars)", token.as_str().len());
                Ok(token)
            }
            None => {
                warn!("no authenticity token in {}", self.landing_url);
                Err(SmallcatError::TokenNotFound)
            }
        }
    }
}
