//! Main shortening API for small.cat
//!
//! Provides the high-level async API combining the token fetch and the
//! form submission over one shared HTTP session.

use std::sync::Arc;

use log::info;

use crate::error::{Result, SmallcatError};
use crate::fetcher::TokenFetcher;
use crate::parser::{Extractor, SmallCatMarkup};
use crate::submission::SubmissionClient;
use crate::transport::{ClientConfig, ReqwestTransport, Transport};
use crate::types::Expiry;

/// Main shortening API for small.cat
///
/// Both steps share one transport so the session cookie set by the
/// landing page travels with the submission. Cloning is cheap and keeps
/// the same session.
pub struct Shortener<T = ReqwestTransport, E = SmallCatMarkup> {
    fetcher: TokenFetcher<T, E>,
    submission: SubmissionClient<T, E>,
}

impl<T, E> Clone for Shortener<T, E> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            submission: self.submission.clone(),
        }
    }
}

impl Shortener {
    /// Create a new shortener with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new shortener with custom client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::with_config(&config)?;
        Ok(Self::with_parts(Arc::new(transport), Arc::new(SmallCatMarkup), &config))
    }
}

impl<T: Transport, E: Extractor> Shortener<T, E> {
    /// Assemble a shortener from an existing transport and extractor
    ///
    /// Only the URLs of `config` are used; transport settings belong to
    /// whoever built `transport`.
    pub fn with_parts(transport: Arc<T>, extractor: Arc<E>, config: &ClientConfig) -> Self {
        Self {
            fetcher: TokenFetcher::new(
                Arc::clone(&transport),
                Arc::clone(&extractor),
                config.landing_url(),
            ),
            submission: SubmissionClient::new(transport, extractor, config.submit_url()),
        }
    }

    pub fn fetcher(&self) -> &TokenFetcher<T, E> {
        &self.fetcher
    }

    pub fn submission(&self) -> &SubmissionClient<T, E> {
        &self.submission
    }

    /// Shorten a URL
    ///
    /// Fetches a token, then submits. A failed fetch is returned as-is and
    /// the submission is never attempted.
    ///
    /// # Arguments
    /// * `url` - URL to shorten
    /// * `expiry` - Lifetime of the short link
    ///
    /// # Returns
    /// The short URL from the confirmation page
    ///
    /// # Errors
    /// - `InvalidUrl` if `url` is empty or whitespace only
    /// - `TokenNotFound` if the landing page carries no token
    /// - `InvalidResponse` for any transport or markup failure
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> smallcat_core::Result<()> {
    /// use smallcat_core::{Expiry, Shortener};
    /// let shortener = Shortener::new()?;
    /// let short = shortener.shorten("https://www.rust-lang.org", Expiry::OneDay).await?;
    /// println!("{}", short);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn shorten(&self, url: &str, expiry: Expiry) -> Result<String> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(SmallcatError::InvalidUrl(
                "URL to shorten cannot be empty".to_string(),
            ));
        }

        let token = self.fetcher.fetch().await?;
        let short = self.submission.submit(trimmed, expiry, token).await?;

        info!("shortened {} to {} ({})", trimmed, short, expiry);
        Ok(short)
    }
}
