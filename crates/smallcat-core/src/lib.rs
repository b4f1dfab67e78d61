//! small.cat Client Core Library
//!
//! Shortens URLs through small.cat, a service with no API: the client
//! scrapes an anti-forgery token from the landing page, posts the
//! shortening form, follows the redirect and scrapes the short link from
//! the confirmation page.
//!
//! # Overview
//!
//! - [`TokenFetcher`] loads the landing page and extracts the token
//! - [`SubmissionClient`] posts the form, follows the redirect with an
//!   explicit GET and extracts the short URL
//! - [`Shortener`] chains both steps over one cookie session
//! - [`SyncBridge`] runs the chain for synchronous callers and hands back
//!   exactly one result
//!
//! # Example
//!
//! ```no_run
//! use smallcat_core::{Expiry, Result, SyncBridge};
//!
//! fn main() -> Result<()> {
//!     let bridge = SyncBridge::new()?;
//!     let short = bridge.run("https://www.rust-lang.org", Expiry::OneDay)?;
//!     println!("URL: {}", short);
//!     Ok(())
//! }
//! ```
//!
//! # Markup changes
//!
//! Extraction is tied to the exact markup small.cat serves. If it changes,
//! the token step fails with [`SmallcatError::TokenNotFound`] or the
//! submission step with [`SmallcatError::InvalidResponse`]; only the
//! [`parser`] module needs updating.

mod bridge;
mod error;
mod fetcher;
pub mod parser;
mod shortener;
mod submission;
#[cfg(test)]
mod testing;
mod transport;
mod types;

// Re-export error types
pub use error::{Result, SmallcatError};

// Re-export workflow steps
pub use fetcher::TokenFetcher;
pub use submission::SubmissionClient;

// Re-export main API
pub use bridge::SyncBridge;
pub use shortener::Shortener;

// Re-export extraction
pub use parser::{Extractor, SmallCatMarkup, parse_authenticity_token, parse_short_url};

// Re-export transport
pub use transport::{ClientConfig, ReqwestTransport, Response, Transport, get_following};

// Re-export data types
pub use types::{AuthenticityToken, Expiry, SubmissionRequest};
