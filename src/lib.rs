//! # meme-finder
//!
//! Finds memes that fit an article. Takes already-extracted article text
//! and an entitlement flag, ranks memes with [`meme_rank`], and answers
//! with a JSON-ready [`FinderResponse`] envelope.
//!
//! Free requests query Imgflip with position-weighted keywords. Premium
//! requests add phrase suggestions, emotion tagging, Giphy and Tenor.

pub mod config;
pub mod error;
pub mod finder;
pub mod request;
pub mod response;

pub use config::FinderConfig;
pub use error::{FinderError, Result};
pub use finder::MemeFinder;
pub use request::{Document, FinderRequest};
pub use response::FinderResponse;

pub use meme_rank::Tier;
