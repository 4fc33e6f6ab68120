//! # PairWise Common Library
//!
//! Shared code for the PairWise wizard service:
//! - Error taxonomy
//! - Bearer token minting and verification
//! - API request/response types

pub mod error;
pub mod token;
pub mod types;

pub use error::{Error, Result};
