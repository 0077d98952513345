//! End-to-end tests: page controllers and `ApiClient` against a mock backend.
//!
//! Starts an axum server on an ephemeral port and talks to it with reqwest.


#[cfg(feature = "http")]
mod accounts;
#[cfg(feature = "http")]
mod catalog;
#[cfg(feature = "http")]
mod discussion;
#[cfg(feature = "http")]
mod moderation;
