//! REST API client module for the Rentaly backend.
//!
//! This module provides the `ApiClient` façade used by every feature of the
//! client: cars, bookings, accounts, favorites, news and contact.
//!
//! All requests carry a JSON content type; requests made while a bearer
//! credential is stored carry it in the authorization header. Failures are
//! surfaced as typed `ApiError` values preserving the HTTP status.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
pub use error::ApiError;
