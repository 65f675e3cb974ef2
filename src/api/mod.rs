//! External API client and models
//!
//! This module handles communication with the langnet corpus service
//! and defines the normalized outcome of a lookup.

pub mod client;
pub mod outcome;
pub mod transport;

pub use client::{classify, LookupClient, LookupError, Query};
pub use outcome::Outcome;
pub use transport::{
    build_transport, CurlTransport, HttpTransport, Transport, TransportError, TransportKind,
    TransportReply, NO_STATUS,
};
