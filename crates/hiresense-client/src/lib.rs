//! HireSense HTTP client
//!
//! A `reqwest` implementation of [`hiresense_core::HireSenseBackend`].
//!
//! Failures are mapped onto the core error taxonomy: requests that never get
//! a response become `Transport`, non-2xx responses become `Http` carrying
//! the FastAPI `detail` when there is one, and bodies that do not match the
//! expected shape become `Decode`.

mod client;

pub use client::ApiClient;
