//! Preview sessions for the document-preview flow.
//!
//! A preview is created in one request and displayed in a later one. Sessions
//! live only in this process and expire after a short TTL.

mod store;

pub use store::{PreviewSession, PreviewSessionStore};
