//! HTTP plumbing: authenticated requests and status classification.

mod client;

pub use client::HttpClient;
