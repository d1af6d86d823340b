//! Thin HTTP layer over reqwest: buffered GET for the release index and
//! streaming download-to-file for artifacts.

mod client;

pub use client::HttpClient;
