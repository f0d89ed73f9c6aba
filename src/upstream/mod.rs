pub mod client;

pub use client::{Identity, ProxiedResponse, UpstreamClient, UpstreamError};
