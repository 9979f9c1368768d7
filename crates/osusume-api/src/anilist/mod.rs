pub mod client;
pub mod query;
pub mod types;

pub use client::AniListClient;
