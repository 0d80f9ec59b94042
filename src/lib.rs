pub mod auth;
pub mod cache;
pub mod cancel;
pub mod cli;
pub mod collector;
pub mod colors;
pub mod error;
pub mod export;
pub mod github;
pub mod health;
pub mod models;
pub mod query;
pub mod report;
pub mod session;
pub mod stats;
pub mod types;

pub use cancel::CancelToken;
pub use collector::{collect, CollectOptions, ProgressSink};
pub use error::{Result, StarsError};
pub use github::{GitHubClient, PageFetcher, StarPage};
pub use models::{DerivedStats, FetchProgress, FetchStatus, StarredRepo};
pub use stats::derive_stats;
