pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use client::SwapApiClient;
pub use config::Config;
pub use error::{AppError, Result};
pub use services::{
    BrowsePipeline, BrowseQuery, ListingFeed, SearchDebouncer, TargetabilityEvaluator,
    TargetingContext,
};
