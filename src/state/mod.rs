//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `TargetState`: where each directory target ended up during a crawl run
//! - `SiteVerdict`: the outcome of a robots.txt check for one district site

mod site_verdict;
mod target_state;

pub use site_verdict::SiteVerdict;
pub use target_state::TargetState;
