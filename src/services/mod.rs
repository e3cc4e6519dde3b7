//! Service layer
//!
//! Route handlers stay thin; everything that combines the cache, the live
//! providers and the bundled fallback lives here.

pub mod feeds;
pub mod league;
pub mod photos;
pub mod subscription;

pub use feeds::FeedService;
pub use league::LeagueDataService;
pub use photos::PhotoService;
pub use subscription::SubscriptionService;
