//! # AirHealth
//!
//! Dashboard controller for the AirHealth air-quality health-risk service.
//! The controller reads the user's cached profile, asks the scoring service
//! for a risk assessment and renders the answer onto the dashboard.
//!
//! ## Modules
//!
//! - [`controller`]: session gate, "calculate risk", "sync wearable data", logout
//! - [`resolve`]: per-field fallback rules for the loosely typed response
//! - [`render`]: writes resolved fields to a [`view::DashboardView`]
//! - [`client`]: the scoring API seam and its native HTTP client
//! - [`store`]: `localStorage`-shaped client storage
//! - [`config`]: TOML configuration (native builds)
//!
//! The core has no platform dependencies. With the default `native` feature
//! the crate also provides a reqwest client, a file-backed store and the
//! `airhealth` terminal dashboard; the `airhealth-web` crate binds the same
//! controller to the browser DOM.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use airhealth::{DashboardController, FileStore, HttpRiskClient, MemoryView, SessionKeys};
//!
//! struct Stay;
//! impl airhealth::Navigator for Stay {
//!     fn navigate(&self, page: &str) {
//!         println!("sign in first ({page})");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::new("./airhealth_data");
//!     let client = HttpRiskClient::default();
//!
//!     if let Some(dashboard) =
//!         DashboardController::load(store, SessionKeys::default(), MemoryView::new(), client, Stay)?
//!     {
//!         dashboard.calculate_risk().await;
//!         println!("{:?}", dashboard.view().snapshot());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
#[cfg(feature = "native")]
pub mod config;
pub mod controller;
pub mod payload;
pub mod profile;
pub mod render;
pub mod resolve;
pub mod response;
pub mod session;
pub mod store;
pub mod value;
pub mod view;

// Re-export top-level types for convenience
pub use client::{ClientError, RiskApi, DEFAULT_API_BASE, RISK_ENDPOINT};
#[cfg(feature = "native")]
pub use client::HttpRiskClient;

pub use controller::{DashboardController, FlowOutcome};

pub use payload::{RiskRequest, WearableReadings};

pub use profile::{ProfileError, UserProfile, ValidatedProfile};

pub use resolve::{DashboardModel, RiskClass};

pub use response::RiskResponse;

pub use session::{Navigator, SessionKeys};

pub use store::{ClientStore, MemoryStore, StoreError, StoreResult};
#[cfg(feature = "native")]
pub use store::FileStore;

pub use view::{BadgeState, DashboardSnapshot, DashboardView, Element, MemoryView};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};
