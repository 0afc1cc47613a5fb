//! AirHealth Dashboard
//!
//! Browser front end of the AirHealth dashboard, compiled to WebAssembly.
//!
//! # Architecture
//!
//! The page's HTML already contains every dashboard element. This crate does
//! not render markup; it binds the shared [`airhealth::DashboardController`]
//! to that page:
//!
//! - [`dom::DomView`] writes to elements by their fixed ids
//! - [`storage::LocalStorageStore`] reads the session marker and profile
//! - [`api::FetchRiskClient`] posts to the scoring service with fetch
//! - [`app`] attaches the button handlers once the DOM is ready

mod api;
mod app;
mod dom;
mod storage;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    app::start_when_ready();
}
