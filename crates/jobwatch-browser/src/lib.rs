//! Browser automation engine for job search pages.
//!
//! Provides headless Chromium control behind the [`BrowserActions`] page
//! trait, with one isolated browser per [`BrowserLauncher::launch`] call.

pub mod actions;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod profile;
#[cfg(feature = "testing")]
pub mod testing;

pub use actions::{BrowserActions, BrowserLauncher};
pub use engine::{BrowserEngine, ChromiumLauncher, LaunchOptions};
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
pub use profile::clear_profile_dir;
