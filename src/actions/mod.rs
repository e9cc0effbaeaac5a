//! Actions: opening apps, files, folders and URLs on this machine.
//!
//! - `allowlist`: which apps, folders, extensions and URL schemes are allowed
//! - `launcher`: the `Launcher` seam and the real process spawner
//! - `manager`: dispatches one ACTION control
//! - `errors`: launch and filesystem failures

pub mod allowlist;
pub mod errors;
pub mod launcher;
pub mod manager;

pub use allowlist::Allowlist;
pub use errors::ActionError;
pub use launcher::{LaunchRequest, Launcher, SystemLauncher};
pub use manager::ActionManager;
