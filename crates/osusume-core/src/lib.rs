//! Runtime-agnostic state for the osusume recommendation UI.
//!
//! Nothing in here performs I/O or owns a timer. Each state machine takes a
//! message and returns the work a driver (the browser app or the terminal
//! session) must perform.

pub mod banner;
pub mod config;
pub mod error;
pub mod flow;
pub mod progress;
pub mod search;
pub mod selection;
pub mod session;

pub use banner::{BannerKind, ErrorBanner};
pub use config::AppConfig;
pub use error::CoreError;
pub use session::{Effect, Session};
