//! Core engine for Fleetmon.
//!
//! This crate contains the concurrent heart of the fleet monitor:
//!
//! - `FleetCache` - concurrency-safe store of the latest status per printer
//! - `normalize` - maps raw backend replies onto the four fleet states
//! - `FleetPoller` - polls every backend on a fixed interval
//! - `Notifier` - renders and sends startup/overview messages
//! - `CommandLoop` - serves `/status`, `/info` and friends from chat
//! - `FleetRuntime` - owns the shutdown signal and supervises all tasks
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fleetmon_runtime::{FleetCache, FleetConfig, FleetPoller, FleetRuntime};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FleetConfig::default();
//!     let cache = Arc::new(FleetCache::new(printers.iter().map(|p| p.name.clone())));
//!     let mut runtime = FleetRuntime::new(config.clone());
//!
//!     let poller = FleetPoller::new(targets, Arc::clone(&cache), &config,
//!         runtime.shutdown_receiver());
//!     runtime.start(poller, command_loop, notifier, printers, cache, meta)?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     runtime.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency model
//!
//! The poller, the command loop and the startup-notification timers run as
//! independent tokio tasks. They share exactly two things: the `FleetCache`
//! (behind an `Arc`, with one lock per printer key) and a
//! `tokio::sync::watch` cancellation channel. Cancellation is cooperative -
//! every loop re-checks the channel at its natural suspension point and
//! returns cleanly; shutdown joins each task under a bounded timeout.

pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod normalize;
pub mod notify;
pub mod poller;

pub use cache::FleetCache;
pub use commands::{CommandLoop, FleetCommand};
pub use config::FleetConfig;
pub use error::{Result, RuntimeError};
pub use lifecycle::FleetRuntime;
pub use normalize::normalize;
pub use notify::Notifier;
pub use poller::{FleetPoller, PollTarget};
