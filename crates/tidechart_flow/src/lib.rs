//! Tidechart reactive core
//!
//! This crate provides the data-flow primitive the chart widget is built on:
//!
//! - **Observable**: a named, push-based single-value channel with
//!   last-value memory and synchronous, ordered fan-out
//! - **Combinators**: `map`, `filter`, seeding (`with_initial_event`,
//!   `repeat_last`) and typed merges (`merge2`..`merge4`)
//!
//! Everything is single-threaded and cooperative: a `broadcast` runs every
//! subscriber to completion, depth-first, before it returns.
//!
//! # Example
//!
//! ```rust
//! use tidechart_flow::{merge2, MapOptions, Observable};
//!
//! let clicks = Observable::new("clicks").with_initial_event(0u32);
//! let doubled = clicks.map(|v, _| v * 2, MapOptions::inherit());
//!
//! let both = merge2(&clicks, &doubled);
//! both.subscribe(|(clicks, doubled), _| {
//!     println!("clicks={clicks:?} doubled={doubled:?}");
//! });
//!
//! clicks.broadcast(3);
//! assert_eq!(doubled.last_value(), Some(6));
//! ```

pub mod merge;
pub mod observable;

pub use merge::{merge2, merge3, merge4};
pub use observable::{MapOptions, Observable, SubscriptionId};
