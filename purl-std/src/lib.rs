//! # purl-std
//!
//! Standard implementations for the Purl view/component lifecycle framework.
//!
//! This crate provides:
//! - **Lifecycle**: [`View`] (mount sequence + hydration) and [`Component`]
//! - **Composition helper**: [`Instance`], the knit/render cycle each element holds
//! - **Hydration**: [`HydrationSignal`], a single-shot event with a status query
//! - **Rendering**: [`MemoryDom`] and the diffing [`DiffTemplate`]
//! - **Sources**: [`StaticSource`], `TimeoutSource` (feature `timeout`)
//! - **Boundaries**: [`LoggingBoundary`]
//!
//! # Concurrency
//!
//! Each element instance owns its attributes, model, state and render cycle.
//! Knit-then-render runs under the instance's lock, so two knits for the same
//! element never interleave. Nothing is shared across instances.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use purl_core;

// Modules
pub mod boundaries;
pub mod component;
pub mod config;
pub mod dom;
pub mod hydration;
pub mod instance;
pub mod sources;
pub mod testing;
pub mod view;

pub use boundaries::LoggingBoundary;
pub use component::Component;
pub use config::MountConfig;
pub use dom::{DiffTemplate, MemoryDom, Mutation};
pub use hydration::{HydrationSignal, Subscription};
pub use instance::{Instance, InstanceStats, KnitOutcome};
pub use sources::StaticSource;
pub use view::{MountOutcome, PushOutcome, Status, View, ViewBuilder};
