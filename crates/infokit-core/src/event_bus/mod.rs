//! # Event Bus Module
//!
//! Provides the typed event bus used for decoupled communication between
//! the kernel subsystems and the host.
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter by category and receive events synchronously, in
//!   subscription order
//! - Async consumers can poll a broadcast receiver instead
//!
//! ## Usage
//!
//! ```rust
//! use infokit_core::event_bus::{EditorEvent, EventBus, EventCategory, EventFilter, HistoryEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(EventFilter::only(EventCategory::History), |event| {
//!     assert_eq!(event, &EditorEvent::History(HistoryEvent::Changed));
//! });
//!
//! bus.publish(EditorEvent::History(HistoryEvent::Changed));
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
