// src/notifier/mod.rs

//! Underlying change notifier.
//!
//! The registry never talks to `notify` directly. It consumes:
//! - a [`NotifierFactory`] that creates a fresh handle per event-loop
//!   generation,
//! - a [`Notifier`] handle that can start/stop watching single paths,
//! - a pair of [`NotifierStreams`] carrying raw events and backend errors.
//!
//! [`NotifyFactory`] is the production implementation built on `notify`;
//! tests plug in a fake factory instead.

pub mod backend;
pub mod notify_backend;
pub mod translate;

pub use backend::{
    stream_pair, Notifier, NotifierFactory, NotifierParts, NotifierSinks,
    NotifierStreams, RawEvent,
};
pub use notify_backend::NotifyFactory;
pub use translate::change_mask_for;
