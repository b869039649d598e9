//! In-process joke list and like counter.
//!
//! # Design Decisions
//! - State lives in explicit service instances held by the HTTP state, so
//!   tests can run against isolated instances
//! - Joke ids are positions in the append-ordered list; jokes are never
//!   removed, so an id never changes once handed out
//! - Both stores hold their lock only for the duration of a single read or
//!   write; no lock is held across an await point

pub mod book;
pub mod likes;

pub use book::{Joke, JokeBook};
pub use likes::LikeCounter;
