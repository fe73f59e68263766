//! Locating UI targets on a page whose structure is not known in advance.
//!
//! Each target is described by an ordered [`Cascade`] of independent
//! [`ResolutionStrategy`] values. The cascade tries them in order and stops at the
//! first one that produces a value.

pub mod cascade;
pub mod playlist;
pub mod result;
pub mod strategy;

pub use cascade::{Cascade, CascadeHit};
pub use playlist::{
    Committed, ExactEntryStrategy, FilterFieldStrategy, SubstringStrategy, TypeAheadStrategy,
};
pub use result::ResolutionError;
pub use strategy::{LocateStrategy, ResolutionStrategy, wait_visible, wait_visible_any};
