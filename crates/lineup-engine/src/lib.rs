pub mod backend;
pub mod batch;
pub mod catalog;
pub mod config;
pub mod executor;
pub mod gate;
pub mod normalize;
pub mod playlist;
pub mod report;
pub mod resolution;

pub use lineup_common::element;
pub use lineup_common::model;
