pub mod element;
pub mod error;
pub mod model;

pub use element::{ElementHandle, ElementQuery, MouseButton};
pub use error::backend_error::BackendError;
pub use model::{
    ActionOutcome, BatchResult, OutcomeKind, PlaylistEntry, PlaylistTarget, Step, TrackRequest,
};
