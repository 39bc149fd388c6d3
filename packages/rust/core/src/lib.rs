//! Core domain logic for worldcontext.
//!
//! Builds the markdown world context from denizen records. See
//! [`context::build_world_context`] for the entry point.

pub mod context;
pub mod tally;

pub use context::{
    EMPTY_ARCHIVE, build_world_context, build_world_context_from_json, build_world_context_with,
    parse_denizens,
};
