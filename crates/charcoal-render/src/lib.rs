//! Charcoal renderer command core.
//!
//! This crate owns the deferred command recording pieces shared by higher
//! layers: a growable packet arena, the typed command descriptor family
//! recorded into it, and the dispatch-table contract concrete backends
//! implement when they replay a recorded stream.
//!
//! Concrete backends (the Direct3D/OpenGL/Vulkan executors) and resource
//! lifetime management live elsewhere; packets store non-owning handles
//! only.

pub mod command;
pub mod logging;
pub mod resource;

pub use command::CommandBuffer;
