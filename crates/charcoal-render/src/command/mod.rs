//! Deferred command recording (packet stream) types.
//!
//! Responsibilities:
//! - store type-erased renderer commands in a single growable byte arena
//! - preserve recording order exactly (singly linked packet chain)
//! - merge recorded buffers and relink their internal offsets
//! - define the dispatch-table contract backends replay packets through
//!
//! One `CommandBuffer` is single-threaded; fork-join recording works by
//! giving each worker its own buffer and merging them afterwards in a
//! coordinator-chosen order.

mod arena;
mod buffer;

pub mod descriptors;
pub mod dispatch;
pub mod packet;
pub mod types;

pub use buffer::CommandBuffer;
pub use descriptors::CommandDescriptor;
pub use dispatch::{DispatchHandlers, DispatchId, DispatchTable, Packet, Renderer, execute};
