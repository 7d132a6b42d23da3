//! Command descriptor family: one POD payload per renderer operation.
//!
//! Extending the command set:
//! - add a variant to `DispatchId`
//! - add a payload struct + `create` factories in the matching file here
//! - add a handler field to `DispatchHandlers`
//!
//! Descriptors reference GPU resources through non-owning handles only;
//! callers keep every referenced resource alive until the last submission
//! of the recording buffer.
//!
//! Array-carrying descriptors (viewports, scissors, draws) are dual-mode:
//! records either live inline in the packet's auxiliary bytes, or behind an
//! external reference the caller owns for the duration of submission. The
//! payload's `external` field being 0 selects inline mode.

mod binding;
mod debug;
mod draw;
mod nested;
mod raster;

use bytemuck::Pod;

use super::dispatch::DispatchId;

pub use binding::{SetPipeline, SetResourceGroup, SetRootSignature, SetTextureMipRange, SetVertexArray};
pub use debug::{BeginDebugEvent, DEBUG_NAME_LEN, EndDebugEvent, SetDebugMarker};
pub use draw::{Draw, DrawIndexed};
pub use nested::ExecuteCommandBuffer;
pub use raster::{Clear, CopyResource, ResolveMultisample, SetRenderTarget, SetScissorRects, SetViewports};

/// A POD packet payload bound to a fixed dispatch index.
pub trait CommandDescriptor: Pod {
    const DISPATCH_ID: DispatchId;
}
