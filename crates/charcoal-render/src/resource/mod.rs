//! Non-owning handles to externally managed GPU resources.
//!
//! Responsibilities:
//! - name the resource kinds command packets may reference
//! - keep every handle a plain 8-byte value so it can live inside a packet
//!
//! Ownership and reference counting stay with the systems that create the
//! resources (render queue, material system); a handle recorded into a
//! command buffer is a promise by the caller that the resource outlives
//! every submission of that buffer.

mod handle;

pub use handle::{
    BufferHandle, PipelineHandle, RenderTargetHandle, ResourceGroupHandle, RootSignatureHandle,
    TextureHandle, VertexArrayHandle,
};
