use bytemuck::{Pod, Zeroable};

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Pod, Zeroable)]
        pub struct $name(pub u64);

        impl $name {
            /// Nil handle; binds or references nothing.
            pub const NONE: Self = Self(0);

            #[inline]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn is_none(self) -> bool {
                self.0 == 0
            }
        }
    };
}

define_handle!(
    /// Root signature (descriptor layout) owned by the backend.
    RootSignatureHandle
);

define_handle!(
    /// Group of shader-visible resources bound as one unit.
    ResourceGroupHandle
);

define_handle!(
    /// Compiled graphics pipeline state.
    PipelineHandle
);

define_handle!(
    /// Vertex/index buffer binding set.
    VertexArrayHandle
);

define_handle!(
    /// GPU buffer (vertex, index, indirect-argument, ...).
    BufferHandle
);

define_handle!(
    /// Texture resource.
    TextureHandle
);

define_handle!(
    /// Render target (framebuffer / swap chain surface).
    RenderTargetHandle
);
