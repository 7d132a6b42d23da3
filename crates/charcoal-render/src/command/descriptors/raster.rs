//! Rasterizer-state, render-target and resource-transfer descriptors.

use bytemuck::{Pod, Zeroable};

use crate::command::CommandBuffer;
use crate::command::descriptors::CommandDescriptor;
use crate::command::dispatch::{DispatchId, Packet};
use crate::command::types::{ClearFlags, ScissorRect, Viewport};
use crate::resource::{RenderTargetHandle, TextureHandle};

/// Sets the active viewports.
///
/// Dual-mode array payload: `external == 0` means `count` [`Viewport`]
/// records live inline in the packet's auxiliary bytes; otherwise
/// `external` is the address of a caller-owned array that must stay alive
/// until every submission of this buffer has finished.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct SetViewports {
    pub count: u32,
    pub _pad: u32,
    pub external: u64,
}

impl CommandDescriptor for SetViewports {
    const DISPATCH_ID: DispatchId = DispatchId::SetViewports;
}

impl SetViewports {
    /// Records a viewport bind referencing a caller-owned array.
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, viewports: &[Viewport]) {
        debug_assert!(!viewports.is_empty());
        *buffer.add_command::<Self>(0) = Self {
            count: viewports.len() as u32,
            _pad: 0,
            external: viewports.as_ptr() as u64,
        };
    }

    /// Records a single full-depth-range viewport inline; the packet
    /// references nothing external.
    #[inline]
    pub fn create_single(buffer: &mut CommandBuffer, x: f32, y: f32, width: f32, height: f32) {
        let viewport = Viewport::new(x, y, width, height);
        let (payload, aux) = buffer.add_command_with_aux::<Self>(size_of::<Viewport>() as u32);
        *payload = Self {
            count: 1,
            _pad: 0,
            external: 0,
        };
        aux.copy_from_slice(bytemuck::bytes_of(&viewport));
    }

    /// Viewport records for dispatch.
    ///
    /// # Safety
    /// In external mode the caller must guarantee the recorded array is
    /// still alive; recording stored only its address.
    pub unsafe fn records<'a>(&self, packet: &Packet<'a>) -> &'a [Viewport] {
        if self.external == 0 {
            packet.aux_records::<Self, Viewport>(self.count)
        } else {
            unsafe {
                std::slice::from_raw_parts(self.external as *const Viewport, self.count as usize)
            }
        }
    }
}

/// Sets the active scissor rectangles; same dual-mode convention as
/// [`SetViewports`].
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct SetScissorRects {
    pub count: u32,
    pub _pad: u32,
    pub external: u64,
}

impl CommandDescriptor for SetScissorRects {
    const DISPATCH_ID: DispatchId = DispatchId::SetScissorRects;
}

impl SetScissorRects {
    /// Records a scissor bind referencing a caller-owned array.
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, scissors: &[ScissorRect]) {
        debug_assert!(!scissors.is_empty());
        *buffer.add_command::<Self>(0) = Self {
            count: scissors.len() as u32,
            _pad: 0,
            external: scissors.as_ptr() as u64,
        };
    }

    /// Records a single scissor rectangle inline.
    #[inline]
    pub fn create_single(
        buffer: &mut CommandBuffer,
        top_left_x: i32,
        top_left_y: i32,
        bottom_right_x: i32,
        bottom_right_y: i32,
    ) {
        let rect = ScissorRect::new(top_left_x, top_left_y, bottom_right_x, bottom_right_y);
        let (payload, aux) = buffer.add_command_with_aux::<Self>(size_of::<ScissorRect>() as u32);
        *payload = Self {
            count: 1,
            _pad: 0,
            external: 0,
        };
        aux.copy_from_slice(bytemuck::bytes_of(&rect));
    }

    /// Scissor records for dispatch.
    ///
    /// # Safety
    /// See [`SetViewports::records`].
    pub unsafe fn records<'a>(&self, packet: &Packet<'a>) -> &'a [ScissorRect] {
        if self.external == 0 {
            packet.aux_records::<Self, ScissorRect>(self.count)
        } else {
            unsafe {
                std::slice::from_raw_parts(self.external as *const ScissorRect, self.count as usize)
            }
        }
    }
}

/// Binds the render target subsequent output goes to. A nil handle means
/// the backend's default/swap-chain target.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct SetRenderTarget {
    pub render_target: RenderTargetHandle,
}

impl CommandDescriptor for SetRenderTarget {
    const DISPATCH_ID: DispatchId = DispatchId::SetRenderTarget;
}

impl SetRenderTarget {
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, render_target: RenderTargetHandle) {
        *buffer.add_command::<Self>(0) = Self { render_target };
    }
}

/// Clears attachments of the bound render target.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Clear {
    pub flags: ClearFlags,
    pub color: [f32; 4],
    pub depth: f32,
    pub stencil: u32,
}

impl CommandDescriptor for Clear {
    const DISPATCH_ID: DispatchId = DispatchId::Clear;
}

impl Clear {
    #[inline]
    pub fn create(
        buffer: &mut CommandBuffer,
        flags: ClearFlags,
        color: [f32; 4],
        depth: f32,
        stencil: u32,
    ) {
        *buffer.add_command::<Self>(0) = Self {
            flags,
            color,
            depth,
            stencil,
        };
    }
}

/// Resolves a multisampled framebuffer into a non-multisampled render
/// target.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct ResolveMultisample {
    pub destination: RenderTargetHandle,
    pub source: RenderTargetHandle,
}

impl CommandDescriptor for ResolveMultisample {
    const DISPATCH_ID: DispatchId = DispatchId::ResolveMultisample;
}

impl ResolveMultisample {
    #[inline]
    pub fn create(
        buffer: &mut CommandBuffer,
        destination: RenderTargetHandle,
        source: RenderTargetHandle,
    ) {
        *buffer.add_command::<Self>(0) = Self {
            destination,
            source,
        };
    }
}

/// GPU-side copy between two textures of identical layout.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct CopyResource {
    pub destination: TextureHandle,
    pub source: TextureHandle,
}

impl CommandDescriptor for CopyResource {
    const DISPATCH_ID: DispatchId = DispatchId::CopyResource;
}

impl CopyResource {
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, destination: TextureHandle, source: TextureHandle) {
        *buffer.add_command::<Self>(0) = Self {
            destination,
            source,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::dispatch::{DispatchHandlers, DispatchTable, execute};
    use crate::command::packet;

    /// Backend that captures viewport/scissor records during dispatch.
    #[derive(Default)]
    struct Captured {
        viewports: Vec<Viewport>,
        scissors: Vec<ScissorRect>,
    }

    fn capture_table() -> DispatchTable<Captured> {
        fn ignore(_: Packet<'_>, _: &mut Captured) {}

        DispatchTable::new(DispatchHandlers {
            execute_command_buffer: ignore,
            set_root_signature: ignore,
            set_resource_group: ignore,
            set_pipeline: ignore,
            set_vertex_array: ignore,
            set_viewports: |p, b| {
                let cmd: &SetViewports = p.payload();
                b.viewports.extend_from_slice(unsafe { cmd.records(&p) });
            },
            set_scissor_rects: |p, b| {
                let cmd: &SetScissorRects = p.payload();
                b.scissors.extend_from_slice(unsafe { cmd.records(&p) });
            },
            set_render_target: ignore,
            clear: ignore,
            resolve_multisample: ignore,
            copy_resource: ignore,
            draw: ignore,
            draw_indexed: ignore,
            set_texture_mip_range: ignore,
            set_debug_marker: ignore,
            begin_debug_event: ignore,
            end_debug_event: ignore,
        })
    }

    // ── inline mode ───────────────────────────────────────────────────────

    #[test]
    fn single_viewport_is_stored_inline() {
        let mut buffer = CommandBuffer::new();
        SetViewports::create_single(&mut buffer, 0.0, 0.0, 800.0, 600.0);

        let bytes = buffer.packet_bytes();
        let cmd: &SetViewports = packet::payload(bytes, 0);
        assert_eq!(cmd.count, 1);
        assert_eq!(cmd.external, 0);

        // The record sits immediately after the payload.
        let aux_start = packet::payload_offset(0) + size_of::<SetViewports>();
        let stored: Viewport =
            bytemuck::pod_read_unaligned(&bytes[aux_start..aux_start + size_of::<Viewport>()]);
        assert_eq!(stored, Viewport::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(stored.min_depth, 0.0);
        assert_eq!(stored.max_depth, 1.0);
    }

    #[test]
    fn inline_viewport_dispatches_without_external_memory() {
        let mut buffer = CommandBuffer::new();
        SetViewports::create_single(&mut buffer, 8.0, 16.0, 320.0, 240.0);
        SetScissorRects::create_single(&mut buffer, 0, 0, 320, 240);

        let mut captured = Captured::default();
        execute(buffer.packet_bytes(), &capture_table(), &mut captured);

        assert_eq!(captured.viewports, [Viewport::new(8.0, 16.0, 320.0, 240.0)]);
        assert_eq!(captured.scissors, [ScissorRect::new(0, 0, 320, 240)]);
    }

    // ── external mode ─────────────────────────────────────────────────────

    #[test]
    fn external_viewport_array_is_referenced_not_copied() {
        let viewports = [
            Viewport::new(0.0, 0.0, 400.0, 300.0),
            Viewport::new(400.0, 0.0, 400.0, 300.0),
        ];

        let mut buffer = CommandBuffer::new();
        SetViewports::create(&mut buffer, &viewports);

        let cmd: &SetViewports = packet::payload(buffer.packet_bytes(), 0);
        assert_eq!(cmd.count, 2);
        assert_eq!(cmd.external, viewports.as_ptr() as u64);

        let mut captured = Captured::default();
        execute(buffer.packet_bytes(), &capture_table(), &mut captured);
        assert_eq!(captured.viewports, viewports);
    }

    // ── other payloads ────────────────────────────────────────────────────

    #[test]
    fn clear_payload_round_trips() {
        let mut buffer = CommandBuffer::new();
        Clear::create(&mut buffer, ClearFlags::COLOR_DEPTH, [0.1, 0.2, 0.3, 1.0], 0.5, 3);

        let cmd: &Clear = packet::payload(buffer.packet_bytes(), 0);
        assert_eq!(cmd.flags, ClearFlags::COLOR_DEPTH);
        assert_eq!(cmd.color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(cmd.depth, 0.5);
        assert_eq!(cmd.stencil, 3);
    }

    #[test]
    fn copy_and_resolve_round_trip() {
        let mut buffer = CommandBuffer::new();
        CopyResource::create(&mut buffer, TextureHandle::new(1), TextureHandle::new(2));
        ResolveMultisample::create(
            &mut buffer,
            RenderTargetHandle::new(3),
            RenderTargetHandle::new(4),
        );

        let bytes = buffer.packet_bytes();
        let copy: &CopyResource = packet::payload(bytes, 0);
        assert_eq!(copy.destination, TextureHandle::new(1));
        assert_eq!(copy.source, TextureHandle::new(2));

        let resolve_at = packet::read_next(bytes, 0);
        let resolve: &ResolveMultisample = packet::payload(bytes, resolve_at);
        assert_eq!(resolve.destination, RenderTargetHandle::new(3));
        assert_eq!(resolve.source, RenderTargetHandle::new(4));
    }
}
