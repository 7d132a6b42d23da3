//! Draw descriptors.
//!
//! Both draws are dual-mode: arguments come either from a GPU indirect
//! buffer the caller owns, or inline from the packet's auxiliary bytes
//! (the inline records use the indirect-argument layout, so backends
//! without native multi-draw-indirect can replay them one by one).

use bytemuck::{Pod, Zeroable};

use crate::command::CommandBuffer;
use crate::command::descriptors::CommandDescriptor;
use crate::command::dispatch::{DispatchId, Packet};
use crate::command::types::{DrawArgs, DrawIndexedArgs};
use crate::resource::BufferHandle;

/// Non-indexed draw. `indirect_buffer == NONE` selects inline arguments.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct Draw {
    pub indirect_buffer: BufferHandle,
    pub indirect_offset: u32,
    pub draw_count: u32,
}

impl CommandDescriptor for Draw {
    const DISPATCH_ID: DispatchId = DispatchId::Draw;
}

impl Draw {
    /// Records an indirect multi-draw sourced from a GPU buffer.
    #[inline]
    pub fn create(
        buffer: &mut CommandBuffer,
        indirect_buffer: BufferHandle,
        indirect_offset: u32,
        draw_count: u32,
    ) {
        debug_assert!(!indirect_buffer.is_none());
        *buffer.add_command::<Self>(0) = Self {
            indirect_buffer,
            indirect_offset,
            draw_count,
        };
    }

    /// Records one draw with inline arguments.
    #[inline]
    pub fn create_inline(buffer: &mut CommandBuffer, args: DrawArgs) {
        Self::create_inline_multi(buffer, &[args]);
    }

    /// Records `args.len()` draws with inline arguments.
    pub fn create_inline_multi(buffer: &mut CommandBuffer, args: &[DrawArgs]) {
        debug_assert!(!args.is_empty());
        let (payload, aux) =
            buffer.add_command_with_aux::<Self>((args.len() * size_of::<DrawArgs>()) as u32);
        *payload = Self {
            indirect_buffer: BufferHandle::NONE,
            indirect_offset: 0,
            draw_count: args.len() as u32,
        };
        aux.copy_from_slice(bytemuck::cast_slice(args));
    }

    /// Inline draw arguments, or `None` when an indirect buffer is
    /// referenced instead.
    #[inline]
    pub fn inline_args<'a>(&self, packet: &Packet<'a>) -> Option<&'a [DrawArgs]> {
        if self.indirect_buffer.is_none() {
            Some(packet.aux_records::<Self, DrawArgs>(self.draw_count))
        } else {
            None
        }
    }
}

/// Indexed draw. `indirect_buffer == NONE` selects inline arguments.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct DrawIndexed {
    pub indirect_buffer: BufferHandle,
    pub indirect_offset: u32,
    pub draw_count: u32,
}

impl CommandDescriptor for DrawIndexed {
    const DISPATCH_ID: DispatchId = DispatchId::DrawIndexed;
}

impl DrawIndexed {
    /// Records an indirect indexed multi-draw sourced from a GPU buffer.
    #[inline]
    pub fn create(
        buffer: &mut CommandBuffer,
        indirect_buffer: BufferHandle,
        indirect_offset: u32,
        draw_count: u32,
    ) {
        debug_assert!(!indirect_buffer.is_none());
        *buffer.add_command::<Self>(0) = Self {
            indirect_buffer,
            indirect_offset,
            draw_count,
        };
    }

    /// Records one indexed draw with inline arguments.
    #[inline]
    pub fn create_inline(buffer: &mut CommandBuffer, args: DrawIndexedArgs) {
        Self::create_inline_multi(buffer, &[args]);
    }

    /// Records `args.len()` indexed draws with inline arguments.
    pub fn create_inline_multi(buffer: &mut CommandBuffer, args: &[DrawIndexedArgs]) {
        debug_assert!(!args.is_empty());
        let (payload, aux) =
            buffer.add_command_with_aux::<Self>((args.len() * size_of::<DrawIndexedArgs>()) as u32);
        *payload = Self {
            indirect_buffer: BufferHandle::NONE,
            indirect_offset: 0,
            draw_count: args.len() as u32,
        };
        aux.copy_from_slice(bytemuck::cast_slice(args));
    }

    /// Inline draw arguments, or `None` when an indirect buffer is
    /// referenced instead.
    #[inline]
    pub fn inline_args<'a>(&self, packet: &Packet<'a>) -> Option<&'a [DrawIndexedArgs]> {
        if self.indirect_buffer.is_none() {
            Some(packet.aux_records::<Self, DrawIndexedArgs>(self.draw_count))
        } else {
            None
        }
    }
}
