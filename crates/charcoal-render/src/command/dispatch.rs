//! Dispatch-time types: the index enum, the backend function table, and the
//! standard packet walk.
//!
//! A concrete backend builds one [`DispatchTable`] at startup and replays
//! recorded streams through [`execute`]. The walk is the hot path: it
//! indexes the table directly with each packet's stored dispatch index and
//! performs no per-packet allocation.

use bytemuck::Pod;

use super::packet;

/// Selects which backend entry interprets a packet's payload.
///
/// Stored in every packet header at 4-byte width. Extending the command
/// set means adding a variant here, a payload in `descriptors`, and a
/// handler field on [`DispatchHandlers`]; the compiler flags any table
/// that misses the new operation.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DispatchId {
    ExecuteCommandBuffer = 0,
    SetRootSignature,
    SetResourceGroup,
    SetPipeline,
    SetVertexArray,
    SetViewports,
    SetScissorRects,
    SetRenderTarget,
    Clear,
    ResolveMultisample,
    CopyResource,
    Draw,
    DrawIndexed,
    SetTextureMipRange,
    SetDebugMarker,
    BeginDebugEvent,
    EndDebugEvent,
}

impl DispatchId {
    /// Number of dispatch indices; also the table size.
    pub const COUNT: usize = 17;

    /// Recovers an id from its stored 4-byte form. `None` means the packet
    /// stream is corrupt or was recorded by an incompatible build.
    pub fn from_u32(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Self::ExecuteCommandBuffer,
            1 => Self::SetRootSignature,
            2 => Self::SetResourceGroup,
            3 => Self::SetPipeline,
            4 => Self::SetVertexArray,
            5 => Self::SetViewports,
            6 => Self::SetScissorRects,
            7 => Self::SetRenderTarget,
            8 => Self::Clear,
            9 => Self::ResolveMultisample,
            10 => Self::CopyResource,
            11 => Self::Draw,
            12 => Self::DrawIndexed,
            13 => Self::SetTextureMipRange,
            14 => Self::SetDebugMarker,
            15 => Self::BeginDebugEvent,
            16 => Self::EndDebugEvent,
            _ => return None,
        })
    }
}

/// Borrowed view of one packet's payload plus whatever follows it in the
/// arena (auxiliary bytes first).
#[derive(Copy, Clone)]
pub struct Packet<'a> {
    bytes: &'a [u8],
}

impl<'a> Packet<'a> {
    /// View of the packet starting at byte offset `at` of a recorded
    /// stream; the same view [`execute`] hands to a handler.
    #[inline]
    pub fn at(bytes: &'a [u8], at: u32) -> Self {
        Self {
            bytes: &bytes[packet::payload_offset(at)..],
        }
    }

    #[inline]
    pub fn payload<T: Pod>(&self) -> &'a T {
        bytemuck::from_bytes(&self.bytes[..size_of::<T>()])
    }

    /// The `count` auxiliary records of type `E` stored inline immediately
    /// after payload `T`.
    #[inline]
    pub fn aux_records<T: Pod, E: Pod>(&self, count: u32) -> &'a [E] {
        let start = size_of::<T>();
        let len = count as usize * size_of::<E>();
        bytemuck::cast_slice(&self.bytes[start..start + len])
    }
}

/// One backend entry: interprets a packet payload against backend state.
pub type DispatchFn<B> = fn(Packet<'_>, &mut B);

/// One handler per operation, by name.
///
/// This is the construction form of [`DispatchTable`]: a backend that
/// forgets an operation, or survives a command-set extension unchanged,
/// fails to compile instead of dispatching through a hole.
pub struct DispatchHandlers<B> {
    pub execute_command_buffer: DispatchFn<B>,
    pub set_root_signature: DispatchFn<B>,
    pub set_resource_group: DispatchFn<B>,
    pub set_pipeline: DispatchFn<B>,
    pub set_vertex_array: DispatchFn<B>,
    pub set_viewports: DispatchFn<B>,
    pub set_scissor_rects: DispatchFn<B>,
    pub set_render_target: DispatchFn<B>,
    pub clear: DispatchFn<B>,
    pub resolve_multisample: DispatchFn<B>,
    pub copy_resource: DispatchFn<B>,
    pub draw: DispatchFn<B>,
    pub draw_indexed: DispatchFn<B>,
    pub set_texture_mip_range: DispatchFn<B>,
    pub set_debug_marker: DispatchFn<B>,
    pub begin_debug_event: DispatchFn<B>,
    pub end_debug_event: DispatchFn<B>,
}

/// Fixed array of handlers indexed 1:1 by [`DispatchId`].
pub struct DispatchTable<B> {
    entries: [DispatchFn<B>; DispatchId::COUNT],
}

impl<B> DispatchTable<B> {
    pub fn new(handlers: DispatchHandlers<B>) -> Self {
        // Entry order must match the enum's discriminant order.
        Self {
            entries: [
                handlers.execute_command_buffer,
                handlers.set_root_signature,
                handlers.set_resource_group,
                handlers.set_pipeline,
                handlers.set_vertex_array,
                handlers.set_viewports,
                handlers.set_scissor_rects,
                handlers.set_render_target,
                handlers.clear,
                handlers.resolve_multisample,
                handlers.copy_resource,
                handlers.draw,
                handlers.draw_indexed,
                handlers.set_texture_mip_range,
                handlers.set_debug_marker,
                handlers.begin_debug_event,
                handlers.end_debug_event,
            ],
        }
    }

    #[inline]
    pub fn get(&self, id: DispatchId) -> DispatchFn<B> {
        self.entries[id as usize]
    }
}

/// Seam between recorded buffers and a concrete backend.
///
/// A typical implementation owns a [`DispatchTable`] plus native API state
/// and calls [`execute`] from `submit`.
pub trait Renderer {
    fn submit(&mut self, packets: &[u8]);
}

/// Standard dispatcher walk over a recorded packet stream.
///
/// Starts at offset 0 and follows each packet's `next` link until the
/// sentinel, invoking the table entry selected by its dispatch index.
///
/// # Panics
/// On a stored dispatch index no [`DispatchId`] maps to; that stream is
/// corrupt or from an incompatible build.
pub fn execute<B>(bytes: &[u8], table: &DispatchTable<B>, backend: &mut B) {
    if bytes.is_empty() {
        return;
    }

    let mut at = 0u32;
    loop {
        let raw = packet::read_dispatch(bytes, at);
        let Some(id) = DispatchId::from_u32(raw) else {
            panic!("stale dispatch index {raw} at packet offset {at}");
        };

        (table.get(id))(Packet::at(bytes, at), backend);

        let next = packet::read_next(bytes, at);
        if next == packet::SENTINEL {
            break;
        }
        at = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandBuffer;
    use crate::command::descriptors::{
        Clear, Draw, ExecuteCommandBuffer, SetPipeline, SetViewports,
    };
    use crate::command::types::{ClearFlags, DrawArgs};
    use crate::resource::PipelineHandle;

    /// Table whose handlers append the dispatched id to the backend vec.
    fn recording_table() -> DispatchTable<Vec<DispatchId>> {
        type B = Vec<DispatchId>;
        fn push(id: DispatchId) -> DispatchFn<B> {
            match id {
                DispatchId::ExecuteCommandBuffer => |p, b| {
                    b.push(DispatchId::ExecuteCommandBuffer);
                    let cmd: &ExecuteCommandBuffer = p.payload();
                    let nested = unsafe { cmd.resolve() };
                    execute(nested.packet_bytes(), &recording_table(), b);
                },
                DispatchId::SetRootSignature => |_, b| b.push(DispatchId::SetRootSignature),
                DispatchId::SetResourceGroup => |_, b| b.push(DispatchId::SetResourceGroup),
                DispatchId::SetPipeline => |_, b| b.push(DispatchId::SetPipeline),
                DispatchId::SetVertexArray => |_, b| b.push(DispatchId::SetVertexArray),
                DispatchId::SetViewports => |_, b| b.push(DispatchId::SetViewports),
                DispatchId::SetScissorRects => |_, b| b.push(DispatchId::SetScissorRects),
                DispatchId::SetRenderTarget => |_, b| b.push(DispatchId::SetRenderTarget),
                DispatchId::Clear => |_, b| b.push(DispatchId::Clear),
                DispatchId::ResolveMultisample => |_, b| b.push(DispatchId::ResolveMultisample),
                DispatchId::CopyResource => |_, b| b.push(DispatchId::CopyResource),
                DispatchId::Draw => |_, b| b.push(DispatchId::Draw),
                DispatchId::DrawIndexed => |_, b| b.push(DispatchId::DrawIndexed),
                DispatchId::SetTextureMipRange => |_, b| b.push(DispatchId::SetTextureMipRange),
                DispatchId::SetDebugMarker => |_, b| b.push(DispatchId::SetDebugMarker),
                DispatchId::BeginDebugEvent => |_, b| b.push(DispatchId::BeginDebugEvent),
                DispatchId::EndDebugEvent => |_, b| b.push(DispatchId::EndDebugEvent),
            }
        }

        DispatchTable::new(DispatchHandlers {
            execute_command_buffer: push(DispatchId::ExecuteCommandBuffer),
            set_root_signature: push(DispatchId::SetRootSignature),
            set_resource_group: push(DispatchId::SetResourceGroup),
            set_pipeline: push(DispatchId::SetPipeline),
            set_vertex_array: push(DispatchId::SetVertexArray),
            set_viewports: push(DispatchId::SetViewports),
            set_scissor_rects: push(DispatchId::SetScissorRects),
            set_render_target: push(DispatchId::SetRenderTarget),
            clear: push(DispatchId::Clear),
            resolve_multisample: push(DispatchId::ResolveMultisample),
            copy_resource: push(DispatchId::CopyResource),
            draw: push(DispatchId::Draw),
            draw_indexed: push(DispatchId::DrawIndexed),
            set_texture_mip_range: push(DispatchId::SetTextureMipRange),
            set_debug_marker: push(DispatchId::SetDebugMarker),
            begin_debug_event: push(DispatchId::BeginDebugEvent),
            end_debug_event: push(DispatchId::EndDebugEvent),
        })
    }

    // ── DispatchId ────────────────────────────────────────────────────────

    #[test]
    fn from_u32_round_trips_every_id() {
        for raw in 0..DispatchId::COUNT as u32 {
            let id = DispatchId::from_u32(raw).unwrap();
            assert_eq!(id as u32, raw);
        }
        assert_eq!(DispatchId::from_u32(DispatchId::COUNT as u32), None);
    }

    #[test]
    fn table_entries_match_enum_order() {
        let table = recording_table();
        let empty = Packet { bytes: &[0u8; 64][..] };

        for raw in 0..DispatchId::COUNT as u32 {
            let id = DispatchId::from_u32(raw).unwrap();
            if id == DispatchId::ExecuteCommandBuffer {
                // Needs a live nested buffer; covered separately.
                continue;
            }
            let mut seen = Vec::new();
            (table.get(id))(empty, &mut seen);
            assert_eq!(seen, [id]);
        }
    }

    // ── execute ───────────────────────────────────────────────────────────

    #[test]
    fn executes_packets_in_recording_order() {
        let mut buffer = CommandBuffer::new();
        SetPipeline::create(&mut buffer, PipelineHandle::new(1));
        SetViewports::create_single(&mut buffer, 0.0, 0.0, 640.0, 480.0);
        Clear::create(&mut buffer, ClearFlags::COLOR, [0.0; 4], 1.0, 0);
        Draw::create_inline(&mut buffer, DrawArgs::new(3));

        let mut seen = Vec::new();
        execute(buffer.packet_bytes(), &recording_table(), &mut seen);
        assert_eq!(
            seen,
            [
                DispatchId::SetPipeline,
                DispatchId::SetViewports,
                DispatchId::Clear,
                DispatchId::Draw,
            ]
        );
    }

    #[test]
    fn executing_an_empty_stream_is_a_no_op() {
        let buffer = CommandBuffer::new();
        let mut seen = Vec::new();
        execute(buffer.packet_bytes(), &recording_table(), &mut seen);
        assert!(seen.is_empty());
    }

    #[test]
    fn nested_buffer_executes_in_place() {
        let mut nested = CommandBuffer::new();
        SetPipeline::create(&mut nested, PipelineHandle::new(7));
        Draw::create_inline(&mut nested, DrawArgs::new(6));

        let mut parent = CommandBuffer::new();
        Clear::create(&mut parent, ClearFlags::COLOR, [0.0; 4], 1.0, 0);
        ExecuteCommandBuffer::create(&mut parent, &nested);
        Draw::create_inline(&mut parent, DrawArgs::new(3));

        let mut seen = Vec::new();
        execute(parent.packet_bytes(), &recording_table(), &mut seen);
        assert_eq!(
            seen,
            [
                DispatchId::Clear,
                DispatchId::ExecuteCommandBuffer,
                DispatchId::SetPipeline,
                DispatchId::Draw,
                DispatchId::Draw,
            ]
        );
    }

    #[test]
    #[should_panic(expected = "stale dispatch index")]
    fn stale_dispatch_index_is_fatal() {
        // Hand-craft a single packet with an out-of-range index.
        let mut bytes = vec![0u8; 16];
        bytes[0..4].copy_from_slice(&u32::MAX.to_ne_bytes());
        bytes[4..8].copy_from_slice(&999u32.to_ne_bytes());

        let mut seen: Vec<DispatchId> = Vec::new();
        execute(&bytes, &recording_table(), &mut seen);
    }
}
