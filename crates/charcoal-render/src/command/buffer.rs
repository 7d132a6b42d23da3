//! Command buffer: the public recording / merge / submission API.

use super::arena::CommandArena;
use super::descriptors::CommandDescriptor;
use super::dispatch::Renderer;
use super::packet::{self, SENTINEL};

/// Append-only, type-erased log of renderer operations.
///
/// Recording appends fixed-layout packets to a private byte arena and links
/// them into a singly linked chain; execution order is exactly recording
/// order. A buffer is either cleared and refilled every frame or recorded
/// once and submitted many times — submission never mutates it.
///
/// A `CommandBuffer` is single-threaded. For parallel recording, give each
/// worker its own buffer and merge them afterwards with
/// [`submit_to_command_buffer`](Self::submit_to_command_buffer).
#[derive(Debug, Default)]
pub struct CommandBuffer {
    arena: CommandArena,
    #[cfg(feature = "statistics")]
    num_commands: u32,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff no command has been recorded since construction or the
    /// last [`clear`](Self::clear).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Commands recorded since the last [`clear`](Self::clear).
    #[cfg(feature = "statistics")]
    #[inline]
    pub fn num_commands(&self) -> u32 {
        self.num_commands
    }

    /// Appends a packet for descriptor `T` with `aux_bytes` auxiliary bytes
    /// and returns the payload for the caller to fill in.
    ///
    /// The reference is only valid until the next recording call; a later
    /// append may grow the arena and relocate all prior bytes. The borrow
    /// checker enforces this.
    pub fn add_command<T: CommandDescriptor>(&mut self, aux_bytes: u32) -> &mut T {
        let at = self.append_packet::<T>(aux_bytes);
        packet::payload_mut(self.arena.bytes_mut(), at)
    }

    /// Like [`add_command`](Self::add_command), additionally returning the
    /// packet's auxiliary bytes for inline array payloads.
    pub fn add_command_with_aux<T: CommandDescriptor>(
        &mut self,
        aux_bytes: u32,
    ) -> (&mut T, &mut [u8]) {
        let at = self.append_packet::<T>(aux_bytes);
        packet::payload_and_aux_mut(self.arena.bytes_mut(), at, aux_bytes)
    }

    /// Forgets all recorded commands without releasing the backing
    /// allocation, so per-frame reuse does not churn the heap.
    pub fn clear(&mut self) {
        self.arena.clear();
        #[cfg(feature = "statistics")]
        {
            self.num_commands = 0;
        }
    }

    /// Raw packet stream for a dispatcher: bytes `0..write_offset`.
    #[inline]
    pub fn packet_bytes(&self) -> &[u8] {
        self.arena.bytes()
    }

    /// Hands the recorded stream to a backend. Does not mutate the buffer,
    /// so a buffer recorded once can be submitted many times.
    pub fn submit_to_renderer(&self, renderer: &mut impl Renderer) {
        renderer.submit(self.packet_bytes());
    }

    /// Submits, then clears for the next frame.
    pub fn submit_to_renderer_and_clear(&mut self, renderer: &mut impl Renderer) {
        self.submit_to_renderer(renderer);
        self.clear();
    }

    /// Appends this buffer's entire packet chain onto `target`.
    ///
    /// The source bytes are copied in one burst; because `next` links are
    /// absolute offsets into the owning arena, the copy is followed by a
    /// relink pass (proportional to the number of source packets, not
    /// bytes) that shifts every copied link by the target's pre-append
    /// write offset. The source is left untouched.
    ///
    /// Submitting a buffer into itself is ruled out by the borrow checker
    /// (`&self` and `&mut target` cannot alias).
    ///
    /// # Panics
    /// When this buffer is empty.
    pub fn submit_to_command_buffer(&self, target: &mut CommandBuffer) {
        assert!(!self.is_empty(), "submitting an empty command buffer");

        let src = self.arena.bytes();
        let prev_tail = target.arena.last_packet_offset();
        let base = target.arena.reserve(self.arena.write_offset());
        let dst = target.arena.bytes_mut();

        dst[base as usize..base as usize + src.len()].copy_from_slice(src);

        // Stitch the old chain onto the copied region.
        if prev_tail != SENTINEL {
            packet::write_next(dst, prev_tail, base);
        }

        // Relink: the copied `next` fields still point into the source
        // arena; shift each one by `base`.
        let mut at = base;
        loop {
            let next = packet::read_next(dst, at);
            if next == SENTINEL {
                break;
            }
            packet::write_next(dst, at, next + base);
            at = next + base;
        }

        target
            .arena
            .set_last_packet_offset(base + self.arena.last_packet_offset());
        #[cfg(feature = "statistics")]
        {
            target.num_commands += self.num_commands;
        }
    }

    /// Merges into `target`, then clears this buffer.
    pub fn submit_to_command_buffer_and_clear(&mut self, target: &mut CommandBuffer) {
        self.submit_to_command_buffer(target);
        self.clear();
    }

    fn append_packet<T: CommandDescriptor>(&mut self, aux_bytes: u32) -> u32 {
        let need = packet::bytes_needed::<T>(aux_bytes);
        let prev_tail = self.arena.last_packet_offset();
        let at = self.arena.reserve(need);

        let bytes = self.arena.bytes_mut();
        packet::write_next(bytes, at, SENTINEL);
        packet::write_dispatch(bytes, at, T::DISPATCH_ID as u32);
        if prev_tail != SENTINEL {
            packet::write_next(bytes, prev_tail, at);
        }

        self.arena.set_last_packet_offset(at);
        #[cfg(feature = "statistics")]
        {
            self.num_commands += 1;
        }
        at
    }
}
