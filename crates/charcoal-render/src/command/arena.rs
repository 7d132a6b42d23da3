//! Byte arena beneath `CommandBuffer`.
//!
//! One contiguous growable block plus append bookkeeping. Storage is a
//! `Vec<u64>` viewed as bytes so the block base is 8-byte aligned and
//! packet payloads can be referenced directly out of the arena (packet
//! sizes are already rounded to 8, see `packet::PACKET_ALIGN`).

use super::packet::SENTINEL;

/// Bytes added on top of the missing amount whenever the block grows.
/// Tunable; affects only allocation amortization, never correctness.
pub(crate) const GROWTH_QUANTUM: u32 = 8192;

/// Growable byte block plus append bookkeeping.
///
/// Invariant: walking from offset 0 via each packet's `next` field visits
/// every appended packet exactly once, in append order, ending at
/// [`SENTINEL`].
#[derive(Debug)]
pub(crate) struct CommandArena {
    data: Vec<u64>,
    /// Byte index of the next free position.
    write_offset: u32,
    /// Byte index of the most recently appended packet header, or
    /// [`SENTINEL`] when the arena holds no packets.
    last_packet_offset: u32,
}

impl CommandArena {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            write_offset: 0,
            last_packet_offset: SENTINEL,
        }
    }

    #[inline]
    pub fn write_offset(&self) -> u32 {
        self.write_offset
    }

    #[inline]
    pub fn last_packet_offset(&self) -> u32 {
        self.last_packet_offset
    }

    #[inline]
    pub fn set_last_packet_offset(&mut self, at: u32) {
        self.last_packet_offset = at;
    }

    /// Emptiness is defined by the packet chain alone, not by `write_offset`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.last_packet_offset == SENTINEL
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        (self.data.len() * size_of::<u64>()) as u32
    }

    /// Written bytes, `0..write_offset`.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.data)[..self.write_offset as usize]
    }

    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.data)[..self.write_offset as usize]
    }

    /// Reserves `need` bytes at the current write offset, growing the block
    /// by `GROWTH_QUANTUM + need` when it does not fit. Growth preserves
    /// every previously written byte. Returns the byte offset of the
    /// reserved region.
    ///
    /// # Panics
    /// When the reservation would reach the 32-bit offset ceiling. That is
    /// a contract violation: a single buffer is limited to just under
    /// 4 GiB by the packet header's `next` field width.
    pub fn reserve(&mut self, need: u32) -> u32 {
        let end = self.write_offset as u64 + need as u64;
        assert!(
            end < SENTINEL as u64,
            "command arena exceeds the 32-bit offset space"
        );

        if (self.capacity() as u64) < end {
            let grow = (GROWTH_QUANTUM + need) as usize;
            let words = grow.div_ceil(size_of::<u64>());
            self.data.resize(self.data.len() + words, 0);
        }

        let at = self.write_offset;
        self.write_offset = end as u32;
        at
    }

    /// Forgets all packets but keeps the backing allocation for reuse.
    pub fn clear(&mut self) {
        self.write_offset = 0;
        self.last_packet_offset = SENTINEL;
    }
}

impl Default for CommandArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── reserve ───────────────────────────────────────────────────────────

    #[test]
    fn reserve_returns_consecutive_offsets() {
        let mut arena = CommandArena::new();
        assert_eq!(arena.reserve(16), 0);
        assert_eq!(arena.reserve(24), 16);
        assert_eq!(arena.write_offset(), 40);
    }

    #[test]
    fn first_reserve_grows_by_quantum_plus_need() {
        let mut arena = CommandArena::new();
        arena.reserve(16);
        assert_eq!(arena.capacity(), GROWTH_QUANTUM + 16);
    }

    #[test]
    fn growth_preserves_written_bytes() {
        let mut arena = CommandArena::new();
        let at = arena.reserve(16);
        arena.bytes_mut()[at as usize..16].copy_from_slice(&[0xabu8; 16]);

        // Force a second allocation.
        arena.reserve(2 * GROWTH_QUANTUM);
        assert_eq!(&arena.bytes()[..16], &[0xabu8; 16]);
    }

    #[test]
    fn oversized_single_reservation_fits() {
        let mut arena = CommandArena::new();
        let need = 3 * GROWTH_QUANTUM;
        arena.reserve(need);
        assert!(arena.capacity() >= need);
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_resets_offsets_but_keeps_capacity() {
        let mut arena = CommandArena::new();
        arena.reserve(64);
        arena.set_last_packet_offset(0);
        let capacity = arena.capacity();

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.write_offset(), 0);
        assert_eq!(arena.last_packet_offset(), SENTINEL);
        assert_eq!(arena.capacity(), capacity);
    }

    #[test]
    fn empty_until_a_packet_is_linked() {
        let mut arena = CommandArena::new();
        assert!(arena.is_empty());
        arena.reserve(16);
        // Reserving bytes alone does not make the arena non-empty.
        assert!(arena.is_empty());
        arena.set_last_packet_offset(0);
        assert!(!arena.is_empty());
    }
}
