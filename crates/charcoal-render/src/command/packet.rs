//! Binary packet layout.
//!
//! Every recorded command is one variable-length packet:
//!
//! | offset          | field    | type             |
//! |-----------------|----------|------------------|
//! | 0               | next     | u32 (`SENTINEL` = end of chain) |
//! | 4               | dispatch | u32              |
//! | 8               | payload  | `size_of::<T>()` bytes |
//! | 8 + sizeof(T)   | aux      | 0..N bytes       |
//!
//! Accessors are offset-based rather than pointer-based: the arena may move
//! on growth, so nothing in this module holds a pointer across calls.
//! There is no bounds checking beyond slice indexing; callers pass offsets
//! they obtained from recording.

use bytemuck::Pod;

/// "No next packet" marker; also the exclusive ceiling of the offset space.
pub const SENTINEL: u32 = u32::MAX;

/// Byte size of the fixed packet header.
pub const HEADER_SIZE: u32 = 8;

/// Packets start on 8-byte boundaries so payload references are properly
/// aligned for every descriptor type (largest field is a u64 handle).
/// The padding this adds between packets is unreachable: the walk only
/// follows explicit `next` links.
pub const PACKET_ALIGN: u32 = 8;

const NEXT_OFFSET: usize = 0;
const DISPATCH_OFFSET: usize = 4;

/// Total bytes a packet with payload `T` plus `aux_bytes` auxiliary bytes
/// occupies, rounded up to [`PACKET_ALIGN`].
#[inline]
pub const fn bytes_needed<T>(aux_bytes: u32) -> u32 {
    let mask = (PACKET_ALIGN - 1) as u64;
    let raw = HEADER_SIZE as u64 + size_of::<T>() as u64 + aux_bytes as u64;
    let padded = (raw + mask) & !mask;
    assert!(padded < SENTINEL as u64, "packet size exceeds the 32-bit offset space");
    padded as u32
}

/// Byte offset of the payload region of the packet starting at `at`.
#[inline]
pub const fn payload_offset(at: u32) -> usize {
    at as usize + HEADER_SIZE as usize
}

#[inline]
pub fn read_next(bytes: &[u8], at: u32) -> u32 {
    read_u32(bytes, at as usize + NEXT_OFFSET)
}

#[inline]
pub fn write_next(bytes: &mut [u8], at: u32, value: u32) {
    write_u32(bytes, at as usize + NEXT_OFFSET, value);
}

#[inline]
pub fn read_dispatch(bytes: &[u8], at: u32) -> u32 {
    read_u32(bytes, at as usize + DISPATCH_OFFSET)
}

#[inline]
pub fn write_dispatch(bytes: &mut [u8], at: u32, value: u32) {
    write_u32(bytes, at as usize + DISPATCH_OFFSET, value);
}

/// Reinterprets the payload region of the packet starting at `at`.
#[inline]
pub fn payload<T: Pod>(bytes: &[u8], at: u32) -> &T {
    let start = payload_offset(at);
    bytemuck::from_bytes(&bytes[start..start + size_of::<T>()])
}

#[inline]
pub fn payload_mut<T: Pod>(bytes: &mut [u8], at: u32) -> &mut T {
    let start = payload_offset(at);
    bytemuck::from_bytes_mut(&mut bytes[start..start + size_of::<T>()])
}

/// Splits the packet starting at `at` into its payload and the `aux_bytes`
/// auxiliary bytes immediately following it.
#[inline]
pub fn payload_and_aux_mut<T: Pod>(
    bytes: &mut [u8],
    at: u32,
    aux_bytes: u32,
) -> (&mut T, &mut [u8]) {
    let aux_start = payload_offset(at) + size_of::<T>();
    let (head, tail) = bytes.split_at_mut(aux_start);
    let payload = bytemuck::from_bytes_mut(&mut head[payload_offset(at)..]);
    (payload, &mut tail[..aux_bytes as usize])
}

#[inline]
fn read_u32(bytes: &[u8], start: usize) -> u32 {
    bytemuck::pod_read_unaligned(&bytes[start..start + 4])
}

#[inline]
fn write_u32(bytes: &mut [u8], start: usize, value: u32) {
    bytes[start..start + 4].copy_from_slice(bytemuck::bytes_of(&value));
}
