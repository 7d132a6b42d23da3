//! Debug marker / event descriptors.
//!
//! Markers tag a single point in the stream; begin/end events bracket a
//! region for GPU debuggers (RenderDoc, PIX). Without the `debug-events`
//! feature every `create` below compiles to a no-op, so shipping builds
//! record nothing.

use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};

use crate::command::CommandBuffer;
use crate::command::descriptors::CommandDescriptor;
use crate::command::dispatch::DispatchId;

/// Byte size of the fixed, NUL-padded name field debug packets carry. The
/// name lives inside the packet so nothing external has to stay alive.
pub const DEBUG_NAME_LEN: usize = 64;

#[cfg(feature = "debug-events")]
fn name_bytes(name: &str) -> [u8; DEBUG_NAME_LEN] {
    let mut out = [0u8; DEBUG_NAME_LEN];
    // Keep at least one trailing NUL. Truncation may split a multi-byte
    // character; `name()` reads back lossily.
    let n = name.len().min(DEBUG_NAME_LEN - 1);
    out[..n].copy_from_slice(&name.as_bytes()[..n]);
    out
}

fn name_str(bytes: &[u8; DEBUG_NAME_LEN]) -> Cow<'_, str> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(DEBUG_NAME_LEN);
    String::from_utf8_lossy(&bytes[..end])
}

/// Tags a single point in the stream with a name.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct SetDebugMarker {
    pub name: [u8; DEBUG_NAME_LEN],
}

impl CommandDescriptor for SetDebugMarker {
    const DISPATCH_ID: DispatchId = DispatchId::SetDebugMarker;
}

impl SetDebugMarker {
    /// Records a debug marker; truncates `name` to fit the packet.
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, name: &str) {
        #[cfg(feature = "debug-events")]
        {
            *buffer.add_command::<Self>(0) = Self {
                name: name_bytes(name),
            };
        }
        #[cfg(not(feature = "debug-events"))]
        {
            let _ = (buffer, name);
        }
    }

    #[inline]
    pub fn name(&self) -> Cow<'_, str> {
        name_str(&self.name)
    }
}

/// Opens a named event region; close it with [`EndDebugEvent`].
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct BeginDebugEvent {
    pub name: [u8; DEBUG_NAME_LEN],
}

impl CommandDescriptor for BeginDebugEvent {
    const DISPATCH_ID: DispatchId = DispatchId::BeginDebugEvent;
}

impl BeginDebugEvent {
    /// Records the start of an event region; truncates `name` to fit.
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, name: &str) {
        #[cfg(feature = "debug-events")]
        {
            *buffer.add_command::<Self>(0) = Self {
                name: name_bytes(name),
            };
        }
        #[cfg(not(feature = "debug-events"))]
        {
            let _ = (buffer, name);
        }
    }

    #[inline]
    pub fn name(&self) -> Cow<'_, str> {
        name_str(&self.name)
    }
}

/// Closes the innermost open event region.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct EndDebugEvent {}

impl CommandDescriptor for EndDebugEvent {
    const DISPATCH_ID: DispatchId = DispatchId::EndDebugEvent;
}

impl EndDebugEvent {
    #[inline]
    pub fn create(buffer: &mut CommandBuffer) {
        #[cfg(feature = "debug-events")]
        {
            *buffer.add_command::<Self>(0) = Self {};
        }
        #[cfg(not(feature = "debug-events"))]
        {
            let _ = buffer;
        }
    }
}

#[cfg(all(test, feature = "debug-events"))]
mod tests {
    use super::*;
    use crate::command::packet;

    #[test]
    fn marker_name_round_trips() {
        let mut buffer = CommandBuffer::new();
        SetDebugMarker::create(&mut buffer, "shadow pass");

        let cmd: &SetDebugMarker = packet::payload(buffer.packet_bytes(), 0);
        assert_eq!(cmd.name(), "shadow pass");
    }

    #[test]
    fn overlong_names_are_truncated_with_a_trailing_nul() {
        let long = "x".repeat(200);
        let mut buffer = CommandBuffer::new();
        BeginDebugEvent::create(&mut buffer, &long);

        let cmd: &BeginDebugEvent = packet::payload(buffer.packet_bytes(), 0);
        assert_eq!(cmd.name().len(), DEBUG_NAME_LEN - 1);
        assert_eq!(cmd.name, name_bytes(&long));
    }

    #[test]
    fn event_pair_records_two_packets() {
        let mut buffer = CommandBuffer::new();
        BeginDebugEvent::create(&mut buffer, "frame");
        EndDebugEvent::create(&mut buffer);

        let bytes = buffer.packet_bytes();
        assert_eq!(
            packet::read_dispatch(bytes, 0),
            DispatchId::BeginDebugEvent as u32
        );
        let end_at = packet::read_next(bytes, 0);
        assert_eq!(
            packet::read_dispatch(bytes, end_at),
            DispatchId::EndDebugEvent as u32
        );
        assert_eq!(packet::read_next(bytes, end_at), packet::SENTINEL);
    }
}
