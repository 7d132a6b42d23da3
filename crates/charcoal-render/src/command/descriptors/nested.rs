//! Nested command buffer execution.

use bytemuck::{Pod, Zeroable};

use crate::command::CommandBuffer;
use crate::command::descriptors::CommandDescriptor;
use crate::command::dispatch::DispatchId;

/// Executes another recorded command buffer in place.
///
/// This lets a reusable sub-sequence be recorded once and referenced from
/// many parent sequences through a single lightweight packet, instead of
/// merging its bytes into every parent. The packet stores the nested
/// buffer's address only; the caller must keep that buffer alive, and
/// must not record into it, until every submission of the parent has
/// finished.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct ExecuteCommandBuffer {
    pub command_buffer: u64,
}

impl CommandDescriptor for ExecuteCommandBuffer {
    const DISPATCH_ID: DispatchId = DispatchId::ExecuteCommandBuffer;
}

impl ExecuteCommandBuffer {
    /// Records execution of `nested` inside `buffer`'s stream.
    ///
    /// # Panics
    /// When `nested` is empty; an empty nested execution is a recording
    /// bug, not a runtime condition.
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, nested: &CommandBuffer) {
        assert!(!nested.is_empty(), "executing an empty command buffer");
        *buffer.add_command::<Self>(0) = Self {
            command_buffer: nested as *const CommandBuffer as u64,
        };
    }

    /// Resolves the recorded buffer for dispatch.
    ///
    /// # Safety
    /// The caller must guarantee the buffer recorded by
    /// [`create`](Self::create) is still alive and not being mutated; only
    /// its address was stored.
    #[inline]
    pub unsafe fn resolve<'a>(&self) -> &'a CommandBuffer {
        debug_assert!(self.command_buffer != 0);
        unsafe { &*(self.command_buffer as *const CommandBuffer) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::descriptors::SetPipeline;
    use crate::command::packet;
    use crate::resource::PipelineHandle;

    #[test]
    fn stores_the_nested_buffer_address() {
        let mut nested = CommandBuffer::new();
        SetPipeline::create(&mut nested, PipelineHandle::new(5));

        let mut parent = CommandBuffer::new();
        ExecuteCommandBuffer::create(&mut parent, &nested);

        let cmd: &ExecuteCommandBuffer = packet::payload(parent.packet_bytes(), 0);
        assert_eq!(cmd.command_buffer, &nested as *const CommandBuffer as u64);

        let resolved = unsafe { cmd.resolve() };
        assert_eq!(resolved.packet_bytes(), nested.packet_bytes());
    }

    #[test]
    #[should_panic(expected = "empty command buffer")]
    fn empty_nested_buffer_is_a_contract_violation() {
        let nested = CommandBuffer::new();
        let mut parent = CommandBuffer::new();
        ExecuteCommandBuffer::create(&mut parent, &nested);
    }
}
