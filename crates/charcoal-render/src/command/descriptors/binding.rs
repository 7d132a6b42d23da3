//! State-binding descriptors.

use bytemuck::{Pod, Zeroable};

use crate::command::CommandBuffer;
use crate::command::descriptors::CommandDescriptor;
use crate::command::dispatch::DispatchId;
use crate::resource::{
    PipelineHandle, ResourceGroupHandle, RootSignatureHandle, TextureHandle, VertexArrayHandle,
};

/// Binds the root signature (descriptor layout) for subsequent commands.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct SetRootSignature {
    pub root_signature: RootSignatureHandle,
}

impl CommandDescriptor for SetRootSignature {
    const DISPATCH_ID: DispatchId = DispatchId::SetRootSignature;
}

impl SetRootSignature {
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, root_signature: RootSignatureHandle) {
        *buffer.add_command::<Self>(0) = Self { root_signature };
    }
}

/// Binds a resource group to a root parameter slot.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct SetResourceGroup {
    pub resource_group: ResourceGroupHandle,
    pub root_parameter_index: u32,
    pub _pad: u32,
}

impl CommandDescriptor for SetResourceGroup {
    const DISPATCH_ID: DispatchId = DispatchId::SetResourceGroup;
}

impl SetResourceGroup {
    #[inline]
    pub fn create(
        buffer: &mut CommandBuffer,
        root_parameter_index: u32,
        resource_group: ResourceGroupHandle,
    ) {
        *buffer.add_command::<Self>(0) = Self {
            resource_group,
            root_parameter_index,
            _pad: 0,
        };
    }
}

/// Binds a compiled graphics pipeline state.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct SetPipeline {
    pub pipeline: PipelineHandle,
}

impl CommandDescriptor for SetPipeline {
    const DISPATCH_ID: DispatchId = DispatchId::SetPipeline;
}

impl SetPipeline {
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, pipeline: PipelineHandle) {
        *buffer.add_command::<Self>(0) = Self { pipeline };
    }
}

/// Binds a vertex array (vertex/index buffer set).
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct SetVertexArray {
    pub vertex_array: VertexArrayHandle,
}

impl CommandDescriptor for SetVertexArray {
    const DISPATCH_ID: DispatchId = DispatchId::SetVertexArray;
}

impl SetVertexArray {
    #[inline]
    pub fn create(buffer: &mut CommandBuffer, vertex_array: VertexArrayHandle) {
        *buffer.add_command::<Self>(0) = Self { vertex_array };
    }
}

/// Restricts sampling of a texture to a mipmap index range, e.g. while the
/// streaming system has only coarse mips resident.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct SetTextureMipRange {
    pub texture: TextureHandle,
    pub minimum_mip: u32,
    pub maximum_mip: u32,
}

impl CommandDescriptor for SetTextureMipRange {
    const DISPATCH_ID: DispatchId = DispatchId::SetTextureMipRange;
}

impl SetTextureMipRange {
    #[inline]
    pub fn create(
        buffer: &mut CommandBuffer,
        texture: TextureHandle,
        minimum_mip: u32,
        maximum_mip: u32,
    ) {
        *buffer.add_command::<Self>(0) = Self {
            texture,
            minimum_mip,
            maximum_mip,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::packet;

    #[test]
    fn binding_payloads_round_trip() {
        let mut buffer = CommandBuffer::new();
        SetRootSignature::create(&mut buffer, RootSignatureHandle::new(3));
        SetResourceGroup::create(&mut buffer, 2, ResourceGroupHandle::new(4));

        let bytes = buffer.packet_bytes();
        let first: &SetRootSignature = packet::payload(bytes, 0);
        assert_eq!(first.root_signature, RootSignatureHandle::new(3));

        let second_at = packet::read_next(bytes, 0);
        let second: &SetResourceGroup = packet::payload(bytes, second_at);
        assert_eq!(second.root_parameter_index, 2);
        assert_eq!(second.resource_group, ResourceGroupHandle::new(4));
    }

    #[test]
    fn mip_range_round_trips() {
        let mut buffer = CommandBuffer::new();
        SetTextureMipRange::create(&mut buffer, TextureHandle::new(9), 2, 7);

        let cmd: &SetTextureMipRange = packet::payload(buffer.packet_bytes(), 0);
        assert_eq!(cmd.texture, TextureHandle::new(9));
        assert_eq!((cmd.minimum_mip, cmd.maximum_mip), (2, 7));
    }
}
