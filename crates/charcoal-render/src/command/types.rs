//! Plain value records embedded in command packets.
//!
//! Everything here is `Pod`: packets are raw bytes, so each record must be
//! valid for any bit pattern and free of padding.

use core::ops::BitOr;

use bytemuck::{Pod, Zeroable};

/// One rasterizer viewport, in render-target pixels.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Viewport {
    pub top_left_x: f32,
    pub top_left_y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Viewport covering the full 0..1 depth range.
    #[inline]
    pub const fn new(top_left_x: f32, top_left_y: f32, width: f32, height: f32) -> Self {
        Self {
            top_left_x,
            top_left_y,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// One scissor rectangle, in render-target pixels.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct ScissorRect {
    pub top_left_x: i32,
    pub top_left_y: i32,
    pub bottom_right_x: i32,
    pub bottom_right_y: i32,
}

impl ScissorRect {
    #[inline]
    pub const fn new(
        top_left_x: i32,
        top_left_y: i32,
        bottom_right_x: i32,
        bottom_right_y: i32,
    ) -> Self {
        Self {
            top_left_x,
            top_left_y,
            bottom_right_x,
            bottom_right_y,
        }
    }
}

/// Which attachments a `Clear` command touches.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct ClearFlags(pub u32);

impl ClearFlags {
    pub const COLOR: Self = Self(1 << 0);
    pub const DEPTH: Self = Self(1 << 1);
    pub const STENCIL: Self = Self(1 << 2);
    pub const COLOR_DEPTH: Self = Self(Self::COLOR.0 | Self::DEPTH.0);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ClearFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Arguments of one non-indexed draw; layout matches GPU indirect-draw
/// argument buffers.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct DrawArgs {
    pub vertex_count: u32,
    pub instance_count: u32,
    pub start_vertex: u32,
    pub start_instance: u32,
}

impl DrawArgs {
    /// Single instance starting at vertex 0.
    #[inline]
    pub const fn new(vertex_count: u32) -> Self {
        Self {
            vertex_count,
            instance_count: 1,
            start_vertex: 0,
            start_instance: 0,
        }
    }
}

/// Arguments of one indexed draw; layout matches GPU indirect-draw
/// argument buffers.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct DrawIndexedArgs {
    pub index_count: u32,
    pub instance_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
    pub start_instance: u32,
}

impl DrawIndexedArgs {
    /// Single instance starting at index 0.
    #[inline]
    pub const fn new(index_count: u32) -> Self {
        Self {
            index_count,
            instance_count: 1,
            start_index: 0,
            base_vertex: 0,
            start_instance: 0,
        }
    }
}
