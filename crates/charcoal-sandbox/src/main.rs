//! Headless fork-join recording demo.
//!
//! Worker threads each record a private command buffer in parallel; the
//! main thread merges them in worker order into one frame buffer, appends
//! a shared post-process sub-sequence as a nested execution, and submits
//! the result twice (record once, submit many) to a backend that logs and
//! counts every dispatched operation.

use anyhow::{Result, anyhow};
use charcoal_render::command::descriptors::{
    BeginDebugEvent, Clear, Draw, EndDebugEvent, ExecuteCommandBuffer, SetPipeline,
    SetRenderTarget, SetResourceGroup, SetRootSignature, SetScissorRects, SetViewports,
};
use charcoal_render::command::types::{ClearFlags, DrawArgs, ScissorRect};
use charcoal_render::command::{
    CommandBuffer, DispatchHandlers, DispatchId, DispatchTable, Renderer, execute,
};
use charcoal_render::logging::{LoggingConfig, init_logging};
use charcoal_render::resource::{
    PipelineHandle, RenderTargetHandle, ResourceGroupHandle, RootSignatureHandle,
};

const WORKERS: u64 = 4;
const DRAWS_PER_WORKER: u32 = 8;

/// Dispatch statistics accumulated by the logging backend.
#[derive(Default)]
struct Stats {
    op_counts: [u32; DispatchId::COUNT],
    vertices: u64,
}

fn log_table() -> DispatchTable<Stats> {
    DispatchTable::new(DispatchHandlers {
        execute_command_buffer: |p, stats| {
            stats.op_counts[DispatchId::ExecuteCommandBuffer as usize] += 1;
            let cmd: &ExecuteCommandBuffer = p.payload();
            log::debug!("execute nested command buffer");
            // The sandbox keeps every nested buffer alive across submission.
            let nested = unsafe { cmd.resolve() };
            execute(nested.packet_bytes(), &log_table(), stats);
        },
        set_root_signature: |_, stats| {
            stats.op_counts[DispatchId::SetRootSignature as usize] += 1;
            log::debug!("set root signature");
        },
        set_resource_group: |_, stats| {
            stats.op_counts[DispatchId::SetResourceGroup as usize] += 1;
            log::debug!("set resource group");
        },
        set_pipeline: |p, stats| {
            stats.op_counts[DispatchId::SetPipeline as usize] += 1;
            let cmd: &SetPipeline = p.payload();
            log::debug!("set pipeline {:?}", cmd.pipeline);
        },
        set_vertex_array: |_, stats| {
            stats.op_counts[DispatchId::SetVertexArray as usize] += 1;
            log::debug!("set vertex array");
        },
        set_viewports: |p, stats| {
            stats.op_counts[DispatchId::SetViewports as usize] += 1;
            let cmd: &SetViewports = p.payload();
            log::debug!("set {} viewport(s)", cmd.count);
        },
        set_scissor_rects: |p, stats| {
            stats.op_counts[DispatchId::SetScissorRects as usize] += 1;
            let cmd: &SetScissorRects = p.payload();
            let rects = unsafe { cmd.records(&p) };
            log::debug!("set {} scissor rect(s)", rects.len());
        },
        set_render_target: |_, stats| {
            stats.op_counts[DispatchId::SetRenderTarget as usize] += 1;
            log::debug!("set render target");
        },
        clear: |p, stats| {
            stats.op_counts[DispatchId::Clear as usize] += 1;
            let cmd: &Clear = p.payload();
            log::debug!("clear (flags {:#b})", cmd.flags.0);
        },
        resolve_multisample: |_, stats| {
            stats.op_counts[DispatchId::ResolveMultisample as usize] += 1;
            log::debug!("resolve multisample framebuffer");
        },
        copy_resource: |_, stats| {
            stats.op_counts[DispatchId::CopyResource as usize] += 1;
            log::debug!("copy resource");
        },
        draw: |p, stats| {
            stats.op_counts[DispatchId::Draw as usize] += 1;
            let cmd: &Draw = p.payload();
            if let Some(args) = cmd.inline_args(&p) {
                for a in args {
                    stats.vertices += a.vertex_count as u64 * a.instance_count as u64;
                }
                log::debug!("draw, {} inline draw(s)", args.len());
            } else {
                log::debug!("draw, {} indirect draw(s)", cmd.draw_count);
            }
        },
        draw_indexed: |p, stats| {
            stats.op_counts[DispatchId::DrawIndexed as usize] += 1;
            let cmd: &charcoal_render::command::descriptors::DrawIndexed = p.payload();
            log::debug!("draw indexed, {} draw(s)", cmd.draw_count);
        },
        set_texture_mip_range: |_, stats| {
            stats.op_counts[DispatchId::SetTextureMipRange as usize] += 1;
            log::debug!("set texture mip range");
        },
        set_debug_marker: |p, stats| {
            stats.op_counts[DispatchId::SetDebugMarker as usize] += 1;
            let cmd: &charcoal_render::command::descriptors::SetDebugMarker = p.payload();
            log::debug!("marker '{}'", cmd.name());
        },
        begin_debug_event: |p, stats| {
            stats.op_counts[DispatchId::BeginDebugEvent as usize] += 1;
            let cmd: &BeginDebugEvent = p.payload();
            log::debug!("begin event '{}'", cmd.name());
        },
        end_debug_event: |_, stats| {
            stats.op_counts[DispatchId::EndDebugEvent as usize] += 1;
            log::debug!("end event");
        },
    })
}

/// Backend that replays streams through the logging dispatch table.
#[derive(Default)]
struct LogRenderer {
    stats: Stats,
    submissions: u32,
}

impl Renderer for LogRenderer {
    fn submit(&mut self, packets: &[u8]) {
        self.submissions += 1;
        execute(packets, &log_table(), &mut self.stats);
    }
}

/// Records one worker's slice of the frame.
fn record_worker(worker: u64) -> CommandBuffer {
    let mut buffer = CommandBuffer::new();

    BeginDebugEvent::create(&mut buffer, &format!("worker {worker}"));
    SetPipeline::create(&mut buffer, PipelineHandle::new(100 + worker));
    SetResourceGroup::create(&mut buffer, 0, ResourceGroupHandle::new(200 + worker));
    for draw in 0..DRAWS_PER_WORKER {
        Draw::create_inline(&mut buffer, DrawArgs::new(3 * (draw + 1)));
    }
    EndDebugEvent::create(&mut buffer);

    buffer
}

fn main() -> Result<()> {
    init_logging(LoggingConfig {
        env_filter: std::env::var("RUST_LOG").ok().or(Some("info".into())),
        ..LoggingConfig::default()
    });

    // Shared post-process sub-sequence: recorded once, referenced from the
    // frame buffer as a nested execution.
    let mut post = CommandBuffer::new();
    SetPipeline::create(&mut post, PipelineHandle::new(999));
    Draw::create_inline(&mut post, DrawArgs::new(3));

    // Frame prologue. The scissor array is caller-owned (external mode) and
    // outlives both submissions below.
    let scissors = [ScissorRect::new(0, 0, 1280, 720)];
    let mut frame = CommandBuffer::new();
    SetRenderTarget::create(&mut frame, RenderTargetHandle::NONE);
    SetRootSignature::create(&mut frame, RootSignatureHandle::new(1));
    SetViewports::create_single(&mut frame, 0.0, 0.0, 1280.0, 720.0);
    SetScissorRects::create(&mut frame, &scissors);
    Clear::create(&mut frame, ClearFlags::COLOR_DEPTH, [0.05, 0.05, 0.08, 1.0], 1.0, 0);

    // Fork: each worker records privately, no shared state.
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| std::thread::spawn(move || record_worker(worker)))
        .collect();

    // Join and merge in worker order; the coordinator alone decides the
    // cross-buffer order.
    for handle in handles {
        let mut recorded = handle.join().map_err(|_| anyhow!("worker panicked"))?;
        recorded.submit_to_command_buffer_and_clear(&mut frame);
    }

    ExecuteCommandBuffer::create(&mut frame, &post);

    let mut renderer = LogRenderer::default();
    frame.submit_to_renderer(&mut renderer);
    // The buffer is untouched by submission; replay it as-is.
    frame.submit_to_renderer(&mut renderer);

    let total: u32 = renderer.stats.op_counts.iter().sum();
    log::info!(
        "submitted {} stream(s): {} op(s) dispatched, {} vertices drawn",
        renderer.submissions,
        total,
        renderer.stats.vertices,
    );
    for raw in 0..DispatchId::COUNT as u32 {
        let count = renderer.stats.op_counts[raw as usize];
        if let (Some(id), 1..) = (DispatchId::from_u32(raw), count) {
            log::info!("  {id:?}: {count}");
        }
    }

    Ok(())
}
