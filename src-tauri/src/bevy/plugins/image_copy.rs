//! GPU to CPU copy of the offscreen render target
//!
//! Flow:
//! 1. The camera renders into an image render target
//! 2. `ImageCopyDriver` copies that texture into a mappable buffer
//! 3. After `RenderSystems::Render` the buffer is mapped and its bytes are
//!    sent to the main world over a channel
//!
//! Rows in the buffer are padded to the GPU copy alignment; the main world
//! strips the padding.

use bevy::{
    prelude::*,
    render::{
        render_asset::RenderAssets,
        render_graph::{self, NodeRunError, RenderGraph, RenderGraphContext, RenderLabel},
        render_resource::{
            Buffer, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Extent3d, MapMode,
            PollType, TexelCopyBufferInfo, TexelCopyBufferLayout,
        },
        renderer::{RenderContext, RenderDevice, RenderQueue},
        texture::GpuImage,
        Extract, Render, RenderApp, RenderSystems,
    },
};
use tracing::{debug, warn};

use crate::bevy::resources::{MainWorldReceiver, RenderWorldSender};

pub struct ImageCopyPlugin;

impl Plugin for ImageCopyPlugin {
    fn build(&self, app: &mut App) {
        let (s, r) = crossbeam_channel::unbounded();

        let render_app = app
            .insert_resource(MainWorldReceiver(r))
            .sub_app_mut(RenderApp);

        let mut graph = render_app.world_mut().resource_mut::<RenderGraph>();
        graph.add_node(ImageCopy, ImageCopyDriver);
        graph.add_node_edge(bevy::render::graph::CameraDriverLabel, ImageCopy);

        render_app
            .insert_resource(RenderWorldSender(s))
            .add_systems(ExtractSchedule, image_copy_extract)
            .add_systems(
                Render,
                receive_image_from_buffer.after(RenderSystems::Render),
            );

        debug!("image copy plugin registered");
    }
}

/// Copiers mirrored into the render world each frame
#[derive(Clone, Default, Resource, Deref, DerefMut)]
struct ImageCopiers(pub Vec<ImageCopier>);

/// Copies `src_image` into a CPU-mappable buffer every frame
#[derive(Clone, Component)]
pub struct ImageCopier {
    buffer: Buffer,
    src_image: Handle<Image>,
}

impl ImageCopier {
    pub fn new(src_image: Handle<Image>, size: Extent3d, render_device: &RenderDevice) -> Self {
        let cpu_buffer = render_device.create_buffer(&BufferDescriptor {
            label: Some("hero_frame_readback"),
            size: readback_buffer_size(size, RenderDevice::align_copy_bytes_per_row),
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer: cpu_buffer,
            src_image,
        }
    }
}

/// Bytes needed to hold an RGBA8 copy of `size` with rows padded by `align`
fn readback_buffer_size(size: Extent3d, align: impl Fn(usize) -> usize) -> u64 {
    align(size.width as usize * 4) as u64 * size.height as u64
}

fn image_copy_extract(mut commands: Commands, image_copiers: Extract<Query<&ImageCopier>>) {
    commands.insert_resource(ImageCopiers(image_copiers.iter().cloned().collect()));
}

#[derive(Debug, PartialEq, Eq, Clone, Hash, RenderLabel)]
struct ImageCopy;

#[derive(Default)]
struct ImageCopyDriver;

impl render_graph::Node for ImageCopyDriver {
    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let (Some(image_copiers), Some(gpu_images), Some(render_queue)) = (
            world.get_resource::<ImageCopiers>(),
            world.get_resource::<RenderAssets<GpuImage>>(),
            world.get_resource::<RenderQueue>(),
        ) else {
            return Ok(());
        };

        for image_copier in image_copiers.iter() {
            // The target is not uploaded on the very first frames
            let Some(src_image) = gpu_images.get(&image_copier.src_image) else {
                continue;
            };

            let block_dimensions = src_image.texture_format.block_dimensions();
            let Some(block_size) = src_image.texture_format.block_copy_size(None) else {
                warn!(format = ?src_image.texture_format, "render target format cannot be copied");
                continue;
            };

            let padded_bytes_per_row = RenderDevice::align_copy_bytes_per_row(
                (src_image.size.width as usize / block_dimensions.0 as usize) * block_size as usize,
            );

            let mut encoder = render_context
                .render_device()
                .create_command_encoder(&CommandEncoderDescriptor::default());

            encoder.copy_texture_to_buffer(
                src_image.texture.as_image_copy(),
                TexelCopyBufferInfo {
                    buffer: &image_copier.buffer,
                    layout: TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(padded_bytes_per_row as u32),
                        rows_per_image: None,
                    },
                },
                src_image.size,
            );

            render_queue.submit(std::iter::once(encoder.finish()));
        }

        Ok(())
    }
}

fn receive_image_from_buffer(
    image_copiers: Res<ImageCopiers>,
    render_device: Res<RenderDevice>,
    sender: Res<RenderWorldSender>,
) {
    for image_copier in image_copiers.iter() {
        let buffer_slice = image_copier.buffer.slice(..);

        let (s, r) = crossbeam_channel::bounded(1);
        buffer_slice.map_async(MapMode::Read, move |result| {
            let _ = s.send(result);
        });

        if let Err(err) = render_device.poll(PollType::wait()) {
            warn!(%err, "device poll failed while mapping frame buffer");
            continue;
        }

        match r.recv() {
            Ok(Ok(())) => {
                let _ = sender.send(buffer_slice.get_mapped_range().to_vec());
                image_copier.buffer.unmap();
            }
            Ok(Err(err)) => warn!(%err, "failed to map frame buffer"),
            Err(_) => warn!("frame buffer map callback dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn align_256(n: usize) -> usize {
        n.div_ceil(256) * 256
    }

    #[test]
    fn readback_rows_are_padded_to_the_copy_alignment() {
        let size = Extent3d {
            width: 3,
            height: 2,
            depth_or_array_layers: 1,
        };
        assert_eq!(readback_buffer_size(size, align_256), 512);
    }

    #[test]
    fn aligned_targets_need_no_padding() {
        let size = Extent3d {
            width: 800,
            height: 600,
            depth_or_array_layers: 1,
        };
        assert_eq!(readback_buffer_size(size, align_256), 800 * 4 * 600);
    }
}
