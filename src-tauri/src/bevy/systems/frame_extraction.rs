//! Frame extraction system
//!
//! This module handles extracting rendered frames from the GPU and
//! preparing them for transfer to the Tauri frontend.

use bevy::{prelude::*, render::renderer::RenderDevice, time::Real};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::bevy::resources::{
    FrameBufferRes, FrameCount, FrameRateLimiter, FrameTimings, MainWorldReceiver, PerfStatsRes,
    PreRollFrames,
};
use crate::config::{performance::STATS_PRINT_INTERVAL, RENDER_HEIGHT, RENDER_WIDTH};

fn millis_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Extract and process frame data from the render pipeline
pub fn extract_and_process_frame(
    receiver: Res<MainWorldReceiver>,
    buffer: Option<Res<FrameBufferRes>>,
    perf_stats: Option<Res<PerfStatsRes>>,
    mut count: ResMut<FrameCount>,
    mut pre_roll: ResMut<PreRollFrames>,
    mut timings: ResMut<FrameTimings>,
    mut frame_limiter: ResMut<FrameRateLimiter>,
    time: Res<Time<Real>>,
) {
    let Some(buffer) = buffer else { return };

    // Wait for scene to be fully rendered
    if pre_roll.0 > 0 {
        while receiver.try_recv().is_ok() {}
        pre_roll.0 -= 1;
        if pre_roll.0 % 10 == 0 && pre_roll.0 > 0 {
            debug!(remaining = pre_roll.0, "pre-roll");
        }
        return;
    }

    let frame_start = Instant::now();
    if !frame_limiter.try_begin(frame_start) {
        // Too early for the next frame; drop what the GPU sent
        while receiver.try_recv().is_ok() {}
        return;
    }

    // Keep only the newest frame
    let Some(image_data) = receiver.try_iter().last() else {
        return;
    };
    let receive_time = millis_since(frame_start);

    let process_start = Instant::now();
    let Some(rgba) = remove_row_padding(
        &image_data,
        RENDER_WIDTH,
        RENDER_HEIGHT,
        RenderDevice::align_copy_bytes_per_row,
    ) else {
        warn!(len = image_data.len(), "received frame is too short");
        return;
    };
    let process_time = millis_since(process_start);
    let data_size_kb = rgba.len() as f64 / 1024.0;

    if let Err(err) = buffer.0.store(rgba) {
        warn!(%err, "could not publish frame");
        return;
    }
    let frame = count.bump();

    let total_time = millis_since(frame_start);
    timings.record(total_time);

    if let Some(perf) = &perf_stats {
        let fps = timings
            .average()
            .filter(|avg| *avg > 0.0)
            .map_or(0.0, |avg| 1000.0 / avg);
        let published = perf.0.update(|stats| {
            stats.gpu_transfer_ms = receive_time;
            stats.data_processing_ms = process_time;
            stats.frame_encoding_ms = total_time;
            stats.frame_count = frame;
            stats.data_size_kb = data_size_kb;
            stats.bevy_fps = fps;
        });
        if let Err(err) = published {
            warn!(%err, "could not update performance stats");
        }
    }

    // Print detailed stats periodically
    let now = time.elapsed_secs_f64();
    if now - timings.last_print_time >= STATS_PRINT_INTERVAL {
        let (min_ms, max_ms) = timings.min_max();
        info!(
            frame,
            receive_ms = format_args!("{receive_time:.2}"),
            process_ms = format_args!("{process_time:.2}"),
            total_ms = format_args!("{total_time:.2}"),
            avg_ms = format_args!("{:.2}", timings.average().unwrap_or_default()),
            min_ms = format_args!("{min_ms:.2}"),
            max_ms = format_args!("{max_ms:.2}"),
            size_kb = format_args!("{data_size_kb:.1}"),
            "frame stats"
        );
        timings.last_print_time = now;
    }
}

/// Remove GPU buffer row padding, returning tightly packed RGBA rows
///
/// `align` maps an unpadded row length to the padded one used by the copy.
/// Returns `None` if `data` holds fewer than `height` full rows.
pub fn remove_row_padding(
    data: &[u8],
    width: u32,
    height: u32,
    align: impl Fn(usize) -> usize,
) -> Option<Vec<u8>> {
    let row_bytes = width as usize * 4;
    let aligned_row_bytes = align(row_bytes);
    let rows = height as usize;

    if rows == 0 || data.len() < aligned_row_bytes * (rows - 1) + row_bytes {
        return None;
    }

    if row_bytes == aligned_row_bytes {
        return Some(data[..row_bytes * rows].to_vec());
    }

    Some(
        data.chunks(aligned_row_bytes)
            .take(rows)
            .flat_map(|row| &row[..row_bytes])
            .copied()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn align_256(n: usize) -> usize {
        n.div_ceil(256) * 256
    }

    #[test]
    fn strips_padding_from_each_row() {
        // 3 pixels wide = 12 bytes per row, padded to 256
        let mut data = Vec::new();
        for row in 0..2u8 {
            data.extend(std::iter::repeat(row + 1).take(12));
            data.extend(std::iter::repeat(0xEE).take(244));
        }

        let rgba = remove_row_padding(&data, 3, 2, align_256).unwrap();
        assert_eq!(rgba.len(), 3 * 2 * 4);
        assert!(rgba[..12].iter().all(|b| *b == 1));
        assert!(rgba[12..].iter().all(|b| *b == 2));
    }

    #[test]
    fn aligned_rows_pass_through() {
        let data = vec![7u8; 64 * 4 * 3];
        let rgba = remove_row_padding(&data, 64, 3, align_256).unwrap();
        assert_eq!(rgba, data);
    }

    #[test]
    fn short_buffers_are_rejected() {
        assert_eq!(remove_row_padding(&[], 3, 2, align_256), None);
        assert_eq!(remove_row_padding(&[0; 200], 3, 2, align_256), None);
    }
}
