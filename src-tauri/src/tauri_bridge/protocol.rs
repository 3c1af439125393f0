//! Custom protocol handlers for efficient data transfer
//!
//! This module implements the `frame://` custom protocol for direct binary
//! transfer of render frames, bypassing Tauri's IPC JSON serialization.

use image::{codecs::jpeg::JpegEncoder, ImageBuffer, ImageEncoder, Rgba};
use tauri::http::Response as HttpResponse;
use tracing::{debug, warn};

use super::shared_state::{SharedFrameBuffer, SharedPerfStats, SharedScenePose};
use crate::config::{compression::JPEG_QUALITY, RENDER_HEIGHT, RENDER_WIDTH};
use crate::error::{BridgeError, Result};

type Response = HttpResponse<Vec<u8>>;

/// State the protocol reads from
#[derive(Clone)]
pub struct ProtocolState {
    pub buffer: SharedFrameBuffer,
    pub perf_stats: SharedPerfStats,
    pub pose: SharedScenePose,
}

/// Handle requests to the custom `frame://` protocol
///
/// Supported endpoints:
/// - `frame` or `frame.jpg`: JPEG-compressed frame (~50-100KB)
/// - `frame.raw`: Raw RGBA frame (~1.9MB)
/// - `stats`: Performance statistics as JSON
/// - `pose`: Latest applied scene pose as JSON
pub fn handle_frame_protocol(uri_path: &str, state: &ProtocolState) -> Response {
    let resource = uri_path.trim_start_matches('/');
    debug!(resource, "frame protocol request");

    let result = match resource {
        "frame" | "frame.jpg" => jpeg_frame(&state.buffer),
        "frame.raw" => raw_frame(&state.buffer),
        "stats" => state
            .perf_stats
            .snapshot()
            .and_then(|stats| json(&stats)),
        "pose" => state.pose.snapshot().and_then(|pose| json(&pose)),
        _ => plain(404, "Not Found"),
    };

    result.unwrap_or_else(|err| {
        if !matches!(err, BridgeError::FrameNotReady) {
            warn!(resource, %err, "frame protocol request failed");
        }
        error_response(&err)
    })
}

/// JPEG-compressed frame; drops alpha since JPEG has none
fn jpeg_frame(buffer: &SharedFrameBuffer) -> Result<Response> {
    let rgba_data = buffer.latest()?;
    let jpeg_data = encode_jpeg(rgba_data, RENDER_WIDTH, RENDER_HEIGHT)?;
    frame_response("image/jpeg", jpeg_data)
}

fn raw_frame(buffer: &SharedFrameBuffer) -> Result<Response> {
    frame_response("application/octet-stream", buffer.latest()?)
}

fn encode_jpeg(rgba: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, rgba)
        .ok_or(BridgeError::FrameSize { width, height })?;
    let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();

    let mut jpeg_data = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg_data, JPEG_QUALITY).write_image(
        rgb_img.as_raw(),
        width,
        height,
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(jpeg_data)
}

fn frame_response(content_type: &str, body: Vec<u8>) -> Result<Response> {
    Ok(HttpResponse::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("X-Frame-Width", RENDER_WIDTH.to_string())
        .header("X-Frame-Height", RENDER_HEIGHT.to_string())
        .header("Access-Control-Allow-Origin", "*")
        .header(
            "Access-Control-Expose-Headers",
            "X-Frame-Width, X-Frame-Height",
        )
        .body(body)?)
}

fn json<T: serde::Serialize>(value: &T) -> Result<Response> {
    Ok(HttpResponse::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_vec(value)?)?)
}

fn plain(status: u16, message: &str) -> Result<Response> {
    Ok(HttpResponse::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Access-Control-Allow-Origin", "*")
        .body(message.as_bytes().to_vec())?)
}

fn error_response(err: &BridgeError) -> Response {
    plain(err.status(), &err.to_string()).unwrap_or_else(|_| {
        let mut response = HttpResponse::new(Vec::new());
        *response.status_mut() = tauri::http::StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::ScenePose;

    fn state() -> ProtocolState {
        ProtocolState {
            buffer: SharedFrameBuffer::default(),
            perf_stats: SharedPerfStats::default(),
            pose: SharedScenePose::default(),
        }
    }

    fn solid_frame() -> Vec<u8> {
        vec![40u8; (RENDER_WIDTH * RENDER_HEIGHT * 4) as usize]
    }

    #[test]
    fn unknown_path_is_not_found() {
        assert_eq!(handle_frame_protocol("/nope", &state()).status(), 404);
    }

    #[test]
    fn frame_is_unavailable_before_first_render() {
        let state = state();
        assert_eq!(handle_frame_protocol("/frame", &state).status(), 503);
        assert_eq!(handle_frame_protocol("/frame.raw", &state).status(), 503);
    }

    #[test]
    fn serves_raw_and_jpeg_frames() {
        let state = state();
        state.buffer.store(solid_frame()).unwrap();

        let raw = handle_frame_protocol("/frame.raw", &state);
        assert_eq!(raw.status(), 200);
        assert_eq!(raw.body().len(), solid_frame().len());

        let jpeg = handle_frame_protocol("frame.jpg", &state);
        assert_eq!(jpeg.status(), 200);
        assert_eq!(jpeg.headers()["Content-Type"], "image/jpeg");
        assert_eq!(&jpeg.body()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn wrong_sized_frame_is_a_server_error() {
        let state = state();
        state.buffer.store(vec![0; 16]).unwrap();
        assert_eq!(handle_frame_protocol("/frame", &state).status(), 500);
    }

    #[test]
    fn serves_pose_json() {
        let state = state();
        state.pose.publish(ScenePose::at(1.0)).unwrap();

        let response = handle_frame_protocol("/pose", &state);
        assert_eq!(response.status(), 200);
        let pose: ScenePose = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(pose, ScenePose::at(1.0));
    }
}
