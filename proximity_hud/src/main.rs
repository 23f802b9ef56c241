mod cli;
mod controls;
mod render;

use anyhow::{Context, anyhow};
use clap::Parser;
use image::RgbImage;
use opencv::{
    core::{self, Mat, Size},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoWriter},
};
use proximity_vision::{
    ProximityPipeline, ProximityState, VisionError, utils::image_helper,
};
use std::time::Instant;

use crate::cli::Cli;
use crate::controls::ThresholdControls;

const KEY_ESCAPE: i32 = 27;
/// Used when a camera does not report its frame rate.
const FALLBACK_RECORD_FPS: f64 = 30.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- 1. Argument Parsing & Setup ---
    let cli = Cli::parse();
    let settings = cli.settings().context("loading settings")?;
    log::debug!("settings: {settings:?}");

    // --- 2. Video I/O Initialization ---
    let mut cap = open_capture(&cli)?;
    let frame_width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
    let frame_height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;
    let source_fps = cap.get(videoio::CAP_PROP_FPS)?;
    log::info!("capturing {frame_width}x{frame_height} @ {source_fps:.1} fps");

    let mut writer = match &cli.output {
        Some(path) => {
            let fps = if source_fps > 0.0 { source_fps } else { FALLBACK_RECORD_FPS };
            let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
            let writer = VideoWriter::new(
                &path.to_string_lossy(),
                fourcc,
                fps,
                Size::new(frame_width, frame_height),
                true,
            )?;
            if !writer.is_opened()? {
                return Err(anyhow!("could not open {} for writing", path.display()));
            }
            log::info!("recording to {}", path.display());
            Some(writer)
        }
        None => None,
    };

    // --- 3. Windows & Controls ---
    let window = settings.display.window_title.as_str();
    let controls = if cli.headless {
        None
    } else {
        highgui::named_window(window, highgui::WINDOW_NORMAL)?;
        if settings.display.fullscreen {
            highgui::set_window_property(
                window,
                highgui::WND_PROP_FULLSCREEN,
                highgui::WINDOW_FULLSCREEN as f64,
            )?;
        }
        Some(ThresholdControls::open(settings.pipeline.hsv_range)?)
    };

    // --- 4. Vision Pipeline Initialization ---
    let mut pipeline = ProximityPipeline::new(settings.pipeline.clone())?;
    let mut danger_frames: u64 = 0;
    let mut snapshots: u32 = 0;

    // --- 5. Main Processing Loop ---
    let mut raw = Mat::default();
    loop {
        match cap.read(&mut raw) {
            Ok(true) if !raw.empty() => {}
            Ok(_) => {
                log::info!("end of stream");
                break;
            }
            Err(e) => {
                log::error!("error reading frame: {e}");
                break;
            }
        }

        let mut frame = Mat::default();
        if settings.display.mirror {
            core::flip(&raw, &mut frame, 1)?;
        } else {
            raw.copy_to(&mut frame)?;
        }

        if let Some(controls) = &controls {
            pipeline.set_hsv_range(controls.read()?);
        }

        // --- 6. Frame Conversion & Pipeline Processing ---
        let rgb = to_rgb_image(&frame)?;
        let report = match pipeline.process(&rgb, Instant::now()) {
            Ok(report) => report,
            Err(VisionError::EmptyFrame) => {
                log::warn!("skipping empty frame");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if report.state == ProximityState::Danger {
            danger_frames += 1;
        }

        // --- 7. Visualization ---
        render::draw_overlay(&mut frame, &report.overlay)?;

        if let Some(writer) = writer.as_mut() {
            writer.write(&frame)?;
        }

        if cli.headless {
            continue;
        }
        highgui::imshow(window, &frame)?;

        // --- 8. Keyboard ---
        let key = highgui::wait_key(1)?;
        if key < 0 {
            continue;
        }
        match key & 0xFF {
            k if k == 'q' as i32 || k == KEY_ESCAPE => break,
            k if k == 'r' as i32 => pipeline.reset_tracking(),
            k if k == 'm' as i32 => {
                snapshots += 1;
                let path = cli.dump_dir.join(format!("mask_{snapshots:04}.png"));
                match image_helper::save_mask(&path, &report.mask) {
                    Ok(()) => log::info!("saved mask to {}", path.display()),
                    Err(e) => log::warn!("could not save mask to {}: {e}", path.display()),
                }
            }
            _ => {}
        }
    }

    // --- 9. Teardown ---
    cap.release()?;
    if let Some(mut writer) = writer {
        writer.release()?;
    }
    if !cli.headless {
        highgui::destroy_all_windows()?;
    }
    log::info!(
        "processed {} frames, {} in danger",
        pipeline.frames_processed(),
        danger_frames
    );
    Ok(())
}

fn open_capture(cli: &Cli) -> anyhow::Result<VideoCapture> {
    let cap = match &cli.input {
        Some(path) => VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?,
        None => VideoCapture::new(cli.camera, videoio::CAP_ANY)?,
    };
    if !cap.is_opened()? {
        return Err(match &cli.input {
            Some(path) => anyhow!("could not open video file {}", path.display()),
            None => anyhow!("could not open camera {}", cli.camera),
        });
    }
    Ok(cap)
}

/// Converts a BGR OpenCV frame into an owned RGB buffer for the pipeline.
fn to_rgb_image(frame: &Mat) -> anyhow::Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let bytes = rgb.data_bytes()?.to_vec();
    RgbImage::from_raw(width, height, bytes)
        .ok_or_else(|| anyhow!("frame buffer does not match {width}x{height} RGB"))
}
