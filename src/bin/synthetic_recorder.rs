//! Synthetic recorder: generates moving skeleton frames at a fixed rate and
//! appends them to the shared CSV export stream, standing in for a live
//! body-tracking pipeline. Optionally dumps one color-frame buffer per tick
//! on a worker thread, so image saving and CSV export run concurrently.
//!
//! Usage: synthetic_recorder [frames] [fps]

use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use karada_logger::body::{Body, Confidence, Joint, JointId};
use karada_logger::clock;
use karada_logger::config::Config;
use karada_logger::export::CsvExporter;
use karada_logger::image::save_color_image;

// ---------------------------------------------------------------------------
// Logging (stderr + session log file)
// ---------------------------------------------------------------------------

type LogFile = Arc<Mutex<std::io::BufWriter<std::fs::File>>>;

fn open_log_file() -> Result<LogFile> {
    std::fs::create_dir_all("logs")?;
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = format!("logs/record_{}.log", ts);
    let file = std::fs::File::create(&path)?;
    eprintln!("Log: {}", path);
    Ok(Arc::new(Mutex::new(std::io::BufWriter::new(file))))
}

macro_rules! log {
    ($logfile:expr, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        eprintln!("{}", msg);
        if let Ok(mut f) = $logfile.lock() {
            let _ = writeln!(f, "{}", msg);
            let _ = f.flush();
        }
    }};
}

// ---------------------------------------------------------------------------
// Synthetic skeleton
// ---------------------------------------------------------------------------

/// Upright skeleton with the right arm swinging by `phase` (seconds), so the
/// exported angle changes over the run. Positions are millimeters.
fn synthetic_body(id: u32, phase: f32) -> Body {
    let mut body = Body::default();
    body.id = id;
    let offset = id as f32 * 900.0;
    let swing = (phase * std::f32::consts::TAU * 0.25).sin();

    let mut set = |joint: JointId, x: f32, y: f32, z: f32| {
        body.joints[joint as usize] = Joint::new([x + offset, y, z], Confidence::High);
    };
    set(JointId::Pelvis, 0.0, 0.0, 2000.0);
    set(JointId::SpineNavel, 0.0, 160.0, 2000.0);
    set(JointId::SpineChest, 0.0, 330.0, 2000.0);
    set(JointId::Neck, 0.0, 520.0, 2000.0);
    set(JointId::Head, 0.0, 640.0, 2000.0);
    set(JointId::Nose, 0.0, 600.0, 2110.0);
    set(JointId::ShoulderLeft, 190.0, 480.0, 2000.0);
    set(JointId::ElbowLeft, 230.0, 240.0, 2010.0);
    set(JointId::ShoulderRight, -190.0, 480.0, 2000.0);
    set(
        JointId::ElbowRight,
        -230.0 - 60.0 * swing,
        240.0 + 180.0 * swing,
        2010.0,
    );
    set(
        JointId::WristRight,
        -240.0 - 90.0 * swing,
        30.0 + 300.0 * swing,
        2020.0,
    );
    body
}

fn main() -> Result<()> {
    let logfile = open_log_file()?;
    log!(logfile, "Synthetic Recorder ({})", env!("GIT_VERSION"));

    let args: Vec<String> = std::env::args().collect();
    let frames: u64 = args
        .get(1)
        .map(|s| s.parse())
        .transpose()
        .context("invalid frame count")?
        .unwrap_or(300);
    let fps: u64 = args
        .get(2)
        .map(|s| s.parse())
        .transpose()
        .context("invalid fps")?
        .unwrap_or(30);

    let config = Config::load_or_default("config.toml");
    let exporter = CsvExporter::create(&config.export.csv_path, config.export.options())?;
    log!(
        logfile,
        "CSV: {} (angle: {}, {} frames @ {} fps)",
        config.export.csv_path,
        config.export.include_angle,
        frames,
        fps
    );

    // Image worker: drains (buffer, timestamp, frame) from a channel and
    // writes files while the main loop keeps exporting rows.
    let (image_tx, image_worker) = if config.image.enabled {
        let dir = PathBuf::from(&config.image.output_dir);
        let worker_log = logfile.clone();
        let (tx, rx) = mpsc::channel::<(Vec<u8>, u64, u64)>();
        let handle = thread::spawn(move || {
            for (buffer, timestamp, frame) in rx {
                if let Err(e) = save_color_image(&buffer, &dir, timestamp, frame) {
                    log!(worker_log, "image save failed: {:#}", e);
                }
            }
        });
        log!(logfile, "images: {}", config.image.output_dir);
        (Some(tx), Some(handle))
    } else {
        (None, None)
    };

    let tick = Duration::from_micros(1_000_000 / fps.max(1));
    let start = Instant::now();
    let mut exported_rows: u64 = 0;
    let mut failed_frames: u64 = 0;

    for frame in 0..frames {
        let phase = frame as f32 / fps as f32;
        let bodies = vec![synthetic_body(0, phase), synthetic_body(1, phase + 0.5)];
        let timestamp = clock::timestamp_us();

        // A failed frame is logged and dropped; rows already on disk stay intact.
        match exporter.export_batch(&bodies, timestamp) {
            Ok(()) => exported_rows += bodies.len() as u64,
            Err(e) => {
                failed_frames += 1;
                log!(logfile, "frame {}: export failed: {}", frame, e);
            }
        }

        if let Some(tx) = &image_tx {
            // Stand-in for the sensor's JPEG buffer.
            let buffer = vec![0xFFu8; 1024];
            let _ = tx.send((buffer, timestamp, frame));
        }

        if frame % (fps * 5).max(1) == 0 {
            log!(logfile, "frame {}/{} ({} rows)", frame, frames, exported_rows);
        }

        let next = start + tick * (frame as u32 + 1);
        if let Some(wait) = next.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }

    drop(image_tx);
    if let Some(handle) = image_worker {
        let _ = handle.join();
    }

    let elapsed = start.elapsed();
    log!(
        logfile,
        "done: {} frames in {:.1}s, {} rows, {} failed",
        frames,
        elapsed.as_secs_f64(),
        exported_rows,
        failed_frames
    );

    Ok(())
}
