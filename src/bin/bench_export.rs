use std::time::Instant;

use anyhow::Result;
use karada_logger::body::{Body, Confidence, Joint, JointId};
use karada_logger::export::{CsvExporter, ExportOptions, TimeColumn};

fn main() -> Result<()> {
    let path = std::env::temp_dir().join("bench_export.csv");
    let _ = std::fs::remove_file(&path);

    let options = ExportOptions {
        include_angle: true,
        time_column: TimeColumn::FrameCount,
    };
    let exporter = CsvExporter::create(&path, options)?;

    // 3体×1000フレームを計測（角度計算込み）
    let bodies: Vec<Body> = (0..3).map(bench_body).collect();
    let iterations: u64 = 1000;
    let start = Instant::now();
    for frame in 0..iterations {
        exporter.export_batch(&bodies, frame)?;
    }
    let elapsed = start.elapsed();

    let avg_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    let rows_per_sec = (iterations * bodies.len() as u64) as f64 / elapsed.as_secs_f64();

    println!("CSV export: {:.3}ms/frame = {:.0} rows/s", avg_ms, rows_per_sec);
    println!("出力: {}", path.display());

    Ok(())
}

/// 角度計算が成立する姿勢の計測用ボディ
fn bench_body(id: u32) -> Body {
    let mut body = Body::default();
    body.id = id;
    let offset = id as f32 * 900.0;
    let mut set = |joint: JointId, x: f32, y: f32, z: f32| {
        body.joints[joint as usize] = Joint::new([x + offset, y, z], Confidence::High);
    };
    set(JointId::Pelvis, 0.0, 0.0, 2000.0);
    set(JointId::Neck, 0.0, 520.0, 2000.0);
    set(JointId::Nose, 0.0, 580.0, 2110.0);
    set(JointId::ShoulderRight, -180.0, 480.0, 2000.0);
    set(JointId::ElbowRight, -230.0, 240.0, 2040.0);
    body
}
