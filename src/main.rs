use anyhow::Result;
use std::io::{self, Write};

use karada_logger::body::{Body, Confidence, Joint, JointId};
use karada_logger::clock;
use karada_logger::config::Config;
use karada_logger::export::{arm_angle, CsvExporter};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Karada Logger - CSV Export Test ===");
    println!("出力先: {}", config.export.csv_path);
    println!("ANGLE列: {}", config.export.include_angle);
    println!();
    println!("コマンド:");
    println!("  p x y z       - 骨盤位置を設定 (例: p 0 0 2000)");
    println!("  e x y z       - 右肘位置を設定 (例: e -230 240 2040)");
    println!("  o             - 現在のボディを1行エクスポート");
    println!("  b n           - n体をバッチエクスポート (例: b 3)");
    println!("  a             - 現在のボディの角度を表示");
    println!("  q             - 終了");
    println!();

    let exporter = CsvExporter::create(&config.export.csv_path, config.export.options())?;
    let mut body = demo_body(0);

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let parts: Vec<&str> = input.trim().split_whitespace().collect();

        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "p" if parts.len() == 4 => {
                let x: f32 = parts[1].parse()?;
                let y: f32 = parts[2].parse()?;
                let z: f32 = parts[3].parse()?;
                body.joints[JointId::Pelvis as usize] = Joint::new([x, y, z], Confidence::High);
                println!("骨盤: [{}, {}, {}]", x, y, z);
            }
            "e" if parts.len() == 4 => {
                let x: f32 = parts[1].parse()?;
                let y: f32 = parts[2].parse()?;
                let z: f32 = parts[3].parse()?;
                body.joints[JointId::ElbowRight as usize] = Joint::new([x, y, z], Confidence::High);
                println!("右肘: [{}, {}, {}]", x, y, z);
            }
            "o" => match exporter.export_one(&body, clock::timestamp_us()) {
                Ok(()) => println!("1行書き込みました"),
                Err(e) => println!("エクスポート失敗: {}", e),
            },
            "b" if parts.len() == 2 => {
                let n: usize = parts[1].parse()?;
                let bodies: Vec<Body> = (0..n).map(|i| demo_body(i as u32)).collect();
                match exporter.export_batch(&bodies, clock::timestamp_us()) {
                    Ok(()) => println!("{}行書き込みました", n),
                    Err(e) => println!("エクスポート失敗: {}", e),
                }
            }
            "a" => match arm_angle(&body) {
                Ok(angle) => println!("角度: {:.2}度", angle),
                Err(e) => println!("計算できません: {}", e),
            },
            "q" => {
                println!("終了します");
                break;
            }
            _ => {
                println!("不明なコマンド: {}", parts[0]);
            }
        }
    }

    Ok(())
}

/// 角度計算が成立する程度の合成ボディ
fn demo_body(id: u32) -> Body {
    let mut body = Body::default();
    body.id = id;
    let offset = id as f32 * 900.0;
    let mut set = |joint: JointId, x: f32, y: f32, z: f32| {
        body.joints[joint as usize] = Joint::new([x + offset, y, z], Confidence::Medium);
    };
    set(JointId::Pelvis, 0.0, 0.0, 2000.0);
    set(JointId::Neck, 0.0, 520.0, 2000.0);
    set(JointId::Nose, 0.0, 580.0, 2110.0);
    set(JointId::ShoulderRight, -180.0, 480.0, 2000.0);
    set(JointId::ElbowRight, -230.0, 240.0, 2040.0);
    body
}
