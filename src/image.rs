use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// カラー画像バッファをタイムスタンプ付きファイル名で保存する
///
/// 保存先ディレクトリがなければ作成する。ファイル名は
/// `color_<timestamp>_<frame:06>.jpg`。書き込んだパスを返す。
pub fn save_color_image(
    data: &[u8],
    dir: &Path,
    timestamp_us: u64,
    frame_count: u64,
) -> Result<PathBuf> {
    if data.is_empty() {
        anyhow::bail!("empty color image buffer");
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let path = dir.join(format!("color_{}_{:06}.jpg", timestamp_us, frame_count));
    let mut file = fs::File::create(&path)
        .with_context(|| format!("failed to open color image file: {}", path.display()))?;
    file.write_all(data)
        .context("failed to write color image data")?;

    Ok(path)
}
