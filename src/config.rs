use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::export::{ExportOptions, TimeColumn};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub image: ImageSettings,
}

/// CSVエクスポート設定
#[derive(Debug, Deserialize, Clone)]
pub struct ExportSettings {
    /// 出力CSVパス
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    /// ANGLE列を出力するか
    #[serde(default = "default_include_angle")]
    pub include_angle: bool,
    /// 時刻列ラベル ("time" | "frame_count")
    #[serde(default = "default_time_column")]
    pub time_column: TimeColumn,
}

fn default_csv_path() -> String {
    "joint_positions.csv".to_string()
}
fn default_include_angle() -> bool {
    true
}
fn default_time_column() -> TimeColumn {
    TimeColumn::Time
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            include_angle: default_include_angle(),
            time_column: default_time_column(),
        }
    }
}

impl ExportSettings {
    /// エクスポータ用オプションへ変換
    pub fn options(&self) -> ExportOptions {
        ExportOptions {
            include_angle: self.include_angle,
            time_column: self.time_column,
        }
    }
}

/// カラー画像保存設定
#[derive(Debug, Deserialize, Clone)]
pub struct ImageSettings {
    /// 画像保存を有効にするか
    #[serde(default)]
    pub enabled: bool,
    /// 保存先ディレクトリ
    #[serde(default = "default_image_dir")]
    pub output_dir: String,
}

fn default_image_dir() -> String {
    "color_images".to_string()
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: default_image_dir(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 読めない・壊れている場合はデフォルト設定を返す
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.export.csv_path, "joint_positions.csv");
        assert!(config.export.include_angle);
        assert_eq!(config.export.time_column, TimeColumn::Time);
        assert!(!config.image.enabled);
        assert_eq!(config.image.output_dir, "color_images");
    }

    #[test]
    fn test_parse_overrides() {
        let config: Config = toml::from_str(
            r#"
            [export]
            csv_path = "session.csv"
            include_angle = false
            time_column = "frame_count"

            [image]
            enabled = true
            output_dir = "frames"
            "#,
        )
        .unwrap();
        assert_eq!(config.export.csv_path, "session.csv");
        assert!(!config.export.include_angle);
        assert_eq!(config.export.time_column, TimeColumn::FrameCount);
        assert!(config.image.enabled);
        assert_eq!(config.image.output_dir, "frames");

        let options = config.export.options();
        assert!(!options.include_angle);
        assert_eq!(options.time_column, TimeColumn::FrameCount);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = Config::load_or_default("no_such_config.toml");
        assert_eq!(config.export.csv_path, "joint_positions.csv");
    }
}
