use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde::Deserialize;
use thiserror::Error;

use crate::body::{Body, JointId};
use crate::geometry;

/// 時刻列のヘッダラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeColumn {
    /// マイクロ秒タイムスタンプ
    Time,
    /// 論理フレーム番号
    FrameCount,
}

impl TimeColumn {
    pub fn label(self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::FrameCount => "FrameCount",
        }
    }
}

/// エクスポータの動作設定
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// 末尾にANGLE列（投影符号付き角度）を付けるか
    pub include_angle: bool,
    /// 時刻列のラベル
    pub time_column: TimeColumn,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_angle: true,
            time_column: TimeColumn::Time,
        }
    }
}

/// エクスポート失敗
#[derive(Debug, Error)]
pub enum ExportError {
    /// ストリームへの書き込み・フラッシュ失敗（ディスクフル、権限喪失等）
    #[error("failed to write CSV: {0}")]
    Io(#[from] std::io::Error),
    /// 角度計算の入力が退化している
    #[error("angle calculation failed for body {body_id}: {source}")]
    Angle {
        body_id: u32,
        source: geometry::DegenerateInput,
    },
}

struct Stream {
    writer: BufWriter<File>,
    header_checked: bool,
}

/// スレッドセーフなCSVエクスポータ
///
/// 追記専用ストリームを1本所有し、全エクスポート呼び出しをインスタンス内の
/// ロックで直列化する。ヘッダ行はストリームが空だった場合の初回呼び出しで
/// のみ書く。既存の空でないファイルへの追記ではヘッダを再出力しない。
///
/// 失敗は呼び出し側へそのまま返す。内部でのリトライやストリームの開き直しは
/// 行わない（1フレームの喪失を致命とみなすかは呼び出し側の方針）。
pub struct CsvExporter {
    options: ExportOptions,
    stream: Mutex<Stream>,
}

impl CsvExporter {
    /// 追記モードでファイルを開く（なければ作成）
    pub fn create<P: AsRef<Path>>(path: P, options: ExportOptions) -> Result<Self, ExportError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            options,
            stream: Mutex::new(Stream {
                writer: BufWriter::new(file),
                header_checked: false,
            }),
        })
    }

    /// 1ボディを1行エクスポートする
    pub fn export_one(&self, body: &Body, timestamp: u64) -> Result<(), ExportError> {
        self.export_batch(std::slice::from_ref(body), timestamp)
    }

    /// 複数ボディを同一タイムスタンプでまとめてエクスポートする
    ///
    /// 全行を1バッファに構築してから一括で書き込み、最後に1回だけ
    /// フラッシュする。空のスライスは何も書かずに成功を返す。
    pub fn export_batch(&self, bodies: &[Body], timestamp: u64) -> Result<(), ExportError> {
        if bodies.is_empty() {
            return Ok(());
        }

        // ロック取得前に全行を構築する。角度が退化していた場合は
        // 1バイトも書かずに失敗する。
        let mut batch = String::new();
        for body in bodies {
            self.push_row(&mut batch, body, timestamp)?;
        }

        let mut stream = self.stream.lock().unwrap_or_else(|e| e.into_inner());
        if !stream.header_checked {
            // 初回のみ: ストリームが空ならヘッダを書く
            if stream.writer.get_ref().metadata()?.len() == 0 {
                let header = self.header_row();
                stream.writer.write_all(header.as_bytes())?;
            }
            stream.header_checked = true;
        }
        stream.writer.write_all(batch.as_bytes())?;
        stream.writer.flush()?;
        Ok(())
    }

    /// ヘッダ行を正準関節順から組み立てる
    fn header_row(&self) -> String {
        let mut header = format!("BodyID,{}", self.options.time_column.label());
        for joint in JointId::ALL {
            let name = joint.name();
            let _ = write!(
                header,
                ",{}_X,{}_Y,{}_Z,{}_CONFIDENCE",
                name, name, name, name
            );
        }
        if self.options.include_angle {
            header.push_str(",ANGLE");
        }
        header.push('\n');
        header
    }

    /// 1ボディ分のデータ行を追記する
    fn push_row(&self, out: &mut String, body: &Body, timestamp: u64) -> Result<(), ExportError> {
        let angle = if self.options.include_angle {
            Some(arm_angle(body).map_err(|source| ExportError::Angle {
                body_id: body.id,
                source,
            })?)
        } else {
            None
        };

        let _ = write!(out, "{},{}", body.id, timestamp);
        for joint in &body.joints {
            let _ = write!(
                out,
                ",{},{},{},{}",
                joint.position[0],
                joint.position[1],
                joint.position[2],
                joint.confidence.as_ordinal()
            );
        }
        if let Some(angle) = angle {
            let _ = write!(out, ",{}", angle);
        }
        out.push('\n');
        Ok(())
    }
}

/// 右腕の投影符号付き角度
///
/// 骨盤・首・鼻で張る体幹平面に骨盤・右肩・右肘を射影し、右肩を頂点とした
/// 符号付き角度を返す。信頼度グレードは参照しない（低信頼の関節も
/// そのまま使う）。
pub fn arm_angle(body: &Body) -> Result<f64, geometry::DegenerateInput> {
    geometry::projected_signed_angle(
        body.joint_position(JointId::Pelvis),
        body.joint_position(JointId::Neck),
        body.joint_position(JointId::Nose),
        body.joint_position(JointId::Pelvis),
        body.joint_position(JointId::ShoulderRight),
        body.joint_position(JointId::ElbowRight),
    )
}
