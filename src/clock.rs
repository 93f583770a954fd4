use std::time::{SystemTime, UNIX_EPOCH};

/// 現在時刻をマイクロ秒で返す（Unixエポック起点）
///
/// システム時計がエポック以前の場合は0を返す。
pub fn timestamp_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}
