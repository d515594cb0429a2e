//! エクスポート実行統計.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// エクスポート処理の統計.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportStats {
    /// 対象銘柄数
    pub total: usize,
    /// 取得成功数
    pub success: usize,
    /// 取得失敗数 (再試行後に除外)
    pub errors: usize,
    /// 所要時間
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ExportStats {
    /// 新しい統計オブジェクトを生成.
    pub fn new() -> Self {
        Self::default()
    }

    /// 成功率 (%) を計算.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 統計サマリをログ出力.
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "処理完了"
        );
    }
}
