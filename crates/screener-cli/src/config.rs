//! 環境変数ベースの設定モジュール.

use std::time::Duration;

/// データ取得設定.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// 銘柄あたりの最大試行回数
    pub max_retries: u32,
    /// API 要求間のディレイ (ミリ秒)
    pub request_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            request_delay_ms: 500,
        }
    }
}

impl FetchConfig {
    /// 環境変数から設定をロード.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            max_retries: env_var_parse("FETCH_MAX_RETRIES", 3),
            request_delay_ms: env_var_parse("FETCH_REQUEST_DELAY_MS", 500),
        }
    }

    /// API 要求間のディレイを Duration で返す.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 環境変数から値をパース (失敗時は既定値).
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.request_delay(), Duration::from_millis(500));
    }
}
