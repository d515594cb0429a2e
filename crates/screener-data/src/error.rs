//! データモジュールのエラー型.

use thiserror::Error;

/// データ関連のエラー.
#[derive(Debug, Error)]
pub enum DataError {
    /// プロバイダ接続エラー
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// データ取得エラー (外部ソース)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// パースエラー
    #[error("Parse error: {0}")]
    ParseError(String),

    /// データなし
    #[error("No data: {ticker}")]
    NoData { ticker: String },

    /// 要求制限超過
    #[error("Rate limit exceeded")]
    RateLimited,

    /// 不正なデータ形式
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// ファイル入出力エラー
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            DataError::ConnectionError(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
