//! function calling パイプラインのエラー分類
//!
//! どれもローカルでは回復せず、そのまま呼び出し元へ伝播させる。

use async_openai::error::OpenAIError;
use thiserror::Error;

/// 関数実行側のエラー型（ハンドラが返す任意のエラー）
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Completion Client 境界のエラー
#[derive(Debug, Error)]
pub enum CompletionError {
    /// API 呼び出し自体の失敗（認証・レート制限・ネットワークなど）
    #[error(transparent)]
    Api(OpenAIError),
    /// リクエスト組み立ての失敗
    #[error("failed to build chat completion request: {0}")]
    Build(OpenAIError),
    #[error("chat completion returned no choices")]
    NoChoices,
    /// 2 回目の問い合わせで再び関数呼び出しが返ってきた
    #[error("model requested another function call ({name}) after the function result was supplied")]
    UnexpectedFunctionCall { name: String },
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// パイプライン全体のエラー
#[derive(Debug, Error)]
pub enum CallError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    /// ディスパッチテーブルに存在しない関数名
    #[error("model requested unknown function `{name}`")]
    UnknownFunction { name: String },
    /// 引数 JSON が壊れている、または必須パラメータが欠けている
    #[error("malformed arguments for `{name}`: {reason} (raw: {raw})")]
    MalformedArguments { name: String, raw: String, reason: String },
    /// 関数自身の I/O 失敗、または想定外のレスポンス形状
    #[error("function `{name}` failed: {source}")]
    FunctionExecutionFailed {
        name: String,
        #[source]
        source: BoxError,
    },
    #[error(transparent)]
    CompletionClient(#[from] CompletionError),
}

impl CallError {
    pub fn malformed(name: &str, raw: &str, reason: impl Into<String>) -> Self {
        CallError::MalformedArguments {
            name: name.to_string(),
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}
