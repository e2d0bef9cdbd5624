//! アプリケーション設定（Azure OpenAI 接続情報とパイプラインの調整値）

use color_eyre::{eyre::eyre, Result};

/// 講座カタログ API の既定 URL
pub const DEFAULT_CATALOG_URL: &str = "https://learn.microsoft.com/api/catalog/";

/// 既定のユーザープロンプト
pub const DEFAULT_PROMPT: &str = "Find me a good course for a beginner student to learn Azure.";

/// Azure OpenAI への接続情報。起動時に一度だけ読み込み、以後は不変。
#[derive(Clone, PartialEq, Eq)]
pub struct AzureSettings {
    /// デプロイメント名（リクエストの model としても使う）
    pub deployment: String,
    pub api_key: String,
    pub api_version: String,
    /// 例: https://my-resource.openai.azure.com
    pub endpoint: String,
}

// api_key をログに出さない
impl std::fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSettings")
            .field("deployment", &self.deployment)
            .field("api_key", &"***")
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AzureSettings {
    /// プロセス環境変数から読み込む
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から読み込む（テストで環境変数を触らずに済む）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(eyre!("{key} not set")),
            }
        };
        Ok(Self {
            deployment: get("AZURE_OPENAI_DEPLOYMENT")?,
            api_key: get("AZURE_OPENAI_API_KEY")?,
            api_version: get("AZURE_OPENAI_API_VERSION")?,
            endpoint: get("AZURE_OPENAI_ENDPOINT")?.trim_end_matches('/').to_string(),
        })
    }
}

/// パイプライン設定
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// 講座カタログ API の URL
    pub catalog_url: String,
    /// カタログ結果から採用する最大件数
    pub max_results: usize,
    /// 2 回目の問い合わせで使う temperature
    pub final_temperature: f32,
    /// カタログ HTTP 呼び出しのタイムアウト（秒）
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            // NOTE: Keep in sync with tests (tests/config_tests.rs).
            max_results: 5,
            final_temperature: 0.0,
            http_timeout_secs: 15,
        }
    }
}

impl Config {
    /// 新しい設定インスタンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既定値に環境変数 `COURSE_CATALOG_URL` の上書きを適用する
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("COURSE_CATALOG_URL").filter(|v| !v.trim().is_empty()) {
            config.catalog_url = url.trim().to_string();
        }
        config
    }

    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }
}
