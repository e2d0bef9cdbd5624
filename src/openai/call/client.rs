use crate::config::AzureSettings;
use crate::openai::error::CompletionError;
use crate::openai::history::Message;
use async_openai::config::AzureConfig;
use async_openai::Client;
use tokio::runtime::Runtime;
use tracing::{debug, info, instrument};

use super::request::{build_chat_request, message_from_response};
use super::types::CompletionRequest;

/// ホストされたチャット補完サービスとの境界。
/// パイプラインは同期的に進むため、呼び出しは応答が返るまでブロックする。
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<Message, CompletionError>;
}

impl<C: CompletionClient + ?Sized> CompletionClient for &C {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<Message, CompletionError> {
        (**self).complete(request)
    }
}

/// Azure OpenAI 実装。専用の Tokio ランタイム上で async-openai を実行する。
pub struct AzureCompletionClient {
    client: Client<AzureConfig>,
    deployment: String,
    runtime: Runtime,
}

impl std::fmt::Debug for AzureCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCompletionClient")
            .field("deployment", &self.deployment)
            .finish_non_exhaustive()
    }
}

impl AzureCompletionClient {
    pub fn new(settings: &AzureSettings) -> Result<Self, CompletionError> {
        let config = AzureConfig::new()
            .with_api_base(settings.endpoint.as_str())
            .with_api_version(settings.api_version.as_str())
            .with_deployment_id(settings.deployment.as_str())
            .with_api_key(settings.api_key.as_str());
        Ok(Self {
            client: Client::with_config(config),
            deployment: settings.deployment.clone(),
            runtime: Runtime::new()?,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// 非同期版
    #[instrument(name = "chat_completion", skip(self, request), fields(deployment = %self.deployment, messages = request.conversation.len()))]
    pub async fn complete_async(&self, request: &CompletionRequest<'_>) -> Result<Message, CompletionError> {
        let req = build_chat_request(&self.deployment, request).map_err(CompletionError::Build)?;

        info!(target: "openai", mode = %request.mode, temperature = ?request.temperature, "chat_completion_request");
        let resp = self.client.chat().create(req).await.map_err(CompletionError::Api)?;
        debug!(target: "openai", choices = resp.choices.len(), "chat_completion_response");

        message_from_response(resp)
    }
}

impl CompletionClient for AzureCompletionClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<Message, CompletionError> {
        self.runtime.block_on(self.complete_async(request))
    }
}
