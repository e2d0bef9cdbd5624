use crate::config::Config;
use crate::openai::error::{CallError, CompletionError};
use crate::openai::history::Conversation;
use crate::openai::tools::DispatchTable;
use tracing::{debug, info, instrument};

use super::client::CompletionClient;
use super::dispatcher::dispatch;
use super::types::{CompletionRequest, DispatchedCall, FunctionCallMode, FunctionCallOutcome, PipelineEvent};

/// パイプラインの調整値
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// 1 回目の問い合わせの function_call モード（2 回目は常に auto）
    pub first_mode: FunctionCallMode,
    /// 2 回目の問い合わせの temperature（再現性のため低い固定値）
    pub final_temperature: f32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { first_mode: FunctionCallMode::Auto, final_temperature: 0.0 }
    }
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self { first_mode: FunctionCallMode::Auto, final_temperature: config.final_temperature }
    }
}

/// 3 ステップの function calling を 1 回だけ実行する。
///
/// 1. ユーザー発話と関数スキーマで問い合わせ
/// 2. 関数呼び出しが返れば実行し、指示と結果を会話に追加
/// 3. 更新した会話で再度問い合わせ、最終回答を得る
///
/// 1 回目がテキスト回答ならそれが最終回答になり、2 回目は行わない。
/// ループもリトライもしない。
#[instrument(name = "run_function_calling", skip(client, table, options))]
pub fn run_function_calling<C: CompletionClient + ?Sized>(
    client: &C,
    table: &DispatchTable,
    prompt: &str,
    options: &PipelineOptions,
) -> Result<FunctionCallOutcome, CallError> {
    run_internal(client, table, prompt, options, None)
}

#[instrument(name = "run_function_calling_with_logger", skip(client, table, options, logger))]
pub fn run_function_calling_with_logger<C: CompletionClient + ?Sized>(
    client: &C,
    table: &DispatchTable,
    prompt: &str,
    options: &PipelineOptions,
    logger: impl FnMut(&PipelineEvent),
) -> Result<FunctionCallOutcome, CallError> {
    let mut user_logger = logger;
    let mut log_and_forward = |ev: &PipelineEvent| {
        debug!(target: "openai", event = %ev, "pipeline_event");
        user_logger(ev);
    };
    let mut opt_logger: Option<&mut dyn FnMut(&PipelineEvent)> = Some(&mut log_and_forward);
    run_internal(client, table, prompt, options, opt_logger.as_deref_mut())
}

fn run_internal<C: CompletionClient + ?Sized>(
    client: &C,
    table: &DispatchTable,
    prompt: &str,
    options: &PipelineOptions,
    mut logger: Option<&mut dyn FnMut(&PipelineEvent)>,
) -> Result<FunctionCallOutcome, CallError> {
    let mut emit = |ev: PipelineEvent| {
        if let Some(cb) = logger.as_deref_mut() { cb(&ev); }
    };

    if prompt.trim().is_empty() {
        return Err(CallError::EmptyPrompt);
    }
    let mut conversation = Conversation::with_user(prompt);

    let first = client.complete(&CompletionRequest {
        conversation: &conversation,
        functions: table.schemas(),
        mode: options.first_mode.clone(),
        temperature: None,
    })?;
    emit(PipelineEvent::FirstResponse { message: first.clone() });

    let Some(directive) = first.function_call().cloned() else {
        info!(target: "openai", "first_response_terminal");
        emit(PipelineEvent::FinalMessage { message: first.clone() });
        return Ok(FunctionCallOutcome { conversation, final_message: first, dispatched: None });
    };

    emit(PipelineEvent::FunctionSelected { name: directive.name.clone() });
    let output = dispatch(&directive, table)?;
    info!(target: "openai", function = %directive.name, output_len = output.len(), "function_dispatched");
    emit(PipelineEvent::FunctionOutput { name: directive.name.clone(), output: output.clone() });

    conversation.append_function_exchange(&directive, output.clone());
    emit(PipelineEvent::HistoryUpdated { conversation: conversation.clone() });

    let second = client.complete(&CompletionRequest {
        conversation: &conversation,
        functions: table.schemas(),
        mode: FunctionCallMode::Auto,
        temperature: Some(options.final_temperature),
    })?;
    if let Some(call) = second.function_call() {
        return Err(CompletionError::UnexpectedFunctionCall { name: call.name.clone() }.into());
    }
    emit(PipelineEvent::FinalMessage { message: second.clone() });

    Ok(FunctionCallOutcome {
        conversation,
        final_message: second,
        dispatched: Some(DispatchedCall { name: directive.name, output }),
    })
}
