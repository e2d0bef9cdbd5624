//! 会話・関数スキーマと async-openai の型との相互変換

use crate::openai::error::CompletionError;
use crate::openai::history::{FunctionCallDirective, Message};
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionFunctionCall,
    ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestFunctionMessageArgs,
    ChatCompletionRequestMessage,
    ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse,
    FunctionCall,
};
use tracing::debug;

use super::types::CompletionRequest;

/// 会話中の 1 メッセージを API のリクエストメッセージへ変換する
#[allow(deprecated)]
pub fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let msg: ChatCompletionRequestMessage = match message {
        Message::User { content } => ChatCompletionRequestUserMessageArgs::default()
            .content(content.as_str())
            .build()?
            .into(),
        Message::Assistant { content, function_call } => {
            let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(text) = content {
                builder.content(text.as_str());
            }
            if let Some(call) = function_call {
                builder.function_call(FunctionCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                });
            }
            builder.build()?.into()
        }
        Message::Function { name, content } => ChatCompletionRequestFunctionMessageArgs::default()
            .name(name.as_str())
            .content(content.as_str())
            .build()?
            .into(),
    };
    Ok(msg)
}

/// ChatCompletion リクエストを構築する
///
/// 関数スキーマが空の場合は `functions` / `function_call` を送らない
/// （空配列は API 側で拒否されるため、関数選択を無効にする扱い）。
#[allow(deprecated)]
pub fn build_chat_request(
    model: &str,
    request: &CompletionRequest<'_>,
) -> Result<CreateChatCompletionRequest, OpenAIError> {
    let messages = request
        .conversation
        .iter()
        .map(to_request_message)
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = CreateChatCompletionRequestArgs::default();
    builder.model(model).messages(messages);

    if !request.functions.is_empty() {
        let functions: Vec<_> = request.functions.iter().map(|f| f.as_chat_function()).collect();
        builder
            .functions(functions)
            .function_call(ChatCompletionFunctionCall::from(&request.mode));
    }
    if let Some(t) = request.temperature {
        builder.temperature(t);
    }

    debug!(
        target: "openai",
        messages = request.conversation.len(),
        functions = request.functions.len(),
        mode = %request.mode,
        temperature = ?request.temperature,
        "chat_request_built"
    );
    builder.build()
}

/// レスポンスの先頭 choice を会話メッセージへ変換する
///
/// 旧形式の `function_call` を優先し、無ければ `tool_calls` の先頭を関数呼び出しとして扱う。
#[allow(deprecated)]
pub fn message_from_response(resp: CreateChatCompletionResponse) -> Result<Message, CompletionError> {
    let choice = resp.choices.into_iter().next().ok_or(CompletionError::NoChoices)?;
    let message = choice.message;

    let directive = message
        .function_call
        .map(|fc| FunctionCallDirective { name: fc.name, arguments: fc.arguments })
        .or_else(|| {
            message
                .tool_calls
                .and_then(|calls| calls.into_iter().next())
                .map(|tc| FunctionCallDirective { name: tc.function.name, arguments: tc.function.arguments })
        });

    Ok(Message::Assistant { content: message.content, function_call: directive })
}
