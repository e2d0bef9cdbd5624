use crate::openai::history::{Conversation, Message};
use crate::openai::tools::FunctionSchema;
use async_openai::types::ChatCompletionFunctionCall;
use std::convert::Infallible;
use std::fmt::{self, Display};
use std::str::FromStr;

/// モデルに関数呼び出しをどこまで許すか
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FunctionCallMode {
    /// 呼ぶかどうかはモデルに任せる
    #[default]
    Auto,
    /// 関数を呼ばせない
    None,
    /// 指定した関数を必ず呼ばせる
    Named(String),
}

impl FromStr for FunctionCallMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "auto" => FunctionCallMode::Auto,
            "none" => FunctionCallMode::None,
            name => FunctionCallMode::Named(name.to_string()),
        })
    }
}

impl Display for FunctionCallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionCallMode::Auto => f.write_str("auto"),
            FunctionCallMode::None => f.write_str("none"),
            FunctionCallMode::Named(name) => f.write_str(name),
        }
    }
}

impl From<&FunctionCallMode> for ChatCompletionFunctionCall {
    fn from(mode: &FunctionCallMode) -> Self {
        match mode {
            FunctionCallMode::Auto => ChatCompletionFunctionCall::Auto,
            FunctionCallMode::None => ChatCompletionFunctionCall::None,
            FunctionCallMode::Named(name) => ChatCompletionFunctionCall::Function { name: name.clone() },
        }
    }
}

/// Completion Client に渡す 1 回分の問い合わせ
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub conversation: &'a Conversation,
    pub functions: &'a [FunctionSchema],
    pub mode: FunctionCallMode,
    /// None の場合はサービス側の既定値
    pub temperature: Option<f32>,
}

/// 実行された関数呼び出しの記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedCall {
    pub name: String,
    pub output: String,
}

/// パイプラインの実行結果
#[derive(Debug, Clone)]
pub struct FunctionCallOutcome {
    /// 2 回目の問い合わせに送った会話（関数が呼ばれなかった場合はユーザー発話のみ）
    pub conversation: Conversation,
    pub final_message: Message,
    pub dispatched: Option<DispatchedCall>,
}

/// 進捗通知（コンソール表示やテストでの観測用）
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    FirstResponse { message: Message },
    FunctionSelected { name: String },
    FunctionOutput { name: String, output: String },
    HistoryUpdated { conversation: Conversation },
    FinalMessage { message: Message },
}

impl Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::FirstResponse { message } => match message.function_call() {
                Some(call) => write!(f, "FirstResponse function_call={} args={}", call.name, call.arguments),
                None => write!(f, "FirstResponse text(len={})", message.content().map_or(0, str::len)),
            },
            PipelineEvent::FunctionSelected { name } => write!(f, "FunctionSelected name={}", name),
            PipelineEvent::FunctionOutput { name, output } => {
                write!(f, "FunctionOutput name={} len={}", name, output.len())
            }
            PipelineEvent::HistoryUpdated { conversation } => {
                write!(f, "HistoryUpdated messages={}", conversation.len())
            }
            PipelineEvent::FinalMessage { message } => {
                write!(f, "FinalMessage len={}", message.content().map_or(0, str::len))
            }
        }
    }
}
