//! OpenAI (Azure) function calling のモジュール

pub mod call;
pub mod error;
pub mod history; // conversation history helper
pub mod tools;

// 代表的な公開APIを再エクスポート
pub use call::{
	AzureCompletionClient,
	CompletionClient,
	CompletionRequest,
	DispatchedCall,
	FunctionCallMode,
	FunctionCallOutcome,
	PipelineEvent,
	PipelineOptions,
	dispatch,
	run_function_calling,
	run_function_calling_with_logger,
};
pub use error::{CallError, CompletionError};
pub use history::{Conversation, FunctionCallDirective, Message};
pub use tools::{
	DispatchTable,
	FunctionSchema,
	HandlerError,
	ToolDefinition,
	ToolParametersBuilder,
	build_search_courses_tool,
	search_courses_schema,
};
