// Submodule for function calling: types, request conversion, client, dispatcher, and the two-round pipeline.

pub mod types;
pub mod request;
pub mod client;
pub mod dispatcher;
pub mod pipeline;

pub use types::{CompletionRequest, DispatchedCall, FunctionCallMode, FunctionCallOutcome, PipelineEvent};
pub use client::{AzureCompletionClient, CompletionClient};
pub use dispatcher::{decode_arguments, dispatch};
pub use pipeline::{run_function_calling, run_function_calling_with_logger, PipelineOptions};
