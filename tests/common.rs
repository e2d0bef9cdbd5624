#![allow(dead_code)]

use course_finder::openai::{
    CompletionClient, CompletionError, CompletionRequest, Conversation, FunctionCallDirective,
    FunctionCallMode, Message,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Once;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static START: Once = Once::new();
static _GUARD: Lazy<std::sync::Mutex<Option<tracing_appender::non_blocking::WorkerGuard>>> =
    Lazy::new(|| std::sync::Mutex::new(None));

/// Initialize test environment: dotenv and tracing (stderr + file).
/// Idempotent: safe to call multiple times.
pub fn init() {
    START.call_once(|| {
        let _ = dotenvy::dotenv();
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info"))
            .expect("env filter");

        // Daily rotating log file separate from app runtime logs
        let file_appender = rolling::daily("logs", "tests.log");
        let (file_nb, guard) = tracing_appender::non_blocking(file_appender);
        *_GUARD.lock().unwrap() = Some(guard); // retain guard for lifetime

        let stderr_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_writer(std::io::stderr);

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_names(true)
            .with_writer(file_nb);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();

        tracing::info!(target = "test_init", "Test tracing initialized (stderr + rotating file)");
    });
}

/// What the fake client saw on one `complete` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub conversation: Conversation,
    pub functions: Vec<String>,
    pub mode: FunctionCallMode,
    pub temperature: Option<f32>,
}

/// Completion client that replays canned responses in order and records every request.
#[derive(Default)]
pub struct ScriptedClient {
    responses: RefCell<VecDeque<Result<Message, CompletionError>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new(responses: impl IntoIterator<Item = Result<Message, CompletionError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn replying(messages: impl IntoIterator<Item = Message>) -> Self {
        Self::new(messages.into_iter().map(Ok))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl CompletionClient for ScriptedClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<Message, CompletionError> {
        self.calls.borrow_mut().push(RecordedCall {
            conversation: request.conversation.clone(),
            functions: request.functions.iter().map(|f| f.name.clone()).collect(),
            mode: request.mode.clone(),
            temperature: request.temperature,
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(CompletionError::NoChoices))
    }
}

pub fn call(name: &str, arguments: &str) -> Message {
    Message::assistant_call(FunctionCallDirective { name: name.into(), arguments: arguments.into() })
}

/// Catalog body with `n` modules titled `Module 0`, `Module 1`, ...
pub fn catalog_body(n: usize) -> Value {
    let modules: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "uid": format!("learn.module-{i}"),
                "title": format!("Module {i}"),
                "url": format!("https://learn.microsoft.com/training/modules/m{i}/"),
                "levels": ["beginner"],
                "duration_in_minutes": 30
            })
        })
        .collect();
    json!({ "modules": modules, "learningPaths": [] })
}
