use clap::Parser;
use color_eyre::Result;
use course_finder::config::{AzureSettings, Config, DEFAULT_PROMPT};
use course_finder::openai::{
    build_search_courses_tool, run_function_calling_with_logger, AzureCompletionClient, DispatchTable,
    FunctionCallMode, PipelineEvent, PipelineOptions,
};
use course_finder::CatalogClient;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ask the model for a course recommendation, letting it call the course catalog.
#[derive(Debug, Parser)]
#[command(name = "course_finder", version)]
struct Cli {
    /// User prompt sent to the model
    #[arg(default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Catalog endpoint (overrides COURSE_CATALOG_URL)
    #[arg(long)]
    catalog_url: Option<String>,

    /// function_call mode for the first request: auto, none, or a function name
    #[arg(long, default_value = "auto")]
    function_call: FunctionCallMode,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // Load .env (optional). If the file doesn't exist, ignore the error.
    let _ = dotenvy::dotenv();

    // ログ: 標準出力はコンソール表示専用なので、ファイルへのみ出力する
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // ファイルにANSIカラー不要
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(url) = cli.catalog_url {
        config = config.with_catalog_url(url);
    }
    let azure = AzureSettings::from_env()?;
    tracing::info!(azure = ?azure, catalog_url = %config.catalog_url, "starting");

    let client = AzureCompletionClient::new(&azure)?;
    let table = DispatchTable::new([build_search_courses_tool(CatalogClient::new(&config)?)]);
    let options = PipelineOptions { first_mode: cli.function_call, ..PipelineOptions::from(&config) };

    let outcome = run_function_calling_with_logger(&client, &table, &cli.prompt, &options, print_event)?;

    if outcome.dispatched.is_none() {
        println!("The model answered without calling a function.");
        println!();
    }
    println!("{}", serde_json::to_string_pretty(&outcome.final_message)?);
    Ok(())
}

fn print_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::FunctionSelected { name } => {
            println!("Recommended Function call:");
            println!("{name}");
            println!();
        }
        PipelineEvent::FunctionOutput { output, .. } => {
            println!("Output of function call:");
            println!("{output}");
            println!("{}", std::any::type_name_of_val(output));
            println!();
        }
        PipelineEvent::HistoryUpdated { conversation } => {
            println!("Messages in next request:");
            match serde_json::to_string_pretty(conversation) {
                Ok(json) => println!("{json}"),
                Err(e) => println!("{conversation:?} ({e})"),
            }
            println!();
        }
        PipelineEvent::FirstResponse { .. } | PipelineEvent::FinalMessage { .. } => {}
    }
}
