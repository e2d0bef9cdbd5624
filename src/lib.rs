// 同階層のファイルをモジュールとしてインポート
pub mod catalog;
pub mod config;
pub mod openai;

pub use catalog::CatalogClient;
pub use config::{AzureSettings, Config};

// Ensure .env is loaded for tests before anything else runs in the test process.
#[cfg(test)]
#[ctor::ctor]
fn load_dotenv_for_tests() {
    let _ = dotenvy::dotenv();
}
