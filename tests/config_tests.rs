use course_finder::config::{Config, DEFAULT_CATALOG_URL, DEFAULT_PROMPT};
use course_finder::openai::PipelineOptions;
mod common;

#[ctor::ctor]
fn _init() { common::init(); }

#[test]
fn config_defaults() {
    let c = Config::new();
    assert_eq!(c.catalog_url, DEFAULT_CATALOG_URL);
    assert_eq!(c.max_results, 5);
    assert_eq!(c.final_temperature, 0.0);
    assert_eq!(c.http_timeout_secs, 15);
}

#[test]
fn pipeline_options_follow_config() {
    let mut c = Config::new();
    c.final_temperature = 0.2;
    let o = PipelineOptions::from(&c);
    assert_eq!(o.final_temperature, 0.2);
    assert_eq!(o.first_mode.to_string(), "auto");
}

#[test]
fn default_prompt_value() {
    assert_eq!(DEFAULT_PROMPT, "Find me a good course for a beginner student to learn Azure.");
}
