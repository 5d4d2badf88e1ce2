// Configuration structs

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the chat-completions provider
    pub api_key: String,

    /// Model name sent with each analysis request
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    pub base_url: String,

    /// Directory holding the journal database
    pub data_dir: PathBuf,

    /// Bind address for `teddy serve`
    pub bind_address: String,

    /// Days of notification history kept by `teddy prune`
    pub prune_after_days: i64,
}

impl Config {
    pub fn new(api_key: String) -> Self {
        let home = dirs::home_dir().expect("Could not determine home directory");

        Self {
            api_key,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            data_dir: home.join(".teddy"),
            bind_address: "127.0.0.1:8088".to_string(),
            prune_after_days: crate::notify::DEFAULT_RETENTION_DAYS,
        }
    }

    /// Path of the SQLite database inside the data directory
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("journal.db")
    }
}
