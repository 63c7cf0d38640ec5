//! Command-line and environment settings.
//!
//! Every flag has an environment variable fallback so the server can be
//! configured entirely from an MCP client's launch configuration.

use crate::task::{
    adapters::{
        DEFAULT_TASKS_FILE, DEFAULT_TRANSITIONS_FILE, JsonFileSnapshotStore, StdioToolHost,
        StdioToolHostConfig,
        board::{
            BrokeredBoardMirror, DEFAULT_TRELLO_API_URL, DisabledBoardMirror, TrelloBoardMirror,
            TrelloConfig,
        },
    },
    ports::{BoardMirror, BoardMirrorError, SnapshotResult},
};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// How the board mirror should be selected at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoardModeSetting {
    /// Brokered when a broker command is set, direct when Trello
    /// credentials are present and the board answers, otherwise disabled.
    Auto,
    /// Never mirror.
    Disabled,
    /// Call the Trello REST API directly.
    Direct,
    /// Broker card operations through a board tool server.
    Brokered,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// Newline-delimited JSON.
    Json,
}

/// Settings for the baton MCP server.
#[derive(Debug, Clone, Parser)]
#[command(name = "baton", version, about = "Role-gated task orchestration over MCP")]
pub struct Settings {
    /// Directory holding the snapshot files.
    #[arg(long, env = "BATON_DATA_DIR", default_value = ".")]
    pub data_dir: Utf8PathBuf,

    /// Task snapshot file name inside the data directory.
    #[arg(long, env = "BATON_TASKS_FILE", default_value = DEFAULT_TASKS_FILE)]
    pub tasks_file: String,

    /// Transition snapshot file name inside the data directory.
    #[arg(long, env = "BATON_TRANSITIONS_FILE", default_value = DEFAULT_TRANSITIONS_FILE)]
    pub transitions_file: String,

    /// Board mirror selection.
    #[arg(long, env = "BATON_BOARD_MODE", value_enum, default_value_t = BoardModeSetting::Auto)]
    pub board_mode: BoardModeSetting,

    /// Trello API key.
    #[arg(long, env = "TRELLO_API_KEY", hide_env_values = true)]
    pub trello_api_key: Option<String>,

    /// Trello API token.
    #[arg(long, env = "TRELLO_TOKEN", hide_env_values = true)]
    pub trello_token: Option<String>,

    /// Trello board that receives cards.
    #[arg(long, env = "TRELLO_WORKING_BOARD_ID")]
    pub trello_board_id: Option<String>,

    /// Trello API origin.
    #[arg(long, env = "BATON_TRELLO_API_URL", default_value = DEFAULT_TRELLO_API_URL)]
    pub trello_api_url: String,

    /// Timeout for each board call, in seconds.
    #[arg(long, env = "BATON_BOARD_TIMEOUT_SECS", default_value_t = 10)]
    pub board_timeout_secs: u64,

    /// Executable of the board tool server used in brokered mode.
    #[arg(long, env = "BATON_BOARD_BROKER_COMMAND")]
    pub broker_command: Option<String>,

    /// Arguments passed to the board tool server, space separated.
    #[arg(
        long,
        env = "BATON_BOARD_BROKER_ARGS",
        value_delimiter = ' ',
        allow_hyphen_values = true
    )]
    pub broker_args: Vec<String>,

    /// Log line format.
    #[arg(long, env = "BATON_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Errors raised while turning settings into adapters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Direct mode was requested without complete Trello credentials.
    #[error("direct board mode needs TRELLO_API_KEY, TRELLO_TOKEN and TRELLO_WORKING_BOARD_ID")]
    MissingTrelloCredentials,

    /// Brokered mode was requested without a broker command.
    #[error("brokered board mode needs BATON_BOARD_BROKER_COMMAND")]
    MissingBrokerCommand,

    /// The explicitly requested board could not be reached.
    #[error("board unavailable: {0}")]
    BoardUnavailable(#[from] BoardMirrorError),
}

/// Board mirror chosen from the settings, before any connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardPlan {
    /// No mirror.
    Disabled,
    /// Trello REST API.
    Direct(TrelloConfig),
    /// Board tool server child process.
    Brokered(StdioToolHostConfig),
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|trimmed| !trimmed.is_empty())
}

impl Settings {
    /// Returns the per-call board timeout.
    #[must_use]
    pub const fn board_timeout(&self) -> Duration {
        Duration::from_secs(self.board_timeout_secs)
    }

    /// Returns Trello settings when the key, token, and board are all set.
    #[must_use]
    pub fn trello_config(&self) -> Option<TrelloConfig> {
        let key = non_blank(self.trello_api_key.as_ref())?;
        let token = non_blank(self.trello_token.as_ref())?;
        let board = non_blank(self.trello_board_id.as_ref())?;
        Some(
            TrelloConfig::new(key, token, board)
                .with_api_url(self.trello_api_url.as_str())
                .with_timeout(self.board_timeout()),
        )
    }

    /// Returns broker launch settings when a command is set.
    #[must_use]
    pub fn broker_config(&self) -> Option<StdioToolHostConfig> {
        let command = non_blank(self.broker_command.as_ref())?;
        Some(
            StdioToolHostConfig::new(command)
                .with_args(self.broker_args.iter().filter(|arg| !arg.is_empty()).cloned())
                .with_timeout(self.board_timeout()),
        )
    }

    /// Chooses the board mirror without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit mode lacks its settings.
    pub fn board_plan(&self) -> Result<BoardPlan, ConfigError> {
        match self.board_mode {
            BoardModeSetting::Disabled => Ok(BoardPlan::Disabled),
            BoardModeSetting::Direct => self
                .trello_config()
                .map(BoardPlan::Direct)
                .ok_or(ConfigError::MissingTrelloCredentials),
            BoardModeSetting::Brokered => self
                .broker_config()
                .map(BoardPlan::Brokered)
                .ok_or(ConfigError::MissingBrokerCommand),
            BoardModeSetting::Auto => Ok(self
                .broker_config()
                .map(BoardPlan::Brokered)
                .or_else(|| self.trello_config().map(BoardPlan::Direct))
                .unwrap_or(BoardPlan::Disabled)),
        }
    }

    /// Builds the board mirror, connecting to Trello in direct mode.
    ///
    /// In auto mode an unreachable board falls back to a disabled mirror.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit mode lacks its settings or
    /// the explicitly requested board cannot be reached.
    pub async fn connect_board_mirror(&self) -> Result<Arc<dyn BoardMirror>, ConfigError> {
        let mirror: Arc<dyn BoardMirror> = match self.board_plan()? {
            BoardPlan::Disabled => Arc::new(DisabledBoardMirror),
            BoardPlan::Brokered(host_config) => {
                info!(
                    command = host_config.command(),
                    "board mirror brokered through tool server"
                );
                let host = StdioToolHost::new(host_config);
                Arc::new(BrokeredBoardMirror::new(Arc::new(host)))
            }
            BoardPlan::Direct(trello) => match TrelloBoardMirror::connect(trello).await {
                Ok(direct) => Arc::new(direct),
                Err(err) if self.board_mode == BoardModeSetting::Auto => {
                    warn!(error = %err, "Trello board unreachable, board mirror disabled");
                    Arc::new(DisabledBoardMirror)
                }
                Err(err) => return Err(err.into()),
            },
        };
        info!(mode = %mirror.mode(), "board mirror ready");
        Ok(mirror)
    }

    /// Opens the JSON snapshot store in the data directory.
    ///
    /// # Errors
    ///
    /// Returns snapshot errors when the directory cannot be created or
    /// opened.
    pub fn snapshot_store(&self) -> SnapshotResult<JsonFileSnapshotStore> {
        Ok(JsonFileSnapshotStore::open(&self.data_dir)?
            .with_file_names(self.tasks_file.as_str(), self.transitions_file.as_str()))
    }
}
