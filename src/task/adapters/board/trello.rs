//! Direct Trello REST API board mirror.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use super::card::{CardContent, CardStage};
use crate::task::{
    domain::{BoardCardId, Task, TaskStatus},
    ports::{BoardMirror, BoardMirrorError, BoardMirrorMode, BoardMirrorResult},
};

/// Default Trello API origin.
pub const DEFAULT_TRELLO_API_URL: &str = "https://api.trello.com";

/// Longest response body kept in a rejection error.
const MAX_ERROR_BODY: usize = 512;

/// Credentials and endpoint for the Trello REST API.
#[derive(Clone, PartialEq, Eq)]
pub struct TrelloConfig {
    api_key: String,
    token: String,
    board_id: String,
    api_url: String,
    timeout: Duration,
}

impl TrelloConfig {
    /// Creates a configuration for the public Trello API with a 10 second
    /// request timeout.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        token: impl Into<String>,
        board_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            token: token.into(),
            board_id: board_id.into(),
            api_url: DEFAULT_TRELLO_API_URL.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Overrides the API origin.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the working board identifier.
    #[must_use]
    pub fn board_id(&self) -> &str {
        &self.board_id
    }
}

impl std::fmt::Debug for TrelloConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloConfig")
            .field("board_id", &self.board_id)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TrelloBoard {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TrelloList {
    id: String,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TrelloCard {
    id: String,
    #[serde(rename = "idList")]
    id_list: String,
}

/// Board mirror talking to the Trello REST API.
#[derive(Debug, Clone)]
pub struct TrelloBoardMirror {
    config: TrelloConfig,
    http: Client,
}

impl TrelloBoardMirror {
    /// Builds the HTTP client and verifies the working board is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`BoardMirrorError::BoardNotFound`] when the board does not
    /// exist, or a transport error when the API cannot be reached.
    pub async fn connect(config: TrelloConfig) -> BoardMirrorResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("baton/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(BoardMirrorError::transport)?;
        let mirror = Self { config, http };

        let board: TrelloBoard = mirror
            .send_json(mirror.get(&format!("/1/boards/{}", mirror.config.board_id)))
            .await
            .map_err(|err| match err {
                BoardMirrorError::Rejected { status: 404, .. } => {
                    BoardMirrorError::BoardNotFound(mirror.config.board_id.clone())
                }
                other => other,
            })?;
        info!(board_id = %board.id, board_name = %board.name, "connected to Trello board");
        Ok(mirror)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    fn authorised(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.query(&[
            ("key", self.config.api_key.as_str()),
            ("token", self.config.token.as_str()),
        ])
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorised(self.http.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorised(self.http.post(self.url(path)))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.authorised(self.http.put(self.url(path)))
    }

    async fn send(builder: RequestBuilder) -> BoardMirrorResult<Response> {
        let response = builder.send().await.map_err(BoardMirrorError::transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|index| body.is_char_boundary(*index))
                .unwrap_or(0);
            body.truncate(cut);
        }
        Err(BoardMirrorError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> BoardMirrorResult<T> {
        Self::send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|err| BoardMirrorError::UnexpectedResponse(err.to_string()))
    }

    async fn lists(&self) -> BoardMirrorResult<Vec<TrelloList>> {
        let path = format!("/1/boards/{}/lists", self.config.board_id);
        self.send_json(self.get(&path).query(&[("fields", "id,name")]))
            .await
    }

    async fn find_list(&self, name: &str) -> BoardMirrorResult<Option<TrelloList>> {
        Ok(self.lists().await?.into_iter().find(|list| list.name == name))
    }

    async fn find_or_create_list(&self, name: &str) -> BoardMirrorResult<TrelloList> {
        if let Some(list) = self.find_list(name).await? {
            return Ok(list);
        }
        debug!(list = name, "creating missing Trello list");
        self.send_json(
            self.post("/1/lists")
                .query(&[("name", name), ("idBoard", self.config.board_id.as_str())]),
        )
        .await
    }
}

#[async_trait]
impl BoardMirror for TrelloBoardMirror {
    fn mode(&self) -> BoardMirrorMode {
        BoardMirrorMode::DirectApi
    }

    async fn create_card(&self, task: &Task) -> BoardMirrorResult<Option<BoardCardId>> {
        let content = CardContent::for_task(task, CardStage::Created)?;
        let list = self
            .find_or_create_list(TaskStatus::Todo.board_list_name())
            .await?;
        let card: TrelloCard = self
            .send_json(self.post("/1/cards").query(&[
                ("idList", list.id.as_str()),
                ("name", content.name.as_str()),
                ("desc", content.description.as_str()),
            ]))
            .await?;
        debug!(task_id = %task.id(), card_id = %card.id, list = %card.id_list, "created Trello card");
        BoardCardId::new(card.id)
            .map(Some)
            .map_err(|err| BoardMirrorError::UnexpectedResponse(err.to_string()))
    }

    async fn update_card(&self, task: &Task) -> BoardMirrorResult<()> {
        let Some(card_id) = task.board_card_id() else {
            return Ok(());
        };
        let content = CardContent::for_task(task, CardStage::Updated)?;
        let path = format!("/1/cards/{card_id}");

        let card: TrelloCard = self
            .send_json(self.get(&path).query(&[("fields", "id,idList")]))
            .await?;
        let target_list = self.find_list(content.list_name).await?;

        let mut request = self
            .put(&path)
            .query(&[("desc", content.description.as_str())]);
        if let Some(list) = target_list.filter(|list| list.id != card.id_list) {
            request = request.query(&[("idList", list.id.as_str())]);
        }
        Self::send(request).await?;
        debug!(task_id = %task.id(), card_id = %card_id, "updated Trello card");
        Ok(())
    }
}
