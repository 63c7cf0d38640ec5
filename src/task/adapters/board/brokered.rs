//! Board mirror that brokers card operations through a board tool server.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use super::card::{CardContent, CardStage};
use crate::task::{
    domain::{BoardCardId, Task},
    ports::{BoardMirror, BoardMirrorError, BoardMirrorMode, BoardMirrorResult, ToolHost},
};

/// Tool invoked to create a card.
pub const CREATE_CARD_TOOL: &str = "create_card";
/// Tool invoked to refresh a card.
pub const UPDATE_CARD_TOOL: &str = "update_card";

/// Board mirror delegating to `create_card` / `update_card` tools.
#[derive(Clone)]
pub struct BrokeredBoardMirror {
    host: Arc<dyn ToolHost>,
}

impl BrokeredBoardMirror {
    /// Creates a mirror brokered through `host`.
    #[must_use]
    pub fn new(host: Arc<dyn ToolHost>) -> Self {
        Self { host }
    }
}

impl std::fmt::Debug for BrokeredBoardMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokeredBoardMirror").finish_non_exhaustive()
    }
}

fn broker_error(err: impl std::error::Error + Send + Sync + 'static) -> BoardMirrorError {
    BoardMirrorError::transport(err)
}

/// Extracts a card identifier from a tool result.
///
/// Structured content is preferred (`id` or `card_id`); otherwise the first
/// text block is read either as a JSON object carrying one of those keys or
/// as a bare identifier.
fn card_id_from_result(result: &Value) -> Option<BoardCardId> {
    let from_object = |value: &Value| {
        ["id", "card_id"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .and_then(|raw| BoardCardId::new(raw).ok())
    };

    if let Some(card_id) = result.get("structuredContent").and_then(from_object) {
        return Some(card_id);
    }

    let text = result
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        })
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)?
        .trim();

    if let Ok(parsed) = serde_json::from_str::<Value>(text) {
        return from_object(&parsed);
    }
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        return None;
    }
    BoardCardId::new(text).ok()
}

#[async_trait]
impl BoardMirror for BrokeredBoardMirror {
    fn mode(&self) -> BoardMirrorMode {
        BoardMirrorMode::HostBrokered
    }

    async fn create_card(&self, task: &Task) -> BoardMirrorResult<Option<BoardCardId>> {
        let content = CardContent::for_task(task, CardStage::Created)?;
        let result = self
            .host
            .call_tool(
                CREATE_CARD_TOOL,
                json!({
                    "name": content.name,
                    "description": content.description,
                    "list_name": content.list_name,
                }),
            )
            .await
            .map_err(broker_error)?;
        let card_id = card_id_from_result(&result);
        debug!(task_id = %task.id(), card_id = ?card_id, "brokered card creation finished");
        Ok(card_id)
    }

    async fn update_card(&self, task: &Task) -> BoardMirrorResult<()> {
        let Some(card_id) = task.board_card_id() else {
            return Ok(());
        };
        let content = CardContent::for_task(task, CardStage::Updated)?;
        self.host
            .call_tool(
                UPDATE_CARD_TOOL,
                json!({
                    "card_id": card_id.as_str(),
                    "description": content.description,
                    "list_name": content.list_name,
                }),
            )
            .await
            .map_err(broker_error)?;
        debug!(task_id = %task.id(), card_id = %card_id, "brokered card update finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::card_id_from_result;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(json!({"structuredContent": {"id": "card-1"}}), Some("card-1"))]
    #[case(json!({"structuredContent": {"card_id": "card-2"}}), Some("card-2"))]
    #[case(json!({"content": [{"type": "text", "text": "{\"id\": \"card-3\"}"}]}), Some("card-3"))]
    #[case(json!({"content": [{"type": "text", "text": " card-4 \n"}]}), Some("card-4"))]
    #[case(json!({"content": [{"type": "text", "text": "Card created successfully"}]}), None)]
    #[case(json!({"content": []}), None)]
    fn card_id_is_extracted_from_tool_results(#[case] result: Value, #[case] expected: Option<&str>) {
        let card_id = card_id_from_result(&result);
        assert_eq!(card_id.as_ref().map(|id| id.as_str()), expected);
    }
}
