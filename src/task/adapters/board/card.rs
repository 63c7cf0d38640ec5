//! Card content shared by the board mirror adapters.

use crate::task::{
    domain::Task,
    ports::{BoardMirrorError, BoardMirrorResult},
};
use minijinja::{Environment, context};

const DESCRIPTION_TEMPLATE: &str = "\
**Description:** {{ description }}

**Status:** {{ status }}
**Assigned to:** {{ assignee }}
**{{ stamp_label }}:** {{ stamp }}";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether the card is being created or refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStage {
    /// The card is being created; the description carries `created_at`.
    Created,
    /// The card is being refreshed; the description carries `updated_at`.
    Updated,
}

/// Rendered card fields for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContent {
    /// Card title, `"<id>: <title>"`.
    pub name: String,
    /// Markdown card body.
    pub description: String,
    /// Board list matching the task status.
    pub list_name: &'static str,
}

impl CardContent {
    /// Renders card fields for `task`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardMirrorError::Render`] when the description template
    /// fails to render.
    pub fn for_task(task: &Task, stage: CardStage) -> BoardMirrorResult<Self> {
        let (stamp_label, stamp) = match stage {
            CardStage::Created => ("Created", task.created_at()),
            CardStage::Updated => ("Updated", task.updated_at()),
        };
        let assignee = task
            .assigned_role()
            .map_or("Unassigned", |role| role.as_str());

        let description = Environment::new()
            .render_str(
                DESCRIPTION_TEMPLATE,
                context! {
                    description => task.description(),
                    status => task.status().as_str(),
                    assignee => assignee,
                    stamp_label => stamp_label,
                    stamp => stamp.format(TIMESTAMP_FORMAT).to_string(),
                },
            )
            .map_err(|error| BoardMirrorError::Render(error.to_string()))?;

        Ok(Self {
            name: format!("{}: {}", task.id(), task.title()),
            description,
            list_name: task.status().board_list_name(),
        })
    }
}
