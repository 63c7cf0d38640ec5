//! Board mirror adapters: disabled, direct Trello API, and host-brokered.

mod brokered;
mod card;
mod disabled;
mod trello;

pub use brokered::{BrokeredBoardMirror, CREATE_CARD_TOOL, UPDATE_CARD_TOOL};
pub use card::{CardContent, CardStage};
pub use disabled::DisabledBoardMirror;
pub use trello::{DEFAULT_TRELLO_API_URL, TrelloBoardMirror, TrelloConfig};
