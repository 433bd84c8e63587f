//! Rule-based dialogue engine for the kruxdesk support bot.
//!
//! Pure functions mapping flows, option selections, and status-check input to
//! scripted responses. Failures degrade to default responses rather than
//! erroring; the one modeled error path is the "application not found"
//! status response.

pub mod flows;
pub mod selection;
pub mod status;
pub mod types;

pub use flows::respond;
pub use selection::handle_selection;
pub use status::{check_status, extract_application_id, format_inr};
pub use types::{BotFlow, BotOption, BotResponse, DialogueState, InputKind};
