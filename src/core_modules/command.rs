// THEORY:
// The `command` module answers user requests that arrive over a message bus as
// JSON payloads such as `{"command": "describe what is around me"}`. The free-form
// text is resolved exactly once, at the boundary, into a closed `Command` enum;
// from there on everything is an exhaustive `match`, and there is no runtime
// registry of handlers to mutate.
//
// The handler reads from a caller-owned `FrameWindow` and returns a `Response`
// that serializes to `{"response": "..."}`. Delivering it (bus, speech, screen)
// is the caller's business.

use crate::config::DescriberConfig;
use crate::core_modules::aggregator::aggregate;
use crate::core_modules::composer::compose;
use crate::core_modules::window::FrameWindow;
use crate::error::DescribeError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Keywords checked in this order against the lower-cased request text.
const KEYWORDS: [(&str, CommandKind); 3] = [
    ("debug", CommandKind::Debug),
    ("color", CommandKind::Color),
    ("describe", CommandKind::Describe),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Debug,
    Color,
    Describe,
}

/// A resolved user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Narrate the latest frame.
    Describe,
    /// Name the dominant color of the most recently seen object.
    Color,
    /// Echo the request back.
    Debug { echo: String },
    /// Nothing recognizable was asked.
    NoOp,
}

impl Command {
    /// Resolve free-form text to the first keyword it contains.
    pub fn interpret(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let kind = KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, kind)| *kind);

        match kind {
            Some(CommandKind::Describe) => Command::Describe,
            Some(CommandKind::Color) => Command::Color,
            Some(CommandKind::Debug) => Command::Debug {
                echo: text.to_string(),
            },
            None => Command::NoOp,
        }
    }

    /// Parse a bus payload and resolve its command text.
    pub fn from_payload(payload: &str) -> Result<Self, DescribeError> {
        let request: CommandRequest = serde_json::from_str(payload)?;
        let command = match request.command.as_deref().map(Self::interpret) {
            // Debug echoes the whole payload, not just the command text.
            Some(Command::Debug { .. }) => Command::Debug {
                echo: payload.to_string(),
            },
            Some(command) => command,
            None => Command::NoOp,
        };

        if command == Command::NoOp {
            warn!(payload, "No recognizable command, ignoring");
        } else {
            debug!(?command, "Resolved command");
        }
        Ok(command)
    }
}

/// Incoming bus payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub command: Option<String>,
}

/// Outgoing bus payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub response: String,
}

impl Response {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, DescribeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Executes `Command`s against a frame window.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    include_color: bool,
    include_position: bool,
}

impl CommandHandler {
    pub fn new(config: &DescriberConfig) -> Self {
        Self {
            include_color: config.include_color,
            include_position: config.include_position,
        }
    }

    /// Run a command. `Ok(None)` means there is nothing to say.
    pub fn handle(&self, command: &Command, window: &FrameWindow) -> Result<Option<Response>, DescribeError> {
        match command {
            Command::Describe => {
                let Some(frame) = window.latest().filter(|frame| !frame.is_empty()) else {
                    return Ok(None);
                };
                let groups = aggregate(&frame.features, self.include_color, self.include_position);
                let description = compose(&groups, self.include_color, self.include_position)?;
                Ok(Some(Response::new(description)))
            }
            Command::Color => {
                let latest_object = window.latest().and_then(|frame| frame.features.last());
                Ok(latest_object.map(|feature| {
                    Response::new(format!(
                        "The {} is primarily {}",
                        feature.category, feature.color
                    ))
                }))
            }
            Command::Debug { echo } => Ok(Some(Response::new(echo.clone()))),
            Command::NoOp => Ok(None),
        }
    }
}
