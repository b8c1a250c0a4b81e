//! Control messages sent by the broadcaster as WebSocket text frames

use std::fmt;

use serde::Deserialize;

/// A control message, discriminated by its `type` field
///
/// Only `hello` carries meaning; any other `type` parses as [`Other`] and
/// is a no-op.
///
/// [`Other`]: ControlMessage::Other
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Request to start broadcasting
    Hello { data: HelloData },
    #[serde(other)]
    Other,
}

impl ControlMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct HelloData {
    pub password: String,
}

impl fmt::Debug for HelloData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelloData")
            .field("password", &"***")
            .finish()
    }
}
