//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a [`GameClient`](crate::GameClient).
///
/// Build one with `ClientConfig::default()` and override just the fields
/// you care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// How long a command waits for `OK`/`ERR` before failing with
    /// `CommandError::Timeout`.
    pub command_timeout: Duration,

    /// How long `get_game_list` / `get_player_list` wait for the list.
    pub list_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(10),
            list_timeout: Duration::from_secs(10),
        }
    }
}
