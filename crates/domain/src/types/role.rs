//! Bound game roles

use serde::{Deserialize, Serialize};

use crate::constants::GAME_ID;

/// Build the `Sk-Game-Role` value for a character.
pub fn composite_role_id(role_id: &str, server_id: &str) -> String {
    format!("{GAME_ID}_{role_id}_{server_id}")
}

/// One in-game character bound to the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Composite id sent as the game-role header.
    pub game_role: String,
    pub nickname: String,
    pub level: i64,
    pub server_name: String,
    pub server_id: String,
    pub role_id: String,
}

impl Role {
    pub fn new(
        nickname: impl Into<String>,
        level: i64,
        server_name: impl Into<String>,
        server_id: impl Into<String>,
        role_id: impl Into<String>,
    ) -> Self {
        let server_id = server_id.into();
        let role_id = role_id.into();
        Self {
            game_role: composite_role_id(&role_id, &server_id),
            nickname: nickname.into(),
            level,
            server_name: server_name.into(),
            server_id,
            role_id,
        }
    }

    /// Human label, e.g. `Endministrator (Lv.30) [Asia]`.
    pub fn label(&self) -> String {
        format!("{} (Lv.{}) [{}]", self.nickname, self.level, self.server_name)
    }
}
