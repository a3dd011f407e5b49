//! Authenticated Mini App user.

use serde::{Deserialize, Serialize};

use super::id::{TelegramId, UserId};

/// The user profile returned by the authentication endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend user id.
    pub id: UserId,
    /// Telegram account id.
    pub telegram_id: TelegramId,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    /// IETF language tag reported by Telegram (e.g. "uz", "ru").
    pub language_code: String,
}

impl User {
    /// Name for display: first and last name, or `@username` as a fallback.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        };
        if full.trim().is_empty() {
            self.username
                .as_ref()
                .map_or_else(|| self.telegram_id.to_string(), |u| format!("@{u}"))
        } else {
            full
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_from_auth_payload() {
        let json = r#"{
            "id": 1,
            "telegram_id": 7012345678,
            "username": null,
            "first_name": "Aziz",
            "last_name": "Karimov",
            "language_code": "uz"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.telegram_id, TelegramId::new(7_012_345_678));
        assert_eq!(user.display_name(), "Aziz Karimov");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = User {
            id: UserId::new(1),
            telegram_id: TelegramId::new(5),
            username: Some("aziz".to_string()),
            first_name: String::new(),
            last_name: None,
            language_code: "uz".to_string(),
        };
        assert_eq!(user.display_name(), "@aziz");
    }
}
