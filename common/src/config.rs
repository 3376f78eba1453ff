use serde::{Deserialize, Serialize};

/// Firebase project settings plus the VAPID key used for token issuance.
///
/// Baked in at compile time from `ORDERDESK_*` environment variables.
/// Serializes to the config object the Firebase web SDK expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    #[serde(skip)]
    pub vapid_key: String,
}

impl MessagingConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_or_empty(option_env!("ORDERDESK_FIREBASE_API_KEY")),
            auth_domain: env_or_empty(option_env!("ORDERDESK_FIREBASE_AUTH_DOMAIN")),
            project_id: env_or_empty(option_env!("ORDERDESK_FIREBASE_PROJECT_ID")),
            messaging_sender_id: env_or_empty(option_env!("ORDERDESK_FIREBASE_SENDER_ID")),
            app_id: env_or_empty(option_env!("ORDERDESK_FIREBASE_APP_ID")),
            vapid_key: env_or_empty(option_env!("ORDERDESK_VAPID_KEY")),
        }
    }

    /// Names of settings that are still empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("apiKey", &self.api_key),
            ("authDomain", &self.auth_domain),
            ("projectId", &self.project_id),
            ("messagingSenderId", &self.messaging_sender_id),
            ("appId", &self.app_id),
            ("vapidKey", &self.vapid_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

fn env_or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> MessagingConfig {
        MessagingConfig {
            api_key: "key".into(),
            auth_domain: "demo.firebaseapp.com".into(),
            project_id: "demo".into(),
            messaging_sender_id: "123".into(),
            app_id: "1:123:web:abc".into(),
            vapid_key: "BPk".into(),
        }
    }

    #[test]
    fn reports_missing_settings() {
        let mut config = full();
        assert!(config.is_complete());
        config.vapid_key.clear();
        config.project_id = "  ".into();
        assert_eq!(config.missing(), ["projectId", "vapidKey"]);
    }

    #[test]
    fn serializes_sdk_shape_without_vapid_key() {
        let json = serde_json::to_value(full()).unwrap();
        assert_eq!(json["messagingSenderId"], "123");
        assert!(json.get("vapidKey").is_none());
    }
}
