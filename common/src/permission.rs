use std::fmt;

use serde::{Deserialize, Serialize};

/// Push-notification authorization for this origin.
///
/// Moves forward only: `Unrequested` can become any other state, `Unsupported`
/// is terminal, and `Granted`/`Denied` only change on a fresh platform read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// The user has not answered a prompt yet (platform value `"default"`).
    #[default]
    #[serde(rename = "default")]
    Unrequested,
    Granted,
    Denied,
    /// The platform has no push messaging support.
    Unsupported,
}

impl PermissionState {
    /// Map the platform's permission string.
    ///
    /// Unknown values read as `Unrequested` so the user can still be prompted.
    pub fn from_platform(value: &str) -> Self {
        match value {
            "granted" => PermissionState::Granted,
            "denied" => PermissionState::Denied,
            _ => PermissionState::Unrequested,
        }
    }

    /// Label shown in the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            PermissionState::Unrequested => "default",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Unsupported => "unsupported",
        }
    }

    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }

    /// Whether an in-app action may move from `self` to `next`.
    pub fn can_transition_to(self, next: PermissionState) -> bool {
        matches!(
            (self, next),
            (PermissionState::Unrequested, PermissionState::Granted)
                | (PermissionState::Unrequested, PermissionState::Denied)
                | (PermissionState::Unrequested, PermissionState::Unsupported)
                | (PermissionState::Granted, PermissionState::Granted)
                | (PermissionState::Denied, PermissionState::Denied)
        )
    }

    /// Whether the dashboard should still offer the enable button.
    pub fn can_prompt(self) -> bool {
        matches!(
            self,
            PermissionState::Unrequested | PermissionState::Denied
        )
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
