use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Progress of one registered user. `click_times` always holds exactly
/// `count` entries.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub count: u64,
    #[serde(rename = "clickTimes")]
    pub click_times: Vec<String>,
}

/// Partial update merged into a record by `Registry::upsert`. Absent fields
/// keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub count: Option<u64>,
    pub click_times: Option<Vec<String>>,
}

impl UserUpdate {
    pub fn cleared() -> Self {
        Self {
            count: Some(0),
            click_times: Some(Vec::new()),
        }
    }
}

/// The persisted blob: username to record.
pub type Users = BTreeMap<String, UserRecord>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Active,
    Locked,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
}

/// Snapshot of the widget returned by every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewState {
    pub user: Option<String>,
    pub phase: Phase,
    pub count: u64,
    pub click_times: Vec<String>,
    pub achievement: Option<String>,
    pub disabled: bool,
    pub seconds_remaining: u32,
    pub theme: Theme,
    pub notice: Option<String>,
}
