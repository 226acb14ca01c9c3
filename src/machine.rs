use crate::errors::AppError;
use crate::models::{Phase, UserRecord, UserUpdate};
use crate::registry::Registry;
use crate::session::Session;
use chrono::Local;
use tracing::{debug, info};

/// Counts that show an achievement. Matched exactly.
pub const ACHIEVEMENTS: [u64; 3] = [5, 10, 20];
/// A click that brings the count to this value or above starts a cooldown.
pub const LOCK_THRESHOLD: u64 = 10;
pub const COOLDOWN_SECS: u32 = 10;

pub const LOGIN_REQUIRED: &str = "Please log in first!";
pub const COOLDOWN_ACTIVE: &str = "Clicking is disabled until the cooldown ends.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldown {
    pub disabled: bool,
    pub seconds_remaining: u32,
}

#[derive(Debug, Clone)]
pub struct ClickOutcome {
    pub record: UserRecord,
    pub achievement: Option<String>,
    pub locked: bool,
    /// Blocking notification to show, set when this click started a cooldown.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not locked; nothing to do.
    Idle,
    Counting(u32),
    /// The cooldown ran out and the active user's progress was cleared.
    Expired,
}

/// Session, achievement and cooldown for the current view. Records live in
/// the `Registry` passed to each transition.
#[derive(Debug, Default)]
pub struct ClickMachine {
    session: Session,
    cooldown: Cooldown,
    achievement: Option<String>,
}

impl ClickMachine {
    pub fn phase(&self) -> Phase {
        match (self.session.current(), self.cooldown.disabled) {
            (None, _) => Phase::Idle,
            (Some(_), false) => Phase::Active,
            (Some(_), true) => Phase::Locked,
        }
    }

    pub fn current_user(&self) -> Option<&str> {
        self.session.current()
    }

    pub fn cooldown(&self) -> Cooldown {
        self.cooldown
    }

    pub fn achievement(&self) -> Option<&str> {
        self.achievement.as_deref()
    }

    pub async fn login(&mut self, registry: &mut Registry, name: &str) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::bad_request("username must not be empty"));
        }

        if !registry.contains(name) {
            registry.upsert(name, UserUpdate::cleared()).await?;
            info!(user = name, "registered new user");
        }

        self.session.set_active(name);
        self.cooldown = Cooldown::default();
        self.achievement = None;
        info!(user = name, "logged in");
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(name) = self.session.current() {
            info!(user = name, "logged out");
        }
        self.session.clear();
        self.cooldown = Cooldown::default();
        self.achievement = None;
    }

    pub async fn click(&mut self, registry: &mut Registry) -> Result<ClickOutcome, AppError> {
        self.click_at(registry, local_time_string()).await
    }

    pub async fn click_at(
        &mut self,
        registry: &mut Registry,
        timestamp: String,
    ) -> Result<ClickOutcome, AppError> {
        let Some(name) = self.session.current().map(str::to_owned) else {
            return Err(AppError::invalid_operation(LOGIN_REQUIRED));
        };
        if self.cooldown.disabled {
            return Err(AppError::invalid_operation(COOLDOWN_ACTIVE));
        }

        let mut record = registry.get(&name);
        record.count += 1;
        record.click_times.push(timestamp);
        let record = registry
            .upsert(
                &name,
                UserUpdate {
                    count: Some(record.count),
                    click_times: Some(record.click_times),
                },
            )
            .await?;

        self.achievement = ACHIEVEMENTS
            .contains(&record.count)
            .then(|| format!("🎉 Achievement: {} clicks!", record.count));

        let mut notice = None;
        if record.count >= LOCK_THRESHOLD {
            self.cooldown = Cooldown {
                disabled: true,
                seconds_remaining: COOLDOWN_SECS,
            };
            notice = Some(format!("Button disabled for {COOLDOWN_SECS} seconds, {name}!"));
            info!(user = %name, count = record.count, "cooldown started");
        }
        debug!(user = %name, count = record.count, "click");

        Ok(ClickOutcome {
            locked: self.cooldown.disabled,
            achievement: self.achievement.clone(),
            record,
            notice,
        })
    }

    /// One second of cooldown. On expiry the active user's count and click
    /// log are cleared.
    pub async fn tick(&mut self, registry: &mut Registry) -> Result<TickOutcome, AppError> {
        if !self.cooldown.disabled {
            return Ok(TickOutcome::Idle);
        }

        self.cooldown.seconds_remaining = self.cooldown.seconds_remaining.saturating_sub(1);
        if self.cooldown.seconds_remaining > 0 {
            return Ok(TickOutcome::Counting(self.cooldown.seconds_remaining));
        }

        self.cooldown = Cooldown::default();
        if let Some(name) = self.session.current() {
            registry.upsert(name, UserUpdate::cleared()).await?;
            info!(user = name, "cooldown expired, progress cleared");
        }
        Ok(TickOutcome::Expired)
    }

    /// Clears the active user's progress and any cooldown. No effect when
    /// logged out.
    pub async fn reset(&mut self, registry: &mut Registry) -> Result<(), AppError> {
        let Some(name) = self.session.current() else {
            return Ok(());
        };

        registry.upsert(name, UserUpdate::cleared()).await?;
        self.cooldown = Cooldown::default();
        self.achievement = None;
        info!(user = name, "progress reset");
        Ok(())
    }
}

/// Wall-clock time the way the page's clock shows it, e.g. `3:04:05 PM`.
pub fn local_time_string() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}
