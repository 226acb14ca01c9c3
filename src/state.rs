use crate::cooldown::CooldownTask;
use crate::errors::AppError;
use crate::machine::ClickMachine;
use crate::models::{Theme, UserRecord, ViewState};
use crate::registry::Registry;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::info;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// The one component instance: registry, click machine, theme and the
/// running cooldown task, if any.
#[derive(Debug)]
pub struct Widget {
    pub(crate) registry: Registry,
    pub(crate) machine: ClickMachine,
    pub(crate) theme: Theme,
    cooldown_task: Option<CooldownTask>,
}

impl Widget {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            machine: ClickMachine::default(),
            theme: Theme::default(),
            cooldown_task: None,
        }
    }

    pub fn view(&self, notice: Option<String>) -> ViewState {
        let user = self.machine.current_user().map(str::to_owned);
        let record = user
            .as_deref()
            .map(|name| self.registry.get(name))
            .unwrap_or_default();
        let cooldown = self.machine.cooldown();

        ViewState {
            user,
            phase: self.machine.phase(),
            count: record.count,
            click_times: record.click_times,
            achievement: self.machine.achievement().map(str::to_owned),
            disabled: cooldown.disabled,
            seconds_remaining: cooldown.seconds_remaining,
            theme: self.theme,
            notice,
        }
    }

    pub fn cooldown_running(&self) -> bool {
        self.cooldown_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn cancel_cooldown(&mut self) {
        if let Some(task) = self.cooldown_task.take() {
            task.cancel();
        }
    }

    fn replace_cooldown(&mut self, task: CooldownTask) {
        self.cancel_cooldown();
        self.cooldown_task = Some(task);
    }
}

#[derive(Clone)]
pub struct AppState {
    pub widget: Arc<Mutex<Widget>>,
    tick_period: Duration,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            widget: Arc::new(Mutex::new(Widget::new(registry))),
            tick_period: TICK_PERIOD,
        }
    }

    pub async fn view(&self) -> ViewState {
        self.widget.lock().await.view(None)
    }

    pub async fn login(&self, name: &str) -> Result<ViewState, AppError> {
        let mut widget = self.widget.lock().await;
        let widget = &mut *widget;
        widget.machine.login(&mut widget.registry, name).await?;
        widget.cancel_cooldown();
        Ok(widget.view(None))
    }

    pub async fn logout(&self) -> ViewState {
        let mut widget = self.widget.lock().await;
        widget.machine.logout();
        widget.cancel_cooldown();
        widget.view(None)
    }

    pub async fn click(&self) -> Result<ViewState, AppError> {
        let mut widget = self.widget.lock().await;
        let widget = &mut *widget;
        let outcome = widget.machine.click(&mut widget.registry).await?;
        if outcome.locked {
            widget.replace_cooldown(CooldownTask::spawn(self.clone(), self.tick_period));
        }
        Ok(widget.view(outcome.notice))
    }

    pub async fn reset(&self) -> Result<ViewState, AppError> {
        let mut widget = self.widget.lock().await;
        let widget = &mut *widget;
        widget.machine.reset(&mut widget.registry).await?;
        widget.cancel_cooldown();
        Ok(widget.view(None))
    }

    pub async fn toggle_theme(&self) -> ViewState {
        let mut widget = self.widget.lock().await;
        widget.theme = widget.theme.toggled();
        info!(theme = widget.theme.as_str(), "theme toggled");
        widget.view(None)
    }

    pub async fn user(&self, name: &str) -> UserRecord {
        self.widget.lock().await.registry.get(name)
    }

    /// Stops the cooldown task. Every mutation is already on disk, so there
    /// is nothing to flush.
    pub async fn shutdown(&self) {
        self.widget.lock().await.cancel_cooldown();
    }
}
