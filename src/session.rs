/// The username the current view is logged in as, if any.
#[derive(Debug, Clone, Default)]
pub struct Session {
    active: Option<String>,
}

impl Session {
    pub fn set_active(&mut self, name: impl Into<String>) {
        self.active = Some(name.into());
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.active.as_deref()
    }
}
