use parking_lot::Mutex;

/// How a notice is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message the operator has to acknowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Holds the notice currently on screen; a new one replaces it
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Mutex<Option<Notice>>,
}

impl NoticeBoard {
    pub fn info(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Error, message.into());
    }

    pub fn current(&self) -> Option<Notice> {
        self.current.lock().clone()
    }

    pub fn dismiss(&self) {
        self.current.lock().take();
    }

    fn post(&self, level: NoticeLevel, message: String) {
        *self.current.lock() = Some(Notice { level, message });
    }
}
