use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    expires_at: Instant,
}

/// Short-lived user notifications, oldest first.
#[derive(Debug)]
pub struct Toasts {
    queue: VecDeque<Toast>,
    lifetime: Duration,
}

/// At most this many toasts are kept; older ones drop off.
const MAX_TOASTS: usize = 3;

impl Toasts {
    pub fn new(lifetime: Duration) -> Self {
        Toasts {
            queue: VecDeque::new(),
            lifetime,
        }
    }

    pub fn notify(&mut self, kind: ToastKind, message: impl Into<String>) {
        if self.queue.len() == MAX_TOASTS {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            kind,
            message: message.into(),
            expires_at: Instant::now() + self.lifetime,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(ToastKind::Error, message);
    }

    pub fn expire(&mut self, now: Instant) {
        self.queue.retain(|t| t.expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn toasts_expire_after_lifetime() {
        let mut toasts = Toasts::new(Duration::from_secs(3));
        toasts.success("saved");
        tokio::time::advance(Duration::from_secs(2)).await;
        toasts.error("failed");

        tokio::time::advance(Duration::from_millis(1500)).await;
        toasts.expire(Instant::now());

        let left: Vec<_> = toasts.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(left, vec!["failed"]);
    }

    #[tokio::test(start_paused = true)]
    async fn queue_is_bounded() {
        let mut toasts = Toasts::new(Duration::from_secs(3));
        for i in 0..5 {
            toasts.success(format!("toast {i}"));
        }
        assert_eq!(toasts.iter().count(), MAX_TOASTS);
        assert_eq!(toasts.latest().unwrap().message, "toast 4");
    }
}
