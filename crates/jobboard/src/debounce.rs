use std::time::Duration;

use tokio::time::Instant;

/// Trailing-edge debounce: each `schedule` pushes the deadline to `delay` after the
/// latest call, so a burst of calls fires once.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Drop a pending run. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Resolve at `deadline`, or never when nothing is scheduled. Takes the deadline by
/// value so the caller can keep mutating the debouncer inside `select!`.
pub async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_after_last_call() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();

        debouncer.schedule();
        tokio::time::advance(Duration::from_millis(200)).await;
        debouncer.schedule();
        tokio::time::advance(Duration::from_millis(200)).await;
        debouncer.schedule();

        let deadline = debouncer.deadline().unwrap();
        assert_eq!(deadline, start + Duration::from_millis(700));

        until(debouncer.deadline()).await;
        assert!(Instant::now() >= deadline);
        assert!(debouncer.cancel());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_scheduled_never_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = tokio::time::timeout(Duration::from_secs(5), until(debouncer.deadline())).await;
        assert!(fired.is_err());
    }
}
