use serde::Serialize;

use crate::notifications::client::NotificationSource;
use crate::notifications::model::Notification;

pub const EMPTY_MESSAGE: &str = "Bildirim bulunmamaktadır";
pub const POLL_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedItem {
    pub id: u64,
    pub href: String,
    pub message: String,
    pub created_at: String,
}

/// What the notification dropdown shows.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FeedView {
    /// Badge count; `None` hides the badge
    pub badge: Option<usize>,
    pub items: Vec<FeedItem>,
    pub empty_message: Option<String>,
}

pub fn item_href(notification: &Notification) -> String {
    match notification.dof_id {
        Some(id) => format!("/dof/{}", id),
        None => "#".to_string(),
    }
}

pub fn render_feed(notifications: &[Notification]) -> FeedView {
    if notifications.is_empty() {
        return FeedView {
            badge: None,
            items: vec![],
            empty_message: Some(EMPTY_MESSAGE.to_string()),
        };
    }

    FeedView {
        badge: Some(notifications.len()),
        items: notifications
            .iter()
            .map(|n| FeedItem {
                id: n.id,
                href: item_href(n),
                message: n.message.clone(),
                created_at: n.created_at.clone(),
            })
            .collect(),
        empty_message: None,
    }
}

/// Fixed-interval refresh, independent of any form's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval_ms: u64,
    last_poll_ms: Option<u64>,
}

impl PollSchedule {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_poll_ms: None,
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_poll_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    pub fn mark_polled(&mut self, now_ms: u64) {
        self.last_poll_ms = Some(now_ms);
    }

    pub fn next_due(&self) -> u64 {
        self.last_poll_ms
            .map_or(0, |last| last.saturating_add(self.interval_ms))
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(POLL_INTERVAL_MS)
    }
}

/// Keeps the rendered feed fresh. A failed fetch keeps the previous view.
pub struct NotificationPoller<S: NotificationSource> {
    source: S,
    schedule: PollSchedule,
    view: FeedView,
}

impl<S: NotificationSource> NotificationPoller<S> {
    pub fn new(source: S, schedule: PollSchedule) -> Self {
        Self {
            source,
            schedule,
            view: FeedView::default(),
        }
    }

    pub fn view(&self) -> &FeedView {
        &self.view
    }

    /// Poll if due. Returns whether the view was refreshed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.schedule.is_due(now_ms) {
            return false;
        }
        self.schedule.mark_polled(now_ms);
        self.refresh()
    }

    /// Poll `rounds` times, back to back on the schedule. `wait` receives the
    /// gap in milliseconds before each poll that is not yet due; `on_refresh`
    /// sees every successfully refreshed view. Returns the number of refreshes.
    pub fn run(
        &mut self,
        rounds: usize,
        wait: &mut dyn FnMut(u64),
        on_refresh: &mut dyn FnMut(&FeedView),
    ) -> usize {
        let mut now = self.schedule.last_poll_ms.unwrap_or(0);
        let mut refreshed = 0;

        for _ in 0..rounds {
            let due = self.schedule.next_due();
            if due > now {
                wait(due - now);
                now = due;
            }
            if self.tick(now) {
                refreshed += 1;
                on_refresh(&self.view);
            }
        }

        refreshed
    }

    /// Fetch now, regardless of the schedule.
    pub fn refresh(&mut self) -> bool {
        match self.source.fetch() {
            Ok(list) => {
                self.view = render_feed(&list);
                true
            }
            Err(e) => {
                eprintln!("Warning: failed to load notifications: {}", e);
                false
            }
        }
    }
}
