/// Work a handler deferred to a later turn of the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Re-check a form after a submit click, once native validation settled
    SubmitClickCheck { form: usize, control: usize },
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    due_at: u64,
    order: u64,
    task: DeferredTask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTask {
    pub due_at: u64,
    pub task: DeferredTask,
}

/// Virtual clock plus timer queue. Tasks run by due time, ties in the order
/// they were scheduled.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_order: u64,
    queue: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, task: DeferredTask) {
        let order = self.next_order;
        self.next_order += 1;
        self.queue.push(ScheduledTask {
            due_at: self.now_ms.saturating_add(delay_ms),
            order,
            task,
        });
    }

    pub fn pending(&self) -> Vec<PendingTask> {
        let mut pending: Vec<&ScheduledTask> = self.queue.iter().collect();
        pending.sort_by_key(|t| (t.due_at, t.order));
        pending
            .into_iter()
            .map(|t| PendingTask {
                due_at: t.due_at,
                task: t.task,
            })
            .collect()
    }

    /// Take the next task due at or before `until`, moving the clock to it.
    pub fn pop_due(&mut self, until: u64) -> Option<DeferredTask> {
        let position = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= until)
            .min_by_key(|(_, t)| (t.due_at, t.order))
            .map(|(i, _)| i)?;

        let next = self.queue.remove(position);
        self.now_ms = self.now_ms.max(next.due_at);
        Some(next.task)
    }

    /// Latest due time in the queue, if any.
    pub fn last_due(&self) -> Option<u64> {
        self.queue.iter().map(|t| t.due_at).max()
    }

    pub fn advance_to(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
