use std::time::Instant;

/// Items due at a point in time, released in due order by [`Schedule::drain_due`].
#[derive(Debug)]
pub struct Schedule<T> {
    items: Vec<(Instant, T)>,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Schedule<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, at: Instant, item: T) {
        self.items.push((at, item));
    }

    /// Remove and return everything due at or before `now`. Ties keep
    /// insertion order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let mut due = Vec::new();
        let mut rest = Vec::with_capacity(self.items.len());
        for (at, item) in self.items.drain(..) {
            if at <= now {
                due.push((at, item));
            } else {
                rest.push((at, item));
            }
        }
        self.items = rest;
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, item)| item).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn releases_only_due_items_in_time_order() {
        let t0 = Instant::now();
        let mut s = Schedule::new();
        s.push(t0 + Duration::from_millis(2000), "revert");
        s.push(t0 + Duration::from_millis(1000), "reload");
        s.push(t0 + Duration::from_millis(5000), "later");

        assert!(s.drain_due(t0).is_empty());
        assert_eq!(s.drain_due(t0 + Duration::from_millis(2500)), ["reload", "revert"]);
        assert_eq!(s.len(), 1);
    }
}
