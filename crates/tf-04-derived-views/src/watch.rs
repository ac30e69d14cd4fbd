//! Push-style view subscription over the store's state channel.

use std::sync::Arc;
use tf_03_state::AppState;
use tokio::sync::watch;

/// Emits a projected value whenever it differs from the last one emitted.
///
/// The first [`next`](ViewSubscription::next) yields the current value.
/// Commands that leave the projection unchanged emit nothing.
pub struct ViewSubscription<T, F> {
    rx: watch::Receiver<Arc<AppState>>,
    select: F,
    last: Option<T>,
}

impl<T, F> ViewSubscription<T, F>
where
    T: PartialEq + Clone,
    F: FnMut(&AppState) -> T,
{
    pub fn new(rx: watch::Receiver<Arc<AppState>>, select: F) -> Self {
        Self {
            rx,
            select,
            last: None,
        }
    }

    /// Next distinct value, or `None` once the store is gone.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            let value = {
                let guard = self.rx.borrow_and_update();
                let state: &AppState = &guard;
                (self.select)(state)
            };
            if self.last.as_ref() != Some(&value) {
                self.last = Some(value.clone());
                return Some(value);
            }
            self.rx.changed().await.ok()?;
        }
    }

    /// Last value handed out.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}
