// ---------------------------------------------------------------------------
// LiveSubscriptions -- at most one live task per asset
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

/// Registry of running live-update tasks keyed by symbol.
///
/// Subscribing again for a symbol aborts the previous task before the new
/// one takes its place.
#[derive(Default)]
pub struct LiveSubscriptions {
    handles: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl LiveSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `task` as the live subscription for `symbol`.
    pub fn subscribe<F>(&self, symbol: &str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        if let Some(previous) = self.handles.lock().insert(symbol.to_string(), handle) {
            previous.abort();
            info!(symbol, "previous live subscription superseded");
        }
    }

    /// Abort and forget the subscription for `symbol`, if any.
    pub fn unsubscribe(&self, symbol: &str) -> bool {
        match self.handles.lock().remove(symbol) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, symbol: &str) -> bool {
        self.handles
            .lock()
            .get(symbol)
            .is_some_and(|h| !h.is_finished())
    }

    pub fn len(&self) -> usize {
        self.handles.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.lock().is_empty()
    }

    /// Abort every running subscription.
    pub fn shutdown(&self) {
        for (_, handle) in self.handles.lock().drain() {
            handle.abort();
        }
    }
}

impl Drop for LiveSubscriptions {
    fn drop(&mut self) {
        self.shutdown();
    }
}
