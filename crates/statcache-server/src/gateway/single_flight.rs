//! One upstream fetch per player; concurrent callers share its result.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::cache::CacheKey;

type Slot<T> = watch::Receiver<Option<T>>;

/// In-flight work keyed by player.
///
/// The first caller for a key becomes the leader and gets a [`Flight`] to
/// publish its result through. Callers arriving while the leader is running
/// wait for that result instead of starting their own. An entry lives only as
/// long as its leader: it is removed on completion, or when the leader is
/// dropped without completing.
#[derive(Debug)]
pub struct FlightGroup<T> {
    inflight: Mutex<HashMap<CacheKey, Slot<T>>>,
}

/// What a caller should do for a key.
pub enum Joined<'a, T: Clone> {
    /// Nobody is fetching this key; the caller must do it and complete the flight.
    Leader(Flight<'a, T>),
    /// Another caller finished the fetch; this is its result.
    Shared(T),
}

impl<T: Clone> Default for FlightGroup<T> {
    fn default() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> FlightGroup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Becomes the leader for `key`, or waits for the current leader's result.
    ///
    /// If the current leader goes away without completing, one of the
    /// waiters takes over as leader.
    pub async fn join(&self, key: &CacheKey) -> Joined<'_, T> {
        loop {
            let mut slot = {
                let mut map = self.inflight.lock();
                match map.get(key) {
                    Some(slot) => slot.clone(),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        map.insert(key.clone(), rx);
                        return Joined::Leader(Flight {
                            group: self,
                            key: key.clone(),
                            tx: Some(tx),
                        });
                    },
                }
            };

            // Err: el lider se cancelo sin publicar; reintentar
            let shared = match slot.wait_for(Option::is_some).await {
                Ok(value) => (*value).clone(),
                Err(_) => None,
            };
            if let Some(result) = shared {
                return Joined::Shared(result);
            }
        }
    }

    /// Number of keys with a leader currently running.
    pub fn in_flight(&self) -> usize {
        self.inflight.lock().len()
    }

    fn release(&self, key: &CacheKey) {
        self.inflight.lock().remove(key);
    }
}

/// The leader's handle for one key.
pub struct Flight<'a, T: Clone> {
    group: &'a FlightGroup<T>,
    key: CacheKey,
    tx: Option<watch::Sender<Option<T>>>,
}

impl<T: Clone> Flight<'_, T> {
    /// Publishes `result` to every waiter and ends the flight.
    pub fn complete(mut self, result: &T) {
        self.group.release(&self.key);
        if let Some(tx) = self.tx.take() {
            tx.send_replace(Some(result.clone()));
        }
    }
}

impl<T: Clone> Drop for Flight<'_, T> {
    fn drop(&mut self) {
        // Lider cancelado: liberar la key; los waiters ven el sender cerrado.
        if self.tx.take().is_some() {
            self.group.release(&self.key);
        }
    }
}
