use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

/// The shared task died before publishing a result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("in-flight task ended without a result")]
pub struct FlightAborted;

/// Coalesces concurrent calls for the same key into one execution
///
/// The first caller for a key spawns the work on its own task; callers that
/// arrive before it finishes wait for and share the same result. Because the
/// work is spawned, dropping any caller (including the first) never cancels
/// it.
pub struct SingleFlight<K, V> {
    flights: Arc<Mutex<HashMap<K, watch::Receiver<Option<V>>>>>,
}

impl<K, V> Clone for SingleFlight<K, V> {
    fn clone(&self) -> Self {
        Self {
            flights: self.flights.clone(),
        }
    }
}

impl<K, V> Default for SingleFlight<K, V> {
    fn default() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `work` unless a call for `key` is already in flight, in which
    /// case `work` is dropped unpolled and the in-flight result is returned
    pub async fn run<F>(&self, key: K, work: F) -> Result<V, FlightAborted>
    where
        F: Future<Output = V> + Send + 'static,
    {
        let mut rx = {
            let mut flights = self.flights.lock().await;
            // A closed channel means the previous leader panicked; start over.
            match flights.get(&key).filter(|rx| rx.has_changed().is_ok()) {
                Some(rx) => rx.clone(),
                None => {
                    let (tx, rx) = watch::channel(None);
                    flights.insert(key.clone(), rx.clone());

                    let registry = self.flights.clone();
                    tokio::spawn(async move {
                        let value = work.await;
                        registry.lock().await.remove(&key);
                        // Every caller may be gone already; the work still ran.
                        let _ = tx.send(Some(value));
                    });
                    rx
                }
            }
        };

        let result = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| FlightAborted)?;
        let value = (*result).clone();
        value.ok_or(FlightAborted)
    }

    /// Number of keys with work currently in flight
    #[cfg(test)]
    pub async fn in_flight(&self) -> usize {
        self.flights.lock().await.len()
    }
}
