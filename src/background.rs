// Background persistence with coalesced writes
//
// Writes land in a pending map (latest value per key) and a single worker
// thread drains it into the wrapped store. A put that arrives while a batch
// is being written is picked up by the next batch, so the newest state is
// always written eventually and never more than one batch is in flight.

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

type Slot = (String, String);

#[derive(Debug, Clone)]
enum PendingWrite {
    Text(String),
    Int(i64),
    Remove,
}

#[derive(Default)]
struct State {
    pending: BTreeMap<Slot, PendingWrite>,
    in_flight: BTreeMap<Slot, PendingWrite>,
    batches_written: u64,
    /// Last failure since the previous flush
    write_error: Option<StoreError>,
    shutdown: bool,
}

struct Shared<K> {
    state: Mutex<State>,
    changed: Condvar,
    inner: Mutex<K>,
}

impl<K> Shared<K> {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn inner(&self) -> MutexGuard<'_, K> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wraps a store so that writes happen on a worker thread
///
/// Reads see accepted-but-unwritten values. Write failures on the worker are
/// logged as they happen and the most recent one is returned by the next
/// `flush`. Dropping the wrapper drains pending writes before returning.
pub struct BackgroundKv<K: KeyValueStore + Send + 'static> {
    shared: Arc<Shared<K>>,
    worker: Option<JoinHandle<()>>,
}

impl<K: KeyValueStore + Send + 'static> BackgroundKv<K> {
    pub fn spawn(inner: K) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::default()),
            changed: Condvar::new(),
            inner: Mutex::new(inner),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("todolist-saver".to_string())
            .spawn(move || run_worker(&worker_shared))
            .ok();

        if worker.is_none() {
            error!("Failed to spawn background saver, writes will be applied on flush");
        }

        Self { shared, worker }
    }

    /// Number of batches the worker has written so far
    pub fn batches_written(&self) -> u64 {
        self.shared.state().batches_written
    }

    fn enqueue(&self, namespace: &str, key: &str, write: PendingWrite) {
        let mut state = self.shared.state();
        state.pending.insert((namespace.to_string(), key.to_string()), write);
        self.shared.changed.notify_all();
    }

    /// Latest accepted value for a key that has not reached the inner store yet
    fn pending_value(&self, namespace: &str, key: &str) -> Option<PendingWrite> {
        let slot = (namespace.to_string(), key.to_string());
        let state = self.shared.state();
        state
            .pending
            .get(&slot)
            .or_else(|| state.in_flight.get(&slot))
            .cloned()
    }
}

fn run_worker<K: KeyValueStore>(shared: &Shared<K>) {
    let mut state = shared.state();
    loop {
        while state.pending.is_empty() && !state.shutdown {
            state = shared.changed.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        if state.pending.is_empty() {
            break;
        }

        state.in_flight = std::mem::take(&mut state.pending);
        let batch = state.in_flight.clone();
        drop(state);

        let failed = write_batch(shared, batch);

        state = shared.state();
        if failed.is_some() {
            state.write_error = failed;
        }
        state.in_flight.clear();
        state.batches_written += 1;
        shared.changed.notify_all();
    }
    debug!("Background saver stopped");
}

/// Apply a batch to the inner store, returning the last failure
fn write_batch<K: KeyValueStore>(shared: &Shared<K>, batch: BTreeMap<Slot, PendingWrite>) -> Option<StoreError> {
    let mut inner = shared.inner();
    let mut failed = None;
    debug!(writes = batch.len(), "Writing batch");
    for ((namespace, key), write) in batch {
        let result = match write {
            PendingWrite::Text(value) => inner.put_string(&namespace, &key, &value),
            PendingWrite::Int(value) => inner.put_int(&namespace, &key, value),
            PendingWrite::Remove => inner.remove(&namespace, &key),
        };
        if let Err(e) = result {
            error!(namespace = %namespace, key = %key, error = ?e, "Background write failed");
            failed = Some(e);
        }
    }
    failed
}

impl<K: KeyValueStore + Send + 'static> KeyValueStore for BackgroundKv<K> {
    fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        match self.pending_value(namespace, key) {
            Some(PendingWrite::Text(value)) => Ok(Some(value)),
            Some(PendingWrite::Remove) => Ok(None),
            Some(PendingWrite::Int(_)) => Err(StoreError::read(key, "value is an integer, not a string")),
            None => self.shared.inner().get_string(namespace, key),
        }
    }

    fn put_string(&mut self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.enqueue(namespace, key, PendingWrite::Text(value.to_string()));
        Ok(())
    }

    fn get_int(&self, namespace: &str, key: &str) -> Result<Option<i64>> {
        match self.pending_value(namespace, key) {
            Some(PendingWrite::Int(value)) => Ok(Some(value)),
            Some(PendingWrite::Remove) => Ok(None),
            Some(PendingWrite::Text(_)) => Err(StoreError::read(key, "value is a string, not an integer")),
            None => self.shared.inner().get_int(namespace, key),
        }
    }

    fn put_int(&mut self, namespace: &str, key: &str, value: i64) -> Result<()> {
        self.enqueue(namespace, key, PendingWrite::Int(value));
        Ok(())
    }

    fn remove(&mut self, namespace: &str, key: &str) -> Result<()> {
        self.enqueue(namespace, key, PendingWrite::Remove);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let failed = if self.worker.is_some() {
            let mut state = self.shared.state();
            while !state.pending.is_empty() || !state.in_flight.is_empty() {
                state = self.shared.changed.wait(state).unwrap_or_else(PoisonError::into_inner);
            }
            state.write_error.take()
        } else {
            let batch = std::mem::take(&mut self.shared.state().pending);
            write_batch(&self.shared, batch)
        };

        if let Some(e) = failed {
            return Err(e);
        }
        self.shared.inner().flush()
    }
}

impl<K: KeyValueStore + Send + 'static> Drop for BackgroundKv<K> {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state();
            state.shutdown = true;
            self.shared.changed.notify_all();
        }
        match self.worker.take() {
            Some(worker) => {
                if worker.join().is_err() {
                    error!("Background saver panicked");
                }
            }
            None => {
                let batch = std::mem::take(&mut self.shared.state().pending);
                write_batch(&self.shared, batch);
            }
        }
    }
}
