//! Storage backends

use std::collections::HashMap;

use super::{KeyValueStore, PersistenceError};

/// In-process store, used by tests and as the fallback when no durable
/// storage exists
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};
    use std::sync::mpsc::{self, Sender};
    use std::sync::{Arc, Mutex};
    use std::thread::{self, JoinHandle};

    use super::{KeyValueStore, PersistenceError};

    /// One JSON file per key under a data directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        /// Open (or create) the data directory
        pub fn open(dir: &Path) -> Result<Self, PersistenceError> {
            fs::create_dir_all(dir)?;
            Ok(Self {
                dir: dir.to_path_buf(),
            })
        }

        fn path_for(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(json) => Ok(Some(json)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        /// Write to `<key>.json.tmp`, then rename over the old file so a
        /// crash never leaves a half-written save
        fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
            let path = self.path_for(key);
            let tmp = self.dir.join(format!("{key}.json.tmp"));
            fs::write(&tmp, value)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        }
    }

    enum Command {
        Write { key: String, value: String },
        Flush(Sender<()>),
    }

    /// Wraps a store and applies writes on a worker thread.
    ///
    /// `set` never blocks on I/O; writes land in call order, so the last one
    /// wins. Failures are logged by the worker. Dropping the store drains
    /// pending writes.
    pub struct BackgroundStore<S: KeyValueStore + Send + 'static> {
        inner: Arc<Mutex<S>>,
        tx: Option<Sender<Command>>,
        worker: Option<JoinHandle<()>>,
    }

    impl<S: KeyValueStore + Send + 'static> BackgroundStore<S> {
        pub fn new(store: S) -> Self {
            let inner = Arc::new(Mutex::new(store));
            let (tx, rx) = mpsc::channel::<Command>();
            let worker_store = Arc::clone(&inner);
            let worker = thread::spawn(move || {
                while let Ok(command) = rx.recv() {
                    match command {
                        Command::Write { key, value } => {
                            let Ok(mut store) = worker_store.lock() else {
                                log::warn!("Store lock poisoned, dropping write to {key}");
                                continue;
                            };
                            if let Err(e) = store.set(&key, &value) {
                                log::warn!("Background save of {key} failed: {e}");
                            }
                        }
                        Command::Flush(done) => {
                            let _ = done.send(());
                        }
                    }
                }
            });
            Self {
                inner,
                tx: Some(tx),
                worker: Some(worker),
            }
        }

        /// Block until every write queued so far has been applied
        pub fn flush(&self) -> Result<(), PersistenceError> {
            let (done_tx, done_rx) = mpsc::channel();
            self.send(Command::Flush(done_tx))?;
            done_rx
                .recv()
                .map_err(|_| PersistenceError::Unavailable("writer thread stopped".into()))
        }

        fn send(&self, command: Command) -> Result<(), PersistenceError> {
            self.tx
                .as_ref()
                .ok_or_else(|| PersistenceError::Unavailable("writer closed".into()))?
                .send(command)
                .map_err(|_| PersistenceError::Unavailable("writer thread stopped".into()))
        }
    }

    impl<S: KeyValueStore + Send + 'static> KeyValueStore for BackgroundStore<S> {
        /// Reads the wrapped store directly; queued writes may not be visible
        /// yet
        fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
            let store = self
                .inner
                .lock()
                .map_err(|_| PersistenceError::Unavailable("store lock poisoned".into()))?;
            store.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
            self.send(Command::Write {
                key: key.to_string(),
                value: value.to_string(),
            })
        }
    }

    impl<S: KeyValueStore + Send + 'static> Drop for BackgroundStore<S> {
        fn drop(&mut self) {
            // Closing the channel ends the worker loop once the queue drains
            self.tx.take();
            if let Some(worker) = self.worker.take()
                && worker.join().is_err()
            {
                log::warn!("Background writer panicked");
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{BackgroundStore, FileStore};

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn open() -> Result<Self, PersistenceError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Unavailable("no LocalStorage".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))
    }
}
