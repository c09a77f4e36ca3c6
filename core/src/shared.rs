use crate::search::SearchServer;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Cloneable handle to one `SearchServer` for multi-threaded hosts.
///
/// Ingestion takes the write lock, queries take the read lock, so queries run
/// concurrently with each other but never alongside an `add_document`.
#[derive(Clone, Default)]
pub struct SharedSearchServer {
    inner: Arc<RwLock<SearchServer>>,
}

impl SharedSearchServer {
    pub fn new(server: SearchServer) -> Self {
        Self { inner: Arc::new(RwLock::new(server)) }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SearchServer> { self.inner.read() }

    pub fn write(&self) -> RwLockWriteGuard<'_, SearchServer> { self.inner.write() }
}
