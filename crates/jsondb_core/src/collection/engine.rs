//! Load / transform / save driver shared by both handle kinds.

use super::gate::MutationGate;
use super::ops::Outcome;
use crate::error::{CoreError, CoreResult};
use jsondb_codec::{decode, encode, Document, Encoding, ABSENT_SENTINEL};
use jsondb_storage::FileStore;
use std::sync::Arc;
use tracing::debug;

/// Everything a handle needs to reach one collection file.
#[derive(Debug)]
pub(crate) struct CollectionCore {
    name: String,
    store: Arc<FileStore>,
    gate: Arc<MutationGate>,
    encoding: Encoding,
}

impl CollectionCore {
    pub(crate) fn new(
        name: String,
        store: Arc<FileStore>,
        gate: Arc<MutationGate>,
        encoding: Encoding,
    ) -> Self {
        Self {
            name,
            store,
            gate,
            encoding,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub(crate) fn gate(&self) -> &Arc<MutationGate> {
        &self.gate
    }

    fn decode(&self, bytes: &[u8]) -> CoreResult<Document> {
        decode(bytes).map_err(|source| CoreError::Corrupt {
            collection: self.name.clone(),
            source,
        })
    }

    // ------------------------------------------------------------------
    // Blocking
    // ------------------------------------------------------------------

    fn load_blocking(&self) -> CoreResult<Document> {
        let bytes = self.store.read_or_init(&self.name, ABSENT_SENTINEL)?;
        self.decode(&bytes)
    }

    fn save_blocking(&self, doc: &Document) -> CoreResult<()> {
        let bytes = encode(doc, self.encoding)?;
        self.store.write(&self.name, &bytes)?;
        Ok(())
    }

    /// Loads the current document and hands it to `f`.
    pub(crate) fn read_blocking<R>(&self, f: impl FnOnce(Document) -> R) -> CoreResult<R> {
        Ok(f(self.load_blocking()?))
    }

    /// Runs one gated load → `f` → save cycle. Saves only if `f` reports
    /// a change; an error from `f` leaves the file untouched.
    pub(crate) fn mutate_blocking<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Document) -> CoreResult<Outcome<R>>,
    ) -> CoreResult<R> {
        let _guard = self.gate.enter_blocking();

        let mut doc = self.load_blocking()?;
        let outcome = f(&mut doc)?;
        if outcome.dirty {
            self.save_blocking(&doc)?;
            debug!(collection = %self.name, op, shape = %doc.shape(), "saved collection");
        }
        Ok(outcome.output)
    }

    /// Removes the file under the gate.
    pub(crate) fn delete_blocking(&self) -> CoreResult<bool> {
        let _guard = self.gate.enter_blocking();
        let removed = self.store.remove(&self.name)?;
        debug!(collection = %self.name, removed, "deleted collection");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Async
    // ------------------------------------------------------------------

    async fn load(&self) -> CoreResult<Document> {
        let bytes = self
            .store
            .read_or_init_async(&self.name, ABSENT_SENTINEL)
            .await?;
        self.decode(&bytes)
    }

    async fn save(&self, doc: &Document) -> CoreResult<()> {
        let bytes = encode(doc, self.encoding)?;
        self.store.write_async(&self.name, &bytes).await?;
        Ok(())
    }

    /// Async form of [`CollectionCore::read_blocking`].
    pub(crate) async fn read<R>(&self, f: impl FnOnce(Document) -> R) -> CoreResult<R> {
        Ok(f(self.load().await?))
    }

    /// Async form of [`CollectionCore::mutate_blocking`].
    pub(crate) async fn mutate<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Document) -> CoreResult<Outcome<R>>,
    ) -> CoreResult<R> {
        let _guard = self.gate.enter().await;

        let mut doc = self.load().await?;
        let outcome = f(&mut doc)?;
        if outcome.dirty {
            self.save(&doc).await?;
            debug!(collection = %self.name, op, shape = %doc.shape(), "saved collection");
        }
        Ok(outcome.output)
    }

    /// Async form of [`CollectionCore::delete_blocking`].
    pub(crate) async fn delete(&self) -> CoreResult<bool> {
        let _guard = self.gate.enter().await;
        let removed = self.store.remove_async(&self.name).await?;
        debug!(collection = %self.name, removed, "deleted collection");
        Ok(removed)
    }
}
