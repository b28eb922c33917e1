//! Ledger Data Provider interface.
//!
//! Implementations connect to a ledger archive and hand out already decoded
//! transactions, one reader per ledger. Retries and backoff, if any, are the
//! implementation's business.

use std::{
    future::Future,
    ops::{Deref, DerefMut},
};

use tracing::debug;
use url::Url;

use crate::{
    Network,
    error::FetchError,
    types::{LedgerRange, LedgerSequence},
    xdr::{LedgerHeader, LedgerTransaction},
};

/// Entry point to a ledger archive.
pub trait LedgerDataProvider {
    type Backend: LedgerBackend;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Opens a backend serving ledgers of `range` from the given archives.
    fn open_backend(
        &self,
        archive_urls: &[Url],
        range: LedgerRange,
    ) -> impl Future<Output = Result<Self::Backend, Self::Error>>;
}

/// Backend bound to a ledger range.
pub trait LedgerBackend {
    type Reader: TransactionReader;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Opens a reader over transactions of a single ledger.
    fn transaction_reader(
        &self,
        network_passphrase: &str,
        sequence: LedgerSequence,
    ) -> impl Future<Output = Result<Self::Reader, Self::Error>>;
}

/// Reader over transactions of a single ledger, in application order.
pub trait TransactionReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn header(&self) -> &LedgerHeader;

    /// Next transaction, or `None` once the ledger is drained.
    fn read(&mut self) -> impl Future<Output = Result<Option<LedgerTransaction>, Self::Error>>;

    /// Releases resources held by the reader.
    fn close(&mut self);
}

/// Open reader, closed when dropped.
pub(crate) struct ReaderGuard<R: TransactionReader> {
    reader: R,
    sequence: LedgerSequence,
}

impl<R: TransactionReader> Deref for ReaderGuard<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl<R: TransactionReader> DerefMut for ReaderGuard<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}

impl<R: TransactionReader> Drop for ReaderGuard<R> {
    fn drop(&mut self) {
        self.reader.close();
        debug!(sequence = self.sequence, "closed transaction reader");
    }
}

pub(crate) async fn open_reader<B: LedgerBackend>(
    backend: &B,
    network: &Network,
    sequence: LedgerSequence,
) -> Result<ReaderGuard<B::Reader>, FetchError> {
    let reader = backend
        .transaction_reader(network.passphrase(), sequence)
        .await
        .map_err(|err| FetchError::OpenReader {
            sequence,
            source: Box::new(err),
        })?;
    debug!(sequence, "opened transaction reader");
    Ok(ReaderGuard { reader, sequence })
}
