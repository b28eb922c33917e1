//! Bounded transaction fetching over a ledger range.

use futures::StreamExt;
use tracing::debug;

use crate::{
    Network,
    error::FetchError,
    provider::LedgerDataProvider,
    stream,
    types::{LedgerRange, TransactionRecord},
};

/// Accumulator holding at most `limit` items.
#[derive(Clone, Debug)]
pub struct BoundedCollector<T> {
    limit: Option<usize>,
    items: Vec<T>,
}

impl<T> BoundedCollector<T> {
    /// Negative `limit` means unbounded.
    pub fn new(limit: i64) -> Self {
        Self {
            limit: usize::try_from(limit).ok(),
            items: Vec::new(),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            limit: None,
            items: Vec::new(),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.items.len() >= limit)
    }

    /// Adds the item unless full; returns whether it was added.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

/// Returns transactions of the ledgers in `range` (inclusive on both ends),
/// in ledger then application order, along with their ledger headers.
///
/// A negative `limit` means all transactions of the range are returned,
/// otherwise at most `limit` of them. Ledgers past the one completing the
/// limit are not opened.
///
/// Any provider failure fails the whole call: transactions collected so far
/// are discarded rather than returned as a partial result. Use
/// [`stream::transactions`] to keep them.
pub async fn fetch<P: LedgerDataProvider>(
    provider: &P,
    network: &Network,
    range: LedgerRange,
    limit: i64,
) -> Result<Vec<TransactionRecord>, FetchError> {
    let mut collector = BoundedCollector::new(limit);
    if collector.is_full() {
        return Ok(collector.into_inner());
    }

    let backend = provider
        .open_backend(network.archive_urls(), range)
        .await
        .map_err(|err| FetchError::Backend {
            start: range.start(),
            end: range.end(),
            source: Box::new(err),
        })?;

    let transactions = stream::transactions(&backend, network, range);
    futures::pin_mut!(transactions);

    while !collector.is_full() {
        match transactions.next().await {
            Some(record) => {
                collector.push(record?);
            }
            None => break,
        }
    }

    debug!(
        start = range.start(),
        end = range.end(),
        count = collector.len(),
        "fetched transactions"
    );
    Ok(collector.into_inner())
}
