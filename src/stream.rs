use futures::{Stream, stream};
use tracing::trace;

use crate::{
    Network,
    error::FetchError,
    provider::{self, LedgerBackend, ReaderGuard, TransactionReader},
    types::{LedgerRange, LedgerSequence, TransactionRecord},
    xdr::LedgerHeader,
};

struct OpenLedger<R: TransactionReader> {
    reader: ReaderGuard<R>,
    header: LedgerHeader,
}

struct State<R: TransactionReader> {
    next_sequence: Option<LedgerSequence>,
    open: Option<OpenLedger<R>>,
    failed: bool,
}

/// Returns stream of transactions of every ledger in `range`, in ledger
/// then application order.
///
/// Ledgers are opened lazily, one at a time: the reader of the next ledger
/// is opened only once the previous one is drained and the stream is polled
/// again. Dropping the stream closes the open reader, if any.
///
/// The stream ends after the first error. Unlike [`crate::fetch::fetch`],
/// transactions yielded before the error stay with the caller.
pub fn transactions<'a, B: LedgerBackend>(
    backend: &'a B,
    network: &'a Network,
    range: LedgerRange,
) -> impl Stream<Item = Result<TransactionRecord, FetchError>> + 'a {
    let state: State<B::Reader> = State {
        next_sequence: Some(range.start()),
        open: None,
        failed: false,
    };

    stream::unfold(state, move |mut state| async move {
        if state.failed {
            return None;
        }
        loop {
            if let Some(open) = state.open.as_mut() {
                let sequence = open.header.sequence;
                let read = open.reader.read().await;
                match read {
                    Ok(Some(transaction)) => {
                        trace!(
                            sequence,
                            index = transaction.index,
                            tx_hash = %transaction.hash,
                            "read transaction"
                        );
                        let record = TransactionRecord::new(transaction, open.header.clone());
                        return Some((Ok(record), state));
                    }
                    Ok(None) => {
                        state.open = None;
                    }
                    Err(err) => {
                        state.open = None;
                        state.failed = true;
                        let err = FetchError::Read {
                            sequence,
                            source: Box::new(err),
                        };
                        return Some((Err(err), state));
                    }
                }
            }

            let sequence = state.next_sequence?;
            state.next_sequence = sequence.checked_add(1).filter(|s| *s <= range.end());

            match provider::open_reader(backend, network, sequence).await {
                Ok(reader) => {
                    // Header is read once per ledger and shared by its transactions
                    let header = reader.header().clone();
                    state.open = Some(OpenLedger { reader, header });
                }
                Err(err) => {
                    state.failed = true;
                    return Some((Err(err), state));
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::testing::{self, MemoryProvider};

    #[tokio::test]
    async fn test_stream_yields_ledgers_in_order() {
        let provider = MemoryProvider::new()
            .with_ledger(testing::ledger(10, 3))
            .with_ledger(testing::ledger(11, 0))
            .with_ledger(testing::ledger(12, 2));
        let network = Network::testnet();
        let backend = provider.backend();

        let records = transactions(&backend, &network, LedgerRange::new(10, 12).unwrap())
            .collect::<Vec<_>>()
            .await;

        let positions = records
            .iter()
            .map(|r| {
                let r = r.as_ref().unwrap();
                (r.ledger_sequence(), r.transaction.index)
            })
            .collect::<Vec<_>>();
        assert_eq!(positions, vec![(10, 1), (10, 2), (10, 3), (12, 1), (12, 2)]);
        assert_eq!(provider.opened(), vec![10, 11, 12]);
        assert_eq!(provider.closed(), vec![10, 11, 12]);
    }

    #[tokio::test]
    async fn test_stream_opens_ledgers_lazily() {
        let provider = MemoryProvider::new()
            .with_ledger(testing::ledger(10, 1))
            .with_ledger(testing::ledger(11, 1));
        let network = Network::testnet();
        let backend = provider.backend();

        {
            let stream = transactions(&backend, &network, LedgerRange::new(10, 11).unwrap());
            futures::pin_mut!(stream);
            let first = stream.next().await.unwrap().unwrap();
            assert_eq!(first.ledger_sequence(), 10);
            assert_eq!(provider.opened(), vec![10]);
            assert!(provider.closed().is_empty());
        }

        // Dropping the stream released the open reader
        assert_eq!(provider.closed(), vec![10]);
    }

    #[tokio::test]
    async fn test_stream_keeps_records_before_error() {
        // Ledger 11 is missing from the archive
        let provider = MemoryProvider::new()
            .with_ledger(testing::ledger(10, 2))
            .with_ledger(testing::ledger(12, 2));
        let network = Network::testnet();
        let backend = provider.backend();

        let records = transactions(&backend, &network, LedgerRange::new(10, 12).unwrap())
            .collect::<Vec<_>>()
            .await;

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[1].is_ok());
        assert!(matches!(
            records[2],
            Err(FetchError::OpenReader { sequence: 11, .. })
        ));
        assert_eq!(provider.opened(), vec![10]);
    }

    #[tokio::test]
    async fn test_stream_stops_after_read_error() {
        let provider = MemoryProvider::new()
            .with_ledger(testing::ledger(10, 3))
            .with_read_failure(10, 1)
            .with_ledger(testing::ledger(11, 1));
        let network = Network::testnet();
        let backend = provider.backend();

        let records = transactions(&backend, &network, LedgerRange::new(10, 11).unwrap())
            .collect::<Vec<_>>()
            .await;

        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        assert!(matches!(records[1], Err(FetchError::Read { sequence: 10, .. })));
        assert_eq!(provider.closed(), vec![10]);
    }
}
