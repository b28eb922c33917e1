use crate::{
    error::FetchError,
    xdr::{LedgerHeader, LedgerTransaction},
};

/// Ledger sequence number.
pub type LedgerSequence = u32;

/// Inclusive range of ledger sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LedgerRange {
    start: LedgerSequence,
    end: LedgerSequence,
}

impl LedgerRange {
    pub fn new(start: LedgerSequence, end: LedgerSequence) -> Result<Self, FetchError> {
        if start > end {
            return Err(FetchError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering a single ledger.
    pub fn single(sequence: LedgerSequence) -> Self {
        Self {
            start: sequence,
            end: sequence,
        }
    }

    pub fn start(&self) -> LedgerSequence {
        self.start
    }

    pub fn end(&self) -> LedgerSequence {
        self.end
    }

    pub fn contains(&self, sequence: LedgerSequence) -> bool {
        (self.start..=self.end).contains(&sequence)
    }

    /// Sequences of the range in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = LedgerSequence> + use<> {
        self.start..=self.end
    }
}

/// Transaction along with the header of the ledger it was applied in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    pub transaction: LedgerTransaction,
    pub header: LedgerHeader,
}

impl TransactionRecord {
    pub fn new(transaction: LedgerTransaction, header: LedgerHeader) -> Self {
        Self {
            transaction,
            header,
        }
    }

    pub fn ledger_sequence(&self) -> LedgerSequence {
        self.header.sequence
    }

    /// Ledger close time, unix seconds.
    pub fn ledger_close_time(&self) -> u64 {
        self.header.close_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_range() {
        let range = LedgerRange::new(10, 12).unwrap();
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![10, 11, 12]);
        assert!(range.contains(11));
        assert!(!range.contains(13));

        assert_eq!(LedgerRange::single(7).iter().collect::<Vec<_>>(), vec![7]);

        assert!(matches!(
            LedgerRange::new(12, 10),
            Err(FetchError::InvalidRange { start: 12, end: 10 })
        ));
    }

    #[test]
    fn test_ledger_range_up_to_max_sequence() {
        let range = LedgerRange::new(u32::MAX - 1, u32::MAX).unwrap();
        assert_eq!(range.iter().count(), 2);
    }
}
