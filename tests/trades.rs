use trade_etl::{
    Network,
    error::TradeError,
    fetch::fetch,
    testing::{self, MemoryLedger, MemoryProvider, TransactionBuilder},
    toid::{self, OfferIdType, Toid},
    trade::{self, TradeOutput},
    types::LedgerRange,
    xdr::{
        ClaimAtom, ClaimAtomType, ManageOfferEffect, MuxedAccount, OperationResult,
        OperationResultTr, OperationType,
    },
};

const SEQUENCE: u32 = 30;
const CLOSE_TIME: u64 = 1_700_000_000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn operation_id(tx_index: u32, op_index: u32) -> i64 {
    Toid::new(SEQUENCE, tx_index, op_index).unwrap().to_i64()
}

fn trades_of(transaction: TransactionBuilder) -> Result<Vec<TradeOutput>, TradeError> {
    trade::transaction_trades(&transaction.record(testing::header(SEQUENCE, CLOSE_TIME)))
}

fn sell_offer(claims: Vec<ClaimAtom>) -> TransactionBuilder {
    TransactionBuilder::new(MuxedAccount::Ed25519([7; 32])).operation(
        OperationType::ManageSellOffer,
        testing::manage_sell_result(claims, ManageOfferEffect::Deleted),
    )
}

/// Tests trade extraction over a fetched ledger mixing every kind of
/// offer crossing transaction.
#[tokio::test]
async fn test_trades_of_fetched_ledger() {
    init_tracing();
    let source = MuxedAccount::Ed25519([7; 32]);
    let ledger = MemoryLedger {
        header: testing::header(SEQUENCE, CLOSE_TIME),
        transactions: vec![
            TransactionBuilder::new(source)
                .index(1)
                .operation(
                    OperationType::ManageSellOffer,
                    testing::manage_sell_result(
                        vec![
                            testing::v0_claim(1, 10, 100, 200),
                            testing::claim(2, 11, 50, 75),
                        ],
                        ManageOfferEffect::Updated(testing::offer_entry(7, 900)),
                    ),
                )
                .operation(
                    OperationType::Payment,
                    OperationResult::Inner(OperationResultTr::Other(OperationType::Payment)),
                )
                .build(),
            TransactionBuilder::new(source)
                .index(2)
                .operation(
                    OperationType::ManageSellOffer,
                    testing::manage_sell_result(
                        vec![testing::claim(5, 99, 1, 1)],
                        ManageOfferEffect::Deleted,
                    ),
                )
                .failed()
                .build(),
            TransactionBuilder::new(source)
                .index(3)
                .operation(
                    OperationType::CreatePassiveSellOffer,
                    testing::manage_sell_result(
                        vec![testing::claim(3, 12, 10, 20)],
                        ManageOfferEffect::Deleted,
                    ),
                )
                .build(),
            TransactionBuilder::new(source)
                .index(4)
                .fee_bump()
                .operation(
                    OperationType::PathPaymentStrictSend,
                    testing::path_payment_strict_send_result(vec![testing::claim(4, 13, 5, 6)]),
                )
                .build(),
        ],
    };
    let provider = MemoryProvider::new().with_ledger(ledger);

    let records = fetch(
        &provider,
        &Network::testnet(),
        LedgerRange::single(SEQUENCE),
        -1,
    )
    .await
    .unwrap();
    assert_eq!(records.len(), 4);

    let mut trades = Vec::new();
    for record in &records {
        trades.extend(trade::transaction_trades(record).unwrap());
    }

    assert_eq!(
        trades.iter().map(|t| t.offer_id).collect::<Vec<_>>(),
        vec![10, 11, 12, 13]
    );
    assert_eq!(
        trades.iter().map(|t| t.order).collect::<Vec<_>>(),
        vec![0, 1, 0, 0]
    );
    assert_eq!(
        trades
            .iter()
            .map(|t| t.history_operation_id)
            .collect::<Vec<_>>(),
        vec![
            operation_id(1, 0) + 1,
            operation_id(1, 0) + 1,
            operation_id(3, 0) + 1,
            operation_id(4, 0) + 1,
        ]
    );

    // Resting offer of the sell offer, synthesized IDs otherwise
    assert_eq!(trades[0].counter_offer_id, 900);
    assert_eq!(trades[1].counter_offer_id, 900);
    assert_eq!(
        trades[2].counter_offer_id,
        toid::encode_offer_id(operation_id(3, 0), OfferIdType::Toid).unwrap()
    );
    assert_eq!(
        toid::decode_offer_id(trades[3].counter_offer_id),
        (operation_id(4, 0), OfferIdType::Toid)
    );

    assert!(trades.iter().all(|t| t.ledger_closed_at == CLOSE_TIME));
    assert!(trades.iter().all(|t| t.base_is_seller));
    assert!(
        trades
            .iter()
            .all(|t| t.counter_account_address == source.address())
    );
}

/// Tests that passive sell offers decode the same under both result tags.
#[test]
fn test_passive_sell_offer_result_tags() {
    let claims = vec![testing::claim(1, 10, 100, 200), testing::claim(2, 11, 3, 4)];
    let effect = ManageOfferEffect::Created(testing::offer_entry(7, 555));
    let source = MuxedAccount::Ed25519([7; 32]);

    let mistagged = trades_of(TransactionBuilder::new(source).operation(
        OperationType::CreatePassiveSellOffer,
        testing::manage_sell_result(claims.clone(), effect.clone()),
    ))
    .unwrap();
    let tagged = trades_of(TransactionBuilder::new(source).operation(
        OperationType::CreatePassiveSellOffer,
        OperationResult::Inner(OperationResultTr::CreatePassiveSellOffer(
            testing::manage_offer_success(claims, effect),
        )),
    ))
    .unwrap();

    assert_eq!(mistagged.len(), 2);
    assert_eq!(mistagged, tagged);
    assert_eq!(tagged[0].counter_offer_id, 555);
}

/// Tests that legacy and current claim encodings yield identical trades.
#[test]
fn test_v0_and_order_book_claims_are_equivalent() {
    let from_v0 = trades_of(sell_offer(vec![testing::v0_claim(1, 10, 100, 200)])).unwrap();
    let from_order_book = trades_of(sell_offer(vec![testing::claim(1, 10, 100, 200)])).unwrap();
    assert_eq!(from_v0, from_order_book);
}

#[test]
fn test_trade_fields() {
    let trades = trades_of(sell_offer(vec![testing::claim(1, 10, 100, 250)])).unwrap();
    let trade = &trades[0];

    assert_eq!(trade.base_asset_type, "credit_alphanum4");
    assert_eq!(trade.base_asset_code, "USD");
    assert_eq!(
        trade.base_asset_issuer,
        trade_etl::xdr::AccountId::from_ed25519([9; 32]).address()
    );
    assert_eq!(trade.base_amount, 100);
    assert_eq!(trade.counter_asset_type, "native");
    assert_eq!(trade.counter_amount, 250);
    assert_eq!((trade.price_n, trade.price_d), (250, 100));
    assert_eq!(trade.base_offer_id, trade.offer_id);
}

#[test]
fn test_failed_transaction_yields_no_trades() {
    let trades = trades_of(sell_offer(vec![testing::claim(1, 10, 100, 200)]).failed()).unwrap();
    assert!(trades.is_empty());

    let err = trade::extract_trades(
        0,
        operation_id(1, 0),
        &sell_offer(vec![testing::claim(1, 10, 100, 200)])
            .fee_bump()
            .failed()
            .record(testing::header(SEQUENCE, CLOSE_TIME)),
        CLOSE_TIME,
    )
    .unwrap_err();
    assert!(matches!(err, TradeError::TransactionFailed { .. }));
    assert!(err.is_skippable());
}

#[test]
fn test_invalid_claims_fail_the_transaction() {
    init_tracing();
    let cases = [
        (testing::claim(1, 10, 0, 0), "zero"),
        (testing::claim(1, 10, -5, 10), "negative sold"),
        (testing::claim(1, 10, 5, -10), "negative bought"),
        (testing::claim(1, -10, 5, 10), "negative offer ID"),
    ];
    for (claim, case) in cases {
        let err = trades_of(sell_offer(vec![testing::claim(2, 11, 1, 1), claim])).unwrap_err();
        assert!(
            matches!(
                err,
                TradeError::Validation {
                    operation_index: 0,
                    claim_index: 1,
                    ..
                }
            ),
            "{case}: {err}"
        );
        assert!(!err.is_skippable());
    }
}

#[test]
fn test_liquidity_pool_claims_are_rejected() {
    let err = trades_of(
        TransactionBuilder::new(MuxedAccount::Ed25519([7; 32])).operation(
            OperationType::PathPaymentStrictReceive,
            testing::path_payment_strict_receive_result(vec![testing::pool_claim(10, 20)]),
        ),
    )
    .unwrap_err();

    match err {
        TradeError::UnknownOfferVariant { source, .. } => {
            assert_eq!(source.claim_index, 0);
            assert_eq!(source.variant, ClaimAtomType::LiquidityPool);
        }
        err => panic!("unexpected error: {err}"),
    }
}
