use crate::*;
use alloy::primitives::U256;
use batch_transfer::{
    confirmation::Confirmation, error::SubmissionError, progress::Stage, types::SignerProfile,
};

#[tokio::test]
async fn rejected_authorization_stops_before_any_query() {
    let mut harness = Harness::new(
        MockClient::default(),
        ScriptedGate::new([Confirmation::Rejected]),
        SignerProfile::Standard,
        heuristic_gas(),
    );
    let err = harness.submit(transfers(&[1, 2, 3])).await.unwrap_err();

    assert!(matches!(err, SubmissionError::UserRejected(_)));
    assert!(harness.client.recorded().is_empty());
    assert_eq!(harness.gate.titles().len(), 1);
    assert_eq!(harness.events().last().unwrap().stage, Stage::Error);
}

#[tokio::test]
async fn rejected_transaction_is_not_dispatched() {
    let harness = Harness::new(
        MockClient::default(),
        ScriptedGate::new([Confirmation::Approved, Confirmation::Rejected]),
        SignerProfile::Standard,
        heuristic_gas(),
    );
    let err = harness.submit(transfers(&[1, 2, 3])).await.unwrap_err();

    assert!(matches!(err, SubmissionError::UserRejected(_)));
    assert!(harness.client.recorded().contains(&Recorded::Balance));
    assert!(harness.client.dispatches().is_empty());
}

#[tokio::test]
async fn insufficient_balance() {
    let mut harness =
        Harness::heuristic(MockClient { balance: U256::from(1_000), ..Default::default() });
    let err = harness.submit(transfers(&[1, 2, 3])).await.unwrap_err();

    // 6 + 2_400_000 * 12
    let required = U256::from(28_800_006u64);
    assert_eq!(err.shortfall(), Some(required - U256::from(1_000)));
    match err {
        SubmissionError::InsufficientBalance { required: r, available } => {
            assert_eq!(r, required);
            assert_eq!(available, U256::from(1_000));
        }
        err => panic!("unexpected error: {err}"),
    }
    assert!(harness.client.dispatches().is_empty());
    // the transaction is never presented for confirmation
    assert_eq!(harness.gate.titles().len(), 1);
    assert_eq!(harness.events().last().unwrap().stage, Stage::Error);
}

#[tokio::test]
async fn exact_balance_is_enough() {
    let harness = Harness::heuristic(MockClient {
        balance: U256::from(28_800_006u64),
        ..Default::default()
    });
    assert!(harness.submit(transfers(&[1, 2, 3])).await.is_ok());
}

#[tokio::test]
async fn exhausted_nonce_is_not_signed() {
    let mut harness = Harness::heuristic(MockClient { latest_nonce: u64::MAX, ..Default::default() });
    let err = harness.submit(transfers(&[1])).await.unwrap_err();

    assert!(matches!(err, SubmissionError::NonceExhausted(u64::MAX)));
    assert!(!harness
        .client
        .recorded()
        .iter()
        .any(|call| matches!(call, Recorded::SignAuthorization { .. })));
    assert!(harness.client.dispatches().is_empty());
    assert_eq!(harness.events().last().unwrap().stage, Stage::Error);
}
