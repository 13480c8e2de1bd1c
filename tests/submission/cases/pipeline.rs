use crate::*;
use alloy::primitives::U256;
use batch_transfer::{
    error::{BatchError, SubmissionError},
    progress::{Severity, Stage},
    provider::NonceTag,
    transactions::DispatchStrategy,
    types::{GasPlan, SignerProfile},
};

#[tokio::test]
async fn submits_batch() {
    let mut harness = Harness::heuristic(MockClient::default());
    let receipt = harness.submit(transfers(&[1, 2, 3])).await.unwrap();

    let plan =
        GasPlan { gas_limit: 2_400_000, max_fee_per_gas: 12, max_priority_fee_per_gas: 2 };
    assert_eq!(receipt.tx_hash, TX_HASH);
    assert_eq!(receipt.nonce, 4);
    assert_eq!(receipt.strategy, DispatchStrategy::ContractCall);
    assert_eq!(receipt.plan, plan);
    assert_eq!(
        receipt.explorer_url.unwrap().as_str(),
        format!("https://holesky.etherscan.io/tx/{TX_HASH}")
    );

    assert_eq!(
        harness.client.recorded(),
        vec![
            Recorded::TransactionCount(NonceTag::Latest),
            Recorded::SignAuthorization { nonce: 5 },
            Recorded::GasPrice,
            Recorded::BlockGasLimit,
            Recorded::Balance,
            Recorded::ContractCall { nonce: 4, plan, value: U256::from(6), calls: 3 },
        ]
    );
    assert_eq!(
        harness.gate.titles(),
        vec!["Sign delegation authorization", "Send batch transaction"]
    );

    let stages: Vec<_> = harness.events().into_iter().map(|event| event.stage).collect();
    assert_eq!(
        stages,
        vec![
            Stage::Preparing,
            Stage::Authorization,
            Stage::Authorization,
            Stage::GasEstimation,
            Stage::Balance,
            Stage::Transaction,
            Stage::TransactionComplete,
        ]
    );
}

#[tokio::test]
async fn authorization_payload() {
    let harness = Harness::heuristic(MockClient::default());
    harness.submit(transfers(&[1])).await.unwrap();

    let requests = harness.gate.requests.lock().unwrap();
    let payload = &requests[0].payload;
    assert_eq!(payload["delegate"], serde_json::json!(DELEGATE));
    assert_eq!(payload["chainId"], serde_json::json!(17000));
    assert_eq!(payload["account"], serde_json::json!(harness.session.account));

    // the transaction confirmation shows the final numbers
    let payload = &requests[1].payload;
    assert_eq!(payload["gasLimit"], serde_json::json!(1_800_000));
    assert_eq!(payload["maxFeePerGas"], serde_json::json!("12"));
    assert_eq!(payload["authorization"]["nonce"], serde_json::json!(5));
    assert_eq!(payload["calls"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn strict_signer_prefers_raw_dispatch() {
    let harness = Harness::new(
        MockClient::default(),
        ScriptedGate::default(),
        SignerProfile::Strict,
        heuristic_gas(),
    );
    let receipt = harness.submit(transfers(&[1, 2, 3])).await.unwrap();

    assert_eq!(receipt.strategy, DispatchStrategy::RawDispatch);
    // (500000 + 100000 * 3) * 4
    assert_eq!(receipt.plan.gas_limit, 3_200_000);
    assert_eq!(
        harness.client.dispatches(),
        vec![Recorded::RawTransaction {
            nonce: 4,
            plan: receipt.plan,
            value: U256::from(6),
            to: harness.session.account,
        }]
    );
}

#[tokio::test]
async fn empty_batch() {
    let mut harness = Harness::heuristic(MockClient::default());
    let err = harness.submit(vec![]).await.unwrap_err();

    assert!(matches!(err, SubmissionError::Batch(BatchError::Empty)));
    assert!(harness.client.recorded().is_empty());
    assert!(harness.gate.titles().is_empty());

    let events = harness.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].stage, Stage::Error);
    assert_eq!(events[0].severity, Severity::Error);
}
