use crate::*;
use alloy::primitives::U256;
use batch_transfer::{
    error::SubmissionError,
    progress::{Severity, Stage},
    provider::NonceTag,
    transactions::DispatchStrategy,
};

#[tokio::test]
async fn nonce_conflict_is_retried_with_pending_nonce() {
    let mut harness =
        Harness::heuristic(MockClient::default().with_dispatch_errors(["nonce too low"]));
    let receipt = harness.submit(transfers(&[1, 2, 3])).await.unwrap();

    assert_eq!(receipt.nonce, 5);
    assert_eq!(receipt.strategy, DispatchStrategy::ContractCall);

    let dispatches = harness.client.dispatches();
    assert_eq!(dispatches.len(), 2);
    let (first_nonce, first_plan) = dispatches[0].dispatch().unwrap();
    let (second_nonce, second_plan) = dispatches[1].dispatch().unwrap();
    assert_eq!((first_nonce, second_nonce), (4, 5));
    assert_eq!(first_plan, second_plan);
    assert!(matches!(dispatches[1], Recorded::ContractCall { .. }));

    let recorded = harness.client.recorded();
    assert!(recorded.contains(&Recorded::TransactionCount(NonceTag::Pending)));
    // the authorization is re-signed for the refreshed nonce
    assert!(recorded.contains(&Recorded::SignAuthorization { nonce: 6 }));
    // but not confirmed again
    assert_eq!(harness.gate.titles().len(), 2);

    assert!(harness.events().iter().any(|event| event.stage == Stage::TransactionRetry));
}

#[tokio::test]
async fn second_nonce_conflict_is_terminal() {
    let mut harness = Harness::heuristic(
        MockClient::default().with_dispatch_errors(["nonce too low", "nonce too low"]),
    );
    let err = harness.submit(transfers(&[1])).await.unwrap_err();

    assert!(matches!(err, SubmissionError::NonceConflict(_)));
    assert_eq!(harness.client.dispatches().len(), 2);
    assert_eq!(harness.events().last().unwrap().stage, Stage::Error);
}

#[tokio::test]
async fn revert_switches_dispatch_form() {
    let mut harness =
        Harness::heuristic(MockClient::default().with_dispatch_errors(["execution reverted"]));
    let receipt = harness.submit(transfers(&[1, 2, 3])).await.unwrap();

    assert_eq!(receipt.strategy, DispatchStrategy::RawDispatch);
    assert_eq!(receipt.nonce, 4);

    let dispatches = harness.client.dispatches();
    assert_eq!(dispatches.len(), 2);
    assert!(matches!(dispatches[0], Recorded::ContractCall { .. }));
    assert_eq!(
        dispatches[1],
        Recorded::RawTransaction {
            nonce: 4,
            plan: receipt.plan,
            value: U256::from(6),
            to: harness.session.account,
        }
    );
    // same nonce and plan in both forms
    assert_eq!(dispatches[0].dispatch(), dispatches[1].dispatch());

    let fallback =
        harness.events().into_iter().find(|event| event.stage == Stage::Fallback).unwrap();
    assert_eq!(fallback.severity, Severity::Warning);
}

#[tokio::test]
async fn second_revert_is_terminal() {
    let mut harness = Harness::heuristic(
        MockClient::default().with_dispatch_errors(["execution reverted", "execution reverted"]),
    );
    let err = harness.submit(transfers(&[1])).await.unwrap_err();

    assert!(matches!(err, SubmissionError::DispatchIncompatibility(_)));
    assert_eq!(harness.client.dispatches().len(), 2);

    let last = harness.events().pop().unwrap();
    assert_eq!(last.stage, Stage::Error);
    assert!(last.message.contains("execution reverted"));
}

#[tokio::test]
async fn each_class_is_retried_once() {
    let harness = Harness::heuristic(
        MockClient::default().with_dispatch_errors(["nonce too low", "execution reverted"]),
    );
    let receipt = harness.submit(transfers(&[1, 2])).await.unwrap();

    assert_eq!(receipt.nonce, 5);
    assert_eq!(receipt.strategy, DispatchStrategy::RawDispatch);
    assert_eq!(harness.client.dispatches().len(), 3);
}

#[tokio::test]
async fn other_failures_are_not_retried() {
    for message in ["insufficient funds for gas * price + value", "already known"] {
        let harness = Harness::heuristic(MockClient::default().with_dispatch_errors([message]));
        let err = harness.submit(transfers(&[1])).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Unknown(_)), "{message}");
        assert!(err.to_string().contains(message));
        assert_eq!(harness.client.dispatches().len(), 1);
    }
}

#[tokio::test]
async fn user_rejection_at_dispatch_is_not_retried() {
    let mut harness = Harness::heuristic(
        MockClient::default().with_dispatch_errors(["User rejected the authorization request"]),
    );
    let err = harness.submit(transfers(&[1, 2])).await.unwrap_err();

    assert!(matches!(err, SubmissionError::UserRejected(_)));
    let dispatches = harness.client.dispatches();
    assert_eq!(dispatches.len(), 1);
    assert!(matches!(dispatches[0], Recorded::ContractCall { .. }));
    assert!(!harness.events().iter().any(|event| event.stage == Stage::Fallback));
    assert_eq!(harness.events().last().unwrap().stage, Stage::Error);
}
