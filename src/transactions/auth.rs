//! EIP-7702 delegation authorizations.
//!
//! The account sends the batch itself, so its nonce is incremented before the authorization
//! list is processed. An authorization attached to a transaction with nonce `n` therefore has to
//! be signed for nonce `n + 1`.

use crate::{
    confirmation::{ConfirmationGate, ConfirmationRequest},
    error::SubmissionError,
    progress::{ProgressEvent, ProgressSink, Stage},
    provider::ChainClient,
    types::Session,
};
use alloy::{
    eips::eip7702::{Authorization, SignedAuthorization},
    primitives::U256,
};
use serde_json::json;
use tracing::instrument;

/// The unsigned authorization delegating the session account for a transaction with `tx_nonce`.
///
/// Fails with [`SubmissionError::NonceExhausted`] if `tx_nonce` is `u64::MAX`.
pub fn authorization_for(session: &Session, tx_nonce: u64) -> Result<Authorization, SubmissionError> {
    let nonce = tx_nonce.checked_add(1).ok_or(SubmissionError::NonceExhausted(tx_nonce))?;
    Ok(Authorization { chain_id: U256::from(session.chain_id()), address: session.delegate, nonce })
}

/// Asks the gate to approve delegating the session account.
///
/// Nothing has been sent to the chain when this returns.
#[instrument(skip_all)]
pub async fn confirm_authorization(
    gate: &dyn ConfirmationGate,
    session: &Session,
    progress: &dyn ProgressSink,
) -> Result<(), SubmissionError> {
    progress.emit(ProgressEvent::info(
        Stage::Authorization,
        format!("requesting approval to delegate {} to {}", session.account, session.delegate),
    ));

    let request = ConfirmationRequest {
        title: "Sign delegation authorization".to_string(),
        message: format!(
            "Delegate account {} to contract {} on {}",
            session.account, session.delegate, session.chain
        ),
        payload: json!({
            "delegate": session.delegate,
            "chainId": session.chain_id(),
            "account": session.account,
        }),
    };

    if !gate.request(request).await.is_approved() {
        return Err(SubmissionError::UserRejected("the delegation authorization".to_string()));
    }
    Ok(())
}

/// Signs the authorization for a transaction with `tx_nonce`.
///
/// Only the authorization tuple is logged, never the signature.
#[instrument(skip_all, fields(tx_nonce = tx_nonce))]
pub async fn sign_authorization(
    client: &dyn ChainClient,
    session: &Session,
    tx_nonce: u64,
) -> Result<SignedAuthorization, SubmissionError> {
    client
        .sign_authorization(authorization_for(session, tx_nonce)?)
        .await
        .map_err(SubmissionError::from_client)
}
