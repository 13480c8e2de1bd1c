//! Multi-signer abstraction.
//!
//! A signer abstracted over a local private key or an AWS KMS key.
use crate::config::SecretsConfig;
use alloy::{
    eips::eip7702::{Authorization, SignedAuthorization},
    network::{FullSigner, TxSigner},
    primitives::{Address, Signature, hex},
    signers::{aws::AwsSigner, k256::ecdsa::SigningKey, local::PrivateKeySigner},
};
use aws_config::BehaviorVersion;
use std::{fmt, ops::Deref, sync::Arc};

/// Abstraction over local and remote signers.
#[derive(Clone)]
pub struct DynSigner(pub Arc<dyn FullSigner<Signature> + Send + Sync>);

impl fmt::Debug for DynSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DynSigner").field(&self.address()).finish()
    }
}

impl DynSigner {
    /// Load a hex-encoded private key, with or without `0x` prefix.
    pub fn from_signing_key(key: &str) -> eyre::Result<Self> {
        let bytes = hex::decode(key.trim())?;
        if bytes.len() != 32 {
            eyre::bail!("private key must be 32 bytes, got {}", bytes.len());
        }
        let key = SigningKey::from_slice(&bytes)?;
        Ok(Self(Arc::new(PrivateKeySigner::from_signing_key(key))))
    }

    /// Load a signer from AWS KMS.
    pub async fn from_kms(key_id: &str, chain_id: Option<u64>) -> eyre::Result<Self> {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let client = aws_sdk_kms::Client::new(&config);
        Ok(Self(Arc::new(AwsSigner::new(client, key_id.to_string(), chain_id).await?)))
    }

    /// Loads the signer configured in `secrets`, preferring the private key.
    pub async fn from_secrets(secrets: &SecretsConfig, chain_id: u64) -> eyre::Result<Self> {
        match (&secrets.private_key, &secrets.kms_key_id) {
            (Some(key), _) => Self::from_signing_key(key),
            (None, Some(key_id)) => Self::from_kms(key_id, Some(chain_id)).await,
            (None, None) => eyre::bail!("either a private key or a KMS key id is required"),
        }
    }

    /// Returns the signer's Ethereum Address.
    pub fn address(&self) -> Address {
        TxSigner::address(&self.0)
    }

    /// Signs an EIP-7702 authorization.
    pub async fn sign_authorization(
        &self,
        authorization: Authorization,
    ) -> alloy::signers::Result<SignedAuthorization> {
        let signature = self.sign_hash(&authorization.signature_hash()).await?;
        Ok(authorization.into_signed(signature))
    }
}

impl Deref for DynSigner {
    type Target = dyn FullSigner<Signature> + Send + Sync;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
