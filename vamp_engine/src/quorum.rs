use std::fmt;

use anyhow::{anyhow, bail};
use balance_util::{get_balance_hash, keccak256, to_eth_signed_message_hash, BalanceHash};
use libsecp256k1::{recover, sign, Message, PublicKey, RecoveryId, SecretKey, Signature};
use serde::{Deserialize, Serialize};

use crate::constant::ETH_ADDRESS_LEN;
use crate::error::{Result, VampError};

pub const SIGNATURE_LEN: usize = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationRole {
    Solver,
    Validator,
    Owner,
}

impl fmt::Display for AttestationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttestationRole::Solver => "solver",
            AttestationRole::Validator => "validator",
            AttestationRole::Owner => "owner",
        };
        f.write_str(name)
    }
}

/// Checks one signature over a balance digest against one expected public key.
pub trait SignatureScheme: Send + Sync {
    fn name(&self) -> &'static str;

    fn verify(
        &self,
        digest: &BalanceHash,
        signature: &[u8],
        expected_key: &[u8],
    ) -> anyhow::Result<()>;
}

/// `personal_sign` over the digest: 65-byte `r || s || v` recoverable secp256k1
/// signatures checked against a 20-byte Ethereum address.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthereumPersonalSign;

impl SignatureScheme for EthereumPersonalSign {
    fn name(&self) -> &'static str {
        "ethereum-personal-sign"
    }

    fn verify(
        &self,
        digest: &BalanceHash,
        signature: &[u8],
        expected_key: &[u8],
    ) -> anyhow::Result<()> {
        let signature: &[u8; SIGNATURE_LEN] = signature
            .try_into()
            .map_err(|_| anyhow!("expected a {SIGNATURE_LEN}-byte signature, got {}", signature.len()))?;
        if expected_key.len() != ETH_ADDRESS_LEN {
            bail!("expected a {ETH_ADDRESS_LEN}-byte address, got {}", expected_key.len());
        }
        let recovered = recover_eth_address(digest, signature)?;
        if recovered != expected_key {
            bail!(
                "signer 0x{} does not match 0x{}",
                hex::encode(recovered),
                hex::encode(expected_key)
            );
        }
        Ok(())
    }
}

pub fn eth_address(public_key: &PublicKey) -> [u8; ETH_ADDRESS_LEN] {
    let hash = keccak256(&public_key.serialize()[1..]);
    let mut address = [0u8; ETH_ADDRESS_LEN];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Address that signed the EIP-191 wrapping of `digest`.
pub fn recover_eth_address(
    digest: &BalanceHash,
    signature: &[u8; SIGNATURE_LEN],
) -> anyhow::Result<[u8; ETH_ADDRESS_LEN]> {
    let v = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        v => bail!("invalid recovery byte {v}"),
    };
    let recovery_id = RecoveryId::parse(v).map_err(|e| anyhow!("recovery id: {:?}", e))?;
    let signature = Signature::parse_standard_slice(&signature[..64])
        .map_err(|e| anyhow!("signature: {:?}", e))?;
    let message = Message::parse(&to_eth_signed_message_hash(digest));
    let public_key =
        recover(&message, &signature, &recovery_id).map_err(|e| anyhow!("recover: {:?}", e))?;
    Ok(eth_address(&public_key))
}

/// Producer-side signer used by the solver, the validator and the token owner.
pub struct AttestationSigner {
    secret_key: SecretKey,
    address: [u8; ETH_ADDRESS_LEN],
}

impl AttestationSigner {
    pub fn from_hex(private_key_hex: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(private_key_hex.trim().trim_start_matches("0x"))?;
        let secret_key =
            SecretKey::parse_slice(&bytes).map_err(|e| anyhow!("invalid secret key: {:?}", e))?;
        let address = eth_address(&PublicKey::from_secret_key(&secret_key));
        Ok(Self {
            secret_key,
            address,
        })
    }

    pub fn address(&self) -> [u8; ETH_ADDRESS_LEN] {
        self.address
    }

    pub fn sign_hash(&self, digest: &BalanceHash) -> [u8; SIGNATURE_LEN] {
        let message = Message::parse(&to_eth_signed_message_hash(digest));
        let (signature, recovery_id) = sign(&message, &self.secret_key);

        let mut eth_signature = [0u8; SIGNATURE_LEN];
        eth_signature[..64].copy_from_slice(&signature.serialize());
        eth_signature[64] = recovery_id.serialize() + 27;
        eth_signature
    }

    pub fn attest_balance(
        &self,
        eth_address: &[u8; ETH_ADDRESS_LEN],
        amount: u64,
        intent_id: &[u8],
    ) -> [u8; SIGNATURE_LEN] {
        self.sign_hash(&get_balance_hash(eth_address, amount, intent_id))
    }
}

impl fmt::Debug for AttestationSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttestationSigner")
            .field("address", &format!("0x{}", hex::encode(self.address)))
            .finish_non_exhaustive()
    }
}

/// Solver, validator and owner signatures over one balance digest.
/// An empty signature counts as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attestation {
    pub solver: Vec<u8>,
    pub validator: Vec<u8>,
    pub owner: Vec<u8>,
}

impl Attestation {
    pub fn new(
        solver: [u8; SIGNATURE_LEN],
        validator: [u8; SIGNATURE_LEN],
        owner: [u8; SIGNATURE_LEN],
    ) -> Self {
        Self {
            solver: solver.to_vec(),
            validator: validator.to_vec(),
            owner: owner.to_vec(),
        }
    }

    pub fn signature(&self, role: AttestationRole) -> &[u8] {
        match role {
            AttestationRole::Solver => &self.solver,
            AttestationRole::Validator => &self.validator,
            AttestationRole::Owner => &self.owner,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QuorumKeys<'a> {
    pub solver: &'a [u8],
    pub validator: &'a [u8],
    pub owner: &'a [u8],
}

impl QuorumKeys<'_> {
    pub fn key(&self, role: AttestationRole) -> &[u8] {
        match role {
            AttestationRole::Solver => self.solver,
            AttestationRole::Validator => self.validator,
            AttestationRole::Owner => self.owner,
        }
    }
}

/// 3-of-3: every role must sign `digest` with its own key.
pub fn verify_quorum(
    scheme: &dyn SignatureScheme,
    digest: &BalanceHash,
    attestation: &Attestation,
    keys: &QuorumKeys<'_>,
) -> Result<()> {
    for role in [
        AttestationRole::Solver,
        AttestationRole::Validator,
        AttestationRole::Owner,
    ] {
        let signature = attestation.signature(role);
        let key = keys.key(role);
        if signature.is_empty() {
            return Err(VampError::InvalidAttestation {
                role,
                reason: "missing signature".to_string(),
            });
        }
        if key.is_empty() {
            return Err(VampError::InvalidAttestation {
                role,
                reason: "no public key configured".to_string(),
            });
        }
        scheme
            .verify(digest, signature, key)
            .map_err(|e| VampError::InvalidAttestation {
                role,
                reason: e.to_string(),
            })?;
    }
    Ok(())
}
