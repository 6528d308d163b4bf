mod helpers;

use futures::future::join_all;
use helpers::*;
use vamp_engine::util::compute_merkle_root;
use vamp_engine::{
    AccountData, AttestationRole, AttestationSigner, Authorization, AuthorizationMode,
    AuthorizationSettings, ClaimState, EngineConfig, InitializeArgs, VampError, VampEvent,
    VampLedger, VampState, VampStateHeader, VampingParams,
};

#[tokio::test]
async fn test_claim_happy_path() {
    let f = setup().await;
    f.fund(0, 10_000).await;

    let receipt = f.ledger.claim(f.claim_args(0, 10)).await.unwrap();
    assert_eq!(receipt.amount, 10);
    assert_eq!(receipt.cost, 1_045);
    assert_eq!(receipt.token_supply, 10);
    assert_eq!(f.balances(0).await, (8_955, 1_045, 10, MINTED_SUPPLY - 10));

    let state = f.ledger.vamp_state(&f.mint()).await.unwrap();
    assert_eq!(state.total_claimed, 10);
    assert_eq!(state.reserve_balance, 1_045);
    assert_eq!(state.token_supply, 10);
    assert!(f.ledger.is_claimed(&f.mint(), &f.holder_address(0)).await.unwrap());
    assert!(!f.ledger.is_claimed(&f.mint(), &f.holder_address(1)).await.unwrap());

    let claim = f
        .ledger
        .claim_state(&f.mint(), &f.holder_address(0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(claim.amount, 10);
    assert_eq!(claim.cost, 1_045);
    assert_eq!(claim.claimant, claimant(0));

    // the next claim is priced against the grown supply
    f.fund(1, 10_000).await;
    let receipt = f.ledger.claim(f.claim_args(1, 20)).await.unwrap();
    assert_eq!(receipt.cost, 2_390);
    assert_eq!(receipt.reserve_balance, 1_045 + 2_390);
    assert_eq!(receipt.total_claimed, 30);
}

#[tokio::test]
async fn test_partial_allocation_claim() {
    let f = setup().await;
    f.fund(2, 100_000).await;
    let receipt = f.ledger.claim(f.claim_args(2, 7)).await.unwrap();
    assert_eq!(receipt.amount, 7);
    assert_eq!(f.balances(2).await.2, 7);
}

#[tokio::test]
async fn test_events_are_recorded() {
    let f = setup().await;
    f.fund(0, 10_000).await;
    f.ledger.claim(f.claim_args(0, 10)).await.unwrap();

    let events = f.ledger.events().await;
    assert_eq!(events.len(), 2);
    match &events[0] {
        VampEvent::TokenMintCreated(created) => {
            assert_eq!(created.mint_account, f.mint());
            assert_eq!(created.amount, MINTED_SUPPLY);
            assert_eq!(created.token_erc20_address, format!("0x{}", "b6".repeat(20)));
        }
        other => panic!("unexpected event {other:?}"),
    }
    match &events[1] {
        VampEvent::TokensClaimed(claimed) => {
            assert_eq!(claimed.claimant, claimant(0));
            assert_eq!(claimed.cost, 1_045);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_one_invalid_signature_rejects_claim() {
    let f = setup().await;
    f.fund(0, 10_000).await;
    let impostor = AttestationSigner::from_hex(TOKEN_OWNER_KEY).unwrap();
    let eth_address = f.holder_address(0);
    let forged = impostor.attest_balance(&eth_address, 10, &INTENT_ID).to_vec();

    for role in [
        AttestationRole::Solver,
        AttestationRole::Validator,
        AttestationRole::Owner,
    ] {
        let mut args = f.claim_args(0, 10);
        match role {
            AttestationRole::Solver => args.attestation.solver = forged.clone(),
            AttestationRole::Validator => args.attestation.validator = forged.clone(),
            AttestationRole::Owner => args.attestation.owner = forged.clone(),
        }
        match f.ledger.claim(args).await {
            Err(VampError::InvalidAttestation { role: failed, .. }) => assert_eq!(failed, role),
            other => panic!("expected {role} rejection, got {other:?}"),
        }
    }

    assert_eq!(f.balances(0).await, (10_000, 0, 0, MINTED_SUPPLY));
    assert!(!f.ledger.is_claimed(&f.mint(), &eth_address).await.unwrap());
}

#[tokio::test]
async fn test_signature_over_other_amount_rejects() {
    let f = setup().await;
    f.fund(0, 10_000).await;
    let mut args = f.claim_args(0, 10);
    args.attestation = f.attest(0, 9);
    assert!(matches!(
        f.ledger.claim(args).await,
        Err(VampError::InvalidAttestation { .. })
    ));
}

#[tokio::test]
async fn test_double_claim_is_rejected() {
    let f = setup().await;
    f.fund(0, 10_000).await;
    f.ledger.claim(f.claim_args(0, 10)).await.unwrap();
    let after_first = f.balances(0).await;

    assert_eq!(
        f.ledger.claim(f.claim_args(0, 10)).await,
        Err(VampError::AlreadyClaimed)
    );
    assert_eq!(
        f.ledger.claim(f.claim_args(0, 5)).await,
        Err(VampError::AlreadyClaimed)
    );
    assert_eq!(f.balances(0).await, after_first);
    assert_eq!(f.ledger.vamp_state(&f.mint()).await.unwrap().total_claimed, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_commit_once() {
    let f = setup().await;
    f.fund(1, 1_000_000).await;

    let handles = (0..16).map(|_| {
        let ledger = f.ledger.clone();
        let args = f.claim_args(1, 20);
        tokio::spawn(async move { ledger.claim(args).await })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| *r == Err(VampError::AlreadyClaimed)));

    let (lamports, sol_vault, tokens, vault) = f.balances(1).await;
    assert_eq!(tokens, 20);
    assert_eq!(vault, MINTED_SUPPLY - 20);
    assert_eq!(lamports + sol_vault, 1_000_000);
    assert_eq!(f.ledger.vamp_state(&f.mint()).await.unwrap().token_supply, 20);
}

#[tokio::test]
async fn test_insufficient_funds_then_retry() {
    let f = setup().await;
    f.fund(0, 1_000).await;

    assert_eq!(
        f.ledger.claim(f.claim_args(0, 10)).await,
        Err(VampError::InsufficientFunds {
            required: 1_045,
            available: 1_000
        })
    );
    assert_eq!(f.balances(0).await, (1_000, 0, 0, MINTED_SUPPLY));
    assert!(!f.ledger.is_claimed(&f.mint(), &f.holder_address(0)).await.unwrap());

    f.fund(0, 45).await;
    let receipt = f.ledger.claim(f.claim_args(0, 10)).await.unwrap();
    assert_eq!(receipt.cost, 1_045);
    assert_eq!(f.balances(0).await.0, 0);
}

#[tokio::test]
async fn test_allocation_exceeded() {
    let f = setup().await;
    f.fund(0, 1_000_000).await;
    assert_eq!(
        f.ledger.claim(f.claim_args(0, 11)).await,
        Err(VampError::AllocationExceeded {
            requested: 11,
            allocated: 10
        })
    );

    // an address outside the table is allocated nothing
    let stranger = AttestationSigner::from_hex(TOKEN_OWNER_KEY).unwrap();
    let eth_address = stranger.address();
    let mut args = f.claim_args(0, 1);
    args.eth_address = eth_address;
    args.attestation = vamp_engine::Attestation::new(
        f.solver.attest_balance(&eth_address, 1, &INTENT_ID),
        f.validator.attest_balance(&eth_address, 1, &INTENT_ID),
        stranger.attest_balance(&eth_address, 1, &INTENT_ID),
    );
    assert_eq!(
        f.ledger.claim(args).await,
        Err(VampError::AllocationExceeded {
            requested: 1,
            allocated: 0
        })
    );
}

#[tokio::test]
async fn test_zero_amount_is_rejected() {
    let f = setup().await;
    assert_eq!(
        f.ledger.claim(f.claim_args(0, 0)).await,
        Err(VampError::InvalidClaimAmount)
    );
}

#[tokio::test]
async fn test_price_ceiling_rejects_without_mutation() {
    let f = Setup {
        vamping_params: Some(VampingParams {
            max_price: Some(110),
            ..linear_curve()
        }),
        ..Default::default()
    }
    .build()
    .await;
    f.fund(0, 1_000_000).await;
    f.fund(1, 1_000_000).await;

    f.ledger.claim(f.claim_args(0, 10)).await.unwrap();
    assert_eq!(
        f.ledger.claim(f.claim_args(1, 20)).await,
        Err(VampError::PriceCeilingExceeded {
            price: 129,
            max_price: 110
        })
    );
    assert!(!f.ledger.is_claimed(&f.mint(), &f.holder_address(1)).await.unwrap());
    assert_eq!(f.balances(1).await.0, 1_000_000);
}

#[tokio::test]
async fn test_free_claiming_by_default() {
    let f = Setup {
        vamping_params: None,
        ..Default::default()
    }
    .build()
    .await;
    assert!(!f.vamp_state.paid_claiming_enabled);

    let receipt = f.ledger.claim(f.claim_args(2, 30)).await.unwrap();
    assert_eq!(receipt.cost, 0);
    assert_eq!(f.balances(2).await, (0, 0, 30, MINTED_SUPPLY - 30));
}

#[tokio::test]
async fn test_descriptor_params_apply_without_override() {
    let mut descriptor = descriptor(allocation_table());
    descriptor.vamping_params = Some(VampingParams {
        paid_claiming_enabled: true,
        use_bonding_curve: false,
        flat_price_per_token: 50,
        ..VampingParams::default()
    });
    let f = Setup {
        descriptor,
        vamping_params: None,
        ..Default::default()
    }
    .build()
    .await;
    f.fund(0, 500).await;
    let receipt = f.ledger.claim(f.claim_args(0, 10)).await.unwrap();
    assert_eq!(receipt.cost, 500);
    assert_eq!(f.vamp_state.initial_price, 50);
}

#[tokio::test]
async fn test_merkle_authorized_claim() {
    let f = Setup::default()
        .with_settings(AuthorizationSettings {
            mode: AuthorizationMode::Merkle,
            ..Default::default()
        })
        .build()
        .await;
    f.fund(1, 1_000_000).await;

    let mut missing = f.claim_args(1, 20);
    missing.proof = None;
    assert_eq!(f.ledger.claim(missing).await, Err(VampError::InvalidProof));

    let mut wrong_index = f.merkle_claim_args(1, 20);
    if let Some(proof) = wrong_index.proof.as_mut() {
        proof.index = 0;
    }
    assert_eq!(f.ledger.claim(wrong_index).await, Err(VampError::InvalidProof));

    let receipt = f.ledger.claim(f.merkle_claim_args(1, 20)).await.unwrap();
    assert_eq!(receipt.amount, 20);
    assert_eq!(
        f.ledger.claim(f.merkle_claim_args(1, 20)).await,
        Err(VampError::AlreadyClaimed)
    );
}

#[tokio::test]
async fn test_vault_shortfall_rejects_without_mutation() {
    // a root-only descriptor cannot be checked against the minted amount
    let mut descriptor = descriptor(allocation_table());
    descriptor.authorization = Authorization::Merkle {
        root: compute_merkle_root(&allocation_table()),
    };
    descriptor.amount = 15;
    let f = Setup {
        descriptor,
        ..Default::default()
    }
    .build()
    .await;
    f.fund(1, 10_000).await;

    assert_eq!(
        f.ledger.claim(f.merkle_claim_args(1, 20)).await,
        Err(VampError::VaultDepleted {
            requested: 20,
            available: 15
        })
    );
    assert!(!f.ledger.is_claimed(&f.mint(), &f.holder_address(1)).await.unwrap());
    assert_eq!(f.balances(1).await, (10_000, 0, 0, 15));
    let state = f.ledger.vamp_state(&f.mint()).await.unwrap();
    assert_eq!((state.total_claimed, state.token_supply), (0, 0));

    // a claim the vault can cover still goes through
    f.fund(0, 10_000).await;
    assert!(f.ledger.claim(f.merkle_claim_args(0, 10)).await.is_ok());
    assert_eq!(f.balances(0).await.3, 5);
}

#[tokio::test]
async fn test_configured_owner_key_replaces_self_signature() {
    let owner = AttestationSigner::from_hex(TOKEN_OWNER_KEY).unwrap();
    let mut descriptor = descriptor(allocation_table());
    descriptor.owner_public_key = owner.address().to_vec();
    let f = Setup {
        descriptor,
        ..Default::default()
    }
    .build()
    .await;
    f.fund(0, 10_000).await;

    assert!(matches!(
        f.ledger.claim(f.claim_args(0, 10)).await,
        Err(VampError::InvalidAttestation {
            role: AttestationRole::Owner,
            ..
        })
    ));

    let mut args = f.claim_args(0, 10);
    args.attestation.owner = owner
        .attest_balance(&f.holder_address(0), 10, &INTENT_ID)
        .to_vec();
    assert!(f.ledger.claim(args).await.is_ok());
}

#[tokio::test]
async fn test_second_initialization_is_rejected() {
    let f = setup().await;
    let result = f
        .ledger
        .initialize(
            authority(),
            InitializeArgs {
                vamp_identifier: None,
                vamping_data: descriptor(allocation_table()).encode(),
                vamping_params: None,
            },
        )
        .await;
    assert_eq!(result, Err(VampError::AlreadyInitialized));
    assert_eq!(f.ledger.events().await.len(), 1);

    // another identifier derives another mint
    let other = f
        .ledger
        .initialize(
            authority(),
            InitializeArgs {
                vamp_identifier: Some(7),
                vamping_data: descriptor(allocation_table()).encode(),
                vamping_params: None,
            },
        )
        .await
        .unwrap();
    assert_ne!(other.mint, f.mint());
    assert_eq!(other.vamp_identifier, 7);
}

#[tokio::test]
async fn test_malformed_descriptor_is_rejected() {
    let ledger = VampLedger::new(&EngineConfig::default());
    let blob = descriptor(allocation_table()).encode();
    let result = ledger
        .initialize(
            authority(),
            InitializeArgs {
                vamp_identifier: None,
                vamping_data: blob[..blob.len() - 5].to_vec(),
                vamping_params: None,
            },
        )
        .await;
    assert!(matches!(result, Err(VampError::Decode(_))));
    assert!(ledger.events().await.is_empty());
}

#[tokio::test]
async fn test_raw_accounts_parse_at_fixed_offsets() {
    let f = setup().await;
    f.fund(0, 10_000).await;
    let receipt = f.ledger.claim(f.claim_args(0, 10)).await.unwrap();

    let state_address = vamp_engine::state::pda::find_vamp_state_address(
        &f.mint(),
        &f.ledger.program_id(),
    )
    .unwrap()
    .0;
    let data = f.ledger.raw_account(&state_address).await.unwrap();
    let header = VampStateHeader::read(&data).unwrap();
    assert_eq!(header.mint, f.mint());
    assert_eq!(header.total_claimed, 10);
    assert_eq!(header.reserve_balance, 1_045);
    assert_eq!(header.token_supply, 10);
    assert_eq!(header.initial_price, 100);
    assert_eq!(header.intent_id, hex::encode(INTENT_ID));
    assert_eq!(u64::from_le_bytes(data[133..141].try_into().unwrap()), 10);
    assert_eq!(
        VampState::try_from_account_bytes(&data).unwrap(),
        f.ledger.vamp_state(&f.mint()).await.unwrap()
    );

    let marker = f.ledger.raw_account(&receipt.claim_state).await.unwrap();
    assert_eq!(marker[8], 1);
    assert!(ClaimState::try_from_account_bytes(&marker).unwrap().is_claimed);
}

#[tokio::test]
async fn test_quote_matches_claim_cost() {
    let f = setup().await;
    let quote = f.ledger.quote(&f.mint(), 10).await.unwrap();
    f.fund(0, 10_000).await;
    let receipt = f.ledger.claim(f.claim_args(0, 10)).await.unwrap();
    assert_eq!(quote.cost, receipt.cost);
    assert_eq!(quote.marginal_price, 109);
}
