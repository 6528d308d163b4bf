#![allow(dead_code)]

use vamp_engine::{
    AllocationProof, Attestation, AttestationSigner, Authorization, AuthorizationSettings,
    ClaimArgs, EngineConfig, InitializeArgs, Pubkey, TokenMapping, TokenMappingSet, VampLedger,
    VampState, VampingParams,
};

pub const SOLVER_KEY: &str = "0x4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d";
pub const VALIDATOR_KEY: &str = "0x6cbed15c793ce57650b9877cf6fa156fbef513c4e6134f022a85b1ffdd59b2a1";
pub const TOKEN_OWNER_KEY: &str = "0x6370fd033278c143179d81c5526140625662b8daa446c22ee2d73db3707e620c";

pub const HOLDER_KEYS: [&str; 3] = [
    "0x646f1ce2fdad0e6deeeb5c7e8e5543bdde65e86029e2fd9fc169899c440a7913",
    "0xadd53f9a7e588d003326d1cbf9e4a43c061aadd9bc938c843a79e7b4fd2ad743",
    "0x395df67f0c2d2d9fe1ad08d1bc8b6627011959b79c53d7dd6a3536a33ab8a4fd",
];
pub const HOLDER_ALLOCATIONS: [u64; 3] = [10, 20, 30];
pub const MINTED_SUPPLY: u64 = 100;
pub const INTENT_ID: [u8; 32] = [0x5a; 32];

pub fn authority() -> Pubkey {
    Pubkey::new_from_array([0x0a; 32])
}

pub fn claimant(index: u8) -> Pubkey {
    Pubkey::new_from_array([0xc0 + index; 32])
}

/// base 100, slope 1, linear, no ceiling
pub fn linear_curve() -> VampingParams {
    VampingParams {
        paid_claiming_enabled: true,
        use_bonding_curve: true,
        curve_slope: 1,
        base_price: 100,
        max_price: None,
        flat_price_per_token: 0,
        curve_exponent: 1,
    }
}

pub struct Fixture {
    pub ledger: VampLedger,
    pub solver: AttestationSigner,
    pub validator: AttestationSigner,
    pub holders: Vec<AttestationSigner>,
    pub table: Vec<TokenMapping>,
    pub vamp_state: VampState,
}

pub fn signer(key: &str) -> AttestationSigner {
    AttestationSigner::from_hex(key).unwrap()
}

pub fn allocation_table() -> Vec<TokenMapping> {
    HOLDER_KEYS
        .iter()
        .zip(HOLDER_ALLOCATIONS)
        .map(|(key, token_amount)| TokenMapping {
            eth_address: signer(key).address(),
            token_amount,
            decimals: 9,
        })
        .collect()
}

pub fn descriptor(table: Vec<TokenMapping>) -> TokenMappingSet {
    TokenMappingSet {
        intent_id: INTENT_ID.to_vec(),
        token_name: "Vamping Token".to_string(),
        token_symbol: "VAMP".to_string(),
        token_uri: Some("https://example.com/token/1".to_string()),
        token_erc20_address: vec![0xb6; 20],
        amount: MINTED_SUPPLY,
        decimals: 9,
        chain_id: 1,
        salt: 0,
        solver_public_key: signer(SOLVER_KEY).address().to_vec(),
        validator_public_key: signer(VALIDATOR_KEY).address().to_vec(),
        owner_public_key: vec![],
        authorization: Authorization::Inline(table),
        vamping_params: None,
    }
}

pub struct Setup {
    pub config: EngineConfig,
    pub descriptor: TokenMappingSet,
    pub vamping_params: Option<VampingParams>,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            descriptor: descriptor(allocation_table()),
            vamping_params: Some(linear_curve()),
        }
    }
}

impl Setup {
    pub fn with_settings(mut self, settings: AuthorizationSettings) -> Self {
        self.config.authorization = settings;
        self
    }

    pub async fn build(self) -> Fixture {
        let ledger = VampLedger::new(&self.config);
        let vamp_state = ledger
            .initialize(
                authority(),
                InitializeArgs {
                    vamp_identifier: None,
                    vamping_data: self.descriptor.encode(),
                    vamping_params: self.vamping_params,
                },
            )
            .await
            .unwrap();
        Fixture {
            ledger,
            solver: signer(SOLVER_KEY),
            validator: signer(VALIDATOR_KEY),
            holders: HOLDER_KEYS.iter().map(|key| signer(key)).collect(),
            table: allocation_table(),
            vamp_state,
        }
    }
}

pub async fn setup() -> Fixture {
    Setup::default().build().await
}

impl Fixture {
    pub fn mint(&self) -> Pubkey {
        self.vamp_state.mint
    }

    pub fn holder_address(&self, holder: usize) -> [u8; 20] {
        self.holders[holder].address()
    }

    pub fn attest(&self, holder: usize, amount: u64) -> Attestation {
        let eth_address = self.holder_address(holder);
        Attestation::new(
            self.solver.attest_balance(&eth_address, amount, &INTENT_ID),
            self.validator.attest_balance(&eth_address, amount, &INTENT_ID),
            self.holders[holder].attest_balance(&eth_address, amount, &INTENT_ID),
        )
    }

    pub fn claim_args(&self, holder: usize, amount: u64) -> ClaimArgs {
        ClaimArgs {
            mint: self.mint(),
            claimant: claimant(holder as u8),
            eth_address: self.holder_address(holder),
            balance: amount,
            attestation: self.attest(holder, amount),
            proof: None,
        }
    }

    pub fn merkle_claim_args(&self, holder: usize, amount: u64) -> ClaimArgs {
        let mut args = self.claim_args(holder, amount);
        args.proof = AllocationProof::from_table(&self.table, &args.eth_address);
        args
    }

    pub async fn fund(&self, holder: usize, lamports: u64) {
        self.ledger
            .deposit_lamports(claimant(holder as u8), lamports)
            .await
            .unwrap();
    }

    /// `(claimant lamports, sol vault lamports, claimant tokens, vault tokens)`
    pub async fn balances(&self, holder: usize) -> (u64, u64, u64, u64) {
        let claimant = claimant(holder as u8);
        (
            self.ledger.lamports(&claimant).await,
            self.ledger.lamports(&self.vamp_state.sol_vault).await,
            self.ledger.token_balance(&self.mint(), &claimant).await,
            self.ledger
                .token_balance(&self.mint(), &self.vamp_state.vault)
                .await,
        )
    }
}
