pub mod vamp_fun {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TokenMappingProto {
        #[prost(bytes = "vec", repeated, tag = "1")]
        pub addresses: Vec<Vec<u8>>,
        #[prost(uint64, repeated, tag = "2")]
        pub amounts: Vec<u64>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct VampingParamsProto {
        #[prost(bool, tag = "1")]
        pub paid_claiming_enabled: bool,
        #[prost(bool, tag = "2")]
        pub use_bonding_curve: bool,
        #[prost(uint64, tag = "3")]
        pub curve_slope: u64,
        #[prost(uint64, tag = "4")]
        pub base_price: u64,
        #[prost(uint64, optional, tag = "5")]
        pub max_price: Option<u64>,
        #[prost(uint64, tag = "6")]
        pub flat_price_per_token: u64,
        #[prost(uint32, optional, tag = "7")]
        pub curve_exponent: Option<u32>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TokenVampingInfoProto {
        #[prost(bytes = "vec", tag = "1")]
        pub intent_id: Vec<u8>,
        #[prost(string, tag = "2")]
        pub token_name: String,
        #[prost(string, tag = "3")]
        pub token_symbol: String,
        #[prost(bytes = "vec", tag = "4")]
        pub token_erc20_address: Vec<u8>,
        #[prost(string, optional, tag = "5")]
        pub token_uri: Option<String>,
        #[prost(uint64, tag = "6")]
        pub amount: u64,
        #[prost(uint32, tag = "7")]
        pub decimal: u32,
        #[prost(message, optional, tag = "8")]
        pub token_mapping: Option<TokenMappingProto>,
        #[prost(uint64, tag = "9")]
        pub chain_id: u64,
        #[prost(uint64, tag = "10")]
        pub salt: u64,
        #[prost(bytes = "vec", tag = "11")]
        pub solver_public_key: Vec<u8>,
        #[prost(bytes = "vec", tag = "12")]
        pub validator_public_key: Vec<u8>,
        #[prost(bytes = "vec", tag = "13")]
        pub merkle_root: Vec<u8>,
        #[prost(message, optional, tag = "14")]
        pub vamping_params: Option<VampingParamsProto>,
        #[prost(bytes = "vec", tag = "15")]
        pub owner_public_key: Vec<u8>,
    }
}

/// Descriptor produced by the deployed front end for the integration suite.
#[cfg(test)]
pub(crate) const GENERIC_SOLUTION: &[u8] = &[
    10, 32, 90, 160, 56, 251, 44, 118, 170, 168, 64, 47, 17, 121, 171, 204, 191, 209, 4, 159,
    217, 18, 75, 33, 146, 241, 243, 172, 228, 148, 215, 40, 55, 212, 18, 13, 86, 97, 109, 112,
    105, 110, 103, 32, 84, 111, 107, 101, 110, 26, 4, 86, 65, 77, 80, 34, 20, 182, 154, 101,
    107, 43, 232, 170, 11, 56, 89, 178, 78, 237, 60, 34, 219, 32, 110, 233, 102, 42, 27, 104,
    116, 116, 112, 115, 58, 47, 47, 101, 120, 97, 109, 112, 108, 101, 46, 99, 111, 109, 47,
    116, 111, 107, 101, 110, 47, 49, 48, 128, 172, 199, 240, 55, 56, 9, 66, 137, 1, 10, 20,
    195, 145, 61, 77, 139, 171, 73, 20, 50, 134, 81, 194, 234, 232, 23, 200, 183, 142, 31, 76,
    10, 20, 101, 208, 138, 5, 108, 23, 174, 19, 55, 5, 101, 176, 76, 247, 125, 42, 250, 28, 185,
    250, 10, 20, 89, 24, 178, 230, 71, 70, 77, 71, 67, 96, 26, 134, 87, 83, 230, 76, 128, 89,
    220, 79, 10, 20, 245, 80, 76, 226, 188, 197, 38, 20, 241, 33, 175, 249, 185, 59, 32, 1, 217,
    39, 21, 202, 10, 20, 253, 206, 66, 17, 111, 84, 31, 200, 247, 176, 119, 110, 43, 48, 131,
    43, 213, 98, 28, 133, 18, 25, 128, 148, 235, 220, 3, 128, 168, 214, 185, 7, 128, 188, 193,
    150, 11, 128, 208, 172, 243, 14, 128, 228, 151, 208, 18,
];
