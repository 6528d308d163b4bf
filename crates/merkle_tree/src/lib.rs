//! Keccak merkle tree over vamping allocations.
//! Leaf amounts are little-endian, so roots differ from trees built with big-endian leaves.

use balance_util::{encode_amount, keccak256};

pub type Hash = [u8; 32];

/// Allocation leaf (account, amount, decimals)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    pub account: [u8; 20],
    pub amount: u64,
    pub decimals: u8,
}

impl Leaf {
    pub fn hash(&self) -> Hash {
        let mut data = Vec::with_capacity(20 + 8 + 1);
        data.extend_from_slice(&self.account);
        data.extend_from_slice(&encode_amount(self.amount));
        data.push(self.decimals);
        keccak256(&data)
    }
}

fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut combined = [0u8; 64];
    combined[..32].copy_from_slice(left);
    combined[32..].copy_from_slice(right);
    keccak256(&combined)
}

#[derive(Clone, Debug)]
pub struct MerkleTree {
    pub root: Hash,
    pub levels: Vec<Vec<Hash>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// An empty tree has an all-zero root.
    pub fn new(leaves: &[Leaf]) -> Self {
        let hashes: Vec<Hash> = leaves.iter().map(Leaf::hash).collect();
        Self::from_leaf_hashes(hashes)
    }

    pub fn from_leaf_hashes(mut current_level: Vec<Hash>) -> Self {
        let leaf_count = current_level.len();
        let Some(&last) = current_level.last() else {
            let root = [0u8; 32];
            return Self {
                root,
                levels: vec![vec![root]],
                leaf_count,
            };
        };

        // Pad with the last leaf up to the next power of two
        current_level.resize(leaf_count.next_power_of_two(), last);

        let mut levels = vec![current_level.clone()];
        while current_level.len() > 1 {
            current_level = current_level
                .chunks(2)
                .map(|pair| hash_pair(&pair[0], &pair[1]))
                .collect();
            levels.push(current_level.clone());
        }

        Self {
            root: current_level[0],
            levels,
            leaf_count,
        }
    }

    /// Sibling path for the leaf at `index`, bottom to top.
    pub fn generate_proof(&self, mut index: usize) -> Option<Vec<Hash>> {
        if index >= self.leaf_count {
            return None;
        }
        let mut proof = Vec::with_capacity(self.levels.len() - 1);
        for level in &self.levels[..self.levels.len() - 1] {
            proof.push(level[index ^ 1]);
            index /= 2;
        }
        Some(proof)
    }

    pub fn levels(&self) -> usize {
        self.levels.len()
    }
}

pub fn verify_merkle_proof(leaf_hash: Hash, proof: &[Hash], root: Hash, mut index: usize) -> bool {
    let mut computed_hash = leaf_hash;
    for sibling in proof {
        computed_hash = if index % 2 == 0 {
            hash_pair(&computed_hash, sibling)
        } else {
            hash_pair(sibling, &computed_hash)
        };
        index /= 2;
    }
    // Leftover index bits mean the proof is shorter than the claimed position.
    index == 0 && computed_hash == root
}
