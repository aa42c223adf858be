//! Data model for movie checkouts and the blocks that anchor them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// One movie checkout event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieCheckout {
    #[serde(alias = "MovieID", alias = "movieID", alias = "movieId")]
    pub movie_id: String,
    #[serde(alias = "User")]
    pub user: String,
    #[serde(alias = "CheckoutDate", alias = "checkoutDate")]
    pub checkout_date: String,
    #[serde(alias = "IsGenesis", alias = "isGenesis")]
    pub is_genesis: bool,
}

impl MovieCheckout {
    pub fn new(
        movie_id: impl Into<String>,
        user: impl Into<String>,
        checkout_date: impl Into<String>,
    ) -> Self {
        Self {
            movie_id: movie_id.into(),
            user: user.into(),
            checkout_date: checkout_date.into(),
            is_genesis: false,
        }
    }

    /// Sentinel payload carried by the genesis block.
    pub fn genesis() -> Self {
        Self {
            is_genesis: true,
            ..Self::default()
        }
    }
}

/// A movie catalogue record, as accepted by `POST /new`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub director: String,
    pub release_date: String,
}

impl Movie {
    /// Content-derived identifier: MD5 hex of `id || release_date`.
    pub fn derived_id(&self) -> String {
        let mut hasher = md5::Md5::new();
        hasher.update(self.id.as_bytes());
        hasher.update(self.release_date.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 0 for genesis, then +1 per block.
    pub pos: u64,
    pub data: MovieCheckout,
    /// RFC3339 timestamp string.
    pub timestamp: String,
    /// SHA-256 hex over (pos, timestamp, data, prev_hash).
    pub hash: String,
    /// Hash of the predecessor (empty for genesis).
    pub prev_hash: String,
}

impl Block {
    /// The chain's first block. Has no predecessor, so `prev_hash` stays empty.
    pub fn genesis() -> Self {
        Self::seal(0, MovieCheckout::genesis(), now_rfc3339(), String::new())
    }

    /// Derive the block that follows `tail`, stamped with the current time.
    pub fn next(tail: &Block, data: MovieCheckout) -> Self {
        Self::next_at(tail, data, now_rfc3339())
    }

    /// Like [`Block::next`] but with a caller-chosen timestamp.
    pub fn next_at(tail: &Block, data: MovieCheckout, timestamp: impl Into<String>) -> Self {
        Self::seal(tail.pos + 1, data, timestamp.into(), tail.hash.clone())
    }

    fn seal(pos: u64, data: MovieCheckout, timestamp: String, prev_hash: String) -> Self {
        let mut block = Self {
            pos,
            data,
            timestamp,
            hash: String::new(),
            prev_hash,
        };
        block.hash = compute_block_hash(&block);
        block
    }

    pub fn is_genesis(&self) -> bool {
        self.pos == 0 && self.prev_hash.is_empty()
    }
}

/// Hash inputs (concatenate as bytes, SHA-256) and return lowercase hex.
pub fn hash_concat(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for p in parts {
        hasher.update(p);
    }
    hex::encode(hasher.finalize())
}

/// Compute a block hash from its fields.
/// Order: decimal pos, timestamp, compact JSON of data, prev_hash.
pub fn compute_block_hash(b: &Block) -> String {
    // Plain strings and a bool; serde_json has nothing to reject here.
    let data = serde_json::to_vec(&b.data).unwrap_or_default();
    hash_concat(&[
        b.pos.to_string().as_bytes(),
        b.timestamp.as_bytes(),
        &data,
        b.prev_hash.as_bytes(),
    ])
}

/// Current UTC time as RFC3339, falling back to unix seconds.
pub fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}
