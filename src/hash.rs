use sha2::{Digest, Sha256};

/// Length in hex characters of every digest produced here.
pub const DIGEST_HEX_LEN: usize = 64;

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of `data`, lowercase hex encoded.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
