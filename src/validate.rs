//! Acceptance checks for candidate blocks and whole-chain audits.

use thiserror::Error;

use crate::model::{compute_block_hash, Block};

/// Why a candidate block was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("prev_hash mismatch: expected {expected}, found {found}")]
    Linkage { expected: String, found: String },

    #[error("hash mismatch: declared {declared}, derived {derived}")]
    Integrity { declared: String, derived: String },

    #[error("position mismatch: expected {expected}, found {found}")]
    Position { expected: u64, found: u64 },
}

/// Candidate must point at the tail's hash.
pub fn check_linkage(candidate: &Block, tail: &Block) -> Result<(), Rejection> {
    if candidate.prev_hash != tail.hash {
        return Err(Rejection::Linkage {
            expected: tail.hash.clone(),
            found: candidate.prev_hash.clone(),
        });
    }
    Ok(())
}

/// Stored hash must equal the hash re-derived from the stored fields.
pub fn check_integrity(candidate: &Block) -> Result<(), Rejection> {
    let derived = compute_block_hash(candidate);
    if derived != candidate.hash {
        return Err(Rejection::Integrity {
            declared: candidate.hash.clone(),
            derived,
        });
    }
    Ok(())
}

pub fn check_position(candidate: &Block, tail: &Block) -> Result<(), Rejection> {
    let expected = tail.pos + 1;
    if candidate.pos != expected {
        return Err(Rejection::Position {
            expected,
            found: candidate.pos,
        });
    }
    Ok(())
}

/// Run linkage, integrity and position checks in that order.
pub fn validate_block(candidate: &Block, tail: &Block) -> Result<(), Rejection> {
    check_linkage(candidate, tail)?;
    check_integrity(candidate)?;
    check_position(candidate, tail)
}

/// Verify a full sequence from genesis; returns one message per fault.
pub fn audit_chain(blocks: &[Block]) -> Vec<String> {
    let mut errors = vec![];

    let Some(genesis) = blocks.first() else {
        errors.push("chain has no genesis block".to_string());
        return errors;
    };
    if genesis.pos != 0 {
        errors.push(format!("genesis position should be 0, found {}", genesis.pos));
    }
    if !genesis.prev_hash.is_empty() {
        errors.push("genesis prev_hash should be empty".to_string());
    }
    if let Err(e) = check_integrity(genesis) {
        errors.push(format!("block {}: {e}", genesis.pos));
    }

    for pair in blocks.windows(2) {
        let (prev, b) = (&pair[0], &pair[1]);
        if let Err(e) = validate_block(b, prev) {
            errors.push(format!("block {}: {e}", b.pos));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MovieCheckout;

    fn chain_of(n: usize) -> Vec<Block> {
        let mut blocks = vec![Block::genesis()];
        for i in 0..n {
            let tail = blocks.last().unwrap();
            let next = Block::next(tail, MovieCheckout::new(format!("m{i}"), "u", "2023-01-01"));
            blocks.push(next);
        }
        blocks
    }

    #[test]
    fn accepts_freshly_built_successor() {
        let g = Block::genesis();
        let c = Block::next(&g, MovieCheckout::new("m1", "u1", "2023-01-01"));
        assert_eq!(validate_block(&c, &g), Ok(()));
    }

    #[test]
    fn rejects_tampered_prev_hash() {
        let blocks = chain_of(1);
        let tail = &blocks[1];
        let mut c = Block::next(tail, MovieCheckout::new("m2", "u2", ""));
        c.prev_hash = "f".repeat(64);
        // keep integrity and position intact so only linkage fails
        c.hash = compute_block_hash(&c);

        assert!(check_integrity(&c).is_ok());
        assert!(check_position(&c, tail).is_ok());
        assert_eq!(
            validate_block(&c, tail),
            Err(Rejection::Linkage {
                expected: tail.hash.clone(),
                found: "f".repeat(64),
            })
        );
    }

    #[test]
    fn rejects_forged_hash() {
        let g = Block::genesis();
        let mut c = Block::next(&g, MovieCheckout::new("m1", "u1", "2023-01-01"));
        let derived = c.hash.clone();
        c.hash = "0".repeat(64);

        assert!(check_linkage(&c, &g).is_ok());
        assert!(check_position(&c, &g).is_ok());
        assert_eq!(
            validate_block(&c, &g),
            Err(Rejection::Integrity {
                declared: "0".repeat(64),
                derived,
            })
        );
    }

    #[test]
    fn rejects_payload_edited_after_sealing() {
        let g = Block::genesis();
        let mut c = Block::next(&g, MovieCheckout::new("m1", "u1", "2023-01-01"));
        c.data.user = "mallory".into();
        assert!(matches!(
            validate_block(&c, &g),
            Err(Rejection::Integrity { .. })
        ));
    }

    #[test]
    fn rejects_skipped_position() {
        let blocks = chain_of(2);
        let tail = &blocks[2];
        let mut c = Block::next(tail, MovieCheckout::default());
        c.pos = 4;
        c.hash = compute_block_hash(&c);

        assert_eq!(
            validate_block(&c, tail),
            Err(Rejection::Position {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn linkage_is_checked_first() {
        let g = Block::genesis();
        let mut c = Block::next(&g, MovieCheckout::default());
        c.prev_hash = "x".into();
        c.pos = 9;
        assert!(matches!(
            validate_block(&c, &g),
            Err(Rejection::Linkage { .. })
        ));
    }

    #[test]
    fn audit_passes_on_well_formed_chain() {
        assert!(audit_chain(&chain_of(5)).is_empty());
    }

    #[test]
    fn audit_reports_tampered_middle_block() {
        let mut blocks = chain_of(4);
        blocks[2].data.movie_id = "swapped".into();
        let errors = audit_chain(&blocks);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("block 2: hash mismatch"), "{errors:?}");
    }

    #[test]
    fn audit_reports_rehashed_block_as_broken_link() {
        let mut blocks = chain_of(3);
        blocks[1].data.movie_id = "swapped".into();
        blocks[1].hash = compute_block_hash(&blocks[1]);
        let errors = audit_chain(&blocks);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("block 2: prev_hash mismatch"), "{errors:?}");
    }

    #[test]
    fn audit_checks_genesis() {
        assert_eq!(audit_chain(&[]), vec!["chain has no genesis block"]);

        let mut blocks = chain_of(0);
        blocks[0].prev_hash = "abc".into();
        let errors = audit_chain(&blocks);
        assert!(errors.contains(&"genesis prev_hash should be empty".to_string()));
    }
}
