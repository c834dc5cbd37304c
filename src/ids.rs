use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const GAME_ID_LEN: usize = 8;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of `game_id` values: 8 lowercase ASCII alphanumerics each.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random identifiers. Uniqueness is probabilistic and never checked.
pub struct RandomIds {
    rng: StdRng,
}

impl RandomIds {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        (0..GAME_ID_LEN)
            .map(|_| ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}

/// Deterministic ids (`00000000`, `00000001`, ...) for golden comparisons.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u32,
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{:08x}", self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
