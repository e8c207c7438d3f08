use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Extension over any [RngCore] for the coin flips evolution makes
pub trait Happens: RngCore {
    /// true with probability `chance`. A chance of 0 never happens, a chance of 1 always does
    fn happens(&mut self, chance: f64) -> bool;

    /// uniform value within [-1, 1]
    fn clamped(&mut self) -> f64;
}

impl<R: RngCore> Happens for R {
    #[inline]
    fn happens(&mut self, chance: f64) -> bool {
        self.random::<f64>() < chance
    }

    #[inline]
    fn clamped(&mut self) -> f64 {
        self.random_range(-1. ..=1.)
    }
}

/// Small and fast wyrand generator. Its whole state is one word, so it is cheap to persist
/// alongside a training run and resume deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for WyRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::seeded(state)
    }
}

/// A [WyRng] seeded from the thread-local generator, for runs that need not be reproducible
pub fn default_rng() -> WyRng {
    WyRng::seeded(rand::rng().next_u64())
}
