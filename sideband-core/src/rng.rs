//! Token generator for the host handshake
//!
//! Tokens only need to be unpredictable enough that the host driver
//! cannot collide with a stale value, so a small xorshift generator is
//! plenty. The firmware seeds it once at startup from its time source.

const FALLBACK_SEED: u32 = 0x4F6C_DD1D;

/// 32-bit xorshift generator for handshake tokens
pub struct TokenRng {
    state: u32,
}

impl TokenRng {
    /// Create a generator from `seed`
    ///
    /// Zero is a fixed point of xorshift, so a zero seed is replaced
    /// with a constant.
    pub const fn new(seed: u32) -> Self {
        let state = if seed == 0 { FALLBACK_SEED } else { seed };
        Self { state }
    }

    /// Produce the next token
    pub fn next_token(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
