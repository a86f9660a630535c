use thiserror::Error;

/// Reference prime modulus used when none is configured.
pub const DEFAULT_PRIME: u64 = 1_000_000_007;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArithmeticError {
    #[error("modulus must be at least 2, got {0}")]
    InvalidModulus(u64),
    #[error("no inverse exists for {value} modulo {modulus}")]
    NoInverse { value: u64, modulus: u64 },
    #[error(
        "zero denominator: x-coordinate {x} coincides with another x-coordinate modulo the field modulus"
    )]
    ZeroDenominator { x: u64 },
    #[error("value is too large to be represented as a finite float")]
    NonFinite,
    #[error("at least one point is required to interpolate")]
    NoPoints,
}

/// Arithmetic over the ring Z/PZ.
///
/// The modulus is expected to be prime. A composite modulus is accepted, in which
/// case `inv` fails for every value sharing a factor with it.
///
/// Every operation reduces its inputs first and its output last, so results are
/// always in `[0, modulus)` whatever the caller passes in. Products go through
/// `u128`, which keeps them exact for any `u64` modulus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimeField {
    modulus: u64,
}

impl Default for PrimeField {
    fn default() -> Self {
        Self {
            modulus: DEFAULT_PRIME,
        }
    }
}

impl PrimeField {
    pub fn new(modulus: u64) -> Result<Self, ArithmeticError> {
        if modulus < 2 {
            return Err(ArithmeticError::InvalidModulus(modulus));
        }
        Ok(Self { modulus })
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn reduce(&self, a: u64) -> u64 {
        a % self.modulus
    }

    /// Brings a possibly negative value into `[0, modulus)`.
    pub fn reduce_signed(&self, a: i128) -> u64 {
        let n_as_i128: i128 = self.modulus.into();
        if a > 0 {
            if a < n_as_i128 {
                return a as u64;
            }
            return (a % n_as_i128) as u64;
        }

        if a == 0 {
            return 0;
        }

        a.rem_euclid(n_as_i128) as u64
    }

    pub fn add(&self, a: u64, b: u64) -> u64 {
        let sum = self.reduce(a) as u128 + self.reduce(b) as u128;
        (sum % self.modulus as u128) as u64
    }

    /// `a - b`, lifted by the modulus before reduction so it never goes negative.
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        let lifted = self.reduce(a) as u128 + self.modulus as u128 - self.reduce(b) as u128;
        (lifted % self.modulus as u128) as u64
    }

    pub fn neg(&self, a: u64) -> u64 {
        self.sub(0, a)
    }

    pub fn mul(&self, a: u64, b: u64) -> u64 {
        let product = self.reduce(a) as u128 * self.reduce(b) as u128;
        (product % self.modulus as u128) as u64
    }

    /// Modular exponentiation by repeated squaring.
    pub fn pow(&self, base: u64, exponent: u64) -> u64 {
        let mut result = self.reduce(1);
        let mut base = self.reduce(base);
        let mut exponent = exponent;
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            exponent >>= 1;
        }
        result
    }

    /// Computes a^(-1) (mod modulus) using the Extended Euclidean Algorithm.
    /// Fails when gcd(a, modulus) != 1, which for a prime modulus only happens for a ≡ 0.
    pub fn inv(&self, a: u64) -> Result<u64, ArithmeticError> {
        let a = self.reduce(a);
        let no_inverse = ArithmeticError::NoInverse {
            value: a,
            modulus: self.modulus,
        };
        if a == 0 {
            return Err(no_inverse);
        }
        if a == 1 {
            return Ok(1);
        }

        let (mut new_r, mut r) = ((a as i128), (self.modulus as i128));
        let (mut new_t, mut t) = (1_i128, 0_i128);

        while new_r != 0 {
            let q = r / new_r;
            (new_r, r) = (r - q * new_r, new_r);
            (new_t, t) = (t - q * new_t, new_t);
        }

        if r != 1 {
            return Err(no_inverse);
        }

        Ok(self.reduce_signed(t))
    }
}
