//! Reconstruction of a Shamir shared secret from encoded shares.
//!
//! Shares are decoded into points, the first `k` points by ascending x are selected,
//! and the secret is obtained by Lagrange interpolation at x = 0.
//!
//! Two numeric policies are available, never mixed within one reconstruction:
//! - [`Mode::Modular`]: exact arithmetic in Z/PZ. The result is the secret when it is
//!   smaller than P, otherwise only its residue modulo P.
//! - [`Mode::Float`]: numerals are decoded with arbitrary precision and interpolated in
//!   `f64`. Rounding error grows with `k` and with the magnitude of the values.

use std::{fmt, str::FromStr};

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use thiserror::Error;

use crate::input::{InputError, ShareFile};

pub mod field;
pub mod interpolation;
pub mod numeral;
pub mod polynomial;
pub mod selection;

use field::{ArithmeticError, PrimeField};
use interpolation::TermTrace;
use numeral::DecodeError;
use polynomial::Polynomial;
use selection::{Selection, SelectionError};

/// One encoded sample of the secret-bearing polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    /// x-coordinate, unique per share.
    pub index: u64,
    pub base: u32,
    pub numeral: String,
}

impl Share {
    pub fn new(index: u64, base: u32, numeral: impl Into<String>) -> Self {
        Self {
            index,
            base,
            numeral: numeral.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point<Y> {
    pub x: u64,
    pub y: Y,
}

impl<Y> Point<Y> {
    pub fn new(x: u64, y: Y) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Modular,
    Float,
}

#[derive(Debug, Error)]
#[error("unknown reconstruction mode {0:?}, expected `modular` or `float`")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modular" => Ok(Self::Modular),
            "float" => Ok(Self::Float),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Rounding applied to a floating point secret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    /// Round to the nearest integer, for secrets known to be integers.
    #[default]
    Nearest,
    /// Keep the raw approximation.
    None,
}

#[derive(Debug, Error)]
#[error("unknown rounding {0:?}, expected `nearest` or `none`")]
pub struct ParseRoundingError(String);

impl FromStr for Rounding {
    type Err = ParseRoundingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "none" => Ok(Self::None),
            _ => Err(ParseRoundingError(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Secret {
    /// Value in `[0, P)`.
    Exact(u64),
    Approximate(f64),
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::Approximate(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconstructionSettings {
    pub field: PrimeField,
    pub mode: Mode,
    pub rounding: Rounding,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DroppedShare {
    pub index: u64,
    pub error: DecodeError,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reconstruction {
    pub secret: Secret,
    /// x-coordinates of the points used, ascending.
    pub selected: Vec<u64>,
    /// Shares that could not be decoded.
    pub dropped_shares: Vec<DroppedShare>,
    /// Indices of unselected shares that do not lie on the interpolated polynomial.
    /// Only computed in modular mode.
    pub inconsistent_shares: Vec<u64>,
    /// Only filled in modular mode.
    pub trace: Vec<TermTrace>,
}

#[derive(Debug, Error)]
pub enum ReconstructionError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Reconstructs the secret from `shares` using `k` of them.
///
/// Shares failing to decode are dropped and reported; the reconstruction fails only
/// when fewer than `k` points remain or when the interpolation is undefined.
pub fn reconstruct(
    shares: &[Share],
    k: usize,
    settings: &ReconstructionSettings,
) -> Result<Reconstruction, ReconstructionError> {
    match settings.mode {
        Mode::Modular => reconstruct_modular(shares, k, &settings.field),
        Mode::Float => reconstruct_float(shares, k, settings.rounding),
    }
}

/// Reconstructs the secret from a loaded share file, using its own threshold.
pub fn reconstruct_share_file(
    file: &ShareFile,
    settings: &ReconstructionSettings,
) -> Result<Reconstruction, ReconstructionError> {
    reconstruct(&file.shares, file.k, settings)
}

fn reconstruct_modular(
    shares: &[Share],
    k: usize,
    field: &PrimeField,
) -> Result<Reconstruction, ReconstructionError> {
    let (points, dropped_shares) =
        decode_shares(shares, |s| numeral::decode_modular(&s.numeral, s.base, field));

    let Selection { selected, unused } = selection::select(points, k)?;
    tracing::debug!(
        "Selected points {:?} modulo {}",
        selected
            .iter()
            .map(|p| (p.x, p.y))
            .collect::<Vec<(u64, u64)>>(),
        field.modulus()
    );

    let (secret, trace) = interpolation::interpolate_at_zero_traced(field, &selected)?;
    for t in &trace {
        tracing::debug!(
            x = t.x,
            y = t.y,
            numerator = t.numerator,
            denominator = t.denominator,
            inverse = t.inverse,
            term = t.term,
            running_total = t.running_total,
            "Lagrange term"
        );
    }

    let inconsistent_shares = if unused.is_empty() {
        vec![]
    } else {
        let polynomial = Polynomial::interpolate(&selected, field)?;
        unused
            .iter()
            .filter(|p| polynomial.evaluate(p.x, field) != p.y)
            .map(|p| p.x)
            .collect()
    };
    for index in &inconsistent_shares {
        tracing::warn!("Share {index} does not lie on the reconstructed polynomial");
    }

    Ok(Reconstruction {
        secret: Secret::Exact(secret),
        selected: selected.iter().map(|p| p.x).collect(),
        dropped_shares,
        inconsistent_shares,
        trace,
    })
}

fn reconstruct_float(
    shares: &[Share],
    k: usize,
    rounding: Rounding,
) -> Result<Reconstruction, ReconstructionError> {
    let (points, dropped_shares) = decode_shares(shares, |s| numeral::decode(&s.numeral, s.base));

    let Selection { selected, .. } = selection::select(points, k)?;
    let selected = selected
        .into_iter()
        .map(|p| to_float_point(p).ok_or(ArithmeticError::NonFinite))
        .collect::<Result<Vec<Point<f64>>, ArithmeticError>>()?;
    tracing::debug!(
        "Selected points {:?}",
        selected
            .iter()
            .map(|p| (p.x, p.y))
            .collect::<Vec<(u64, f64)>>()
    );

    let secret = interpolation::interpolate_at_zero_float(&selected, rounding)?;

    Ok(Reconstruction {
        secret: Secret::Approximate(secret),
        selected: selected.iter().map(|p| p.x).collect(),
        dropped_shares,
        inconsistent_shares: vec![],
        trace: vec![],
    })
}

fn to_float_point(point: Point<BigUint>) -> Option<Point<f64>> {
    let y = point.y.to_f64().filter(|y| y.is_finite())?;
    Some(Point::new(point.x, y))
}

fn decode_shares<Y, F>(shares: &[Share], decode: F) -> (Vec<Point<Y>>, Vec<DroppedShare>)
where
    F: Fn(&Share) -> Result<Y, DecodeError>,
{
    let mut points = Vec::with_capacity(shares.len());
    let mut dropped = Vec::new();
    for share in shares {
        match decode(share) {
            Ok(y) => points.push(Point::new(share.index, y)),
            Err(error) => {
                tracing::warn!(
                    "Dropping share {} (base {}, value {:?}): {}",
                    share.index,
                    share.base,
                    share.numeral,
                    error
                );
                dropped.push(DroppedShare {
                    index: share.index,
                    error,
                });
            }
        }
    }
    (points, dropped)
}
