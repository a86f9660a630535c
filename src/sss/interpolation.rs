//! Lagrange interpolation evaluated at x = 0.
//!
//! For the selected points (x_i, y_i) the secret is
//!
//! ```text
//! f(0) = Σ_i y_i · Π_{j≠i} (0 − x_j) / (x_i − x_j)
//! ```
//!
//! The modular variant is exact: it returns f(0) mod P, which is the secret itself
//! only when the secret is smaller than P. The floating point variant is a best effort
//! approximation whose rounding error grows with the number of points.

use super::{
    Point, Rounding,
    field::{ArithmeticError, PrimeField},
};

/// Intermediate values of one Lagrange term, kept for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermTrace {
    pub x: u64,
    pub y: u64,
    /// Π_{j≠i} (0 − x_j)
    pub numerator: u64,
    /// Π_{j≠i} (x_i − x_j)
    pub denominator: u64,
    pub inverse: u64,
    pub term: u64,
    pub running_total: u64,
}

pub fn interpolate_at_zero(
    field: &PrimeField,
    points: &[Point<u64>],
) -> Result<u64, ArithmeticError> {
    interpolate_at_zero_traced(field, points).map(|(secret, _)| secret)
}

/// Same as [`interpolate_at_zero`], also returning one [`TermTrace`] per point.
pub fn interpolate_at_zero_traced(
    field: &PrimeField,
    points: &[Point<u64>],
) -> Result<(u64, Vec<TermTrace>), ArithmeticError> {
    if points.is_empty() {
        return Err(ArithmeticError::NoPoints);
    }
    if let [point] = points {
        let y = field.reduce(point.y);
        let trace = TermTrace {
            x: point.x,
            y,
            numerator: 1,
            denominator: 1,
            inverse: 1,
            term: y,
            running_total: y,
        };
        return Ok((y, vec![trace]));
    }

    let mut result = 0;
    let mut trace = Vec::with_capacity(points.len());
    for (i, point_i) in points.iter().enumerate() {
        let mut numerator = 1;
        let mut denominator = 1;
        for (j, point_j) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let diff = field.sub(point_i.x, point_j.x);
            if diff == 0 {
                return Err(ArithmeticError::ZeroDenominator { x: point_i.x });
            }
            numerator = field.mul(numerator, field.neg(point_j.x));
            denominator = field.mul(denominator, diff);
        }

        let inverse = field.inv(denominator)?;
        let term = field.mul(point_i.y, field.mul(numerator, inverse));
        result = field.add(result, term);

        trace.push(TermTrace {
            x: point_i.x,
            y: field.reduce(point_i.y),
            numerator,
            denominator,
            inverse,
            term,
            running_total: result,
        });
    }

    Ok((result, trace))
}

/// Floating point variant of [`interpolate_at_zero`].
///
/// With [`Rounding::Nearest`] the result is rounded to the nearest integer, which is
/// only meaningful when the secret is known to be an integer.
pub fn interpolate_at_zero_float(
    points: &[Point<f64>],
    rounding: Rounding,
) -> Result<f64, ArithmeticError> {
    let result = match points {
        [] => return Err(ArithmeticError::NoPoints),
        [point] => point.y,
        _ => {
            let mut result = 0.0;
            for (i, point_i) in points.iter().enumerate() {
                let mut basis = 1.0;
                let x_i = point_i.x as f64;
                for (j, point_j) in points.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let x_j = point_j.x as f64;
                    let denominator = x_i - x_j;
                    if denominator == 0.0 {
                        return Err(ArithmeticError::ZeroDenominator { x: point_i.x });
                    }
                    basis *= (0.0 - x_j) / denominator;
                }
                result += point_i.y * basis;
            }
            result
        }
    };

    if !result.is_finite() {
        return Err(ArithmeticError::NonFinite);
    }
    let result = match rounding {
        Rounding::Nearest => result.round(),
        Rounding::None => result,
    };
    // -0.0 compares equal to 0.0 but prints as "-0"
    Ok(if result == 0.0 { 0.0 } else { result })
}
