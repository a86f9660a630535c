use super::{
    Point,
    field::{ArithmeticError, PrimeField},
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Polynomial {
    /// Coefficients in ascending order, i.e. [1, 2, 3] -> 1 + 2x + 3x^2
    coefficients: Vec<u64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<u64>) -> Self {
        let mut coefficients = coefficients;
        while let Some(c) = coefficients.last()
            && c == &0
        {
            coefficients.pop();
        }
        Self { coefficients }
    }

    #[cfg(test)]
    fn coefficients(&self) -> &[u64] {
        &self.coefficients
    }

    pub fn evaluate(&self, point: u64, field: &PrimeField) -> u64 {
        let mut power_of_x = field.reduce(1);
        let mut result = 0;
        for c in &self.coefficients {
            result = field.add(result, field.mul(power_of_x, *c));
            power_of_x = field.mul(power_of_x, point);
        }
        result
    }

    #[cfg(test)]
    fn evaluate_at_zero(&self) -> u64 {
        if self.coefficients.is_empty() {
            return 0;
        }
        self.coefficients[0]
    }

    /// Builds the unique polynomial of degree < `points.len()` going through every point.
    pub fn interpolate(points: &[Point<u64>], field: &PrimeField) -> Result<Self, ArithmeticError> {
        let roots = points.iter().map(|p| p.x).collect::<Vec<u64>>();
        let master_numerator = Self::interpolate_from_roots(&roots, field);

        let mut coefficients = vec![0; points.len()];

        for point in points {
            let (numerator, _) = master_numerator.div(
                &Self {
                    coefficients: vec![field.neg(point.x), 1],
                },
                field,
            )?;
            let weight = field.mul(point.y, field.inv(numerator.evaluate(point.x, field))?);
            for (i, c) in numerator.coefficients.into_iter().enumerate() {
                coefficients[i] = field.add(coefficients[i], field.mul(c, weight));
            }
        }

        Ok(Self::new(coefficients))
    }

    fn div(&self, other: &Self, field: &PrimeField) -> Result<(Self, Self), ArithmeticError> {
        let Some(&other_leading_coefficient) = other.coefficients.last() else {
            return Err(ArithmeticError::NoInverse {
                value: 0,
                modulus: field.modulus(),
            });
        };
        if other.coefficients.len() > self.coefficients.len() {
            return Ok((Self::new(vec![]), self.clone()));
        }

        let self_degree = self.coefficients.len() - 1;
        let other_degree = other.coefficients.len() - 1;
        let quotient_degree = self_degree - other_degree;

        let inv_leading_other_coefficient = field.inv(other_leading_coefficient)?;

        let mut remainder_coefficients = self.coefficients.clone();
        let mut quotient_coefficients = vec![0; 1 + quotient_degree];

        // We eliminate the leading coefficient of `remainder` until `remainder` has a degree lower than `other`, i.e. it makes `self_degree - other_degree + 1` iterations
        for i in 0..=quotient_degree {
            let leading_remainder_coefficient = remainder_coefficients[self_degree - i];
            let quotient_coefficient =
                field.mul(leading_remainder_coefficient, inv_leading_other_coefficient);

            remainder_coefficients.pop();

            if quotient_coefficient != 0 {
                quotient_coefficients[quotient_degree - i] = quotient_coefficient;
                // Subtract `quotient_coefficient * other * x^(quotient_degree - i)` from `remainder`
                // Last one is skipped as we already popped it
                for (j, &c) in other.coefficients.iter().enumerate().take(other_degree) {
                    let k = quotient_degree - i + j;
                    remainder_coefficients[k] = field.sub(
                        remainder_coefficients[k],
                        field.mul(c, quotient_coefficient),
                    );
                }
            }
        }

        Ok((
            Self::new(quotient_coefficients),
            Self::new(remainder_coefficients),
        ))
    }

    /// Expands Π (x - root) over the field.
    fn interpolate_from_roots(roots: &[u64], field: &PrimeField) -> Self {
        if roots.is_empty() {
            return Self {
                coefficients: vec![],
            };
        }

        let mut coefficients = Vec::with_capacity(roots.len() + 1);
        coefficients.push(1);
        for (i, &root) in roots.iter().enumerate() {
            // Leading coefficient is pushed one level higher
            coefficients.push(1);

            // Multiplying by (x - root) gives coeff[j] = coeff[j - 1] - root * coeff[j]
            // We iterate in reverse order and take care of the 0 case at the end
            for j in (1..=i).rev() {
                coefficients[j] =
                    field.sub(coefficients[j - 1], field.mul(coefficients[j], root));
            }
            coefficients[0] = field.mul(coefficients[0], field.neg(root));
        }
        Polynomial { coefficients }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sss::field::DEFAULT_PRIME;

    #[test]
    fn test_polynomial_evaluation() {
        let field = PrimeField::new(100).unwrap();
        let poly = Polynomial::new(vec![3, 2, 1]); // 3 + 2x + 1x^2
        assert_eq!(poly.evaluate(0, &field), 3);
        assert_eq!(poly.evaluate(1, &field), 6);
        assert_eq!(poly.evaluate(2, &field), 11);
        assert_eq!(poly.evaluate(3, &field), 18);
        assert_eq!(poly.evaluate_at_zero(), 3);
    }

    #[test]
    fn test_polynomial_evaluation_with_modulo() {
        let field = PrimeField::new(256).unwrap();
        let poly = Polynomial::new(vec![100, 200, 300]); // 100 + 200x + 300x^2
        assert_eq!(poly.evaluate(1, &field), (100 + 200 + 300) % 256);
        assert_eq!(poly.evaluate(2, &field), (100 + 400 + 1200) % 256);
    }

    #[test]
    fn test_trailing_zeros_dropped() {
        let poly = Polynomial::new(vec![4, 0, 0]);
        assert_eq!(poly.coefficients(), &[4]);
        assert_eq!(Polynomial::new(vec![0]).evaluate_at_zero(), 0);
    }

    #[test]
    fn test_interpolate_from_roots() {
        let field = PrimeField::default();
        let roots = (1..2000).collect::<Vec<u64>>();
        let poly = Polynomial::interpolate_from_roots(&roots, &field);
        for root in roots {
            assert_eq!(poly.evaluate(root, &field), 0);
        }
    }

    #[test]
    fn test_division() {
        let field = PrimeField::default();
        let p1 = Polynomial::new(vec![0, 0, 0, 1, 0, 0, 1]); // x^6 + x^3
        let p2 = Polynomial::new(vec![1, 0, 0, 1]); // x^3 + 1
        let (quotient, remainder) = p1.div(&p2, &field).unwrap();
        assert_eq!(quotient, Polynomial::new(vec![0, 0, 0, 1])); // x^3
        assert_eq!(remainder, Polynomial::new(vec![])); // 0

        let p1 = Polynomial::new(vec![1, 2, 0, 0, 0, 0, 1]); // x^6 + 2x + 1
        let p2 = Polynomial::new(vec![1, 0, 0, 1]); // x^3 + 1
        // x^6 + 2x + 1 = x^3 * (x^3 + 1) -x^3 + 2x + 1 = (x^3 - 1) * (x^3 + 1) + 2x + 2
        let (quotient, remainder) = p1.div(&p2, &field).unwrap();
        assert_eq!(quotient, Polynomial::new(vec![DEFAULT_PRIME - 1, 0, 0, 1])); // x^3 - 1
        assert_eq!(remainder, Polynomial::new(vec![2, 2])); // 2x + 2

        assert!(p1.div(&Polynomial::new(vec![]), &field).is_err());
    }

    #[test]
    fn test_interpolation_from_coordinates() {
        let field = PrimeField::default();
        let number_of_points: u64 = rand::random_range(2..=100);
        let points: Vec<Point<u64>> = (0..number_of_points)
            .map(|x| Point::new(x, rand::random_range(0..DEFAULT_PRIME)))
            .collect();
        let p = Polynomial::interpolate(&points, &field).unwrap();
        for point in points {
            assert_eq!(p.evaluate(point.x, &field), point.y);
        }
    }

    #[test]
    fn test_interpolation_constant_term_is_secret() {
        let field = PrimeField::default();
        // y = 3x + 7
        let points = vec![Point::new(1, 10), Point::new(3, 16)];
        let p = Polynomial::interpolate(&points, &field).unwrap();
        assert_eq!(p.coefficients(), &[7, 3]);
        assert_eq!(p.evaluate_at_zero(), 7);
    }

    #[test]
    fn test_interpolation_duplicate_x_fails() {
        let field = PrimeField::default();
        let points = vec![Point::new(2, 10), Point::new(2, 16)];
        assert!(Polynomial::interpolate(&points, &field).is_err());
    }
}
