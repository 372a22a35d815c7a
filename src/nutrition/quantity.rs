//! Quantity: an amount in a unit

use std::fmt;

use serde::{Deserialize, Serialize};

use super::units::{Dimension, Unit};

/// An amount of mass, volume or energy.
///
/// Quantities are plain values. Conversion, scaling and addition always
/// return a new quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(amount: f64, unit: Unit) -> Self {
        Self { amount, unit }
    }

    pub fn grams(amount: f64) -> Self {
        Self::new(amount, Unit::Gram)
    }

    pub fn milliliters(amount: f64) -> Self {
        Self::new(amount, Unit::Milliliter)
    }

    pub fn kilocalories(amount: f64) -> Self {
        Self::new(amount, Unit::Kilocalorie)
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    /// Convert into `to`, or `None` when `to` belongs to another dimension
    pub fn checked_converted(&self, to: Unit) -> Option<Quantity> {
        if self.unit == to {
            return Some(*self);
        }
        if self.dimension() != to.dimension() {
            return None;
        }
        let base = self.amount * self.unit.base_factor();
        Some(Quantity::new(base / to.base_factor(), to))
    }

    /// Convert into `to`.
    ///
    /// # Panics
    ///
    /// Panics if `to` is in a different dimension. Use
    /// [`Quantity::checked_converted`] for data of unknown shape.
    pub fn converted(&self, to: Unit) -> Quantity {
        match self.checked_converted(to) {
            Some(q) => q,
            None => panic!(
                "cannot convert {} ({}) to {} ({})",
                self.unit,
                self.dimension(),
                to,
                to.dimension()
            ),
        }
    }

    pub fn scaled(&self, factor: f64) -> Quantity {
        Quantity::new(self.amount * factor, self.unit)
    }

    /// Sum in `self`'s unit, or `None` across dimensions
    pub fn checked_add(&self, other: &Quantity) -> Option<Quantity> {
        let other = other.checked_converted(self.unit)?;
        Some(Quantity::new(self.amount + other.amount, self.unit))
    }

    /// Sum in `self`'s unit.
    ///
    /// # Panics
    ///
    /// Panics if `other` is in a different dimension.
    pub fn add(&self, other: &Quantity) -> Quantity {
        self.checked_add(other).unwrap_or_else(|| {
            panic!(
                "cannot add {} ({}) to {} ({})",
                other.unit,
                other.dimension(),
                self.unit,
                self.dimension()
            )
        })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit)
    }
}

impl std::ops::Add for Quantity {
    type Output = Quantity;

    fn add(self, other: Quantity) -> Quantity {
        Quantity::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, factor: f64) -> Quantity {
        self.scaled(factor)
    }
}
