//! Menu items and the immutable menu snapshot an order is bound to.
//!
//! Loading and editing the menu belongs to the surrounding application; the core only
//! receives finished snapshots.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while building menu values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("Menu item name cannot be empty")]
    EmptyName,

    /// Prices must be finite and non-negative.
    #[error("Invalid price for {name}: {price}")]
    InvalidPrice { name: String, price: f64 },
}

/// An immutable menu entry. Orders hold copies, so later menu changes never alter an
/// order that already contains the item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    name: String,
    price: f64,
    prep_time: Duration,
    complexity: u32,
}

impl MenuItem {
    /// Creates a menu item.
    ///
    /// # Arguments
    /// * `name` - Display name, also the lookup key within a [`MenuSnapshot`]
    /// * `price` - Finite, non-negative price
    /// * `prep_time` - How long the kitchen nominally needs for one portion
    /// * `complexity` - Relative effort; each level stretches preparation by 10%
    pub fn new(
        name: impl Into<String>,
        price: f64,
        prep_time: Duration,
        complexity: u32,
    ) -> Result<Self, MenuError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MenuError::EmptyName);
        }
        if !price.is_finite() || price < 0.0 {
            return Err(MenuError::InvalidPrice { name, price });
        }
        Ok(Self {
            name,
            price,
            prep_time,
            complexity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn prep_time(&self) -> Duration {
        self.prep_time
    }

    pub fn complexity(&self) -> u32 {
        self.complexity
    }
}

/// A read-only list of menu items, shared between orders behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuSnapshot {
    items: Vec<MenuItem>,
}

impl MenuSnapshot {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Case-insensitive lookup by item name.
    pub fn find(&self, name: &str) -> Option<&MenuItem> {
        let name = name.trim();
        self.items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
