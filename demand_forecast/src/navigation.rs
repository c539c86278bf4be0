//! Paging through the products of a filtered dataset
//!
//! The current selection is a plain value that callers thread through their
//! own state; stepping wraps around at both ends.

use crate::data::{Dataset, HistoricalRecord};
use serde::{Deserialize, Serialize};

/// Position within a list of products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductSelection {
    index: usize,
    count: usize,
}

impl ProductSelection {
    /// Start at the first of `count` products
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    /// Select `index`, falling back to the first product when out of range
    ///
    /// Re-selecting with a new count after re-filtering keeps the position
    /// only while it is still valid.
    pub fn at(index: usize, count: usize) -> Self {
        let index = if index < count { index } else { 0 };
        Self { index, count }
    }


    /// Step forward, wrapping to the first product after the last
    pub fn next(self) -> Self {
        if self.count == 0 {
            return self;
        }
        Self {
            index: (self.index + 1) % self.count,
            count: self.count,
        }
    }

    /// Step back, wrapping to the last product before the first
    pub fn previous(self) -> Self {
        if self.count == 0 {
            return self;
        }
        Self {
            index: (self.index + self.count - 1) % self.count,
            count: self.count,
        }
    }

    /// Index of the current product, or `None` when there are no products
    pub fn current(&self) -> Option<usize> {
        (self.count > 0).then_some(self.index)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fraction of the list reached, in `(0, 1]`
    pub fn progress(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.index + 1) as f64 / self.count as f64
    }

    /// e.g. "Product 3 of 10"
    pub fn caption(&self) -> String {
        match self.current() {
            Some(index) => format!("Product {} of {}", index + 1, self.count),
            None => "No products match the selected filters".to_string(),
        }
    }
}

/// Identifying details of the selected product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOverview {
    pub product_id: String,
    pub description: String,
    pub category: String,
    pub customer: String,
    pub customer_class: String,
}

impl ProductOverview {
    /// Details taken from the product's first record
    pub fn from_record(record: &HistoricalRecord) -> Self {
        Self {
            product_id: record.product_id.clone(),
            description: record.product_description.clone(),
            category: record.category.clone(),
            customer: record.customer.clone(),
            customer_class: record.customer_class.clone(),
        }
    }

    /// Overview of the product under `selection` within `dataset`
    pub fn for_selection(dataset: &Dataset, selection: &ProductSelection) -> Option<Self> {
        let index = selection.current()?;
        let product_id = dataset.product_ids().into_iter().nth(index)?;
        dataset
            .records()
            .iter()
            .find(|r| r.product_id == product_id)
            .map(Self::from_record)
    }
}

impl std::fmt::Display for ProductOverview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Current Product: {}", self.product_id)?;
        writeln!(f, "  Description: {}", self.description)?;
        writeln!(f, "  Category:    {}", self.category)?;
        writeln!(f, "  Customer:    {}", self.customer)?;
        writeln!(f, "  Class:       {}", self.customer_class)?;
        Ok(())
    }
}
