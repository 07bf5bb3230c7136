//! Order-item rows and the in-memory table that owns them

use crate::filter::DateRange;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One order-item line. An order with N items yields N records sharing `order_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order identifier, repeated across the order's items. Rows without one
    /// still count as items and revenue but not as distinct orders.
    pub order_id: Option<String>,
    /// Purchase instant, no timezone
    pub purchased_at: NaiveDateTime,
    /// Item price; a missing price counts as zero revenue
    pub price: Option<f64>,
    /// Customer identifier
    pub customer_id: Option<String>,
    /// Customer city
    pub customer_city: Option<String>,
    /// Seller identifier
    pub seller_id: Option<String>,
    /// Seller city
    pub seller_city: Option<String>,
    /// Product category name
    pub product_category: Option<String>,
    /// Review score, 1 to 5
    pub review_score: Option<f64>,
    /// Payment method
    pub payment_type: Option<String>,
}

impl OrderRecord {
    /// Calendar day of the purchase
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date()
    }
}

/// The loaded dataset. Read-only once built; filters and aggregations borrow it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderTable {
    records: Vec<OrderRecord>,
}

impl OrderTable {
    /// Wrap already-parsed records
    pub fn new(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    /// All rows in load order
    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    /// Iterate rows in load order
    pub fn iter(&self) -> impl Iterator<Item = &OrderRecord> {
        self.records.iter()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest purchase day present, or `None` for an empty table
    pub fn date_bounds(&self) -> Option<DateRange> {
        let first = self.records.iter().map(OrderRecord::purchase_date).min()?;
        let last = self.records.iter().map(OrderRecord::purchase_date).max()?;
        Some(DateRange::spanning(first, last))
    }
}

impl FromIterator<OrderRecord> for OrderTable {
    fn from_iter<I: IntoIterator<Item = OrderRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OrderTable {
    type Item = &'a OrderRecord;
    type IntoIter = std::slice::Iter<'a, OrderRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
