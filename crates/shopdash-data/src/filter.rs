//! Date-range selection over the order table

use crate::record::{OrderRecord, OrderTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shopdash_common::{DashboardError, Result};
use shopdash_config::InvalidRangePolicy;
use std::fmt;
use tracing::{debug, instrument, warn};

/// Inclusive calendar-day range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, failing with [`DashboardError::FilterRange`] when `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::FilterRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Caller guarantees `start <= end`
    pub(crate) fn spanning(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// First day of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range, included in full
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `day` lies in the range
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of calendar days covered
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether `other` lies entirely within this range
    pub fn covers(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share at least one day
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Unchecked wire form; deserialization goes through [`DateRange::new`]
#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DashboardError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// The operator's date selection together with the invalid-range policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeFilter {
    start: NaiveDate,
    end: NaiveDate,
    policy: InvalidRangePolicy,
}

impl RangeFilter {
    /// Filter for `[start, end]` with the default policy (reject)
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            policy: InvalidRangePolicy::default(),
        }
    }

    /// Filter covering every day in `range`
    pub fn from_range(range: DateRange) -> Self {
        Self::new(range.start(), range.end())
    }

    /// Fill a missing bound from the data bounds.
    ///
    /// Fails with a validation error when a bound is missing and the table is empty.
    pub fn from_selection(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        bounds: Option<DateRange>,
    ) -> Result<Self> {
        let start = start.or_else(|| bounds.map(|b| b.start()));
        let end = end.or_else(|| bounds.map(|b| b.end()));

        match (start, end) {
            (Some(start), Some(end)) => Ok(Self::new(start, end)),
            _ => Err(DashboardError::validation(
                "the dataset is empty; both a start and an end date are required",
            )),
        }
    }

    /// Replace the invalid-range policy
    pub fn with_policy(mut self, policy: InvalidRangePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Selected start day
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Selected end day
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Policy applied when `start > end`
    pub fn policy(&self) -> InvalidRangePolicy {
        self.policy
    }

    /// The validated range, or `None` when the selection is inverted and the
    /// policy turns that into an empty result
    pub fn resolve(&self) -> Result<Option<DateRange>> {
        match DateRange::new(self.start, self.end) {
            Ok(range) => Ok(Some(range)),
            Err(err) => match self.policy {
                InvalidRangePolicy::Reject => Err(err),
                InvalidRangePolicy::Empty => {
                    debug!(start = %self.start, end = %self.end, "Inverted range selects no rows");
                    Ok(None)
                }
            },
        }
    }

    /// Rows of `table` whose purchase day falls in the selected range
    #[instrument(skip(table), fields(rows = table.len()))]
    pub fn apply<'a>(&self, table: &'a OrderTable) -> Result<FilteredOrders<'a>> {
        let Some(range) = self.resolve()? else {
            return Ok(FilteredOrders::empty());
        };

        if let Some(bounds) = table.date_bounds() {
            if !bounds.overlaps(&range) {
                warn!(selected = %range, available = %bounds, "Selected range contains no data");
            } else if !bounds.covers(&range) {
                warn!(selected = %range, available = %bounds, "Selected range extends past the data");
            }
        }

        let rows: Vec<&OrderRecord> = table
            .iter()
            .filter(|record| range.contains(record.purchase_date()))
            .collect();

        debug!(selected = rows.len(), days = range.num_days(), "Range filter applied");

        Ok(FilteredOrders {
            range: Some(range),
            rows,
        })
    }
}

/// Borrowed view of the rows selected by a [`RangeFilter`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredOrders<'a> {
    range: Option<DateRange>,
    rows: Vec<&'a OrderRecord>,
}

impl<'a> FilteredOrders<'a> {
    fn empty() -> Self {
        Self::default()
    }

    /// The applied range; `None` when an inverted selection was accepted as empty
    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    /// Selected rows in table order
    pub fn rows(&self) -> &[&'a OrderRecord] {
        &self.rows
    }

    /// Number of selected rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing was selected
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
