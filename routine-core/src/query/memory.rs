//! In-memory counterparts of the SQL ordering and paging primitives.

use std::cmp::Ordering;
use std::convert::Infallible;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::order::{OrderSpec, OrderTarget};
use super::page::PagedSource;
use super::sort::SortOrder;

/// A comparable projection of one storage field.
///
/// `Missing` sorts before every present value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Missing,
    Int(i64),
    Text(&'a str),
    Date(NaiveDate),
    Uuid(Uuid),
}

/// Records that can report a value for each of their storage fields.
pub trait SortableRecord {
    fn sort_value(&self, field: &str) -> SortValue<'_>;
}

/// Comparator assembled from an [`OrderSpec`].
#[derive(Debug, Default, Clone)]
pub struct MemoryOrdering {
    keys: Vec<(&'static str, SortOrder)>,
}

impl OrderTarget for MemoryOrdering {
    fn order_by(&mut self, field: &'static str, order: SortOrder) {
        self.keys.push((field, order));
    }
}

impl MemoryOrdering {
    pub fn from_spec(spec: &OrderSpec) -> Self {
        let mut ordering = Self::default();
        spec.apply_to(&mut ordering);
        ordering
    }

    pub fn compare<R: SortableRecord>(&self, a: &R, b: &R) -> Ordering {
        for (field, order) in &self.keys {
            let ordering = a.sort_value(field).cmp(&b.sort_value(field));
            let ordering = match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Stable sort, so equal records keep their input order.
    pub fn sort<R: SortableRecord>(&self, records: &mut [R]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

/// A pre-filtered, pre-ordered slice exposed as a [`PagedSource`].
#[derive(Debug, Clone, Copy)]
pub struct MemorySource<'a, T> {
    items: &'a [T],
}

impl<'a, T> MemorySource<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }
}

#[async_trait]
impl<'a, T> PagedSource for MemorySource<'a, T>
where
    T: Clone + Send + Sync,
{
    type Item = T;
    type Error = Infallible;

    async fn count(&self) -> Result<u64, Self::Error> {
        Ok(self.items.len() as u64)
    }

    async fn fetch(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<T>, Self::Error> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self.items.iter().skip(start).take(take).cloned().collect())
    }
}
