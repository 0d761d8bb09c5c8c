//! Storage-level ordering resolved from client clauses.

use super::mapping::MappingTable;
use super::sort::{SortClause, SortError, SortOrder, parse_order_by};

/// A single storage column with its effective direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub field: &'static str,
    pub order: SortOrder,
}

impl OrderKey {
    pub const fn new(field: &'static str, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// Anything that can be told to order by a storage field.
///
/// Called once per key, primary key first.
pub trait OrderTarget {
    fn order_by(&mut self, field: &'static str, order: SortOrder);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    keys: Vec<OrderKey>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and resolves `expression` in one step.
    pub fn from_expression(
        expression: &str,
        table: &MappingTable,
    ) -> Result<Self, SortError> {
        let clauses = parse_order_by(expression)?;
        resolve_order(&clauses, table)
    }

    pub fn push(&mut self, key: OrderKey) {
        self.keys.push(key);
    }

    /// Appends `field` as a tiebreak unless it is already ordered.
    pub fn then_by(mut self, field: &'static str, order: SortOrder) -> Self {
        if !self.contains(field) {
            self.keys.push(OrderKey::new(field, order));
        }
        self
    }

    pub fn contains(&self, field: &str) -> bool {
        self.keys.iter().any(|key| key.field == field)
    }

    pub fn keys(&self) -> &[OrderKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn apply_to<T: OrderTarget + ?Sized>(&self, target: &mut T) {
        for key in &self.keys {
            target.order_by(key.field, key.order);
        }
    }
}

/// Expands clauses through `table` into storage keys.
///
/// Clause order is preserved; a multi-column field contributes its columns in
/// mapping order, each inverted when the field is marked reversed.
pub fn resolve_order(
    clauses: &[SortClause],
    table: &MappingTable,
) -> Result<OrderSpec, SortError> {
    let mut spec = OrderSpec::new();

    for clause in clauses {
        let entry =
            table
                .get(&clause.field)
                .ok_or_else(|| SortError::UnknownField {
                    field: clause.field.clone(),
                })?;

        let order = if entry.is_reversed() {
            clause.order.inverted()
        } else {
            clause.order
        };

        for field in entry.storage_fields() {
            spec.push(OrderKey::new(*field, order));
        }
    }

    Ok(spec)
}
