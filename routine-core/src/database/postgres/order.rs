use std::fmt;

use sqlx::{Postgres, QueryBuilder};

use crate::query::{OrderTarget, SortOrder};

/// Renders an `ORDER BY` clause into a query under construction.
///
/// Field names come from the mapping registry, never from the client, so
/// they are pushed verbatim.
pub struct SqlOrderBy<'q, 'args> {
    qb: &'q mut QueryBuilder<'args, Postgres>,
    started: bool,
}

impl<'q, 'args> SqlOrderBy<'q, 'args> {
    pub fn new(qb: &'q mut QueryBuilder<'args, Postgres>) -> Self {
        Self { qb, started: false }
    }
}

impl fmt::Debug for SqlOrderBy<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlOrderBy")
            .field("started", &self.started)
            .field("query_builder", &"<sqlx::QueryBuilder<Postgres>>")
            .finish()
    }
}

impl OrderTarget for SqlOrderBy<'_, '_> {
    fn order_by(&mut self, field: &'static str, order: SortOrder) {
        self.qb.push(if self.started { ", " } else { " ORDER BY " });
        self.qb.push(field);
        self.qb.push(" ");
        self.qb.push(order.as_sql());
        self.started = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{OrderKey, OrderSpec};

    #[test]
    fn renders_keys_in_order() {
        let mut spec = OrderSpec::new();
        spec.push(OrderKey::new("first_name", SortOrder::Descending));
        spec.push(OrderKey::new("last_name", SortOrder::Descending));
        let spec = spec.then_by("id", SortOrder::Ascending);

        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id FROM employees");
        spec.apply_to(&mut SqlOrderBy::new(&mut qb));

        assert_eq!(
            qb.sql(),
            "SELECT id FROM employees ORDER BY first_name DESC, last_name DESC, id ASC"
        );
    }

    #[test]
    fn empty_spec_adds_nothing() {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id FROM companies");
        OrderSpec::new().apply_to(&mut SqlOrderBy::new(&mut qb));
        assert_eq!(qb.sql(), "SELECT id FROM companies");
    }
}
