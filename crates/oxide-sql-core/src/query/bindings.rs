//! Parameter bindings partitioned by clause.

use std::collections::BTreeMap;

use crate::value::SqlValue;

/// The clause a binding belongs to.
///
/// The declaration order is the order placeholders appear in a compiled
/// `SELECT`, which is also the order [`Bindings::flatten`] yields values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingCategory {
    /// Bindings used by the select list.
    Select,
    /// Bindings used by WHERE predicates (including sub-queries).
    Where,
    /// Bindings used by HAVING predicates.
    Having,
    /// Bindings used by raw ORDER BY expressions.
    Order,
}

/// Parameter values grouped by [`BindingCategory`].
///
/// Empty partitions are never stored, so two binding sets with the same
/// values compare equal regardless of how they were emptied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    partitions: BTreeMap<BindingCategory, Vec<SqlValue>>,
}

impl Bindings {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value to a partition.
    pub fn add(&mut self, category: BindingCategory, value: SqlValue) {
        self.partitions.entry(category).or_default().push(value);
    }

    /// Appends values to a partition.
    pub fn extend(&mut self, category: BindingCategory, values: impl IntoIterator<Item = SqlValue>) {
        let mut values = values.into_iter().peekable();
        if values.peek().is_some() {
            self.partitions.entry(category).or_default().extend(values);
        }
    }

    /// Replaces a partition.
    pub fn set(&mut self, category: BindingCategory, values: Vec<SqlValue>) {
        if values.is_empty() {
            self.partitions.remove(&category);
        } else {
            self.partitions.insert(category, values);
        }
    }

    /// Removes and returns a partition.
    pub fn take(&mut self, category: BindingCategory) -> Vec<SqlValue> {
        self.partitions.remove(&category).unwrap_or_default()
    }

    /// Returns the values of a partition.
    #[must_use]
    pub fn get(&self, category: BindingCategory) -> &[SqlValue] {
        self.partitions.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if no partition holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Returns the total number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    /// Returns every value in placeholder order.
    #[must_use]
    pub fn flatten(&self) -> Vec<SqlValue> {
        self.partitions.values().flatten().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_follows_clause_order() {
        let mut bindings = Bindings::new();
        bindings.add(BindingCategory::Order, SqlValue::Int(3));
        bindings.add(BindingCategory::Where, SqlValue::Int(2));
        bindings.add(BindingCategory::Select, SqlValue::Int(1));

        assert_eq!(
            bindings.flatten(),
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
        );
        assert_eq!(bindings.len(), 3);
    }

    #[test]
    fn test_empty_partitions_are_not_stored() {
        let mut bindings = Bindings::new();
        bindings.extend(BindingCategory::Where, Vec::new());
        bindings.set(BindingCategory::Order, Vec::new());
        assert!(bindings.is_empty());
        assert_eq!(bindings, Bindings::new());
    }

    #[test]
    fn test_take_clears_partition() {
        let mut bindings = Bindings::new();
        bindings.add(BindingCategory::Order, SqlValue::Text(String::from("x")));

        let taken = bindings.take(BindingCategory::Order);
        assert_eq!(taken.len(), 1);
        assert!(bindings.get(BindingCategory::Order).is_empty());
        assert!(bindings.take(BindingCategory::Order).is_empty());
    }
}
