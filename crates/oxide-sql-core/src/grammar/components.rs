//! Compiled clause fragments of a `SELECT`.

use std::collections::BTreeMap;

/// A clause of a `SELECT` statement, declared in the order clauses appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    /// `select ...`
    Columns,
    /// `from ...`
    From,
    /// `... join ...`
    Joins,
    /// `where ...`
    Wheres,
    /// `group by ...`
    Groups,
    /// `having ...`
    Havings,
    /// `order by ...`
    Orders,
    /// Row limit.
    Limit,
    /// Row offset.
    Offset,
}

/// Rendered clause fragments keyed by [`Component`].
///
/// Dialects rewrite individual fragments before [`Components::concatenate`]
/// stitches them together in clause order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Components {
    fragments: BTreeMap<Component, String>,
}

impl Components {
    /// Creates an empty fragment set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fragment for a clause.
    pub fn insert(&mut self, component: Component, sql: impl Into<String>) {
        self.fragments.insert(component, sql.into());
    }

    /// Removes and returns the fragment for a clause.
    pub fn remove(&mut self, component: Component) -> Option<String> {
        self.fragments.remove(&component)
    }

    /// Returns the fragment for a clause.
    #[must_use]
    pub fn get(&self, component: Component) -> Option<&str> {
        self.fragments.get(&component).map(String::as_str)
    }

    /// Joins the non-empty fragments with single spaces, in clause order.
    #[must_use]
    pub fn concatenate(&self) -> String {
        self.fragments
            .values()
            .filter(|sql| !sql.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenate_uses_clause_order() {
        let mut components = Components::new();
        components.insert(Component::Orders, "order by id asc");
        components.insert(Component::Columns, "select *");
        components.insert(Component::From, "from users");

        assert_eq!(components.concatenate(), "select * from users order by id asc");
    }

    #[test]
    fn test_concatenate_skips_empty_fragments() {
        let mut components = Components::new();
        components.insert(Component::Columns, "select *");
        components.insert(Component::Offset, "");

        assert_eq!(components.get(Component::Offset), Some(""));
        assert_eq!(components.concatenate(), "select *");
    }
}
