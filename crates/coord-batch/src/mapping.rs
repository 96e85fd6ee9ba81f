use std::fmt::{self, Display, Formatter};

/// Position of a coordinate role within a profile (`lat`/`lng` or `x`/`y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    First,
    Second,
}

impl Role {
    pub const BOTH: [Self; 2] = [Self::First, Self::Second];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Second => f.write_str("second"),
        }
    }
}

/// Role to column assignment. A column index is owned by at most one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    columns: [Option<usize>; 2],
}

impl ColumnMapping {
    /// Builds a complete mapping; `None` when both roles would share a column.
    #[must_use]
    pub fn pair(first: usize, second: usize) -> Option<Self> {
        (first != second).then_some(Self {
            columns: [Some(first), Some(second)],
        })
    }

    #[must_use]
    pub const fn get(&self, role: Role) -> Option<usize> {
        self.columns[role.index()]
    }

    /// Assigns `column` to `role`, unassigning the other role if it held the same column.
    pub fn assign(&mut self, role: Role, column: Option<usize>) {
        if column.is_some() && self.columns[role.other().index()] == column {
            self.columns[role.other().index()] = None;
        }
        self.columns[role.index()] = column;
    }

    #[must_use]
    pub const fn resolved(&self) -> Option<(usize, usize)> {
        match self.columns {
            [Some(first), Some(second)] => Some((first, second)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.resolved().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnMapping, Role};

    #[test]
    fn pair_rejects_shared_column() {
        assert!(ColumnMapping::pair(1, 1).is_none());
        let mapping = ColumnMapping::pair(0, 2).expect("distinct columns");
        assert_eq!(mapping.resolved(), Some((0, 2)));
    }

    #[test]
    fn assigning_taken_column_moves_ownership() {
        let mut mapping = ColumnMapping::default();
        mapping.assign(Role::First, Some(0));
        mapping.assign(Role::Second, Some(1));
        assert!(mapping.is_complete());

        mapping.assign(Role::Second, Some(0));
        assert_eq!(mapping.get(Role::Second), Some(0));
        assert_eq!(mapping.get(Role::First), None);
        assert!(!mapping.is_complete());
    }

    #[test]
    fn clearing_a_role_leaves_the_other() {
        let mut mapping = ColumnMapping::pair(3, 4).expect("distinct columns");
        mapping.assign(Role::First, None);
        assert_eq!(mapping.get(Role::First), None);
        assert_eq!(mapping.get(Role::Second), Some(4));
    }
}
