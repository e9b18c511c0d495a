/// Which priority levels a query accepts.
///
/// `Highest` and `Lowest` are relative to the values that survive the source
/// filter, not to the whole history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrioritySelector {
    #[default]
    Any,
    Highest,
    Lowest,
    HigherThan(u32),
    LowerThan(u32),
    Exactly(u32),
}

impl PrioritySelector {
    /// Whether the selector needs the (lowest, highest) bounds to decide.
    pub(crate) fn is_relative(self) -> bool {
        matches!(self, PrioritySelector::Highest | PrioritySelector::Lowest)
    }

    pub(crate) fn accepts(self, priority: u32, bounds: Option<(u32, u32)>) -> bool {
        match self {
            PrioritySelector::Any => true,
            PrioritySelector::Highest => bounds.is_some_and(|(_, high)| priority == high),
            PrioritySelector::Lowest => bounds.is_some_and(|(low, _)| priority == low),
            PrioritySelector::HigherThan(limit) => priority > limit,
            PrioritySelector::LowerThan(limit) => priority < limit,
            PrioritySelector::Exactly(wanted) => priority == wanted,
        }
    }
}

impl From<u32> for PrioritySelector {
    fn from(priority: u32) -> Self {
        PrioritySelector::Exactly(priority)
    }
}

/// Position inside a filtered value list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum At {
    First,
    Last,
    Nth(usize),
}

impl At {
    /// Resolves the position against a list of `len` elements.
    pub(crate) fn resolve(self, len: usize) -> Option<usize> {
        match self {
            At::First if len > 0 => Some(0),
            At::Last if len > 0 => Some(len - 1),
            At::Nth(i) if i < len => Some(i),
            _ => None,
        }
    }
}

impl From<usize> for At {
    fn from(index: usize) -> Self {
        At::Nth(index)
    }
}
