/// Result of a selection event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange<A> {
    /// Expanded item before the event
    pub previous: Option<A>,
    /// Expanded item after the event
    pub current: Option<A>,
}

impl<A: Copy + Eq> SelectionChange<A> {
    /// Items whose appearance changed: old expanded ∪ new expanded
    pub fn refresh_set(&self) -> Vec<A> {
        let mut items = Vec::with_capacity(2);
        items.extend(self.previous);
        if let Some(current) = self.current {
            if self.previous != Some(current) {
                items.push(current);
            }
        }
        items
    }

    pub fn is_changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Single "expanded item" tracking across all groups
///
/// At most one item is expanded at a time. Selecting the expanded item
/// again collapses it.
#[derive(Debug, Clone)]
pub struct SelectionController<A> {
    expanded: Option<A>,
}

impl<A> Default for SelectionController<A> {
    fn default() -> Self {
        Self { expanded: None }
    }
}

impl<A: Copy + Eq> SelectionController<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `address` and return the new expanded address.
    pub fn toggle(&mut self, address: A) -> Option<A> {
        self.select(address).current
    }

    /// Toggle `address`, reporting both the old and new expanded item.
    pub fn select(&mut self, address: A) -> SelectionChange<A> {
        let previous = self.expanded;
        self.expanded = if previous == Some(address) {
            None
        } else {
            Some(address)
        };
        SelectionChange {
            previous,
            current: self.expanded,
        }
    }

    pub fn current(&self) -> Option<A> {
        self.expanded
    }

    pub fn clear(&mut self) -> SelectionChange<A> {
        SelectionChange {
            previous: self.expanded.take(),
            current: None,
        }
    }
}
