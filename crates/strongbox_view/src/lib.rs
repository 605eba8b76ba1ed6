#![doc = include_str!("../README.md")]

use std::sync::Arc;

use thiserror::Error;

/// An error returned when a [`SlotView`] cannot be built from its parts.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum ViewError {
    #[error("slot range {min}..{max} ends before it starts")]
    InvertedRange { min: usize, max: usize },
    #[error("child view of size {child} does not fit in parent view of size {parent}")]
    ChildTooLarge { child: usize, parent: usize },
    #[error("child view maps to slot {slot}, outside of parent view of size {parent}")]
    ChildOutOfBounds { slot: usize, parent: usize },
    #[error("{len} slots starting at slot {start} run past the largest slot index")]
    Overflow { start: usize, len: usize },
}

/// A mapping from the local slots of a region onto the slots of the
/// inventory (or view) that contains it.
///
/// Local slots are `0..size()`. Anything outside that range maps to `None`,
/// for every kind of view.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SlotView {
    size: usize,
    kind: ViewKind,
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum ViewKind {
    Contiguous { start: usize },
    Arbitrary(Arc<[usize]>),
    Union(Arc<[SlotView]>),
    Join {
        parent: Arc<SlotView>,
        child: Arc<SlotView>,
    },
}

impl SlotView {
    /// A view over the external slots `min..max`.
    pub fn contiguous(min: usize, max: usize) -> Result<Self, ViewError> {
        if min > max {
            return Err(ViewError::InvertedRange { min, max });
        }

        Self::span(min, max - min)
    }

    /// A view over `len` external slots starting at `start`.
    pub fn span(start: usize, len: usize) -> Result<Self, ViewError> {
        if start.checked_add(len).is_none() {
            return Err(ViewError::Overflow { start, len });
        }

        Ok(Self {
            size: len,
            kind: ViewKind::Contiguous { start },
        })
    }

    /// A view of exactly one slot.
    pub fn singular(slot: usize) -> Self {
        Self {
            size: 1,
            kind: ViewKind::Contiguous { start: slot },
        }
    }

    /// A view over an explicit list of slots, in the given order.
    pub fn arbitrary<I: IntoIterator<Item = usize>>(slots: I) -> Self {
        let slots: Arc<[usize]> = slots.into_iter().collect();

        Self {
            size: slots.len(),
            kind: ViewKind::Arbitrary(slots),
        }
    }

    /// The concatenation of several views. Local slots of the second view
    /// follow the last local slot of the first, and so on.
    pub fn union<I: IntoIterator<Item = SlotView>>(views: I) -> Self {
        let views: Arc<[SlotView]> = views.into_iter().collect();

        Self {
            size: views.iter().map(SlotView::size).sum(),
            kind: ViewKind::Union(views),
        }
    }

    /// Re-roots `child` into `parent`: the child's external slots are read as
    /// local slots of the parent.
    ///
    /// ```
    /// # use strongbox_view::SlotView;
    /// let parent = SlotView::contiguous(50, 15000)?;
    /// let joined = SlotView::join(&parent, &SlotView::contiguous(40, 70)?)?;
    ///
    /// assert_eq!(joined.size(), 30);
    /// assert_eq!(joined.local_to_external(0), Some(90));
    /// # Ok::<(), strongbox_view::ViewError>(())
    /// ```
    pub fn join(parent: &SlotView, child: &SlotView) -> Result<Self, ViewError> {
        if child.size() > parent.size() {
            return Err(ViewError::ChildTooLarge {
                child: child.size(),
                parent: parent.size(),
            });
        }

        if let Some(slot) = child.externals().find(|&slot| slot >= parent.size()) {
            return Err(ViewError::ChildOutOfBounds {
                slot,
                parent: parent.size(),
            });
        }

        Ok(Self {
            size: child.size(),
            kind: ViewKind::Join {
                parent: Arc::new(parent.clone()),
                child: Arc::new(child.clone()),
            },
        })
    }

    /// Same as [`SlotView::join`] with `self` as the parent.
    pub fn fork(&self, child: &SlotView) -> Result<Self, ViewError> {
        Self::join(self, child)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_valid_local(&self, local: usize) -> bool {
        local < self.size
    }

    /// Translates a local slot to an external one. Returns `None` when the
    /// local slot is outside of this view.
    pub fn local_to_external(&self, local: usize) -> Option<usize> {
        if !self.is_valid_local(local) {
            return None;
        }

        match &self.kind {
            ViewKind::Contiguous { start } => start.checked_add(local),
            ViewKind::Arbitrary(slots) => slots.get(local).copied(),
            ViewKind::Union(views) => {
                let mut local = local;
                for view in views.iter() {
                    if local < view.size() {
                        return view.local_to_external(local);
                    }
                    local -= view.size();
                }
                None
            }
            ViewKind::Join { parent, child } => {
                parent.local_to_external(child.local_to_external(local)?)
            }
        }
    }

    /// All external slots of this view, in local order.
    pub fn externals(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter_map(|local| self.local_to_external(local))
    }

    /// Whether the external slot is reachable from some local slot.
    pub fn contains_external(&self, slot: usize) -> bool {
        match &self.kind {
            ViewKind::Contiguous { start } => slot
                .checked_sub(*start)
                .is_some_and(|offset| offset < self.size),
            _ => self.externals().any(|s| s == slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_size(view: &SlotView, size: usize) {
        assert_eq!(view.size(), size);
        assert!(!view.is_valid_local(size));
        assert_eq!(view.local_to_external(size), None);
        assert_eq!(view.local_to_external(usize::MAX), None);
    }

    fn assert_slot_range(view: &SlotView, local_start: usize, external_start: usize, len: usize) {
        for i in 0..len {
            assert!(view.is_valid_local(local_start + i));
            assert_eq!(
                view.local_to_external(local_start + i),
                Some(external_start + i)
            );
        }
    }

    #[test]
    fn contiguous_views() {
        let view = SlotView::contiguous(4, 12).unwrap();
        assert_size(&view, 8);
        assert_slot_range(&view, 0, 4, 8);

        let view = SlotView::contiguous(15000, 15010).unwrap();
        assert_size(&view, 10);
        assert_slot_range(&view, 0, 15000, 10);

        assert_eq!(
            SlotView::contiguous(10, 4),
            Err(ViewError::InvertedRange { min: 10, max: 4 })
        );
        assert_size(&SlotView::contiguous(7, 7).unwrap(), 0);
    }

    #[test]
    fn singular_views() {
        let view = SlotView::singular(15000);
        assert_size(&view, 1);
        assert_slot_range(&view, 0, 15000, 1);

        let last = SlotView::singular(usize::MAX);
        assert_eq!(last.local_to_external(0), Some(usize::MAX));
        assert!(last.contains_external(usize::MAX));
        assert!(!last.contains_external(usize::MAX - 1));
    }

    #[test]
    fn spans_near_the_end_of_the_slot_range() {
        assert_eq!(
            SlotView::span(usize::MAX - 2, 5),
            Err(ViewError::Overflow {
                start: usize::MAX - 2,
                len: 5
            })
        );

        let view = SlotView::span(usize::MAX - 3, 3).unwrap();
        assert_size(&view, 3);
        assert_eq!(view.local_to_external(2), Some(usize::MAX - 1));
        assert!(view.contains_external(usize::MAX - 1));
        assert!(!view.contains_external(usize::MAX));
        assert!(!view.contains_external(0));

        let view = SlotView::contiguous(usize::MAX - 1, usize::MAX).unwrap();
        assert_eq!(view.externals().collect::<Vec<_>>(), vec![usize::MAX - 1]);
    }

    #[test]
    fn union_views() {
        let union = SlotView::union([
            SlotView::contiguous(30, 40).unwrap(),
            SlotView::contiguous(10, 20).unwrap(),
        ]);
        assert_size(&union, 20);
        assert_slot_range(&union, 0, 30, 10);
        assert_slot_range(&union, 10, 10, 10);

        let union = SlotView::union([
            SlotView::contiguous(15000, 15010).unwrap(),
            SlotView::contiguous(40, 50).unwrap(),
            SlotView::contiguous(40, 50).unwrap(),
        ]);
        assert_size(&union, 30);
        assert_slot_range(&union, 20, 40, 10);

        assert_size(&SlotView::union(Vec::<SlotView>::new()), 0);
    }

    #[test]
    fn arbitrary_views() {
        let view = SlotView::arbitrary([15000, 0, 10, 400]);
        assert_size(&view, 4);
        assert_eq!(view.externals().collect::<Vec<_>>(), vec![15000, 0, 10, 400]);

        assert_size(&SlotView::arbitrary(Vec::<usize>::new()), 0);
    }

    #[test]
    fn joined_views() {
        let joined = SlotView::join(
            &SlotView::contiguous(10, 60).unwrap(),
            &SlotView::contiguous(20, 30).unwrap(),
        )
        .unwrap();
        assert_size(&joined, 10);
        assert_slot_range(&joined, 0, 30, 10);

        let joined = SlotView::contiguous(50, 15000)
            .unwrap()
            .fork(&SlotView::singular(5))
            .unwrap();
        assert_size(&joined, 1);
        assert_slot_range(&joined, 0, 55, 1);

        assert_eq!(
            SlotView::join(
                &SlotView::contiguous(10, 20).unwrap(),
                &SlotView::contiguous(0, 20).unwrap(),
            ),
            Err(ViewError::ChildTooLarge {
                child: 20,
                parent: 10
            })
        );
        assert_eq!(
            SlotView::join(
                &SlotView::contiguous(0, 30).unwrap(),
                &SlotView::contiguous(25, 35).unwrap(),
            ),
            Err(ViewError::ChildOutOfBounds {
                slot: 30,
                parent: 30
            })
        );
    }

    #[test]
    fn nested_joins_compose() {
        let root = SlotView::contiguous(0, 46).unwrap();
        let main = root.fork(&SlotView::contiguous(9, 45).unwrap()).unwrap();
        let hotbar = main.fork(&SlotView::contiguous(27, 36).unwrap()).unwrap();
        let last = hotbar.fork(&SlotView::singular(8)).unwrap();

        assert_size(&hotbar, 9);
        assert_slot_range(&hotbar, 0, 36, 9);
        assert_size(&last, 1);
        assert_eq!(last.local_to_external(0), Some(44));

        // Joining in the other order gives the same mapping.
        let inner = SlotView::contiguous(27, 36)
            .unwrap()
            .fork(&SlotView::singular(8))
            .unwrap();
        let regrouped = main.fork(&inner).unwrap();
        assert_eq!(regrouped.local_to_external(0), Some(44));
        assert_eq!(regrouped.local_to_external(1), None);
    }

    #[test]
    fn union_of_joins() {
        let root = SlotView::contiguous(100, 146).unwrap();
        let view = SlotView::union([
            root.fork(&SlotView::singular(45)).unwrap(),
            root.fork(&SlotView::contiguous(36, 38).unwrap()).unwrap(),
        ]);

        assert_eq!(view.externals().collect::<Vec<_>>(), vec![145, 136, 137]);
        assert!(view.contains_external(136));
        assert!(!view.contains_external(138));
    }
}
