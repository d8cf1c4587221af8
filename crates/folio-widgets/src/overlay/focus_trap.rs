#![forbid(unsafe_code)]

//! Circular Tab wrapping over a set of focusable elements.
//!
//! # Invariants
//!
//! - Only the boundary elements redirect: forward from the last goes to the
//!   first, backward from the first goes to the last. Every other position
//!   is left to the browser's default Tab action.
//! - An empty member set never redirects.
//! - With a single member, both directions redirect to that member, which
//!   keeps focus pinned.

use folio_core::KeyEvent;

/// Direction of a Tab keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

impl TabDirection {
    /// Direction of a Tab key event, or `None` for other keys.
    #[must_use]
    pub fn of(key: &KeyEvent) -> Option<Self> {
        if key.code != folio_core::KeyCode::Tab {
            return None;
        }
        Some(if key.shift() {
            Self::Backward
        } else {
            Self::Forward
        })
    }
}

/// The elements focus is confined to, in tab order.
#[derive(Debug, Clone, Copy)]
pub struct FocusTrap<'a, N> {
    members: &'a [N],
}

impl<'a, N: PartialEq> FocusTrap<'a, N> {
    /// A trap over `members` (document order).
    #[must_use]
    pub fn new(members: &'a [N]) -> Self {
        Self { members }
    }

    /// First member.
    #[must_use]
    pub fn first(&self) -> Option<&'a N> {
        self.members.first()
    }

    /// Last member.
    #[must_use]
    pub fn last(&self) -> Option<&'a N> {
        self.members.last()
    }

    /// Whether `node` is one of the members.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.members.contains(node)
    }

    /// The element to redirect focus to, if `active` sits on the boundary
    /// being crossed. `None` means "let the default Tab action happen".
    #[must_use]
    pub fn wrap_target(&self, active: Option<&N>, direction: TabDirection) -> Option<&'a N> {
        let (first, last) = (self.first()?, self.last()?);
        let active = active?;
        match direction {
            TabDirection::Forward if active == last => Some(first),
            TabDirection::Backward if active == first => Some(last),
            _ => None,
        }
    }
}
