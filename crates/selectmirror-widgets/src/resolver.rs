//! Option addressing.
//!
//! An option can be named three ways: by its position, by its real
//! `<option>` element, or by the identity the dropdown minted for it. All
//! three reduce to a position in `[0, option_count)`; anything outside that
//! range, or an element or identity the dropdown does not own, resolves to
//! `None`.

use selectmirror_core::{position_of, NodeId};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DROPDOWN: AtomicU64 = AtomicU64::new(1);

/// Identity of one dropdown instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropdownId(u64);

impl DropdownId {
    /// Mint a process-unique ID.
    pub(crate) fn next() -> Self {
        Self(NEXT_DROPDOWN.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Identity of one option, stable for the dropdown's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionId {
    owner: DropdownId,
    slot: usize,
}

impl OptionId {
    pub(crate) const fn new(owner: DropdownId, slot: usize) -> Self {
        Self { owner, slot }
    }

    /// Dropdown that minted this identity.
    #[must_use]
    pub const fn owner(self) -> DropdownId {
        self.owner
    }
}

/// Reference to an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionRef {
    /// Ordinal position among the real control's options
    Index(usize),
    /// The real `<option>` element
    RealElement(NodeId),
    /// An option identity minted by the dropdown
    Instance(OptionId),
}

impl From<usize> for OptionRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<NodeId> for OptionRef {
    fn from(node: NodeId) -> Self {
        Self::RealElement(node)
    }
}

impl From<OptionId> for OptionRef {
    fn from(id: OptionId) -> Self {
        Self::Instance(id)
    }
}

/// What the resolver needs to know about a dropdown.
pub(crate) struct ResolveScope<'a> {
    pub(crate) owner: DropdownId,
    pub(crate) real_options: &'a [NodeId],
    pub(crate) option_ids: &'a [OptionId],
}

impl ResolveScope<'_> {
    /// Position of the referenced option.
    pub(crate) fn resolve(&self, reference: OptionRef) -> Option<usize> {
        let position = match reference {
            OptionRef::Index(index) => Some(index),
            OptionRef::RealElement(node) => position_of(self.real_options, node),
            OptionRef::Instance(id) if id.owner == self.owner => {
                self.option_ids.iter().position(|&known| known == id)
            }
            OptionRef::Instance(_) => None,
        };
        position.filter(|&index| index < self.option_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scope_of(owner: DropdownId, n: usize) -> (Vec<NodeId>, Vec<OptionId>) {
        let real = (0..n as u64).map(|i| NodeId::new(100 + i)).collect();
        let ids = (0..n).map(|i| OptionId::new(owner, i)).collect();
        (real, ids)
    }

    #[test]
    fn test_dropdown_ids_unique() {
        assert_ne!(DropdownId::next(), DropdownId::next());
    }

    #[test]
    fn test_resolve_index() {
        let owner = DropdownId::next();
        let (real, ids) = scope_of(owner, 3);
        let scope = ResolveScope {
            owner,
            real_options: &real,
            option_ids: &ids,
        };
        assert_eq!(scope.resolve(OptionRef::Index(2)), Some(2));
        assert_eq!(scope.resolve(OptionRef::Index(3)), None);
    }

    #[test]
    fn test_resolve_real_element() {
        let owner = DropdownId::next();
        let (real, ids) = scope_of(owner, 3);
        let scope = ResolveScope {
            owner,
            real_options: &real,
            option_ids: &ids,
        };
        assert_eq!(scope.resolve(NodeId::new(101).into()), Some(1));
        assert_eq!(scope.resolve(NodeId::new(7).into()), None);
    }

    #[test]
    fn test_resolve_instance() {
        let owner = DropdownId::next();
        let (real, ids) = scope_of(owner, 3);
        let scope = ResolveScope {
            owner,
            real_options: &real,
            option_ids: &ids,
        };
        assert_eq!(scope.resolve(ids[2].into()), Some(2));
    }

    #[test]
    fn test_resolve_foreign_instance() {
        let owner = DropdownId::next();
        let (real, ids) = scope_of(owner, 3);
        let scope = ResolveScope {
            owner,
            real_options: &real,
            option_ids: &ids,
        };
        let foreign = OptionId::new(DropdownId::next(), 0);
        assert_eq!(scope.resolve(foreign.into()), None);
    }

    #[test]
    fn test_resolve_empty() {
        let scope = ResolveScope {
            owner: DropdownId::next(),
            real_options: &[],
            option_ids: &[],
        };
        assert_eq!(scope.resolve(OptionRef::Index(0)), None);
    }

    proptest! {
        #[test]
        fn prop_all_three_refs_agree(n in 1usize..32, pick in 0usize..32) {
            let owner = DropdownId::next();
            let (real, ids) = scope_of(owner, n);
            let scope = ResolveScope { owner, real_options: &real, option_ids: &ids };
            let i = pick % n;
            prop_assert_eq!(scope.resolve(OptionRef::Index(i)), Some(i));
            prop_assert_eq!(scope.resolve(OptionRef::RealElement(real[i])), Some(i));
            prop_assert_eq!(scope.resolve(OptionRef::Instance(ids[i])), Some(i));
        }

        #[test]
        fn prop_out_of_range_is_none(n in 0usize..16, extra in 0usize..16) {
            let owner = DropdownId::next();
            let (real, ids) = scope_of(owner, n);
            let scope = ResolveScope { owner, real_options: &real, option_ids: &ids };
            prop_assert_eq!(scope.resolve(OptionRef::Index(n + extra)), None);
        }
    }
}
