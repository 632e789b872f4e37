//! Storage for the first enrollment pattern while it awaits confirmation.

use zeroize::{Zeroize, Zeroizing};

use lattice_types::{Pattern, TOUCH_POINT_COUNT};

/// Holds the pending pattern as raw ordinals.
///
/// Wiping overwrites the bytes in place and keeps the allocation, so the slot
/// never hands a live buffer back to the allocator before it is zeroed.
pub(crate) struct PendingSlot {
    bytes: Zeroizing<Vec<u8>>,
    armed: bool,
}

impl Default for PendingSlot {
    fn default() -> Self {
        Self {
            bytes: Zeroizing::new(Vec::with_capacity(TOUCH_POINT_COUNT)),
            armed: false,
        }
    }
}

impl PendingSlot {
    pub(crate) fn hold(&mut self, pattern: &Pattern) {
        // Vec::zeroize also clears the length.
        self.bytes.zeroize();
        self.bytes.extend(pattern.ordinals());
        self.armed = true;
    }

    pub(crate) fn is_set(&self) -> bool {
        self.armed
    }

    pub(crate) fn matches(&self, pattern: &Pattern) -> bool {
        self.armed && self.bytes.iter().copied().eq(pattern.ordinals())
    }

    pub(crate) fn wipe(&mut self) {
        self.bytes.as_mut_slice().zeroize();
        self.armed = false;
    }

    #[cfg(test)]
    pub(crate) fn residue(&self) -> &[u8] {
        &self.bytes
    }

    #[cfg(test)]
    pub(crate) fn pattern(&self) -> Option<Pattern> {
        if self.armed {
            Pattern::from_ordinals(&self.bytes).ok()
        } else {
            None
        }
    }
}

impl std::fmt::Debug for PendingSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSlot")
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}
