//! Fixed capacity schedule for the bucket array.
//!
//! Every table starts at the first tier and only ever moves forward. The
//! last tier is terminal: `Tier::next` returns `None` and the table keeps
//! chaining instead of growing.

/// Prime bucket counts, ascending.
pub const CAPACITY_TIERS: [usize; 8] = [509, 1021, 2039, 4093, 8191, 16381, 32749, 65521];

/// Position in [`CAPACITY_TIERS`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tier(usize);

impl Tier {
    pub const FIRST: Tier = Tier(0);
    pub const LAST: Tier = Tier(CAPACITY_TIERS.len() - 1);

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    #[inline]
    pub fn bucket_count(self) -> usize {
        CAPACITY_TIERS[self.0]
    }

    #[inline]
    pub fn is_last(self) -> bool {
        self == Tier::LAST
    }

    /// The following tier, or `None` once the schedule is exhausted.
    pub fn next(self) -> Option<Tier> {
        if self.is_last() {
            None
        } else {
            Some(Tier(self.0 + 1))
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::FIRST
    }
}
