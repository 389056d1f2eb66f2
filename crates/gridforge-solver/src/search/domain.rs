//! Closed integer intervals with saturating arithmetic.
//!
//! Bounds are `i128` so sums and products of `i64` domains never wrap. Any
//! bound at or past `INFINITE` snaps to `UNBOUNDED`, so `UNBOUNDED - 1` is
//! still unbounded and narrowing an open side always reaches a fixpoint.

/// Stand-in for an infinite bound.
pub(crate) const UNBOUNDED: i128 = 1 << 100;

/// Smallest magnitude treated as infinite.
const INFINITE: i128 = 1 << 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Interval {
    pub lo: i128,
    pub hi: i128,
}

impl Interval {
    pub(crate) fn new(lo: i128, hi: i128) -> Self {
        Self {
            lo: clamp(lo),
            hi: clamp(hi),
        }
    }

    pub(crate) fn point(value: i64) -> Self {
        Self::new(i128::from(value), i128::from(value))
    }

    pub(crate) fn at_most(hi: i128) -> Self {
        Self::new(-UNBOUNDED, hi)
    }

    pub(crate) fn at_least(lo: i128) -> Self {
        Self::new(lo, UNBOUNDED)
    }

    pub(crate) fn unbounded() -> Self {
        Self::new(-UNBOUNDED, UNBOUNDED)
    }

    pub(crate) fn is_empty(self) -> bool {
        self.lo > self.hi
    }

    pub(crate) fn as_point(self) -> Option<i128> {
        (self.lo == self.hi).then_some(self.lo)
    }

    pub(crate) fn has_lower_bound(self) -> bool {
        self.lo > -UNBOUNDED
    }

    pub(crate) fn has_upper_bound(self) -> bool {
        self.hi < UNBOUNDED
    }

    pub(crate) fn contains(self, value: i128) -> bool {
        self.lo <= value && value <= self.hi
    }

    pub(crate) fn intersect(self, other: Self) -> Self {
        Self::new(self.lo.max(other.lo), self.hi.min(other.hi))
    }

    pub(crate) fn hull(self, other: Self) -> Self {
        Self::new(self.lo.min(other.lo), self.hi.max(other.hi))
    }

    pub(crate) fn add(self, other: Self) -> Self {
        Self::new(
            self.lo.saturating_add(other.lo),
            self.hi.saturating_add(other.hi),
        )
    }

    pub(crate) fn sub(self, other: Self) -> Self {
        Self::new(
            self.lo.saturating_sub(other.hi),
            self.hi.saturating_sub(other.lo),
        )
    }

    pub(crate) fn mul(self, other: Self) -> Self {
        let corners = [
            self.lo.saturating_mul(other.lo),
            self.lo.saturating_mul(other.hi),
            self.hi.saturating_mul(other.lo),
            self.hi.saturating_mul(other.hi),
        ];
        let lo = corners.iter().copied().min().unwrap_or(-UNBOUNDED);
        let hi = corners.iter().copied().max().unwrap_or(UNBOUNDED);
        Self::new(lo, hi)
    }

    /// Every integer `x` with `x * factor` inside `self`. `factor` must not
    /// be zero.
    pub(crate) fn div_by(self, factor: i128) -> Self {
        debug_assert!(factor != 0);
        if factor > 0 {
            Self::new(ceil_div(self.lo, factor), floor_div(self.hi, factor))
        } else {
            Self::new(ceil_div(self.hi, factor), floor_div(self.lo, factor))
        }
    }
}

fn clamp(value: i128) -> i128 {
    if value >= INFINITE {
        UNBOUNDED
    } else if value <= -INFINITE {
        -UNBOUNDED
    } else {
        value
    }
}

fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn ceil_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}
