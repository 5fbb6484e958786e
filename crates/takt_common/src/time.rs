//! The saturated tropical time scalar.
//!
//! [`Time`] is the leaf value of every execution-time diagram: a signed
//! 64-bit cycle count with two distinguished extremes. `BOT` marks an
//! infeasible (unreachable) execution and `TOP` an unbounded one. All
//! arithmetic saturates into the closed interval `[BOT, TOP]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the saturated tropical semiring of execution times.
///
/// The semiring uses [`max`](Time::max) as its additive operation and
/// [`sat_add`](Time::sat_add) as its multiplicative one. `BOT` is the
/// identity of `max` and absorbs `sat_add`; `TOP` absorbs `max` and every
/// `sat_add` with a feasible operand.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time(i64);

impl Time {
    /// The infeasible execution, smaller than every feasible time.
    pub const BOT: Time = Time(i64::MIN);
    /// The unbounded execution, larger than every feasible time.
    pub const TOP: Time = Time(i64::MAX);
    /// The zero time: identity of saturated addition and of bag sums.
    pub const ZERO: Time = Time(0);

    /// Creates a time from a raw cycle count.
    ///
    /// `i64::MIN` and `i64::MAX` are the `BOT`/`TOP` extremes; passing
    /// them yields those values, not a finite time.
    pub const fn new(cycles: i64) -> Time {
        Time(cycles)
    }

    /// Returns the raw cycle count.
    pub const fn as_raw(self) -> i64 {
        self.0
    }

    /// Returns `true` for the infeasible extreme.
    pub const fn is_bot(self) -> bool {
        self.0 == i64::MIN
    }

    /// Returns `true` for the unbounded extreme.
    pub const fn is_top(self) -> bool {
        self.0 == i64::MAX
    }

    /// Returns `true` for every value other than `BOT` and `TOP`.
    pub const fn is_finite(self) -> bool {
        !self.is_bot() && !self.is_top()
    }

    /// Saturated addition, the semiring's multiplicative operation.
    ///
    /// `BOT` absorbs on either side; otherwise `TOP` absorbs; finite sums
    /// saturate at the extremes on overflow.
    pub fn sat_add(self, rhs: Time) -> Time {
        if self.is_bot() || rhs.is_bot() {
            return Time::BOT;
        }
        if self.is_top() || rhs.is_top() {
            return Time::TOP;
        }
        Time(self.0.saturating_add(rhs.0))
    }

    /// Saturated subtraction, clamped below at `ZERO`.
    ///
    /// `BOT` on either side yields `BOT`; subtracting `TOP` from a
    /// feasible time yields `ZERO`; `TOP` minus a finite time stays
    /// `TOP`. For finite operands `sat_sub(a, a) == ZERO`.
    pub fn sat_sub(self, rhs: Time) -> Time {
        if self.is_bot() || rhs.is_bot() {
            return Time::BOT;
        }
        if rhs.is_top() {
            return Time::ZERO;
        }
        if self.is_top() {
            return Time::TOP;
        }
        Time(self.0.saturating_sub(rhs.0).max(0))
    }

    /// The semiring's additive operation. `BOT` is its identity and
    /// `TOP` absorbs.
    pub fn max(self, rhs: Time) -> Time {
        if self.0 >= rhs.0 {
            self
        } else {
            rhs
        }
    }

    /// Dual of [`max`](Time::max). `TOP` is its identity and `BOT`
    /// absorbs.
    pub fn min(self, rhs: Time) -> Time {
        if self.0 <= rhs.0 {
            self
        } else {
            rhs
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bot() {
            write!(f, "-inf")
        } else if self.is_top() {
            write!(f, "+inf")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants() {
        assert!(Time::BOT.is_bot());
        assert!(Time::TOP.is_top());
        assert!(Time::ZERO.is_finite());
        assert_eq!(Time::ZERO.as_raw(), 0);
    }

    #[test]
    fn ordering() {
        assert!(Time::BOT < Time::new(-1));
        assert!(Time::new(-1) < Time::ZERO);
        assert!(Time::new(100) < Time::TOP);
    }

    #[test]
    fn sat_add_finite() {
        assert_eq!(Time::new(3).sat_add(Time::new(4)), Time::new(7));
        assert_eq!(Time::new(-2).sat_add(Time::new(2)), Time::ZERO);
    }

    #[test]
    fn sat_add_identity() {
        for t in [Time::new(-5), Time::ZERO, Time::new(42), Time::TOP] {
            assert_eq!(t.sat_add(Time::ZERO), t);
            assert_eq!(Time::ZERO.sat_add(t), t);
        }
    }

    #[test]
    fn sat_add_bot_absorbs() {
        assert_eq!(Time::BOT.sat_add(Time::new(9)), Time::BOT);
        assert_eq!(Time::new(9).sat_add(Time::BOT), Time::BOT);
        // BOT wins even against TOP
        assert_eq!(Time::BOT.sat_add(Time::TOP), Time::BOT);
        assert_eq!(Time::TOP.sat_add(Time::BOT), Time::BOT);
    }

    #[test]
    fn sat_add_top_absorbs_feasible() {
        assert_eq!(Time::TOP.sat_add(Time::new(9)), Time::TOP);
        assert_eq!(Time::new(-9).sat_add(Time::TOP), Time::TOP);
    }

    #[test]
    fn sat_add_overflow_saturates() {
        let big = Time::new(i64::MAX - 1);
        assert_eq!(big.sat_add(Time::new(100)), Time::TOP);
    }

    #[test]
    fn sat_add_commutative_associative() {
        let samples = [Time::BOT, Time::new(-3), Time::ZERO, Time::new(7), Time::TOP];
        for a in samples {
            for b in samples {
                assert_eq!(a.sat_add(b), b.sat_add(a));
                for c in samples {
                    assert_eq!(a.sat_add(b).sat_add(c), a.sat_add(b.sat_add(c)));
                }
            }
        }
    }

    #[test]
    fn sat_sub_basics() {
        assert_eq!(Time::new(10).sat_sub(Time::new(4)), Time::new(6));
        assert_eq!(Time::new(4).sat_sub(Time::new(10)), Time::ZERO);
        assert_eq!(Time::new(7).sat_sub(Time::new(7)), Time::ZERO);
    }

    #[test]
    fn sat_sub_extremes() {
        assert_eq!(Time::BOT.sat_sub(Time::new(1)), Time::BOT);
        assert_eq!(Time::new(1).sat_sub(Time::BOT), Time::BOT);
        assert_eq!(Time::new(1).sat_sub(Time::TOP), Time::ZERO);
        assert_eq!(Time::TOP.sat_sub(Time::new(1)), Time::TOP);
    }

    #[test]
    fn max_min_identities() {
        for t in [Time::BOT, Time::new(-1), Time::ZERO, Time::new(5), Time::TOP] {
            assert_eq!(t.max(Time::BOT), t);
            assert_eq!(t.min(Time::TOP), t);
            assert_eq!(t.max(Time::TOP), Time::TOP);
            assert_eq!(t.min(Time::BOT), Time::BOT);
        }
    }

    #[test]
    fn max_commutative() {
        let samples = [Time::BOT, Time::new(-3), Time::ZERO, Time::new(7), Time::TOP];
        for a in samples {
            for b in samples {
                assert_eq!(a.max(b), b.max(a));
                assert_eq!(a.min(b), b.min(a));
            }
        }
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", Time::new(42)), "42");
        assert_eq!(format!("{}", Time::BOT), "-inf");
        assert_eq!(format!("{}", Time::TOP), "+inf");
        assert_eq!(format!("{:?}", Time::new(-7)), "Time(-7)");
    }

    #[test]
    fn serde_roundtrip() {
        for t in [Time::BOT, Time::new(-9), Time::ZERO, Time::new(123), Time::TOP] {
            let json = serde_json::to_string(&t).unwrap();
            let back: Time = serde_json::from_str(&json).unwrap();
            assert_eq!(t, back);
        }
    }
}
