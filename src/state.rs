use core::fmt;
use core::ops::BitOr;

/// The installation state of a setup instance.
///
/// This is a bitmask. An instance is only usable once every bit is set,
/// which is what [`InstanceState::eComplete`] represents.
#[repr(transparent)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InstanceState {
    value: i32,
}

impl InstanceState {
    pub const eNone: Self = Self { value: 0 };
    /// The instance's files exist on disk.
    pub const eLocal: Self = Self { value: 1 };
    /// The product package has been registered.
    pub const eRegistered: Self = Self { value: 2 };
    pub const eNoRebootRequired: Self = Self { value: 4 };
    pub const eNoErrors: Self = Self { value: 8 };
    pub const eComplete: Self = Self {
        value: u32::MAX as i32,
    };

    const NAMED: [(Self, &'static str); 4] = [
        (Self::eLocal, "Local"),
        (Self::eRegistered, "Registered"),
        (Self::eNoRebootRequired, "NoRebootRequired"),
        (Self::eNoErrors, "NoErrors"),
    ];

    pub const fn from_bits(value: i32) -> Self {
        Self { value }
    }

    pub const fn bits(self) -> i32 {
        self.value
    }

    /// Returns `true` if every bit in `flag` is also set in `self`.
    pub const fn contains(self, flag: Self) -> bool {
        self.value & flag.value == flag.value
    }

    pub const fn is_complete(self) -> bool {
        self.value == Self::eComplete.value
    }
}

impl Default for InstanceState {
    fn default() -> Self {
        Self::eNone
    }
}

impl BitOr for InstanceState {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self {
            value: self.value | rhs.value,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == InstanceState::eNone {
            return f.write_str("None");
        } else if self.is_complete() {
            return f.write_str("Complete");
        }
        f.write_str("Incomplete(")?;
        let mut rest = self.value;
        let mut first = true;
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                rest &= !flag.value;
                first = false;
            }
        }
        // Bits this crate doesn't know about yet.
        if rest != 0 {
            if !first {
                f.write_str(" | ")?;
            }
            f.write_fmt(format_args!("{rest:#x}"))?;
        }
        f.write_str(")")
    }
}
