use std::fmt;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountError {
    #[error("count {value} is outside of {min}..={max}")]
    OutOfRange { value: i64, min: u8, max: u8 },
}

/// A counter value, always within `Count::MIN..=Count::MAX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Count(u8);

impl Count {
    pub const MIN: Count = Count(0);
    pub const MAX: Count = Count(9);

    pub fn new(value: i64) -> Result<Self, CountError> {
        if (i64::from(Self::MIN.0)..=i64::from(Self::MAX.0)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CountError::OutOfRange {
                value,
                min: Self::MIN.0,
                max: Self::MAX.0,
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn can_increment(self) -> bool {
        self < Self::MAX
    }

    pub fn can_decrement(self) -> bool {
        self > Self::MIN
    }

    /// The next value, or `None` at [`Count::MAX`].
    pub fn increment(self) -> Option<Self> {
        self.can_increment().then(|| Self(self.0 + 1))
    }

    /// The previous value, or `None` at [`Count::MIN`].
    pub fn decrement(self) -> Option<Self> {
        self.can_decrement().then(|| Self(self.0 - 1))
    }
}

impl TryFrom<i64> for Count {
    type Error = CountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
