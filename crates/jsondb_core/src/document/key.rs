//! Record / entry addressing.

use std::fmt;

/// Identifies a record (array mode) or an entry (map mode).
///
/// In array mode, `Id(n)` matches the record whose `id` is `n`; a `Name`
/// matches only if it spells a positive integer. In map mode, `Id(n)` is
/// looked up as the key `n.to_string()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Numeric record identifier.
    Id(u64),
    /// String key.
    Name(String),
}

impl Key {
    /// Returns the numeric id this key refers to in array mode.
    #[must_use]
    pub fn as_id(&self) -> Option<u64> {
        match self {
            Key::Id(id) => Some(*id),
            Key::Name(name) => name.parse().ok(),
        }
    }

    /// Returns the map key this refers to in map mode.
    #[must_use]
    pub fn as_map_key(&self) -> String {
        match self {
            Key::Id(id) => id.to_string(),
            Key::Name(name) => name.clone(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Id(id) => write!(f, "{id}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

macro_rules! key_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Key {
            fn from(id: $t) -> Self {
                Key::Id(id as u64)
            }
        }
    )*};
}

// Negative numbers can never be record ids; they still work as map keys.
macro_rules! key_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Key {
            fn from(n: $t) -> Self {
                match u64::try_from(n) {
                    Ok(id) => Key::Id(id),
                    Err(_) => Key::Name(n.to_string()),
                }
            }
        }
    )*};
}

key_from_unsigned!(u8, u16, u32, u64, usize);
key_from_signed!(i8, i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_literals_become_ids() {
        assert_eq!(Key::from(3), Key::Id(3));
        assert_eq!(Key::from(3u64), Key::Id(3));
        assert_eq!(Key::from(-1), Key::Name("-1".into()));
    }

    #[test]
    fn names_that_spell_ids() {
        assert_eq!(Key::from("12").as_id(), Some(12));
        assert_eq!(Key::from("abc").as_id(), None);
        assert_eq!(Key::Id(7).as_map_key(), "7");
    }
}
