use core::fmt;

/// The error returned by strict lookups such as [`AvlTreeMap::try_get`] when the key is absent.
///
/// Insertion and removal never fail; only lookups that require the key to be present report
/// this.
///
/// # Examples
///
/// ```
/// use avl_tree::{AvlTreeMap, KeyNotFound};
///
/// let map = AvlTreeMap::from([(1, "a")]);
/// assert_eq!(map.try_get(&1), Ok(&"a"));
///
/// let error = map.try_get(&2).unwrap_err();
/// assert_eq!(error, KeyNotFound);
/// assert_eq!(error.to_string(), "key not found");
/// ```
///
/// [`AvlTreeMap::try_get`]: crate::AvlTreeMap::try_get
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct KeyNotFound;

impl fmt::Display for KeyNotFound {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("key not found")
    }
}

impl core::error::Error for KeyNotFound {}
