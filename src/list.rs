//! Ordered list container for [`Variant::List`](crate::Variant::List).
//!
//! A [`VariantList`] owns its elements. Duplicates and mixed kinds are
//! allowed. A list can be frozen through
//! [`Variant::clone_with`](crate::Variant::clone_with); every mutator of a
//! frozen list fails with [`Error::ReadOnly`].
//!
//! ## Examples
//!
//! ```rust
//! use variant_codec::{Variant, VariantList};
//!
//! let mut list = VariantList::new();
//! list.add(1).unwrap().add("two").unwrap().add(3.0).unwrap();
//!
//! assert_eq!(list.len(), 3);
//! assert_eq!(list.get(1).and_then(|v| v.as_str()), Some("two"));
//! ```

use crate::{Error, Result, Variant};

/// An ordered, index-addressable sequence of variants.
#[derive(Debug, Clone, Default)]
pub struct VariantList {
    items: Vec<Variant>,
    read_only: bool,
}

impl VariantList {
    /// Creates an empty, mutable list.
    #[must_use]
    pub fn new() -> Self {
        VariantList {
            items: Vec::new(),
            read_only: false,
        }
    }

    /// Creates an empty list with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        VariantList {
            items: Vec::with_capacity(capacity),
            read_only: false,
        }
    }

    pub(crate) fn frozen() -> Self {
        VariantList {
            items: Vec::new(),
            read_only: true,
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Appends a value and returns the list for chaining.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::VariantList;
    ///
    /// let mut list = VariantList::new();
    /// list.add(true).unwrap().add(()).unwrap();
    /// assert!(list.get(1).unwrap().is_null());
    /// ```
    pub fn add(&mut self, value: impl Into<Variant>) -> Result<&mut Self> {
        self.check_writable()?;
        self.items.push(value.into());
        Ok(self)
    }

    /// Appends a value.
    pub fn push(&mut self, value: Variant) -> Result<()> {
        self.check_writable()?;
        self.items.push(value);
        Ok(())
    }

    /// Inserts a value at `index`, shifting later elements.
    pub fn insert(&mut self, index: usize, value: Variant) -> Result<()> {
        self.check_writable()?;
        if index > self.items.len() {
            return Err(Error::custom(format!(
                "index {} out of bounds (len {})",
                index,
                self.items.len()
            )));
        }
        self.items.insert(index, value);
        Ok(())
    }

    /// Replaces the value at `index` and returns the previous one.
    pub fn set(&mut self, index: usize, value: Variant) -> Result<Variant> {
        self.check_writable()?;
        let len = self.items.len();
        match self.items.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(Error::custom(format!(
                "index {} out of bounds (len {})",
                index, len
            ))),
        }
    }

    /// Removes and returns the value at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Variant> {
        self.check_writable()?;
        if index >= self.items.len() {
            return Err(Error::custom(format!(
                "index {} out of bounds (len {})",
                index,
                self.items.len()
            )));
        }
        Ok(self.items.remove(index))
    }

    /// Removes every element.
    pub fn clear(&mut self) -> Result<()> {
        self.check_writable()?;
        self.items.clear();
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Variant> {
        self.items.get(index)
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<Option<&mut Variant>> {
        self.check_writable()?;
        Ok(self.items.get_mut(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if this list rejects mutation.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Variant] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variant> {
        self.items.iter()
    }
}

/// Structural equality over the elements; the read-only flag is not compared.
impl PartialEq for VariantList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl From<Vec<Variant>> for VariantList {
    fn from(items: Vec<Variant>) -> Self {
        VariantList {
            items,
            read_only: false,
        }
    }
}

impl From<VariantList> for Vec<Variant> {
    fn from(list: VariantList) -> Self {
        list.items
    }
}

impl IntoIterator for VariantList {
    type Item = Variant;
    type IntoIter = std::vec::IntoIter<Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a VariantList {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Variant> for VariantList {
    fn from_iter<T: IntoIterator<Item = Variant>>(iter: T) -> Self {
        VariantList::from(iter.into_iter().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain_preserves_order() {
        let mut list = VariantList::new();
        list.add(1).unwrap().add("a").unwrap().add(1).unwrap();
        let kinds: Vec<_> = list.iter().map(Variant::kind).collect();
        assert_eq!(
            kinds,
            vec![crate::Kind::Int, crate::Kind::String, crate::Kind::Int]
        );
    }

    #[test]
    fn test_frozen_list_rejects_mutation() {
        let mut list = VariantList::frozen();
        assert!(matches!(list.add(1), Err(Error::ReadOnly)));
        assert!(matches!(list.clear(), Err(Error::ReadOnly)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_set_and_remove() {
        let mut list: VariantList = vec![Variant::from(1), Variant::from(2)].into();
        let old = list.set(0, Variant::from("x")).unwrap();
        assert_eq!(old, Variant::Int(1));
        assert_eq!(list.remove(1).unwrap(), Variant::Int(2));
        assert_eq!(list.len(), 1);
        assert!(list.remove(5).is_err());
    }

    #[test]
    fn test_equality_ignores_read_only_flag() {
        let mut a: VariantList = vec![Variant::from(1)].into();
        let b = a.clone();
        a.set_read_only(true);
        assert_eq!(a, b);
    }
}
