use core::cmp::Ordering;

/// A three-way comparison over `T`.
///
/// Every ordering decision a tree makes flows through its comparator,
/// including how "missing" values sort. Closures of the form
/// `Fn(&T, &T) -> Ordering` implement this trait directly.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use osavl_tree::{Comparator, NaturalOrder, Reversed};
///
/// assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
/// assert_eq!(Reversed(NaturalOrder).compare(&1, &2), Ordering::Greater);
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert_eq!(by_len.compare(&"abc", &"de"), Ordering::Greater);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders values by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<T: ?Sized + Ord> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts the ordering of the wrapped comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Whether a container admits more than one entry with an equal key.
///
/// Maps carry one policy for keys and an independent one for values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Cardinality {
    /// Equal keys are rejected.
    #[default]
    Distinct,
    /// Equal keys are stored side by side.
    Duplicate,
}

impl Cardinality {
    /// Returns `true` if equal keys are permitted.
    #[must_use]
    pub const fn allows_duplicates(self) -> bool {
        matches!(self, Cardinality::Duplicate)
    }
}
