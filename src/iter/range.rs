//! Begin/end iterator pairs.

/// A snapshot pair of iterators for one forward traversal.
///
/// `begin()` and `end()` hand out copies, so advancing a copy never changes
/// the range itself. Consuming the range with `for` walks the begin iterator
/// until it reaches the end sentinel.
#[derive(Debug, Clone)]
pub struct Range<I> {
    begin: I,
    end: I,
}

impl<I: Clone> Range<I> {
    /// Create a range from a begin iterator and an end iterator
    pub fn new(begin: I, end: I) -> Self {
        Self { begin, end }
    }

    /// Copy of the begin iterator
    pub fn begin(&self) -> I {
        self.begin.clone()
    }

    /// Copy of the end iterator
    pub fn end(&self) -> I {
        self.end.clone()
    }
}

impl<I: PartialEq> Range<I> {
    /// Check if the range yields nothing (`begin() == end()`)
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl<I: Iterator> IntoIterator for Range<I> {
    type Item = I::Item;
    type IntoIter = I;

    fn into_iter(self) -> I {
        self.begin
    }
}

impl<I: Iterator + Clone> IntoIterator for &Range<I> {
    type Item = I::Item;
    type IntoIter = I;

    fn into_iter(self) -> I {
        self.begin.clone()
    }
}
