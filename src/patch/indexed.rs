//! Generic random-access dataset interface.

use std::iter::FusedIterator;

use crate::error::DatasetError;

/// A dataset that can be sized and read by position.
///
/// This is the surface samplers and loaders program against; they pick
/// indices in `0..len()` and call [`get`](Self::get) for each.
pub trait IndexedDataset {
    /// Item produced by one retrieval.
    type Item;

    /// Number of items.
    fn len(&self) -> usize;

    /// Retrieve the item at `index`.
    fn get(&self, index: usize) -> Result<Self::Item, DatasetError>;

    /// Returns true if the dataset holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterator over every index of an [`IndexedDataset`], in order.
///
/// Failed retrievals are yielded as `Err` and iteration continues with the
/// next index.
#[derive(Debug)]
pub struct DatasetIter<'a, D: ?Sized> {
    dataset: &'a D,
    next: usize,
    end: usize,
}

impl<'a, D: IndexedDataset + ?Sized> DatasetIter<'a, D> {
    pub fn new(dataset: &'a D) -> Self {
        Self {
            dataset,
            next: 0,
            end: dataset.len(),
        }
    }
}

impl<'a, D: IndexedDataset + ?Sized> Iterator for DatasetIter<'a, D> {
    type Item = Result<D::Item, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.dataset.get(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl<'a, D: IndexedDataset + ?Sized> DoubleEndedIterator for DatasetIter<'a, D> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(self.dataset.get(self.end))
    }
}

impl<'a, D: IndexedDataset + ?Sized> ExactSizeIterator for DatasetIter<'a, D> {}

impl<'a, D: IndexedDataset + ?Sized> FusedIterator for DatasetIter<'a, D> {}
