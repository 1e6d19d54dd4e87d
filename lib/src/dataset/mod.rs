//! Dataset abstractions for training.
//!
//! A [`Dataset`] hands out `(X, y)` pairs: `X` is a feature matrix of shape
//! `(n_samples, n_features)` and `y` a target vector of shape `(n_samples,)`.
//! Batches are addressed by sample index, so the trainer can walk the data in
//! a fresh shuffled order every epoch without copying the dataset.
//!
//! # Example
//!
//! ```rust
//! use horsepower_regression::dataset::{Dataset, InMemoryDataset};
//! use horsepower_regression::backend::CpuBackend;
//!
//! let x = vec![vec![1.0], vec![2.0], vec![3.0]];
//! let y = vec![0.0, 1.0, 2.0];
//! let dataset = InMemoryDataset::new(x, y).unwrap();
//!
//! for batch in dataset.batches_in_order::<CpuBackend>(2, vec![2, 0, 1]) {
//!     let (x_batch, y_batch) = batch.unwrap();
//!     assert_eq!(x_batch.rows(), y_batch.len());
//! }
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use std::{fmt::Debug, ops::Range};

pub mod memory;
pub use self::memory::InMemoryDataset;

/// Abstract interface for a training dataset.
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Returns the total number of samples in the dataset, if known.
    fn len(&self) -> Option<usize>;

    /// Checks whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Loads the given samples, in the given order, as tensors.
    ///
    /// # Errors
    /// Implementations return `Err` for out-of-range indices.
    fn get_indexed<B: Backend>(
        &self,
        indices: &[usize],
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error>;

    /// Loads a contiguous range of samples.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        let indices: Vec<usize> = range.collect();
        self.get_indexed(&indices)
    }

    /// Iterates over consecutive batches in storage order.
    ///
    /// The last batch may be smaller than `batch_size`. Yields nothing when
    /// the length is unknown.
    fn batches<B: Backend>(&self, batch_size: usize) -> DatasetBatchIter<'_, B, Self>
    where
        Self: Sized,
    {
        let order = (0..self.len().unwrap_or(0)).collect();
        self.batches_in_order(batch_size, order)
    }

    /// Iterates over batches following `order`, a list of sample indices.
    fn batches_in_order<B: Backend>(
        &self,
        batch_size: usize,
        order: Vec<usize>,
    ) -> DatasetBatchIter<'_, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size: batch_size.max(1),
            order,
            current: 0,
            _backend: std::marker::PhantomData,
        }
    }
}

/// Iterator over dataset batches.
///
/// Created by [`Dataset::batches`] or [`Dataset::batches_in_order`]. Data is
/// fetched lazily on each `next()`; errors from the dataset are yielded as
/// `Some(Err(e))`.
pub struct DatasetBatchIter<'a, B: Backend, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    order: Vec<usize>,
    /// Position in `order` of the next sample to yield.
    current: usize,
    _backend: std::marker::PhantomData<B>,
}

impl<'a, B: Backend, D: ?Sized> DatasetBatchIter<'a, B, D> {
    /// Number of batches not yet yielded.
    pub fn remaining(&self) -> usize {
        (self.order.len() - self.current).div_ceil(self.batch_size)
    }
}

impl<'a, B: Backend, D: Dataset> Iterator for DatasetBatchIter<'a, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor1D<B>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.order.len() {
            return None;
        }

        let end = (self.current + self.batch_size).min(self.order.len());
        let indices = &self.order[self.current..end];
        self.current = end;

        Some(self.dataset.get_indexed::<B>(indices))
    }
}
