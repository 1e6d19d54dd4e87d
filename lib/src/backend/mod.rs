//! # Backend Abstraction
//!
//! This module provides a trait-based abstraction over computation backends,
//! so the pipeline can run on the pure-Rust CPU implementation or on
//! `ndarray` without changes to model or training code.
//!
//! ## Design Philosophy
//!
//! - **Minimal trait surface**: only the operations the regression pipeline needs
//!   (element-wise arithmetic, mat-vec products, column reductions and row gathers).
//! - **Zero-cost generics**: backend selection happens at compile time via type parameters.
//! - **Type-safe tensor handling**: each backend defines its own storage, wrapped by
//!   [`Tensor1D`], [`Tensor2D`] and [`Scalar`] which carry the backend as a phantom type.
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Use Case                          |
//! |------------------|-----------|-----------------------------------|
//! | `CpuBackend`     | always    | Default, pure-Rust implementation |
//! | `NdarrayBackend` | `ndarray` | Interop with `ndarray` ecosystem  |
//!
//! ## Example
//!
//! ```rust
//! use horsepower_regression::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0], 3, 1);
//! let w: Tensor1D<CpuBackend> = Tensor1D::new(vec![0.5]);
//!
//! let y = x.dot(&w);
//! assert_eq!(y.to_vec(), vec![0.5, 1.0, 1.5]);
//! ```

mod cpu;
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
pub use ndarray_backend::{NdarrayBackend, NdarrayTensor2D};

/// Backend-typed scalar wrapper.
pub mod scalar;
/// Backend-typed 1D tensor wrapper.
pub mod tensor1d;
/// Backend-typed 2D tensor wrapper.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

use std::fmt::Debug;

/// Core abstraction for computation backends.
///
/// Tensors are row-major. Host data enters and leaves as `f64`; the backend is
/// free to pick its own storage. Shape mismatches are programmer errors and
/// panic inside the backend; shape checks that depend on user data are done
/// by the callers and reported as typed errors.
pub trait Backend: Clone + Copy + Debug + Send + Sync + 'static {
    /// Native scalar type.
    type Scalar: ScalarOps;
    /// Native 1D tensor storage.
    type Tensor1D: Clone + Debug + Send + Sync;
    /// Native 2D tensor storage.
    type Tensor2D: Clone + Debug + Send + Sync;

    // --- Constructors ---

    /// Creates a zero-filled vector of length `len`.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a zero-filled `rows x cols` matrix.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Creates a vector from host values.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Creates a matrix from row-major host values.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    /// Wraps a vector as an `(n, 1)` column matrix.
    fn column_2d(t: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Element-wise ops ---

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;
    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D;

    // --- Reductions ---

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Mean of all elements. Empty input yields NaN.
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    // --- Scalar / access ---

    fn scalar_f64(value: f64) -> Self::Scalar;
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Row-major host copy of a matrix.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    fn len_1d(t: &Self::Tensor1D) -> usize;
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    /// Flattens a matrix into a vector in row-major order.
    fn ravel_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    // --- Linear algebra ---

    /// `A @ x` for `A: (m, n)`, `x: (n,)`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// `A^T @ x` for `A: (m, n)`, `x: (m,)`.
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Outer product `a b^T`, shape `(len(a), len(b))`.
    fn outer(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Column-wise operations ---

    /// Per-column minimum. Zero rows yields `+inf` per column.
    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Per-column maximum. Zero rows yields `-inf` per column.
    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Subtracts `v[j]` from every element of column `j`.
    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// Divides every element of column `j` by `v[j]`.
    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// Multiplies every element of column `j` by `v[j]`.
    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// Adds `v[j]` to every element of column `j`.
    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Indexing ---

    /// Gathers rows by index into a new matrix, in the order given.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D;
}
