use super::scalar::Scalar;
use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed row-major 2D tensor.
#[derive(Clone, Debug)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    pub(crate) fn wrap(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Creates a matrix from row-major host values.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self::wrap(B::from_vec_2d(data, rows, cols))
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::wrap(B::zeros_2d(rows, cols))
    }

    /// Shapes a vector as an `(n, 1)` column.
    pub fn from_column(column: &Tensor1D<B>) -> Self {
        Self::wrap(B::column_2d(&column.data))
    }

    /// `self @ v`.
    pub fn dot(&self, v: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::wrap(B::matvec(&self.data, &v.data))
    }

    /// `self^T @ v`.
    pub fn tdot(&self, v: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::wrap(B::matvec_transposed(&self.data, &v.data))
    }

    /// Outer product `a b^T`.
    pub fn outer(a: &Tensor1D<B>, b: &Tensor1D<B>) -> Self {
        Self::wrap(B::outer(&a.data, &b.data))
    }

    pub fn add_scalar(&self, s: &Scalar<B>) -> Self {
        Self::wrap(B::add_scalar_2d(&self.data, &s.data))
    }

    pub fn col_min(&self) -> Tensor1D<B> {
        Tensor1D::wrap(B::col_min_2d(&self.data))
    }

    pub fn col_max(&self) -> Tensor1D<B> {
        Tensor1D::wrap(B::col_max_2d(&self.data))
    }

    pub fn sub_rows(&self, v: &Tensor1D<B>) -> Self {
        Self::wrap(B::broadcast_sub_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn div_rows(&self, v: &Tensor1D<B>) -> Self {
        Self::wrap(B::broadcast_div_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn mul_rows(&self, v: &Tensor1D<B>) -> Self {
        Self::wrap(B::broadcast_mul_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn add_rows(&self, v: &Tensor1D<B>) -> Self {
        Self::wrap(B::broadcast_add_1d_to_2d_rows(&self.data, &v.data))
    }

    /// Copies the given rows, in order, into a new matrix.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self::wrap(B::select_rows_2d(&self.data, rows))
    }

    /// Row-major flattening.
    pub fn ravel(&self) -> Tensor1D<B> {
        Tensor1D::wrap(B::ravel_2d(&self.data))
    }

    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    pub fn rows(&self) -> usize {
        self.shape().0
    }

    /// Row-major host copy.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor2d_matvec_ops() {
        // A = [[1, 2], [3, 4]]
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = Tensor1D::<CpuBackend>::new(vec![1.0, 0.0]);

        assert_eq!(a.dot(&x).to_vec(), vec![1.0, 3.0]);
        assert_eq!(a.tdot(&x).to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_tensor2d_shape() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0], 3, 1);
        assert_eq!(t.shape(), (3, 1));

        let t2 = Tensor2D::<CpuBackend>::zeros(0, 5);
        assert_eq!(t2.shape(), (0, 5));
    }

    #[test]
    fn test_column_roundtrip() {
        let v = Tensor1D::<CpuBackend>::new(vec![4.0, 5.0]);
        let col = Tensor2D::from_column(&v);
        assert_eq!(col.shape(), (2, 1));
        assert_eq!(col.ravel().to_vec(), v.to_vec());
    }

    #[test]
    fn test_row_broadcasts() {
        let t = Tensor2D::<CpuBackend>::new(vec![2.0, 4.0, 6.0], 3, 1);
        let min = t.col_min();
        let range = t.col_max().sub(&min);
        let scaled = t.sub_rows(&min).div_rows(&range);
        assert_eq!(scaled.to_vec(), vec![0.0, 0.5, 1.0]);

        let back = scaled.mul_rows(&range).add_rows(&min);
        assert_eq!(back.to_vec(), t.to_vec());
    }

    #[test]
    fn test_outer_shape() {
        let a = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![2.0]);
        let o = Tensor2D::outer(&a, &b);
        assert_eq!(o.shape(), (3, 1));
        assert_eq!(o.to_vec(), vec![2.0, 4.0, 6.0]);
    }
}
