use ndarray::{Array1, Array2, Axis};

use super::Backend;

/// Backend built on `ndarray` arrays.
#[derive(Clone, Debug, Copy)]
pub struct NdarrayBackend;

#[derive(Debug, Clone, PartialEq)]
pub struct NdarrayTensor2D(pub Array2<f64>);

impl Backend for NdarrayBackend {
    type Scalar = f64;
    type Tensor1D = Array1<f64>;
    type Tensor2D = NdarrayTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        NdarrayTensor2D(Array2::zeros((rows, cols)))
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        Array1::from_vec(data)
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        NdarrayTensor2D(
            Array2::from_shape_vec((rows, cols), data).expect("shape checked above"),
        )
    }

    fn column_2d(t: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(t.clone().insert_axis(Axis(1)))
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a + b
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a - b
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a * b
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t * *s
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t + *s
    }

    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 + *s)
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum()
    }

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.mean().unwrap_or(f64::NAN)
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.iter().copied().collect()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        t.0.dim()
    }

    fn ravel_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.iter().copied().collect()
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        a.0.dot(x)
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        a.0.t().dot(x)
    }

    fn outer(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor2D {
        let col = a.view().insert_axis(Axis(1));
        let row = b.view().insert_axis(Axis(0));
        NdarrayTensor2D(&col * &row)
    }

    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.fold_axis(Axis(0), f64::INFINITY, |acc, &x| acc.min(x))
    }

    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &x| acc.max(x))
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 - &v.view().insert_axis(Axis(0)))
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 / &v.view().insert_axis(Axis(0)))
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 * &v.view().insert_axis(Axis(0)))
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 + &v.view().insert_axis(Axis(0)))
    }

    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D {
        NdarrayTensor2D(t.0.select(Axis(0), rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn both(data: Vec<f64>, rows: usize, cols: usize) -> (NdarrayTensor2D, Vec<f64>) {
        let nd = NdarrayBackend::from_vec_2d(data.clone(), rows, cols);
        (nd, data)
    }

    #[test]
    fn test_matvec_matches_cpu() {
        let (nd, flat) = both(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        let cpu = CpuBackend::from_vec_2d(flat, 3, 2);
        let v = vec![1.0, 0.0, 2.0];

        let nd_out = NdarrayBackend::matvec_transposed(&nd, &Array1::from_vec(v.clone()));
        let cpu_out = CpuBackend::matvec_transposed(&cpu, &v);
        assert_eq!(nd_out.to_vec(), cpu_out);
    }

    #[test]
    fn test_column_and_ravel() {
        let v = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        let col = NdarrayBackend::column_2d(&v);
        assert_eq!(NdarrayBackend::shape(&col), (3, 1));
        assert_eq!(NdarrayBackend::ravel_2d(&col), v);
    }

    #[test]
    fn test_col_min_max() {
        let (t, _) = both(vec![3.0, 1.0, 1.0, 5.0, 2.0, 3.0], 3, 2);
        assert_eq!(NdarrayBackend::col_min_2d(&t).to_vec(), vec![1.0, 1.0]);
        assert_eq!(NdarrayBackend::col_max_2d(&t).to_vec(), vec![3.0, 5.0]);
    }

    #[test]
    fn test_select_rows() {
        let (t, _) = both(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        let picked = NdarrayBackend::select_rows_2d(&t, &[2, 0]);
        assert_eq!(NdarrayBackend::to_vec_2d(&picked), vec![5.0, 6.0, 1.0, 2.0]);
    }

    #[test]
    fn test_outer() {
        let a = Array1::from_vec(vec![1.0, 2.0]);
        let b = Array1::from_vec(vec![3.0]);
        let out = NdarrayBackend::outer(&a, &b);
        assert_eq!(NdarrayBackend::to_vec_2d(&out), vec![3.0, 6.0]);
    }
}
