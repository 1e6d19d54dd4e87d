use super::Backend;

/// Pure-Rust CPU backend: `Vec<f64>` vectors and row-major matrices.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major matrix storage: `(data, rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.iter().map(|&x| f(x)).collect(), self.1, self.2)
    }

    fn zip_rows(&self, v: &[f64], f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(v.len(), self.2, "Broadcast vector must match column count");
        let data = self
            .0
            .iter()
            .enumerate()
            .map(|(i, &x)| f(x, v[i % self.2]))
            .collect();
        Self(data, self.1, self.2)
    }

    fn fold_cols(&self, init: f64, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        let mut acc = vec![init; self.2];
        for (i, &x) in self.0.iter().enumerate() {
            let col = i % self.2;
            acc[col] = f(acc[col], x);
        }
        acc
    }
}

impl From<&[Vec<f64>]> for CpuTensor2D {
    fn from(x: &[Vec<f64>]) -> Self {
        if x.is_empty() {
            return CpuTensor2D::new(Vec::new(), 0, 0);
        }
        let rows = x.len();
        let cols = x[0].len();
        assert!(
            x.iter().all(|row| row.len() == cols),
            "All rows must have same length"
        );
        let data: Vec<f64> = x.iter().flat_map(|row| row.iter()).copied().collect();
        CpuTensor2D::new(data, rows, cols)
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.; rows * cols], rows, cols)
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }

    fn column_2d(t: &Self::Tensor1D) -> Self::Tensor2D {
        CpuTensor2D::new(t.clone(), t.len(), 1)
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a.iter().zip(b.iter()).map(|(a, b)| a + b).collect()
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a.iter().zip(b.iter()).map(|(a, b)| a * b).collect()
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        t.map(|x| x + s)
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>()
    }

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    fn ravel_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.clone()
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        let CpuTensor2D(data, rows, cols) = a;
        assert_eq!(*cols, x.len(), "matvec: column count must match vector length");
        (0..*rows)
            .map(|i| {
                data[i * cols..(i + 1) * cols]
                    .iter()
                    .zip(x.iter())
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        let CpuTensor2D(data, rows, cols) = a;
        assert_eq!(*rows, x.len(), "matvec_transposed: row count must match vector length");
        let mut out = vec![0.0; *cols];
        for (i, xi) in x.iter().enumerate() {
            for (j, o) in out.iter_mut().enumerate() {
                *o += data[i * cols + j] * xi;
            }
        }
        out
    }

    fn outer(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor2D {
        let data = a
            .iter()
            .flat_map(|&ai| b.iter().map(move |&bj| ai * bj))
            .collect();
        CpuTensor2D::new(data, a.len(), b.len())
    }

    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.fold_cols(f64::INFINITY, f64::min)
    }

    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.fold_cols(f64::NEG_INFINITY, f64::max)
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.zip_rows(v, |x, c| x - c)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.zip_rows(v, |x, c| x / c)
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.zip_rows(v, |x, c| x * c)
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.zip_rows(v, |x, c| x + c)
    }

    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D {
        let cols = t.2;
        let data = rows
            .iter()
            .flat_map(|&r| t.0[r * cols..(r + 1) * cols].iter().copied())
            .collect();
        CpuTensor2D::new(data, rows.len(), cols)
    }
}
