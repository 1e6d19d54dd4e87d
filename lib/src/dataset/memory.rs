use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use crate::preprocessing::NormalizedData;

/// Row-major samples held in host memory.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
    n_features: usize,
}

impl InMemoryDataset {
    /// An empty `x` is accepted; the trainer rejects empty datasets itself.
    pub fn new(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self, String> {
        if x.len() != y.len() {
            return Err("x and y must have same length".into());
        }
        let n_features = x.first().map_or(1, Vec::len);
        if !x.iter().all(|row| row.len() == n_features) {
            return Err("All rows must have the same number of features".into());
        }
        Ok(Self { x, y, n_features })
    }

    /// Training set of normalized `[horsepower] -> efficiency` samples.
    pub fn from_normalized<B: Backend>(data: &NormalizedData<B>) -> Self {
        let x = data.inputs.to_vec().into_iter().map(|v| vec![v]).collect();
        Self {
            x,
            y: data.labels.to_vec(),
            n_features: 1,
        }
    }
}

impl Dataset for InMemoryDataset {
    type Error = String;

    fn len(&self) -> Option<usize> {
        Some(self.x.len())
    }

    fn get_indexed<B: Backend>(
        &self,
        indices: &[usize],
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.x.len()) {
            return Err(format!(
                "sample index {} out of range for {} samples",
                bad,
                self.x.len()
            ));
        }

        let data = indices
            .iter()
            .flat_map(|&i| self.x[i].iter().copied())
            .collect();
        let x_tensor = Tensor2D::<B>::new(data, indices.len(), self.n_features);
        let y_tensor = Tensor1D::<B>::new(indices.iter().map(|&i| self.y[i]).collect());

        Ok((x_tensor, y_tensor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::data::CleanRecord;
    use crate::preprocessing::{build_tensors, normalize};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_validates_lengths() {
        assert!(InMemoryDataset::new(vec![vec![1.0]], vec![]).is_err());
        assert!(InMemoryDataset::new(vec![vec![1.0], vec![1.0, 2.0]], vec![0.0, 1.0]).is_err());
        assert!(InMemoryDataset::new(vec![], vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_get_indexed_keeps_pairs() {
        let ds = InMemoryDataset::new(vec![vec![1.0], vec![2.0], vec![3.0]], vec![10.0, 20.0, 30.0])
            .unwrap();
        let (x, y) = ds.get_indexed::<CpuBackend>(&[2, 0]).unwrap();
        assert_eq!(x.to_vec(), vec![3.0, 1.0]);
        assert_eq!(y.to_vec(), vec![30.0, 10.0]);
    }

    #[test]
    fn test_get_indexed_out_of_range() {
        let ds = InMemoryDataset::new(vec![vec![1.0]], vec![1.0]).unwrap();
        assert!(ds.get_indexed::<CpuBackend>(&[1]).is_err());
    }

    #[test]
    fn test_from_normalized() {
        let records = vec![
            CleanRecord { horsepower: 50.0, efficiency: 15.0 },
            CleanRecord { horsepower: 150.0, efficiency: 5.0 },
        ];
        let pair = build_tensors::<CpuBackend>(&records).unwrap();
        let data = normalize(&pair, &mut StdRng::seed_from_u64(11)).unwrap();
        let ds = InMemoryDataset::from_normalized(&data);

        assert_eq!(ds.len(), Some(2));
        let (x, y) = ds.get_batch::<CpuBackend>(0..2).unwrap();
        assert_eq!(x.shape(), (2, 1));
        // horsepower and efficiency are anti-correlated, so each pair is (0, 1) or (1, 0)
        for (a, b) in x.to_vec().into_iter().zip(y.to_vec()) {
            assert_eq!(a + b, 1.0);
        }
    }
}
