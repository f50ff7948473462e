//! Trial-stacked data, i.e., matrices with one trial per row and one time bin per column.
use nalgebra::DMatrix;

use crate::core::raster::Raster;
use crate::error::RasterError;

/// A conversion into a (trials x time bins) matrix of real values.
///
/// A single series is treated as one trial. A collection of rows must have the same number of bins in every row,
/// otherwise the conversion fails with [`RasterError::ShapeMismatch`].
pub trait IntoTrials {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError>;
}

/// Stacks rows of equal length into a matrix.
pub fn stack_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<DMatrix<f64>, RasterError> {
    let num_bins = rows.first().map_or(0, |row| row.as_ref().len());
    if let Some((i, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.as_ref().len() != num_bins)
    {
        return Err(RasterError::ShapeMismatch(format!(
            "trial {} has {} bins while trial 0 has {}",
            i,
            row.as_ref().len(),
            num_bins
        )));
    }
    Ok(DMatrix::from_fn(rows.len(), num_bins, |i, j| rows[i].as_ref()[j]))
}

/// Returns the given trial (row) as a vector.
pub fn row_to_vec(trials: &DMatrix<f64>, i: usize) -> Vec<f64> {
    trials.row(i).iter().copied().collect()
}

/// Stacks filtered rows back into a matrix with `num_bins` columns.
pub(crate) fn from_rows(rows: Vec<Vec<f64>>, num_bins: usize) -> DMatrix<f64> {
    let num_trials = rows.len();
    DMatrix::from_row_iterator(num_trials, num_bins, rows.into_iter().flatten())
}

fn counts_to_rows<R: AsRef<[usize]>>(rows: &[R]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| row.as_ref().iter().map(|&c| c as f64).collect())
        .collect()
}

impl IntoTrials for DMatrix<f64> {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        Ok(self)
    }
}

impl IntoTrials for &DMatrix<f64> {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        Ok(self.clone())
    }
}

impl IntoTrials for DMatrix<usize> {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        (&self).into_trials()
    }
}

impl IntoTrials for &DMatrix<usize> {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        Ok(self.map(|c| c as f64))
    }
}

impl IntoTrials for &[f64] {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        Ok(DMatrix::from_row_slice(1, self.len(), self))
    }
}

impl IntoTrials for &Vec<f64> {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        self.as_slice().into_trials()
    }
}

impl IntoTrials for &[usize] {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        Ok(DMatrix::from_fn(1, self.len(), |_, j| self[j] as f64))
    }
}

impl IntoTrials for &[Vec<f64>] {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        stack_rows(self)
    }
}

impl IntoTrials for &Vec<Vec<f64>> {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        stack_rows(self)
    }
}

impl IntoTrials for &[Vec<usize>] {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        stack_rows(&counts_to_rows(self))
    }
}

impl IntoTrials for &Vec<Vec<usize>> {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        self.as_slice().into_trials()
    }
}

impl IntoTrials for &Raster {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        self.counts().into_trials()
    }
}

impl IntoTrials for &[Raster] {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        let rows: Vec<&[usize]> = self.iter().map(|raster| raster.counts()).collect();
        stack_rows(&counts_to_rows(&rows))
    }
}

impl IntoTrials for &Vec<Raster> {
    fn into_trials(self) -> Result<DMatrix<f64>, RasterError> {
        self.as_slice().into_trials()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::raster::rasterize;

    #[test]
    fn test_stack_rows() {
        let trials = stack_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(trials.shape(), (2, 3));
        assert_eq!(trials[(0, 2)], 3.0);
        assert_eq!(trials[(1, 0)], 4.0);
        assert_eq!(row_to_vec(&trials, 1), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_stack_ragged_rows() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0], vec![6.0, 7.0, 8.0]];
        assert_eq!(
            (&rows).into_trials(),
            Err(RasterError::ShapeMismatch(
                "trial 1 has 2 bins while trial 0 has 3".to_string()
            ))
        );
    }

    #[test]
    fn test_single_series_is_one_trial() {
        let series = vec![1.0, 2.0, 3.0, 4.0];
        let trials = (&series).into_trials().unwrap();
        assert_eq!(trials.shape(), (1, 4));
        assert_eq!(row_to_vec(&trials, 0), series);
    }

    #[test]
    fn test_counts_into_trials() {
        let counts = DMatrix::from_row_slice(2, 2, &[1_usize, 0, 2, 3]);
        let trials = (&counts).into_trials().unwrap();
        assert_eq!(trials, DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 2.0, 3.0]));

        let rasters = vec![
            rasterize(&[0.5], 0.0, 2.0, 1.0).unwrap(),
            rasterize(&[1.5, 1.6], 0.0, 2.0, 1.0).unwrap(),
        ];
        let trials = rasters.as_slice().into_trials().unwrap();
        assert_eq!(trials, DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 2.0]));
        assert_eq!((&rasters).into_trials().unwrap(), trials);

        let rows = vec![vec![1_usize, 0], vec![0, 2]];
        assert_eq!((&rows).into_trials().unwrap(), trials);
        assert_eq!(rows.as_slice().into_trials().unwrap(), trials);
        let ragged_rows = vec![vec![1_usize, 0], vec![2]];
        assert!(matches!(
            (&ragged_rows).into_trials(),
            Err(RasterError::ShapeMismatch(_))
        ));

        let ragged = vec![
            rasterize(&[0.5], 0.0, 2.0, 1.0).unwrap(),
            rasterize(&[0.5], 0.0, 3.0, 1.0).unwrap(),
        ];
        assert!(matches!(
            ragged.as_slice().into_trials(),
            Err(RasterError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_from_rows() {
        let trials = from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]], 2);
        assert_eq!(trials.shape(), (3, 2));
        assert_eq!(trials[(2, 1)], 6.0);
        assert_eq!(trials[(1, 0)], 3.0);
    }
}
