//! Area reduction: one mean per time step over the masked cells.

use ndarray::{ArrayView2, ArrayView3, Axis};

use crate::error::{ProcessorError, Result};

/// Mean of the masked cells at every time step.
///
/// The 2-D mask applies to every time step. Non-finite cells are absent:
/// they are left out of both the sum and the count. A time step with no
/// valid masked cell yields `None`, as does every step when the mask
/// selects nothing.
pub fn reduce_mean(data: ArrayView3<f32>, mask: ArrayView2<bool>) -> Result<Vec<Option<f64>>> {
    let (_, lat_len, lon_len) = data.dim();
    if mask.dim() != (lat_len, lon_len) {
        return Err(ProcessorError::MaskShape {
            mask: mask.dim(),
            data: (lat_len, lon_len),
        });
    }

    let selected: Vec<(usize, usize)> = mask
        .indexed_iter()
        .filter(|(_, &inside)| inside)
        .map(|(idx, _)| idx)
        .collect();

    let series = data
        .axis_iter(Axis(0))
        .map(|step| {
            let (sum, count) = selected
                .iter()
                .map(|&idx| step[idx])
                .filter(|value| value.is_finite())
                .fold((0.0f64, 0usize), |(sum, count), value| {
                    (sum + value as f64, count + 1)
                });

            (count > 0).then(|| sum / count as f64)
        })
        .collect();

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Array3};

    #[test]
    fn test_mean_over_masked_cells() {
        let data = array![[[1.0f32, 2.0], [3.0, 100.0]], [[5.0, 6.0], [7.0, 100.0]]];
        let mask = array![[true, true], [true, false]];

        let series = reduce_mean(data.view(), mask.view()).unwrap();
        assert_eq!(series, vec![Some(2.0), Some(6.0)]);
    }

    #[test]
    fn test_absent_cells_ignored() {
        let data = array![[[25.0f32, f32::NAN]]];
        let mask = array![[true, true]];
        assert_eq!(reduce_mean(data.view(), mask.view()).unwrap(), vec![Some(25.0)]);
    }

    #[test]
    fn test_all_absent_step_is_missing() {
        let data = array![[[f32::NAN, f32::NAN]], [[1.0, 3.0]]];
        let mask = array![[true, true]];
        assert_eq!(
            reduce_mean(data.view(), mask.view()).unwrap(),
            vec![None, Some(2.0)]
        );
    }

    #[test]
    fn test_empty_mask_is_missing_everywhere() {
        let data = Array3::<f32>::from_elem((3, 2, 2), 20.0);
        let mask = Array2::from_elem((2, 2), false);
        assert_eq!(
            reduce_mean(data.view(), mask.view()).unwrap(),
            vec![None, None, None]
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let data = Array3::<f32>::zeros((1, 2, 3));
        let mask = Array2::from_elem((3, 2), true);
        assert!(matches!(
            reduce_mean(data.view(), mask.view()),
            Err(ProcessorError::MaskShape { .. })
        ));
    }

    #[test]
    fn test_no_time_steps() {
        let data = Array3::<f32>::zeros((0, 2, 2));
        let mask = Array2::from_elem((2, 2), true);
        assert!(reduce_mean(data.view(), mask.view()).unwrap().is_empty());
    }
}
