use {
    crate::{FrontendError, Result},
    ndarray::{Array, Array2, Array3, ArrayView2, Axis, Dimension, Ix2},
};

/// Copies row `i` of `unit_features` into `counts[i]` consecutive rows. A zero count
/// emits nothing for that unit.
pub fn expand_and_align(unit_features: ArrayView2<f32>, counts: &[usize]) -> Result<Array2<f32>> {
    let (num_rows, num_cols) = unit_features.dim();
    if num_rows != counts.len() {
        return Err(FrontendError::shape_mismatch(
            "expand_and_align",
            &[counts.len(), num_cols],
            &[num_rows, num_cols],
        ));
    }

    let total_phones = counts.iter().sum();
    let mut result = Array2::zeros((total_phones, num_cols));
    let mut row_offset = 0;

    for (src_row, &count) in unit_features.rows().into_iter().zip(counts) {
        for k in 0..count {
            result.row_mut(row_offset + k).assign(&src_row);
        }
        row_offset += count;
    }

    Ok(result)
}

/// `[P, D]` -> `[1, D, P]`, laid out contiguously.
pub fn transpose_with_batch<D: Dimension>(features: &Array<f32, D>) -> Result<Array3<f32>> {
    if features.ndim() != 2 {
        return Err(FrontendError::shape_mismatch(
            "transpose_with_batch",
            &[2],
            &[features.ndim()],
        ));
    }

    let view = features.view().into_dimensionality::<Ix2>()?;
    Ok(view
        .t()
        .insert_axis(Axis(0))
        .as_standard_layout()
        .into_owned())
}

/// All-zero `[1, dim, len]` tensor for the feature channel the active mode leaves unused.
pub fn placeholder(dim: usize, len: usize) -> Array3<f32> {
    Array3::zeros((1, dim, len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn, array};

    #[test]
    fn test_expand_and_align() {
        let units = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let expanded = expand_and_align(units.view(), &[2, 0, 3]).unwrap();

        assert_eq!(expanded.dim(), (5, 2));
        assert_eq!(expanded.row(0), units.row(0));
        assert_eq!(expanded.row(1), units.row(0));
        for r in 2..5 {
            assert_eq!(expanded.row(r), units.row(2));
        }
    }

    #[test]
    fn test_expand_length_mismatch() {
        let units = Array2::<f32>::zeros((2, 4));
        let err = expand_and_align(units.view(), &[1, 1, 1]).unwrap_err();
        match err {
            FrontendError::ShapeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, [3, 4]);
                assert_eq!(actual, [2, 4]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_transpose_round_trip() {
        let units = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let expanded = expand_and_align(units.view(), &[2, 1]).unwrap();
        let batched = transpose_with_batch(&expanded).unwrap();

        assert_eq!(batched.dim(), (1, 3, 3));
        for p in 0..3 {
            for d in 0..3 {
                assert_eq!(batched[[0, d, p]], expanded[[p, d]]);
            }
        }
        assert!(batched.is_standard_layout());

        let back = batched.index_axis(Axis(0), 0).t().to_owned();
        assert_eq!(back, expanded);
    }

    #[test]
    fn test_transpose_rejects_other_ranks() {
        let cube = ArrayD::<f32>::zeros(IxDyn(&[1, 2, 3]));
        assert!(matches!(
            transpose_with_batch(&cube),
            Err(FrontendError::ShapeMismatch { .. })
        ));

        let flat = ArrayD::<f32>::zeros(IxDyn(&[4]));
        assert!(transpose_with_batch(&flat).is_err());

        let dynamic_2d = ArrayD::<f32>::ones(IxDyn(&[2, 5]));
        assert_eq!(transpose_with_batch(&dynamic_2d).unwrap().dim(), (1, 5, 2));
    }

    #[test]
    fn test_placeholder() {
        let z = placeholder(1024, 7);
        assert_eq!(z.dim(), (1, 1024, 7));
        assert!(z.iter().all(|&v| v == 0.0));
    }
}
