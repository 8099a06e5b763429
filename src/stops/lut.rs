//! LUT interpolation between color stops.
//!
//! The input is an `(R, C)` table whose first column is a monotonically
//! non-decreasing list of positions from 0 to 1 and whose remaining columns
//! are the values to interpolate (r, g, b, a for a color LUT). The output
//! is an `(N, C-1)` table of values sampled along the gradient.

use ndarray::{Array1, Array2, Axis};

use crate::error::{ChromapError, Result};

/// Interpolate an `(R, C)` stop table to an `(N, C-1)` LUT.
///
/// Stops are padded so positions 0.0 and 1.0 both exist (duplicating the
/// boundary value if needed). `gamma` bends the *sampling positions*, not
/// the values: the LUT is sampled at `linspace(0, 1, N) ** gamma`.
///
/// For `n == 1` the convention is to return the value at position 1.0.
pub(crate) fn interpolate_stops(n: usize, data: &Array2<f64>, gamma: f64) -> Result<Array2<f64>> {
    let cols = data.ncols();
    if cols < 2 {
        return Err(ChromapError::UnsupportedInput {
            message: format!("stop table must have at least 2 columns, got {}", cols),
        });
    }

    let padded = pad_to_unit_range(data);
    let rows = padded.nrows();
    let x: Vec<f64> = padded.column(0).to_vec();
    let values = padded.slice(ndarray::s![.., 1..]);

    if x.windows(2).any(|w| w[1] < w[0]) {
        return Err(ChromapError::StopOrder);
    }

    let mut lut = Array2::zeros((n.max(1), cols - 1));
    if n <= 1 {
        lut.row_mut(0).assign(&values.row(rows - 1));
    } else {
        // scale stop positions into LUT-index space
        let scale = (n - 1) as f64;
        let x: Vec<f64> = x.iter().map(|p| p * scale).collect();
        lut.row_mut(0).assign(&values.row(0));
        lut.row_mut(n - 1).assign(&values.row(rows - 1));

        // interior samples at gamma-bent positions, located via binary search
        for i in 1..n - 1 {
            let xind = (i as f64 / scale).powf(gamma) * scale;
            let ind = x.partition_point(|&p| p < xind).clamp(1, rows - 1);
            let frac = (xind - x[ind - 1]) / (x[ind] - x[ind - 1]);
            let start = values.row(ind - 1);
            let end = values.row(ind);
            for c in 0..cols - 1 {
                lut[(i, c)] = start[c] + frac * (end[c] - start[c]);
            }
        }
    }

    lut.mapv_inplace(|v| v.clamp(0.0, 1.0));
    Ok(lut)
}

/// Add control rows at positions 0.0 and 1.0 when the table does not reach
/// the edges, copying the first/last value row.
fn pad_to_unit_range(data: &Array2<f64>) -> Array2<f64> {
    let mut out = data.to_owned();
    if out.nrows() == 0 {
        return out;
    }
    if out[(0, 0)] != 0.0 {
        let mut row = out.row(0).to_owned();
        row[0] = 0.0;
        out = ndarray::concatenate(Axis(0), &[row.insert_axis(Axis(0)).view(), out.view()])
            .expect("row widths match");
    }
    let last = out.nrows() - 1;
    if out[(last, 0)] != 1.0 {
        let mut row = out.row(last).to_owned();
        row[0] = 1.0;
        out = ndarray::concatenate(Axis(0), &[out.view(), row.insert_axis(Axis(0)).view()])
            .expect("row widths match");
    }
    out
}

/// Evenly spaced values from 0 to 1 inclusive.
pub(crate) fn unit_linspace(n: usize) -> Array1<f64> {
    if n <= 1 {
        return Array1::from_elem(n, 0.0);
    }
    Array1::linspace(0.0, 1.0, n)
}
