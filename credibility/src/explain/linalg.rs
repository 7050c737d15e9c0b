// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Small dense solvers for the local surrogate fits

const PIVOT_EPS: f64 = 1e-12;

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when the system is singular.
pub fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < PIVOT_EPS {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Weighted least squares without intercept: minimize `sum w (y - x.beta)^2 + alpha |beta|^2`
pub fn weighted_least_squares(x: &[Vec<f64>], y: &[f64], w: &[f64], alpha: f64) -> Option<Vec<f64>> {
    let p = x.first().map_or(0, Vec::len);
    let mut xtwx = vec![vec![0.0; p]; p];
    let mut xtwy = vec![0.0; p];

    for ((row, &target), &weight) in x.iter().zip(y).zip(w) {
        for i in 0..p {
            if row[i] == 0.0 {
                continue;
            }
            let wi = weight * row[i];
            xtwy[i] += wi * target;
            for j in i..p {
                xtwx[i][j] += wi * row[j];
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            xtwx[i][j] = xtwx[j][i];
        }
        xtwx[i][i] += alpha;
    }
    solve(xtwx, xtwy)
}

/// Linear fit with an unpenalized intercept
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeFit {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl RidgeFit {
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.intercept + row.iter().zip(&self.coef).map(|(a, b)| a * b).sum::<f64>()
    }
}

/// Weighted ridge regression; the intercept is recovered from weighted means
pub fn weighted_ridge(x: &[Vec<f64>], y: &[f64], w: &[f64], alpha: f64) -> Option<RidgeFit> {
    let total_w: f64 = w.iter().sum();
    if x.is_empty() || total_w <= 0.0 {
        return None;
    }
    let p = x[0].len();

    let mut x_mean = vec![0.0; p];
    let mut y_mean = 0.0;
    for ((row, &target), &weight) in x.iter().zip(y).zip(w) {
        for (m, v) in x_mean.iter_mut().zip(row) {
            *m += weight * v;
        }
        y_mean += weight * target;
    }
    for m in x_mean.iter_mut() {
        *m /= total_w;
    }
    y_mean /= total_w;

    let centered_x: Vec<Vec<f64>> = x
        .iter()
        .map(|row| row.iter().zip(&x_mean).map(|(v, m)| v - m).collect())
        .collect();
    let centered_y: Vec<f64> = y.iter().map(|v| v - y_mean).collect();

    let coef = weighted_least_squares(&centered_x, &centered_y, w, alpha)?;
    let intercept = y_mean - coef.iter().zip(&x_mean).map(|(c, m)| c * m).sum::<f64>();
    Some(RidgeFit { coef, intercept })
}

/// Weighted coefficient of determination
pub fn weighted_r2(fit: &RidgeFit, x: &[Vec<f64>], y: &[f64], w: &[f64]) -> f64 {
    let total_w: f64 = w.iter().sum();
    if total_w <= 0.0 {
        return 0.0;
    }
    let y_mean = y.iter().zip(w).map(|(v, wt)| v * wt).sum::<f64>() / total_w;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for ((row, &target), &weight) in x.iter().zip(y).zip(w) {
        ss_res += weight * (target - fit.predict(row)).powi(2);
        ss_tot += weight * (target - y_mean).powi(2);
    }
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
