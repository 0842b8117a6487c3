//! Mean and sample standard deviation over whole slices and trailing windows.
//!
//! Each window is evaluated with a fresh two-pass computation rather than running
//! sums, so long series accumulate no floating-point drift.

/// Mean and sample standard deviation of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    /// `None` when the window holds fewer than two observations.
    pub std_dev: Option<f64>,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with the `n - 1` (sample) divisor.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

pub fn window_stats(values: &[f64]) -> Option<WindowStats> {
    Some(WindowStats {
        mean: mean(values)?,
        std_dev: sample_std_dev(values),
    })
}

/// Statistics of the trailing `window` observations ending at each index, inclusive.
///
/// The first `window - 1` entries are `None`: the window has not filled.
pub fn rolling(values: &[f64], window: usize) -> Vec<Option<WindowStats>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|end| {
            if end + 1 < window {
                None
            } else {
                window_stats(&values[end + 1 - window..=end])
            }
        })
        .collect()
}
