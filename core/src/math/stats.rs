pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    pub fn mean_square(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().map(|&v| v * v).sum::<f64>() / samples.len() as f64
    }

    pub fn max_abs(samples: &[f64]) -> f64 {
        samples.iter().fold(0.0, |acc: f64, &v| acc.max(v.abs()))
    }

    /// Index of the largest magnitude; the first one wins on ties.
    pub fn argmax_abs(samples: &[f64]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &value) in samples.iter().enumerate() {
            let magnitude = value.abs();
            match best {
                Some((_, current)) if magnitude <= current => {}
                _ => best = Some((idx, magnitude)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Median with the mean of the two middle values for even lengths.
    pub fn median(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            0.5 * (sorted[mid - 1] + sorted[mid])
        } else {
            sorted[mid]
        }
    }

    /// Copy of `samples` with its mean removed.
    pub fn centered(samples: &[f64]) -> Vec<f64> {
        let mean = Self::mean(samples);
        samples.iter().map(|&v| v - mean).collect()
    }
}
