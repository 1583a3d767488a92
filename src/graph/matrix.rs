//! Dense square matrix used for the sentence graph
//!
//! Topics hold at most a few hundred eligible sentences, so the similarity
//! and transition matrices are stored densely in row-major order. Row access
//! is contiguous, which is what row normalization and the transposed
//! matrix-vector product in power iteration both walk.

/// A dense n x n matrix in row-major order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    /// Create an n x n matrix of zeros
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Create from nested rows; every row must have `rows.len()` entries
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let n = rows.len();
        if rows.iter().any(|r| r.len() != n) {
            return None;
        }
        Some(Self {
            n,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.n..(i + 1) * self.n]
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.n.max(1))
    }

    /// Sum of each row
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(|r| r.iter().sum()).collect()
    }

    /// Number of non-zero entries
    pub fn num_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    /// Check `M == Mᵀ` within `tolerance`
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.n).all(|i| {
            ((i + 1)..self.n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }

    /// Normalize every row to sum to 1
    ///
    /// A zero row is replaced by a self-loop, so the result is always
    /// row-stochastic. Returns the number of rows that were replaced.
    pub fn normalize_rows(&mut self) -> usize {
        let mut replaced = 0;
        for i in 0..self.n {
            let row = self.row_mut(i);
            let sum: f64 = row.iter().sum();
            if sum > 0.0 {
                for v in row.iter_mut() {
                    *v /= sum;
                }
            } else {
                row.fill(0.0);
                row[i] = 1.0;
                replaced += 1;
            }
        }
        replaced
    }

    /// Compute `Mᵀ · v`
    pub fn transpose_mul(&self, v: &[f64], out: &mut [f64]) {
        out.fill(0.0);
        for (row, &weight) in self.rows().zip(v.iter()) {
            if weight == 0.0 {
                continue;
            }
            for (o, &m) in out.iter_mut().zip(row.iter()) {
                *o += m * weight;
            }
        }
    }
}
