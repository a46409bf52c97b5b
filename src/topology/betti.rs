//! Betti Numbers: Topological Invariants
//!
//! The k-th Betti number βₖ counts the number of k-dimensional
//! "holes" in a topological space:
//!
//! - β₀: Number of connected components (atom clusters)
//! - β₁: Number of 1-dimensional loops (channels)
//! - β₂: Number of 2-dimensional voids (cages)
//!
//! Read off a persistence diagram, βₖ(r) is the number of k-dimensional
//! pairs with birth ≤ r < death.

use super::PersistenceDiagram;

/// Betti numbers at a specific filtration value
#[derive(Debug, Clone, PartialEq)]
pub struct BettiNumbers {
    /// βₖ for k = 0..=max_dim
    pub betti: Vec<usize>,
    /// Filtration scale
    pub epsilon: f64,
}

impl BettiNumbers {
    /// Betti numbers of the diagram at scale `epsilon`
    pub fn at(pd: &PersistenceDiagram, epsilon: f64) -> Self {
        let betti = (0..=pd.max_dim()).map(|d| pd.betti_at(d, epsilon)).collect();
        Self { betti, epsilon }
    }

    pub fn beta(&self, d: usize) -> usize {
        self.betti.get(d).copied().unwrap_or(0)
    }

    /// Total topological complexity
    pub fn total(&self) -> usize {
        self.betti.iter().sum()
    }

    /// Euler characteristic χ = β₀ - β₁ + β₂ - ...
    pub fn euler_characteristic(&self) -> i64 {
        self.betti
            .iter()
            .enumerate()
            .map(|(d, &b)| if d % 2 == 0 { b as i64 } else { -(b as i64) })
            .sum()
    }
}

/// Betti curve: Betti numbers sampled on a uniform grid of scales
#[derive(Debug, Clone)]
pub struct BettiCurve {
    pub values: Vec<BettiNumbers>,
}

impl BettiCurve {
    /// Sample `n_steps + 1` scales from 0 to `r_max` inclusive
    pub fn sample(pd: &PersistenceDiagram, r_max: f64, n_steps: usize) -> Self {
        let n_steps = n_steps.max(1);
        let values = (0..=n_steps)
            .map(|step| BettiNumbers::at(pd, r_max * step as f64 / n_steps as f64))
            .collect();
        Self { values }
    }

    /// (scale, βd) pairs
    pub fn curve(&self, d: usize) -> Vec<(f64, usize)> {
        self.values.iter().map(|b| (b.epsilon, b.beta(d))).collect()
    }

    /// Area under the βd curve (trapezoidal rule)
    pub fn integrated(&self, d: usize) -> f64 {
        if self.values.len() < 2 {
            return 0.0;
        }

        let mut integral = 0.0;
        for i in 1..self.values.len() {
            let de = self.values[i].epsilon - self.values[i - 1].epsilon;
            let avg = (self.values[i].beta(d) + self.values[i - 1].beta(d)) as f64 / 2.0;
            integral += de * avg;
        }
        integral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::PersistencePair;

    fn toy_diagram() -> PersistenceDiagram {
        PersistenceDiagram::from_pairs(
            1,
            vec![
                PersistencePair::new(0, 0.0, 1.0),
                PersistencePair::new(0, 0.0, 2.0),
                PersistencePair::essential(0, 0.0),
                PersistencePair::new(1, 1.5, 3.0),
            ],
        )
    }

    #[test]
    fn test_betti_at_scale() {
        let b = BettiNumbers::at(&toy_diagram(), 1.5);
        assert_eq!(b.betti, vec![2, 1]);
        assert_eq!(b.total(), 3);
        assert_eq!(b.euler_characteristic(), 1);
    }

    #[test]
    fn test_curve_and_integral() {
        let curve = BettiCurve::sample(&toy_diagram(), 4.0, 4);
        let beta0: Vec<usize> = curve.curve(0).iter().map(|&(_, b)| b).collect();
        assert_eq!(beta0, vec![3, 2, 1, 1, 1]);
        // β₁ is 1 on [1.5, 3): sampled at 2 only
        assert_eq!(curve.curve(1)[2], (2.0, 1));
        assert!((curve.integrated(1) - 1.0).abs() < 1e-12);
    }
}
