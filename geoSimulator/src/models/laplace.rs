//! Numerical inverse Laplace transforms used by the fracture-flow reservoir models.

use std::f64::consts::{LN_2, PI};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::config::constants::{
    STEHFEST_TERMS, TALBOT_C1, TALBOT_C2, TALBOT_C3, TALBOT_C4, TALBOT_NODES,
};
use crate::config::options::LaplaceInversionMethod;

/// Inverts `F(s)` at each requested time. Times `<= 0` map to exactly 0.
pub trait LaplaceInversion: Send + Sync {
    fn name(&self) -> &'static str;

    fn invert_at(&self, f: &(dyn Fn(Complex64) -> Complex64 + Sync), t: f64) -> f64;

    fn invert(&self, f: &(dyn Fn(Complex64) -> Complex64 + Sync), times: &[f64]) -> Vec<f64> {
        times.par_iter().map(|&t| self.invert_at(f, t)).collect()
    }
}

pub fn inversion_for(method: LaplaceInversionMethod) -> Box<dyn LaplaceInversion> {
    match method {
        LaplaceInversionMethod::Talbot => Box::new(Talbot::default()),
        LaplaceInversionMethod::Stehfest => Box::new(Stehfest::new()),
    }
}

/// Gaver-Stehfest method with fixed real weights.
#[derive(Debug, Clone)]
pub struct Stehfest {
    weights: Vec<f64>,
}

impl Stehfest {
    pub fn new() -> Self {
        Self::with_terms(STEHFEST_TERMS)
    }

    /// `terms` must be even.
    pub fn with_terms(terms: usize) -> Self {
        let half = terms / 2;
        let weights = (0..terms)
            .map(|i| {
                let k_min = (i + 2) / 2;
                let k_max = (i + 1).min(half);
                let sum: f64 = (k_min..=k_max)
                    .map(|k| {
                        (k as f64).powi(half as i32) / factorial(k) * factorial(2 * k)
                            / factorial(2 * k - i - 1)
                            / factorial(half - k)
                            / factorial(k - 1)
                            / factorial(i + 1 - k)
                    })
                    .sum();
                let sign = if (half + i + 1) % 2 == 0 { 1.0 } else { -1.0 };
                sign * sum
            })
            .collect();
        Self { weights }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Default for Stehfest {
    fn default() -> Self {
        Self::new()
    }
}

impl LaplaceInversion for Stehfest {
    fn name(&self) -> &'static str {
        "Stehfest"
    }

    fn invert_at(&self, f: &(dyn Fn(Complex64) -> Complex64 + Sync), t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let ln2t = LN_2 / t;
        let sum: f64 = self
            .weights
            .iter()
            .enumerate()
            .map(|(i, w)| w * f(Complex64::new(ln2t * (i + 1) as f64, 0.0)).re)
            .sum();
        ln2t * sum
    }
}

/// Fixed Talbot contour with trapezoidal quadrature on midpoint nodes.
#[derive(Debug, Clone)]
pub struct Talbot {
    nodes: usize,
    shift: f64,
}

impl Talbot {
    pub fn new(nodes: usize, shift: f64) -> Self {
        Self { nodes, shift }
    }
}

impl Default for Talbot {
    fn default() -> Self {
        Self::new(TALBOT_NODES, 0.0)
    }
}

impl LaplaceInversion for Talbot {
    fn name(&self) -> &'static str {
        "Talbot"
    }

    fn invert_at(&self, f: &(dyn Fn(Complex64) -> Complex64 + Sync), t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let n = self.nodes as f64;
        let h = 2.0 * PI / n;
        let c4 = Complex64::new(0.0, TALBOT_C4);
        let scale = n / t;

        let mut sum = Complex64::new(0.0, 0.0);
        for k in 0..self.nodes {
            let theta = -PI + (k as f64 + 0.5) * h;
            let cot = 1.0 / (TALBOT_C2 * theta).tan();
            let z = self.shift + scale * (TALBOT_C1 * theta * cot - TALBOT_C3 + c4 * theta);
            let dz = scale
                * (-TALBOT_C1 * TALBOT_C2 * theta / (TALBOT_C2 * theta).sin().powi(2)
                    + TALBOT_C1 * cot
                    + c4);
            sum += (z * t).exp() * f(z) * dz;
        }

        (h / (2.0 * PI * Complex64::i()) * sum).re
    }
}

fn factorial(n: usize) -> f64 {
    (2..=n).fold(1.0, |acc, i| acc * i as f64)
}
