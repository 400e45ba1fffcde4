//! 상대휘발도 기반 기액평형 관계와 Murphree 효율 보정.
//!
//! 모든 조성은 경질(휘발성이 큰) 성분 a의 몰분율이며 [0, 1] 범위이다.

use serde::{Deserialize, Serialize};

use super::operating_line::OperatingLine;
use super::roots::{bisect, quadratic_roots, BISECT_MAX_ITER, ROOT_TOL};

/// 일정 상대휘발도(α)로 표현한 이성분계 평형 관계.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    /// 상대휘발도 α = Pa_vap / Pb_vap
    pub relative_volatility: f64,
}

impl Equilibrium {
    pub fn new(relative_volatility: f64) -> Self {
        Self {
            relative_volatility,
        }
    }

    /// 두 순성분의 증기압으로부터 α를 구한다 (Raoult + Dalton).
    /// 두 압력은 같은 단위이기만 하면 된다.
    pub fn from_vapour_pressures(pa_vap: f64, pb_vap: f64) -> Self {
        Self::new(pa_vap / pb_vap)
    }

    /// 평형 증기 조성 y* = αx / (1 + (α−1)x).
    pub fn y_eq(&self, x: f64) -> f64 {
        let alpha = self.relative_volatility;
        alpha * x / (1.0 + (alpha - 1.0) * x)
    }

    /// Murphree 증기 효율을 반영한 유사평형 조성.
    ///
    /// `y_op`는 같은 x에서의 조작선 값이며, nm = 1이면 y*와 같다.
    pub fn y_murphree(&self, x: f64, y_op: f64, nm: f64) -> f64 {
        y_op + nm * (self.y_eq(x) - y_op)
    }

    /// 평형곡선의 역함수. y*(x) = y 를 만족하는 x.
    pub fn x_eq(&self, y: f64) -> f64 {
        let alpha = self.relative_volatility;
        y / (alpha - (alpha - 1.0) * y)
    }

    /// 조작선 `line` 기준 유사평형 곡선에서 증기 조성 `y`에 해당하는 액 조성을 구한다.
    ///
    /// 계단 작도의 수평 이동에 해당하며, `x_upper`(현재 액 조성) 이하의 근 중
    /// 가장 큰 값을 반환한다. 해가 없으면 `None`.
    pub fn step_liquid_composition(
        &self,
        y: f64,
        line: &OperatingLine,
        nm: f64,
        x_upper: f64,
    ) -> Option<f64> {
        // 효율 100%면 유사평형 곡선이 평형곡선 자체이다
        if (nm - 1.0).abs() < f64::EPSILON {
            let x = self.x_eq(y);
            return (x >= -ROOT_TOL && x <= x_upper + ROOT_TOL).then(|| x.max(0.0));
        }

        let beta = self.relative_volatility - 1.0;
        let k = 1.0 - nm;
        let (m, c) = (line.slope, line.intercept);

        // (1−nm)·L(x)·(1+βx) + nm·αx − y·(1+βx) = 0 를 전개한 2차식
        let a = k * m * beta;
        let b = k * (m + c * beta) + nm * self.relative_volatility - y * beta;
        let c0 = k * c - y;

        let closed_form = quadratic_roots(a, b, c0)
            .into_iter()
            .filter(|x| *x >= -ROOT_TOL && *x <= x_upper + ROOT_TOL)
            .fold(None, |best: Option<f64>, x| match best {
                Some(prev) if prev >= x => Some(prev),
                _ => Some(x),
            });
        if let Some(x) = closed_form {
            return Some(x.max(0.0));
        }

        let residual = |x: f64| self.y_murphree(x, line.y_at(x), nm) - y;
        bisect(residual, 0.0, x_upper, ROOT_TOL, BISECT_MAX_ITER)
    }

    /// 0~1 구간을 `points`개로 나눈 평형곡선 (x, y*) 목록.
    pub fn sample_curve(&self, points: usize) -> Vec<(f64, f64)> {
        linspace(points).map(|x| (x, self.y_eq(x))).collect()
    }
}

/// 0~1 사이 균등 분할 점.
pub fn linspace(points: usize) -> impl Iterator<Item = f64> {
    let n = points.max(2);
    (0..n).map(move |i| i as f64 / (n - 1) as f64)
}
