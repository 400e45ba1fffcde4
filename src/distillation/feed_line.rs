//! 원료 열상태를 나타내는 q-선.

use serde::{Deserialize, Serialize};

use super::equilibrium::Equilibrium;
use super::operating_line::OperatingLine;
use super::roots::{bisect, quadratic_roots, BISECT_MAX_ITER, ROOT_TOL};

/// q-선. q = 1(포화액 원료)이면 x = xf 수직선이다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeedLine {
    /// x = xf
    Vertical { x: f64 },
    /// y = slope·x + intercept, slope = q/(q−1)
    Sloped { slope: f64, intercept: f64 },
}

impl FeedLine {
    /// 원료 조성 `xf`와 액분율 `q`로 q-선을 만든다.
    pub fn new(q: f64, xf: f64) -> Self {
        if (q - 1.0).abs() < f64::EPSILON {
            return FeedLine::Vertical { x: xf };
        }
        FeedLine::Sloped {
            slope: q / (q - 1.0),
            intercept: -xf / (q - 1.0),
        }
    }

    /// 주어진 x에서의 y. 수직선이면 `None`.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        match *self {
            FeedLine::Vertical { .. } => None,
            FeedLine::Sloped { slope, intercept } => Some(slope * x + intercept),
        }
    }

    /// 조작선과의 교점(피벗). 평행이면 `None`.
    pub fn intersect_line(&self, line: &OperatingLine) -> Option<(f64, f64)> {
        match *self {
            FeedLine::Vertical { x } => Some((x, line.y_at(x))),
            FeedLine::Sloped { slope, intercept } => {
                line.intersect(&OperatingLine::new(slope, intercept))
            }
        }
    }

    /// 평형곡선과의 교점(핀치점). 0~1 사이 근 중 xf에 가장 가까운 것을 고른다.
    pub fn intersect_equilibrium(&self, eq: &Equilibrium, xf: f64) -> Option<(f64, f64)> {
        let (slope, intercept) = match *self {
            FeedLine::Vertical { x } => return Some((x, eq.y_eq(x))),
            FeedLine::Sloped { slope, intercept } => (slope, intercept),
        };

        // (m·x + b)(1 + βx) = αx
        let beta = eq.relative_volatility - 1.0;
        let a = slope * beta;
        let b = slope + intercept * beta - eq.relative_volatility;
        let c = intercept;

        let nearest = quadratic_roots(a, b, c)
            .into_iter()
            .filter(|x| *x > 0.0 && *x < 1.0)
            .min_by(|l, r| (l - xf).abs().total_cmp(&(r - xf).abs()));
        let x = match nearest {
            Some(x) => x,
            None => {
                let gap = |x: f64| eq.y_eq(x) - (slope * x + intercept);
                bisect(gap, 0.0, xf, ROOT_TOL, BISECT_MAX_ITER)
                    .or_else(|| bisect(gap, xf, 1.0, ROOT_TOL, BISECT_MAX_ITER))?
            }
        };
        Some((x, eq.y_eq(x)))
    }
}
