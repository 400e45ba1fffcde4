//! 정류부/탈거부 조작선.

use serde::{Deserialize, Serialize};

/// y = slope·x + intercept 형태의 직선 조작선.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingLine {
    pub slope: f64,
    pub intercept: f64,
}

impl OperatingLine {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// 환류비 R에서의 정류부 조작선. (xd, xd)를 지난다.
    pub fn rectifying(reflux_ratio: f64, xd: f64) -> Self {
        Self::new(reflux_ratio / (reflux_ratio + 1.0), xd / (reflux_ratio + 1.0))
    }

    /// 두 점을 지나는 직선. x좌표가 같으면 `None`.
    pub fn through(p1: (f64, f64), p2: (f64, f64)) -> Option<Self> {
        let dx = p2.0 - p1.0;
        if dx.abs() < 1e-12 {
            return None;
        }
        let slope = (p2.1 - p1.1) / dx;
        Some(Self::new(slope, p1.1 - slope * p1.0))
    }

    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// 다른 직선과의 교점. 평행이면 `None`.
    pub fn intersect(&self, other: &OperatingLine) -> Option<(f64, f64)> {
        let dm = self.slope - other.slope;
        if dm.abs() < 1e-12 {
            return None;
        }
        let x = (other.intercept - self.intercept) / dm;
        Some((x, self.y_at(x)))
    }
}
