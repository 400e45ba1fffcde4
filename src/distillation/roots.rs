//! 직선과 평형곡선의 교점 계산에 쓰는 근 찾기 도구.
//! 닫힌 해(2차 방정식)를 우선 사용하고, 실패하면 구간 이분법으로 보완한다.

const DEGENERATE_EPS: f64 = 1e-12;

/// 근 허용오차 (조성 단위)
pub const ROOT_TOL: f64 = 1e-12;
/// 이분법 최대 반복 횟수
pub const BISECT_MAX_ITER: usize = 200;

/// a·x² + b·x + c = 0 의 실근을 오름차순으로 반환한다.
///
/// `a`가 0에 가까우면 1차식으로 처리한다. 근이 없으면 빈 벡터.
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < DEGENERATE_EPS {
        if b.abs() < DEGENERATE_EPS {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        // 반올림 오차로 살짝 음수가 된 중근은 살린다
        if disc > -DEGENERATE_EPS * b.abs().max(1.0) {
            return vec![-b / (2.0 * a)];
        }
        return Vec::new();
    }
    let sqrt_disc = disc.sqrt();
    // 소거 오차를 피하는 형태의 근의 공식
    let q = -0.5 * (b + b.signum() * sqrt_disc);
    let mut roots = if q.abs() < DEGENERATE_EPS {
        vec![-b / (2.0 * a)]
    } else {
        vec![q / a, c / q]
    };
    roots.sort_by(|l, r| l.total_cmp(r));
    roots.dedup_by(|l, r| (*l - *r).abs() < DEGENERATE_EPS);
    roots
}

/// [lo, hi] 구간에서 부호가 바뀌는 f의 근을 이분법으로 찾는다.
///
/// 양 끝의 부호가 같으면 `None`. 반복 횟수는 `max_iter`로 제한된다.
pub fn bisect<F>(f: F, mut lo: f64, mut hi: f64, tol: f64, max_iter: usize) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if !f_lo.is_finite() || !f_hi.is_finite() {
        return None;
    }
    if f_lo == 0.0 {
        return Some(lo);
    }
    if f_hi == 0.0 {
        return Some(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return None;
    }
    for _ in 0..max_iter {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 || (hi - lo) < tol {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}
