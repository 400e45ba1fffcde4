//! McCabe-Thiele 작도(Murphree 효율 반영)로 이론단수와 최적 원료단을 계산한다.
//!
//! 평형곡선과 조작선 사이를 번갈아 이동하며 탑정 조성(xd)에서 탑저 조성(xb)까지
//! 계단을 내려간다. 그리기는 하지 않고 계단 좌표와 요약 값만 반환하며,
//! 그림은 [`crate::plot`]이 결과를 받아 처리한다.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::equilibrium::Equilibrium;
use super::feed_line::FeedLine;
use super::operating_line::OperatingLine;

/// 계단 수 상한. 넘으면 수렴 실패로 본다.
pub const MAX_STAGES: usize = 100;

/// 이 비율 미만의 R_factor는 핀치 근처라 단수가 급격히 늘어난다.
const NEAR_PINCH_FACTOR: f64 = 1.05;

const STALL_EPS: f64 = 1e-12;

/// McCabe-Thiele 계산 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    /// R_factor ≤ 1 이거나 최소 환류비가 정의되지 않음
    #[error("환류비 오류: {reason} (R_factor={r_factor})")]
    InvalidReflux { r_factor: f64, reason: &'static str },
    /// 0 < xb < xf < xd < 1 이 아님
    #[error("조성 오류: xb={xb}, xf={xf}, xd={xd} (0 < xb < xf < xd < 1 이어야 합니다)")]
    InvalidComposition { xb: f64, xf: f64, xd: f64 },
    /// Murphree 효율이 (0, 1] 밖
    #[error("Murphree 효율은 0 초과 1 이하여야 합니다: nm={nm}")]
    InvalidEfficiency { nm: f64 },
    /// 증기압이 0 이하
    #[error("증기압은 0보다 커야 합니다: Pa={pa_vap}, Pb={pb_vap}")]
    InvalidVapourPressure { pa_vap: f64, pb_vap: f64 },
    /// NaN 또는 무한대 입력
    #[error("유한한 숫자가 아닙니다: {name}={value}")]
    NonFiniteInput { name: &'static str, value: f64 },
    /// 상한 단수 안에 xb에 도달하지 못함
    #[error("{stages}단 안에 탑저 조성에 도달하지 못했습니다 (마지막 x={last_x:.5})")]
    NonConvergence { stages: usize, last_x: f64 },
}

/// 증류탑 설계 입력값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    /// 경질 성분 a의 증기압 (b와 같은 단위)
    pub pa_vap: f64,
    /// 중질 성분 b의 증기압
    pub pb_vap: f64,
    /// 실제 환류비 = R_factor × Rmin
    pub r_factor: f64,
    /// 원료 조성
    pub xf: f64,
    /// 탑정 조성
    pub xd: f64,
    /// 탑저 조성
    pub xb: f64,
    /// 원료 액분율
    pub q: f64,
    /// Murphree 효율 (0, 1]
    pub nm: f64,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            pa_vap: 179.2,
            pb_vap: 74.3,
            r_factor: 1.3,
            xf: 0.5,
            xd: 0.975,
            xb: 0.025,
            q: 0.5,
            nm: 0.75,
        }
    }
}

impl ColumnSpec {
    /// 입력 전제 조건을 검사한다.
    pub fn validate(&self) -> Result<(), StageError> {
        let named = [
            ("pa_vap", self.pa_vap),
            ("pb_vap", self.pb_vap),
            ("r_factor", self.r_factor),
            ("xf", self.xf),
            ("xd", self.xd),
            ("xb", self.xb),
            ("q", self.q),
            ("nm", self.nm),
        ];
        if let Some(&(name, value)) = named.iter().find(|(_, v)| !v.is_finite()) {
            return Err(StageError::NonFiniteInput { name, value });
        }
        if self.pa_vap <= 0.0 || self.pb_vap <= 0.0 {
            return Err(StageError::InvalidVapourPressure {
                pa_vap: self.pa_vap,
                pb_vap: self.pb_vap,
            });
        }
        if !(self.nm > 0.0 && self.nm <= 1.0) {
            return Err(StageError::InvalidEfficiency { nm: self.nm });
        }
        let ordered = 0.0 < self.xb && self.xb < self.xf && self.xf < self.xd && self.xd < 1.0;
        if !ordered {
            return Err(self.composition_error());
        }
        if self.r_factor <= 1.0 {
            return Err(StageError::InvalidReflux {
                r_factor: self.r_factor,
                reason: "R_factor는 1보다 커야 합니다",
            });
        }
        Ok(())
    }

    fn composition_error(&self) -> StageError {
        StageError::InvalidComposition {
            xb: self.xb,
            xf: self.xf,
            xd: self.xd,
        }
    }
}

/// 계단 한 단이 어느 조작선에서 출발했는지.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    Rectifying,
    Stripping,
}

/// 계단 한 단. (x_from, y) → (x_to, y) 수평 이동 후 (x_to, y) → (x_to, y_next) 수직 이동.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// 1부터 시작하는 단 번호 (탑정 기준)
    pub number: usize,
    pub section: Section,
    pub x_from: f64,
    /// 이 단을 떠나는 증기 조성
    pub y: f64,
    /// 이 단을 떠나는 액 조성
    pub x_to: f64,
    /// 다음 단의 증기 조성 (조작선 위)
    pub y_next: f64,
}

/// McCabe-Thiele 계산 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct McCabeThieleResult {
    pub spec: ColumnSpec,
    pub equilibrium: Equilibrium,
    pub feed_line: FeedLine,
    /// q-선과 평형곡선의 교점
    pub pinch: (f64, f64),
    pub min_reflux_ratio: f64,
    pub reflux_ratio: f64,
    pub rectifying: OperatingLine,
    pub stripping: OperatingLine,
    /// 정류부 조작선과 q-선의 교점
    pub pivot: (f64, f64),
    pub stages: Vec<Stage>,
    /// 조작선이 정류부에서 탈거부로 바뀐 단 번호
    pub feed_stage: usize,
    /// 계단이 실제로 도달한 탑저 조성 (xb 이하)
    pub xb_actual: f64,
}

impl McCabeThieleResult {
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Rmin에서의 정류부 조작선. (xd, xd)와 핀치점을 지난다.
    pub fn min_reflux_line(&self) -> OperatingLine {
        OperatingLine::rectifying(self.min_reflux_ratio, self.spec.xd)
    }

    /// x에서 유효한 조작선 (피벗 위는 정류부, 아래는 탈거부).
    pub fn operating_line_at(&self, x: f64) -> &OperatingLine {
        if x > self.pivot.0 {
            &self.rectifying
        } else {
            &self.stripping
        }
    }

    /// xb_actual~xd 구간의 Murphree 유사평형 곡선 (x, y) 목록.
    pub fn murphree_curve(&self, points: usize) -> Vec<(f64, f64)> {
        let lo = self.xb_actual.min(self.spec.xb).max(0.0);
        let hi = self.spec.xd;
        super::equilibrium::linspace(points)
            .map(|t| {
                let x = lo + t * (hi - lo);
                let y_op = self.operating_line_at(x).y_at(x);
                (x, self.equilibrium.y_murphree(x, y_op, self.spec.nm))
            })
            .collect()
    }
}

/// 계단 작도를 한 단씩 진행하는 상태.
#[derive(Debug, Clone)]
pub struct StageStepper {
    equilibrium: Equilibrium,
    rectifying: OperatingLine,
    stripping: OperatingLine,
    pivot_x: f64,
    nm: f64,
    x: f64,
    y: f64,
    section: Section,
    number: usize,
}

impl StageStepper {
    /// (xd, xd)에서 정류부 조작선으로 시작한다.
    pub fn new(
        equilibrium: Equilibrium,
        rectifying: OperatingLine,
        stripping: OperatingLine,
        pivot_x: f64,
        xd: f64,
        nm: f64,
    ) -> Self {
        Self {
            equilibrium,
            rectifying,
            stripping,
            pivot_x,
            nm,
            x: xd,
            y: xd,
            section: Section::Rectifying,
            number: 0,
        }
    }

    fn active_line(&self) -> &OperatingLine {
        match self.section {
            Section::Rectifying => &self.rectifying,
            Section::Stripping => &self.stripping,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// 한 단을 내려간다. 액 조성이 줄지 않으면 수렴 실패.
    pub fn step(&mut self) -> Result<Stage, StageError> {
        let stall = StageError::NonConvergence {
            stages: self.number,
            last_x: self.x,
        };
        let started_in = self.section;
        let x_to = self
            .equilibrium
            .step_liquid_composition(self.y, self.active_line(), self.nm, self.x)
            .filter(|x| x.is_finite() && *x < self.x - STALL_EPS)
            .ok_or(stall)?;

        if self.section == Section::Rectifying && x_to <= self.pivot_x {
            self.section = Section::Stripping;
        }
        let y_next = self.active_line().y_at(x_to);
        self.number += 1;

        let stage = Stage {
            number: self.number,
            section: started_in,
            x_from: self.x,
            y: self.y,
            x_to,
            y_next,
        };
        self.x = x_to;
        self.y = y_next;
        Ok(stage)
    }
}

/// McCabe-Thiele 작도를 수행해 단수, 원료단, 실제 환류비를 계산한다.
pub fn compute_mccabe_thiele(spec: ColumnSpec) -> Result<McCabeThieleResult, StageError> {
    spec.validate()?;

    let equilibrium = Equilibrium::from_vapour_pressures(spec.pa_vap, spec.pb_vap);
    let feed_line = FeedLine::new(spec.q, spec.xf);

    let pinch = feed_line
        .intersect_equilibrium(&equilibrium, spec.xf)
        .ok_or(StageError::InvalidReflux {
            r_factor: spec.r_factor,
            reason: "q-선과 평형곡선의 교점이 없습니다",
        })?;
    let min_reflux_ratio = (spec.xd - pinch.1) / (pinch.1 - pinch.0);
    if !(min_reflux_ratio.is_finite() && min_reflux_ratio > 0.0) {
        return Err(StageError::InvalidReflux {
            r_factor: spec.r_factor,
            reason: "최소 환류비가 양수가 아닙니다",
        });
    }
    let reflux_ratio = spec.r_factor * min_reflux_ratio;
    if spec.r_factor < NEAR_PINCH_FACTOR {
        warn!(
            r_factor = spec.r_factor,
            "R이 Rmin에 매우 가깝습니다. 단수가 크게 늘어날 수 있습니다"
        );
    }

    let rectifying = OperatingLine::rectifying(reflux_ratio, spec.xd);
    let pivot = feed_line
        .intersect_line(&rectifying)
        .ok_or(StageError::InvalidReflux {
            r_factor: spec.r_factor,
            reason: "정류부 조작선이 q-선과 평행합니다",
        })?;
    if pivot.0 <= spec.xb || pivot.0 >= spec.xd {
        return Err(spec.composition_error());
    }
    let stripping =
        OperatingLine::through((spec.xb, spec.xb), pivot).ok_or(spec.composition_error())?;
    debug!(
        alpha = equilibrium.relative_volatility,
        pinch_x = pinch.0,
        pinch_y = pinch.1,
        pivot_x = pivot.0,
        pivot_y = pivot.1,
        "조작선 구성 완료"
    );

    let mut stepper = StageStepper::new(
        equilibrium,
        rectifying,
        stripping,
        pivot.0,
        spec.xd,
        spec.nm,
    );
    let mut stages = Vec::new();
    let mut feed_stage = None;
    while stages.len() < MAX_STAGES {
        let stage = stepper.step()?;
        debug!(
            stage = stage.number,
            x = stage.x_to,
            y = stage.y,
            "단 계산"
        );
        if feed_stage.is_none() && stepper.section() == Section::Stripping {
            feed_stage = Some(stage.number);
        }
        let reached = stage.x_to <= spec.xb;
        stages.push(stage);
        if reached {
            break;
        }
    }

    let last = stages.last().copied();
    let (feed_stage, xb_actual) = match (feed_stage, last) {
        (Some(feed), Some(last)) if last.x_to <= spec.xb => (feed, last.x_to),
        _ => {
            return Err(StageError::NonConvergence {
                stages: stages.len(),
                last_x: last.map_or(spec.xd, |s| s.x_to),
            })
        }
    };

    info!(
        stages = stages.len(),
        feed_stage,
        r_min = min_reflux_ratio,
        r = reflux_ratio,
        xb_actual,
        "McCabe-Thiele 계산 완료"
    );

    Ok(McCabeThieleResult {
        spec,
        equilibrium,
        feed_line,
        pinch,
        min_reflux_ratio,
        reflux_ratio,
        rectifying,
        stripping,
        pivot,
        stages,
        feed_stage,
        xb_actual,
    })
}
