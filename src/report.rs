//! 계산 결과를 TOML 리포트로 저장한다.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distillation::{ColumnSpec, McCabeThieleResult, Stage};

/// 리포트 저장 오류.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("리포트 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 요약 수치.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub relative_volatility: f64,
    pub min_reflux_ratio: f64,
    pub reflux_ratio: f64,
    pub stages: usize,
    pub feed_stage: usize,
    pub xb_actual: f64,
    pub pinch_x: f64,
    pub pinch_y: f64,
    pub pivot_x: f64,
    pub pivot_y: f64,
}

/// 입력, 요약, 단별 좌표를 모은 리포트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub input: ColumnSpec,
    pub summary: Summary,
    #[serde(rename = "stage")]
    pub stages: Vec<Stage>,
}

impl From<&McCabeThieleResult> for Report {
    fn from(result: &McCabeThieleResult) -> Self {
        Self {
            input: result.spec,
            summary: Summary {
                relative_volatility: result.equilibrium.relative_volatility,
                min_reflux_ratio: result.min_reflux_ratio,
                reflux_ratio: result.reflux_ratio,
                stages: result.stage_count(),
                feed_stage: result.feed_stage,
                xb_actual: result.xb_actual,
                pinch_x: result.pinch.0,
                pinch_y: result.pinch.1,
                pivot_x: result.pivot.0,
                pivot_y: result.pivot.1,
            },
            stages: result.stages.clone(),
        }
    }
}

impl Report {
    pub fn to_toml(&self) -> Result<String, ReportError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 리포트를 파일로 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
