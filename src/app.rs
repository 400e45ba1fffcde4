use crate::config::{self, ConfigError};
use crate::distillation::{self, McCabeThieleResult, StageError};
use crate::plot::{self, PlotError};
use crate::report::{Report, ReportError};
use crate::ui_cli::{self, Cli};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 단 계산 오류
    #[error("McCabe-Thiele 계산 오류: {0}")]
    Stage(#[from] StageError),
    /// 그림 저장 오류
    #[error("그림 출력 오류: {0}")]
    Plot(#[from] PlotError),
    /// 리포트 저장 오류
    #[error("리포트 오류: {0}")]
    Report(#[from] ReportError),
}

/// 설정을 읽고 계산한 뒤 요약, 그림, 리포트를 출력한다.
pub fn run(cli: &Cli) -> Result<McCabeThieleResult, AppError> {
    let cfg = config::load_or_default(&cli.config)?;
    let spec = cli.column_spec(&cfg);
    tracing::debug!(?spec, config = %cli.config.display(), "입력 확정");

    let result = distillation::compute_mccabe_thiele(spec)?;

    ui_cli::print_summary(&result);
    if cli.stages {
        ui_cli::print_stage_table(&result);
    }
    if !cli.no_plot {
        plot::save_plot(&result, &cli.plot_settings(&cfg))?;
    }
    if let Some(path) = &cli.report {
        Report::from(&result).save(path)?;
        tracing::info!(path = %path.display(), "리포트 저장");
    }
    Ok(result)
}
