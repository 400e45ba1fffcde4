use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::distillation::{ColumnSpec, FeedLine, McCabeThieleResult, Section};
use crate::plot::PlotSettings;

/// McCabe-Thiele 작도(Murphree 효율 반영)로 이성분 증류탑의 단수와 원료단을 계산한다.
///
/// 지정하지 않은 값은 설정 파일의 `[column]`/`[plot]` 값을 사용한다.
#[derive(Parser, Debug, Clone)]
#[command(name = "distillation_toolbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// 설정 파일 경로 (없으면 기본값으로 생성)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// 성분 a(경질)의 증기압
    #[arg(long)]
    pub pa_vap: Option<f64>,

    /// 성분 b(중질)의 증기압
    #[arg(long)]
    pub pb_vap: Option<f64>,

    /// R = R_factor × Rmin
    #[arg(long)]
    pub r_factor: Option<f64>,

    /// 원료 조성
    #[arg(long)]
    pub xf: Option<f64>,

    /// 탑정 조성
    #[arg(long)]
    pub xd: Option<f64>,

    /// 탑저 조성
    #[arg(long)]
    pub xb: Option<f64>,

    /// 원료 액분율 (1 = 포화액)
    #[arg(short, long, allow_negative_numbers = true)]
    pub q: Option<f64>,

    /// Murphree 효율
    #[arg(long)]
    pub nm: Option<f64>,

    /// PNG 저장 경로
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 그림을 저장하지 않는다
    #[arg(long)]
    pub no_plot: bool,

    /// TOML 리포트 저장 경로
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// 단별 좌표 표를 출력한다
    #[arg(long)]
    pub stages: bool,

    /// q-선을 핀치점까지 그린다
    #[arg(long)]
    pub full_feed_line: bool,

    /// Rmin 조작선을 그린다
    #[arg(long)]
    pub min_reflux_line: bool,

    /// 디버그 로그 출력
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 설정값 위에 명령행 인자를 덮어쓴 설계 입력.
    pub fn column_spec(&self, cfg: &Config) -> ColumnSpec {
        let base = cfg.column;
        ColumnSpec {
            pa_vap: self.pa_vap.unwrap_or(base.pa_vap),
            pb_vap: self.pb_vap.unwrap_or(base.pb_vap),
            r_factor: self.r_factor.unwrap_or(base.r_factor),
            xf: self.xf.unwrap_or(base.xf),
            xd: self.xd.unwrap_or(base.xd),
            xb: self.xb.unwrap_or(base.xb),
            q: self.q.unwrap_or(base.q),
            nm: self.nm.unwrap_or(base.nm),
        }
    }

    pub fn plot_settings(&self, cfg: &Config) -> PlotSettings {
        let mut settings = cfg.plot.clone();
        if let Some(out) = &self.output {
            settings.output = out.clone();
        }
        settings.show_full_feed_line |= self.full_feed_line;
        settings.show_min_reflux_line |= self.min_reflux_line;
        settings
    }
}

/// 계산 결과 요약을 콘솔에 출력한다.
pub fn print_summary(result: &McCabeThieleResult) {
    let spec = &result.spec;
    println!("\n=== McCabe-Thiele ===");
    println!(
        "xd={}  xb={}  zf={}  q={:.3}",
        spec.xd, spec.xb, spec.xf, spec.q
    );
    println!(
        "R={}*Rmin   Murphree 효율={}",
        spec.r_factor, spec.nm
    );
    println!("상대휘발도 α: {:.3}", result.equilibrium.relative_volatility);
    match result.feed_line {
        FeedLine::Vertical { x } => println!("q-선: x = {x:.3} (포화액 원료)"),
        FeedLine::Sloped { slope, intercept } => {
            println!("q-선: y = {slope:.3}x + {intercept:.3}")
        }
    }
    println!("Rmin= {:.3}", result.min_reflux_ratio);
    println!("R= {:.3}", result.reflux_ratio);
    println!("xb actual= {:.3}", result.xb_actual);
    println!("Stages= {}", result.stage_count());
    println!("Feed Stage= {}", result.feed_stage);
}

/// 단별 좌표 표를 출력한다.
pub fn print_stage_table(result: &McCabeThieleResult) {
    println!("{:>5} {:>10} {:>10} {:>10} {:>10}", "단", "구간", "y", "x", "y_next");
    for stage in &result.stages {
        let section = match stage.section {
            Section::Rectifying => "정류부",
            Section::Stripping => "탈거부",
        };
        println!(
            "{:>5} {:>10} {:>10.4} {:>10.4} {:>10.4}",
            stage.number, section, stage.y, stage.x_to, stage.y_next
        );
    }
}
