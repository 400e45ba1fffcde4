//! McCabe-Thiele 선도를 PNG로 그린다.
//!
//! 계산 결과를 단위 정사각형(0~1) 좌표의 꺾은선과 글자 목록([`PlotScene`])으로 바꾼 뒤
//! `plotters`로 RGB 버퍼에 그리고, `image`로 PNG를 인코딩한다.

use std::path::PathBuf;

use image::RgbImage;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters_backend::DrawingErrorKind;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::distillation::McCabeThieleResult;

const INK: [u8; 3] = [0, 0, 0];
const GREEN_INK: [u8; 3] = [0, 128, 0];
const RED_INK: [u8; 3] = [200, 30, 30];

const FONT: &str = "sans-serif";
const DASH: u32 = 8;
const GAP: u32 = 6;

/// 그림 출력 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    /// PNG 저장 경로
    pub output: PathBuf,
    /// 곡선 샘플 점 개수
    pub curve_points: usize,
    /// q-선을 피벗에서 핀치점까지 연장해 그린다
    pub show_full_feed_line: bool,
    /// Rmin에서의 정류부 조작선을 그린다
    pub show_min_reflux_line: bool,
    /// 제목, 축 이름, 단 번호, 결과 수치를 그린다
    pub annotate: bool,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            output: PathBuf::from("mccabe_thiele.png"),
            curve_points: 100,
            show_full_feed_line: false,
            show_min_reflux_line: false,
            annotate: true,
        }
    }
}

/// 그림 출력 오류.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("그림 크기가 너무 작습니다: {width}x{height}")]
    TooSmall { width: u32, height: u32 },
    #[error("글꼴 오류: {0}")]
    Font(String),
    #[error("그리기 오류: {0}")]
    Draw(String),
    #[error("이미지 저장 오류: {0}")]
    Image(#[from] image::ImageError),
}

fn draw_error<E>(err: DrawingAreaErrorKind<E>) -> PlotError
where
    E: std::error::Error + Send + Sync,
{
    match err {
        DrawingAreaErrorKind::BackendError(DrawingErrorKind::FontError(e)) => PlotError::Font(e.to_string()),
        other => PlotError::Draw(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// 선도 좌표계(0~1)의 꺾은선 하나.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<(f64, f64)>,
    pub color: [u8; 3],
    pub style: LineStyle,
}

impl Polyline {
    fn segment(from: (f64, f64), to: (f64, f64), color: [u8; 3], style: LineStyle) -> Self {
        Self {
            points: vec![from, to],
            color,
            style,
        }
    }

    fn shape_style(&self) -> ShapeStyle {
        let [r, g, b] = self.color;
        RGBColor(r, g, b).stroke_width(1)
    }
}

/// 선도 좌표계 위치에 쓰는 글자.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub at: (f64, f64),
}

impl Label {
    fn new(text: impl Into<String>, at: (f64, f64)) -> Self {
        Self {
            text: text.into(),
            at,
        }
    }
}

/// 렌더러가 그릴 선과 글자 목록.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotScene {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub lines: Vec<Polyline>,
    pub labels: Vec<Label>,
}

impl PlotScene {
    /// 계산 결과로부터 평형곡선, 대각선, q-선, 조작선, 계단과 주석을 구성한다.
    pub fn from_result(result: &McCabeThieleResult, settings: &PlotSettings) -> Self {
        let spec = &result.spec;
        let mut lines = Vec::new();
        let solid = LineStyle::Solid;
        let dashed = LineStyle::Dashed;

        // 조성 표시선
        for x in [spec.xd, spec.xb, spec.xf] {
            lines.push(Polyline::segment((x, 0.0), (x, x), INK, dashed));
        }
        lines.push(Polyline::segment((0.0, 0.0), (1.0, 1.0), INK, solid));
        lines.push(Polyline {
            points: result.equilibrium.sample_curve(settings.curve_points),
            color: INK,
            style: solid,
        });
        lines.push(Polyline {
            points: result.murphree_curve(settings.curve_points),
            color: GREEN_INK,
            style: dashed,
        });

        lines.push(Polyline::segment((spec.xd, spec.xd), result.pivot, INK, solid));
        lines.push(Polyline::segment((spec.xb, spec.xb), result.pivot, INK, solid));
        lines.push(Polyline::segment((spec.xf, spec.xf), result.pivot, INK, solid));
        if settings.show_full_feed_line {
            lines.push(Polyline::segment(result.pivot, result.pinch, RED_INK, dashed));
        }
        if settings.show_min_reflux_line {
            let line = result.min_reflux_line();
            lines.push(Polyline::segment(
                (spec.xd, spec.xd),
                (0.0, line.intercept),
                RED_INK,
                dashed,
            ));
        }

        let mut labels = Vec::with_capacity(result.stages.len() + 5);
        for stage in &result.stages {
            lines.push(Polyline {
                points: vec![
                    (stage.x_from, stage.y),
                    (stage.x_to, stage.y),
                    (stage.x_to, stage.y_next),
                ],
                color: INK,
                style: solid,
            });
            labels.push(Label::new(
                stage.number.to_string(),
                (stage.x_to - 0.045, stage.y + 0.045),
            ));
        }
        if let Some(last) = result.stages.last() {
            lines.push(Polyline::segment(
                (last.x_to, last.y_next),
                (last.x_to, 0.0),
                INK,
                solid,
            ));
        }

        let summary = [
            format!("Rmin= {:.3}", result.min_reflux_ratio),
            format!("R= {:.3}", result.reflux_ratio),
            format!("xb actual= {:.3}", result.xb_actual),
            format!("Stages= {}", result.stage_count()),
            format!("Feed Stage= {}", result.feed_stage),
        ];
        for (i, text) in summary.into_iter().enumerate() {
            labels.push(Label::new(text, (0.6, 0.5 - 0.05 * i as f64)));
        }

        let title = format!(
            "xd={}  xb={}  zf={}  q={:.3}  R={}*Rmin  Murphree Efficiency={}",
            spec.xd, spec.xb, spec.xf, spec.q, spec.r_factor, spec.nm
        );

        Self {
            title,
            x_label: "xa".to_string(),
            y_label: "ya".to_string(),
            lines,
            labels,
        }
    }
}

/// 장면을 RGB 이미지로 그린다. `annotate`가 거짓이면 글자를 전혀 쓰지 않는다.
pub fn render(
    scene: &PlotScene,
    width: u32,
    height: u32,
    annotate: bool,
) -> Result<RgbImage, PlotError> {
    if width < 50 || height < 50 {
        return Err(PlotError::TooSmall { width, height });
    }
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_scene(&root, scene, annotate)?;
    }
    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| PlotError::Draw("버퍼 크기가 이미지와 맞지 않습니다".to_string()))
}

fn draw_scene(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    scene: &PlotScene,
    annotate: bool,
) -> Result<(), PlotError> {
    root.fill(&WHITE).map_err(draw_error)?;

    let mut builder = ChartBuilder::on(root);
    builder.margin(15);
    if annotate {
        builder
            .caption(&scene.title, (FONT, 14))
            .x_label_area_size(40)
            .y_label_area_size(45);
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..1f64, 0f64..1f64)
        .map_err(draw_error)?;

    let mut mesh = chart.configure_mesh();
    if annotate {
        mesh.x_desc(scene.x_label.as_str())
            .y_desc(scene.y_label.as_str());
    } else {
        mesh.disable_axes();
    }
    mesh.draw().map_err(draw_error)?;

    for line in &scene.lines {
        let style = line.shape_style();
        let points = line.points.iter().copied();
        let drawn = match line.style {
            LineStyle::Solid => chart.draw_series(LineSeries::new(points, style)),
            LineStyle::Dashed => {
                chart.draw_series(DashedLineSeries::new(points, DASH, GAP, style))
            }
        };
        drawn.map_err(draw_error)?;
    }

    if annotate {
        chart
            .draw_series(
                scene
                    .labels
                    .iter()
                    .map(|label| Text::new(label.text.clone(), label.at, (FONT, 13).into_font())),
            )
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)
}

/// 결과를 그려 `settings.output`에 PNG로 저장한다.
///
/// 시스템 글꼴을 찾지 못하면 경고를 남기고 글자 없이 다시 그린다.
pub fn save_plot(result: &McCabeThieleResult, settings: &PlotSettings) -> Result<(), PlotError> {
    let scene = PlotScene::from_result(result, settings);
    let img = match render(&scene, settings.width, settings.height, settings.annotate) {
        Err(PlotError::Font(reason)) => {
            warn!(%reason, "글꼴을 쓸 수 없어 주석 없이 그립니다");
            render(&scene, settings.width, settings.height, false)?
        }
        other => other?,
    };
    img.save_with_format(&settings.output, image::ImageFormat::Png)?;
    info!(path = %settings.output.display(), "McCabe-Thiele 선도 저장");
    Ok(())
}
