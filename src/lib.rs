//! 핵심 계산 로직을 라이브러리로 분리하여 CLI와 그림 출력이 같은 결과를 공유한다.

pub mod app;
pub mod config;
pub mod distillation;
pub mod plot;
pub mod report;
pub mod ui_cli;
