use clap::Parser;
use distillation_toolbox::{app, ui_cli::Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 프로그램의 엔트리 포인트. 로그를 초기화한 뒤 계산을 실행한다.
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = app::run(&cli) {
        tracing::error!("{err}");
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

/// DISTILLATION_LOG_FORMAT=json 이면 JSON 로그를 출력한다.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "distillation_toolbox=debug"
    } else {
        "distillation_toolbox=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());
    let format = std::env::var("DISTILLATION_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
