// author: kodeholic (powered by Gemini)

use clap::Parser;
use mini_roomchat::{config, run_console, ConsoleArgs};

#[derive(Parser)]
#[command(
    name    = "rcconsole",
    about   = "mini-roomchat 대화형 채팅 콘솔",
    version,
)]
struct Cli {
    /// 채팅 서버 WebSocket URL
    #[arg(long, default_value = config::DEFAULT_WS_URL)]
    url: String,
}

#[tokio::main]
async fn main() {
    // 환경 변수 기반 로깅 초기화 (기본값: warn, 콘솔 출력과 섞이지 않게 stderr)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run_console(ConsoleArgs { url: cli.url }).await;
}
