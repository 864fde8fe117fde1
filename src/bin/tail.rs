// author: kodeholic (powered by Claude)
//
// rctail — mini-roomchat 실시간 상태 변경 관찰 CLI
//
// 사용법:
//   rctail [--url URL] [--filter KEYWORD]
//
// 예시:
//   rctail                           # 전체 알림 스트림
//   rctail --filter room             # 방 관련 알림만
//   rctail --url ws://192.168.1.10:8080/ws

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use serde_json::Value;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use mini_roomchat::client::ChatClient;
use mini_roomchat::config;
use mini_roomchat::store::{RoomStore, StoreUpdate};

// ----------------------------------------------------------------------------
// [CLI 인자]
// ----------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name    = "rctail",
    about   = "mini-roomchat 실시간 상태 변경 스트림 관찰",
    version,
)]
struct Cli {
    /// 채팅 서버 WebSocket URL
    #[arg(long, default_value = config::DEFAULT_WS_URL)]
    url: String,

    /// 알림 종류 필터 키워드 (예: room, message)
    /// 대소문자 무관, 종류 이름 부분 일치
    #[arg(long, short = 'f')]
    filter: Option<String>,
}

// ----------------------------------------------------------------------------
// [메인]
// ----------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let filter = cli.filter.as_ref().map(|s| s.to_lowercase());

    let store = RoomStore::new();
    // 접속 직후의 Connected 알림까지 받도록 connect보다 먼저 구독
    let mut stream = BroadcastStream::new(store.subscribe());
    let mut client = ChatClient::new(&cli.url, Arc::clone(&store));

    // 헤더 출력
    println!("{}", "─".repeat(80).dimmed());
    println!(
        "  {} {}  {}  {}",
        "rctail".bold().cyan(),
        "▶".green(),
        cli.url.dimmed(),
        filter.as_deref()
            .map(|f| format!("[filter: {}]", f).yellow().to_string())
            .unwrap_or_default(),
    );
    println!("{}", "─".repeat(80).dimmed());
    println!(
        "  {:<12} {:<14} {}",
        "TIME".dimmed(),
        "KIND".dimmed(),
        "DETAIL".dimmed(),
    );
    println!("{}", "─".repeat(80).dimmed());

    if let Err(e) = client.connect().await {
        eprintln!("{} 서버 연결 실패: {}", "✗".red(), e);
        eprintln!("  서버가 실행 중인지 확인하세요: {}", cli.url.dimmed());
        std::process::exit(1);
    }

    let mut probe = tokio::time::interval(std::time::Duration::from_secs(1));
    let mut update_count: u64 = 0;

    loop {
        tokio::select! {
            item = stream.next() => match item {
                Some(Ok(update)) => {
                    let kind = kind_name(&update);
                    if let Some(ref f) = filter {
                        if !kind.to_lowercase().contains(f.as_str()) {
                            continue;
                        }
                    }
                    print_update(&update, kind);
                    update_count += 1;
                }
                Some(Err(_lagged)) => {
                    eprintln!("{} 지연으로 일부 알림 유실", "⚠".yellow());
                }
                None => break,
            },
            // 서버가 연결을 닫으면 pump가 내려가므로 주기적으로 확인 후 종료
            _ = probe.tick() => {
                if !client.is_connected() {
                    break;
                }
            }
        }
    }

    println!("{}", "─".repeat(80).dimmed());
    println!("  스트림 종료 (총 {} 알림)", update_count);
    client.shutdown().await;
}

// ----------------------------------------------------------------------------
// [알림 출력]
// ----------------------------------------------------------------------------

fn kind_name(update: &StoreUpdate) -> &'static str {
    match update {
        StoreUpdate::Connected       => "CONNECTED",
        StoreUpdate::RoomJoined { .. } => "ROOM_JOINED",
        StoreUpdate::RoomLeft        => "ROOM_LEFT",
        StoreUpdate::Message { .. }  => "MESSAGE",
        StoreUpdate::RoomMessage { .. } => "ROOM_MESSAGE",
    }
}

fn print_update(update: &StoreUpdate, kind: &str) {
    let time_str = chrono::Local::now().format("%H:%M:%S%.3f").to_string();

    let kind_str = match update {
        StoreUpdate::Connected          => kind.bright_green().to_string(),
        StoreUpdate::RoomJoined { .. }  => kind.bright_cyan().bold().to_string(),
        StoreUpdate::RoomLeft           => kind.bright_cyan().to_string(),
        StoreUpdate::RoomMessage { .. } => kind.bright_yellow().to_string(),
        StoreUpdate::Message { .. }     => kind.normal().to_string(),
    };

    let detail = match update {
        StoreUpdate::Connected              => String::new(),
        StoreUpdate::RoomJoined { room_id } => room_id.clone(),
        StoreUpdate::RoomLeft               => String::new(),
        StoreUpdate::Message { frame } | StoreUpdate::RoomMessage { frame } => compact(frame),
    };

    println!(
        "  {} {:<14} {}",
        time_str.dimmed(),
        kind_str,
        detail.dimmed(),
    );
}

/// 프레임 원문을 한 줄 JSON으로 축약
fn compact(frame: &Value) -> String {
    serde_json::to_string(frame).unwrap_or_default()
}
