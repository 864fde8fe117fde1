// author: kodeholic (powered by Claude)
//
// rcconsole — mini-roomchat 대화형 채팅 콘솔
//
// 수신 알림(StoreUpdate)과 stdin 슬래시 커맨드를 한 루프에서 다중화합니다.
//
// 커맨드:
//   /join <room_id>   특정 방 참여
//   /quick            빈 방 자동 참여
//   /leave            현재 방 퇴장
//   /send <text>      현재 방으로 메시지
//   /say <text>       전체 브로드캐스트
//   /status           스토어 스냅샷 테이블
//   /quit             종료

use std::sync::Arc;

use colored::Colorize;
use serde_json::Value;
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::warn;

use crate::client::ChatClient;
use crate::protocol::ClientCommand;
use crate::store::{RoomStore, StoreUpdate};
use crate::ConsoleArgs;

pub async fn run_console(args: ConsoleArgs) {
    let store = RoomStore::new();
    let mut updates = store.subscribe();
    let mut client = ChatClient::new(&args.url, Arc::clone(&store));

    print_header(&args.url);

    if let Err(e) = client.connect().await {
        eprintln!("{} 서버 연결 실패: {}", "✗".red(), e);
        eprintln!("  서버가 실행 중인지 확인하세요: {}", args.url.dimmed());
        return;
    }

    print_help();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(u) => print_update(&u),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    eprintln!("{} 알림 {}건 유실 (구독 지연)", "⚠".yellow(), n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            line = lines.next_line() => match line {
                Ok(Some(l)) => {
                    if handle_line(&client, &store, l.trim()).await {
                        break;
                    }
                }
                // stdin EOF
                Ok(None) => break,
                Err(e) => {
                    warn!("stdin 에러: {}", e);
                    break;
                }
            },
        }
    }

    client.shutdown().await;
}

// ----------------------------------------------------------------------------
// [커맨드 처리]
// ----------------------------------------------------------------------------

/// 슬래시 커맨드 한 줄 처리. true 반환 시 콘솔 종료
async fn handle_line(client: &ChatClient, store: &RoomStore, line: &str) -> bool {
    if line.is_empty() {
        return false;
    }

    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let result = match cmd {
        "/join" if !rest.is_empty() => {
            client.send(ClientCommand::JoinRoom { room_id: rest.to_string() }).await
        }
        "/quick" => client.send(ClientCommand::QuickJoin).await,
        "/leave" => client.send(ClientCommand::LeaveRoom).await,
        "/send" if !rest.is_empty() => {
            client.send(ClientCommand::RoomSend { message: rest.to_string() }).await
        }
        "/say" if !rest.is_empty() => {
            client.send(ClientCommand::Broadcast { message: rest.to_string() }).await
        }
        "/status" => {
            print_status(store);
            Ok(())
        }
        "/quit" => return true,
        _ => {
            print_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "✗".red(), e);
    }
    false
}

fn print_status(store: &RoomStore) {
    #[derive(Tabled)]
    struct StatusRow {
        #[tabled(rename = "FIELD")]
        field: &'static str,
        #[tabled(rename = "VALUE")]
        value: String,
    }

    let snap = store.snapshot();
    let rows = vec![
        StatusRow { field: "loading", value: snap.loading.to_string() },
        StatusRow {
            field: "room",
            value: snap.room_info.map(|r| r.room_id).unwrap_or_else(|| "-".to_string()),
        },
        StatusRow { field: "messages", value: snap.messages.len().to_string() },
        StatusRow { field: "room_messages", value: snap.room_messages.len().to_string() },
    ];
    println!("{}", Table::new(rows));
}

// ----------------------------------------------------------------------------
// [출력]
// ----------------------------------------------------------------------------

fn print_header(url: &str) {
    println!("{}", "─".repeat(70).dimmed());
    println!("  {} {}  {}", "rcconsole".bold().cyan(), "▶".green(), url.dimmed());
    println!("{}", "─".repeat(70).dimmed());
}

fn print_help() {
    println!(
        "  {}",
        "/join <room_id> · /quick · /leave · /send <text> · /say <text> · /status · /quit".dimmed()
    );
}

fn print_update(update: &StoreUpdate) {
    let ts = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
    match update {
        StoreUpdate::Connected => {
            println!("  {} {}", ts.dimmed(), "접속 완료".bright_green());
        }
        StoreUpdate::RoomJoined { room_id } => {
            println!("  {} {} {}", ts.dimmed(), "▶ 방 참여:".bright_cyan(), room_id.bold());
        }
        StoreUpdate::RoomLeft => {
            println!("  {} {}", ts.dimmed(), "◀ 방 퇴장".bright_cyan());
        }
        StoreUpdate::RoomMessage { frame } => {
            println!("  {} {} {}", ts.dimmed(), "[방]".bright_yellow(), frame_text(frame));
        }
        StoreUpdate::Message { frame } => {
            println!("  {} {} {}", ts.dimmed(), "[전체]".bright_white(), frame_text(frame));
        }
    }
}

/// message 필드가 있으면 본문만, 없으면 프레임 원문 JSON을 그대로 출력
fn frame_text(frame: &Value) -> String {
    frame
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| frame.to_string())
}
