// author: kodeholic (powered by Claude)
//
// ChatClient — WS 연결 생명주기 담당
//
// 생성 시점에는 네트워크 부작용이 없습니다. connect()가 명시적으로
// 소켓을 열고, 수신/송신을 다중화하는 pump 태스크 하나를 띄웁니다.
// 서버가 연결을 닫으면 로그만 남깁니다 — 재접속이나 상태 정리는 없음.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, trace, warn};

use crate::config;
use crate::error::{StoreError, StoreResult};
use crate::protocol::ClientCommand;
use crate::store::RoomStore;
use crate::transport::{Transport, WsTransport};

// ----------------------------------------------------------------------------
// [ChatClient]
// ----------------------------------------------------------------------------

pub struct ChatClient {
    url:   String,
    store: Arc<RoomStore>,
    link:  Option<Link>,
}

/// 살아있는 연결 한 개의 핸들
struct Link {
    cmd_tx: mpsc::Sender<String>,
    pump:   JoinHandle<()>,
}

impl ChatClient {
    /// 미접속 핸들 생성 — 네트워크 부작용 없음
    pub fn new(url: impl Into<String>, store: Arc<RoomStore>) -> Self {
        Self { url: url.into(), store, link: None }
    }

    /// 서버에 접속하고 pump를 시작합니다
    pub async fn connect(&mut self) -> StoreResult<()> {
        if self.is_connected() {
            return Err(StoreError::ConnectFailed("already connected".to_string()));
        }
        let transport = WsTransport::connect(&self.url).await?;
        info!("[roomchat] 접속 성공: {}", self.url);
        self.attach(Box::new(transport));
        Ok(())
    }

    /// 임의의 Transport 위에서 pump를 시작합니다 (테스트용 주입 지점)
    pub fn attach(&mut self, transport: Box<dyn Transport>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(config::COMMAND_QUEUE_SIZE);
        self.store.mark_connected();
        let pump = tokio::spawn(run_pump(transport, Arc::clone(&self.store), cmd_rx));
        self.link = Some(Link { cmd_tx, pump });
    }

    pub fn is_connected(&self) -> bool {
        self.link.as_ref().is_some_and(|link| !link.pump.is_finished())
    }

    /// 커맨드 한 건 송신 큐에 적재
    pub async fn send(&self, command: ClientCommand) -> StoreResult<()> {
        let chat_len = command.chat_len();
        if chat_len > config::MAX_MESSAGE_LENGTH {
            return Err(StoreError::MessageTooLong(chat_len));
        }

        let link = self.link.as_ref().ok_or(StoreError::NotConnected)?;
        link.cmd_tx
            .send(command.encode())
            .await
            // pump가 이미 종료된 경우
            .map_err(|_| StoreError::NotConnected)
    }

    /// 명시적 종료. 커맨드 채널을 닫으면 pump가 transport를 닫고 내려갑니다
    pub async fn shutdown(&mut self) {
        if let Some(link) = self.link.take() {
            drop(link.cmd_tx);
            let _ = link.pump.await;
            info!("[roomchat] 연결 종료 완료");
        }
    }
}

// ----------------------------------------------------------------------------
// [pump] — 수신/송신 다중화 루프
// ----------------------------------------------------------------------------

async fn run_pump(
    mut transport: Box<dyn Transport>,
    store:         Arc<RoomStore>,
    mut cmd_rx:    mpsc::Receiver<String>,
) {
    loop {
        tokio::select! {
            inbound = transport.next_frame() => match inbound {
                Some(Ok(text)) => store.ingest(&text),
                Some(Err(e))   => {
                    warn!("수신 에러: {}", e);
                    break;
                }
                // 서버 측 종료 — 로그만 남김. 상태는 그대로 유지
                None => {
                    info!("서버가 연결을 닫음");
                    break;
                }
            },
            cmd = cmd_rx.recv() => match cmd {
                Some(json) => {
                    if let Err(e) = transport.send_text(json).await {
                        warn!("송신 에러: {}", e);
                        break;
                    }
                }
                // 커맨드 채널 닫힘 = shutdown() 호출
                None => {
                    let _ = transport.close().await;
                    break;
                }
            },
        }
    }
    trace!("pump 종료");
}
