// author: kodeholic (powered by Claude)
//
// Transport — 연결 계층 추상화
//
// client.rs의 pump는 이 트레이트만 바라봅니다. 실서비스는 WsTransport,
// 테스트는 채널 기반 가짜 구현을 끼워 넣습니다.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::config;
use crate::error::{StoreError, StoreResult};

#[async_trait]
pub trait Transport: Send {
    /// 다음 텍스트 프레임 수신. None이면 상대방이 연결을 닫은 것
    async fn next_frame(&mut self) -> Option<StoreResult<String>>;
    /// 텍스트 프레임 송신
    async fn send_text(&mut self, text: String) -> StoreResult<()>;
    /// 연결 종료
    async fn close(&mut self) -> StoreResult<()>;
}

// ----------------------------------------------------------------------------
// [WsTransport] — tokio-tungstenite 구현
// ----------------------------------------------------------------------------

pub struct WsTransport {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTransport {
    /// WS 핸드셰이크 수행. CONNECT_TIMEOUT_MS 안에 완료되어야 합니다.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let timeout = std::time::Duration::from_millis(config::CONNECT_TIMEOUT_MS);
        let (ws, _) = tokio::time::timeout(timeout, connect_async(url))
            .await
            .map_err(|_| StoreError::ConnectFailed(format!("timeout: {}", url)))?
            .map_err(|e| StoreError::ConnectFailed(e.to_string()))?;
        Ok(Self { ws })
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn next_frame(&mut self) -> Option<StoreResult<String>> {
        while let Some(msg) = self.ws.next().await {
            match msg {
                Ok(Message::Text(t))  => return Some(Ok(t.as_str().to_string())),
                Ok(Message::Close(_)) => return None,
                // Binary/Ping/Pong/Frame — 프로토콜은 텍스트 프레임만 사용
                Ok(_)  => continue,
                Err(e) => return Some(Err(StoreError::Transport(e.to_string()))),
            }
        }
        None
    }

    async fn send_text(&mut self, text: String) -> StoreResult<()> {
        self.ws
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| StoreError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) -> StoreResult<()> {
        self.ws
            .close(None)
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))
    }
}
