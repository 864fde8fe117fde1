// author: kodeholic (powered by Claude)
// 매직 넘버를 배제하고 클라이언트 전체의 동작 한계를 제어하는 상수 모음입니다.

/// 채팅 서버 기본 WebSocket URL
pub const DEFAULT_WS_URL: &str = "ws://localhost:8080/ws";

/// 송신 커맨드 큐 사이즈.
/// 꽉 차면 send()가 자리가 날 때까지 대기합니다.
pub const COMMAND_QUEUE_SIZE: usize = 64;

/// 상태 변경 알림(broadcast) 채널 버퍼 크기.
/// 구독자가 느릴 때 최대 보유 알림 수 — 초과 시 오래된 알림부터 drop
pub const UPDATE_CHANNEL_SIZE: usize = 512;

/// 서버 접속 핸드셰이크 타임아웃 (5초)
pub const CONNECT_TIMEOUT_MS: u64 = 5_000;

/// 채팅 메시지 최대 길이 (bytes).
/// 서버의 수신 프레임 한도(512B)와 동일하게 맞춤
pub const MAX_MESSAGE_LENGTH: usize = 512;
