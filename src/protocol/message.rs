// author: kodeholic (powered by Claude)

use serde::Serialize;
use serde_json::Value;

use crate::protocol::opcode::{client, server};

// ----------------------------------------------------------------------------
// [공통] 와이어 봉투 (Envelope)
// ----------------------------------------------------------------------------

/// 송신 프레임의 최상위 구조체.
/// 서버의 Message 구조체와 동일한 JSON 키를 사용합니다.
///
/// 예시:
///   { "type": 7, "roomId": "room_1" }
///   { "type": 5, "message": "hello" }
#[derive(Serialize, Debug)]
pub struct Frame {
    /// opcode (protocol::opcode 참조)
    #[serde(rename = "type")]
    pub opcode: u8,
    #[serde(rename = "roomId", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Frame {
    pub fn no_data(opcode: u8) -> Self {
        Self { opcode, room_id: None, message: None }
    }
}

// ----------------------------------------------------------------------------
// [S→C] 수신 이벤트 분류
// ----------------------------------------------------------------------------

/// type 판별자 기준으로 분류된 수신 이벤트.
/// 로그에는 수신 원문 전체를 남기므로 모든 케이스가 원본 payload를 보존합니다.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// type: JOIN_SUCCESS (2)
    JoinSuccess { room_id: String, frame: Value },
    /// type: LEAVE_SUCCESS (4)
    LeaveSuccess { frame: Value },
    /// type: ROOM_MESSAGE (6)
    RoomMessage { frame: Value },
    /// 그 외 전부 — type이 없거나 숫자가 아닌 프레임 포함
    Generic { opcode: Option<u64>, frame: Value },
}

/// 파싱된 프레임을 이벤트로 분류합니다. 실패하는 경우가 없는 전체 함수 —
/// 미인식 type은 전부 Generic으로 수렴합니다.
/// JOIN_SUCCESS에서 roomId가 빠져 있으면 빈 문자열로 관대하게 통과시킵니다.
pub fn classify(frame: Value) -> ServerEvent {
    let opcode = frame.get("type").and_then(Value::as_u64);
    match opcode {
        Some(t) if t == server::JOIN_SUCCESS as u64 => {
            let room_id = frame
                .get("roomId")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            ServerEvent::JoinSuccess { room_id, frame }
        }
        Some(t) if t == server::LEAVE_SUCCESS as u64 => ServerEvent::LeaveSuccess { frame },
        Some(t) if t == server::ROOM_MESSAGE as u64 => ServerEvent::RoomMessage { frame },
        opcode => ServerEvent::Generic { opcode, frame },
    }
}

// ----------------------------------------------------------------------------
// [C→S] 송신 커맨드
// ----------------------------------------------------------------------------

/// 클라이언트가 서버로 보낼 수 있는 요청들
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// op: JOIN_ROOM (7)
    JoinRoom { room_id: String },
    /// op: QUICK_JOIN (9)
    QuickJoin,
    /// op: LEAVE_ROOM (3)
    LeaveRoom,
    /// op: ROOM_SEND (5)
    RoomSend { message: String },
    /// op: BROADCAST (0)
    Broadcast { message: String },
}

impl ClientCommand {
    /// 와이어 JSON으로 직렬화
    pub fn encode(&self) -> String {
        let frame = match self {
            ClientCommand::JoinRoom { room_id } => Frame {
                opcode:  client::JOIN_ROOM,
                room_id: Some(room_id.clone()),
                message: None,
            },
            ClientCommand::QuickJoin => Frame::no_data(client::QUICK_JOIN),
            ClientCommand::LeaveRoom => Frame::no_data(client::LEAVE_ROOM),
            ClientCommand::RoomSend { message } => Frame {
                opcode:  client::ROOM_SEND,
                room_id: None,
                message: Some(message.clone()),
            },
            ClientCommand::Broadcast { message } => Frame {
                opcode:  client::BROADCAST,
                room_id: None,
                message: Some(message.clone()),
            },
        };
        serde_json::to_string(&frame).unwrap_or_default()
    }

    /// 채팅 본문 길이 (bytes). 길이 제한이 없는 커맨드는 0
    pub fn chat_len(&self) -> usize {
        match self {
            ClientCommand::RoomSend { message } | ClientCommand::Broadcast { message } => {
                message.len()
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_join_success() {
        let event = classify(json!({ "type": 2, "roomId": "room_1", "message": "ok" }));
        match event {
            ServerEvent::JoinSuccess { room_id, frame } => {
                assert_eq!(room_id, "room_1");
                assert_eq!(frame["message"], "ok");
            }
            other => panic!("JoinSuccess 기대, 실제: {:?}", other),
        }
    }

    #[test]
    fn classify_join_without_room_id_is_permissive() {
        // roomId가 없어도 에러 없이 빈 문자열로 통과
        let event = classify(json!({ "type": 2 }));
        assert!(matches!(event, ServerEvent::JoinSuccess { ref room_id, .. } if room_id.is_empty()));
    }

    #[test]
    fn classify_leave_and_room_message() {
        assert!(matches!(classify(json!({ "type": 4 })), ServerEvent::LeaveSuccess { .. }));
        assert!(matches!(
            classify(json!({ "type": 6, "message": "hi" })),
            ServerEvent::RoomMessage { .. }
        ));
    }

    #[test]
    fn classify_unknown_type_is_generic() {
        let event = classify(json!({ "type": 10, "message": "you are not available for room" }));
        assert!(matches!(event, ServerEvent::Generic { opcode: Some(10), .. }));
    }

    #[test]
    fn classify_missing_or_non_numeric_type_is_generic() {
        assert!(matches!(
            classify(json!({ "message": "no type" })),
            ServerEvent::Generic { opcode: None, .. }
        ));
        assert!(matches!(
            classify(json!({ "type": "join" })),
            ServerEvent::Generic { opcode: None, .. }
        ));
    }

    #[test]
    fn encode_join_room() {
        let json: serde_json::Value =
            serde_json::from_str(&ClientCommand::JoinRoom { room_id: "room_1".into() }.encode())
                .unwrap();
        assert_eq!(json, json!({ "type": 7, "roomId": "room_1" }));
    }

    #[test]
    fn encode_no_data_commands_omit_optional_fields() {
        let json: serde_json::Value =
            serde_json::from_str(&ClientCommand::LeaveRoom.encode()).unwrap();
        assert_eq!(json, json!({ "type": 3 }));

        let json: serde_json::Value =
            serde_json::from_str(&ClientCommand::QuickJoin.encode()).unwrap();
        assert_eq!(json, json!({ "type": 9 }));
    }

    #[test]
    fn encode_room_send() {
        let json: serde_json::Value =
            serde_json::from_str(&ClientCommand::RoomSend { message: "안녕하세요".into() }.encode())
                .unwrap();
        assert_eq!(json, json!({ "type": 5, "message": "안녕하세요" }));
    }

    #[test]
    fn chat_len_counts_only_chat_commands() {
        assert_eq!(ClientCommand::Broadcast { message: "abcd".into() }.chat_len(), 4);
        assert_eq!(ClientCommand::JoinRoom { room_id: "r".into() }.chat_len(), 0);
    }
}
