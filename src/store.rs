// author: kodeholic (powered by Gemini)
// 네트워크 로직과 철저히 분리된, 순수 클라이언트 상태 관리 모듈입니다.
//
// 구조:
//   수신 프레임 (client.rs pump)
//       └── RoomStore::ingest(raw)
//               ├── 파싱 실패 → 로그만 남기고 폐기 (상태 불변)
//               └── classify → apply → 필드 변이 + StoreUpdate publish
//                       ├── 구독자 (rcconsole 렌더 루프)
//                       └── 구독자 (rctail 프로세스)
//
// 구독자가 없을 때 publish는 그냥 drop (수신 경로 성능에 무영향)

use std::sync::{Arc, RwLock};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{trace, warn};

use crate::config;
use crate::protocol::{classify, ServerEvent};

// ----------------------------------------------------------------------------
// [방 멤버십] RoomInfo
// ----------------------------------------------------------------------------

/// 현재 참여 중인 방. 참여 중이 아니면 store의 room_info가 None
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: String,
}

// ----------------------------------------------------------------------------
// [상태 변경 알림] StoreUpdate
// ----------------------------------------------------------------------------

/// 필드 변이 한 번마다 한 건씩 발행되는 알림 이벤트
#[derive(Debug, Clone)]
pub enum StoreUpdate {
    /// 서버 접속 완료 — loading 해제
    Connected,
    /// 방 참여 확정 (JOIN_SUCCESS)
    RoomJoined { room_id: String },
    /// 방 퇴장 확정 (LEAVE_SUCCESS)
    RoomLeft,
    /// 일반 메시지 로그에 한 건 추가됨
    Message { frame: Value },
    /// 방 메시지 로그에 한 건 추가됨
    RoomMessage { frame: Value },
}

// ----------------------------------------------------------------------------
// [스냅샷]
// ----------------------------------------------------------------------------

/// 네 개 관측 필드의 불변 복사본
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub loading:       bool,
    pub room_info:     Option<RoomInfo>,
    pub messages:      Vec<Value>,
    pub room_messages: Vec<Value>,
}

// ----------------------------------------------------------------------------
// [RoomStore]
// ----------------------------------------------------------------------------

pub struct RoomStore {
    /// 접속 완료 전까지 true. mark_connected()가 해제
    pub loading:       RwLock<bool>,
    /// 현재 방 멤버십. JOIN_SUCCESS가 세팅, LEAVE_SUCCESS가 해제
    pub room_info:     RwLock<Option<RoomInfo>>,
    /// 일반 메시지 로그 — 수신 순서 그대로, 무제한 append-only
    pub messages:      RwLock<Vec<Value>>,
    /// 방 메시지 로그 (ROOM_MESSAGE 전용)
    pub room_messages: RwLock<Vec<Value>>,
    update_tx:         broadcast::Sender<StoreUpdate>,
}

impl RoomStore {
    pub fn new() -> Arc<Self> {
        trace!("Initializing RoomStore");
        let (update_tx, _) = broadcast::channel(config::UPDATE_CHANNEL_SIZE);
        Arc::new(Self {
            loading:       RwLock::new(true),
            room_info:     RwLock::new(None),
            messages:      RwLock::new(Vec::new()),
            room_messages: RwLock::new(Vec::new()),
            update_tx,
        })
    }

    /// 알림 구독자 생성 — 각 뷰(콘솔, tail)마다 호출
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.update_tx.subscribe()
    }

    /// 수신 원문 한 건 처리: 파싱 → 분류 → 변이.
    /// 파싱 실패는 인식하는 유일한 실패 케이스 — 로그만 남기고 폐기합니다.
    pub fn ingest(&self, raw: &str) {
        let frame: Value = match serde_json::from_str(raw) {
            Ok(v)  => v,
            Err(e) => {
                warn!("수신 프레임 파싱 실패 — 폐기: {}", e);
                return;
            }
        };
        self.apply(classify(frame));
    }

    /// 분류된 이벤트 한 건을 상태에 반영
    pub fn apply(&self, event: ServerEvent) {
        match event {
            ServerEvent::JoinSuccess { room_id, frame } => {
                // 이미 방에 있어도 검증 없이 덮어씀 — 서버 확인을 그대로 신뢰
                *self.room_info.write().unwrap() = Some(RoomInfo { room_id: room_id.clone() });
                trace!("방 참여 확정: {}", room_id);
                self.publish(StoreUpdate::RoomJoined { room_id });
                self.push_message(frame);
            }
            ServerEvent::LeaveSuccess { frame } => {
                // 방에 없는 상태의 퇴장 통보도 그대로 수용 (중복 퇴장 허용)
                *self.room_info.write().unwrap() = None;
                trace!("방 퇴장 확정");
                self.publish(StoreUpdate::RoomLeft);
                self.push_message(frame);
            }
            ServerEvent::RoomMessage { frame } => {
                self.room_messages.write().unwrap().push(frame.clone());
                self.publish(StoreUpdate::RoomMessage { frame });
            }
            ServerEvent::Generic { opcode, frame } => {
                trace!("일반 메시지 수신 (type={:?})", opcode);
                self.push_message(frame);
            }
        }
    }

    /// 일반 메시지 로그에 직접 한 건 추가.
    /// 합성 항목 주입용으로 외부에서도 호출 가능합니다.
    pub fn push_message(&self, frame: Value) {
        self.messages.write().unwrap().push(frame.clone());
        self.publish(StoreUpdate::Message { frame });
    }

    /// 접속 완료 처리 — loading 해제
    pub fn mark_connected(&self) {
        *self.loading.write().unwrap() = false;
        self.publish(StoreUpdate::Connected);
    }

    pub fn current_room(&self) -> Option<RoomInfo> {
        self.room_info.read().unwrap().clone()
    }

    pub fn message_count(&self) -> usize {
        self.messages.read().unwrap().len()
    }

    pub fn room_message_count(&self) -> usize {
        self.room_messages.read().unwrap().len()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            loading:       *self.loading.read().unwrap(),
            room_info:     self.room_info.read().unwrap().clone(),
            messages:      self.messages.read().unwrap().clone(),
            room_messages: self.room_messages.read().unwrap().clone(),
        }
    }

    fn publish(&self, update: StoreUpdate) {
        // send 실패(구독자 없음)는 정상 케이스 — 무시
        let _ = self.update_tx.send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_store_is_loading_and_empty() {
        let store = RoomStore::new();
        let snap = store.snapshot();
        assert!(snap.loading);
        assert!(snap.room_info.is_none());
        assert!(snap.messages.is_empty());
        assert!(snap.room_messages.is_empty());
    }

    #[test]
    fn publish_without_subscriber_no_panic() {
        let store = RoomStore::new();
        store.push_message(json!({ "type": 99 }));
        // 구독자 없어도 패닉 없이 drop
        assert_eq!(store.message_count(), 1);
    }

    #[tokio::test]
    async fn subscriber_receives_updates_in_mutation_order() {
        let store = RoomStore::new();
        let mut rx = store.subscribe();

        store.ingest(r#"{ "type": 2, "roomId": "room_1" }"#);

        // JOIN_SUCCESS는 멤버십 세팅 + 로그 추가, 알림 두 건
        assert!(matches!(
            rx.recv().await.unwrap(),
            StoreUpdate::RoomJoined { ref room_id } if room_id == "room_1"
        ));
        assert!(matches!(rx.recv().await.unwrap(), StoreUpdate::Message { .. }));
    }

    #[tokio::test]
    async fn mark_connected_clears_loading_and_notifies() {
        let store = RoomStore::new();
        let mut rx = store.subscribe();

        store.mark_connected();

        assert!(!*store.loading.read().unwrap());
        assert!(matches!(rx.recv().await.unwrap(), StoreUpdate::Connected));
    }

    #[test]
    fn snapshot_is_detached_copy() {
        let store = RoomStore::new();
        store.push_message(json!({ "type": 1 }));
        let snap = store.snapshot();

        store.push_message(json!({ "type": 2 }));
        assert_eq!(snap.messages.len(), 1, "스냅샷은 이후 변이에 영향받지 않아야 합니다.");
        assert_eq!(store.message_count(), 2);
    }
}
