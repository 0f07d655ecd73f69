//! 已读状态控制器端到端测试
//!
//! 控制器 + HTTP 存储 + wiremock 后端，覆盖打开通知、全部已读和失败不阻塞跳转。

use alumni_notify::{
    ClientConfig, Destination, HttpNotificationStore, MarkReadOutcome, Navigator, Notification,
    ReadStateController, Role, Session,
};
use serde_json::json;
use std::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &Destination) {
        self.visits.lock().unwrap().push(destination.to_string());
    }
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

fn controller(server: &MockServer, role: Role) -> ReadStateController<HttpNotificationStore> {
    let config = ClientConfig {
        api_url: server.uri(),
        ..Default::default()
    };
    let session = Session::new(role);
    ReadStateController::new(HttpNotificationStore::new(&config, &session).unwrap(), role)
}

#[tokio::test]
async fn test_open_unread_community_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notifications/7/read"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctl = controller(&server, Role::Student);
    let nav = RecordingNavigator::default();
    let n = Notification::new(7, "community_reply").with_content(r#"{"community_id": 3}"#);

    let outcome = ctl.open_notification(&n, &nav).await;

    assert_eq!(outcome.mark_read, MarkReadOutcome::Marked);
    assert_eq!(nav.visits(), vec!["/student/communities/3".to_string()]);
}

#[tokio::test]
async fn test_open_read_message_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctl = controller(&server, Role::Student);
    let nav = RecordingNavigator::default();
    let n: Notification =
        serde_json::from_str(r#"{"id": 8, "type": "message", "content": null, "read": true}"#)
            .unwrap();

    let outcome = ctl.open_notification(&n, &nav).await;

    assert_eq!(outcome.mark_read, MarkReadOutcome::AlreadyRead);
    assert_eq!(nav.visits(), vec!["/student/messages".to_string()]);
}

#[tokio::test]
async fn test_open_navigates_even_when_backend_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notifications/3/read"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let ctl = controller(&server, Role::Alumni);
    let nav = RecordingNavigator::default();
    let n = Notification::new(3, "event_invitation").with_content("You're invited!");

    let outcome = ctl.open_notification(&n, &nav).await;

    assert!(matches!(outcome.mark_read, MarkReadOutcome::Failed(_)));
    assert_eq!(nav.visits(), vec!["/alumni/events".to_string()]);
}

#[tokio::test]
async fn test_mark_all_then_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notifications/read-all"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "type": "message", "read": true},
            {"id": 2, "type": "connection", "read": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let ctl = controller(&server, Role::Faculty);
    ctl.mark_all_as_read().await.unwrap();

    let records = ctl.refresh().await.unwrap();
    assert_eq!(records.iter().filter(|n| n.is_unread()).count(), 0);

    // 请求顺序与调用顺序一致
    let requests = server.received_requests().await.unwrap();
    let order: Vec<_> = requests.iter().map(|r| r.method.to_string()).collect();
    assert_eq!(order, vec!["POST", "GET"]);
}

#[tokio::test]
async fn test_open_by_id_unknown_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 21, "type": "unknown_type", "content": "System maintenance tonight", "read": false}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/notifications/21/read"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctl = controller(&server, Role::Student);
    let nav = RecordingNavigator::default();

    let outcome = ctl.open_by_id(21, &nav).await.unwrap().unwrap();
    assert_eq!(outcome.destination.path(), "/student/notifications/21");

    assert!(ctl.open_by_id(22, &nav).await.unwrap().is_none());
    assert_eq!(nav.visits().len(), 1);
}
