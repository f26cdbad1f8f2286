//! Event routing: parse inbound frames and fan them out

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::MissingUserPolicy;

use super::connection::{Connection, ConnectionId};
use super::events::{Frame, RelayEvent, TypingNotice};
use super::presence::PresenceTracker;
use super::registry::ConnectionRegistry;

/// Routes parsed events to the registry and presence tracker.
///
/// | event          | presence      | recipients        |
/// |----------------|---------------|-------------------|
/// | `message`      | -             | all, sender too   |
/// | `typing_start` | mark user     | all but sender    |
/// | `typing_stop`  | clear user    | all but sender    |
/// | legacy         | -             | all, raw bytes    |
pub struct EventRouter {
    registry: Arc<ConnectionRegistry>,
    presence: Arc<PresenceTracker>,
    missing_user: MissingUserPolicy,
    /// Held across mutate-then-broadcast so no handler sees a half-applied event
    dispatch: Mutex<()>,
}

impl EventRouter {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        presence: Arc<PresenceTracker>,
        missing_user: MissingUserPolicy,
    ) -> Self {
        Self {
            registry,
            presence,
            missing_user,
            dispatch: Mutex::new(()),
        }
    }

    /// Handle one inbound frame from `source`
    pub fn handle_incoming(&self, frame: Frame, source: ConnectionId) {
        let event = RelayEvent::parse(frame);
        let _guard = self.dispatch.lock();

        match event {
            RelayEvent::Message(msg) => {
                info!(
                    connection = %source,
                    user = msg.user().unwrap_or_default(),
                    content = msg.content().unwrap_or_default(),
                    "Message received"
                );
                match msg.to_json() {
                    Ok(json) => {
                        self.broadcast_all(Frame::Text(json));
                    }
                    Err(e) => warn!(error = %e, "Failed to serialize chat message"),
                }
            }
            RelayEvent::TypingStart { user } => {
                let Some(user) = self.resolve_user(user, source) else {
                    return;
                };
                info!(user = %user, "User is typing");
                self.presence.mark_typing(&user);
                self.broadcast_others(source, &TypingNotice::TypingStart { user });
            }
            RelayEvent::TypingStop { user } => {
                let Some(user) = self.resolve_user(user, source) else {
                    return;
                };
                info!(user = %user, "User stopped typing");
                self.presence.clear_typing(&user);
                self.broadcast_others(source, &TypingNotice::TypingStop { user });
            }
            RelayEvent::Legacy(frame) => {
                info!(
                    connection = %source,
                    payload = %frame.to_text_lossy(),
                    "Legacy message"
                );
                self.broadcast_all(frame);
            }
        }
    }

    /// Clear every typing marker and announce `typing_stop` for each cleared
    /// user to all open connections.
    ///
    /// There is no connection-to-user binding, so this covers every typing
    /// user in the process, not only those typing on a closing connection.
    pub fn release_all_typing(&self) -> Vec<String> {
        let _guard = self.dispatch.lock();

        let users = self.presence.clear_all();
        for user in &users {
            self.broadcast_all_notice(&TypingNotice::TypingStop { user: user.clone() });
        }
        users
    }

    /// Send to every open connection; returns how many accepted the frame
    fn broadcast_all(&self, frame: Frame) -> usize {
        let mut delivered = 0;
        self.registry.for_each(|conn| {
            if deliver(conn, frame.clone()) {
                delivered += 1;
            }
        });
        delivered
    }

    fn broadcast_all_notice(&self, notice: &TypingNotice) -> usize {
        match notice.to_json() {
            Ok(json) => self.broadcast_all(Frame::Text(json)),
            Err(e) => {
                warn!(error = %e, "Failed to serialize typing notice");
                0
            }
        }
    }

    fn broadcast_others(&self, source: ConnectionId, notice: &TypingNotice) -> usize {
        let json = match notice.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize typing notice");
                return 0;
            }
        };

        let mut delivered = 0;
        self.registry.for_each_except(source, |conn| {
            if deliver(conn, Frame::Text(json.clone())) {
                delivered += 1;
            }
        });
        delivered
    }

    fn resolve_user(&self, user: Option<String>, source: ConnectionId) -> Option<String> {
        match (user, self.missing_user) {
            (Some(user), _) => Some(user),
            (None, MissingUserPolicy::Relay) => Some(String::new()),
            (None, MissingUserPolicy::Drop) => {
                debug!(connection = %source, "Dropping typing event without user");
                None
            }
        }
    }
}

/// Fire-and-forget send; a closed recipient is skipped, never an error
fn deliver(conn: &dyn Connection, frame: Frame) -> bool {
    match conn.send(frame) {
        Ok(()) => true,
        Err(e) => {
            debug!(connection = %conn.id(), error = %e, "Dropped frame");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::testing::RecordingConnection;
    use serde_json::{json, Value};

    struct Fixture {
        router: EventRouter,
        registry: Arc<ConnectionRegistry>,
        presence: Arc<PresenceTracker>,
    }

    fn fixture(policy: MissingUserPolicy) -> Fixture {
        let registry = Arc::new(ConnectionRegistry::new());
        let presence = Arc::new(PresenceTracker::new());
        let router = EventRouter::new(registry.clone(), presence.clone(), policy);
        Fixture {
            router,
            registry,
            presence,
        }
    }

    fn connect(fx: &Fixture) -> Arc<RecordingConnection> {
        let conn = RecordingConnection::new();
        fx.registry.add(conn.clone());
        conn
    }

    fn text(s: &str) -> Frame {
        Frame::Text(s.to_string())
    }

    #[test]
    fn test_message_is_echoed_to_everyone() {
        let fx = fixture(MissingUserPolicy::Drop);
        let a = connect(&fx);
        let b = connect(&fx);
        let c = connect(&fx);

        let original = json!({"type": "message", "user": "alice", "content": "hi", "ts": 17});
        fx.router
            .handle_incoming(Frame::Text(original.to_string()), a.id());

        for conn in [&a, &b, &c] {
            assert_eq!(conn.received_json(), vec![original.clone()]);
        }
        assert_eq!(a.received(), b.received());
        assert_eq!(b.received(), c.received());
    }

    #[test]
    fn test_typing_start_excludes_sender() {
        let fx = fixture(MissingUserPolicy::Drop);
        let a = connect(&fx);
        let b = connect(&fx);

        fx.router
            .handle_incoming(text(r#"{"type":"typing_start","user":"alice"}"#), a.id());

        assert!(a.received().is_empty());
        assert_eq!(
            b.received_json(),
            vec![json!({"type": "typing_start", "user": "alice"})]
        );
        assert!(fx.presence.is_typing("alice"));
    }

    #[test]
    fn test_typing_stop_clears_presence_and_excludes_sender() {
        let fx = fixture(MissingUserPolicy::Drop);
        let a = connect(&fx);
        let b = connect(&fx);
        fx.presence.mark_typing("alice");

        fx.router
            .handle_incoming(text(r#"{"type":"typing_stop","user":"alice","extra":1}"#), a.id());

        assert!(!fx.presence.is_typing("alice"));
        assert!(a.received().is_empty());
        assert_eq!(
            b.received_json(),
            vec![json!({"type": "typing_stop", "user": "alice"})]
        );
    }

    #[test]
    fn test_legacy_text_is_relayed_verbatim_to_all() {
        let fx = fixture(MissingUserPolicy::Drop);
        let a = connect(&fx);
        let b = connect(&fx);

        fx.router.handle_incoming(text("hello world"), a.id());

        assert_eq!(a.received(), vec![text("hello world")]);
        assert_eq!(b.received(), vec![text("hello world")]);
    }

    #[test]
    fn test_unknown_type_is_relayed_verbatim() {
        let fx = fixture(MissingUserPolicy::Drop);
        let a = connect(&fx);
        let b = connect(&fx);

        let raw = r#"{ "type" : "ping" }"#;
        fx.router.handle_incoming(text(raw), b.id());

        assert_eq!(a.received_text(), vec![raw.to_string()]);
        assert_eq!(b.received_text(), vec![raw.to_string()]);
    }

    #[test]
    fn test_legacy_binary_keeps_frame_kind() {
        let fx = fixture(MissingUserPolicy::Drop);
        let a = connect(&fx);

        let raw = Frame::Binary(vec![1, 2, 3]);
        fx.router.handle_incoming(raw.clone(), a.id());

        assert_eq!(a.received(), vec![raw]);
    }

    #[test]
    fn test_closed_connections_are_skipped() {
        let fx = fixture(MissingUserPolicy::Drop);
        let a = connect(&fx);
        let b = connect(&fx);
        let c = connect(&fx);
        b.close();
        c.fail_sends();

        fx.router.handle_incoming(text("still delivered"), a.id());

        assert_eq!(a.received_text(), vec!["still delivered".to_string()]);
        assert!(b.received().is_empty());
        assert!(c.received().is_empty());
    }

    #[test]
    fn test_missing_user_dropped_by_default() {
        let fx = fixture(MissingUserPolicy::Drop);
        let a = connect(&fx);
        let b = connect(&fx);

        fx.router
            .handle_incoming(text(r#"{"type":"typing_start"}"#), a.id());

        assert!(b.received().is_empty());
        assert!(fx.presence.is_empty());
    }

    #[test]
    fn test_missing_user_relayed_as_empty_identity() {
        let fx = fixture(MissingUserPolicy::Relay);
        let a = connect(&fx);
        let b = connect(&fx);

        fx.router
            .handle_incoming(text(r#"{"type":"typing_start","user":null}"#), a.id());

        assert!(fx.presence.is_typing(""));
        assert_eq!(
            b.received_json(),
            vec![json!({"type": "typing_start", "user": ""})]
        );
    }

    #[test]
    fn test_release_all_typing_announces_every_user() {
        let fx = fixture(MissingUserPolicy::Drop);
        let a = connect(&fx);
        fx.presence.mark_typing("alice");
        fx.presence.mark_typing("bob");

        let released = fx.router.release_all_typing();

        assert_eq!(released, vec!["alice".to_string(), "bob".to_string()]);
        assert!(fx.presence.is_empty());
        let users: Vec<Value> = a
            .received_json()
            .into_iter()
            .map(|v| {
                assert_eq!(v["type"], "typing_stop");
                v["user"].clone()
            })
            .collect();
        assert_eq!(users, vec![json!("alice"), json!("bob")]);
    }
}
