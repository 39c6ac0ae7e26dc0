//! End-to-end launcher flows over a scripted lobby and recording adapters.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use roomgate::prelude::*;
use roomgate::{LaunchSession, USERNAME_KEY};
use roomgate_form::keys;
use roomgate_protocol::{Register, ServerErrorEnvelope};
use uuid::Uuid;

// =========================================================================
// Fixtures
// =========================================================================

const USER_ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";
const ROOM: &str = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8";

fn room() -> RoomId {
    RoomId(Uuid::parse_str(ROOM).unwrap())
}

fn user() -> User {
    User {
        id: USER_ID.into(),
        username: "ada".into(),
        ticket: "ticket".into(),
    }
}

fn refused(message: &str) -> AppError {
    ServerErrorEnvelope {
        error: serde_json::json!({}),
        message: message.into(),
    }
    .into()
}

/// A lobby whose answers are fixed up front.
struct ScriptedLobby {
    create: Result<RoomId, AppError>,
    join: Result<(), AppError>,
    ready: Result<RoomConfig, AppError>,
    calls: Mutex<Vec<&'static str>>,
}

impl Default for ScriptedLobby {
    fn default() -> Self {
        Self {
            create: Ok(room()),
            join: Ok(()),
            ready: Ok(RoomConfig {
                players: vec!["p1".into(), "p2".into()],
            }),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl LobbyApi for ScriptedLobby {
    async fn register(&self, register: &Register) -> Result<User, AppError> {
        self.calls.lock().unwrap().push("register");
        Ok(User {
            username: register.username.clone(),
            ..user()
        })
    }

    async fn create_room(&self, _user: &User, _count: u32) -> Result<RoomId, AppError> {
        self.calls.lock().unwrap().push("create");
        self.create.clone()
    }

    async fn join_room(&self, _user: &User, _room: RoomId) -> Result<(), AppError> {
        self.calls.lock().unwrap().push("join");
        self.join.clone()
    }

    async fn room_ready(&self, _user: &User, _room: RoomId) -> Result<RoomConfig, AppError> {
        self.calls.lock().unwrap().push("ready");
        self.ready.clone()
    }
}

/// An adapter that records what it was handed.
#[derive(Clone, Default)]
struct Recorder {
    handed: Arc<Mutex<Vec<(LaunchArgs, String)>>>,
}

impl Adapter for Recorder {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Native
    }

    async fn hand_off(
        &self,
        args: LaunchArgs,
        target: &RenderTarget,
    ) -> Result<(), DispatchError> {
        self.handed.lock().unwrap().push((args, target.to_string()));
        Ok(())
    }
}

/// Holds a call until the test releases it.
#[derive(Clone, Default)]
struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

/// A scripted lobby whose `create_room` waits at a gate.
struct GatedLobby {
    inner: ScriptedLobby,
    gate: Gate,
}

impl LobbyApi for GatedLobby {
    async fn register(&self, register: &Register) -> Result<User, AppError> {
        self.inner.register(register).await
    }

    async fn create_room(&self, user: &User, count: u32) -> Result<RoomId, AppError> {
        self.gate.pass().await;
        self.inner.create_room(user, count).await
    }

    async fn join_room(&self, user: &User, room: RoomId) -> Result<(), AppError> {
        self.inner.join_room(user, room).await
    }

    async fn room_ready(&self, user: &User, room: RoomId) -> Result<RoomConfig, AppError> {
        self.inner.room_ready(user, room).await
    }
}

/// A recorder whose hand-off waits at a gate.
#[derive(Clone, Default)]
struct GatedRecorder {
    recorder: Recorder,
    gate: Gate,
}

impl Adapter for GatedRecorder {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Native
    }

    async fn hand_off(
        &self,
        args: LaunchArgs,
        target: &RenderTarget,
    ) -> Result<(), DispatchError> {
        self.gate.pass().await;
        self.recorder.hand_off(args, target).await
    }
}

type TestLauncher = Launcher<ScriptedLobby, Disabled, Recorder>;

fn launcher(lobby: ScriptedLobby) -> (TestLauncher, Recorder) {
    let recorder = Recorder::default();
    let router = DispatchRouter::new(
        Runtime::Native,
        Disabled(AdapterKind::Module),
        recorder.clone(),
    );
    (Launcher::new(LauncherConfig::default(), lobby, router), recorder)
}

// =========================================================================
// Registration
// =========================================================================

#[tokio::test]
async fn test_register_blank_username_is_field_error() {
    let (launcher, _) = launcher(ScriptedLobby::default());

    let err = launcher.register("   ").await.unwrap_err();

    assert!(matches!(err, RoomgateError::App(AppError::UsernameEmpty)));
    assert_eq!(
        launcher
            .errors()
            .message_for(&FieldKey::field(USERNAME_KEY))
            .as_deref(),
        Some("Username can't be empty")
    );
}

#[tokio::test]
async fn test_register_trims_username() {
    let (launcher, _) = launcher(ScriptedLobby::default());
    let user = launcher.register(" ada ").await.unwrap();
    assert_eq!(user.username, "ada");
}

// =========================================================================
// Create / join
// =========================================================================

#[tokio::test]
async fn test_create_hands_off_room_config_only() {
    let (launcher, recorder) = launcher(ScriptedLobby::default());

    let launched = launcher.create(&user(), 2).await.unwrap();

    assert_eq!(launched.room_id, room());
    assert_eq!(launched.adapter, AdapterKind::Native);
    assert_eq!(launcher.session().state(), LaunchState::HandedOff);

    let handed = recorder.handed.lock().unwrap();
    assert_eq!(handed.len(), 1);
    let (args, target) = &handed[0];
    assert_eq!(args.room_config_json, r#"{"players":["p1","p2"]}"#);
    assert_eq!(args.room_uuid, ROOM);
    assert_eq!(args.user_uuid, USER_ID);
    assert_eq!(args.http_baseurl, "http://localhost:8080/");
    assert_eq!(target, "#game");
}

#[tokio::test]
async fn test_create_refusal_goes_to_form_banner() {
    let lobby = ScriptedLobby {
        create: Err(refused("too many rooms")),
        ..ScriptedLobby::default()
    };
    let (launcher, recorder) = launcher(lobby);

    let err = launcher.create(&user(), 2).await.unwrap_err();

    assert!(matches!(err, RoomgateError::App(AppError::Server { .. })));
    assert_eq!(
        launcher.errors().message_for(&FieldKey::Form).as_deref(),
        Some("Request refused: too many rooms")
    );
    assert!(recorder.handed.lock().unwrap().is_empty());
    assert_eq!(launcher.session().state(), LaunchState::Idle);
}

#[tokio::test]
async fn test_join_malformed_room_id_never_reaches_lobby() {
    let (launcher, _) = launcher(ScriptedLobby::default());

    let err = launcher.join(&user(), "not-a-room").await.unwrap_err();

    assert!(matches!(err, RoomgateError::Invalid(_)));
    assert_eq!(
        launcher
            .errors()
            .message_for(&FieldKey::field(keys::ROOM_ID))
            .as_deref(),
        Some("Failed to decode 'roomId': Not a valid UUID")
    );
}

#[tokio::test]
async fn test_join_waits_for_ready_then_hands_off() {
    let (launcher, recorder) = launcher(ScriptedLobby::default());

    launcher.join(&user(), &format!(" {ROOM} ")).await.unwrap();

    assert_eq!(recorder.handed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ready_with_bad_user_id_reports_field_error() {
    let (launcher, recorder) = launcher(ScriptedLobby::default());
    let broken = User {
        id: "nobody".into(),
        ..user()
    };

    let err = launcher.create(&broken, 2).await.unwrap_err();

    assert!(matches!(err, RoomgateError::Invalid(ref f) if f.len() == 1));
    assert!(
        launcher
            .errors()
            .message_for(&FieldKey::field(keys::USER_ID))
            .is_some()
    );
    assert!(recorder.handed.lock().unwrap().is_empty());
}

// =========================================================================
// Connect / dispatch failures
// =========================================================================

#[tokio::test]
async fn test_connect_from_link_round_trip() {
    let (launcher, recorder) = launcher(ScriptedLobby::default());
    let descriptor = validate_connection(&RawConnection::new(
        "http://localhost:8080",
        "ws://localhost:8080",
        USER_ID,
        "ticket",
        ROOM,
        r#"{"players": []}"#,
    ))
    .unwrap();
    let origin = "http://localhost:3000".parse().unwrap();
    let link = descriptor.room_link(&origin).unwrap();

    launcher.connect(&RawConnection::from_link(&link)).await.unwrap();

    assert_eq!(recorder.handed.lock().unwrap()[0].0.user_ticket, "ticket");
}

#[tokio::test]
async fn test_unavailable_adapter_marks_session_failed() {
    let router = DispatchRouter::new(
        Runtime::InProcess,
        Disabled(AdapterKind::Module),
        Recorder::default(),
    );
    let launcher = Launcher::new(LauncherConfig::default(), ScriptedLobby::default(), router);

    let err = launcher.create(&user(), 2).await.unwrap_err();

    assert!(matches!(
        err,
        RoomgateError::Dispatch(DispatchError::AdapterUnavailable(AdapterKind::Module))
    ));
    assert_eq!(launcher.session().state(), LaunchState::Failed);
}

#[tokio::test]
async fn test_cancel_clears_form_errors() {
    let lobby = ScriptedLobby {
        ready: Err(AppError::fetch("timeout")),
        ..ScriptedLobby::default()
    };
    let (launcher, _) = launcher(lobby);
    launcher.create(&user(), 2).await.unwrap_err();
    assert!(launcher.errors().message_for(&FieldKey::Form).is_some());

    launcher.cancel();

    assert!(launcher.errors().message_for(&FieldKey::Form).is_none());
    assert_eq!(launcher.session().state(), LaunchState::Idle);
}

#[test]
fn test_stale_attempt_cannot_advance() {
    let session = LaunchSession::new();
    let attempt = session.begin();
    session.cancel();
    assert!(matches!(
        session.advance(attempt, LaunchState::Validated),
        Err(RoomgateError::Cancelled)
    ));
}

#[tokio::test]
async fn test_lobby_answer_after_cancel_is_dropped() {
    let gate = Gate::default();
    let lobby = GatedLobby {
        inner: ScriptedLobby {
            create: Err(refused("too late")),
            ..ScriptedLobby::default()
        },
        gate: gate.clone(),
    };
    let recorder = Recorder::default();
    let router = DispatchRouter::new(
        Runtime::Native,
        Disabled(AdapterKind::Module),
        recorder.clone(),
    );
    let launcher = Launcher::new(LauncherConfig::default(), lobby, router);
    let user = user();

    let (result, ()) = tokio::join!(launcher.create(&user, 2), async {
        gate.entered.notified().await;
        launcher.cancel();
        gate.release.notify_one();
    });

    assert!(matches!(result, Err(RoomgateError::Cancelled)));
    assert!(launcher.errors().message_for(&FieldKey::Form).is_none());
    assert!(launcher.errors().snapshot().is_empty());
    assert_eq!(launcher.session().state(), LaunchState::Idle);
    assert!(recorder.handed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_hand_off_finishing_after_cancel_is_dropped() {
    let adapter = GatedRecorder::default();
    let router = DispatchRouter::new(
        Runtime::Native,
        Disabled(AdapterKind::Module),
        adapter.clone(),
    );
    let launcher = Launcher::new(LauncherConfig::default(), ScriptedLobby::default(), router);
    let user = user();

    let (result, ()) = tokio::join!(launcher.create(&user, 2), async {
        adapter.gate.entered.notified().await;
        assert_eq!(launcher.session().state(), LaunchState::Dispatching);
        launcher.cancel();
        adapter.gate.release.notify_one();
    });

    assert!(matches!(result, Err(RoomgateError::Cancelled)));
    assert!(launcher.errors().message_for(&FieldKey::Form).is_none());
    assert_eq!(launcher.session().state(), LaunchState::Idle);
    assert_eq!(adapter.recorder.handed.lock().unwrap().len(), 1);
}
