//! In-process fake backend for exercising the client over real HTTP.
//!
//! Spins up an axum server on an ephemeral port with the same REST surface
//! the real backend exposes: `/auth/*` plus CRUD for each entity
//! collection. State is shared with the test through a mutex so tests can
//! seed collections, flip failure modes, and assert per-endpoint hit
//! counts.

use crate::cache::{MemoryCache, SessionCache};
use crate::config::ClientConfig;
use crate::events::{ClientEvents, NavTarget};
use crate::gateway::HttpGateway;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type SharedBackend = Arc<Mutex<BackendState>>;

const COLLECTIONS: [&str; 4] = ["patients", "doctors", "departments", "appointments"];

/// Mutable state behind the fake backend.
pub struct BackendState {
    /// Accounts accepted by `/auth/login` as `(email, password)` pairs.
    pub accounts: Vec<(String, String)>,
    /// Claims minted into issued tokens.
    pub token_claims: Value,
    /// Body returned by `/auth/me`.
    pub me_body: Value,
    /// When set, `/auth/login` returns this token verbatim.
    pub issue_token: Option<String>,
    /// When set, `/auth/login` succeeds but returns an empty token.
    pub issue_empty_token: bool,
    /// When set, every authenticated endpoint answers 401.
    pub revoke_all: bool,
    collections: HashMap<&'static str, Vec<Value>>,
    issued_tokens: Vec<String>,
    hits: HashMap<String, usize>,
}

impl BackendState {
    pub fn new() -> Self {
        Self {
            accounts: vec![("doc@x.com".into(), "pw".into())],
            token_claims: json!({
                "sub": "doc@x.com",
                "name": "Dr. Sarah Smith",
                "role": "ROLE_DOCTOR"
            }),
            me_body: json!({"email": "doc@x.com", "role": "DOCTOR"}),
            issue_token: None,
            issue_empty_token: false,
            revoke_all: false,
            collections: COLLECTIONS
                .iter()
                .map(|name| (*name, Vec::new()))
                .collect(),
            issued_tokens: Vec::new(),
            hits: HashMap::new(),
        }
    }

    /// Seed one collection with pre-existing entities.
    pub fn seeded(mut self, name: &'static str, items: Vec<Value>) -> Self {
        self.collections.insert(name, items);
        self
    }

    pub fn collection(&self, name: &str) -> &Vec<Value> {
        self.collections.get(name).expect("known collection")
    }

    fn collection_mut(&mut self, name: &str) -> &mut Vec<Value> {
        self.collections.get_mut(name).expect("known collection")
    }

    /// Mark a token as accepted by the authenticated endpoints.
    pub fn accept_token(&mut self, token: &str) {
        self.issued_tokens.push(token.to_string());
    }

    fn hit(&mut self, key: &str) {
        *self.hits.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn hits(&self, key: &str) -> usize {
        self.hits.get(key).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.values().sum()
    }

    fn authorised(&self, headers: &HeaderMap) -> bool {
        if self.revoke_all {
            return false;
        }
        let Some(token) = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return false;
        };
        self.issued_tokens.iter().any(|issued| issued == token)
    }
}

/// Mint a structurally valid unsigned token carrying `claims`.
pub fn make_token(claims: &Value) -> String {
    let encode = |value: &Value| general_purpose::URL_SAFE_NO_PAD.encode(value.to_string());
    format!("{}.{}.sig", encode(&json!({"alg": "none"})), encode(claims))
}

// ============================================================================
// Handlers
// ============================================================================

type Reply = (StatusCode, Json<Value>);

fn unauthorised() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Token expired"})),
    )
}

async fn login(State(state): State<SharedBackend>, Json(body): Json<Value>) -> Reply {
    let mut st = state.lock().unwrap();
    st.hit("login");

    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let known = st
        .accounts
        .iter()
        .any(|(account, secret)| account == email && secret == password);
    if !known {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        );
    }

    if st.issue_empty_token {
        return (
            StatusCode::OK,
            Json(json!({"accessToken": "", "tokenType": "Bearer"})),
        );
    }
    let token = st
        .issue_token
        .clone()
        .unwrap_or_else(|| make_token(&st.token_claims));
    st.accept_token(&token);
    (
        StatusCode::OK,
        Json(json!({"accessToken": token, "tokenType": "Bearer"})),
    )
}

async fn register(State(state): State<SharedBackend>, Json(body): Json<Value>) -> Reply {
    let mut st = state.lock().unwrap();
    st.hit("register");

    let mut account = body;
    if let Some(object) = account.as_object_mut() {
        object.remove("password");
        object.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
    }
    (StatusCode::CREATED, Json(account))
}

async fn me(State(state): State<SharedBackend>, headers: HeaderMap) -> Reply {
    let mut st = state.lock().unwrap();
    st.hit("me");
    if !st.authorised(&headers) {
        return unauthorised();
    }
    (StatusCode::OK, Json(st.me_body.clone()))
}

fn list_entities(state: &SharedBackend, headers: &HeaderMap, name: &'static str) -> Reply {
    let mut st = state.lock().unwrap();
    st.hit(&format!("{name}.list"));
    if !st.authorised(headers) {
        return unauthorised();
    }
    (StatusCode::OK, Json(Value::Array(st.collection(name).clone())))
}

fn get_entity(state: &SharedBackend, headers: &HeaderMap, name: &'static str, id: &str) -> Reply {
    let mut st = state.lock().unwrap();
    st.hit(&format!("{name}.get"));
    if !st.authorised(headers) {
        return unauthorised();
    }
    match st
        .collection(name)
        .iter()
        .find(|entity| entity["id"] == json!(id))
    {
        Some(entity) => (StatusCode::OK, Json(entity.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("{name} entity not found")})),
        ),
    }
}

fn create_entity(
    state: &SharedBackend,
    headers: &HeaderMap,
    name: &'static str,
    mut body: Value,
) -> Reply {
    let mut st = state.lock().unwrap();
    st.hit(&format!("{name}.create"));
    if !st.authorised(headers) {
        return unauthorised();
    }
    let Some(object) = body.as_object_mut() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "expected a JSON object"})),
        );
    };
    if name == "patients" {
        // The real backend accepts primaryDoctorId on creation and
        // reports the reference back as doctorId.
        if let Some(doctor) = object.remove("primaryDoctorId") {
            object.insert("doctorId".into(), doctor);
        }
    }
    object.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));

    let entity = body.clone();
    st.collection_mut(name).push(body);
    (StatusCode::CREATED, Json(entity))
}

fn update_entity(
    state: &SharedBackend,
    headers: &HeaderMap,
    name: &'static str,
    id: &str,
    changes: Value,
) -> Reply {
    let mut st = state.lock().unwrap();
    st.hit(&format!("{name}.update"));
    if !st.authorised(headers) {
        return unauthorised();
    }
    let id_value = json!(id);
    let Some(entity) = st
        .collection_mut(name)
        .iter_mut()
        .find(|entity| entity["id"] == id_value)
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("{name} entity not found")})),
        );
    };
    if let (Some(target), Some(incoming)) = (entity.as_object_mut(), changes.as_object()) {
        for (key, value) in incoming {
            target.insert(key.clone(), value.clone());
        }
    }
    (StatusCode::OK, Json(entity.clone()))
}

fn delete_entity(state: &SharedBackend, headers: &HeaderMap, name: &'static str, id: &str) -> Reply {
    let mut st = state.lock().unwrap();
    st.hit(&format!("{name}.delete"));
    if !st.authorised(headers) {
        return unauthorised();
    }
    let id_value = json!(id);
    let collection = st.collection_mut(name);
    let before = collection.len();
    collection.retain(|entity| entity["id"] != id_value);
    if collection.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("{name} entity not found")})),
        );
    }
    (StatusCode::OK, Json(json!({})))
}

macro_rules! entity_handlers {
    ($list:ident, $get:ident, $create:ident, $update:ident, $delete:ident, $name:literal) => {
        async fn $list(State(state): State<SharedBackend>, headers: HeaderMap) -> Reply {
            list_entities(&state, &headers, $name)
        }
        async fn $get(
            State(state): State<SharedBackend>,
            Path(id): Path<String>,
            headers: HeaderMap,
        ) -> Reply {
            get_entity(&state, &headers, $name, &id)
        }
        async fn $create(
            State(state): State<SharedBackend>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> Reply {
            create_entity(&state, &headers, $name, body)
        }
        async fn $update(
            State(state): State<SharedBackend>,
            Path(id): Path<String>,
            headers: HeaderMap,
            Json(changes): Json<Value>,
        ) -> Reply {
            update_entity(&state, &headers, $name, &id, changes)
        }
        async fn $delete(
            State(state): State<SharedBackend>,
            Path(id): Path<String>,
            headers: HeaderMap,
        ) -> Reply {
            delete_entity(&state, &headers, $name, &id)
        }
    };
}

entity_handlers!(
    list_patients,
    get_patient,
    create_patient,
    update_patient,
    delete_patient,
    "patients"
);
entity_handlers!(
    list_doctors,
    get_doctor,
    create_doctor,
    update_doctor,
    delete_doctor,
    "doctors"
);
entity_handlers!(
    list_departments,
    get_department,
    create_department,
    update_department,
    delete_department,
    "departments"
);
entity_handlers!(
    list_appointments,
    get_appointment,
    create_appointment,
    update_appointment,
    delete_appointment,
    "appointments"
);

/// Start the fake backend; returns its base URL and the shared state.
pub async fn spawn_backend(state: BackendState) -> (String, SharedBackend) {
    let shared = Arc::new(Mutex::new(state));
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/patients", get(list_patients).post(create_patient))
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/doctors", get(list_doctors).post(create_doctor))
        .route(
            "/doctors/:id",
            get(get_doctor).put(update_doctor).delete(delete_doctor),
        )
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/:id",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
        .route(
            "/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route(
            "/appointments/:id",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake backend");
    });

    (format!("http://{addr}"), shared)
}

// ============================================================================
// Client fixture
// ============================================================================

/// Event subscriber that records everything it is told.
#[derive(Default)]
pub struct RecordingEvents {
    navigations: Mutex<Vec<NavTarget>>,
    revocations: AtomicUsize,
}

impl RecordingEvents {
    pub fn navigations(&self) -> Vec<NavTarget> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn revocations(&self) -> usize {
        self.revocations.load(Ordering::SeqCst)
    }
}

impl ClientEvents for RecordingEvents {
    fn navigate(&self, target: NavTarget) {
        self.navigations.lock().unwrap().push(target);
    }

    fn session_revoked(&self) {
        self.revocations.fetch_add(1, Ordering::SeqCst);
    }
}

/// A gateway wired to a fresh fake backend, with its cache and recorder.
pub struct Fixture {
    pub gateway: Arc<HttpGateway>,
    pub cache: Arc<MemoryCache>,
    pub events: Arc<RecordingEvents>,
    pub backend: SharedBackend,
}

impl Fixture {
    /// Mint a token the backend accepts, without a login round trip.
    pub fn sign_in_token(&self) -> String {
        let mut st = self.backend.lock().unwrap();
        let token = make_token(&st.token_claims);
        st.accept_token(&token);
        token
    }

    /// Put an accepted token in the cache, as after a successful login.
    pub fn authenticate(&self) -> String {
        let token = self.sign_in_token();
        self.cache.save_token(&token);
        token
    }
}

pub async fn fixture(state: BackendState) -> Fixture {
    let (base_url, backend) = spawn_backend(state).await;
    let cache = Arc::new(MemoryCache::new());
    let events = Arc::new(RecordingEvents::default());
    let config = ClientConfig::new(base_url, Duration::from_secs(10)).expect("config");
    let gateway = Arc::new(
        HttpGateway::new(&config, cache.clone(), events.clone()).expect("gateway"),
    );

    Fixture {
        gateway,
        cache,
        events,
        backend,
    }
}
