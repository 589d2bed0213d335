//! Fake note API, identity provider, and function endpoint on an ephemeral port.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use notes_app::config::{AuthConfig, Config};

pub const GOOD_PASSWORD: &str = "correct horse";

/// Unsigned JWT for the given user, valid for an hour.
pub fn make_jwt(username: &str) -> String {
    make_jwt_expiring(username, chrono::Utc::now().timestamp() + 3600)
}

pub fn make_jwt_expiring(username: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let claims = json!({ "sub": format!("sub-{}", username), "cognito:username": username, "exp": exp });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{}.{}.sig", header, payload)
}

#[derive(Default)]
pub struct FakeApi {
    /// Token the GraphQL and function endpoints accept.
    pub accepted_token: Mutex<String>,
    pub notes: Mutex<Vec<Value>>,
    pub next_id: Mutex<u64>,
    pub graphql_requests: Mutex<Vec<Value>>,
    pub side_call_requests: Mutex<Vec<(Option<String>, Value)>>,
    pub auth_flows: Mutex<Vec<Value>>,
    /// Error message every GraphQL mutation answers with, when set.
    pub fail_mutations: Mutex<Option<String>>,
    /// Lifetime handed out by the identity provider.
    pub expires_in: Mutex<i64>,
    /// Continuation token ListNotes reports alongside its page.
    pub next_token: Mutex<Option<String>>,
}

impl FakeApi {
    pub fn new(token: &str) -> Arc<Self> {
        let api = Self::default();
        *api.accepted_token.lock().unwrap() = token.to_string();
        *api.expires_in.lock().unwrap() = 3600;
        Arc::new(api)
    }

    pub fn seed(&self, id: &str, name: &str) {
        self.notes.lock().unwrap().push(json!({
            "id": id,
            "name": name,
            "description": format!("{} description", name),
            "bloodLevel": "100",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z",
            "__typename": "Note"
        }));
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let token = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        token == self.accepted_token.lock().unwrap().as_str()
    }
}

async fn graphql(State(api): State<Arc<FakeApi>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    api.graphql_requests.lock().unwrap().push(body.clone());

    if !api.authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "errors": [{ "errorType": "UnauthorizedException", "message": "Valid authorization header not provided." }] })),
        )
            .into_response();
    }

    let operation = body["operationName"].as_str().unwrap_or_default().to_string();
    let input = body["variables"]["input"].clone();

    if operation != "ListNotes" {
        if let Some(message) = api.fail_mutations.lock().unwrap().clone() {
            let field = if operation == "CreateNote" { "createNote" } else { "deleteNote" };
            return Json(json!({
                "data": { field: null },
                "errors": [{ "message": message, "errorType": "DynamoDB:ConditionalCheckFailedException" }]
            }))
            .into_response();
        }
    }

    let data = match operation.as_str() {
        "ListNotes" => {
            let mut items: Vec<Value> = api.notes.lock().unwrap().clone();
            // Unreadable items come back as null
            items.push(Value::Null);
            let next_token = api.next_token.lock().unwrap().clone();
            json!({ "listNotes": { "items": items, "nextToken": next_token } })
        }
        "CreateNote" => {
            let id = {
                let mut next = api.next_id.lock().unwrap();
                *next += 1;
                format!("note-{}", *next)
            };
            let note = json!({
                "id": id,
                "name": input["name"],
                "description": input["description"],
                "bloodLevel": input["bloodLevel"],
                "createdAt": "2024-01-02T00:00:00.000Z",
                "updatedAt": "2024-01-02T00:00:00.000Z",
                "__typename": "Note"
            });
            api.notes.lock().unwrap().push(note.clone());
            json!({ "createNote": note })
        }
        "DeleteNote" => {
            let id = input["id"].as_str().unwrap_or_default().to_string();
            let mut notes = api.notes.lock().unwrap();
            let removed = notes.iter().position(|n| n["id"] == id).map(|i| notes.remove(i));
            json!({ "deleteNote": removed })
        }
        other => {
            return Json(json!({ "errors": [{ "message": format!("unknown operation {}", other) }] }))
                .into_response();
        }
    };

    Json(json!({ "data": data })).into_response()
}

async fn function(State(api): State<Arc<FakeApi>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let token = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    api.side_call_requests.lock().unwrap().push((token, body.clone()));

    if !api.authorized(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({ "message": "Forbidden" }))).into_response();
    }
    Json(json!({ "received": body, "status": "ok" })).into_response()
}

async fn cognito(State(api): State<Arc<FakeApi>>, headers: HeaderMap, body: String) -> Response {
    let target = headers
        .get("x-amz-target")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    if target != "AWSCognitoIdentityProviderService.InitiateAuth" {
        return (StatusCode::BAD_REQUEST, "unknown target").into_response();
    }

    let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    api.auth_flows.lock().unwrap().push(request.clone());

    let expires_in = *api.expires_in.lock().unwrap();
    let token = api.accepted_token.lock().unwrap().clone();

    match request["AuthFlow"].as_str() {
        Some("USER_PASSWORD_AUTH") if request["AuthParameters"]["PASSWORD"] == GOOD_PASSWORD => Json(json!({
            "AuthenticationResult": {
                "AccessToken": "access",
                "ExpiresIn": expires_in,
                "IdToken": token,
                "RefreshToken": "refresh-1",
                "TokenType": "Bearer"
            },
            "ChallengeParameters": {}
        }))
        .into_response(),
        Some("USER_PASSWORD_AUTH") => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "__type": "NotAuthorizedException", "message": "Incorrect username or password." })),
        )
            .into_response(),
        Some("REFRESH_TOKEN_AUTH") if request["AuthParameters"]["REFRESH_TOKEN"] == "refresh-1" => Json(json!({
            "AuthenticationResult": {
                "AccessToken": "access-2",
                "ExpiresIn": expires_in,
                "IdToken": token,
                "TokenType": "Bearer"
            },
            "ChallengeParameters": {}
        }))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "__type": "NotAuthorizedException", "message": "Invalid Refresh Token" })),
        )
            .into_response(),
    }
}

/// Serve the fake endpoints; returns the base URL.
pub async fn spawn(api: Arc<FakeApi>) -> String {
    let app = Router::new()
        .route("/graphql", post(graphql))
        .route("/function", post(function))
        .route("/", post(cognito))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn static_config(base: &str, token: &str) -> Config {
    Config {
        graphql_endpoint: format!("{}/graphql", base),
        region: "us-east-2".to_string(),
        auth: AuthConfig::StaticToken {
            id_token: token.to_string(),
        },
        side_call_url: format!("{}/function", base),
        request_timeout: std::time::Duration::from_secs(5),
    }
}

pub fn cognito_config(base: &str, password: &str) -> Config {
    Config {
        auth: AuthConfig::Cognito {
            endpoint: format!("{}/", base),
            client_id: "client-1".to_string(),
            username: "alice".to_string(),
            password: password.to_string(),
        },
        ..static_config(base, "unused")
    }
}
