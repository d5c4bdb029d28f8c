#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use campus_backend::{
    auth::{models::SignupRequest, service::register_users},
    config::Config,
    database,
    state::{SharedState, State},
};

pub const PASSWORD: &str = "pass123";

pub struct TestApp {
    pub state: SharedState,
    pub router: Router,
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("JWT_SECRET", "integration-secret"),
        ("BCRYPT_COST", "4"),
        ("DATABASE_URL", "sqlite::memory:"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).expect("test config")
}

impl TestApp {
    pub async fn new() -> Self {
        let config = test_config();
        let pool = database::init_pool(&config.database_url, 1)
            .await
            .expect("in-memory pool");
        let state = State::new(config, pool);
        let router = campus_backend::app(state.clone());
        Self { state, router }
    }

    /// Creates an account and returns its id.
    pub async fn seed(&self, name: &str, role: &str, gender: &str, student_type: &str) -> String {
        let email = format!("{}@campus.edu", name.to_lowercase());
        let request = SignupRequest {
            name: Some(name.to_string()),
            email: Some(email.clone()),
            password: Some(PASSWORD.to_string()),
            role: Some(role.to_string()),
            department: Some("CSE".to_string()),
            gender: Some(gender.to_string()),
            student_type: Some(student_type.to_string()),
        };
        register_users(&self.state.pool, &[request], self.state.config.bcrypt_cost)
            .await
            .expect("seed user");

        campus_backend::database::queries::find_user_by_email(&self.state.pool, &email)
            .await
            .expect("lookup")
            .expect("seeded user")
            .id
    }

    pub async fn login(&self, name: &str) -> String {
        let email = format!("{}@campus.edu", name.to_lowercase());
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }
}
