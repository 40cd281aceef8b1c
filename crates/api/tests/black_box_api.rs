use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

use hrdesk_api::app::{build_app, AppServices};
use hrdesk_audit::{actions, AuditEntry, AuditFilter, AuditStore, AuditStoreError, NewAuditEntry};
use hrdesk_auth::{PasswordHasher, Role, TokenPair, TokenPolicy, UserAccount};
use hrdesk_core::{EmployeeId, UserId};
use hrdesk_infra::{InMemoryAuditStore, InMemoryUserDirectory};

const JWT_SECRET: &str = "black-box-test-secret";
const PASSWORD: &str = "correct horse battery staple";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    directory: Arc<InMemoryUserDirectory>,
    audit: Arc<InMemoryAuditStore>,
    client: reqwest::Client,
    admin: UserId,
    manager: UserId,
    employee: UserId,
    manager_record: EmployeeId,
    employee_record: EmployeeId,
}

/// One active account per role, `<role>@company.com`, all sharing `PASSWORD`.
fn seeded_directory() -> (Arc<InMemoryUserDirectory>, Vec<(UserId, EmployeeId)>) {
    let directory = Arc::new(InMemoryUserDirectory::new());
    let hash = PasswordHasher::new().hash_password(PASSWORD).unwrap();
    let mut ids = Vec::new();
    for role in Role::ALL {
        let id = UserId::new();
        let employee_id = EmployeeId::new();
        directory
            .upsert(UserAccount {
                id,
                email: format!("{}@company.com", role.as_str()),
                password_hash: hash.clone(),
                role,
                is_active: true,
                employee_id: Some(employee_id),
            })
            .unwrap();
        ids.push((id, employee_id));
    }
    (directory, ids)
}

/// Same router as prod, bound to an ephemeral port.
async fn serve(services: Arc<AppServices>) -> (String, tokio::task::JoinHandle<()>) {
    let app = build_app(services);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), handle)
}

impl TestServer {
    async fn spawn() -> Self {
        let (directory, ids) = seeded_directory();
        let audit = Arc::new(InMemoryAuditStore::new());

        let services = Arc::new(AppServices::new(
            JWT_SECRET.as_bytes(),
            directory.clone(),
            audit.clone(),
            TokenPolicy::default(),
            50,
        ));
        let (base_url, handle) = serve(services).await;

        Self {
            base_url,
            handle,
            directory,
            audit,
            client: reqwest::Client::new(),
            admin: ids[0].0,
            manager: ids[1].0,
            employee: ids[2].0,
            manager_record: ids[1].1,
            employee_record: ids[2].1,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self, role: Role) -> TokenPair {
        let res = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": format!("{}@company.com", role.as_str()), "password": PASSWORD }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "login as {role} failed");

        let body: Value = res.json().await.unwrap();
        TokenPair {
            access_token: body["access_token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    async fn call(&self, method: reqwest::Method, path: &str, token: &str) -> (StatusCode, Value) {
        let res = self
            .client
            .request(method, self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        let status = res.status();
        let body = res.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn send_json(&self, method: reqwest::Method, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .request(method, self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        let body = res.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/refresh"))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .unwrap()
    }

    fn entries_with_action(&self, action: &str) -> Vec<AuditEntry> {
        self.audit
            .snapshot()
            .into_iter()
            .filter(|e| e.action == action)
            .collect()
    }

    /// Audit appends are fire-and-forget; poll briefly until `n` show up.
    async fn wait_for_entries(&self, action: &str, n: usize) -> Vec<AuditEntry> {
        for _ in 0..100 {
            let entries = self.entries_with_action(action);
            if entries.len() >= n {
                return entries;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("expected {n} {action} audit entries, found {}", self.entries_with_action(action).len());
    }

    /// Let any in-flight audit tasks finish.
    async fn settle(&self) {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint(claims: Value, algorithm: Algorithm, secret: &str) -> String {
    jsonwebtoken::encode(&Header::new(algorithm), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("failed to encode jwt")
}

fn access_claims(user_id: UserId, role: &str) -> Value {
    let now = Utc::now();
    json!({
        "user_id": user_id.to_string(),
        "role": role,
        "employee_id": EmployeeId::new().to_string(),
        "token_use": "access",
        "iat": now.timestamp(),
        "exp": (now + ChronoDuration::minutes(10)).timestamp(),
    })
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/api/auth/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "missing token" }));

    let res = srv
        .client
        .get(srv.url("/api/auth/me"))
        .header("Authorization", "Basic YWRtaW46YWRtaW4=")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "invalid authorization header" }));

    let (status, body) = srv.call(reqwest::Method::GET, "/api/auth/me", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "invalid token" }));

    srv.settle().await;
    assert!(srv.audit.is_empty(), "authentication failures are not audited");
}

#[tokio::test]
async fn login_issues_catalog_snapshot() {
    let srv = TestServer::spawn().await;
    let pair = srv.login(Role::Employee).await;

    let (status, body) = srv.call(reqwest::Method::GET, "/api/auth/me", &pair.access_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], srv.employee.to_string());
    assert_eq!(body["role"], "employee");
    assert_eq!(
        body["permissions"],
        json!([
            "request_leave",
            "view_own_leaves",
            "clock_attendance",
            "view_notifications",
            "view_profile",
            "update_profile",
            "view_own_payslips",
        ])
    );
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let srv = TestServer::spawn().await;
    let res = srv
        .client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "admin@company.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "invalid credentials" }));
}

#[tokio::test]
async fn route_matrix_matches_policy() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(Role::Admin).await.access_token;
    let manager = srv.login(Role::Manager).await.access_token;
    let employee = srv.login(Role::Employee).await.access_token;

    let cases = [
        (reqwest::Method::GET, "/api/employees", &admin, StatusCode::OK),
        (reqwest::Method::POST, "/api/departments", &manager, StatusCode::FORBIDDEN),
        (reqwest::Method::GET, "/api/employees", &employee, StatusCode::FORBIDDEN),
        (reqwest::Method::POST, "/api/leaves", &employee, StatusCode::OK),
        (reqwest::Method::GET, "/api/audit-logs", &manager, StatusCode::FORBIDDEN),
        (reqwest::Method::GET, "/api/leaves", &employee, StatusCode::FORBIDDEN),
        (reqwest::Method::GET, "/api/leaves", &manager, StatusCode::OK),
        (reqwest::Method::GET, "/api/departments", &manager, StatusCode::OK),
        (reqwest::Method::GET, "/api/audit-logs", &admin, StatusCode::OK),
    ];

    for (method, path, token, expected) in cases {
        let (status, body) = srv.call(method.clone(), path, token).await;
        assert_eq!(status, expected, "{method} {path}");
        if expected == StatusCode::FORBIDDEN {
            assert_eq!(body["code"], "FORBIDDEN", "{method} {path}");
            assert_eq!(body["error"], "forbidden");
        }
    }
}

#[tokio::test]
async fn forbidden_body_names_the_missing_requirement() {
    let srv = TestServer::spawn().await;
    let manager = srv.login(Role::Manager).await.access_token;

    let (status, body) = srv.call(reqwest::Method::POST, "/api/departments", &manager).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({
            "error": "forbidden",
            "code": "FORBIDDEN",
            "required_roles": [],
            "required_permissions": ["manage_departments"],
        })
    );

    let (status, body) = srv.call(reqwest::Method::GET, "/api/admin/catalog", &manager).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_roles"], json!(["admin"]));
    assert_eq!(body["required_permissions"], json!([]));
}

#[tokio::test]
async fn each_denial_is_audited_exactly_once() {
    let srv = TestServer::spawn().await;
    let manager = srv.login(Role::Manager).await.access_token;
    let employee = srv.login(Role::Employee).await.access_token;

    srv.call(reqwest::Method::POST, "/api/departments", &manager).await;
    srv.call(reqwest::Method::GET, "/api/employees", &employee).await;

    let denied = srv.wait_for_entries(actions::AUTHZ_DENIED, 2).await;
    srv.settle().await;
    let denied_after = srv.entries_with_action(actions::AUTHZ_DENIED);
    assert_eq!(denied_after.len(), 2, "no duplicate denial entries");

    let by_manager = denied.iter().find(|e| e.actor == Some(srv.manager)).unwrap();
    assert_eq!(by_manager.entity_type, "route");
    assert_eq!(by_manager.entity_id, None);
    assert_eq!(
        by_manager.metadata,
        json!({ "path": "/api/departments", "method": "POST", "role": "manager" })
    );

    let by_employee = denied.iter().find(|e| e.actor == Some(srv.employee)).unwrap();
    assert_eq!(
        by_employee.metadata,
        json!({ "path": "/api/employees", "method": "GET", "role": "employee" })
    );
}

#[tokio::test]
async fn allowed_request_without_business_audit_leaves_no_entries() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(Role::Admin).await.access_token;

    let (status, _) = srv.call(reqwest::Method::GET, "/api/employees", &admin).await;
    assert_eq!(status, StatusCode::OK);

    srv.settle().await;
    assert!(srv.audit.is_empty());
}

#[tokio::test]
async fn state_changes_record_business_entries() {
    let srv = TestServer::spawn().await;
    let employee = srv.login(Role::Employee).await.access_token;
    let admin = srv.login(Role::Admin).await.access_token;

    let res = srv
        .client
        .post(srv.url("/api/leaves"))
        .bearer_auth(&employee)
        .json(&json!({ "start_date": "2024-06-01", "end_date": "2024-06-03", "reason": "trip" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let leave: Value = res.json().await.unwrap();

    let entries = srv.wait_for_entries(actions::LEAVE_REQUESTED, 1).await;
    assert_eq!(entries[0].actor, Some(srv.employee));
    assert_eq!(entries[0].entity_type, "leave_request");
    assert_eq!(entries[0].entity_id.map(|id| id.to_string()), leave["id"].as_str().map(str::to_string));
    assert_eq!(entries[0].metadata, json!({ "start_date": "2024-06-01", "end_date": "2024-06-03" }));
    assert!(srv.entries_with_action(actions::AUTHZ_DENIED).is_empty());

    let (status, listed) = srv
        .call(reqwest::Method::GET, "/api/audit-logs?action=LEAVE_REQUESTED&limit=-3", &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["action"], "LEAVE_REQUESTED");
}

#[tokio::test]
async fn audit_listing_filters_and_validates() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(Role::Admin).await.access_token;
    let employee = srv.login(Role::Employee).await.access_token;

    srv.call(reqwest::Method::POST, "/api/attendance/clock-in", &employee).await;
    srv.call(reqwest::Method::POST, "/api/attendance/clock-out", &employee).await;
    srv.call(reqwest::Method::GET, "/api/employees", &employee).await;
    srv.wait_for_entries(actions::CLOCK_IN, 1).await;
    srv.wait_for_entries(actions::CLOCK_OUT, 1).await;
    srv.wait_for_entries(actions::AUTHZ_DENIED, 1).await;

    let path = format!("/api/audit-logs?user_id={}&from=garbage", srv.employee);
    let (status, listed) = srv.call(reqwest::Method::GET, &path, &admin).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap().clone();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|e| e["actor"] == srv.employee.to_string()));

    let (status, listed) = srv.call(reqwest::Method::GET, "/api/audit-logs?limit=1", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, body) = srv.call(reqwest::Method::GET, "/api/audit-logs?user_id=nope", &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid user_id" }));
}

#[tokio::test]
async fn deactivated_subject_cannot_login_or_refresh_but_access_survives() {
    let srv = TestServer::spawn().await;
    let pair = srv.login(Role::Employee).await;

    assert!(srv.directory.set_active(srv.employee, false).unwrap());

    let res = srv
        .client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "employee@company.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url("/api/auth/refresh"))
        .json(&json!({ "refresh_token": pair.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "invalid refresh token" }));

    let (status, _) = srv.call(reqwest::Method::GET, "/api/profile", &pair.access_token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_rotates_and_is_not_an_access_credential() {
    let srv = TestServer::spawn().await;
    let pair = srv.login(Role::Manager).await;

    let (status, _) = srv.call(reqwest::Method::GET, "/api/auth/me", &pair.refresh_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url("/api/auth/refresh"))
        .json(&json!({ "refresh_token": pair.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let rotated: Value = res.json().await.unwrap();

    let access = rotated["access_token"].as_str().unwrap();
    let (status, body) = srv.call(reqwest::Method::GET, "/api/auth/me", access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], srv.manager.to_string());

    let res = srv
        .client
        .post(srv.url("/api/auth/refresh"))
        .json(&json!({ "refresh_token": access }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn foreign_and_forged_tokens_are_rejected() {
    let srv = TestServer::spawn().await;

    let other_secret = mint(access_claims(srv.admin, "admin"), Algorithm::HS256, "some-other-secret");
    let wrong_alg = mint(access_claims(srv.admin, "admin"), Algorithm::HS512, JWT_SECRET);

    let mut expired_claims = access_claims(srv.admin, "admin");
    expired_claims["exp"] = json!(Utc::now().timestamp() - 1);
    expired_claims["iat"] = json!(Utc::now().timestamp() - 60);
    let expired = mint(expired_claims, Algorithm::HS256, JWT_SECRET);

    let mut anonymous_claims = access_claims(srv.admin, "admin");
    anonymous_claims.as_object_mut().unwrap().remove("user_id");
    let anonymous = mint(anonymous_claims, Algorithm::HS256, JWT_SECRET);

    let unsigned = format!(
        "{}.{}.",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(access_claims(srv.admin, "admin").to_string()),
    );

    for token in [other_secret, wrong_alg, expired, anonymous, unsigned] {
        let (status, body) = srv.call(reqwest::Method::GET, "/api/employees", &token).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {token}");
        assert_eq!(body, json!({ "error": "invalid token" }));
    }
}

#[tokio::test]
async fn missing_permission_claim_falls_back_to_role() {
    let srv = TestServer::spawn().await;

    // No `permissions` claim at all.
    let token = mint(access_claims(srv.employee, "employee"), Algorithm::HS256, JWT_SECRET);
    let (status, _) = srv.call(reqwest::Method::POST, "/api/leaves", &token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = srv.call(reqwest::Method::GET, "/api/employees", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unknown role and no permissions: nothing is granted.
    let token = mint(access_claims(srv.employee, "superuser"), Algorithm::HS256, JWT_SECRET);
    let (status, _) = srv.call(reqwest::Method::GET, "/api/profile", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = srv.call(reqwest::Method::GET, "/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"], json!([]));
}

#[tokio::test]
async fn explicit_permission_claim_is_honored() {
    let srv = TestServer::spawn().await;

    let mut claims = access_claims(srv.employee, "employee");
    claims["permissions"] = json!(["view_profile", "not_a_permission"]);
    let token = mint(claims, Algorithm::HS256, JWT_SECRET);

    let (status, _) = srv.call(reqwest::Method::GET, "/api/profile", &token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = srv.call(reqwest::Method::POST, "/api/leaves", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A claim naming only unknown permissions grants nothing, even for admin.
    let mut claims = access_claims(srv.admin, "admin");
    claims["permissions"] = json!(["launch_missiles"]);
    let token = mint(claims, Algorithm::HS256, JWT_SECRET);

    let (status, _) = srv.call(reqwest::Method::GET, "/api/employees", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = srv.call(reqwest::Method::GET, "/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"], json!([]));
}

#[tokio::test]
async fn admin_catalog_lists_every_role() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(Role::Admin).await.access_token;

    let (status, body) = srv.call(reqwest::Method::GET, "/api/admin/catalog", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"].as_array().unwrap().len(), 15);
    assert_eq!(body["manager"].as_array().unwrap().len(), 13);
    assert_eq!(body["employee"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn profile_update_needs_both_guards() {
    let srv = TestServer::spawn().await;

    let mut claims = access_claims(srv.employee, "employee");
    claims["permissions"] = json!(["update_profile"]);
    let token = mint(claims, Algorithm::HS256, JWT_SECRET);

    let (status, body) = srv.call(reqwest::Method::PUT, "/api/profile", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_permissions"], json!(["view_profile"]));
}

#[tokio::test]
async fn deactivating_an_employee_blocks_login_and_refresh() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(Role::Admin).await.access_token;
    let pair = srv.login(Role::Employee).await;

    let path = format!("/api/employees/{}", srv.employee_record);
    let (status, body) = srv.call(reqwest::Method::DELETE, &path, &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": srv.employee_record.to_string(), "is_active": false }));

    let res = srv
        .client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "email": "employee@company.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(srv.refresh(&pair.refresh_token).await.status(), StatusCode::UNAUTHORIZED);

    let entries = srv.wait_for_entries(actions::EMPLOYEE_DEACTIVATED, 1).await;
    assert_eq!(entries[0].actor, Some(srv.admin));
    assert_eq!(entries[0].entity_id, Some(*srv.employee_record.as_uuid()));
}

#[tokio::test]
async fn unknown_employee_is_not_found_and_not_audited() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(Role::Admin).await.access_token;
    let path = format!("/api/employees/{}", EmployeeId::new());

    let (status, body) = srv.call(reqwest::Method::DELETE, &path, &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "employee not found" }));

    let (status, _) = srv
        .send_json(reqwest::Method::PUT, &path, &admin, json!({ "role": "manager" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = srv
        .send_json(reqwest::Method::PUT, &path, &admin, json!({ "first_name": "Ada" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    srv.settle().await;
    assert!(srv.audit.is_empty());
}

#[tokio::test]
async fn role_change_is_picked_up_on_refresh() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(Role::Admin).await.access_token;
    let pair = srv.login(Role::Manager).await;
    let path = format!("/api/employees/{}", srv.manager_record);

    let (status, body) = srv
        .send_json(reqwest::Method::PUT, &path, &admin, json!({ "role": "superuser" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid role" }));

    let (status, _) = srv
        .send_json(reqwest::Method::PUT, &path, &admin, json!({ "role": "admin" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    // The old access credential keeps its snapshot until it expires.
    let (status, _) = srv.call(reqwest::Method::GET, "/api/audit-logs", &pair.access_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let res = srv.refresh(&pair.refresh_token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let rotated: Value = res.json().await.unwrap();
    let access = rotated["access_token"].as_str().unwrap();

    let (status, body) = srv.call(reqwest::Method::GET, "/api/auth/me", access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    let (status, _) = srv.call(reqwest::Method::GET, "/api/audit-logs", access).await;
    assert_eq!(status, StatusCode::OK);

    let entries = srv.wait_for_entries(actions::EMPLOYEE_UPDATED, 1).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].metadata, json!({ "role": "admin" }));
}

#[tokio::test]
async fn audit_listing_accepts_the_last_representable_day() {
    let srv = TestServer::spawn().await;
    let admin = srv.login(Role::Admin).await.access_token;

    let (status, body) = srv
        .call(reqwest::Method::GET, "/api/audit-logs?from=2000-01-01&to=%2B262142-12-31", &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());
}

struct UnavailableAuditStore;

#[async_trait]
impl AuditStore for UnavailableAuditStore {
    async fn append(&self, _entry: NewAuditEntry) -> Result<AuditEntry, AuditStoreError> {
        Err(AuditStoreError::Unavailable("connection refused".to_string()))
    }

    async fn list(&self, _filter: &AuditFilter) -> Result<Vec<AuditEntry>, AuditStoreError> {
        Err(AuditStoreError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn audit_store_outage_does_not_fail_requests() {
    let (directory, _) = seeded_directory();
    let services = Arc::new(AppServices::new(
        JWT_SECRET.as_bytes(),
        directory,
        Arc::new(UnavailableAuditStore),
        TokenPolicy::default(),
        50,
    ));
    let (base_url, handle) = serve(services).await;
    let client = reqwest::Client::new();

    let login: Value = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": "employee@company.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login["access_token"].as_str().unwrap();

    let res = client
        .post(format!("{base_url}/api/leaves"))
        .bearer_auth(token)
        .json(&json!({ "start_date": "2024-06-01", "end_date": "2024-06-03" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Denials are still answered with 403 when their audit entry cannot be written.
    let res = client
        .get(format!("{base_url}/api/employees"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    handle.abort();
}
