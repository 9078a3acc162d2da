#![allow(dead_code)]

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use axum_test::{TestRequest, TestServer};
use secrecy::SecretString;
use url::Url;

use tubelab::api::{create_app, create_router, App};
use tubelab::auth::AuthConfig;
use tubelab::database::Database;
use tubelab::model::{User, Video};
use tubelab::service::mail::{Mail, MailError, Mailer};
use tubelab::service::payment::{HttpPaymentClient, PaymentConfig, WithdrawRequest};
use tubelab::status::{Envelope, Status};

pub const SUPPORT_EMAIL: &str = "support@tubelab.test";
pub const PASSWORD: &str = "correct horse battery staple";
pub const VIDEO_BYTES: &[u8] = &[0, 0, 0, 24, b'f', b't', b'y', b'p', b'm', b'p', b'4', b'2'];

/// Stands in for the remote payment service.
#[derive(Debug, Clone)]
pub struct FakePayment {
    status: Arc<AtomicU16>,
    pub requests: Arc<Mutex<Vec<WithdrawRequest>>>,
}

impl FakePayment {
    pub fn answer_with(&self, status: StatusCode) {
        self.status.store(status.as_u16(), Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<WithdrawRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve the fake on an ephemeral port and return its base url.
    async fn spawn(&self) -> Url {
        let router = Router::new()
            .route("/payment/withdrawPartnershipMoney", post(withdraw))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });

        Url::parse(&format!("http://{address}/")).unwrap()
    }
}

impl Default for FakePayment {
    fn default() -> Self {
        Self {
            status: Arc::new(AtomicU16::new(200)),
            requests: Arc::default(),
        }
    }
}

async fn withdraw(State(fake): State<FakePayment>, Json(request): Json<WithdrawRequest>) -> Response {
    fake.requests.lock().unwrap().push(request);

    let status = StatusCode::from_u16(fake.status.load(Ordering::SeqCst)).unwrap();
    let envelope = if status.is_success() {
        Envelope::<()>::new(&Status::Ok, None)
    } else {
        Envelope::new(&Status::request_failed("insufficient funds"), None)
    };

    (status, Json(envelope)).into_response()
}

#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Mail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

pub struct Harness {
    pub server: TestServer,
    pub app: App,
    pub payment: FakePayment,
    pub mailer: Arc<RecordingMailer>,
    pub user: User,
    pub token: String,
    pub video: Video,
}

impl Harness {
    pub async fn new() -> Self {
        let payment = FakePayment::default();
        let payment_url = payment.spawn().await;
        Self::with_payment_url(payment, payment_url).await
    }

    /// A harness whose payment service is not listening.
    pub async fn with_unreachable_payment() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{address}/")).unwrap();
        Self::with_payment_url(FakePayment::default(), url).await
    }

    async fn with_payment_url(payment: FakePayment, url: Url) -> Self {
        let database = Database::memory().await.unwrap();

        let client = HttpPaymentClient::new(&PaymentConfig { url }).unwrap();
        let mailer = Arc::new(RecordingMailer::default());
        let auth = AuthConfig {
            secret: SecretString::new("integration-secret".to_string()),
            ttl_days: 7,
        };

        let app = create_app(
            database.clone(),
            &auth,
            Arc::new(client),
            mailer.clone(),
            SUPPORT_EMAIL,
        );

        let user = app
            .authenticator
            .signup("korone", "korone@example.com", PASSWORD)
            .await
            .unwrap();
        let token = app.authenticator.issue(&user).unwrap();

        let video = database
            .insert(&Video::new("doggo".into(), user.id.clone(), VIDEO_BYTES.to_vec()))
            .await
            .unwrap();

        let server = TestServer::new(create_router(app.clone())).unwrap();

        Self {
            server,
            app,
            payment,
            mailer,
            user,
            token,
            video,
        }
    }

    pub fn database(&self) -> &Database {
        &self.app.database
    }

    pub fn get(&self, path: &str) -> TestRequest {
        authorized(self.server.get(path), &self.token)
    }

    pub fn post(&self, path: &str) -> TestRequest {
        authorized(self.server.post(path), &self.token)
    }
}

pub fn authorized(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        axum::http::header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

pub fn with_header(request: TestRequest, name: &'static str, value: &str) -> TestRequest {
    request.add_header(
        HeaderName::from_static(name),
        HeaderValue::from_str(value).unwrap(),
    )
}

pub fn envelope(response: &axum_test::TestResponse) -> Envelope<serde_json::Value> {
    response.json::<Envelope<serde_json::Value>>()
}
