use std::time::Duration;

use async_trait::async_trait;
use derive_new::new;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use tracing::instrument;
use url::Url;

use crate::status::Envelope;

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    /// Base url of the payment service.
    #[serde(rename = "payment_url")]
    pub url: Url,
}

/// Body of a withdrawal call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub amount: u32,
    pub user_id: String,
}

/// What the payment service answered with, for any 2xx reply.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReply {
    pub status: StatusCode,
    pub envelope: Option<Envelope<serde_json::Value>>,
}

impl PaymentReply {
    /// Only a plain 200 means the money has been moved.
    pub fn is_settled(&self) -> bool {
        self.status == StatusCode::OK
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PaymentError {
    #[snafu(display("invalid payment service url `{url}`: {source}"))]
    Endpoint { url: Url, source: url::ParseError },

    #[snafu(display("could not build the payment client: {source}"))]
    Build { source: reqwest::Error },

    #[snafu(display("could not reach the payment service: {source}"))]
    Transport { source: reqwest::Error },

    #[snafu(display("payment service rejected the withdrawal with {status}: {message}"))]
    Rejected { status: StatusCode, message: String },
}

/// Proxy of the remote payment service.
#[async_trait]
pub trait PaymentClient: Send + Sync + std::fmt::Debug {
    async fn withdraw_partnership_money(
        &self,
        request: WithdrawRequest,
    ) -> Result<PaymentReply, PaymentError>;
}

#[derive(Debug, Clone)]
pub struct HttpPaymentClient {
    client: reqwest::Client,
    withdraw_endpoint: Url,
}

impl HttpPaymentClient {
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let mut base = config.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let withdraw_endpoint = base
            .join("payment/withdrawPartnershipMoney")
            .context(EndpointSnafu { url: base.clone() })?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context(BuildSnafu)?;

        Ok(Self {
            client,
            withdraw_endpoint,
        })
    }

    pub fn withdraw_endpoint(&self) -> &Url {
        &self.withdraw_endpoint
    }
}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    #[instrument(skip(self))]
    async fn withdraw_partnership_money(
        &self,
        request: WithdrawRequest,
    ) -> Result<PaymentReply, PaymentError> {
        tracing::info!(endpoint = %self.withdraw_endpoint, "requesting partnership withdrawal");

        let response = self
            .client
            .post(self.withdraw_endpoint.clone())
            .json(&request)
            .send()
            .await
            .context(TransportSnafu)?;

        let status = response.status();
        let body = response.text().await.context(TransportSnafu)?;
        let envelope = serde_json::from_str::<Envelope<serde_json::Value>>(&body).ok();

        if !status.is_success() {
            let message = rejection_message(status, envelope, body);
            return RejectedSnafu { status, message }.fail();
        }

        Ok(PaymentReply { status, envelope })
    }
}

fn rejection_message(
    status: StatusCode,
    envelope: Option<Envelope<serde_json::Value>>,
    body: String,
) -> String {
    match envelope {
        Some(envelope) => envelope.status.message,
        None if !body.trim().is_empty() => body,
        None => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
