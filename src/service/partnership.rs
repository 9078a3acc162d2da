use std::sync::Arc;

use snafu::{ResultExt, Snafu};
use tracing::instrument;

use super::mail::{Mail, Mailer};
use super::payment::{PaymentClient, PaymentError, WithdrawRequest};
use crate::model::User;

pub const RECEIPT_SUBJECT: &str = "Bank check";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum WithdrawError {
    #[snafu(display("{source}"))]
    Payment { source: PaymentError },
}

/// Outcome of a withdrawal the payment service accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    /// Whether the payment service settled the withdrawal with a plain 200.
    pub settled: bool,
    pub receipt_sent: bool,
}

#[derive(Debug, Clone)]
pub struct PartnershipService {
    payment: Arc<dyn PaymentClient>,
    mailer: Arc<dyn Mailer>,
    support_email: String,
}

impl PartnershipService {
    pub fn new(
        payment: Arc<dyn PaymentClient>,
        mailer: Arc<dyn Mailer>,
        support_email: impl Into<String>,
    ) -> Self {
        Self {
            payment,
            mailer,
            support_email: support_email.into(),
        }
    }

    /// Withdraw `amount` for the user, then mail them a receipt if the payment service settled it.
    ///
    /// The withdrawal is already committed upstream once the payment service answers,
    /// so a failure to deliver the receipt is logged and reported through [Withdrawal::receipt_sent] only.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn withdraw_money(&self, amount: u32, user: &User) -> Result<Withdrawal, WithdrawError> {
        let request = WithdrawRequest::new(amount, user.id.key());
        let reply = self
            .payment
            .withdraw_partnership_money(request)
            .await
            .context(PaymentSnafu)?;

        if !reply.is_settled() {
            tracing::info!(status = %reply.status, "withdrawal accepted without settlement, no receipt sent");
            return Ok(Withdrawal {
                settled: false,
                receipt_sent: false,
            });
        }

        let mail = Mail::new(
            user.email.clone(),
            RECEIPT_SUBJECT.to_string(),
            receipt_text(&user.nickname, amount, &self.support_email),
        );

        let receipt_sent = match self.mailer.send(mail).await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "withdrawal succeeded but the receipt could not be sent");
                false
            }
        };

        Ok(Withdrawal {
            settled: true,
            receipt_sent,
        })
    }
}

pub fn receipt_text(nickname: &str, amount: u32, support_email: &str) -> String {
    format!(
        "Dear {nickname}!\n\
         You withdrew {amount} from your tubelab account.\n\
         Here is a bank check:\n\
         inn: 1234556\n\
         op_id: 12323\n\
         ofd_id: 846123\n\
         \n\
         Thank you for staying with us!\n\
         \n\
         \n\
         Please do not reply to this email.\n\
         If you have any questions contact {support_email}\n"
    )
}
