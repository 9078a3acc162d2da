use std::sync::Arc;

use snafu::ResultExt;

use crate::auth::{AuthConfig, Authenticator, Session};
use crate::config::Config;
use crate::database::Database;
use crate::error::{ApplicationError, MailerSnafu, PaymentClientSnafu};
use crate::model::User;
use crate::service::mail::{self, Mailer};
use crate::service::partnership::PartnershipService;
use crate::service::payment::{HttpPaymentClient, PaymentClient};
use crate::service::users::UserService;
use crate::service::validation::IdValidator;
use crate::status::Status;

/// Everything a handler may need. Cheap to clone.
#[derive(Debug, Clone)]
pub struct App {
    pub database: Database,
    pub authenticator: Arc<Authenticator>,
    pub users: UserService,
    pub validator: IdValidator,
    pub partnership: Arc<PartnershipService>,
}

pub fn create_app(
    database: Database,
    auth: &AuthConfig,
    payment: Arc<dyn PaymentClient>,
    mailer: Arc<dyn Mailer>,
    support_email: &str,
) -> App {
    let authenticator = Authenticator::new(auth, database.clone());
    let partnership = PartnershipService::new(payment, mailer, support_email);

    App {
        authenticator: Arc::new(authenticator),
        users: UserService::new(database.clone()),
        validator: IdValidator::new(database.clone()),
        partnership: Arc::new(partnership),
        database,
    }
}

impl App {
    /// The user behind the session, or `THERE_IS_NO_SUCH_USER`.
    pub async fn current_user(&self, session: &Session) -> Result<User, Status> {
        self.users
            .find_user_for_current_session(session)
            .await?
            .ok_or(Status::NoSuchUser)
    }

    /// Wire the production payment client and mailer described by the configuration.
    pub fn from_config(config: &Config, database: Database) -> Result<App, ApplicationError> {
        let payment = HttpPaymentClient::new(&config.payment).context(PaymentClientSnafu)?;
        let mailer = mail::from_config(&config.mail).context(MailerSnafu)?;

        Ok(create_app(
            database,
            &config.auth,
            Arc::new(payment),
            mailer,
            &config.mail.support_email,
        ))
    }
}
