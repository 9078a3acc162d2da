use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use derive_new::new;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use snafu::{Location, OptionExt as _, ResultExt as _, Snafu};

use crate::api::App;
use crate::database::{Database, DatabaseQueryError, Record};
use crate::model::{Authority, User};
use crate::status::Status;

/// Name of the cookie that may carry the session token instead of the `Authorization` header.
pub const SESSION_COOKIE: &str = "session";

/// Authorities allowed on subscriber and partnership endpoints.
pub const SUBSCRIBER_AUTHORITIES: &[Authority] =
    &[Authority::User, Authority::Admin, Authority::SuperAdmin];

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(rename = "jwt_secret")]
    pub secret: SecretString,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(rename = "session_ttl_days", default = "default_ttl_days")]
    pub ttl_days: i64,
}

fn default_ttl_days() -> i64 {
    7
}

/// Claims stored in the session token.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct UserCredentials {
    // public claims
    pub exp: i64,
    pub sub: String,

    // user data
    pub nickname: String,
    pub authority: Authority,
}

impl UserCredentials {
    pub fn user_id(&self) -> Option<Record<User>> {
        Record::parse(&self.sub)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AuthError {
    #[snafu(display("failed to decode JWT token"))]
    Decode {
        source: jsonwebtoken::errors::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to encode JWT token"))]
    Encode {
        source: jsonwebtoken::errors::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("request is not authenticated"))]
    ExtractToken {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("authority {authority:?} is not allowed here"))]
    Forbidden { authority: Authority },

    #[snafu(display("user with email '{email}' already exists"))]
    UserAlreadyExists { email: String },

    #[snafu(display("invalid login for '{email}'"))]
    SignIn { email: String },

    #[snafu(display("failed to query users: {source}"))]
    UserQuery {
        source: DatabaseQueryError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl From<AuthError> for Status {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Decode { .. } | AuthError::ExtractToken { .. } => Status::Unauthorized,
            AuthError::Forbidden { .. } => Status::Forbidden,
            AuthError::UserAlreadyExists { .. } => Status::UserAlreadyExists,
            AuthError::SignIn { .. } => Status::InvalidCredentials,
            AuthError::Encode { .. } | AuthError::UserQuery { .. } => {
                tracing::error!(%error, "authentication failed unexpectedly");
                Status::request_failed(error)
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        Status::from(self).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct Authenticator {
    secret: SecretString,
    algorithm: Algorithm,
    validation: Validation,
    ttl: Duration,

    database: Database,
}

impl Authenticator {
    pub fn new(config: &AuthConfig, database: Database) -> Self {
        let algorithm = Algorithm::HS256;

        Self {
            secret: config.secret.clone(),
            algorithm,
            validation: Validation::new(algorithm),
            ttl: Duration::days(config.ttl_days),
            database,
        }
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    fn header(&self) -> jsonwebtoken::Header {
        jsonwebtoken::Header::new(self.algorithm)
    }

    pub fn decode(&self, token: &str) -> Result<UserCredentials, AuthError> {
        jsonwebtoken::decode(token, &self.decoding_key(), &self.validation)
            .map(|data| data.claims)
            .context(DecodeSnafu)
    }

    pub fn encode(&self, claims: &UserCredentials) -> Result<String, AuthError> {
        jsonwebtoken::encode(&self.header(), claims, &self.encoding_key()).context(EncodeSnafu)
    }

    pub fn expiration(&self) -> i64 {
        (Utc::now() + self.ttl).timestamp()
    }

    pub fn as_credentials(&self, user: &User) -> UserCredentials {
        UserCredentials {
            exp: self.expiration(),
            sub: user.id.key(),
            nickname: user.nickname.clone(),
            authority: user.authority,
        }
    }

    /// Issue a session token for the user.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.encode(&self.as_credentials(user))
    }

    /// Read the session token from the bearer header, falling back to the session cookie.
    pub fn extract_token(&self, parts: &Parts) -> Result<UserCredentials, AuthError> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_owned);

        let token = bearer
            .or_else(|| {
                CookieJar::from_headers(&parts.headers)
                    .get(SESSION_COOKIE)
                    .map(|cookie| cookie.value().to_owned())
            })
            .context(ExtractTokenSnafu)?;

        self.decode(token.trim())
    }
}

impl Authenticator {
    pub async fn signin(&self, email: &str, password: &str) -> Result<User, AuthError> {
        User::find(email, password, &self.database)
            .await
            .context(UserQuerySnafu)?
            .context(SignInSnafu { email })
    }

    pub async fn signup(
        &self,
        nickname: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let existing = User::by_email(email, &self.database)
            .await
            .context(UserQuerySnafu)?;
        if existing.is_some() {
            return UserAlreadyExistsSnafu { email }.fail();
        }

        let user = User::new(nickname.to_string(), email.to_string());
        let user = user
            .register(password, &self.database)
            .await
            .context(UserQuerySnafu)?;

        tracing::info!(user_id = %user.id, "registered a new user");
        Ok(user)
    }
}

/// The caller's decoded session.
#[derive(Debug, Clone)]
pub struct Session {
    pub credentials: UserCredentials,
}

impl Session {
    pub fn require(&self, allowed: &[Authority]) -> Result<(), AuthError> {
        let authority = self.credentials.authority;
        if allowed.contains(&authority) {
            Ok(())
        } else {
            ForbiddenSnafu { authority }.fail()
        }
    }
}

#[async_trait]
impl FromRequestParts<App> for Session {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, app: &App) -> Result<Self, Self::Rejection> {
        let credentials = app.authenticator.extract_token(parts)?;
        Ok(Session { credentials })
    }
}

/// A session allowed to use the subscriber and partnership endpoints.
#[derive(Debug, Clone)]
pub struct Subscriber(pub Session);

#[async_trait]
impl FromRequestParts<App> for Subscriber {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, app: &App) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, app).await?;
        session.require(SUBSCRIBER_AUTHORITIES)?;
        Ok(Subscriber(session))
    }
}
