use derive_new::new;
use tracing::instrument;

use crate::auth::Session;
use crate::database::{Database, DatabaseQueryError};
use crate::model::User;

#[derive(Debug, Clone, new)]
pub struct UserService {
    database: Database,
}

impl UserService {
    /// The user behind the session, or `None` when the token names a user that no longer exists.
    #[instrument(skip(self, session), fields(sub = %session.credentials.sub))]
    pub async fn find_user_for_current_session(
        &self,
        session: &Session,
    ) -> Result<Option<User>, DatabaseQueryError> {
        let Some(id) = session.credentials.user_id() else {
            tracing::warn!("session carries a malformed user id");
            return Ok(None);
        };

        User::get(&id, &self.database).await
    }
}
