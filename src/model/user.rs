use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{now, Timestamp};
use crate::database::{Database, DatabaseQueryError, Record};
use crate::{define_relation, define_table};

/// Authority granted to a user. Serialized the same way in the database and in session tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Authority {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct User {
    #[new(default)]
    pub id: Record<User>,
    pub nickname: String,
    pub email: String,
    #[new(default)]
    pub authority: Authority,
    #[new(value = "now()")]
    pub created_at: Timestamp,
}

define_table!("users" : User = id);

define_relation! {
    User > get(id: &Record<User>) > Option<User>
        where "SELECT * FROM $id"
}

define_relation! {
    User > by_email(email: &str) > Option<User>
        where "SELECT * FROM users WHERE email = $email LIMIT 1"
}

define_relation! {
    User > find(email: &str, password: &str) > Option<User>
        where "SELECT * FROM users WHERE email = $email AND crypto::argon2::compare(password, $password) LIMIT 1"
}

impl User {
    /// Store the user together with a password hash computed by the database.
    /// The hash lives only in the row and is never read back into [User].
    pub async fn register(
        &self,
        password: &str,
        db: &Database,
    ) -> Result<User, DatabaseQueryError> {
        db.sql(
            "CREATE $id SET nickname = $nickname, email = $email, authority = $authority, \
             created_at = $created_at, password = crypto::argon2::generate($password)",
        )
        .bind(("id", &self.id))
        .bind(("nickname", &self.nickname))
        .bind(("email", &self.email))
        .bind(("authority", self.authority))
        .bind(("created_at", self.created_at))
        .bind(("password", password))
        .fetch_one()
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_users_get_the_user_authority() {
        let user = User::new("mio".into(), "mio@example.com".into());

        assert_eq!(Authority::default(), Authority::User);
        assert_eq!(user.authority, Authority::User);
        assert_eq!(serde_json::to_value(Authority::SuperAdmin).unwrap(), "SUPER_ADMIN");
    }
}
