use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{Timestamp, User};
use crate::database::{Database, DatabaseQueryError, Record};
use crate::{define_relation, define_table};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct UserSubscription {
    #[new(default)]
    pub id: Record<UserSubscription>,
    pub subscription_name: String,
    pub owner: Record<User>,
    pub expiration_date: Timestamp,
}

define_table!("user_subscriptions" : UserSubscription = id);

define_relation! {
    UserSubscription > by_owner(owner: &Record<User>) > Vec<UserSubscription>
        where "SELECT * FROM user_subscriptions WHERE owner = $owner"
}

impl UserSubscription {
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.expiration_date > now
    }

    /// Subscriptions of the user that have not expired at `now`, soonest expiration first.
    pub async fn active_for(
        owner: &Record<User>,
        now: Timestamp,
        db: &Database,
    ) -> Result<Vec<UserSubscription>, DatabaseQueryError> {
        let mut subscriptions: Vec<_> = UserSubscription::by_owner(owner, db)
            .await?
            .into_iter()
            .filter(|subscription| subscription.is_active(now))
            .collect();

        subscriptions.sort_by_key(|subscription| subscription.expiration_date);
        Ok(subscriptions)
    }
}
