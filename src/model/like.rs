use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{now, Timestamp, User, Video};
use crate::database::{Database, DatabaseQueryError, Record};
use crate::{define_relation, define_table};

/// A subscriber liking a video. The `(subscriber, video)` pair is unique,
/// enforced by the `likes_pair` index rather than by counting.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct Like {
    #[new(default)]
    pub id: Record<Like>,
    pub subscriber: Record<User>,
    pub video: Record<Video>,
    #[new(value = "now()")]
    pub created_at: Timestamp,
}

define_table!("likes" : Like = id);

define_relation! {
    Like > by_pair(subscriber: &Record<User>, video: &Record<Video>) > Vec<Like>
        where "SELECT * FROM likes WHERE subscriber = $subscriber AND video = $video"
}

define_relation! {
    Like > delete_pair(subscriber: &Record<User>, video: &Record<Video>) > Vec<Like>
        where "DELETE likes WHERE subscriber = $subscriber AND video = $video RETURN BEFORE"
}

impl Like {
    pub async fn exists(
        subscriber: &Record<User>,
        video: &Record<Video>,
        db: &Database,
    ) -> Result<bool, DatabaseQueryError> {
        Ok(!Like::by_pair(subscriber, video, db).await?.is_empty())
    }

    /// Remove the like if there is one. Returns whether anything was removed.
    pub async fn revoke(
        subscriber: &Record<User>,
        video: &Record<Video>,
        db: &Database,
    ) -> Result<bool, DatabaseQueryError> {
        if !Like::exists(subscriber, video, db).await? {
            return Ok(false);
        }

        let removed = Like::delete_pair(subscriber, video, db).await?;
        Ok(!removed.is_empty())
    }
}
