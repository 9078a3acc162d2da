use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{now, Timestamp, User, Video};
use crate::database::{Database, DatabaseQueryError, Record};
use crate::{define_relation, define_table};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct Comment {
    #[new(default)]
    pub id: Record<Comment>,
    pub author: Record<User>,
    pub video: Record<Video>,
    pub text: String,
    #[new(value = "now()")]
    pub created_at: Timestamp,
}

define_table!("comments" : Comment = id);

define_relation! {
    Comment > by_video(video: &Record<Video>) > Vec<Comment>
        where "SELECT * FROM comments WHERE video = $video"
}

impl Comment {
    /// Comments left under the video, oldest first.
    pub async fn for_video(
        video: &Record<Video>,
        db: &Database,
    ) -> Result<Vec<Comment>, DatabaseQueryError> {
        let mut comments = Comment::by_video(video, db).await?;
        comments.sort_by_key(|comment| comment.created_at);
        Ok(comments)
    }
}
