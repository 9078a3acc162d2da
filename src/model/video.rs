use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{now, Timestamp, User};
use crate::database::Record;
use crate::{define_relation, define_table};

/// An uploaded video. The MP4 content is stored inline with the row, as SurrealDB bytes.
#[derive(Clone, PartialEq, Deserialize, Serialize, new)]
pub struct Video {
    #[new(default)]
    pub id: Record<Video>,
    pub title: String,
    pub uploader: Record<User>,
    #[serde(with = "serde_bytes")]
    pub content: Vec<u8>,
    #[new(value = "now()")]
    pub created_at: Timestamp,
}

define_table!("videos" : Video = id);

define_relation! {
    Video > get(id: &Record<Video>) > Option<Video>
        where "SELECT * FROM $id"
}

impl std::fmt::Debug for Video {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Video")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("uploader", &self.uploader)
            .field("content", &format_args!("{} bytes", self.content.len()))
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use surrealdb::sql::Value;

    use super::*;

    #[test]
    fn content_is_stored_as_bytes() {
        let video = Video::new("clip".into(), Record::uuid(), vec![0, 0, 0, 24, 0x66]);

        let Value::Object(row) = surrealdb::sql::to_value(&video).unwrap() else {
            panic!("a video serializes to an object");
        };

        assert!(matches!(row.get("content"), Some(Value::Bytes(_))));
    }
}
