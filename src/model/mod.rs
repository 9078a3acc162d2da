use chrono::{DateTime, Utc};

pub use comment::Comment;
pub use like::Like;
pub use subscription::UserSubscription;
pub use user::{Authority, User};
pub use video::Video;

mod comment;
mod like;
mod subscription;
mod user;
mod video;

pub type Timestamp = DateTime<Utc>;

pub fn now() -> Timestamp {
    Utc::now()
}
