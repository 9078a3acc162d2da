use derive_new::new;
use tracing::instrument;

use crate::database::{Database, DatabaseQueryError, Record};
use crate::model::{User, Video};
use crate::status::Status;

/// Ids that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidIds {
    pub video: Record<Video>,
    pub user: Option<Record<User>>,
}

/// Checks identifiers supplied in paths and headers: a video id, optionally paired with a user id.
#[derive(Debug, Clone, new)]
pub struct IdValidator {
    database: Database,
}

impl IdValidator {
    #[instrument(skip(self))]
    pub async fn check(
        &self,
        id: &str,
        secondary_id: Option<&str>,
    ) -> Result<Result<ValidIds, Status>, DatabaseQueryError> {
        let Some(video) = Record::<Video>::parse(id) else {
            return Ok(Err(Status::InvalidId { id: id.to_string() }));
        };

        let user = match secondary_id {
            Some(secondary_id) => match Record::<User>::parse(secondary_id) {
                Some(user) => Some(user),
                None => {
                    return Ok(Err(Status::InvalidId {
                        id: secondary_id.to_string(),
                    }))
                }
            },
            None => None,
        };

        if !self.database.exists(&video).await? {
            return Ok(Err(Status::NoSuchVideo));
        }

        if let Some(user) = &user {
            if !self.database.exists(user).await? {
                return Ok(Err(Status::NoSuchUser));
            }
        }

        Ok(Ok(ValidIds { video, user }))
    }

    pub async fn is_id_existing(
        &self,
        id: &str,
        secondary_id: Option<&str>,
    ) -> Result<bool, DatabaseQueryError> {
        Ok(self.check(id, secondary_id).await?.is_ok())
    }

    /// The status explaining why [IdValidator::is_id_existing] is false, or [Status::Ok] when it is not.
    pub async fn create_error_status(
        &self,
        id: &str,
        secondary_id: Option<&str>,
    ) -> Result<Status, DatabaseQueryError> {
        Ok(self.check(id, secondary_id).await?.err().unwrap_or(Status::Ok))
    }

    /// Resolve a video id, failing with the status a handler should answer with.
    pub async fn require_video(&self, id: &str) -> Result<Record<Video>, Status> {
        self.check(id, None).await?.map(|ids| ids.video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fixture() -> (IdValidator, Video, User) {
        let database = Database::memory().await.unwrap();
        let user = database
            .insert(&User::new("suisei".into(), "suisei@example.com".into()))
            .await
            .unwrap();
        let video = database
            .insert(&Video::new("stellar".into(), user.id.clone(), vec![0, 0, 0, 24]))
            .await
            .unwrap();

        (IdValidator::new(database), video, user)
    }

    #[tokio::test]
    async fn existing_video_is_valid() {
        let (validator, video, user) = fixture().await;

        let video_id = video.id.key();
        let user_id = user.id.key();

        assert!(validator.is_id_existing(&video_id, None).await.unwrap());
        assert!(validator.is_id_existing(&video_id, Some(&user_id)).await.unwrap());
        assert_eq!(validator.create_error_status(&video_id, None).await.unwrap(), Status::Ok);
        assert_eq!(validator.require_video(&video_id).await, Ok(video.id));
    }

    #[tokio::test]
    async fn malformed_id_is_invalid() {
        let (validator, _, _) = fixture().await;

        assert!(!validator.is_id_existing("videos:abc", None).await.unwrap());
        assert_eq!(
            validator.create_error_status("videos:abc", None).await.unwrap(),
            Status::InvalidId { id: "videos:abc".into() }
        );
    }

    #[tokio::test]
    async fn unknown_video_is_not_found() {
        let (validator, _, _) = fixture().await;
        let unknown = uuid::Uuid::new_v4().to_string();

        assert!(!validator.is_id_existing(&unknown, None).await.unwrap());
        assert_eq!(
            validator.create_error_status(&unknown, None).await.unwrap(),
            Status::NoSuchVideo
        );
        assert_eq!(validator.require_video(&unknown).await, Err(Status::NoSuchVideo));
    }

    #[tokio::test]
    async fn unknown_secondary_user_is_reported() {
        let (validator, video, _) = fixture().await;
        let unknown = uuid::Uuid::new_v4().to_string();

        assert_eq!(
            validator
                .create_error_status(&video.id.key(), Some(&unknown))
                .await
                .unwrap(),
            Status::NoSuchUser
        );
    }
}
