//! JSON shapes of request bodies and response payloads.

use serde::{Deserialize, Serialize};

use crate::model::{Authority, Comment, Timestamp, User, UserSubscription};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub user_id: String,
    pub video_id: String,
    pub text: String,
    pub created_at: Timestamp,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.key(),
            user_id: comment.author.key(),
            video_id: comment.video.key(),
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub nickname: String,
    pub email: String,
    pub authority: Authority,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.key(),
            nickname: user.nickname,
            email: user.email,
            authority: user.authority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    pub id: String,
    pub subscription_name: String,
    pub expiration_date: Timestamp,
}

impl From<UserSubscription> for SubscriptionView {
    fn from(subscription: UserSubscription) -> Self {
        Self {
            id: subscription.id.key(),
            subscription_name: subscription.subscription_name,
            expiration_date: subscription.expiration_date,
        }
    }
}

/// Issued on signup and signin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBody {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpBody {
    pub nickname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInBody {
    pub email: String,
    pub password: String,
}
