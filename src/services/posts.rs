use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::{Comment, Like, Post};
use crate::utils::error::AppError;

/// Post CRUD plus embedded like/comment edits.
pub struct PostService {
    pub db: Arc<DatabaseService>,
}

impl PostService {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Create a post, snapshotting the acting user's current name/avatar
    pub async fn create(&self, user_id: Uuid, text: &str) -> Result<Post, AppError> {
        let user = match self.db.get_user_by_id(&user_id).await? {
            Some(user) => user,
            None => return Err(AppError::bad_request("User does not exist")),
        };

        self.db
            .insert_post(&user.id, &user.name, &user.avatar, text)
            .await
    }

    /// All posts, newest first
    pub async fn list(&self) -> Result<Vec<Post>, AppError> {
        self.db.list_posts().await
    }

    pub async fn get(&self, post_id: Uuid) -> Result<Post, AppError> {
        match self.db.get_post(&post_id).await? {
            Some(post) => Ok(post),
            None => Err(AppError::bad_request("Post not Found")),
        }
    }

    /// Delete a post; only the stored author may do so.
    pub async fn delete(&self, post_id: Uuid, acting_user: Uuid) -> Result<Post, AppError> {
        let post = match self.db.get_post(&post_id).await? {
            Some(post) => post,
            None => return Err(AppError::bad_request("Post not exist")),
        };

        if post.user != acting_user {
            return Err(AppError::unauthorized(
                "You are not authorize to delete this post",
            ));
        }

        self.db.delete_post(&post_id).await?;
        Ok(post)
    }

    /// Like a post. The append and the per-user uniqueness guard are one
    /// atomic statement; a second like by the same user is rejected.
    pub async fn like(&self, post_id: Uuid, user_id: Uuid) -> Result<Vec<Like>, AppError> {
        match self.db.like_post(&post_id, &user_id).await? {
            Some(likes) => Ok(likes),
            None => {
                // Nothing updated: either the post is gone or the guard hit.
                if self.db.get_post(&post_id).await?.is_none() {
                    Err(AppError::bad_request("Post not exist"))
                } else {
                    Err(AppError::bad_request("Post already liked"))
                }
            }
        }
    }

    /// Remove the user's like; unliking a never-liked post is rejected.
    pub async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> Result<Vec<Like>, AppError> {
        match self.db.unlike_post(&post_id, &user_id).await? {
            Some(likes) => Ok(likes),
            None => {
                if self.db.get_post(&post_id).await?.is_none() {
                    Err(AppError::bad_request("Post not exist"))
                } else {
                    Err(AppError::bad_request("Post has not liked"))
                }
            }
        }
    }

    /// Prepend a comment with the acting user's name/avatar snapshot.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> Result<Vec<Comment>, AppError> {
        let user = match self.db.get_user_by_id(&user_id).await? {
            Some(user) => user,
            None => return Err(AppError::bad_request("User does not exist")),
        };

        let comment = Comment {
            id: Uuid::new_v4(),
            user: user.id,
            text: text.to_string(),
            name: user.name,
            avatar: user.avatar,
            date: Utc::now(),
        };

        match self.db.prepend_comment(&post_id, &comment).await? {
            Some(comments) => Ok(comments),
            None => Err(AppError::bad_request("Post not exist")),
        }
    }

    /// Remove a comment; only its author may do so.
    pub async fn remove_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        acting_user: Uuid,
    ) -> Result<Vec<Comment>, AppError> {
        let post = match self.db.get_post(&post_id).await? {
            Some(post) => post,
            None => return Err(AppError::bad_request("Post not exist")),
        };

        let comment = match post.comments.iter().find(|c| c.id == comment_id) {
            Some(comment) => comment,
            None => return Err(AppError::bad_request("Comment not exist")),
        };

        if comment.user != acting_user {
            return Err(AppError::unauthorized("You cant delete this comment"));
        }

        match self.db.remove_comment(&post_id, &comment_id).await? {
            Some(comments) => Ok(comments),
            None => Err(AppError::bad_request("Post not exist")),
        }
    }
}
