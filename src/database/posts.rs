use uuid::Uuid;

use super::DatabaseService;
use crate::models::{Comment, Like, Post};
use crate::utils::error::AppError;

const POST_SELECT: &str = "
    SELECT id, user_id, name, avatar, text, likes, comments, created_at
    FROM posts
";

impl DatabaseService {
    /// Create a post snapshotting the author's current name/avatar
    pub async fn insert_post(
        &self,
        user_id: &Uuid,
        name: &str,
        avatar: &str,
        text: &str,
    ) -> Result<Post, AppError> {
        let client = self.get_client().await?;

        let row = client.query_one("
            INSERT INTO posts (user_id, name, avatar, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, avatar, text, likes, comments, created_at
        ", &[user_id, &name, &avatar, &text]).await?;

        Self::row_to_post(&row)
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let client = self.get_client().await?;

        let query = format!("{} ORDER BY created_at DESC", POST_SELECT);
        let rows = client.query(query.as_str(), &[]).await?;

        rows.iter().map(Self::row_to_post).collect()
    }

    /// Get post by ID
    pub async fn get_post(&self, id: &Uuid) -> Result<Option<Post>, AppError> {
        let client = self.get_client().await?;

        let query = format!("{} WHERE id = $1", POST_SELECT);
        let row = client.query_opt(query.as_str(), &[id]).await?;

        row.map(|r| Self::row_to_post(&r)).transpose()
    }

    /// Delete post by ID (ownership is checked by the caller)
    pub async fn delete_post(&self, id: &Uuid) -> Result<(), AppError> {
        let client = self.get_client().await?;

        client.execute("DELETE FROM posts WHERE id = $1", &[id]).await?;

        Ok(())
    }

    /// Append the user's like in one atomic statement. The WHERE clause is
    /// the per-user uniqueness guard: a second like by the same user matches
    /// no row. Returns the updated likes list, or `None` when nothing was
    /// updated (post missing or already liked — the caller tells them apart).
    pub async fn like_post(&self, post_id: &Uuid, user_id: &Uuid) -> Result<Option<Vec<Like>>, AppError> {
        let client = self.get_client().await?;
        let probe = serde_json::json!([{ "user": user_id }]);

        let row = client.query_opt("
            UPDATE posts SET likes = likes || $2::jsonb
            WHERE id = $1 AND NOT likes @> $2::jsonb
            RETURNING likes
        ", &[post_id, &probe]).await?;

        row.map(|r| serde_json::from_value(r.get(0)).map_err(AppError::from))
            .transpose()
    }

    /// Remove the user's like in one atomic statement. `None` when nothing
    /// was updated (post missing or not liked).
    pub async fn unlike_post(&self, post_id: &Uuid, user_id: &Uuid) -> Result<Option<Vec<Like>>, AppError> {
        let client = self.get_client().await?;
        let probe = serde_json::json!([{ "user": user_id }]);

        let row = client.query_opt("
            UPDATE posts SET likes = (
                SELECT COALESCE(jsonb_agg(entry ORDER BY ord), '[]'::jsonb)
                FROM jsonb_array_elements(likes) WITH ORDINALITY AS t(entry, ord)
                WHERE entry->>'user' <> $2
            )
            WHERE id = $1 AND likes @> $3::jsonb
            RETURNING likes
        ", &[post_id, &user_id.to_string(), &probe]).await?;

        row.map(|r| serde_json::from_value(r.get(0)).map_err(AppError::from))
            .transpose()
    }

    /// Prepend a comment in one atomic statement. `None` when the post is
    /// missing.
    pub async fn prepend_comment(&self, post_id: &Uuid, comment: &Comment) -> Result<Option<Vec<Comment>>, AppError> {
        let client = self.get_client().await?;
        let entry = serde_json::to_value(comment)?;

        let row = client.query_opt("
            UPDATE posts SET comments = jsonb_build_array($2::jsonb) || comments
            WHERE id = $1
            RETURNING comments
        ", &[post_id, &entry]).await?;

        row.map(|r| serde_json::from_value(r.get(0)).map_err(AppError::from))
            .transpose()
    }

    /// Remove a comment by id in one atomic statement (existence and
    /// ownership are checked by the caller). `None` when the post is missing.
    pub async fn remove_comment(&self, post_id: &Uuid, comment_id: &Uuid) -> Result<Option<Vec<Comment>>, AppError> {
        let client = self.get_client().await?;

        let row = client.query_opt("
            UPDATE posts SET comments = (
                SELECT COALESCE(jsonb_agg(entry ORDER BY ord), '[]'::jsonb)
                FROM jsonb_array_elements(comments) WITH ORDINALITY AS t(entry, ord)
                WHERE entry->>'id' <> $2
            )
            WHERE id = $1
            RETURNING comments
        ", &[post_id, &comment_id.to_string()]).await?;

        row.map(|r| serde_json::from_value(r.get(0)).map_err(AppError::from))
            .transpose()
    }

    /// Helper to convert database row to Post
    fn row_to_post(row: &tokio_postgres::Row) -> Result<Post, AppError> {
        let likes: Vec<Like> = serde_json::from_value(row.get(5))?;
        let comments: Vec<Comment> = serde_json::from_value(row.get(6))?;

        Ok(Post {
            id: row.get(0),
            user: row.get(1),
            name: row.get(2),
            avatar: row.get(3),
            text: row.get(4),
            likes,
            comments,
            created_at: row.get(7),
        })
    }
}
