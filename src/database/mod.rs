use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::models::User;
use crate::utils::error::AppError;

mod posts;
mod profiles;

pub use profiles::ProfileFields;

/// Database connection pool
pub type DbPool = Pool;

/// Database service: raw SQL over a deadpool-postgres pool. Users, profiles
/// and posts are each a single row; the embedded lists live in
/// `TEXT[]`/`JSONB` columns so every mutation is one statement.
pub struct DatabaseService {
    pool: DbPool,
}

impl DatabaseService {
    /// Create a new database service with connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        let mut cfg = Config::new();
        cfg.url = Some(config.url.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(AppError::internal)?;

        // Test connection
        let client = pool.get().await?;
        client.execute("SELECT 1", &[]).await?;

        log::info!("Database connection established");

        Ok(Self { pool })
    }

    /// Get a database client from the pool
    pub(crate) async fn get_client(&self) -> Result<deadpool_postgres::Client, AppError> {
        Ok(self.pool.get().await?)
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<(), AppError> {
        let client = self.get_client().await?;

        // Ensure pgcrypto extension for gen_random_uuid() is present
        client.execute("CREATE EXTENSION IF NOT EXISTS pgcrypto", &[]).await.ok();

        client.execute("\
            CREATE TABLE IF NOT EXISTS users (\
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),\
                name VARCHAR(100) NOT NULL,\
                email VARCHAR(255) UNIQUE NOT NULL,\
                password_hash VARCHAR(255) NOT NULL,\
                avatar VARCHAR(255) NOT NULL,\
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()\
            )\
        ", &[]).await?;

        client.execute("\
            CREATE TABLE IF NOT EXISTS profiles (\
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),\
                user_id UUID UNIQUE NOT NULL REFERENCES users(id) ON DELETE CASCADE,\
                status VARCHAR(100) NOT NULL,\
                skills TEXT[] NOT NULL,\
                company VARCHAR(100),\
                website VARCHAR(255),\
                location VARCHAR(100),\
                bio TEXT,\
                github_username VARCHAR(100),\
                experience JSONB NOT NULL DEFAULT '[]'::jsonb,\
                education JSONB NOT NULL DEFAULT '[]'::jsonb,\
                social JSONB,\
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()\
            )\
        ", &[]).await?;

        // posts.user_id is deliberately unconstrained: deleting a profile
        // removes the user record but leaves the user's posts behind.
        client.execute("\
            CREATE TABLE IF NOT EXISTS posts (\
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),\
                user_id UUID NOT NULL,\
                name VARCHAR(100) NOT NULL,\
                avatar VARCHAR(255) NOT NULL,\
                text TEXT NOT NULL,\
                likes JSONB NOT NULL DEFAULT '[]'::jsonb,\
                comments JSONB NOT NULL DEFAULT '[]'::jsonb,\
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()\
            )\
        ", &[]).await?;

        client.execute("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)", &[]).await?;
        client.execute("CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts(user_id)", &[]).await?;
        client.execute("CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at)", &[]).await?;

        log::info!("Database schema initialized");
        Ok(())
    }

    /// Create a new user
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        avatar: &str,
    ) -> Result<User, AppError> {
        let client = self.get_client().await?;

        let row = client.query_one("
            INSERT INTO users (name, email, password_hash, avatar)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, avatar, created_at
        ", &[&name, &email, &password_hash, &avatar]).await?;

        Ok(Self::row_to_user(&row))
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let client = self.get_client().await?;

        let row = client.query_opt("
            SELECT id, name, email, password_hash, avatar, created_at
            FROM users WHERE id = $1
        ", &[id]).await?;

        Ok(row.map(|r| Self::row_to_user(&r)))
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let client = self.get_client().await?;

        let row = client.query_opt("
            SELECT id, name, email, password_hash, avatar, created_at
            FROM users WHERE email = $1
        ", &[&email]).await?;

        Ok(row.map(|r| Self::row_to_user(&r)))
    }

    /// Delete a user record (profile-deletion cascade; the profile row goes
    /// through its foreign key, posts are left in place)
    pub async fn delete_user(&self, id: &Uuid) -> Result<(), AppError> {
        let client = self.get_client().await?;

        client.execute("DELETE FROM users WHERE id = $1", &[id]).await?;

        Ok(())
    }

    /// Helper to convert database row to User
    fn row_to_user(row: &tokio_postgres::Row) -> User {
        User {
            id: row.get(0),
            name: row.get(1),
            email: row.get(2),
            password_hash: row.get(3),
            avatar: row.get(4),
            created_at: row.get(5),
        }
    }
}
