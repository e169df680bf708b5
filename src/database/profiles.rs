use uuid::Uuid;

use super::DatabaseService;
use crate::models::{Education, Experience, Profile, ProfileUser, SocialLinks};
use crate::utils::error::AppError;

const PROFILE_SELECT: &str = "
    SELECT p.id, p.user_id, u.name, u.avatar, p.status, p.skills,
           p.company, p.website, p.location, p.bio, p.github_username,
           p.experience, p.education, p.social, p.created_at
    FROM profiles p
    JOIN users u ON u.id = p.user_id
";

/// Fields written by the profile upsert. Optional scalars that are `None`
/// keep the stored value; `social` always replaces the stored set.
pub struct ProfileFields {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: Option<SocialLinks>,
}

impl DatabaseService {
    /// Get a profile (joined with the owner's name/avatar) by owning user id
    pub async fn get_profile_by_user(&self, user_id: &Uuid) -> Result<Option<Profile>, AppError> {
        let client = self.get_client().await?;

        let query = format!("{} WHERE p.user_id = $1", PROFILE_SELECT);
        let row = client.query_opt(query.as_str(), &[user_id]).await?;

        row.map(|r| Self::row_to_profile(&r)).transpose()
    }

    /// All profiles, joined with user name/avatar, newest first
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, AppError> {
        let client = self.get_client().await?;

        let query = format!("{} ORDER BY p.created_at DESC", PROFILE_SELECT);
        let rows = client.query(query.as_str(), &[]).await?;

        rows.iter().map(Self::row_to_profile).collect()
    }

    /// Insert a fresh profile row for the user
    pub async fn insert_profile(&self, user_id: &Uuid, fields: &ProfileFields) -> Result<(), AppError> {
        let client = self.get_client().await?;
        let social = fields.social.as_ref().map(serde_json::to_value).transpose()?;

        client.execute("
            INSERT INTO profiles (user_id, status, skills, company, website, location, bio, github_username, social)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ", &[
            user_id,
            &fields.status,
            &fields.skills,
            &fields.company,
            &fields.website,
            &fields.location,
            &fields.bio,
            &fields.github_username,
            &social,
        ]).await?;

        Ok(())
    }

    /// Update an existing profile in place. Omitted optional scalars keep
    /// their stored value; the social set is replaced wholesale.
    pub async fn update_profile(&self, user_id: &Uuid, fields: &ProfileFields) -> Result<(), AppError> {
        let client = self.get_client().await?;
        let social = fields.social.as_ref().map(serde_json::to_value).transpose()?;

        client.execute("
            UPDATE profiles SET
                status = $2,
                skills = $3,
                company = COALESCE($4, company),
                website = COALESCE($5, website),
                location = COALESCE($6, location),
                bio = COALESCE($7, bio),
                github_username = COALESCE($8, github_username),
                social = $9
            WHERE user_id = $1
        ", &[
            user_id,
            &fields.status,
            &fields.skills,
            &fields.company,
            &fields.website,
            &fields.location,
            &fields.bio,
            &fields.github_username,
            &social,
        ]).await?;

        Ok(())
    }

    /// Delete the profile row for the user, reporting whether one existed
    pub async fn delete_profile(&self, user_id: &Uuid) -> Result<bool, AppError> {
        let client = self.get_client().await?;

        let deleted = client
            .execute("DELETE FROM profiles WHERE user_id = $1", &[user_id])
            .await?;

        Ok(deleted > 0)
    }

    /// Append one experience entry with a single atomic array update.
    /// Returns false when the user has no profile.
    pub async fn append_experience(&self, user_id: &Uuid, entry: &Experience) -> Result<bool, AppError> {
        self.append_list_entry(user_id, "experience", serde_json::to_value(entry)?).await
    }

    /// Remove an experience entry by id with a single atomic rewrite.
    /// Unknown ids leave the list unchanged. Returns false when the user has
    /// no profile.
    pub async fn remove_experience(&self, user_id: &Uuid, entry_id: &Uuid) -> Result<bool, AppError> {
        self.remove_list_entry(user_id, "experience", entry_id).await
    }

    /// Append one education entry; see `append_experience`.
    pub async fn append_education(&self, user_id: &Uuid, entry: &Education) -> Result<bool, AppError> {
        self.append_list_entry(user_id, "education", serde_json::to_value(entry)?).await
    }

    /// Remove an education entry by id; see `remove_experience`.
    pub async fn remove_education(&self, user_id: &Uuid, entry_id: &Uuid) -> Result<bool, AppError> {
        self.remove_list_entry(user_id, "education", entry_id).await
    }

    async fn append_list_entry(
        &self,
        user_id: &Uuid,
        column: &str,
        entry: serde_json::Value,
    ) -> Result<bool, AppError> {
        let client = self.get_client().await?;

        // jsonb_build_array wraps the entry so || appends one element.
        let query = format!(
            "UPDATE profiles SET {col} = {col} || jsonb_build_array($2::jsonb) WHERE user_id = $1",
            col = column
        );
        let updated = client.execute(query.as_str(), &[user_id, &entry]).await?;

        Ok(updated > 0)
    }

    async fn remove_list_entry(
        &self,
        user_id: &Uuid,
        column: &str,
        entry_id: &Uuid,
    ) -> Result<bool, AppError> {
        let client = self.get_client().await?;

        let query = format!(
            "UPDATE profiles SET {col} = (\
                SELECT COALESCE(jsonb_agg(entry ORDER BY ord), '[]'::jsonb)\
                FROM jsonb_array_elements({col}) WITH ORDINALITY AS t(entry, ord)\
                WHERE entry->>'id' <> $2\
            ) WHERE user_id = $1",
            col = column
        );
        let updated = client
            .execute(query.as_str(), &[user_id, &entry_id.to_string()])
            .await?;

        Ok(updated > 0)
    }

    /// Helper to convert a joined database row to Profile
    fn row_to_profile(row: &tokio_postgres::Row) -> Result<Profile, AppError> {
        let experience: Vec<Experience> = serde_json::from_value(row.get(11))?;
        let education: Vec<Education> = serde_json::from_value(row.get(12))?;
        let social: Option<SocialLinks> = row
            .get::<_, Option<serde_json::Value>>(13)
            .map(serde_json::from_value)
            .transpose()?;

        Ok(Profile {
            id: row.get(0),
            user: ProfileUser {
                id: row.get(1),
                name: row.get(2),
                avatar: row.get(3),
            },
            status: row.get(4),
            skills: row.get(5),
            company: row.get(6),
            website: row.get(7),
            location: row.get(8),
            bio: row.get(9),
            github_username: row.get(10),
            experience,
            education,
            social,
            created_at: row.get(14),
        })
    }
}
