use std::sync::Arc;
use uuid::Uuid;

use crate::database::{DatabaseService, ProfileFields};
use crate::models::{
    AddEducationRequest, AddExperienceRequest, Profile, UpsertProfileRequest,
};
use crate::utils::error::AppError;

/// Profile CRUD and embedded experience/education list edits.
pub struct ProfileService {
    pub db: Arc<DatabaseService>,
}

impl ProfileService {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// The authenticated user's profile, joined with name/avatar
    pub async fn get_own(&self, user_id: Uuid) -> Result<Profile, AppError> {
        match self.db.get_profile_by_user(&user_id).await? {
            Some(profile) => Ok(profile),
            None => Err(AppError::bad_request(
                "There is no profile available for this user",
            )),
        }
    }

    /// Create the profile on first call, update it in place afterwards.
    /// Last writer wins; calling twice with identical input leaves a single
    /// unchanged row.
    pub async fn upsert(&self, user_id: Uuid, req: UpsertProfileRequest) -> Result<Profile, AppError> {
        let fields = ProfileFields {
            status: req.status.clone(),
            skills: req.skills_list(),
            company: req.company.clone(),
            website: req.website.clone(),
            location: req.location.clone(),
            bio: req.bio.clone(),
            github_username: req.github_username.clone(),
            social: req.social_links(),
        };

        if self.db.get_profile_by_user(&user_id).await?.is_some() {
            self.db.update_profile(&user_id, &fields).await?;
        } else {
            self.db.insert_profile(&user_id, &fields).await?;
        }

        self.stored_profile(user_id).await
    }

    /// All profiles with owner name/avatar
    pub async fn list(&self) -> Result<Vec<Profile>, AppError> {
        self.db.list_profiles().await
    }

    /// Profile by owning user id
    pub async fn get_by_user(&self, user_id: Uuid) -> Result<Profile, AppError> {
        match self.db.get_profile_by_user(&user_id).await? {
            Some(profile) => Ok(profile),
            None => Err(AppError::bad_request("No Profile for given user")),
        }
    }

    /// Delete the profile and the owning user record. The user's posts stay
    /// behind; they render from their own name/avatar snapshot.
    pub async fn delete_own(&self, user_id: Uuid) -> Result<(), AppError> {
        self.db.delete_profile(&user_id).await?;
        self.db.delete_user(&user_id).await?;
        Ok(())
    }

    pub async fn add_experience(
        &self,
        user_id: Uuid,
        req: AddExperienceRequest,
    ) -> Result<Profile, AppError> {
        let entry = req.into_entry();
        if !self.db.append_experience(&user_id, &entry).await? {
            return Err(Self::no_profile());
        }
        self.stored_profile(user_id).await
    }

    pub async fn remove_experience(&self, user_id: Uuid, entry_id: Uuid) -> Result<Profile, AppError> {
        if !self.db.remove_experience(&user_id, &entry_id).await? {
            return Err(Self::no_profile());
        }
        self.stored_profile(user_id).await
    }

    pub async fn add_education(
        &self,
        user_id: Uuid,
        req: AddEducationRequest,
    ) -> Result<Profile, AppError> {
        let entry = req.into_entry();
        if !self.db.append_education(&user_id, &entry).await? {
            return Err(Self::no_profile());
        }
        self.stored_profile(user_id).await
    }

    pub async fn remove_education(&self, user_id: Uuid, entry_id: Uuid) -> Result<Profile, AppError> {
        if !self.db.remove_education(&user_id, &entry_id).await? {
            return Err(Self::no_profile());
        }
        self.stored_profile(user_id).await
    }

    fn no_profile() -> AppError {
        AppError::bad_request("profile does not exist for this user")
    }

    /// Re-read the row after a write so the response carries the stored
    /// state (including the owner join).
    async fn stored_profile(&self, user_id: Uuid) -> Result<Profile, AppError> {
        self.db
            .get_profile_by_user(&user_id)
            .await?
            .ok_or_else(|| AppError::internal("profile missing after write"))
    }
}
