use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User account. Response types omit the password hash; serialization of the
/// full record skips it as well so it can never leak through a handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// User data for responses (without sensitive info)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

/// Owner snapshot joined into profile reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUser {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

/// Profile document: one per user, with embedded experience/education lists
/// and an optional social-link set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user: ProfileUser,
    pub status: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "githubusername", skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialLinks>,
    pub created_at: DateTime<Utc>,
}

/// Embedded experience entry. When `current` is true, `to` is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Embedded education entry, same shape rules as `Experience`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    #[serde(rename = "fieldofstudy")]
    pub field_of_study: String,
    pub from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self.youtube.is_none()
            && self.twitter.is_none()
            && self.facebook.is_none()
            && self.linkedin.is_none()
            && self.instagram.is_none()
    }
}

/// Post document with embedded likes and comments. `name`/`avatar` snapshot
/// the author at creation time; `user` carries no foreign key so posts
/// outlive their author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user: Uuid,
    pub name: String,
    pub avatar: String,
    pub text: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

/// One like: a user reference. At most one per user per post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

/// Register request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password length should be minimum 6"))]
    pub password: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile upsert payload. Supplied optional fields overwrite the stored
/// value; omitted fields are left untouched. The social-link set is rebuilt
/// from the supplied link fields on every upsert.
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[validate(length(min = 1, message = "please provide Status"))]
    pub status: String,

    /// Comma-delimited, e.g. "js, go"; normalized via `skills_list`.
    #[validate(length(min = 1, message = "please provide Skills"))]
    pub skills: String,

    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "githubusername")]
    pub github_username: Option<String>,

    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl UpsertProfileRequest {
    /// Split the delimited skills string into a trimmed list, dropping empty
    /// segments ("js, go," -> ["js", "go"]).
    pub fn skills_list(&self) -> Vec<String> {
        self.skills
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Social-link set from the supplied link fields, `None` when no link was
    /// supplied at all.
    pub fn social_links(&self) -> Option<SocialLinks> {
        let social = SocialLinks {
            youtube: self.youtube.clone(),
            twitter: self.twitter.clone(),
            facebook: self.facebook.clone(),
            linkedin: self.linkedin.clone(),
            instagram: self.instagram.clone(),
        };
        if social.is_empty() {
            None
        } else {
            Some(social)
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddExperienceRequest {
    #[validate(length(min = 1, message = "Please Provide title"))]
    pub title: String,

    #[validate(length(min = 1, message = "Please Provide company"))]
    pub company: String,

    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl AddExperienceRequest {
    pub fn into_entry(self) -> Experience {
        Experience {
            id: Uuid::new_v4(),
            title: self.title,
            company: self.company,
            location: self.location,
            from: self.from,
            to: self.to,
            current: self.current.unwrap_or(false),
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddEducationRequest {
    #[validate(length(min = 1, message = "Please Provide school"))]
    pub school: String,

    #[validate(length(min = 1, message = "Please Provide degree"))]
    pub degree: String,

    #[serde(rename = "fieldofstudy")]
    #[validate(length(min = 1, message = "Please Provide fieldofstudy"))]
    pub field_of_study: String,

    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl AddEducationRequest {
    pub fn into_entry(self) -> Education {
        Education {
            id: Uuid::new_v4(),
            school: self.school,
            degree: self.degree,
            field_of_study: self.field_of_study,
            from: self.from,
            to: self.to,
            current: self.current.unwrap_or(false),
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Please provide post's text"))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, message = "Please provide comment text"))]
    pub text: String,
}

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> ApiResponse<T> {
        ApiResponse {
            success: true,
            data,
        }
    }
}

/// List response with an element count, used by the collection reads.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Session-token response returned by register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

impl TokenResponse {
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert_request(skills: &str) -> UpsertProfileRequest {
        UpsertProfileRequest {
            status: "Developer".to_string(),
            skills: skills.to_string(),
            company: None,
            website: None,
            location: None,
            bio: None,
            github_username: None,
            youtube: None,
            twitter: None,
            facebook: None,
            linkedin: None,
            instagram: None,
        }
    }

    #[test]
    fn skills_list_trims_and_drops_empty_segments() {
        let req = upsert_request(" js,  go ,,rust, ");
        assert_eq!(req.skills_list(), vec!["js", "go", "rust"]);
    }

    #[test]
    fn skills_list_handles_single_skill() {
        let req = upsert_request("js");
        assert_eq!(req.skills_list(), vec!["js"]);
    }

    #[test]
    fn social_links_none_when_nothing_supplied() {
        let req = upsert_request("js");
        assert!(req.social_links().is_none());
    }

    #[test]
    fn social_links_keeps_only_supplied_fields() {
        let mut req = upsert_request("js");
        req.twitter = Some("https://twitter.com/dev".to_string());
        let social = req.social_links().unwrap();
        assert_eq!(social.twitter.as_deref(), Some("https://twitter.com/dev"));
        assert!(social.youtube.is_none());
        assert!(social.linkedin.is_none());
    }

    #[test]
    fn user_serialization_never_exposes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            avatar: "https://www.gravatar.com/avatar/x".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn experience_entry_defaults_current_to_false() {
        let req = AddExperienceRequest {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            to: None,
            current: None,
            description: None,
        };
        let entry = req.into_entry();
        assert!(!entry.current);
        assert!(entry.to.is_none());
    }
}
