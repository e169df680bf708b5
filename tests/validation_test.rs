#[cfg(test)]
mod tests {
    use validator::Validate;

    use devconnect_api::models::{
        AddCommentRequest, AddExperienceRequest, CreatePostRequest, LoginRequest,
        RegisterRequest, UpsertProfileRequest,
    };

    fn messages(err: validator::ValidationErrors) -> Vec<String> {
        err.field_errors()
            .values()
            .flat_map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            })
            .collect()
    }

    #[test]
    fn register_accepts_well_formed_input() {
        let req = RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn register_rejects_invalid_email() {
        let req = RegisterRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };
        let msgs = messages(req.validate().unwrap_err());
        assert!(msgs.contains(&"Please provide a valid email".to_string()));
    }

    #[test]
    fn register_rejects_short_password() {
        let req = RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
        };
        let msgs = messages(req.validate().unwrap_err());
        assert!(msgs.contains(&"Password length should be minimum 6".to_string()));
    }

    #[test]
    fn register_rejects_empty_name() {
        let req = RegisterRequest {
            name: "".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
        };
        let msgs = messages(req.validate().unwrap_err());
        assert!(msgs.contains(&"Name is required".to_string()));
    }

    #[test]
    fn register_reports_every_failing_field() {
        let req = RegisterRequest {
            name: "".to_string(),
            email: "nope".to_string(),
            password: "x".to_string(),
        };
        let msgs = messages(req.validate().unwrap_err());
        assert_eq!(msgs.len(), 3);
    }

    #[test]
    fn login_requires_password() {
        let req = LoginRequest {
            email: "ada@example.com".to_string(),
            password: "".to_string(),
        };
        let msgs = messages(req.validate().unwrap_err());
        assert!(msgs.contains(&"Password is required".to_string()));
    }

    #[test]
    fn profile_upsert_requires_status_and_skills() {
        let req = UpsertProfileRequest {
            status: "".to_string(),
            skills: "".to_string(),
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
        };
        let msgs = messages(req.validate().unwrap_err());
        assert!(msgs.contains(&"please provide Status".to_string()));
        assert!(msgs.contains(&"please provide Skills".to_string()));
    }

    #[test]
    fn experience_requires_title_and_company() {
        let req = AddExperienceRequest {
            title: "".to_string(),
            company: "".to_string(),
            location: None,
            from: chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            to: None,
            current: None,
            description: None,
        };
        let msgs = messages(req.validate().unwrap_err());
        assert!(msgs.contains(&"Please Provide title".to_string()));
        assert!(msgs.contains(&"Please Provide company".to_string()));
    }

    #[test]
    fn post_and_comment_require_text() {
        let post = CreatePostRequest {
            text: "".to_string(),
        };
        assert!(post.validate().is_err());

        let comment = AddCommentRequest {
            text: "".to_string(),
        };
        assert!(comment.validate().is_err());
    }

    #[test]
    fn education_request_uses_fieldofstudy_wire_name() {
        let json = serde_json::json!({
            "school": "MIT",
            "degree": "BSc",
            "fieldofstudy": "CS",
            "from": "2018-09-01"
        });
        let req: devconnect_api::models::AddEducationRequest =
            serde_json::from_value(json).unwrap();
        assert_eq!(req.field_of_study, "CS");
        assert!(req.validate().is_ok());
    }
}
