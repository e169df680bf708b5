mod github;
mod posts;
mod profiles;
mod users;

pub use github::GithubClient;
pub use posts::PostService;
pub use profiles::ProfileService;
pub use users::UserService;
