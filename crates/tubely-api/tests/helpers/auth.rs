use chrono::Duration;
use tubely_api::auth::make_jwt;
use uuid::Uuid;

/// Secret shared by the test config and the tokens issued here.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

pub fn bearer(user_id: Uuid) -> String {
    let token = make_jwt(user_id, TEST_JWT_SECRET, Duration::hours(1)).unwrap();
    format!("Bearer {}", token)
}
