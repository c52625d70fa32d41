use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// When false, a booking already marked Confirmed or Rejected can no
    /// longer be re-decided.
    pub allow_decision_reversal: bool,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub admin_email: Option<String>,
    pub admin_security_answer: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "casebook.db".to_string()),
            allow_decision_reversal: env::var("ALLOW_DECISION_REVERSAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_security_answer: env::var("ADMIN_SECURITY_ANSWER").ok(),
        }
    }
}
