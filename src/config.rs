use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// bcrypt hash of the admin password. Empty disables admin login.
    pub admin_password_hash: String,
    pub session_secret: String,
    pub counselor_whatsapp: String,
    pub counselor_phone: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub payment_delay_ms: u64,
    pub flow_ttl_minutes: i64,
    pub session_price: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "hugs.db".to_string()),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").unwrap_or_default(),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| uuid::Uuid::new_v4().simple().to_string()),
            counselor_whatsapp: env::var("COUNSELOR_WHATSAPP")
                .unwrap_or_else(|_| "+1234567890".to_string()),
            counselor_phone: env::var("COUNSELOR_PHONE").unwrap_or_default(),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_phone_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
            payment_delay_ms: env::var("PAYMENT_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1500),
            flow_ttl_minutes: env::var("FLOW_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            session_price: env::var("SESSION_PRICE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
        }
    }

    pub fn twilio_configured(&self) -> bool {
        !self.twilio_account_sid.is_empty()
            && !self.twilio_auth_token.is_empty()
            && !self.twilio_phone_number.is_empty()
            && !self.counselor_phone.is_empty()
    }
}
