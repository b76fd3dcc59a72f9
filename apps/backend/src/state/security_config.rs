use jsonwebtoken::Algorithm;

/// Signing and hashing settings shared by the token codec and the auth services.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret for signing and verifying session tokens
    pub jwt_secret: Vec<u8>,
    /// Token algorithm (HS256)
    pub algorithm: Algorithm,
    /// bcrypt work factor for new password hashes
    pub password_cost: u32,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            password_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }
}

#[cfg(test)]
impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
