//! Bcrypt password hashing implementation.

use mumii_core::ports::{AuthError, PasswordService};

/// Bcrypt-based password service.
pub struct BcryptPasswordService {
    cost: u32,
}

impl BcryptPasswordService {
    /// Work factor used for stored account passwords.
    pub const DEFAULT_COST: u32 = 12;

    /// Service with an explicit work factor (4..=31).
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordService {
    fn default() -> Self {
        Self::with_cost(Self::DEFAULT_COST)
    }
}

impl PasswordService for BcryptPasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash).map_err(|e| AuthError::HashingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = BcryptPasswordService::with_cost(4);
        let password = "password123";

        let hash = service.hash(password).unwrap();
        assert!(hash.starts_with("$2b$04$"));
        assert!(service.verify(password, &hash).unwrap());
        assert!(!service.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(BcryptPasswordService::default().cost(), 12);
    }

    #[test]
    fn test_verify_garbage_hash() {
        let service = BcryptPasswordService::with_cost(4);
        assert!(matches!(
            service.verify("x", "not-a-hash"),
            Err(AuthError::HashingError(_))
        ));
    }
}
