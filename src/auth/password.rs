use bcrypt::DEFAULT_COST;

use crate::utils::error::AppError;

pub fn hash(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// A malformed stored hash counts as a failed comparison rather than an
/// error, so login still answers with the generic credentials message.
pub fn verify(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps these tests fast; the production path uses
    // DEFAULT_COST via hash().
    const TEST_COST: u32 = 4;

    #[test]
    fn correct_password_verifies() {
        let hashed = bcrypt::hash("secret1", TEST_COST).unwrap();
        assert!(verify("secret1", &hashed));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hashed = bcrypt::hash("secret1", TEST_COST).unwrap();
        assert!(!verify("secret2", &hashed));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify("secret1", "not-a-bcrypt-hash"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = bcrypt::hash("secret1", TEST_COST).unwrap();
        let b = bcrypt::hash("secret1", TEST_COST).unwrap();
        assert_ne!(a, b);
    }
}
