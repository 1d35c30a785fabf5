use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// A stored hash that fails to parse verifies as false rather than erroring,
/// so callers treat it the same as a wrong password.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_hashed_password() {
        let hash = hash_password("late-for-lecture-again").expect("hash");
        assert!(verify_password("late-for-lecture-again", &hash));
    }

    #[test]
    fn verify_rejects_a_different_password() {
        let hash = hash_password("first-period-maths").expect("hash");
        assert!(!verify_password("second-period-maths", &hash));
    }

    #[test]
    fn repeated_hashes_differ() {
        let a = hash_password("roll-call").expect("hash a");
        let b = hash_password("roll-call").expect("hash b");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_verifies_as_false() {
        assert!(!verify_password("roll-call", "$broken$hash$"));
        assert!(!verify_password("roll-call", ""));
    }
}
