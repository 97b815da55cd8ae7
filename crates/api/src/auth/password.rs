//! Salted SHA-256 password digests.
//!
//! Account passwords and the admin password share one format: the lowercase
//! hex SHA-256 of `password + salt`. The digest format is fixed by rows
//! already written to the store.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of `password` followed by `salt`.
pub fn hash_password(password: &str, salt: &str) -> String {
    digest(password, salt)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn digest(password: &str, salt: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.finalize().into()
}

/// Decode a 64-character hex digest. Either case is accepted.
fn decode_digest(hex: &str) -> Option<[u8; 32]> {
    let hex = hex.as_bytes();
    if hex.len() != 64 {
        return None;
    }
    let nibble = |c: u8| char::from(c).to_digit(16).map(|d| d as u8);
    let mut out = [0u8; 32];
    for (byte, pair) in out.iter_mut().zip(hex.chunks_exact(2)) {
        *byte = (nibble(pair[0])? << 4) | nibble(pair[1])?;
    }
    Some(out)
}

/// Compare two digests without an early exit on the first differing byte.
fn digests_match(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

/// Whether `password` hashes to the hex digest `expected`.
///
/// A malformed `expected` never matches.
pub fn verify_password(password: &str, salt: &str, expected: &str) -> bool {
    decode_digest(expected).is_some_and(|expected| digests_match(&digest(password, salt), &expected))
}

/// The single operator account, configured through the environment.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    /// Expected [`hash_password`] digest. Empty disables login.
    pub password_hash: String,
    pub salt: String,
}

impl AdminCredentials {
    pub fn hash(&self, password: &str) -> String {
        hash_password(password, &self.salt)
    }

    /// Whether `email` and `password` match the configured operator.
    pub fn verify(&self, email: &str, password: &str) -> bool {
        let password_ok = verify_password(password, &self.salt, &self.password_hash);
        password_ok && email == self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminCredentials {
        AdminCredentials {
            email: "admin@travel.com".to_string(),
            password_hash: hash_password("hunter2", "pepper"),
            salt: "pepper".to_string(),
        }
    }

    #[test]
    fn digest_is_hex_sha256_of_password_then_salt() {
        // sha256("abc")
        assert_eq!(
            hash_password("a", "bc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_password("x", "salt").len(), 64);
    }

    #[test]
    fn verify_checks_email_and_password() {
        let admin = admin();
        assert!(admin.verify("admin@travel.com", "hunter2"));
        assert!(!admin.verify("Admin@travel.com", "hunter2"));
        assert!(!admin.verify("admin@travel.com", "hunter3"));
        assert!(!admin.verify("someone@travel.com", "hunter2"));
    }

    #[test]
    fn verify_password_compares_decoded_digests() {
        let hex = hash_password("hunter2", "pepper");
        assert!(verify_password("hunter2", "pepper", &hex));
        assert!(verify_password("hunter2", "pepper", &hex.to_uppercase()));
        assert!(!verify_password("hunter2", "salt", &hex));
        assert!(!verify_password("hunter2", "pepper", &hex[..63]));
        assert!(!verify_password("hunter2", "pepper", &format!("{}zz", &hex[..62])));
        assert!(!verify_password("hunter2", "pepper", &format!("+{}", &hex[1..])));
    }

    #[test]
    fn digests_match_requires_every_byte() {
        let a = digest("a", "b");
        let mut b = a;
        assert!(digests_match(&a, &b));
        b[31] ^= 1;
        assert!(!digests_match(&a, &b));
    }

    #[test]
    fn malformed_configured_hash_disables_login() {
        let admin = AdminCredentials {
            password_hash: "not-a-digest".to_string(),
            ..admin()
        };
        assert!(!admin.verify("admin@travel.com", "hunter2"));
    }

    #[test]
    fn empty_hash_disables_login() {
        let admin = AdminCredentials {
            password_hash: String::new(),
            ..admin()
        };
        assert!(!admin.verify("admin@travel.com", ""));
    }
}
