// 🔐 Admin Gate - shared-secret check for privileged operations
//
// The secret is kept only as SHA-256(salt || secret). Candidates are hashed
// the same way and the fixed-length digests are compared without early exit,
// so timing does not depend on how much of the secret a candidate matches.
// Hashing time still grows with the candidate's own length.

use sha2::{Digest, Sha256};

pub struct AdminGate {
    salt: String,
    digest: [u8; 32],
}

impl AdminGate {
    pub fn new(secret: &str) -> Self {
        let salt = uuid::Uuid::new_v4().to_string();
        let digest = salted_digest(&salt, secret);
        AdminGate { salt, digest }
    }

    /// True iff `candidate` equals the configured secret.
    pub fn authorize(&self, candidate: &str) -> bool {
        let candidate = salted_digest(&self.salt, candidate);
        constant_time_eq(&self.digest, &candidate)
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

fn salted_digest(salt: &str, secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_accepts_only_the_secret() {
        let gate = AdminGate::new("admin123");

        assert!(gate.authorize("admin123"));
        assert!(!gate.authorize("admin12"));
        assert!(!gate.authorize("admin1234"));
        assert!(!gate.authorize("ADMIN123"));
        assert!(!gate.authorize(""));
    }

    #[test]
    fn test_each_gate_uses_its_own_salt() {
        let a = AdminGate::new("same");
        let b = AdminGate::new("same");

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
        assert!(a.authorize("same") && b.authorize("same"));
    }

    #[test]
    fn test_debug_does_not_print_digest() {
        let gate = AdminGate::new("secret");
        let printed = format!("{:?}", gate);
        assert!(!printed.contains(&gate.salt));
    }

    #[test]
    fn test_prefixes_and_extensions_of_the_secret_are_rejected() {
        let secret = "potluck-admin";
        let gate = AdminGate::new(secret);

        for end in 0..secret.len() {
            assert!(!gate.authorize(&secret[..end]), "prefix of length {}", end);
        }
        assert!(!gate.authorize(&format!("{}{}", secret, "x".repeat(4096))));
        assert!(gate.authorize(secret));
    }

    #[test]
    fn test_constant_time_eq() {
        let a = [7u8; 32];
        let mut b = a;
        assert!(constant_time_eq(&a, &b));
        b[31] ^= 1;
        assert!(!constant_time_eq(&a, &b));
    }
}
