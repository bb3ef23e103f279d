use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a violation.
///
/// Identity fields:
/// - rule id
/// - severity
/// - message
pub fn fingerprint_for_violation(rule_id: &str, severity: &str, message: &str) -> String {
    let canonical = [rule_id, severity, message].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_hex() {
        let a = fingerprint_for_violation("convergence", "fail", "two versions");
        let b = fingerprint_for_violation("convergence", "fail", "two versions");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn severity_is_part_of_identity() {
        assert_ne!(
            fingerprint_for_violation("convergence", "fail", "m"),
            fingerprint_for_violation("convergence", "warn", "m"),
        );
    }
}
