use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use regex::Regex;
use time::{Duration, OffsetDateTime};

/// Validity window for an issued OTP.
pub const OTP_TTL_SECONDS: i64 = 600;
/// Minimum interval between OTP issuances for one identity.
pub const RESEND_COOLDOWN_SECONDS: i64 = 60;

const OTP_LEN: usize = 6;
const USERNAME_LEN: usize = 10;
const TOKEN_KEY_LEN: usize = 40;

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Password policy: length plus one of each character class.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long.".into());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter.".into());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase letter.".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number.".into());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err("Password must contain at least one special character.".into());
    }
    Ok(())
}

fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 6-character code over [A-Za-z0-9]. Human-readable, not a secret key;
/// collision odds within one user's validity window are negligible.
pub fn generate_otp() -> String {
    random_alphanumeric(OTP_LEN)
}

/// Short public username assigned at promotion.
pub fn generate_username() -> String {
    random_alphanumeric(USERNAME_LEN)
}

/// Opaque bearer token key, minted once per account.
pub fn generate_token_key() -> String {
    random_alphanumeric(TOKEN_KEY_LEN)
}

pub fn otp_expired(issued_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    now - issued_at > Duration::seconds(OTP_TTL_SECONDS)
}

pub fn within_resend_cooldown(issued_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    now - issued_at < Duration::seconds(RESEND_COOLDOWN_SECONDS)
}

pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("argon2 parse hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("Abc@12345").expect("hashing should succeed");
        assert!(!verify_password("Abc@12346", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        assert!(verify_password("anything", "not-a-valid-hash").is_err());
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn password_policy_examples() {
        assert!(validate_password("Abc@12345").is_ok());
        assert!(validate_password("abc12345").is_err());
    }

    #[test]
    fn password_policy_names_the_missing_class() {
        assert!(validate_password("Ab@1").unwrap_err().contains("8 characters"));
        assert!(validate_password("abc@12345").unwrap_err().contains("uppercase"));
        assert!(validate_password("ABC@12345").unwrap_err().contains("lowercase"));
        assert!(validate_password("Abcd@efgh").unwrap_err().contains("number"));
        assert!(validate_password("Abcd12345").unwrap_err().contains("special"));
    }

    #[test]
    fn generated_values_have_fixed_shapes() {
        let otp = generate_otp();
        assert_eq!(otp.len(), 6);
        assert!(otp.chars().all(|c| c.is_ascii_alphanumeric()));

        assert_eq!(generate_username().len(), 10);
        assert_eq!(generate_token_key().len(), 40);
    }

    #[test]
    fn local_part_is_everything_before_the_at() {
        assert_eq!(email_local_part("alice@example.com"), "alice");
        assert_eq!(email_local_part("no-at-sign"), "no-at-sign");
    }
}

#[cfg(test)]
mod window_tests {
    use super::*;

    fn at(seconds_ago: i64) -> (OffsetDateTime, OffsetDateTime) {
        let now = OffsetDateTime::now_utc();
        (now - Duration::seconds(seconds_ago), now)
    }

    #[test]
    fn otp_valid_at_exactly_600_seconds() {
        let (issued, now) = at(600);
        assert!(!otp_expired(issued, now));
    }

    #[test]
    fn otp_expired_at_601_seconds() {
        let (issued, now) = at(601);
        assert!(otp_expired(issued, now));
    }

    #[test]
    fn resend_blocked_inside_cooldown() {
        let (issued, now) = at(59);
        assert!(within_resend_cooldown(issued, now));
    }

    #[test]
    fn resend_allowed_after_cooldown() {
        let (issued, now) = at(61);
        assert!(!within_resend_cooldown(issued, now));
        let (issued, now) = at(60);
        assert!(!within_resend_cooldown(issued, now));
    }
}
