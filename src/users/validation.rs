use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{FieldError, ValidationErrors};

use super::dto::SignupRequest;

pub const USERNAME_MIN: usize = 4;
pub const USERNAME_MAX: usize = 30;
pub const EMAIL_MIN: usize = 3;
pub const EMAIL_MAX: usize = 256;
const LOCAL_PART_MAX: usize = 64;
const ADDRESS_MAX: usize = 254;
const LABEL_MAX: usize = 63;

lazy_static! {
    static ref LOCAL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.\-\u{A1}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}]+$"
    )
    .unwrap();
    static ref LABEL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9\-\u{A1}-\u{D7FF}\u{E000}-\u{FFFF}]+$").unwrap();
    static ref TLD_RE: Regex = Regex::new(
        r"^(?:[A-Za-z\u{A1}-\u{A8}\u{AA}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}]{2,}|xn--[A-Za-z0-9\-]{2,})$"
    )
    .unwrap();
}

fn is_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, _)) = labels.split_last() else {
        return false;
    };
    if labels.len() < 2 || !TLD_RE.is_match(tld) {
        return false;
    }
    labels.iter().all(|label| {
        char_len(label) <= LABEL_MAX
            && !label.starts_with('-')
            && !label.ends_with('-')
            && LABEL_RE.is_match(label)
    })
}

/// Syntactic email check. Accepts UTF-8 local parts and internationalised domains.
pub fn is_email(value: &str) -> bool {
    if char_len(value) > ADDRESS_MAX {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || char_len(local) > LOCAL_PART_MAX {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    LOCAL_RE.is_match(local) && is_domain(domain)
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn validate_username(username: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    let len = char_len(username);
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        errors.push(FieldError::UsernameLength {
            min: USERNAME_MIN,
            max: USERNAME_MAX,
        });
    }
    if is_email(username) {
        errors.push(FieldError::UsernameIsEmail);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_email(email: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    let len = char_len(email);
    if !(EMAIL_MIN..=EMAIL_MAX).contains(&len) {
        errors.push(FieldError::EmailLength {
            min: EMAIL_MIN,
            max: EMAIL_MAX,
        });
    }
    if !is_email(email) {
        errors.push(FieldError::InvalidEmail);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks every signup field and reports all violations together.
pub fn validate_signup(req: &SignupRequest) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if let Err(e) = validate_username(&req.username) {
        errors.extend(e);
    }
    if let Err(e) = validate_email(&req.email) {
        errors.extend(e);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
