// Client-side checks run before any request leaves the CLI.
use std::collections::BTreeMap;
use std::path::Path;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Per-field messages, keyed by form field name
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Loose `something@something.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty() && !host.is_empty() && !tld.is_empty()
}

pub fn validate_signup(name: &str, email: &str, password: &str, confirm: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if name.trim().is_empty() {
        errors.add("name", "Please enter your name");
    }

    if email.trim().is_empty() {
        errors.add("email", "Please enter your email");
    } else if !is_valid_email(email.trim()) {
        errors.add("email", "Please enter a valid email address");
    }

    if password.is_empty() {
        errors.add("password", "Please enter a password");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
    }

    if password != confirm {
        errors.add("confirmPassword", "Passwords do not match");
    }

    errors.into_result()
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if email.trim().is_empty() {
        errors.add("email", "Please enter your email");
    }
    if password.is_empty() {
        errors.add("password", "Please enter your password");
    }
    errors.into_result()
}

/// Extension allow-list and size cap for an image about to be attached
pub fn validate_image(path: &Path, size: u64) -> Result<(), String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => return Err("Only image files (jpeg, jpg, png, gif) can be uploaded".to_string()),
    }

    if size > MAX_IMAGE_BYTES {
        return Err("Image must be 5MB or smaller".to_string());
    }

    Ok(())
}

/// MIME type sent with the multipart image part
pub fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice example@x.com"));
        assert!(!is_valid_email("alice"));
    }

    #[test]
    fn signup_collects_every_field_error() {
        let errors = validate_signup("", "nope", "short", "other").unwrap_err();
        assert_eq!(errors.get("name"), Some("Please enter your name"));
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
    }

    #[test]
    fn signup_accepts_valid_form() {
        assert!(validate_signup("Alice", "alice@example.com", "longenough", "longenough").is_ok());
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login("", "").unwrap_err();
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
        assert!(validate_login("a@b.co", "x").is_ok());
    }

    #[test]
    fn image_checks() {
        assert!(validate_image(Path::new("cat.PNG"), 10).is_ok());
        assert!(validate_image(Path::new("notes.txt"), 10).is_err());
        assert!(validate_image(Path::new("noext"), 10).is_err());
        assert!(validate_image(Path::new("big.jpg"), MAX_IMAGE_BYTES + 1).is_err());
        assert!(validate_image(Path::new("edge.jpg"), MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(image_mime(Path::new("a.png")), "image/png");
        assert_eq!(image_mime(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(image_mime(Path::new("a.gif")), "image/gif");
    }
}
