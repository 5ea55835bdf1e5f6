//! User repository implementations.

mod memory;

pub use memory::InMemoryUserRepository;

/// Mask an email for logging: `user@mumii.com` -> `u***@mumii.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}@{domain}")
        }
        None => "***".to_string(),
    }
}
