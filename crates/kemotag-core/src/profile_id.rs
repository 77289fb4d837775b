//! Public profile identifiers
//!
//! 15 characters drawn from `[0-9a-zA-Z]`.

use rand::rngs::OsRng;
use rand::Rng;

const BASE62_CHARS: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const PROFILE_ID_LENGTH: usize = 15;

/// Generate a random profile id from the OS CSPRNG.
pub fn generate_profile_id() -> String {
    let mut rng = OsRng;
    (0..PROFILE_ID_LENGTH)
        .map(|_| BASE62_CHARS[rng.gen_range(0..BASE62_CHARS.len())] as char)
        .collect()
}

pub fn is_valid_profile_id(profile_id: &str) -> bool {
    profile_id.len() == PROFILE_ID_LENGTH && profile_id.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_valid() {
        for _ in 0..100 {
            let id = generate_profile_id();
            assert!(is_valid_profile_id(&id), "invalid id: {id}");
        }
        assert_ne!(generate_profile_id(), generate_profile_id());
    }

    #[test]
    fn test_validation() {
        assert!(is_valid_profile_id("abcDEF012345xyz"));
        assert!(!is_valid_profile_id("abcDEF012345xy"));
        assert!(!is_valid_profile_id("abcDEF012345xyz0"));
        assert!(!is_valid_profile_id("abcDEF01234-xyz"));
        assert!(!is_valid_profile_id("abcDEF01234éxy"));
        assert!(!is_valid_profile_id(""));
    }
}
