//! Editing-session identifier generation.
use rand::RngExt;

/// Generate a random 8-hex-digit editing-session identifier (rsid).
///
/// Word attaches these opaque tokens to paragraphs and runs to correlate
/// edits made in the same session. They are not semantically load-bearing;
/// consuming applications use them for change-correlation display only.
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    format!("{:08X}", rng.random::<u32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        assert_eq!(id.len(), 8);
        for ch in id.chars() {
            assert!(ch.is_ascii_hexdigit());
            if ch.is_ascii_alphabetic() {
                assert!(ch.is_ascii_uppercase());
            }
        }
    }
}
