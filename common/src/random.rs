//! Random strings and document-unique identifiers.

use uuid::Uuid;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Infix placed after the prefix so a generated id always starts with a letter.
pub const ID_INFIX: &str = "A-";

/// A short random lowercase alphanumeric string.
pub fn random_string() -> String {
    let (high, low) = Uuid::new_v4().as_u64_pair();
    to_base36(high ^ low)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return String::from("0");
    }

    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        let digit = (value % 36) as usize;
        digits.push(BASE36_DIGITS[digit]);
        value /= 36;
    }
    digits.reverse();

    String::from_utf8_lossy(&digits).into_owned()
}

/// Generate an id that `is_taken` reports as free.
///
/// The id is `prefix + "A-" + random + random`, which keeps it a valid
/// element id even when `prefix` is empty. Generation retries until
/// `is_taken` returns false, so the caller decides the uniqueness scope.
pub fn generate_unique_id<F>(prefix: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let id = format!("{prefix}{ID_INFIX}{}{}", random_string(), random_string());
        if !is_taken(&id) {
            return id;
        }
    }
}
