use rand::Rng;
use time::OffsetDateTime;

/// The number of random characters appended to each reference ID.
const SUFFIX_LENGTH: usize = 4;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a human-shareable reference ID: the configured prefix, the
/// submission timestamp in milliseconds encoded as uppercase base-36 and
/// a short random suffix.
///
/// Uniqueness is probabilistic; the database's unique constraint on the
/// reference column is the authoritative guard, and callers retry on a
/// collision.
pub fn generate(prefix: &str) -> String {
    let millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64;
    let mut rng = rand::thread_rng();

    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("{}-{}-{}", prefix, to_base36(millis), suffix)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }

    let mut digits = vec![];

    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }

    digits.reverse();
    String::from_utf8(digits).expect("base-36 digits are ASCII")
}

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;
    use proptest::prelude::*;
    use regex::Regex;

    use super::{generate, to_base36};

    lazy_static! {
        static ref SHAPE: Regex =
            Regex::new(r"^LAGOS-[0-9A-Z]+-[0-9A-Z]{4}$").expect("compile shape pattern");
    }

    #[test]
    fn generated_ids_match_the_published_shape() {
        for _ in 0..100 {
            let id = generate("LAGOS");
            assert!(SHAPE.is_match(&id), "{} matches the reference shape", id);
        }
    }

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(46655), "ZZZ");
    }

    proptest! {
        #[test]
        fn base36_round_trips(value in any::<u64>()) {
            let encoded = to_base36(value);

            prop_assert_eq!(u64::from_str_radix(&encoded, 36).expect("parse base-36"), value);
        }
    }
}
