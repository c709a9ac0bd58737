//! Anonymous nickname generator.
//!
//! Twitch lets any `justinfan<digits>` nickname log in without a real token.
//! Such sessions can read chat but not post.

use rand::RngExt;

const ANONYMOUS_PREFIX: &str = "justinfan";

/// Generate a random anonymous nickname like `justinfan48213`.
pub fn generate_nickname() -> String {
    let mut rng = rand::rng();
    let num: u32 = rng.random_range(10_000..100_000);
    format!("{}{}", ANONYMOUS_PREFIX, num)
}

/// Whether `nickname` is an anonymous login.
pub fn is_anonymous(nickname: &str) -> bool {
    nickname
        .to_lowercase()
        .strip_prefix(ANONYMOUS_PREFIX)
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
