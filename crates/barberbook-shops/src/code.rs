// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shop join codes: a three letter name prefix followed by three digits.

use rand::Rng;

const PREFIX_LEN: usize = 3;
const DIGITS_LEN: usize = 3;

fn prefix(name: &str) -> String {
    name.trim()
        .chars()
        .take(PREFIX_LEN)
        .collect::<String>()
        .to_uppercase()
}

/// Preferred codes for a shop, in the order they should be tried.
///
/// One candidate per consecutive three-character window of `phone`.
pub fn code_candidates(name: &str, phone: &str) -> Vec<String> {
    let prefix = prefix(name);
    let phone: Vec<char> = phone.chars().collect();
    phone
        .windows(DIGITS_LEN)
        .map(|window| format!("{prefix}{}", window.iter().collect::<String>()))
        .collect()
}

/// Fallback when every phone-derived candidate is taken.
pub fn random_code<R: Rng + ?Sized>(name: &str, rng: &mut R) -> String {
    format!("{}{}", prefix(name), rng.gen_range(100..=999))
}

/// Every code the name prefix allows, in ascending order.
pub fn all_suffix_codes(name: &str) -> impl Iterator<Item = String> {
    let prefix = prefix(name);
    (100..=999).map(move |n| format!("{prefix}{n}"))
}

/// Canonical form of a code typed by a customer.
pub fn normalize_shop_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn candidates_walk_the_phone_number() {
        assert_eq!(
            code_candidates("fade masters", "55501"),
            vec!["FAD555", "FAD550", "FAD501"]
        );
    }

    #[test]
    fn short_names_and_phones() {
        assert_eq!(code_candidates("Al", "123"), vec!["AL123"]);
        assert!(code_candidates("Barber", "12").is_empty());
    }

    #[test]
    fn random_fallback_has_three_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let code = random_code("Clips", &mut rng);
            assert!(code.starts_with("CLI"));
            let n: u32 = code[3..].parse().unwrap();
            assert!((100..=999).contains(&n));
        }
    }

    #[test]
    fn typed_codes_are_normalized() {
        assert_eq!(normalize_shop_code("  fad555 "), "FAD555");
    }

    #[test]
    fn suffix_codes_cover_the_random_range() {
        let codes: Vec<String> = all_suffix_codes("fade").collect();
        assert_eq!(codes.len(), 900);
        assert_eq!(codes.first().map(String::as_str), Some("FAD100"));
        assert_eq!(codes.last().map(String::as_str), Some("FAD999"));
    }
}
