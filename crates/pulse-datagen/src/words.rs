//! Word pools and small value synthesizers for descriptive columns.
//!
//! Values only need to be plausible and deterministic for a seed.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::prelude::*;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chloe", "Dimitri", "Elena", "Farid", "Greta", "Hiro", "Ines", "Jonas",
    "Kira", "Luca", "Maya", "Nikos", "Olga", "Pablo", "Quinn", "Rosa", "Sven", "Tara", "Umar",
    "Vera", "Wei", "Ximena", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Andersen", "Baptiste", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Hoffmann",
    "Ivanova", "Jensen", "Kowalski", "Lambert", "Moreau", "Nakamura", "Okafor", "Papadopoulos",
    "Quintero", "Rossi", "Schmidt", "Tanaka", "Urban", "Vargas", "Walsh", "Yilmaz", "Zhang",
];

const CITIES: &[&str] = &[
    "Lisbon", "Osaka", "Toronto", "Lima", "Nairobi", "Perth", "Athens", "Seoul", "Denver",
    "Bogota", "Accra", "Hobart", "Krakow", "Hanoi", "Austin", "Quito", "Dakar", "Auckland",
];

const COUNTRIES: &[&str] = &[
    "Portugal", "Japan", "Canada", "Peru", "Kenya", "Australia", "Greece", "South Korea",
    "United States", "Colombia", "Ghana", "Poland", "Vietnam", "Ecuador", "Senegal", "New Zealand",
];

const STREETS: &[&str] = &[
    "Harbor", "Maple", "Station", "Orchard", "Mill", "Bridge", "Sunset", "Cedar", "Lake", "Market",
];

const STREET_SUFFIXES: &[&str] = &[
    "Avenue", "Court", "Gardens", "Hill", "Lane", "Park", "Plaza", "Road", "Square", "Terrace",
    "Way", "Yard",
];

const COLORS: &[&str] = &[
    "Amber", "Azure", "Coral", "Crimson", "Cyan", "Emerald", "Gold", "Indigo", "Ivory", "Jade",
    "Lavender", "Magenta", "Olive", "Orchid", "Ruby", "Sapphire", "Scarlet", "Silver", "Teal",
    "Violet",
];

const COMPANY_WORDS: &[&str] = &[
    "Echo", "Pulse", "Static", "Velvet", "Neon", "Hollow", "Midnight", "Paper", "Electric",
    "Wild", "Glass", "Iron", "Lunar", "Copper", "Signal",
];

const COMPANY_NOUNS: &[&str] = &[
    "Collective", "Union", "Brothers", "Society", "Machine", "Orchestra", "Club", "Parade",
    "Theory", "Engine",
];

const DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

const SENTENCE_WORDS: &[&str] = &[
    "music", "night", "crowd", "light", "sound", "stage", "dance", "summer", "open", "air",
    "rhythm", "bass", "live", "season", "festival", "city", "river", "loud", "warm", "together",
];

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

pub fn first_name<R: Rng>(rng: &mut R) -> String {
    pick(rng, FIRST_NAMES).to_string()
}

pub fn last_name<R: Rng>(rng: &mut R) -> String {
    pick(rng, LAST_NAMES).to_string()
}

pub fn full_name<R: Rng>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

/// Lowercase handle such as `maya_rossi42`.
pub fn user_name<R: Rng>(rng: &mut R) -> String {
    format!(
        "{}_{}{}",
        pick(rng, FIRST_NAMES).to_lowercase(),
        pick(rng, LAST_NAMES).to_lowercase(),
        rng.random_range(1..100)
    )
}

pub fn city<R: Rng>(rng: &mut R) -> String {
    pick(rng, CITIES).to_string()
}

pub fn country<R: Rng>(rng: &mut R) -> String {
    pick(rng, COUNTRIES).to_string()
}

pub fn street_address<R: Rng>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        rng.random_range(1..500),
        pick(rng, STREETS),
        pick(rng, STREET_SUFFIXES)
    )
}

pub fn color_name<R: Rng>(rng: &mut R) -> String {
    pick(rng, COLORS).to_string()
}

pub fn street_suffix<R: Rng>(rng: &mut R) -> String {
    pick(rng, STREET_SUFFIXES).to_string()
}

pub fn company<R: Rng>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, COMPANY_WORDS), pick(rng, COMPANY_NOUNS))
}

pub fn url<R: Rng>(rng: &mut R) -> String {
    format!(
        "https://www.{}{}.{}/",
        pick(rng, COMPANY_WORDS).to_lowercase(),
        pick(rng, COMPANY_NOUNS).to_lowercase(),
        pick(rng, DOMAINS)
    )
}

/// Email that is unique as long as `serial` is.
pub fn email(first: &str, last: &str, serial: u32, domain_index: usize) -> String {
    format!(
        "{}.{}{}@{}",
        first.to_lowercase(),
        last.to_lowercase(),
        serial,
        DOMAINS[domain_index % DOMAINS.len()]
    )
}

pub fn phone_number<R: Rng>(rng: &mut R) -> String {
    format!(
        "+{}-{:03}-{:04}",
        rng.random_range(1..100),
        rng.random_range(0..1000),
        rng.random_range(0..10_000)
    )
}

/// Capitalized sentence of four to eight words ending in a period.
pub fn sentence<R: Rng>(rng: &mut R) -> String {
    let len = rng.random_range(4..=8);
    let words: Vec<&str> = (0..len).map(|_| pick(rng, SENTENCE_WORDS)).collect();
    let mut text = words.join(" ");
    if let Some(first) = text.get(0..1) {
        let upper = first.to_uppercase();
        text.replace_range(0..1, &upper);
    }
    text.push('.');
    text
}

/// Thirteen-digit EAN code with a valid check digit.
pub fn ean13<R: Rng>(rng: &mut R) -> String {
    let digits: Vec<u32> = (0..12).map(|_| rng.random_range(0..10)).collect();
    let weighted: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    let check = (10 - weighted % 10) % 10;

    digits
        .iter()
        .chain(std::iter::once(&check))
        .map(|d| char::from_digit(*d, 10).unwrap_or('0'))
        .collect()
}

pub fn latitude<R: Rng>(rng: &mut R) -> f64 {
    round_to(rng.random_range(-90.0..=90.0), 6)
}

pub fn longitude<R: Rng>(rng: &mut R) -> f64 {
    round_to(rng.random_range(-180.0..=180.0), 6)
}

/// Uniform date in `[start, end]`. Returns `start` when the range is empty.
pub fn date_between<R: Rng>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days();
    if span <= 0 {
        return start;
    }
    start + Duration::days(rng.random_range(0..=span))
}

/// Uniform datetime in `[start, end]` at one-second resolution.
pub fn datetime_between<R: Rng>(
    rng: &mut R,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> NaiveDateTime {
    let span = (end - start).num_seconds();
    if span <= 0 {
        return start;
    }
    start + Duration::seconds(rng.random_range(0..=span))
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ean13_check_digit() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let code = ean13(&mut rng);
            assert_eq!(code.len(), 13);
            let sum: u32 = code
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    let d = c.to_digit(10).unwrap();
                    if i % 2 == 0 { d } else { d * 3 }
                })
                .sum();
            assert_eq!(sum % 10, 0, "bad check digit in {}", code);
        }
    }

    #[test]
    fn test_date_between_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        for _ in 0..200 {
            let d = date_between(&mut rng, start, end);
            assert!(d >= start && d <= end);
        }
        assert_eq!(date_between(&mut rng, end, start), end);
    }

    #[test]
    fn test_sentence_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let s = sentence(&mut rng);
        assert!(s.ends_with('.'));
        assert!(s.chars().next().unwrap().is_uppercase());
    }

    #[test]
    fn test_email_unique_per_serial() {
        assert_ne!(email("Ana", "Rossi", 1, 0), email("Ana", "Rossi", 2, 0));
        assert_eq!(email("Ana", "Rossi", 7, 0), "ana.rossi7@example.com");
    }
}
