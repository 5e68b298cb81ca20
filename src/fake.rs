//! Fake data for request bodies.
//!
//! The session layer only talks to the [`FakeData`] trait, so tests can swap
//! [`RandomFakeData`] for a fixture that returns fixed values.

use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::DataError;
use crate::model::Telephone;

/// Oldest pet we generate, in years.
pub const MAX_PET_AGE_YEARS: u32 = 15;

/// Digits kept from a generated phone number.
pub const TELEPHONE_DIGITS: usize = 10;

/// Source of randomized field values.
pub trait FakeData {
    fn first_name(&mut self) -> String;
    fn last_name(&mut self) -> String;
    fn street_address(&mut self) -> String;
    fn city(&mut self) -> String;
    /// A human-formatted phone number; may contain punctuation and extensions.
    fn phone_number(&mut self) -> String;
    fn pet_name(&mut self) -> String;
    /// A birth date no later than `today` and at most
    /// [`MAX_PET_AGE_YEARS`] before it.
    fn birth_date(&mut self, today: NaiveDate) -> NaiveDate;
}

/// Strip everything but digits and keep the first ten.
///
/// # Errors
///
/// Returns [`DataError::ShortTelephone`] if fewer than ten digits remain.
pub fn normalize_telephone(raw: &str) -> Result<Telephone, DataError> {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(TELEPHONE_DIGITS)
        .collect();
    if digits.len() < TELEPHONE_DIGITS {
        return Err(DataError::ShortTelephone {
            raw: raw.to_string(),
        });
    }
    Ok(Telephone(digits))
}

/// Earliest birth date allowed for a pet generated on `today`.
pub fn earliest_birth_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(MAX_PET_AGE_YEARS * 12))
        .unwrap_or(today)
}

/// Whole years between `birth` and `today`, `None` if `birth` is in the future.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(birth)
}

const FIRST_NAMES: &[&str] = &[
    "George", "Betty", "Eduardo", "Harold", "Peter", "Jean", "Jeff", "Maria", "David", "Carlos",
    "Aisha", "Priya", "Tomasz", "Ingrid", "Kenji", "Olivia", "Mateo", "Fatima", "Liam", "Noor",
];

const LAST_NAMES: &[&str] = &[
    "Franklin", "Davis", "Rodriquez", "McTavish", "Black", "Coleman", "Escobito", "Schroeder",
    "Estaban", "Nakamura", "Okafor", "Lindqvist", "Kowalski", "Haddad", "Patel", "Moreau",
];

const STREET_NAMES: &[&str] = &[
    "University Ave.", "W. Liberty St.", "E. Washington St.", "Lake St.", "Mapple St.",
    "Spring St.", "Lakeside Dr.", "Oak Ln.", "Cedar Ct.", "Harbor Rd.",
];

const CITIES: &[&str] = &[
    "Madison", "Sun Prairie", "McFarland", "Windsor", "Monona", "Waunakee", "Middleton",
    "Verona", "Fitchburg", "Stoughton",
];

const PET_NAMES: &[&str] = &[
    "Leo", "Basil", "Rosy", "Jewel", "Iggy", "George", "Samantha", "Max", "Lucky", "Mulligan",
    "Freddy", "Sly", "Pepper", "Biscuit", "Nimbus",
];

/// [`FakeData`] backed by a seedable [`StdRng`].
#[derive(Debug, Clone)]
pub struct RandomFakeData {
    rng: StdRng,
}

impl RandomFakeData {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick(&mut self, words: &[&str]) -> String {
        words.choose(&mut self.rng).copied().unwrap_or_default().to_string()
    }

    fn digits(&mut self, count: usize) -> String {
        (0..count)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect()
    }
}

impl Default for RandomFakeData {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeData for RandomFakeData {
    fn first_name(&mut self) -> String {
        self.pick(FIRST_NAMES)
    }

    fn last_name(&mut self) -> String {
        self.pick(LAST_NAMES)
    }

    fn street_address(&mut self) -> String {
        let number = self.rng.gen_range(1..=9999);
        let street = self.pick(STREET_NAMES);
        format!("{} {}", number, street)
    }

    fn city(&mut self) -> String {
        self.pick(CITIES)
    }

    fn phone_number(&mut self) -> String {
        let area = self.digits(3);
        let exchange = self.digits(3);
        let line = self.digits(4);
        match self.rng.gen_range(0..5) {
            0 => format!("({}) {}-{}", area, exchange, line),
            1 => format!("+1-{}-{}-{}", area, exchange, line),
            2 => format!("{}.{}.{}", area, exchange, line),
            3 => {
                let ext = self.digits(3);
                format!("{}-{}-{}x{}", area, exchange, line, ext)
            }
            _ => format!("{}{}{}", area, exchange, line),
        }
    }

    fn pet_name(&mut self) -> String {
        self.pick(PET_NAMES)
    }

    fn birth_date(&mut self, today: NaiveDate) -> NaiveDate {
        let earliest = earliest_birth_date(today);
        let span = (today - earliest).num_days().max(0);
        let offset = self.rng.gen_range(0..=span);
        earliest + chrono::Duration::days(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        let phone = normalize_telephone("(608) 555-1023").unwrap();
        assert_eq!(phone.as_str(), "6085551023");
    }

    #[test]
    fn test_normalize_truncates_to_ten_digits() {
        let phone = normalize_telephone("+1-608-555-1023 x456").unwrap();
        assert_eq!(phone.as_str(), "1608555102");
    }

    #[test]
    fn test_normalize_rejects_short_numbers() {
        assert_eq!(
            normalize_telephone("555-1023"),
            Err(DataError::ShortTelephone {
                raw: "555-1023".into()
            })
        );
        assert!(normalize_telephone("").is_err());
    }

    #[test]
    fn test_generated_phone_numbers_normalize_to_ten_digits() {
        let mut fake = RandomFakeData::seeded(7);
        for _ in 0..500 {
            let raw = fake.phone_number();
            let phone = normalize_telephone(&raw).unwrap();
            assert_eq!(phone.as_str().len(), 10, "raw: {}", raw);
            assert!(phone.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_birth_dates_stay_within_fifteen_years() {
        let mut fake = RandomFakeData::seeded(11);
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        for _ in 0..1000 {
            let birth = fake.birth_date(today);
            let age = age_in_years(birth, today).unwrap();
            assert!(age <= MAX_PET_AGE_YEARS, "birth {} is {} years old", birth, age);
            assert!(birth <= today);
        }
    }

    #[test]
    fn test_birth_date_on_leap_day() {
        let mut fake = RandomFakeData::seeded(3);
        let today = NaiveDate::from_ymd_opt(2028, 2, 29).unwrap();
        assert_eq!(
            earliest_birth_date(today),
            NaiveDate::from_ymd_opt(2013, 2, 28).unwrap()
        );
        for _ in 0..200 {
            let age = age_in_years(fake.birth_date(today), today).unwrap();
            assert!(age <= MAX_PET_AGE_YEARS);
        }
    }

    #[test]
    fn test_seeded_generators_repeat() {
        let mut a = RandomFakeData::seeded(42);
        let mut b = RandomFakeData::seeded(42);
        assert_eq!(a.first_name(), b.first_name());
        assert_eq!(a.street_address(), b.street_address());
        assert_eq!(a.phone_number(), b.phone_number());
    }

    #[test]
    fn test_age_in_years_future_birth() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(age_in_years(tomorrow, today), None);
        assert_eq!(age_in_years(today, today), Some(0));
    }
}
