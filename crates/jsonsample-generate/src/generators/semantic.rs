//! String generators chosen from the field's output key.

use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, CountryName, StateAbbr, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::RngCore;

use crate::generators::{Generator, GeneratorRegistry};
use crate::value::LiteralValue;

pub const EMAIL: &str = "semantic.email";
pub const PERSON_NAME: &str = "semantic.person_name";
pub const COMPANY: &str = "semantic.company";
pub const COUNTRY: &str = "semantic.country";
pub const ADDRESS: &str = "semantic.address";
pub const PHONE: &str = "semantic.phone";
pub const SENTENCE: &str = "semantic.sentence";

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(EmailGenerator));
    registry.register_generator(Box::new(PersonNameGenerator));
    registry.register_generator(Box::new(CompanyGenerator));
    registry.register_generator(Box::new(CountryGenerator));
    registry.register_generator(Box::new(AddressGenerator));
    registry.register_generator(Box::new(PhoneGenerator));
    registry.register_generator(Box::new(SentenceGenerator));
}

/// Exact keys are matched first; the `address` and `phone` suffix checks run
/// afterwards and override them (`email_address` is an address).
pub fn select_for_key(key: &str) -> &'static str {
    let mut id = match key {
        "email" => EMAIL,
        "name" | "first_name" | "last_name" | "middle_name" => PERSON_NAME,
        "company" => COMPANY,
        "country" => COUNTRY,
        _ => SENTENCE,
    };
    if key.ends_with("address") {
        id = ADDRESS;
    }
    if key.ends_with("phone") {
        id = PHONE;
    }
    id
}

struct EmailGenerator;

impl Generator for EmailGenerator {
    fn id(&self) -> &'static str {
        EMAIL
    }

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue {
        let value: String = SafeEmail().fake_with_rng(rng);
        LiteralValue::Text(value)
    }
}

struct PersonNameGenerator;

impl Generator for PersonNameGenerator {
    fn id(&self) -> &'static str {
        PERSON_NAME
    }

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue {
        let value: String = Name().fake_with_rng(rng);
        LiteralValue::Text(value)
    }
}

struct CompanyGenerator;

impl Generator for CompanyGenerator {
    fn id(&self) -> &'static str {
        COMPANY
    }

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue {
        let value: String = CompanyName().fake_with_rng(rng);
        LiteralValue::Text(value)
    }
}

struct CountryGenerator;

impl Generator for CountryGenerator {
    fn id(&self) -> &'static str {
        COUNTRY
    }

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue {
        let value: String = CountryName().fake_with_rng(rng);
        LiteralValue::Text(value)
    }
}

/// One-line postal address: `<number> <street>, <city>, <state> <zip>`.
struct AddressGenerator;

impl Generator for AddressGenerator {
    fn id(&self) -> &'static str {
        ADDRESS
    }

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue {
        let number: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        let city: String = CityName().fake_with_rng(rng);
        let state: String = StateAbbr().fake_with_rng(rng);
        let zip: String = ZipCode().fake_with_rng(rng);
        LiteralValue::Text(format!("{number} {street}, {city}, {state} {zip}"))
    }
}

struct PhoneGenerator;

impl Generator for PhoneGenerator {
    fn id(&self) -> &'static str {
        PHONE
    }

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue {
        let value: String = PhoneNumber().fake_with_rng(rng);
        LiteralValue::Text(value)
    }
}

struct SentenceGenerator;

impl Generator for SentenceGenerator {
    fn id(&self) -> &'static str {
        SENTENCE
    }

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue {
        let value: String = Sentence(3..7).fake_with_rng(rng);
        LiteralValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_keys_select_their_generator() {
        assert_eq!(select_for_key("email"), EMAIL);
        assert_eq!(select_for_key("first_name"), PERSON_NAME);
        assert_eq!(select_for_key("middle_name"), PERSON_NAME);
        assert_eq!(select_for_key("company"), COMPANY);
        assert_eq!(select_for_key("country"), COUNTRY);
    }

    #[test]
    fn suffix_checks_override_exact_matches() {
        assert_eq!(select_for_key("address"), ADDRESS);
        assert_eq!(select_for_key("email_address"), ADDRESS);
        assert_eq!(select_for_key("home_phone"), PHONE);
        assert_eq!(select_for_key("phone"), PHONE);
    }

    #[test]
    fn other_keys_get_a_sentence() {
        assert_eq!(select_for_key("string_field"), SENTENCE);
        assert_eq!(select_for_key("emails"), SENTENCE);
        assert_eq!(select_for_key("username"), SENTENCE);
    }
}
