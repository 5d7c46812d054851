//! Input Schemas
//!
//! Form rules per resource. Field names are the canonical camelCase names.

use chrono::Datelike;

use crate::types::{
    AccountInput, AddressInput, CarInput, CustomerInput, GalleristCarInput, GalleristInput,
    GalleristWithAddressInput, SaleInput,
};
use crate::validation::{
    validate_plate, validate_postal_code, validate_tckn, Validate, ValidationErrors,
};

const EARLIEST_PRODUCTION_YEAR: i64 = 1900;
const IBAN_LENGTH: usize = 26;

fn require(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, message);
        false
    } else {
        true
    }
}

fn min_chars(errors: &mut ValidationErrors, field: &str, value: &str, min: usize, message: &str) {
    if value.trim().chars().count() < min {
        errors.add(field, message);
    }
}

/// A selected record id: a positive integer.
fn require_selection(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    match value.trim().parse::<i64>() {
        Ok(id) if id >= 1 => {}
        _ => errors.add(field, message),
    }
}

impl Validate for CarInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if require(&mut errors, "plate", &self.plate, "Plate is required")
            && !validate_plate(&self.plate)
        {
            errors.add("plate", "Invalid plate format (e.g., 34 ABC 1234)");
        }
        require(&mut errors, "brand", &self.brand, "Brand is required");
        require(&mut errors, "model", &self.model, "Model is required");

        let latest = i64::from(chrono::Local::now().year()) + 1;
        if self.production_year < EARLIEST_PRODUCTION_YEAR {
            errors.add("productionYear", "Year must be after 1900");
        } else if self.production_year > latest {
            errors.add("productionYear", "Year cannot be in the future");
        }

        if !self.price.is_finite() || self.price < 0.0 {
            errors.add("price", "Price must be positive");
        }
        if matches!(self.damage_price, Some(d) if !d.is_finite() || d < 0.0) {
            errors.add("damagePrice", "Damage price cannot be negative");
        }

        errors.into_result()
    }
}

impl Validate for AddressInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        require(&mut errors, "city", &self.city, "City is required");
        require(&mut errors, "district", &self.district, "District is required");
        require(&mut errors, "neighborhood", &self.neighborhood, "Neighborhood is required");
        require(&mut errors, "street", &self.street, "Street is required");

        if let Some(code) = self.postal_code.as_deref().filter(|c| !c.is_empty()) {
            if !validate_postal_code(code) {
                errors.add("postalCode", "Postal code must be 5 digits");
            }
        }

        errors.into_result()
    }
}

impl Validate for AccountInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        require(&mut errors, "accountNo", &self.account_no, "Account number is required");

        let iban = self.iban.trim();
        if require(&mut errors, "iban", iban, "IBAN is required") {
            let prefixed = iban.starts_with("TR")
                && iban
                    .get(2..4)
                    .map_or(false, |check| check.bytes().all(|b| b.is_ascii_digit()));
            if !prefixed {
                errors.add("iban", "IBAN must start with \"TR\" and be in valid format");
            }
            if iban.chars().count() != IBAN_LENGTH {
                errors.add("iban", "IBAN must be 26 characters");
            }
        }

        if !self.amount.is_finite() || self.amount < 0.0 {
            errors.add("amount", "Amount cannot be negative");
        }

        errors.into_result()
    }
}

impl Validate for CustomerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        min_chars(&mut errors, "firstName", &self.first_name, 2, "First name must be at least 2 characters");
        min_chars(&mut errors, "lastName", &self.last_name, 2, "Last name must be at least 2 characters");

        if self.tckn.chars().count() != 11 {
            errors.add("tckn", "TCKN must be 11 digits");
        } else if !validate_tckn(&self.tckn) {
            errors.add("tckn", "Invalid TCKN");
        }

        require(&mut errors, "birthDate", &self.birth_date, "Birth date is required");
        require(&mut errors, "addressId", &self.address_id, "Address is required");
        require(&mut errors, "accountId", &self.account_id, "Account is required");

        errors.into_result()
    }
}

impl Validate for GalleristInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        min_chars(&mut errors, "firstName", &self.first_name, 2, "First name must be at least 2 characters");
        min_chars(&mut errors, "lastName", &self.last_name, 2, "Last name must be at least 2 characters");
        errors.into_result()
    }
}

impl Validate for GalleristWithAddressInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        min_chars(&mut errors, "firstName", &self.first_name, 2, "First name must be at least 2 characters");
        min_chars(&mut errors, "lastName", &self.last_name, 2, "Last name must be at least 2 characters");

        let mut address = ValidationErrors::new();
        let a = &self.address;
        min_chars(&mut address, "city", &a.city, 2, "City must be at least 2 characters");
        min_chars(&mut address, "district", &a.district, 2, "District must be at least 2 characters");
        min_chars(&mut address, "neighborhood", &a.neighborhood, 2, "Neighborhood must be at least 2 characters");
        min_chars(&mut address, "street", &a.street, 2, "Street must be at least 2 characters");
        errors.nest("address", address);

        errors.into_result()
    }
}

impl Validate for GalleristCarInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_selection(&mut errors, "galleristId", &self.gallerist_id, "Gallerist must be selected");
        require_selection(&mut errors, "carId", &self.car_id, "Car must be selected");
        errors.into_result()
    }
}

impl Validate for SaleInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_selection(&mut errors, "customerId", &self.customer_id, "Please select a valid customer");
        require_selection(&mut errors, "galleristId", &self.gallerist_id, "Please select a valid gallerist");
        require_selection(&mut errors, "carId", &self.car_id, "Please select a valid car");
        errors.into_result()
    }
}
