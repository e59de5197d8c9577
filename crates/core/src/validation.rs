//! Field-level validation helpers shared by the DB flows and API handlers.
//!
//! Each helper returns `Err` with a human-readable explanation; callers wrap
//! the message in [`crate::error::CoreError::Validation`].

/// Minimum length for entity display names (assets, parts, technicians, titles).
pub const MIN_NAME_LEN: usize = 3;

/// Validate that a name-like field has at least [`MIN_NAME_LEN`] non-blank characters.
pub fn validate_name(field: &str, value: &str) -> Result<(), String> {
    if value.trim().chars().count() < MIN_NAME_LEN {
        return Err(format!(
            "{field} must be at least {MIN_NAME_LEN} characters long"
        ));
    }
    Ok(())
}

/// Validate a minimal email shape. Full RFC validation is deliberately out of
/// scope; the mail system is the final arbiter.
pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    if !trimmed.contains('@') || trimmed.starts_with('@') || trimmed.ends_with('@') {
        return Err(format!("'{email}' is not a valid email address"));
    }
    Ok(())
}

/// Normalize a part reference: trimmed and uppercased. Returns `Err` when the
/// result is shorter than [`MIN_NAME_LEN`] characters.
pub fn normalize_reference(reference: &str) -> Result<String, String> {
    let normalized = reference.trim().to_uppercase();
    if normalized.chars().count() < MIN_NAME_LEN {
        return Err(format!(
            "Part reference must be at least {MIN_NAME_LEN} characters long"
        ));
    }
    Ok(normalized)
}

/// Validate that a quantity is strictly positive.
pub fn validate_positive_quantity(quantity: i32) -> Result<(), String> {
    if quantity <= 0 {
        return Err(format!("Quantity must be positive, got {quantity}"));
    }
    Ok(())
}

/// Validate that a monetary amount is not negative.
pub fn validate_non_negative_price(price: f64) -> Result<(), String> {
    if price < 0.0 {
        return Err(format!("Price must not be negative, got {price}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_rejected() {
        assert!(validate_name("name", "ab").is_err());
        assert!(validate_name("name", "  a  ").is_err());
    }

    #[test]
    fn three_char_name_accepted() {
        assert!(validate_name("name", "abc").is_ok());
    }

    #[test]
    fn email_requires_interior_at() {
        assert!(validate_email("tech@plant.example").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@leading").is_err());
        assert!(validate_email("trailing@").is_err());
    }

    #[test]
    fn reference_uppercased_and_trimmed() {
        assert_eq!(normalize_reference("  brg-6204 ").unwrap(), "BRG-6204");
    }

    #[test]
    fn short_reference_rejected() {
        assert!(normalize_reference("ab").is_err());
    }

    #[test]
    fn zero_and_negative_quantities_rejected() {
        assert!(validate_positive_quantity(0).is_err());
        assert!(validate_positive_quantity(-4).is_err());
        assert!(validate_positive_quantity(1).is_ok());
    }

    #[test]
    fn negative_price_rejected() {
        assert!(validate_non_negative_price(-0.01).is_err());
        assert!(validate_non_negative_price(0.0).is_ok());
    }
}
