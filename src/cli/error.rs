// Error handling utilities for consistent error messages and exit codes

use std::process;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, rejected requests, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate a record identifier before it goes into a request path
pub fn validate_record_id(id: &str, what: &str) -> Result<String, String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("{} ID cannot be empty", what));
    }
    if id.chars().any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace()) {
        return Err(format!("Invalid {} ID: '{}'", what, id));
    }
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("test", "field").is_ok());
        assert!(validate_non_empty("", "field").is_err());
        assert!(validate_non_empty("   ", "field").is_err());
    }

    #[test]
    fn test_validate_record_id() {
        assert_eq!(validate_record_id(" CR-0001 ", "Change request"), Ok("CR-0001".to_string()));
        assert_eq!(validate_record_id("42", "Asset"), Ok("42".to_string()));
        assert!(validate_record_id("", "Asset").is_err());
        assert!(validate_record_id("1/approve", "Change request").is_err());
        assert!(validate_record_id("a b", "Asset").is_err());
    }
}
