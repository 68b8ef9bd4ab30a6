use uuid::Uuid;

use crate::shared::errors::AppError;

pub struct Validator;

impl Validator {
    /// Parse an identifier received as a path segment
    pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::ValidationError(format!("{} ID is required", what)));
        }

        Uuid::parse_str(trimmed)
            .map_err(|_| AppError::ValidationError(format!("Invalid {} ID format: {}", what, raw)))
    }

    pub fn validate_pagination(page: i64, limit: i64) -> Result<(), AppError> {
        if page < 1 {
            return Err(AppError::ValidationError(
                "Page must be at least 1".to_string(),
            ));
        }
        if limit <= 0 {
            return Err(AppError::ValidationError(
                "Limit must be positive".to_string(),
            ));
        }
        if limit > 100 {
            return Err(AppError::ValidationError(
                "Limit cannot exceed 100".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(Validator::parse_id(&id.to_string(), "Movie").unwrap(), id);
        assert!(Validator::parse_id("42", "Movie").is_err());
        assert!(Validator::parse_id("  ", "Movie").is_err());
    }

    #[test]
    fn test_validate_pagination_bounds() {
        assert!(Validator::validate_pagination(1, 1).is_ok());
        assert!(Validator::validate_pagination(3, 100).is_ok());
        assert!(Validator::validate_pagination(0, 10).is_err());
        assert!(Validator::validate_pagination(1, 0).is_err());
        assert!(Validator::validate_pagination(1, 101).is_err());
    }
}
