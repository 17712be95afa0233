use crate::ValidationError;

/// `local@domain.tld`: exactly one `@`, no whitespace, and a dot inside the domain
/// with something on both sides.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }

    // Any dot works as long as it has a non-empty label on each side.
    let has_split = domain
        .match_indices('.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len());
    if has_split {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Any unequal pair is a mismatch, even when one side is empty. Only a matching
/// pair of empty fields is reported as a missing password.
pub fn validate_passwords(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}
