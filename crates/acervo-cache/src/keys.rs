//! Cache key builders for all Acervo cache entries.

/// Cache key holding the pending password-reset code for an email address.
pub fn password_reset_code(email: &str) -> String {
    format!("reset_code:{}", email.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_key_is_case_insensitive() {
        assert_eq!(
            password_reset_code(" Ana@Uni.edu "),
            password_reset_code("ana@uni.edu")
        );
    }
}
