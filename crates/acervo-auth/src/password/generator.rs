//! Random secrets: reset codes and initial passwords.

/// A string of `len` random decimal digits without a leading zero.
pub fn numeric_code(len: usize) -> String {
    (0..len)
        .map(|i| {
            let digit: u8 = if i == 0 {
                rand::random_range(1..10)
            } else {
                rand::random_range(0..10)
            };
            char::from(b'0' + digit)
        })
        .collect()
}

/// Initial password for a new account: the first two letters of the
/// first name followed by four random digits.
pub fn initial_password(first_name: &str) -> String {
    let prefix: String = first_name
        .chars()
        .filter(|c| c.is_alphabetic())
        .take(2)
        .flat_map(char::to_lowercase)
        .collect();
    format!("{prefix}{}", numeric_code(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_code_shape() {
        let code = numeric_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert!(!code.starts_with('0'));
    }

    #[test]
    fn test_initial_password_shape() {
        let password = initial_password("Ana");
        assert_eq!(password.len(), 6);
        assert!(password.starts_with("an"));
        assert!(password[2..].chars().all(|c| c.is_ascii_digit()));
    }
}
