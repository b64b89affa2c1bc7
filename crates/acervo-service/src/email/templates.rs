//! Message bodies.

/// Subject and HTML body of the password-reset message.
pub fn reset_code(code: &str, ttl_minutes: u64) -> (String, String) {
    (
        "Your Acervo password reset code".to_string(),
        format!(
            "<p>Use the code below to reset your password.</p>\
             <p style=\"font-size:24px;letter-spacing:4px\"><strong>{code}</strong></p>\
             <p>The code expires in {ttl_minutes} minutes. If you did not ask for it, \
             ignore this message.</p>"
        ),
    )
}

/// Subject and HTML body of the welcome message sent to new accounts.
pub fn welcome(full_name: &str, email: &str, password: &str, login_url: &str) -> (String, String) {
    (
        "Welcome to Acervo".to_string(),
        format!(
            "<p>Hello {full_name},</p>\
             <p>An account was created for you.</p>\
             <p>Email: <strong>{email}</strong><br>Password: <strong>{password}</strong></p>\
             <p>Sign in at <a href=\"{login_url}\">{login_url}</a> and change your password.</p>"
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_code_body_contains_code() {
        let (_, body) = reset_code("482913", 15);
        assert!(body.contains("482913"));
        assert!(body.contains("15 minutes"));
    }
}
