//! Sign-up checks run before the registration call.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    /// One point each for length >= 8, an uppercase letter, a digit and a special character.
    pub fn of(password: &str) -> Option<Self> {
        if password.is_empty() {
            return None;
        }
        let score = [
            password.chars().count() >= 8,
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ]
        .iter()
        .filter(|met| **met)
        .count();

        Some(match score {
            0 | 1 => PasswordStrength::Weak,
            2 => PasswordStrength::Fair,
            3 => PasswordStrength::Good,
            _ => PasswordStrength::Strong,
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        }
    }
}

/// At least 8 characters, one uppercase letter and one non-alphanumeric character.
pub fn is_password_valid(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

pub fn validate_signup(username: &str, password: &str) -> Result<(), &'static str> {
    let len = username.chars().count();
    if !(3..=20).contains(&len) {
        return Err("Username must be between 3 and 20 characters.");
    }
    if !is_password_valid(password) {
        return Err(
            "Password must be at least 8 characters and include one uppercase letter and one special character.",
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_bounds_are_inclusive() {
        assert!(validate_signup("ab", "Secret!23").is_err());
        assert!(validate_signup("abc", "Secret!23").is_ok());
        assert!(validate_signup(&"a".repeat(20), "Secret!23").is_ok());
        assert!(validate_signup(&"a".repeat(21), "Secret!23").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(!is_password_valid("Short!1"));
        assert!(!is_password_valid("nouppercase!"));
        assert!(!is_password_valid("NoSpecial1"));
        assert!(is_password_valid("Longer!pass"));
    }

    #[test]
    fn strength_labels() {
        assert_eq!(PasswordStrength::of(""), None);
        assert_eq!(PasswordStrength::of("abc"), Some(PasswordStrength::Weak));
        assert_eq!(PasswordStrength::of("abcdefgh"), Some(PasswordStrength::Weak));
        assert_eq!(PasswordStrength::of("Abcdefgh"), Some(PasswordStrength::Fair));
        assert_eq!(PasswordStrength::of("Abcdefg1"), Some(PasswordStrength::Good));
        assert_eq!(
            PasswordStrength::of("Abcdef1!").map(PasswordStrength::label),
            Some("Strong")
        );
    }
}
