//! Kebab-case name validation.
//!
//! Shared entities (Pattern, App, DataModel, etc.) must have names matching
//! `^[a-z][a-z0-9]*(-[a-z0-9]+)*$`. This is enforced as a hard guard on
//! create.

/// Returns true if `name` matches `^[a-z][a-z0-9]*(-[a-z0-9]+)*$`.
pub fn is_kebab_case(name: &str) -> bool {
    let mut chars = name.chars().peekable();

    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }

    let mut prev_was_hyphen = false;
    let mut saw_any_after_hyphen = true;

    for c in chars {
        if c == '-' {
            if prev_was_hyphen || !saw_any_after_hyphen {
                return false;
            }
            prev_was_hyphen = true;
            saw_any_after_hyphen = false;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            prev_was_hyphen = false;
            saw_any_after_hyphen = true;
        } else {
            return false;
        }
    }

    !prev_was_hyphen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_names() {
        for name in ["add-login", "a", "a1", "a-b-c", "add-login2-feature"] {
            assert!(is_kebab_case(name), "expected {name:?} to be valid");
        }
    }

    #[test]
    fn rejects_invalid_names() {
        for name in [
            "",
            "Add-Login",
            "add_login",
            "-add-login",
            "add-login-",
            "add--login",
            "1add",
            "add login",
            "add.login",
        ] {
            assert!(!is_kebab_case(name), "expected {name:?} to be invalid");
        }
    }

    #[test]
    fn single_char_names_are_valid() {
        assert!(is_kebab_case("x"));
        assert!(!is_kebab_case("-"));
    }
}
