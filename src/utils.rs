pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn cookie(name: &str, value: &str, secure: bool) -> String {
    let secure_attr = if secure { " Secure;" } else { "" };
    format!("{name}={value}; HttpOnly; Max-Age=604800;{secure_attr} Path=/; SameSite=Lax")
}

/// Short-lived cookie for the OAuth state nonce.
pub fn state_cookie(name: &str, value: &str, secure: bool) -> String {
    let secure_attr = if secure { " Secure;" } else { "" };
    format!("{name}={value}; HttpOnly; Max-Age=600;{secure_attr} Path=/; SameSite=Lax")
}

pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; Max-Age=0; Path=/; SameSite=Lax")
}

pub fn format_elapsed(total_seconds: i64) -> String {
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{mins:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_formats_as_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(600), "10:00");
    }

    #[test]
    fn secure_flag_toggles_cookie_attribute() {
        assert!(cookie("s", "v", true).contains("Secure"));
        assert!(!cookie("s", "v", false).contains("Secure"));
    }
}
