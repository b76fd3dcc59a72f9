use std::fmt;

/// Masks an email address for logs: `jane.doe@mine.com` becomes `j***@mine.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{first}***@{domain}"),
            None => format!("@{domain}"),
        },
        None => "***".to_string(),
    }
}

/// Display wrapper that masks the email it holds.
pub struct RedactedEmail<'a>(pub &'a str);

impl fmt::Display for RedactedEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask_email(self.0))
    }
}

impl fmt::Debug for RedactedEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
