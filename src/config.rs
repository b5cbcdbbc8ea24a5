use tracing::{debug, warn};

/// Loads `.env.local` then `.env` from the working directory, when present.
///
/// Variables already set in the process environment win over file contents.
pub fn load_env_files() {
    for name in [".env.local", ".env"] {
        match dotenvy::from_filename(name) {
            Ok(path) => debug!(path = %path.display(), "loaded env file"),
            Err(err) if err.not_found() => {}
            Err(err) => warn!(file = name, %err, "ignoring unreadable env file"),
        }
    }
}

/// Reads `key` through `lookup` and parses it as a finite float.
pub(crate) fn env_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<f64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(key, value = %raw, "ignoring non-numeric override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_f64_rejects_non_finite() {
        let lookup = |k: &str| match k {
            "A" => Some(" 1.5 ".to_string()),
            "B" => Some("inf".to_string()),
            "C" => Some("abc".to_string()),
            _ => None,
        };
        assert_eq!(env_f64(&lookup, "A"), Some(1.5));
        assert_eq!(env_f64(&lookup, "B"), None);
        assert_eq!(env_f64(&lookup, "C"), None);
        assert_eq!(env_f64(&lookup, "D"), None);
    }

    #[test]
    fn missing_env_files_are_not_an_error() {
        load_env_files();
    }
}
