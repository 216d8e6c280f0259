/// atext ASCII accepté dans la partie locale (sans quoted-string).
pub(crate) fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
                | '.'
        )
}

/// Push des raisons invalidantes pour la partie locale dans `reasons`.
pub(crate) fn check_local(local: &str, reasons: &mut Vec<String>) {
    if local.is_empty() {
        reasons.push("local part is empty".to_string());
        return;
    }
    if !local.chars().all(is_local_char) {
        reasons.push("local part has invalid chars".to_string());
    }
    if local.starts_with('.') || local.ends_with('.') {
        reasons.push("local part cannot start/end with '.'".to_string());
    }
    if local.contains("..") {
        reasons.push("local part contains '..'".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reasons_for(local: &str) -> Vec<String> {
        let mut reasons = vec![];
        check_local(local, &mut reasons);
        reasons
    }

    #[test]
    fn dots() {
        assert!(!reasons_for(".abc").is_empty());
        assert!(!reasons_for("abc.").is_empty());
        assert!(!reasons_for("a..b").is_empty());
        assert!(reasons_for("a.b").is_empty());
    }

    #[test]
    fn atext_specials_allowed() {
        assert!(reasons_for("o'hara+tag/x=y").is_empty());
        assert!(!reasons_for("a b").is_empty());
        assert!(!reasons_for("a,b").is_empty());
    }
}
