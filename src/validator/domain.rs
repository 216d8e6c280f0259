/// Valide le domaine (sous-ensemble pratique, pas de labels IDN).
/// Push des raisons invalidantes dans `reasons`.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) {
    if domain.is_empty() {
        reasons.push("domain is empty".to_string());
        return;
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        reasons.push("domain has invalid chars".to_string());
    }

    // au moins un point
    if !domain.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }
    if domain.starts_with('-') {
        reasons.push("domain cannot start with '-'".to_string());
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        reasons.push("domain cannot start/end with '.'".to_string());
    }
    if domain.contains("..") {
        reasons.push("empty domain label".to_string());
    }
}
