pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    // Stage names out of French ATS exports carry accents, so lowercase the
    // full Unicode way rather than ASCII-only.
    collapsed.to_lowercase()
}

pub(crate) fn clean_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn normalize_email(value: &str) -> Option<String> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let candidate = cleaned.trim().to_lowercase();
    let (local, domain) = candidate.split_once('@')?;
    if local.is_empty() || !domain.contains('.') {
        return None;
    }
    Some(candidate)
}

#[cfg(test)]
pub(crate) fn normalize_label_for_tests(value: &str) -> String {
    normalize_label(value)
}

#[cfg(test)]
pub(crate) fn normalize_email_for_tests(value: &str) -> Option<String> {
    normalize_email(value)
}
