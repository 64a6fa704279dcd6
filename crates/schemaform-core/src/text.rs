//! Title and path helpers shared by every builder.

/// Join a dotted path prefix and a field name.
pub fn data_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Display title for a field: its label, or a title derived from `name`.
///
/// `name` may be a dotted path, in which case each segment separator becomes
/// `": "` (`author.first_name` -> `Author: First Name`).
pub fn field_title(label: Option<&str>, name: &str) -> String {
    match label {
        Some(label) => label.to_string(),
        None => title_case(name).replace('_', " ").replace('.', ": "),
    }
}

/// Title for a nested node derived from its source-type name.
///
/// The `Serializer` / `-like` suffix is stripped and the remainder is split
/// on capital letters: `QuestionChoiceSerializer` -> `Question Choice`.
pub fn type_title(type_name: &str) -> String {
    let trimmed = type_name
        .strip_suffix("Serializer")
        .or_else(|| type_name.strip_suffix("-like"))
        .unwrap_or(type_name);

    let mut words: Vec<String> = Vec::new();
    for ch in trimmed.chars() {
        if ch.is_uppercase() {
            words.push(ch.to_string());
        } else if let Some(word) = words.last_mut() {
            word.push(ch);
        }
    }
    words.join(" ")
}

/// Title-case a string: a letter following another cased letter is
/// lowercased, every other letter is uppercased.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_cased = false;
    for ch in value.chars() {
        if previous_cased {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        previous_cased = ch.is_alphabetic() && (ch.is_lowercase() || ch.is_uppercase());
    }
    out
}
