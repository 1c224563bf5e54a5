//! Name normalization utilities
//!
//! Pure string transforms shared by every inference component: rule-based
//! singularization/pluralization and case conversion. Pluralization consults
//! a fixed irregular-word table before the suffix rules apply; there is no
//! dictionary service behind this.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Irregular singular/plural pairs. Lookups are case-insensitive and always
/// return lowercase.
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("datum", "data"),
    ("medium", "media"),
    ("analysis", "analyses"),
    ("criterion", "criteria"),
];

static SINGULAR_TO_PLURAL: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| IRREGULARS.iter().copied().collect());

static PLURAL_TO_SINGULAR: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| IRREGULARS.iter().map(|&(s, p)| (p, s)).collect());

/// All normalized forms of a word, computed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameForms {
    pub singular: String,
    pub plural: String,
    pub snake: String,
    pub pascal: String,
    pub camel: String,
}

/// Compute every normalized form of a word.
pub fn forms(word: &str) -> NameForms {
    NameForms {
        singular: singularize(word),
        plural: pluralize(word),
        snake: to_snake_case(word),
        pascal: to_pascal_case(word),
        camel: to_camel_case(word),
    }
}

/// Convert a word to its singular form.
///
/// Irregular plurals are resolved through the lookup table first; otherwise
/// suffix rules apply in priority order (ies, sses/shes/ches/xes, trailing s).
/// The result is always lowercase and the function is idempotent.
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some(singular) = PLURAL_TO_SINGULAR.get(lower.as_str()) {
        return (*singular).to_string();
    }
    if SINGULAR_TO_PLURAL.contains_key(lower.as_str()) {
        return lower;
    }
    if let Some(stem) = lower.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["sses", "shes", "ches", "xes"] {
        if lower.ends_with(suffix) {
            return lower[..lower.len() - 2].to_string();
        }
    }
    if lower.ends_with('s') && !lower.ends_with("ss") {
        return lower[..lower.len() - 1].to_string();
    }
    lower
}

/// Convert a word to its plural form.
///
/// Mirrors [`singularize`]: irregular table first, then consonant+y -> ies,
/// s/sh/ch/x -> +es, otherwise +s. Words that are already plural under the
/// suffix rules are returned unchanged. Always lowercase.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some(plural) = SINGULAR_TO_PLURAL.get(lower.as_str()) {
        return (*plural).to_string();
    }
    if PLURAL_TO_SINGULAR.contains_key(lower.as_str()) {
        return lower;
    }
    // Already-plural input round-trips through its singular form.
    let singular = singularize(&lower);
    if singular != lower && apply_plural_rules(&singular) == lower {
        return lower;
    }
    apply_plural_rules(&lower)
}

fn apply_plural_rules(lower: &str) -> String {
    if let Some(stem) = lower.strip_suffix('y') {
        if stem
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphabetic() && !"aeiou".contains(c))
        {
            return format!("{stem}ies");
        }
    }
    if ["s", "sh", "ch", "x"].iter().any(|s| lower.ends_with(s)) {
        return format!("{lower}es");
    }
    format!("{lower}s")
}

/// Convert a name to lower_snake_case, inserting `_` before internal capitals.
pub fn to_snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_separator = true;
    for ch in input.chars() {
        if ch == '-' || ch == ' ' || ch == '_' {
            if !prev_separator {
                out.push('_');
            }
            prev_separator = true;
            continue;
        }
        if ch.is_uppercase() {
            if !prev_separator {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
        prev_separator = false;
    }
    out
}

/// Convert a name to PascalCase, splitting on `_`, `-`, and spaces.
pub fn to_pascal_case(input: &str) -> String {
    input
        .split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a name to camelCase (PascalCase with a lowercase first letter).
pub fn to_camel_case(input: &str) -> String {
    let pascal = to_pascal_case(input);
    let mut chars = pascal.chars();
    match chars.next() {
        None => pascal,
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irregular_plurals() {
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("child"), "children");
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("criteria"), "criterion");
        assert_eq!(singularize("Media"), "medium");
    }

    #[test]
    fn test_regular_singularize() {
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("dishes"), "dish");
        assert_eq!(singularize("churches"), "church");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("posts"), "post");
        assert_eq!(singularize("address"), "address");
    }

    #[test]
    fn test_regular_pluralize() {
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("dish"), "dishes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("post"), "posts");
    }

    #[test]
    fn test_pluralize_keeps_already_plural_words() {
        assert_eq!(pluralize("categories"), "categories");
        assert_eq!(pluralize("posts"), "posts");
        assert_eq!(pluralize("classes"), "classes");
        assert_eq!(pluralize("boxes"), "boxes");
        assert_eq!(pluralize("people"), "people");
    }

    #[test]
    fn test_singularize_is_idempotent() {
        for word in ["posts", "categories", "people", "addresses", "data"] {
            let once = singularize(word);
            assert_eq!(singularize(&once), once, "not idempotent for {word}");
        }
    }

    #[test]
    fn test_round_trip() {
        for word in ["post", "category", "person", "box", "dish"] {
            let plural = pluralize(word);
            assert_eq!(singularize(&plural), singularize(word));
        }
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("UserProfile"), "user_profile");
        assert_eq!(to_snake_case("blogPost"), "blog_post");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("kebab-case"), "kebab_case");
        assert_eq!(to_snake_case("With Space"), "with_space");
    }

    #[test]
    fn test_pascal_and_camel() {
        assert_eq!(to_pascal_case("user_profile"), "UserProfile");
        assert_eq!(to_pascal_case("blog-post"), "BlogPost");
        assert_eq!(to_camel_case("user_profile"), "userProfile");
        assert_eq!(to_camel_case("id"), "id");
    }

    #[test]
    fn test_forms() {
        let f = forms("categories");
        assert_eq!(f.singular, "category");
        assert_eq!(f.plural, "categories");
        assert_eq!(f.snake, "categories");
        assert_eq!(f.pascal, "Categories");
        assert_eq!(f.camel, "categories");
    }
}
