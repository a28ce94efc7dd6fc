//! Name inflection.
//!
//! Turns catalog identifiers (`user_accounts`, `owner_id`) into the public
//! names generators emit (`UserAccount`, `ownerId`).

use convert_case::{Case, Casing};

/// Irregular singular/plural pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("status", "statuses"),
    ("index", "indices"),
];

/// Words that are the same in both forms.
const UNCOUNTABLE: &[&str] = &["series", "species", "news", "information", "equipment", "metadata"];

/// Naming rules for entities, fields, relations and functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inflector;

impl Inflector {
    /// Create an inflector.
    pub fn new() -> Self {
        Self
    }

    /// Table/view entity name: `PascalCase(singular(name))`.
    pub fn entity_name(&self, pg_name: &str) -> String {
        singular(pg_name).to_case(Case::Pascal)
    }

    /// Enum, domain and composite type entity name: `PascalCase(name)`.
    pub fn type_name(&self, pg_name: &str) -> String {
        pg_name.to_case(Case::Pascal)
    }

    /// Field name: `camelCase(column)`.
    pub fn field_name(&self, column: &str) -> String {
        column.to_case(Case::Camel)
    }

    /// Function name: `camelCase(name)`.
    pub fn function_name(&self, pg_name: &str) -> String {
        pg_name.to_case(Case::Camel)
    }

    /// Forward relation name.
    ///
    /// A single `*_id` column drops the suffix (`owner_id` becomes `owner`);
    /// anything else is `<target>By<Columns>`.
    pub fn forward_relation(&self, columns: &[&str], target_pg_name: &str) -> String {
        if let [column] = columns {
            if let Some(stem) = column.strip_suffix("_id").filter(|s| !s.is_empty()) {
                return stem.to_case(Case::Camel);
            }
        }
        format!(
            "{}By{}",
            singular(target_pg_name).to_case(Case::Camel),
            Self::column_suffix(columns)
        )
    }

    /// Reverse relation name: `<sources>By<Columns>`, singular for one-to-one.
    pub fn reverse_relation(&self, source_pg_name: &str, columns: &[&str], unique: bool) -> String {
        let source = if unique {
            singular(source_pg_name)
        } else {
            plural(source_pg_name)
        };
        format!("{}By{}", source.to_case(Case::Camel), Self::column_suffix(columns))
    }

    fn column_suffix(columns: &[&str]) -> String {
        columns
            .iter()
            .map(|c| c.to_case(Case::Pascal))
            .collect::<Vec<_>>()
            .join("And")
    }
}

/// Singular form of an English (snake_case) word; only the last segment changes.
pub fn singular(word: &str) -> String {
    inflect_last_segment(word, singular_word)
}

/// Plural form of an English (snake_case) word; only the last segment changes.
pub fn plural(word: &str) -> String {
    inflect_last_segment(word, |w| plural_word(&singular_word(w)))
}

fn inflect_last_segment(word: &str, f: impl Fn(&str) -> String) -> String {
    match word.rsplit_once('_') {
        Some((head, last)) if !last.is_empty() => format!("{head}_{}", f(last)),
        _ => f(word),
    }
}

fn singular_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(s, p)| *p == lower || *s == lower) {
        return singular.to_string();
    }

    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if lower.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

fn plural_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, _)| *s == lower) {
        return plural.to_string();
    }

    let bytes = lower.as_bytes();
    if lower.ends_with('y') && bytes.len() > 1 && !b"aeiou".contains(&bytes[bytes.len() - 2]) {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular() {
        assert_eq!(singular("accounts"), "account");
        assert_eq!(singular("categories"), "category");
        assert_eq!(singular("addresses"), "address");
        assert_eq!(singular("boxes"), "box");
        assert_eq!(singular("people"), "person");
        assert_eq!(singular("statuses"), "status");
        assert_eq!(singular("status"), "status");
        assert_eq!(singular("order_items"), "order_item");
        assert_eq!(singular("account"), "account");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural("account"), "accounts");
        assert_eq!(plural("accounts"), "accounts");
        assert_eq!(plural("category"), "categories");
        assert_eq!(plural("day"), "days");
        assert_eq!(plural("box"), "boxes");
        assert_eq!(plural("person"), "people");
        assert_eq!(plural("order_item"), "order_items");
    }

    #[test]
    fn test_entity_and_field_names() {
        let inflector = Inflector::new();
        assert_eq!(inflector.entity_name("user_accounts"), "UserAccount");
        assert_eq!(inflector.entity_name("people"), "Person");
        assert_eq!(inflector.type_name("order_status"), "OrderStatus");
        assert_eq!(inflector.field_name("created_at"), "createdAt");
        assert_eq!(inflector.function_name("search_accounts"), "searchAccounts");
    }

    #[test]
    fn test_forward_relation_names() {
        let inflector = Inflector::new();
        assert_eq!(inflector.forward_relation(&["owner_id"], "accounts"), "owner");
        assert_eq!(
            inflector.forward_relation(&["owner"], "accounts"),
            "accountByOwner"
        );
        assert_eq!(
            inflector.forward_relation(&["org_id", "team_id"], "teams"),
            "teamByOrgIdAndTeamId"
        );
    }

    #[test]
    fn test_reverse_relation_names() {
        let inflector = Inflector::new();
        assert_eq!(
            inflector.reverse_relation("orders", &["customer_id"], false),
            "ordersByCustomerId"
        );
        assert_eq!(
            inflector.reverse_relation("profiles", &["account_id"], true),
            "profileByAccountId"
        );
    }
}
