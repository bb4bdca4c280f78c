/// Variable catalog loading: a JSON array of `{ "name", "description" }`
/// objects, with a built-in catalog as fallback.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use template_pad_core::catalog::is_identifier;
use template_pad_core::{Candidate, VariableCatalog};

/// Variables available when no catalog file is configured.
pub fn builtin_catalog() -> VariableCatalog {
    [
        ("clientName", "Client's full name"),
        ("clientBonus", "Bonus granted to the client"),
        ("clientEmail", "Client's e-mail address"),
        ("companyName", "Sender company name"),
        ("paymentAmount", "Amount of the pending payment"),
        ("paymentDate", "Due date of the pending payment"),
        ("invitationLink", "Personal signup link"),
        ("pointsBalance", "Current loyalty points balance"),
    ]
    .into_iter()
    .map(|(name, description)| Candidate::new(name, description))
    .collect::<Vec<_>>()
    .into()
}

/// Parses catalog JSON. Entries whose name is not a valid identifier, and
/// repeated names after the first, are skipped with a warning.
pub fn parse_catalog(json: &str) -> Result<VariableCatalog> {
    let entries: Vec<Candidate> =
        serde_json::from_str(json).context("Catalog must be a JSON array of {name, description}")?;

    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(entries.len());
    for entry in entries {
        if !is_identifier(&entry.name) {
            tracing::warn!("Skipping catalog entry with invalid name '{}'", entry.name);
            continue;
        }
        if !seen.insert(entry.name.clone()) {
            tracing::warn!("Skipping duplicate catalog entry '{}'", entry.name);
            continue;
        }
        candidates.push(entry);
    }
    Ok(VariableCatalog::new(candidates))
}

/// Reads and parses the catalog at `path`.
pub fn read_catalog(path: &Path) -> Result<VariableCatalog> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    parse_catalog(&contents).with_context(|| format!("Failed to parse catalog: {}", path.display()))
}

/// Loads the catalog at `path`, or the built-in one when `path` is `None`,
/// unreadable, or yields no usable entries.
pub fn load_catalog(path: Option<&Path>) -> VariableCatalog {
    let Some(path) = path else {
        return builtin_catalog();
    };
    match read_catalog(path) {
        Ok(catalog) if !catalog.is_empty() => {
            tracing::info!("Loaded {} variables from {}", catalog.len(), path.display());
            catalog
        }
        Ok(_) => {
            tracing::warn!("Catalog {} has no usable entries, using built-in", path.display());
            builtin_catalog()
        }
        Err(e) => {
            tracing::warn!("{e:#}; using built-in catalog");
            builtin_catalog()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), 8);
        assert!(catalog.candidates().iter().all(|c| is_identifier(&c.name)));
        assert_eq!(catalog.candidates()[0].name, "clientName");
    }

    #[test]
    fn test_parse_skips_invalid_and_duplicates() {
        let json = r#"[
            {"name": "orderId", "description": "Order number"},
            {"name": "9lives"},
            {"name": "has space", "description": "x"},
            {"name": "orderId", "description": "again"},
            {"name": "_private"}
        ]"#;
        let catalog = parse_catalog(json).unwrap();
        let names: Vec<&str> = catalog.candidates().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["orderId", "_private"]);
        assert_eq!(catalog.get("orderId").unwrap().description, "Order number");
        assert_eq!(catalog.get("_private").unwrap().description, "");
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_catalog(r#"{"name": "x"}"#).is_err());
    }

    #[test]
    fn test_load_without_path_uses_builtin() {
        assert_eq!(load_catalog(None), builtin_catalog());
    }
}
