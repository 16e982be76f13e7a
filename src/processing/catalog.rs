//! Role catalog: an ordered, read-only mapping from role name to required skills

use crate::error::{CareerLensError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use strsim::jaro_winkler;

pub type RoleName = String;
pub type SkillName = String;

/// Catalog compiled into the binary, used when no catalog file is configured
const BUILTIN_CATALOG: &str = include_str!("../../data/role_skills.json");

/// Minimum Jaro-Winkler similarity for an unknown role to get a suggestion
const SUGGESTION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub name: RoleName,
    pub skills: Vec<SkillName>,
    /// Keyword index ids of `skills`, same order
    keyword_ids: Vec<usize>,
}

impl Role {
    pub(crate) fn keyword_ids(&self) -> &[usize] {
        &self.keyword_ids
    }
}

/// Immutable role catalog.
///
/// Iteration order is the order roles were supplied in (document order when
/// loaded from a file), which makes prediction tie-breaks reproducible.
/// Every skill of every role is also compiled into a single case-insensitive
/// keyword automaton so a text can be scanned once for the whole catalog.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: Vec<Role>,
    keywords: Vec<String>,
    keyword_index: Option<AhoCorasick>,
}

impl RoleCatalog {
    /// Build a catalog from `(role, skills)` pairs, rejecting malformed entries
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let mut roles = Vec::new();
        let mut seen_roles = HashSet::new();
        let mut keywords: Vec<String> = Vec::new();
        let mut keyword_lookup: HashMap<String, usize> = HashMap::new();

        for (name, skills) in entries {
            let name: String = name.into();
            let skills: Vec<String> = skills.into_iter().map(Into::into).collect();

            if name.trim().is_empty() {
                return Err(CareerLensError::InvalidRoleConfiguration(
                    "role name must not be blank".to_string(),
                ));
            }
            if !seen_roles.insert(name.clone()) {
                return Err(CareerLensError::InvalidRoleConfiguration(format!(
                    "role '{}' is defined more than once",
                    name
                )));
            }
            if skills.is_empty() {
                return Err(CareerLensError::InvalidRoleConfiguration(format!(
                    "role '{}' has no required skills",
                    name
                )));
            }

            let mut seen_skills = HashSet::new();
            let mut keyword_ids = Vec::with_capacity(skills.len());
            for skill in &skills {
                let normalized = skill.to_lowercase();
                if normalized.trim().is_empty() {
                    return Err(CareerLensError::InvalidRoleConfiguration(format!(
                        "role '{}' contains a blank skill",
                        name
                    )));
                }
                if !seen_skills.insert(normalized.clone()) {
                    return Err(CareerLensError::InvalidRoleConfiguration(format!(
                        "role '{}' lists skill '{}' more than once",
                        name, skill
                    )));
                }

                let id = *keyword_lookup.entry(normalized.clone()).or_insert_with(|| {
                    keywords.push(normalized);
                    keywords.len() - 1
                });
                keyword_ids.push(id);
            }

            roles.push(Role {
                name,
                skills,
                keyword_ids,
            });
        }

        let keyword_index = if keywords.is_empty() {
            None
        } else {
            let index = AhoCorasick::builder()
                .match_kind(MatchKind::Standard)
                .build(&keywords)
                .map_err(|e| {
                    CareerLensError::InvalidRoleConfiguration(format!(
                        "failed to build keyword index: {}",
                        e
                    ))
                })?;
            Some(index)
        };

        Ok(Self {
            roles,
            keywords,
            keyword_index,
        })
    }

    /// A catalog with no roles
    pub fn empty() -> Self {
        Self {
            roles: Vec::new(),
            keywords: Vec::new(),
            keyword_index: None,
        }
    }

    /// The catalog shipped with the application
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: CatalogEntries = serde_json::from_str(content).map_err(|e| {
            CareerLensError::Configuration(format!("Failed to parse role catalog: {}", e))
        })?;
        Self::from_entries(entries.0)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let entries: CatalogEntries = toml::from_str(content).map_err(|e| {
            CareerLensError::Configuration(format!("Failed to parse role catalog: {}", e))
        })?;
        Self::from_entries(entries.0)
    }

    /// Load a catalog file, choosing the parser from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()).map(|ext| ext.to_lowercase()) {
            Some(ext) if ext == "json" => Self::from_json(&content),
            Some(ext) if ext == "toml" => Self::from_toml(&content),
            _ => Err(CareerLensError::UnsupportedFormat(format!(
                "Role catalog must be a .json or .toml file: {}",
                path.display()
            ))),
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Exact lookup first, then case-insensitive
    pub fn get(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name).or_else(|| {
            let wanted = name.to_lowercase();
            self.roles.iter().find(|r| r.name.to_lowercase() == wanted)
        })
    }

    /// Like [`get`](Self::get) but fails with a "did you mean" suggestion
    pub fn require(&self, name: &str) -> Result<&Role> {
        self.get(name).ok_or_else(|| CareerLensError::UnknownRole {
            role: name.to_string(),
            suggestion: self.closest_role(name).map(str::to_string),
        })
    }

    fn closest_role(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        let mut best: Option<(&str, f64)> = None;
        for role in &self.roles {
            let similarity = jaro_winkler(&wanted, &role.name.to_lowercase());
            if similarity < SUGGESTION_THRESHOLD {
                continue;
            }
            if best.map_or(true, |(_, top)| similarity > top) {
                best = Some((role.name.as_str(), similarity));
            }
        }
        best.map(|(name, _)| name)
    }

    /// Which catalog keywords occur in an already-lowercased text, by keyword id
    pub(crate) fn keywords_present(&self, normalized_text: &str) -> Vec<bool> {
        let mut present = vec![false; self.keywords.len()];
        if let Some(index) = &self.keyword_index {
            for mat in index.find_overlapping_iter(normalized_text) {
                present[mat.pattern().as_usize()] = true;
            }
        }
        present
    }
}

impl PartialEq for RoleCatalog {
    fn eq(&self, other: &Self) -> bool {
        self.roles == other.roles
    }
}

impl Eq for RoleCatalog {}

/// Raw `(role, skills)` pairs in document order, before validation
struct CatalogEntries(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for CatalogEntries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = CatalogEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of role names to arrays of skill names")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((role, skills)) = map.next_entry::<String, Vec<String>>()? {
                    entries.push((role, skills));
                }
                Ok(CatalogEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl<'de> Deserialize<'de> for RoleCatalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = CatalogEntries::deserialize(deserializer)?;
        RoleCatalog::from_entries(entries.0).map_err(de::Error::custom)
    }
}

impl Serialize for RoleCatalog {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.roles.len()))?;
        for role in &self.roles {
            map.serialize_entry(&role.name, &role.skills)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_preserves_document_order() {
        let catalog = RoleCatalog::from_json(
            r#"{"Zeta": ["x"], "Alpha": ["y"], "Mid": ["z", "x"]}"#,
        )
        .unwrap();

        let names: Vec<&str> = catalog.role_names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(catalog.get("Mid").unwrap().skills, vec!["z", "x"]);
    }

    #[test]
    fn test_toml_catalog() {
        let catalog = RoleCatalog::from_toml(
            "\"Data Scientist\" = [\"python\", \"sql\", \"ml\"]\n\"DevOps Engineer\" = [\"docker\"]\n",
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("Data Scientist").unwrap().skills,
            vec!["python", "sql", "ml"]
        );
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = RoleCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.roles().all(|r| !r.skills.is_empty()));
    }

    #[test]
    fn test_empty_catalog_is_well_formed() {
        let catalog = RoleCatalog::from_json("{}").unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog, RoleCatalog::empty());
    }

    #[test]
    fn test_rejects_role_without_skills() {
        let err = RoleCatalog::from_json(r#"{"Designer": []}"#).unwrap_err();
        assert!(matches!(err, CareerLensError::InvalidRoleConfiguration(_)));
    }

    #[test]
    fn test_rejects_blank_skill_and_duplicates() {
        assert!(matches!(
            RoleCatalog::from_entries(vec![("A", vec!["  "])]),
            Err(CareerLensError::InvalidRoleConfiguration(_))
        ));
        assert!(matches!(
            RoleCatalog::from_entries(vec![("A", vec!["SQL", "sql"])]),
            Err(CareerLensError::InvalidRoleConfiguration(_))
        ));
        assert!(matches!(
            RoleCatalog::from_entries(vec![("A", vec!["x"]), ("A", vec!["y"])]),
            Err(CareerLensError::InvalidRoleConfiguration(_))
        ));
    }

    #[test]
    fn test_malformed_shape_is_configuration_error() {
        let err = RoleCatalog::from_json(r#"["python"]"#).unwrap_err();
        assert!(matches!(err, CareerLensError::Configuration(_)));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = RoleCatalog::from_entries(vec![("Data Scientist", vec!["python"])]).unwrap();
        assert_eq!(catalog.get("data scientist").unwrap().name, "Data Scientist");
        assert!(catalog.get("Chef").is_none());
    }

    #[test]
    fn test_unknown_role_suggests_closest() {
        let catalog = RoleCatalog::from_entries(vec![
            ("Data Scientist", vec!["python"]),
            ("Web Developer", vec!["html"]),
        ])
        .unwrap();

        match catalog.require("Data Scientst") {
            Err(CareerLensError::UnknownRole { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("Data Scientist"));
            }
            other => panic!("expected UnknownRole, got {:?}", other),
        }

        match catalog.require("Astronaut") {
            Err(CareerLensError::UnknownRole { suggestion, .. }) => assert!(suggestion.is_none()),
            other => panic!("expected UnknownRole, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_keywords_are_indexed_once() {
        let catalog = RoleCatalog::from_entries(vec![
            ("A", vec!["Python", "sql"]),
            ("B", vec!["python", "go"]),
        ])
        .unwrap();

        let a = catalog.get("A").unwrap();
        let b = catalog.get("B").unwrap();
        assert_eq!(a.keyword_ids()[0], b.keyword_ids()[0]);

        let present = catalog.keywords_present("i write python and golang");
        assert!(present[a.keyword_ids()[0]]);
        assert!(!present[a.keyword_ids()[1]]);
        assert!(present[b.keyword_ids()[1]]);
    }

    #[test]
    fn test_serializes_in_catalog_order() {
        let catalog = RoleCatalog::from_entries(vec![("B", vec!["x"]), ("A", vec!["y"])]).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"{"B":["x"],"A":["y"]}"#);
    }
}
