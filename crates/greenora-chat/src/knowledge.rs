//! Read-only plant knowledge base.
//!
//! Entries come from a data asset (the built-in `data/plants.toml` or an
//! external TOML/JSON file) and are validated once at construction. Lookup
//! is plain substring containment in declaration order.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::ChatError;
use crate::types::PlantFact;

const BUILTIN_ASSET: &str = include_str!("../data/plants.toml");

/// On-disk shape: a list of `[[plant]]` tables.
#[derive(Debug, Deserialize)]
struct KnowledgeAsset {
    #[serde(default)]
    plant: Vec<PlantFact>,
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    plants: Vec<PlantFact>,
}

impl KnowledgeBase {
    /// Build from already-parsed entries, validating ids.
    ///
    /// Ids must be non-empty, trimmed, lowercase and unique, and there must
    /// be at least one entry.
    pub fn from_plants(plants: Vec<PlantFact>) -> Result<Self, ChatError> {
        if plants.is_empty() {
            return Err(ChatError::InvalidKnowledge(
                "knowledge asset contains no plants".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(plants.len());
        for plant in &plants {
            if plant.id.trim().is_empty() {
                return Err(ChatError::InvalidKnowledge(format!(
                    "plant '{}' has an empty id",
                    plant.display_name
                )));
            }
            if plant.id != plant.id.trim() || plant.id != plant.id.to_lowercase() {
                return Err(ChatError::InvalidKnowledge(format!(
                    "plant id '{}' must be trimmed lowercase",
                    plant.id
                )));
            }
            if !seen.insert(plant.id.as_str()) {
                return Err(ChatError::InvalidKnowledge(format!(
                    "duplicate plant id '{}'",
                    plant.id
                )));
            }
        }

        Ok(Self { plants })
    }

    /// The knowledge asset compiled into the binary.
    pub fn builtin() -> Result<Self, ChatError> {
        Self::from_toml_str(BUILTIN_ASSET)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ChatError> {
        let asset: KnowledgeAsset = toml::from_str(content)?;
        Self::from_plants(asset.plant)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ChatError> {
        let asset: KnowledgeAsset = serde_json::from_str(content)?;
        Self::from_plants(asset.plant)
    }

    /// Load an external asset. `.json` files are read as JSON, anything else
    /// as TOML.
    pub fn load(path: &Path) -> Result<Self, ChatError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let kb = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        info!(path = %path.display(), plants = kb.len(), "Knowledge asset loaded");
        Ok(kb)
    }

    /// Load `path` when given, otherwise the built-in asset.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, ChatError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// First plant whose id occurs in `utterance_lower`, in declaration order.
    ///
    /// The caller lowercases the utterance.
    pub fn lookup(&self, utterance_lower: &str) -> Option<&PlantFact> {
        self.plants
            .iter()
            .find(|p| utterance_lower.contains(p.id.as_str()))
    }

    /// Exact id lookup.
    pub fn get(&self, id: &str) -> Option<&PlantFact> {
        self.plants.iter().find(|p| p.id == id)
    }

    pub fn plants(&self) -> &[PlantFact] {
        &self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fact(id: &str) -> PlantFact {
        PlantFact {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            benefits: vec!["Benefit".to_string()],
            growing_guide: "Guide".to_string(),
            harvest_window: "Soon".to_string(),
            export_markets: vec!["USA".to_string()],
            price_range: "₹1 per plant".to_string(),
        }
    }

    // ---- Built-in asset ----

    #[test]
    fn test_builtin_has_original_plants_in_order() {
        let kb = KnowledgeBase::builtin().unwrap();
        let ids: Vec<&str> = kb.plants().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["tulsi", "aloe vera", "turmeric"]);
    }

    #[test]
    fn test_builtin_tulsi_record() {
        let kb = KnowledgeBase::builtin().unwrap();
        let tulsi = kb.get("tulsi").unwrap();
        assert_eq!(tulsi.display_name, "Holy Basil (Tulsi)");
        assert_eq!(tulsi.benefits.len(), 4);
        assert_eq!(tulsi.price_range, "₹150-200 per plant");
        assert_eq!(tulsi.export_markets[3], "Japan");
        assert_eq!(tulsi.harvest_window, "90-100 days after planting");
    }

    // ---- Lookup ----

    #[test]
    fn test_lookup_substring() {
        let kb = KnowledgeBase::builtin().unwrap();
        let hit = kb.lookup("how to grow aloe vera?").unwrap();
        assert_eq!(hit.id, "aloe vera");
    }

    #[test]
    fn test_lookup_requires_lowercased_input() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert!(kb.lookup("Tell me about Tulsi").is_none());
        assert!(kb.lookup("tell me about tulsi").is_some());
    }

    #[test]
    fn test_lookup_miss() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert!(kb.lookup("tell me about neem").is_none());
        assert!(kb.lookup("").is_none());
    }

    #[test]
    fn test_lookup_ties_follow_declaration_order() {
        let kb = KnowledgeBase::builtin().unwrap();
        // Mentions turmeric first, but tulsi is declared first.
        let hit = kb.lookup("turmeric or tulsi?").unwrap();
        assert_eq!(hit.id, "tulsi");
    }

    #[test]
    fn test_lookup_no_fuzzy_matching() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert!(kb.lookup("aloevera").is_none());
        assert!(kb.lookup("tulsis").is_some()); // containment, not word match
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let kb = KnowledgeBase::builtin().unwrap();
        let first = kb.lookup("turmeric price").cloned();
        let second = kb.lookup("turmeric price").cloned();
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    // ---- Validation ----

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = KnowledgeBase::from_plants(vec![fact("neem"), fact("neem")]);
        assert!(matches!(result, Err(ChatError::InvalidKnowledge(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_rejects_uppercase_id() {
        let result = KnowledgeBase::from_plants(vec![fact("Neem")]);
        assert!(matches!(result, Err(ChatError::InvalidKnowledge(_))));
    }

    #[test]
    fn test_rejects_untrimmed_id() {
        let result = KnowledgeBase::from_plants(vec![fact(" neem")]);
        assert!(matches!(result, Err(ChatError::InvalidKnowledge(_))));
    }

    #[test]
    fn test_rejects_empty_id() {
        let result = KnowledgeBase::from_plants(vec![fact("")]);
        assert!(matches!(result, Err(ChatError::InvalidKnowledge(_))));
    }

    #[test]
    fn test_rejects_empty_asset() {
        let result = KnowledgeBase::from_toml_str("");
        assert!(matches!(result, Err(ChatError::InvalidKnowledge(_))));
    }

    // ---- External assets ----

    #[test]
    fn test_load_json_asset() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let json = serde_json::json!({ "plant": [fact("neem"), fact("ashwagandha")] });
        file.write_all(json.to_string().as_bytes()).unwrap();

        let kb = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.lookup("neem oil").unwrap().id, "neem");
    }

    #[test]
    fn test_load_toml_asset() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let asset = r#"
[[plant]]
id = "neem"
display_name = "Neem"
benefits = ["Antibacterial"]
growing_guide = "Hardy, drought tolerant"
harvest_window = "3-5 years"
export_markets = ["Europe"]
price_range = "₹90-120 per plant"
"#;
        file.write_all(asset.as_bytes()).unwrap();

        let kb = KnowledgeBase::load(file.path()).unwrap();
        let neem = kb.get("neem").unwrap();
        assert_eq!(neem.display_name, "Neem");
        assert_eq!(neem.price_range, "₹90-120 per plant");
    }

    #[test]
    fn test_load_missing_file() {
        let result = KnowledgeBase::load(Path::new("/does/not/exist/plants.toml"));
        assert!(matches!(result, Err(ChatError::KnowledgeLoad(_))));
    }

    #[test]
    fn test_load_malformed_asset() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"[[plant]]\nid = ").unwrap();
        let result = KnowledgeBase::load(file.path());
        assert!(matches!(result, Err(ChatError::KnowledgeLoad(_))));
    }

    #[test]
    fn test_load_or_builtin_defaults() {
        let kb = KnowledgeBase::load_or_builtin(None).unwrap();
        assert_eq!(kb.len(), 3);
    }
}
