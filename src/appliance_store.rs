use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub const STORAGE_KEY: &str = "kosher_recipe_appliances";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Appliance {
    pub id: String,
    pub name: String,
    pub category: String,
    pub owned: bool,
}

// (id, name, category, owned). Ids must stay stable across releases so the
// merge-on-load upgrade keeps working against older persisted collections.
const DEFAULT_APPLIANCES: &[(&str, &str, &str, bool)] = &[
    // Cooking surfaces
    ("stovetop", "Stovetop / Gas or Electric Range", "Cooking Surfaces", true),
    ("oven", "Oven", "Cooking Surfaces", true),
    ("toaster-oven", "Toaster Oven", "Cooking Surfaces", false),
    ("induction-cooktop", "Induction Cooktop", "Cooking Surfaces", false),
    // Small appliances
    ("microwave", "Microwave", "Small Appliances", true),
    ("air-fryer", "Air Fryer", "Small Appliances", false),
    ("instant-pot", "Instant Pot / Pressure Cooker", "Small Appliances", false),
    ("slow-cooker", "Slow Cooker (Crock Pot)", "Small Appliances", false),
    ("rice-cooker", "Rice Cooker", "Small Appliances", false),
    ("electric-kettle", "Electric Kettle", "Small Appliances", false),
    // Prep tools
    ("blender", "Blender", "Prep Tools", false),
    ("immersion-blender", "Immersion / Hand Blender", "Prep Tools", false),
    ("food-processor", "Food Processor", "Prep Tools", false),
    ("stand-mixer", "Stand Mixer", "Prep Tools", false),
    ("hand-mixer", "Hand Mixer", "Prep Tools", false),
    // Specialty
    ("sous-vide", "Sous Vide Circulator", "Specialty", false),
    ("cast-iron", "Cast Iron Skillet", "Specialty", false),
    ("dutch-oven", "Dutch Oven", "Specialty", false),
    ("wok", "Wok", "Specialty", false),
    ("grill", "Outdoor Grill / BBQ", "Specialty", false),
    ("panini-press", "Panini Press / Sandwich Maker", "Specialty", false),
    ("waffle-iron", "Waffle Iron", "Specialty", false),
];

pub fn default_appliances() -> Vec<Appliance> {
    DEFAULT_APPLIANCES
        .iter()
        .map(|&(id, name, category, owned)| Appliance {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            owned,
        })
        .collect()
}

/// Scoped string storage, standing in for the browser's local storage.
/// Absence of a key and unreadable data are both treated as "no data".
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// One file per key inside a data directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.dir.join(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        // Write a sibling temp file and rename over the target, so a crash
        // mid-write never leaves a half-written collection behind.
        if fs::create_dir_all(&self.dir).is_err() {
            return;
        }
        let tmp = self.dir.join(format!("{}.tmp", key));
        if fs::write(&tmp, value).is_err() {
            return;
        }
        let _ = fs::rename(&tmp, self.dir.join(key));
    }
}

/// No persistent backing (server or non-interactive context): reads see no
/// data and writes are dropped.
#[derive(Debug, Default)]
pub struct NullStore;

impl KeyValueStore for NullStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) {}
}

#[derive(Debug)]
pub struct ApplianceStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> ApplianceStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Persisted collection, or the default seed set when nothing readable is
    /// stored. Never fails: any read or parse problem falls back to defaults.
    pub fn load(&self) -> Vec<Appliance> {
        let stored = match self.backend.get(STORAGE_KEY) {
            Some(raw) => raw,
            None => return default_appliances(),
        };
        let mut appliances: Vec<Appliance> = match serde_json::from_str(&stored) {
            Ok(list) => list,
            Err(_) => return default_appliances(),
        };

        // Merge: defaults introduced after the collection was persisted are
        // appended, without touching records the user already has.
        for default in default_appliances() {
            if !appliances.iter().any(|a| a.id == default.id) {
                appliances.push(default);
            }
        }
        appliances
    }

    /// Overwrites the whole persisted collection in one write.
    pub fn save(&mut self, appliances: &[Appliance]) {
        if let Ok(raw) = serde_json::to_string(appliances) {
            self.backend.set(STORAGE_KEY, &raw);
        }
    }
}

pub fn toggle(appliances: &mut [Appliance], id: &str) {
    if let Some(appliance) = appliances.iter_mut().find(|a| a.id == id) {
        appliance.owned = !appliance.owned;
    }
}

/// Adds a user-defined appliance, owned by default. Returns the new record's
/// id, or None when the name is blank.
pub fn add_custom(appliances: &mut Vec<Appliance>, name: &str, category: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    let id = fresh_custom_id(appliances);
    appliances.push(Appliance {
        id: id.clone(),
        name: trimmed.to_string(),
        category: category.to_string(),
        owned: true,
    });
    Some(id)
}

// custom-<unix millis>, suffixed until unique within the collection.
fn fresh_custom_id(appliances: &[Appliance]) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let base = format!("custom-{}", millis);
    if !appliances.iter().any(|a| a.id == base) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !appliances.iter().any(|a| a.id == candidate) {
            return candidate;
        }
        n += 1;
    }
}

pub fn remove(appliances: &mut Vec<Appliance>, id: &str) {
    appliances.retain(|a| a.id != id);
}

/// Names of owned appliances, preserving collection order.
pub fn owned_names(appliances: &[Appliance]) -> Vec<String> {
    appliances
        .iter()
        .filter(|a| a.owned)
        .map(|a| a.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_defaults_when_nothing_stored() {
        let store = ApplianceStore::new(MemoryStore::new());
        assert_eq!(store.load(), default_appliances());
    }

    #[test]
    fn load_returns_defaults_on_corrupt_data() {
        let mut backend = MemoryStore::new();
        backend.set(STORAGE_KEY, "{not json");
        let store = ApplianceStore::new(backend);
        assert_eq!(store.load(), default_appliances());
    }

    #[test]
    fn load_twice_without_save_is_identical() {
        let mut store = ApplianceStore::new(MemoryStore::new());
        let mut appliances = store.load();
        toggle(&mut appliances, "blender");
        store.save(&appliances);

        assert_eq!(store.load(), store.load());
        assert_eq!(store.load(), appliances);
    }

    #[test]
    fn merge_appends_new_defaults_without_touching_user_edits() {
        // Persist a collection that predates the "waffle-iron" default and
        // carries a user edit plus a custom record.
        let mut appliances = default_appliances();
        toggle(&mut appliances, "oven"); // owned: true -> false
        add_custom(&mut appliances, "Ninja Foodi", "Other");
        appliances.retain(|a| a.id != "waffle-iron");

        let mut store = ApplianceStore::new(MemoryStore::new());
        store.save(&appliances);
        let loaded = store.load();

        assert_eq!(loaded.len(), appliances.len() + 1);
        let appended = loaded.last().unwrap();
        assert_eq!(appended.id, "waffle-iron");
        // Everything persisted comes back unchanged, in order.
        assert_eq!(&loaded[..appliances.len()], &appliances[..]);
        assert!(!loaded.iter().find(|a| a.id == "oven").unwrap().owned);
    }

    #[test]
    fn toggle_flips_exactly_one_and_ignores_unknown_ids() {
        let mut appliances = default_appliances();
        let before = appliances.clone();

        toggle(&mut appliances, "wok");
        assert!(appliances.iter().find(|a| a.id == "wok").unwrap().owned);
        assert_eq!(
            appliances.iter().filter(|a| a.owned).count(),
            before.iter().filter(|a| a.owned).count() + 1
        );

        toggle(&mut appliances, "no-such-id");
        assert_eq!(appliances.len(), before.len());
    }

    #[test]
    fn add_custom_rejects_blank_names() {
        let mut appliances = default_appliances();
        let len = appliances.len();
        assert!(add_custom(&mut appliances, "", "Other").is_none());
        assert!(add_custom(&mut appliances, "   ", "Other").is_none());
        assert_eq!(appliances.len(), len);
    }

    #[test]
    fn add_custom_assigns_unique_ids_and_owns_by_default() {
        let mut appliances = default_appliances();
        let first = add_custom(&mut appliances, "Ninja Foodi", "Other").unwrap();
        let second = add_custom(&mut appliances, " George Foreman Grill ", "Specialty").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("custom-"));

        let added = appliances.iter().find(|a| a.id == second).unwrap();
        assert_eq!(added.name, "George Foreman Grill");
        assert!(added.owned);

        let mut ids: Vec<&str> = appliances.iter().map(|a| a.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), appliances.len());
    }

    #[test]
    fn remove_deletes_by_id() {
        let mut appliances = default_appliances();
        let id = add_custom(&mut appliances, "Ninja Foodi", "Other").unwrap();
        remove(&mut appliances, &id);
        assert!(!appliances.iter().any(|a| a.id == id));
        // The contract allows removing defaults too.
        remove(&mut appliances, "wok");
        assert!(!appliances.iter().any(|a| a.id == "wok"));
    }

    #[test]
    fn owned_names_projects_in_collection_order() {
        let appliances = default_appliances();
        let names = owned_names(&appliances);
        assert_eq!(
            names,
            vec![
                "Stovetop / Gas or Electric Range".to_string(),
                "Oven".to_string(),
                "Microwave".to_string(),
            ]
        );
    }

    #[test]
    fn file_store_round_trips_and_survives_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ApplianceStore::new(FileStore::new(dir.path()));

        let mut appliances = store.load();
        toggle(&mut appliances, "air-fryer");
        store.save(&appliances);
        assert_eq!(store.load(), appliances);

        fs::write(dir.path().join(STORAGE_KEY), "garbage").unwrap();
        assert_eq!(store.load(), default_appliances());
    }

    #[test]
    fn null_store_reads_nothing_and_drops_writes() {
        let mut store = ApplianceStore::new(NullStore);
        let appliances = store.load();
        store.save(&appliances);
        assert_eq!(store.load(), default_appliances());
    }
}
