//! Launcher catalog document (`instances.json`).
//!
//! The catalog is owned by the launcher repository. It is kept as an
//! order-preserving JSON tree and only the target instance's lists are
//! touched, so everything else is written back exactly as it was read.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{BotError, Result};

const WHITELIST_KEY: &str = "whitelist";
const CLAIMED_KEY: &str = "claimed_discord_ids";

/// Whether a Discord user may register more than one nickname
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimPolicy {
    /// Record requester IDs in `claimed_discord_ids` and allow one registration each
    OnePerRequester,
    /// Only nickname uniqueness is checked
    Unrestricted,
}

/// Result of a whitelist request that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nickname was added and the catalog written back
    Applied { nickname: String },
    /// Requester already registered a nickname for this instance
    AlreadyClaimed,
    /// Nickname is already on the whitelist
    AlreadyListed { nickname: String },
}

/// Catalog document as read from the store
#[derive(Debug, Clone)]
pub struct Catalog {
    path: String,
    root: Value,
}

/// Typed view of one instance entry
#[derive(Debug, Clone, Deserialize)]
pub struct Instance {
    pub name: String,

    /// Player nicknames allowed to join
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Discord IDs that already used their registration
    #[serde(default)]
    pub claimed_discord_ids: Vec<String>,
}

impl Catalog {
    /// Parse a catalog fetched from `path`
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        let root = serde_json::from_str(content).map_err(|e| BotError::CatalogParse {
            path: path.to_string(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_string(),
            root,
        })
    }

    /// Serialize with 4-space indentation, matching the launcher repository's layout
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(&self.root, &mut ser)?;
        String::from_utf8(buf).map_err(|e| BotError::Unknown {
            message: e.to_string(),
        })
    }

    /// Find an instance by exact (case-sensitive) name.
    ///
    /// Entries without a string `name` are skipped. `None` also covers a
    /// matching entry whose lists are malformed.
    pub fn find_instance(&self, name: &str) -> Option<Instance> {
        let entry = self.instance_entries().find(|entry| entry_name(entry) == Some(name))?;
        serde_json::from_value(entry.clone()).ok()
    }

    /// Register `nickname` on the instance called `instance_name`.
    ///
    /// Only `Applied` modifies the catalog. The requester check runs before
    /// the nickname check, so a requester who already claimed a slot is
    /// rejected whatever nickname they send.
    pub fn register(
        &mut self,
        instance_name: &str,
        nickname: &str,
        requester_id: &str,
        policy: ClaimPolicy,
    ) -> Result<UpdateOutcome> {
        let path = self.path.clone();
        let entry = self
            .root
            .get_mut("instances")
            .and_then(Value::as_array_mut)
            .and_then(|instances| {
                instances
                    .iter_mut()
                    .find(|entry| entry_name(entry) == Some(instance_name))
            })
            .ok_or_else(|| BotError::InstanceNotFound {
                name: instance_name.to_string(),
            })?;

        let mut instance: Instance =
            serde_json::from_value(entry.clone()).map_err(|e| BotError::CatalogParse {
                path,
                source: e,
            })?;

        if policy == ClaimPolicy::OnePerRequester && instance.has_claimed(requester_id) {
            return Ok(UpdateOutcome::AlreadyClaimed);
        }

        if instance.is_whitelisted(nickname) {
            return Ok(UpdateOutcome::AlreadyListed {
                nickname: nickname.to_string(),
            });
        }

        // `entry_name` matched, so this is an object
        let Some(object) = entry.as_object_mut() else {
            return Err(BotError::InstanceNotFound {
                name: instance_name.to_string(),
            });
        };

        // Existing keys keep their position; missing ones are appended
        instance.whitelist.push(nickname.to_string());
        object.insert(WHITELIST_KEY.to_string(), Value::from(instance.whitelist));
        if policy == ClaimPolicy::OnePerRequester {
            instance.claimed_discord_ids.push(requester_id.to_string());
            object.insert(CLAIMED_KEY.to_string(), Value::from(instance.claimed_discord_ids));
        }

        Ok(UpdateOutcome::Applied {
            nickname: nickname.to_string(),
        })
    }

    fn instance_entries(&self) -> impl Iterator<Item = &Value> {
        self.root
            .get("instances")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
    }
}

impl Instance {
    pub fn is_whitelisted(&self, nickname: &str) -> bool {
        self.whitelist.iter().any(|n| n == nickname)
    }

    pub fn has_claimed(&self, requester_id: &str) -> bool {
        self.claimed_discord_ids.iter().any(|id| id == requester_id)
    }
}

fn entry_name(entry: &Value) -> Option<&str> {
    entry.get("name").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURVIVAL: &str = r#"{"instances":[{"name":"Survival 2026","whitelist":[]}]}"#;

    #[test]
    fn test_find_instance_defaults_missing_lists() {
        let catalog = Catalog::parse(
            "instances.json",
            r#"{"instances":[{"name":"Creative","version":"1.20.1"}]}"#,
        )
        .unwrap();

        let instance = catalog.find_instance("Creative").unwrap();
        assert!(instance.whitelist.is_empty());
        assert!(instance.claimed_discord_ids.is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = Catalog::parse("instances.json", "{not json").unwrap_err();
        assert!(matches!(err, BotError::CatalogParse { ref path, .. } if path == "instances.json"));
    }

    #[test]
    fn test_register_applies_once() {
        let mut catalog = Catalog::parse("instances.json", SURVIVAL).unwrap();

        let outcome = catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::OnePerRequester)
            .unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Applied {
                nickname: "Steve123".to_string()
            }
        );

        let instance = catalog.find_instance("Survival 2026").unwrap();
        assert_eq!(instance.whitelist, vec!["Steve123"]);
        assert_eq!(instance.claimed_discord_ids, vec!["42"]);
    }

    #[test]
    fn test_register_same_nickname_is_already_listed() {
        let mut catalog = Catalog::parse("instances.json", SURVIVAL).unwrap();
        catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::Unrestricted)
            .unwrap();

        let outcome = catalog
            .register("Survival 2026", "Steve123", "43", ClaimPolicy::Unrestricted)
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::AlreadyListed { .. }));
        assert_eq!(
            catalog.find_instance("Survival 2026").unwrap().whitelist,
            vec!["Steve123"]
        );
    }

    #[test]
    fn test_register_second_claim_rejected_before_nickname_check() {
        let mut catalog = Catalog::parse("instances.json", SURVIVAL).unwrap();
        catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::OnePerRequester)
            .unwrap();

        // Same requester, new nickname
        let outcome = catalog
            .register("Survival 2026", "Alex", "42", ClaimPolicy::OnePerRequester)
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::AlreadyClaimed);

        // Same requester, already listed nickname: the claim still wins
        let outcome = catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::OnePerRequester)
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::AlreadyClaimed);

        let instance = catalog.find_instance("Survival 2026").unwrap();
        assert_eq!(instance.whitelist, vec!["Steve123"]);
        assert_eq!(instance.claimed_discord_ids, vec!["42"]);
    }

    #[test]
    fn test_unrestricted_policy_allows_multiple_nicknames() {
        let mut catalog = Catalog::parse("instances.json", SURVIVAL).unwrap();
        catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::Unrestricted)
            .unwrap();
        let outcome = catalog
            .register("Survival 2026", "Alex", "42", ClaimPolicy::Unrestricted)
            .unwrap();

        assert!(matches!(outcome, UpdateOutcome::Applied { .. }));
        let instance = catalog.find_instance("Survival 2026").unwrap();
        assert_eq!(instance.whitelist, vec!["Steve123", "Alex"]);
        assert!(instance.claimed_discord_ids.is_empty());
        assert!(!catalog.to_pretty_json().unwrap().contains("claimed_discord_ids"));
    }

    #[test]
    fn test_register_unknown_instance() {
        let mut catalog = Catalog::parse("instances.json", SURVIVAL).unwrap();
        let err = catalog
            .register("survival 2026", "Steve123", "42", ClaimPolicy::OnePerRequester)
            .unwrap_err();

        assert!(matches!(err, BotError::InstanceNotFound { ref name } if name == "survival 2026"));
        assert!(catalog.find_instance("Survival 2026").unwrap().whitelist.is_empty());
    }

    #[test]
    fn test_missing_instances_list_is_instance_not_found() {
        let mut catalog = Catalog::parse("instances.json", r#"{"version":3}"#).unwrap();
        let err = catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::OnePerRequester)
            .unwrap_err();
        assert!(matches!(err, BotError::InstanceNotFound { .. }));
    }

    #[test]
    fn test_foreign_entries_do_not_block_target() {
        let json = r#"{"instances":[{"title":"Legacy entry"},{"name":"Old","whitelist":[7,null]},"stray",{"name":"Survival 2026","whitelist":[]}]}"#;
        let mut catalog = Catalog::parse("instances.json", json).unwrap();

        let outcome = catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::OnePerRequester)
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::Applied { .. }));

        let out = catalog.to_pretty_json().unwrap();
        assert!(out.contains("\"title\": \"Legacy entry\""));
        assert!(out.contains("7,\n                null"));
        assert!(out.contains("\"stray\""));
    }

    #[test]
    fn test_malformed_target_is_parse_error() {
        let json = r#"{"instances":[{"name":"Survival 2026","whitelist":"everyone"}]}"#;
        let mut catalog = Catalog::parse("instances.json", json).unwrap();
        let err = catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::OnePerRequester)
            .unwrap_err();
        assert!(matches!(err, BotError::CatalogParse { .. }));
    }

    #[test]
    fn test_write_back_keeps_key_order_and_untouched_entries() {
        let json = r#"{"version":3,"instances":[{"name":"Survival 2026","version":"1.20.1","whitelist":[],"claimed_discord_ids":[],"ram":4096},{"name":"Creative","modpack":"vanilla"}],"updated":"2026-10-01"}"#;
        let mut catalog = Catalog::parse("instances.json", json).unwrap();
        catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::OnePerRequester)
            .unwrap();

        let expected = r#"{
    "version": 3,
    "instances": [
        {
            "name": "Survival 2026",
            "version": "1.20.1",
            "whitelist": [
                "Steve123"
            ],
            "claimed_discord_ids": [
                "42"
            ],
            "ram": 4096
        },
        {
            "name": "Creative",
            "modpack": "vanilla"
        }
    ],
    "updated": "2026-10-01"
}"#;
        assert_eq!(catalog.to_pretty_json().unwrap(), expected);
    }

    #[test]
    fn test_missing_lists_are_appended_to_target_only() {
        let json = r#"{"instances":[{"version":"1.20.1","name":"Survival 2026"},{"name":"Creative"}]}"#;
        let mut catalog = Catalog::parse("instances.json", json).unwrap();
        catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::OnePerRequester)
            .unwrap();

        let expected = r#"{
    "instances": [
        {
            "version": "1.20.1",
            "name": "Survival 2026",
            "whitelist": [
                "Steve123"
            ],
            "claimed_discord_ids": [
                "42"
            ]
        },
        {
            "name": "Creative"
        }
    ]
}"#;
        assert_eq!(catalog.to_pretty_json().unwrap(), expected);
    }

    #[test]
    fn test_untouched_catalog_keeps_empty_claims() {
        let json = r#"{"instances":[{"name":"Survival 2026","whitelist":["Steve123"],"claimed_discord_ids":[]}]}"#;
        let mut catalog = Catalog::parse("instances.json", json).unwrap();
        let outcome = catalog
            .register("Survival 2026", "Steve123", "42", ClaimPolicy::Unrestricted)
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::AlreadyListed { .. }));

        let expected = r#"{
    "instances": [
        {
            "name": "Survival 2026",
            "whitelist": [
                "Steve123"
            ],
            "claimed_discord_ids": []
        }
    ]
}"#;
        assert_eq!(catalog.to_pretty_json().unwrap(), expected);
    }
}
