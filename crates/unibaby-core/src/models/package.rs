use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::utils::format::format_price;

/// A purchasable lesson package as the backend describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub sessions: u32,
}

impl Package {
    /// Price with digit grouping and the tenge sign, e.g. `18 000 ₸`
    pub fn display_price(&self) -> String {
        format!("{} ₸", format_price(self.price))
    }

    pub fn display_sessions(&self) -> String {
        match self.sessions {
            1 => "1 session".to_string(),
            n => format!("{} sessions", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub key: String,
    pub package: Package,
}

/// Package key → package, in the order the backend sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Package> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.package)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn entry_at(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Insert or replace a package. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, package: Package) {
        let key = key.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(existing) => existing.package = package,
            None => self.entries.push(CatalogEntry { key, package }),
        }
    }
}

impl FromIterator<(String, Package)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Package)>>(iter: I) -> Self {
        let mut catalog = Catalog::default();
        for (key, package) in iter {
            catalog.insert(key, package);
        }
        catalog
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of package key to package")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Catalog, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut catalog = Catalog {
                    entries: Vec::with_capacity(map.size_hint().unwrap_or(0)),
                };
                while let Some((key, package)) = map.next_entry::<String, Package>()? {
                    catalog.insert(key, package);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

impl Serialize for Catalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &entry.package)?;
        }
        map.end()
    }
}

/// `GET /api/packages` reply
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackagesResponse {
    #[serde(default)]
    pub packages: Catalog,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGES_JSON: &str = r#"{"packages": {
        "baby_splash": {"name": "Baby Splash (0-2 года)", "price": 15000.0, "currency": "kzt", "sessions": 8},
        "junior_swim": {"name": "Junior Swim (3-5 лет)", "price": 18000.0, "currency": "kzt", "sessions": 8},
        "aqua_kids": {"name": "Aqua Kids (6-12 лет)", "price": 20000.0, "currency": "kzt", "sessions": 8},
        "individual": {"name": "Индивидуальные занятия", "price": 8000.0, "currency": "kzt", "sessions": 1}
    }}"#;

    #[test]
    fn test_parse_packages_keeps_backend_order() {
        let resp: PackagesResponse = serde_json::from_str(PACKAGES_JSON).unwrap();
        let keys: Vec<&str> = resp.packages.keys().collect();
        assert_eq!(keys, vec!["baby_splash", "junior_swim", "aqua_kids", "individual"]);

        let junior = resp.packages.get("junior_swim").unwrap();
        assert_eq!(junior.price, 18000.0);
        assert_eq!(junior.sessions, 8);
        assert_eq!(junior.currency.as_deref(), Some("kzt"));
    }

    #[test]
    fn test_parse_package_without_currency() {
        let json = r#"{"packages": {"trial": {"name": "Trial", "price": 5000, "sessions": 1}}}"#;
        let resp: PackagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.packages.len(), 1);
        assert_eq!(resp.packages.get("trial").unwrap().currency, None);
    }

    #[test]
    fn test_parse_empty_and_missing_packages() {
        let resp: PackagesResponse = serde_json::from_str(r#"{"packages": {}}"#).unwrap();
        assert!(resp.packages.is_empty());

        let resp: PackagesResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.packages.is_empty());
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let mut catalog = Catalog::default();
        let pkg = |price| Package { name: "P".into(), price, currency: None, sessions: 1 };
        catalog.insert("a", pkg(1.0));
        catalog.insert("b", pkg(2.0));
        catalog.insert("a", pkg(3.0));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entry_at(0).unwrap().key, "a");
        assert_eq!(catalog.get("a").unwrap().price, 3.0);
    }

    #[test]
    fn test_display_helpers() {
        let pkg = Package { name: "Junior Swim".into(), price: 18000.0, currency: None, sessions: 8 };
        assert_eq!(pkg.display_price(), "18 000 ₸");
        assert_eq!(pkg.display_sessions(), "8 sessions");

        let single = Package { sessions: 1, ..pkg };
        assert_eq!(single.display_sessions(), "1 session");
    }
}
