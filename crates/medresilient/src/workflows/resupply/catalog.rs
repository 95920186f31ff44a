use std::collections::{BTreeMap, BTreeSet};

/// Symmetric table of devices that may stand in for one another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstituteCatalog {
    substitutes: BTreeMap<String, BTreeSet<String>>,
}

impl SubstituteCatalog {
    /// Substitutions accepted by the clinical supply teams today.
    pub fn standard() -> Self {
        Self::default()
            .with_pair(
                "Single-use electrosurgical scalpel",
                "Reusable electrosurgical scalpel",
            )
            .with_pair("Ventilator", "CPAP")
    }

    /// Register `first` and `second` as substitutes for each other.
    pub fn with_pair(mut self, first: &str, second: &str) -> Self {
        if first == second {
            return self;
        }
        self.substitutes
            .entry(first.to_string())
            .or_default()
            .insert(second.to_string());
        self.substitutes
            .entry(second.to_string())
            .or_default()
            .insert(first.to_string());
        self
    }

    pub fn substitutes_for(&self, device: &str) -> Vec<&str> {
        self.substitutes
            .get(device)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// The requested device followed by its substitutes; empty for a blank request.
    pub fn devices_for<'a>(&'a self, device: &'a str) -> Vec<&'a str> {
        if device.is_empty() {
            return Vec::new();
        }
        let mut devices = vec![device];
        devices.extend(self.substitutes_for(device));
        devices
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_symmetric() {
        let catalog = SubstituteCatalog::standard();
        assert_eq!(catalog.substitutes_for("Ventilator"), vec!["CPAP"]);
        assert_eq!(catalog.substitutes_for("CPAP"), vec!["Ventilator"]);
        assert_eq!(
            catalog.substitutes_for("Reusable electrosurgical scalpel"),
            vec!["Single-use electrosurgical scalpel"]
        );
        assert!(!catalog
            .substitutes_for("Ventilator")
            .contains(&"Reusable electrosurgical scalpel"));
    }

    #[test]
    fn a_device_is_never_its_own_substitute() {
        let catalog = SubstituteCatalog::standard().with_pair("Gauze", "Gauze");
        assert!(!catalog.substitutes_for("CPAP").contains(&"CPAP"));
        assert!(catalog.substitutes_for("Gauze").is_empty());
    }

    #[test]
    fn devices_for_lists_request_first() {
        let catalog = SubstituteCatalog::standard();
        assert_eq!(catalog.devices_for("CPAP"), vec!["CPAP", "Ventilator"]);
        assert_eq!(catalog.devices_for("Infusion pump"), vec!["Infusion pump"]);
        assert!(catalog.devices_for("").is_empty());
    }

    #[test]
    fn devices_for_outlives_a_temporary_request() {
        let catalog = SubstituteCatalog::standard();
        let requested = String::from("Ventilator");
        let devices = catalog.devices_for(&requested);
        assert_eq!(devices, vec!["Ventilator", "CPAP"]);
    }
}
