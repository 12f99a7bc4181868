use std::collections::{BTreeMap, BTreeSet};

/// A single `<type>; <kind>;` line from a catalog file, after namespace
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub type_name: String,
    pub kind_name: String,
}

/// One side of the diff: every type in a catalog file and the kind it was
/// classified under. Immutable once built.
#[derive(Debug, Clone)]
pub struct Snapshot {
    type_to_kind: BTreeMap<String, String>,
    kind_to_types: BTreeMap<String, BTreeSet<String>>,
}

impl Snapshot {
    /// Build a snapshot from parsed records. When a type appears twice the
    /// later record wins, and the kind index is derived afterwards so both
    /// maps always agree.
    pub fn from_records(records: Vec<SymbolRecord>) -> Self {
        let mut type_to_kind = BTreeMap::new();
        for record in records {
            type_to_kind.insert(record.type_name, record.kind_name);
        }

        let mut kind_to_types: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (type_name, kind_name) in &type_to_kind {
            kind_to_types
                .entry(kind_name.clone())
                .or_default()
                .insert(type_name.clone());
        }

        Snapshot {
            type_to_kind,
            kind_to_types,
        }
    }

    /// The kind a type is classified under, or None when the snapshot does
    /// not contain the type.
    pub fn kind_of(&self, type_name: &str) -> Option<&str> {
        self.type_to_kind.get(type_name).map(String::as_str)
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.type_to_kind.contains_key(type_name)
    }

    pub fn contains_kind(&self, kind_name: &str) -> bool {
        self.kind_to_types.contains_key(kind_name)
    }

    /// All (type, kind) pairs in lexicographic type order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.type_to_kind
            .iter()
            .map(|(t, k)| (t.as_str(), k.as_str()))
    }

    /// All kinds in lexicographic order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kind_to_types.keys().map(String::as_str)
    }

    /// How many types the snapshot classifies under a kind.
    pub fn kind_population(&self, kind_name: &str) -> usize {
        self.kind_to_types.get(kind_name).map_or(0, BTreeSet::len)
    }
}
