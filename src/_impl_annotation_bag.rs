use crate::{AnnotationBag, MiriamQualifier};

impl AnnotationBag {
    /// Create a new empty annotation bag.
    pub fn new() -> AnnotationBag {
        AnnotationBag {
            entries: Default::default(),
        }
    }

    /// True if the bag holds no URIs at all.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|uris| uris.is_empty())
    }

    /// Total number of URIs across all qualifiers.
    pub fn len(&self) -> usize {
        self.entries.values().map(|uris| uris.len()).sum()
    }

    /// Record `uri` under the given qualifier. Duplicates are ignored, the first
    /// insertion fixes the position.
    pub fn insert(&mut self, qualifier: MiriamQualifier, uri: &str) {
        let uris = self.entries.entry(qualifier).or_default();
        if !uris.iter().any(|known| known == uri) {
            uris.push(uri.to_string());
        }
    }

    /// The URIs recorded under one qualifier, in insertion order.
    pub fn uris(&self, qualifier: MiriamQualifier) -> &[String] {
        self.entries.get(&qualifier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over `(qualifier, uris)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MiriamQualifier, &[String])> {
        self.entries
            .iter()
            .map(|(qualifier, uris)| (*qualifier, uris.as_slice()))
    }

    /// Union `other` into this bag, qualifier by qualifier, keeping first-seen
    /// order and dropping duplicate URIs. Merging is commutative on the resulting
    /// *sets* and idempotent.
    pub fn merge_from(&mut self, other: &AnnotationBag) {
        for (qualifier, uris) in other.iter() {
            for uri in uris {
                self.insert(qualifier, uri);
            }
        }
    }
}
