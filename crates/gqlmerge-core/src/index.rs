use indexmap::IndexMap;

use crate::types::{Definition, DefinitionKey};

/// Whether a contribution declared its definition or extended it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Definition,
    Extension,
}

/// One document's contribution to a key.
///
/// For extensions `definition` holds the unwrapped body.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    /// Position of the contributing document in the input list.
    pub source: usize,
    pub origin: Origin,
    pub definition: Definition,
}

impl Contribution {
    pub fn is_extension(&self) -> bool {
        self.origin == Origin::Extension
    }
}

/// Groups definitions from many documents by [`DefinitionKey`].
///
/// Keys keep first-seen order; contributions within a key keep arrival
/// order across documents and within each document. The index does no
/// validation.
#[derive(Debug, Clone, Default)]
pub struct DefinitionIndex {
    sources: Vec<String>,
    groups: IndexMap<DefinitionKey, Vec<Contribution>>,
}

impl DefinitionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from `(source name, definitions)` pairs in order.
    pub fn from_documents<S, I>(documents: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<Definition>)>,
    {
        let mut index = Self::new();
        for (source, definitions) in documents {
            index.add_document(source, definitions);
        }
        index
    }

    /// Appends one document's definitions and returns its source id.
    pub fn add_document(&mut self, source: impl Into<String>, definitions: Vec<Definition>) -> usize {
        let source_id = self.sources.len();
        self.sources.push(source.into());

        for definition in definitions {
            let key = definition.key();
            let (origin, definition) = match definition {
                Definition::Extension(inner) => (Origin::Extension, *inner),
                other => (Origin::Definition, other),
            };
            self.groups.entry(key).or_default().push(Contribution {
                source: source_id,
                origin,
                definition,
            });
        }

        tracing::trace!(
            source = %self.sources[source_id],
            keys = self.groups.len(),
            "indexed document"
        );
        source_id
    }

    /// Returns every source name in input order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the name of the source with the given id.
    pub fn source_name(&self, source: usize) -> &str {
        &self.sources[source]
    }

    /// Returns the contributions recorded for `key`.
    pub fn get(&self, key: &DefinitionKey) -> Option<&[Contribution]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Iterates groups in first-seen key order.
    pub fn groups(&self) -> impl Iterator<Item = (&DefinitionKey, &[Contribution])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DefinitionKind, Name, ObjectType, ScalarType};

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn object(n: &str) -> Definition {
        Definition::Object(ObjectType::new(name(n)))
    }

    fn scalar(n: &str) -> Definition {
        Definition::Scalar(ScalarType {
            description: None,
            name: name(n),
            directives: Vec::new(),
        })
    }

    fn object_key(n: &str) -> DefinitionKey {
        DefinitionKey::Type {
            kind: DefinitionKind::Object,
            name: name(n),
        }
    }

    #[test]
    fn groups_by_key_in_first_seen_order() {
        let index = DefinitionIndex::from_documents([
            ("a.graphql", vec![object("User"), scalar("Date")]),
            ("b.graphql", vec![object("Post"), object("User")]),
        ]);
        let keys: Vec<String> = index.groups().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["type User", "scalar Date", "type Post"]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn contributions_keep_arrival_order() {
        let index = DefinitionIndex::from_documents([
            ("a.graphql", vec![object("User")]),
            ("b.graphql", vec![object("User"), object("User")]),
        ]);
        let sources: Vec<usize> = index
            .get(&object_key("User"))
            .unwrap()
            .iter()
            .map(|c| c.source)
            .collect();
        assert_eq!(sources, vec![0, 1, 1]);
        assert_eq!(index.source_name(1), "b.graphql");
    }

    #[test]
    fn extensions_are_unwrapped_and_flagged() {
        let ext = Definition::Extension(Box::new(object("User")));
        let index = DefinitionIndex::from_documents([("ext.graphql", vec![ext])]);
        let group = index.get(&object_key("User")).unwrap();
        assert_eq!(group.len(), 1);
        assert!(group[0].is_extension());
        assert!(!group[0].definition.is_extension());
    }

    #[test]
    fn same_name_different_kind_is_not_merged() {
        let index = DefinitionIndex::from_documents([("a", vec![object("Node"), scalar("Node")])]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn empty_index() {
        let index = DefinitionIndex::new();
        assert!(index.is_empty());
        assert!(index.sources().is_empty());
    }
}
