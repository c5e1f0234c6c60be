use std::collections::{HashMap, HashSet};

use crate::error::MergeConflict;
use crate::index::{Contribution, DefinitionIndex};
use crate::types::{
    merge_description, same_argument_signature, union_directives, Definition, DefinitionKey,
    DefinitionKind, DescriptionPolicy, DirectiveDefinition, DirectiveLocation, DirectiveUnion,
    EnumType, InputObjectType, InputValueDefinition, Name, ObjectType, ScalarType,
    SchemaDefinition, UnionType,
};

/// Knobs for the merge fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub description_policy: DescriptionPolicy,
}

/// A resolved definition and the sources that contributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDefinition {
    pub definition: Definition,
    pub sources: Vec<String>,
}

/// The merge result: one definition per key, in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSchema {
    entries: Vec<MergedDefinition>,
}

impl MergedSchema {
    pub fn entries(&self) -> &[MergedDefinition] {
        &self.entries
    }

    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.entries.iter().map(|e| &e.definition)
    }

    pub fn into_definitions(self) -> Vec<Definition> {
        self.entries.into_iter().map(|e| e.definition).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a named definition of the given kind.
    pub fn get(&self, kind: DefinitionKind, name: &str) -> Option<&Definition> {
        self.definitions()
            .find(|d| d.kind() == kind && d.name().is_some_and(|n| n.as_str() == name))
    }

    /// Returns the merged schema block, if any input declared one.
    pub fn schema(&self) -> Option<&SchemaDefinition> {
        self.definitions().find_map(|d| match d {
            Definition::Schema(s) => Some(s),
            _ => None,
        })
    }
}

/// Reduces every group in `index` to one definition.
///
/// This is a pure function. All conflicts across all groups are collected;
/// if any exist none of the merged output is returned.
pub fn resolve(
    index: &DefinitionIndex,
    options: &MergeOptions,
) -> Result<MergedSchema, Vec<MergeConflict>> {
    let mut resolver = Resolver {
        index,
        options: *options,
        conflicts: Vec::new(),
    };
    let schema = resolver.run();

    if resolver.conflicts.is_empty() {
        tracing::info!(
            definitions = schema.len(),
            sources = index.sources().len(),
            "merge resolved"
        );
        Ok(schema)
    } else {
        tracing::debug!(conflicts = resolver.conflicts.len(), "merge failed");
        Err(resolver.conflicts)
    }
}

/// How a type name's groups relate across kinds.
enum NameStatus {
    /// Reported once, at the first group carrying the name.
    KindConflict(Option<MergeConflict>),
    Consistent,
}

/// Per-group record of which source introduced each member.
type MemberOrigins = HashMap<String, usize>;

struct Resolver<'a> {
    index: &'a DefinitionIndex,
    options: MergeOptions,
    conflicts: Vec<MergeConflict>,
}

impl Resolver<'_> {
    fn run(&mut self) -> MergedSchema {
        let index = self.index;
        let mut statuses = self.classify_names();
        let mut entries = Vec::with_capacity(index.len());

        for (key, group) in index.groups() {
            if let DefinitionKey::Type { name, .. } = key {
                if let Some(NameStatus::KindConflict(pending)) = statuses.get_mut(name) {
                    if let Some(conflict) = pending.take() {
                        self.conflicts.push(conflict);
                    }
                    continue;
                }
            }

            if group.iter().all(Contribution::is_extension) {
                self.conflicts.push(MergeConflict::DanglingExtension {
                    kind: key.kind(),
                    name: key.name().map(Name::to_string).unwrap_or_default(),
                    sources: self.source_names(group),
                });
                continue;
            }

            if group.len() > 1 {
                tracing::debug!(key = %key, contributions = group.len(), "merging group");
            }

            if let Some(definition) = self.fold_group(key, group) {
                entries.push(MergedDefinition {
                    definition,
                    sources: self.source_names(group),
                });
            }
        }

        MergedSchema { entries }
    }

    /// Finds type names declared as more than one kind.
    fn classify_names(&self) -> HashMap<Name, NameStatus> {
        let mut kinds_by_name: HashMap<&Name, Vec<(DefinitionKind, &[Contribution])>> =
            HashMap::new();
        for (key, group) in self.index.groups() {
            if let DefinitionKey::Type { kind, name } = key {
                kinds_by_name.entry(name).or_default().push((*kind, group));
            }
        }

        kinds_by_name
            .into_iter()
            .map(|(name, kinds)| {
                let has_base = kinds
                    .iter()
                    .any(|(_, group)| group.iter().any(|c| !c.is_extension()));
                let status = if kinds.len() > 1 && has_base {
                    let contributions: Vec<&Contribution> =
                        kinds.iter().flat_map(|(_, group)| group.iter()).collect();
                    NameStatus::KindConflict(Some(MergeConflict::KindConflict {
                        name: name.to_string(),
                        kinds: kinds.iter().map(|(kind, _)| *kind).collect(),
                        sources: self.source_names(contributions),
                    }))
                } else {
                    NameStatus::Consistent
                };
                (name.clone(), status)
            })
            .collect()
    }

    fn fold_group(&mut self, key: &DefinitionKey, group: &[Contribution]) -> Option<Definition> {
        // Start from the first contribution; extensions arriving before the
        // base still contribute in arrival order.
        let (first, rest) = group.split_first()?;
        let mut merged = first.definition.clone();
        let mut origins = member_origins(&merged, first.source);

        for next in rest {
            match (&mut merged, &next.definition) {
                (Definition::Scalar(acc), Definition::Scalar(other)) => {
                    self.merge_scalar(acc, other);
                }
                (Definition::Object(acc), Definition::Object(other))
                | (Definition::Interface(acc), Definition::Interface(other)) => {
                    self.merge_object(key.kind(), acc, other, next.source, &mut origins);
                }
                (Definition::Union(acc), Definition::Union(other)) => {
                    self.merge_union(acc, other);
                }
                (Definition::Enum(acc), Definition::Enum(other)) => {
                    self.merge_enum(acc, other);
                }
                (Definition::InputObject(acc), Definition::InputObject(other)) => {
                    self.merge_input_object(acc, other, next.source, &mut origins);
                }
                (Definition::Directive(acc), Definition::Directive(other)) => {
                    self.merge_directive_definition(acc, other, first.source, next.source);
                }
                (Definition::Schema(acc), Definition::Schema(other)) => {
                    self.merge_schema(acc, other, next.source, &mut origins);
                }
                (acc, other) => unreachable!(
                    "group {key} mixes {} and {} contributions",
                    acc.kind(),
                    other.kind()
                ),
            }
        }

        Some(merged)
    }

    fn merge_scalar(&mut self, acc: &mut ScalarType, other: &ScalarType) {
        merge_description(
            &mut acc.description,
            other.description.as_ref(),
            self.options.description_policy,
        );
        union_directives(&mut acc.directives, &other.directives, DirectiveUnion::ByApplication);
    }

    fn merge_object(
        &mut self,
        kind: DefinitionKind,
        acc: &mut ObjectType,
        other: &ObjectType,
        source: usize,
        origins: &mut MemberOrigins,
    ) {
        let policy = self.options.description_policy;
        merge_description(&mut acc.description, other.description.as_ref(), policy);
        union_names(&mut acc.interfaces, &other.interfaces);
        union_directives(&mut acc.directives, &other.directives, DirectiveUnion::ByApplication);

        for field in &other.fields {
            let Some(existing) = acc.fields.iter_mut().find(|f| f.name == field.name) else {
                origins.insert(field.name.to_string(), source);
                acc.fields.push(field.clone());
                continue;
            };

            let detail = if existing.ty != field.ty {
                Some(format!("type {} vs {}", existing.ty, field.ty))
            } else if !existing.same_signature(field) {
                Some(format!(
                    "arguments ({}) vs ({})",
                    signature(&existing.arguments),
                    signature(&field.arguments)
                ))
            } else {
                None
            };

            match detail {
                Some(detail) => {
                    let first = origins.get(field.name.as_str()).copied().unwrap_or(source);
                    self.conflicts.push(MergeConflict::FieldConflict {
                        kind,
                        type_name: acc.name.to_string(),
                        field: field.name.to_string(),
                        detail,
                        sources: self.source_names_of(&[first, source]),
                    });
                }
                None => {
                    merge_description(&mut existing.description, field.description.as_ref(), policy);
                }
            }
        }
    }

    fn merge_input_object(
        &mut self,
        acc: &mut InputObjectType,
        other: &InputObjectType,
        source: usize,
        origins: &mut MemberOrigins,
    ) {
        let policy = self.options.description_policy;
        merge_description(&mut acc.description, other.description.as_ref(), policy);
        union_directives(&mut acc.directives, &other.directives, DirectiveUnion::ByApplication);

        for field in &other.fields {
            let Some(existing) = acc.fields.iter_mut().find(|f| f.name == field.name) else {
                origins.insert(field.name.to_string(), source);
                acc.fields.push(field.clone());
                continue;
            };

            if existing.ty != field.ty {
                let first = origins.get(field.name.as_str()).copied().unwrap_or(source);
                self.conflicts.push(MergeConflict::FieldConflict {
                    kind: DefinitionKind::InputObject,
                    type_name: acc.name.to_string(),
                    field: field.name.to_string(),
                    detail: format!("type {} vs {}", existing.ty, field.ty),
                    sources: self.source_names_of(&[first, source]),
                });
            } else {
                merge_description(&mut existing.description, field.description.as_ref(), policy);
            }
        }
    }

    fn merge_union(&mut self, acc: &mut UnionType, other: &UnionType) {
        merge_description(
            &mut acc.description,
            other.description.as_ref(),
            self.options.description_policy,
        );
        union_directives(&mut acc.directives, &other.directives, DirectiveUnion::ByApplication);
        union_names(&mut acc.members, &other.members);
    }

    fn merge_enum(&mut self, acc: &mut EnumType, other: &EnumType) {
        let policy = self.options.description_policy;
        merge_description(&mut acc.description, other.description.as_ref(), policy);
        union_directives(&mut acc.directives, &other.directives, DirectiveUnion::ByApplication);

        for value in &other.values {
            match acc.values.iter_mut().find(|v| v.name == value.name) {
                Some(existing) => {
                    merge_description(&mut existing.description, value.description.as_ref(), policy);
                    union_directives(&mut existing.directives, &value.directives, DirectiveUnion::ByName);
                }
                None => acc.values.push(value.clone()),
            }
        }
    }

    fn merge_directive_definition(
        &mut self,
        acc: &mut DirectiveDefinition,
        other: &DirectiveDefinition,
        first_source: usize,
        source: usize,
    ) {
        let mut details = Vec::new();
        if !same_argument_signature(&acc.arguments, &other.arguments) {
            details.push(format!(
                "arguments ({}) vs ({})",
                signature(&acc.arguments),
                signature(&other.arguments)
            ));
        }
        let ours: HashSet<_> = acc.locations.iter().collect();
        let theirs: HashSet<_> = other.locations.iter().collect();
        if ours != theirs {
            details.push(format!(
                "locations {} vs {}",
                locations(&acc.locations),
                locations(&other.locations)
            ));
        }
        if acc.repeatable != other.repeatable {
            details.push("repeatable differs".to_string());
        }

        if details.is_empty() {
            merge_description(
                &mut acc.description,
                other.description.as_ref(),
                self.options.description_policy,
            );
        } else {
            self.conflicts.push(MergeConflict::DirectiveConflict {
                name: acc.name.to_string(),
                detail: details.join("; "),
                sources: self.source_names_of(&[first_source, source]),
            });
        }
    }

    fn merge_schema(
        &mut self,
        acc: &mut SchemaDefinition,
        other: &SchemaDefinition,
        source: usize,
        origins: &mut MemberOrigins,
    ) {
        merge_description(
            &mut acc.description,
            other.description.as_ref(),
            self.options.description_policy,
        );
        union_directives(&mut acc.directives, &other.directives, DirectiveUnion::ByApplication);

        for root in &other.root_operations {
            match acc.root(root.operation) {
                Some(existing) if *existing != root.named_type => {
                    let first = origins
                        .get(root.operation.as_str())
                        .copied()
                        .unwrap_or(source);
                    self.conflicts.push(MergeConflict::SchemaConflict {
                        operation: root.operation,
                        types: vec![existing.to_string(), root.named_type.to_string()],
                        sources: self.source_names_of(&[first, source]),
                    });
                }
                Some(_) => {}
                None => {
                    origins.insert(root.operation.as_str().to_string(), source);
                    acc.root_operations.push(root.clone());
                }
            }
        }
    }

    fn source_names<'c>(&self, contributions: impl IntoIterator<Item = &'c Contribution>) -> Vec<String> {
        let ids: Vec<usize> = contributions.into_iter().map(|c| c.source).collect();
        self.source_names_of(&ids)
    }

    /// Maps source ids to names, dropping repeats and keeping first order.
    fn source_names_of(&self, ids: &[usize]) -> Vec<String> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter(|id| seen.insert(**id))
            .map(|id| self.index.source_name(*id).to_string())
            .collect()
    }
}

fn member_origins(definition: &Definition, source: usize) -> MemberOrigins {
    let names: Vec<String> = match definition {
        Definition::Object(d) | Definition::Interface(d) => {
            d.fields.iter().map(|f| f.name.to_string()).collect()
        }
        Definition::InputObject(d) => d.fields.iter().map(|f| f.name.to_string()).collect(),
        Definition::Schema(d) => d
            .root_operations
            .iter()
            .map(|r| r.operation.as_str().to_string())
            .collect(),
        _ => Vec::new(),
    };
    names.into_iter().map(|n| (n, source)).collect()
}

fn union_names(existing: &mut Vec<Name>, incoming: &[Name]) {
    for name in incoming {
        if !existing.contains(name) {
            existing.push(name.clone());
        }
    }
}

fn signature(arguments: &[InputValueDefinition]) -> String {
    arguments
        .iter()
        .map(|a| format!("{}: {}", a.name, a.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

fn locations(locations: &[DirectiveLocation]) -> String {
    locations
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Argument, Description, Directive, EnumValueDefinition, FieldDefinition, TypeRef, Value,
    };

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn named(s: &str) -> TypeRef {
        TypeRef::named(name(s))
    }

    fn object(n: &str, fields: &[(&str, &str)]) -> Definition {
        let mut object = ObjectType::new(name(n));
        object.fields = fields
            .iter()
            .map(|(f, t)| FieldDefinition::new(name(f), named(t)))
            .collect();
        Definition::Object(object)
    }

    fn enum_type(n: &str, values: &[&str]) -> Definition {
        Definition::Enum(EnumType {
            description: None,
            name: name(n),
            directives: Vec::new(),
            values: values.iter().map(|v| EnumValueDefinition::new(name(v))).collect(),
        })
    }

    fn run(docs: Vec<(&str, Vec<Definition>)>) -> Result<MergedSchema, Vec<MergeConflict>> {
        resolve(&DefinitionIndex::from_documents(docs), &MergeOptions::default())
    }

    fn field_names(schema: &MergedSchema, type_name: &str) -> Vec<String> {
        match schema.get(DefinitionKind::Object, type_name) {
            Some(Definition::Object(o)) => o.fields.iter().map(|f| f.name.to_string()).collect(),
            other => panic!("expected object {type_name}, got {other:?}"),
        }
    }

    #[test]
    fn unions_fields_in_insertion_order() {
        let merged = run(vec![
            ("a", vec![object("User", &[("id", "ID")])]),
            ("b", vec![object("User", &[("name", "String"), ("id", "ID")])]),
        ])
        .unwrap();
        assert_eq!(field_names(&merged, "User"), vec!["id", "name"]);
        assert_eq!(merged.entries()[0].sources, vec!["a", "b"]);
    }

    #[test]
    fn conflicting_field_type_names_both_sources() {
        let conflicts = run(vec![
            ("a", vec![object("User", &[("id", "ID")])]),
            ("b", vec![object("User", &[("id", "String")])]),
        ])
        .unwrap_err();
        assert_eq!(conflicts.len(), 1);
        match &conflicts[0] {
            MergeConflict::FieldConflict {
                type_name,
                field,
                sources,
                ..
            } => {
                assert_eq!(type_name, "User");
                assert_eq!(field, "id");
                assert_eq!(sources, &vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected FieldConflict, got {other:?}"),
        }
    }

    #[test]
    fn enum_values_are_deduplicated() {
        let merged = run(vec![
            ("a", vec![enum_type("Color", &["RED", "GREEN"])]),
            ("b", vec![enum_type("Color", &["GREEN", "BLUE"])]),
        ])
        .unwrap();
        match merged.get(DefinitionKind::Enum, "Color") {
            Some(Definition::Enum(e)) => {
                let values: Vec<&str> = e.values.iter().map(|v| v.name.as_str()).collect();
                assert_eq!(values, vec!["RED", "GREEN", "BLUE"]);
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn extension_joins_base() {
        let merged = run(vec![
            ("a", vec![object("User", &[("id", "ID")])]),
            (
                "b",
                vec![Definition::Extension(Box::new(object("User", &[("name", "String")])))],
            ),
        ])
        .unwrap();
        assert_eq!(field_names(&merged, "User"), vec!["id", "name"]);
        assert!(merged.definitions().all(|d| !d.is_extension()));
    }

    #[test]
    fn extension_before_base_still_resolves() {
        let merged = run(vec![
            (
                "a",
                vec![Definition::Extension(Box::new(object("User", &[("name", "String")])))],
            ),
            ("b", vec![object("User", &[("id", "ID")])]),
        ])
        .unwrap();
        assert_eq!(field_names(&merged, "User"), vec!["name", "id"]);
    }

    #[test]
    fn dangling_extension_is_reported() {
        let conflicts = run(vec![(
            "ext",
            vec![Definition::Extension(Box::new(object("User", &[("name", "String")])))],
        )])
        .unwrap_err();
        assert!(matches!(
            &conflicts[0],
            MergeConflict::DanglingExtension { name, .. } if name == "User"
        ));
    }

    #[test]
    fn kind_conflict_reported_once() {
        let conflicts = run(vec![
            ("a", vec![object("Node", &[("id", "ID")])]),
            ("b", vec![enum_type("Node", &["A"])]),
        ])
        .unwrap_err();
        assert_eq!(conflicts.len(), 1);
        assert!(matches!(
            &conflicts[0],
            MergeConflict::KindConflict { name, kinds, .. }
                if name == "Node" && kinds.len() == 2
        ));
    }

    #[test]
    fn conflicts_are_aggregated_across_groups() {
        let conflicts = run(vec![
            ("a", vec![object("User", &[("id", "ID")]), object("Post", &[("id", "ID")])]),
            ("b", vec![object("User", &[("id", "Int")]), object("Post", &[("id", "Int")])]),
        ])
        .unwrap_err();
        assert_eq!(conflicts.len(), 2);
    }

    #[test]
    fn description_first_wins_by_default() {
        let mut first = ObjectType::new(name("User"));
        first.description = Some(Description::block("first"));
        let mut second = ObjectType::new(name("User"));
        second.description = Some(Description::block("second"));
        let merged = run(vec![
            ("a", vec![Definition::Object(first)]),
            ("b", vec![Definition::Object(second)]),
        ])
        .unwrap();
        let user = merged.get(DefinitionKind::Object, "User").unwrap();
        assert_eq!(user.description().unwrap().text, "first");
    }

    #[test]
    fn enum_value_directives_union_by_name() {
        let mut a = EnumValueDefinition::new(name("OLD"));
        a.directives.push(Directive::new(name("deprecated")));
        let mut b = EnumValueDefinition::new(name("OLD"));
        b.directives.push(Directive::with_arguments(
            name("deprecated"),
            vec![Argument {
                name: name("reason"),
                value: Value::String("gone".into()),
            }],
        ));
        b.directives.push(Directive::new(name("internal")));
        let make = |value: EnumValueDefinition| {
            Definition::Enum(EnumType {
                description: None,
                name: name("Status"),
                directives: Vec::new(),
                values: vec![value],
            })
        };
        let merged = run(vec![("a", vec![make(a)]), ("b", vec![make(b)])]).unwrap();
        match merged.get(DefinitionKind::Enum, "Status") {
            Some(Definition::Enum(e)) => {
                let names: Vec<&str> = e.values[0]
                    .directives
                    .iter()
                    .map(|d| d.name.as_str())
                    .collect();
                assert_eq!(names, vec!["deprecated", "internal"]);
                assert!(e.values[0].directives[0].arguments.is_empty());
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }
}
