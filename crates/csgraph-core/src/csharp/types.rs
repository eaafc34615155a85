//! Namespace and type-declaration recognizers.

use super::block::{blank, block_inner, depth_at, extract_block, member_view};
use super::members;
use super::params::split_top_level;
use super::patterns::{
    modifier_tokens, normalize_ws, BASE_NAME_RE, CLASS_RE, ENUM_RE, INTERFACE_RE,
    NAMESPACE_RE, STRUCT_RE, WHERE_CLAUSE_RE,
};
use super::{report, ExtractContext};
use crate::config::{AccessModifier, NodeKey, NodeKind, Relation};
use crate::error::ExtractError;
use crate::graph::knowledge_graph::{NodeData, TypeInfo, TypeKind};

/// Join a namespace path and a simple name. The global namespace is empty.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Process one scope: nested namespaces first, each recursively, then the
/// types declared directly in this scope. Namespace bodies are blanked out
/// of the scope's own text so their types are attached to the namespace
/// and never to `parent`.
///
/// `namespace` is the dotted path of the enclosing namespace, empty at file
/// level. Nested namespace and type keys are qualified with it.
pub fn process_scope(cx: &mut ExtractContext<'_>, text: &str, parent: &str, namespace: &str) {
    let mut own = String::with_capacity(text.len());
    let mut cursor = 0;

    for caps in NAMESPACE_RE.captures_iter(text) {
        let Some(header) = caps.get(0) else { continue };
        if header.start() < cursor {
            // Inside a namespace already handled by recursion.
            continue;
        }
        let full_name = qualify(namespace, &caps[1]);
        let (body, end) = if &caps[2] == "{" {
            let open = header.end() - 1;
            let block = extract_block(text, open);
            (block_inner(block), open + block.len())
        } else {
            // File-scoped: the rest of the file.
            (&text[header.end()..], text.len())
        };

        match record_namespace(cx, &full_name, parent) {
            Ok(ns_id) => process_scope(cx, body, &ns_id, &full_name),
            Err(e) => report("namespace", parent, header.as_str(), &e),
        }

        own.push_str(&text[cursor..header.start()]);
        own.push_str(&blank(&text[header.start()..end]));
        cursor = end;
    }
    own.push_str(&text[cursor..]);

    process_types(cx, &own, DeclScope::top_level(parent, namespace));
}

fn record_namespace(
    cx: &mut ExtractContext<'_>,
    name: &str,
    parent: &str,
) -> Result<String, ExtractError> {
    let ns_id = cx.graph.upsert_node(
        &NodeKey::new(NodeKind::Namespace, name),
        NodeData::Namespace {
            name: name.to_string(),
        },
    );
    cx.graph.add_edge(parent, &ns_id, Relation::ContainsNamespace)?;
    cx.stats.namespaces += 1;
    Ok(ns_id)
}

/// Where a run of type declarations sits.
#[derive(Debug, Clone, Copy)]
pub struct DeclScope<'a> {
    /// Node that gets the contains edge.
    pub parent: &'a str,
    /// Dotted prefix of the declared keys: the namespace, or the outer
    /// type's qualified name for a nested type.
    pub prefix: &'a str,
    /// Namespace that simple base names resolve in.
    pub namespace: &'a str,
    /// Access of a declaration written without an access keyword.
    pub default_access: AccessModifier,
}

impl<'a> DeclScope<'a> {
    /// Declarations directly inside a namespace or at file level.
    pub fn top_level(parent: &'a str, namespace: &'a str) -> Self {
        Self {
            parent,
            prefix: namespace,
            namespace,
            default_access: AccessModifier::Internal,
        }
    }
}

/// Classes, interfaces, enums and structs declared in `content` at brace
/// depth zero. Types nested inside them are handled by recursion from their
/// outer type.
pub fn process_types(cx: &mut ExtractContext<'_>, content: &str, scope: DeclScope<'_>) {
    process_type_decls(cx, content, scope, TypeKind::Class);
    process_type_decls(cx, content, scope, TypeKind::Interface);
    process_enums(cx, content, scope);
    process_type_decls(cx, content, scope, TypeKind::Struct);
}

/// Class, interface or struct declarations, their members, their bases and
/// their nested types.
pub fn process_type_decls(
    cx: &mut ExtractContext<'_>,
    content: &str,
    scope: DeclScope<'_>,
    kind: TypeKind,
) {
    let re = match kind {
        TypeKind::Class => &*CLASS_RE,
        TypeKind::Interface => &*INTERFACE_RE,
        TypeKind::Struct => &*STRUCT_RE,
    };
    let parent = scope.parent;

    for caps in re.captures_iter(content) {
        let Some(header) = caps.get(0) else { continue };
        if depth_at(content, header.start()) > 0 {
            continue;
        }
        let bases = match parse_bases(caps.get(4).map(|m| m.as_str())) {
            Ok(bases) => bases,
            Err(e) => {
                report(kind.keyword(), parent, header.as_str(), &e);
                continue;
            }
        };

        let info = TypeInfo {
            name: caps[3].to_string(),
            access_modifier: Some(AccessModifier::or_default(
                caps.get(1).map(|m| m.as_str()),
                scope.default_access,
            )),
            modifiers: modifier_tokens(caps.get(2).map(|m| m.as_str())),
            inherits: bases.clone(),
            stub: false,
        };

        let qualified = qualify(scope.prefix, &caps[3]);
        let key = NodeKey::new(kind.node_kind(), qualified.clone());
        let base_keys: Vec<String> =
            bases.iter().map(|b| base_key(scope.namespace, b)).collect();
        let type_id = match record_type(cx, kind, &key, info, parent, &base_keys) {
            Ok(id) => id,
            Err(e) => {
                report(kind.keyword(), parent, header.as_str(), &e);
                continue;
            }
        };

        let body = extract_block(content, header.end() - 1);
        let view = member_view(body);
        match kind {
            TypeKind::Class => {
                members::process_methods(cx, &view, &type_id);
                members::process_properties(cx, &view, &type_id, AccessModifier::Private, &[]);
                members::process_events(cx, &view, &type_id);
                members::process_fields(cx, &view, &type_id);
            }
            TypeKind::Struct => {
                members::process_methods(cx, &view, &type_id);
                members::process_properties(cx, &view, &type_id, AccessModifier::Private, &[]);
                members::process_fields(cx, &view, &type_id);
            }
            TypeKind::Interface => {
                members::process_interface_methods(cx, &view, &type_id);
                members::process_properties(
                    cx,
                    &view,
                    &type_id,
                    AccessModifier::Public,
                    &["abstract"],
                );
            }
        }

        // Nested types are private, except inside an interface.
        let nested_access = match kind {
            TypeKind::Interface => AccessModifier::Public,
            TypeKind::Class | TypeKind::Struct => AccessModifier::Private,
        };
        process_types(
            cx,
            block_inner(body),
            DeclScope {
                parent: &type_id,
                prefix: &qualified,
                namespace: scope.namespace,
                default_access: nested_access,
            },
        );
    }
}

fn record_type(
    cx: &mut ExtractContext<'_>,
    kind: TypeKind,
    key: &NodeKey,
    info: TypeInfo,
    parent: &str,
    base_keys: &[String],
) -> Result<String, ExtractError> {
    let type_id = cx.graph.upsert_node(key, kind.wrap(info));
    cx.graph.add_edge(parent, &type_id, kind.contains_relation())?;
    match kind {
        TypeKind::Class => cx.stats.classes += 1,
        TypeKind::Interface => cx.stats.interfaces += 1,
        TypeKind::Struct => cx.stats.structs += 1,
    }

    for base in base_keys {
        let base_id = cx.graph.ensure_stub(kind, base);
        cx.graph.add_edge(&type_id, &base_id, kind.inherits_relation())?;
    }
    Ok(type_id)
}

/// Split an inheritance list into its entries. A trailing generic
/// constraint clause is dropped. Any entry that is not a type reference
/// rejects the whole list.
pub fn parse_bases(raw: Option<&str>) -> Result<Vec<String>, ExtractError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let list = match WHERE_CLAUSE_RE.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    };

    let bases: Vec<String> = split_top_level(list)
        .into_iter()
        .map(normalize_ws)
        .collect();
    if bases.is_empty() || bases.iter().any(|b| !BASE_NAME_RE.is_match(b)) {
        return Err(ExtractError::InheritanceList(normalize_ws(raw)));
    }
    Ok(bases)
}

/// Key label for a base entry. Type arguments are not part of identity, so
/// `IRepository<User>` resolves to the `IRepository` declaration. A simple
/// name resolves in the declaring namespace; a dotted name is taken as
/// already qualified.
fn base_key(namespace: &str, base: &str) -> String {
    let name = base.split('<').next().unwrap_or(base).trim();
    if name.contains('.') {
        name.to_string()
    } else {
        qualify(namespace, name)
    }
}

/// Enum declarations at brace depth zero and their members.
pub fn process_enums(cx: &mut ExtractContext<'_>, content: &str, scope: DeclScope<'_>) {
    let parent = scope.parent;
    for caps in ENUM_RE.captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        if depth_at(content, whole.start()) > 0 {
            continue;
        }
        let name = &caps[2];
        let access =
            AccessModifier::or_default(caps.get(1).map(|m| m.as_str()), scope.default_access);

        let enum_id = cx.graph.upsert_node(
            &NodeKey::new(NodeKind::Enum, qualify(scope.prefix, name)),
            NodeData::Enum {
                name: name.to_string(),
                access_modifier: access,
            },
        );
        if let Err(e) = cx.graph.add_edge(parent, &enum_id, Relation::ContainsEnum) {
            report("enum", parent, whole.as_str(), &ExtractError::from(e));
            continue;
        }
        cx.stats.enums += 1;

        let members = strip_line_comments(&caps[3]);
        for segment in split_top_level(&members) {
            if let Err(e) = record_enum_member(cx, segment, &enum_id) {
                report("enum member", &enum_id, segment, &e);
            }
        }
    }
}

fn record_enum_member(
    cx: &mut ExtractContext<'_>,
    segment: &str,
    enum_id: &str,
) -> Result<(), ExtractError> {
    let name = segment.split('=').next().unwrap_or(segment).trim();
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ExtractError::UnexpectedMember(segment.to_string()));
    }
    let member_id = cx.graph.upsert_node(
        &NodeKey::member(NodeKind::EnumMember, name, enum_id),
        NodeData::EnumMember {
            name: name.to_string(),
        },
    );
    cx.graph.add_edge(enum_id, &member_id, Relation::HasMember)?;
    Ok(())
}

fn strip_line_comments(text: &str) -> String {
    text.lines()
        .map(|line| line.split("//").next().unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::knowledge_graph::KnowledgeGraph;
    use crate::graph::stats::Statistics;
    use pretty_assertions::assert_eq;

    fn scan(text: &str) -> (KnowledgeGraph, Statistics) {
        let mut graph = KnowledgeGraph::new();
        let mut stats = Statistics::new();
        graph.upsert_node(
            &NodeKey::new(NodeKind::File, "f.cs"),
            NodeData::File {
                name: "f.cs".into(),
                path: "f.cs".into(),
            },
        );
        process_scope(
            &mut ExtractContext::new(&mut graph, &mut stats),
            text,
            "File: f.cs",
            "",
        );
        (graph, stats)
    }

    #[test]
    fn nested_namespaces_are_bounded() {
        let (graph, stats) = scan(
            "namespace A { namespace B { class X { } } class Y { } } namespace C { class Z { } }",
        );
        assert_eq!(
            graph.targets("File: f.cs", Relation::ContainsNamespace),
            vec!["Namespace: A", "Namespace: C"]
        );
        assert_eq!(
            graph.targets("Namespace: A", Relation::ContainsNamespace),
            vec!["Namespace: A.B"]
        );
        assert_eq!(graph.targets("Namespace: A.B", Relation::ContainsClass), vec!["Class: A.B.X"]);
        assert_eq!(graph.targets("Namespace: A", Relation::ContainsClass), vec!["Class: A.Y"]);
        assert_eq!(graph.targets("Namespace: C", Relation::ContainsClass), vec!["Class: C.Z"]);
        assert_eq!(stats.namespaces, 3);
        assert_eq!(stats.classes, 3);
    }

    #[test]
    fn file_scoped_namespace_owns_remainder() {
        let (graph, _) = scan("using System;\nnamespace App.Core;\npublic class Service { }\n");
        assert_eq!(
            graph.targets("Namespace: App.Core", Relation::ContainsClass),
            vec!["Class: App.Core.Service"]
        );
        assert!(graph.targets("File: f.cs", Relation::ContainsClass).is_empty());
    }

    #[test]
    fn global_types_attach_to_file() {
        let (graph, _) = scan("class Program { }");
        assert_eq!(graph.targets("File: f.cs", Relation::ContainsClass), vec!["Class: Program"]);
    }

    #[test]
    fn type_name_attribute_is_simple() {
        let (graph, _) = scan("namespace Shop.Models { internal sealed class Order { } }");
        match graph.get_node_data("Class: Shop.Models.Order") {
            Some(NodeData::Class(info)) => {
                assert_eq!(info.name, "Order");
                assert_eq!(info.access_modifier, Some(AccessModifier::Internal));
                assert_eq!(info.modifiers, vec!["sealed"]);
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn class_bases_become_stubs() {
        let (graph, _) = scan(
            "namespace N { public class Repo : Base, IRepo<User>, Lib.Core.Thing where T : new() { } }",
        );
        assert_eq!(
            graph.targets("Class: N.Repo", Relation::Inherits),
            vec!["Class: N.Base", "Class: N.IRepo", "Class: Lib.Core.Thing"]
        );
        assert!(graph.get_node_data("Class: N.Base").is_some_and(NodeData::is_stub));
        match graph.get_node_data("Class: N.Repo") {
            Some(NodeData::Class(info)) => {
                assert_eq!(info.inherits, vec!["Base", "IRepo<User>", "Lib.Core.Thing"]);
                assert_eq!(info.access_modifier, Some(AccessModifier::Public));
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn interface_bases_use_interface_relation() {
        let (graph, stats) = scan("interface IRepo : IDisposable, IEnumerable<int> { }");
        assert_eq!(
            graph.targets("Interface: IRepo", Relation::InheritsInterface),
            vec!["Interface: IDisposable", "Interface: IEnumerable"]
        );
        assert_eq!(stats.interfaces, 1);
    }

    #[test]
    fn stub_is_upgraded_by_later_declaration() {
        let (graph, _) = scan(
            "namespace N { class Child : Parent { } }\nnamespace N { sealed class Parent { } }",
        );
        match graph.get_node_data("Class: N.Parent") {
            Some(NodeData::Class(info)) => {
                assert!(!info.stub);
                assert_eq!(info.modifiers, vec!["sealed"]);
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn malformed_inheritance_list_skips_the_declaration() {
        assert!(parse_bases(Some("Base, 1Bad!")).is_err());
        let (graph, stats) = scan("class Broken : Base, +Oops { }\nclass Fine { }");
        assert!(!graph.has_node("Class: Broken"));
        assert!(!graph.has_node("Class: Base"));
        assert!(graph.has_node("Class: Fine"));
        assert_eq!(stats.classes, 1);
    }

    #[test]
    fn enum_members_strip_values_and_comments() {
        let (graph, stats) = scan(
            "public enum Color : byte\n{\n    Red = 1, // primary\n    Green,\n    Blue = Red | 4\n}",
        );
        assert_eq!(
            graph.targets("Enum: Color", Relation::HasMember),
            vec![
                "EnumMember: Red (Enum: Color)",
                "EnumMember: Green (Enum: Color)",
                "EnumMember: Blue (Enum: Color)",
            ]
        );
        assert_eq!(stats.enums, 1);
        assert_eq!(
            graph.get_node_data("Enum: Color"),
            Some(&NodeData::Enum {
                name: "Color".into(),
                access_modifier: AccessModifier::Public
            })
        );
    }

    #[test]
    fn partial_declarations_count_each_occurrence() {
        let (graph, stats) = scan(
            "namespace A { partial class Helper { } }\nnamespace A { partial class Helper { } }",
        );
        assert_eq!(graph.count_kind(NodeKind::Class), 1);
        assert_eq!(stats.classes, 2);
        assert_eq!(stats.namespaces, 2);
        assert_eq!(graph.targets("Namespace: A", Relation::ContainsClass), vec!["Class: A.Helper"]);
    }

    #[test]
    fn same_name_in_different_namespaces_stays_distinct() {
        let (graph, _) = scan(
            "namespace A { class Helper { void Run() { } } }\nnamespace B { class Helper { void Run() { } } }",
        );
        assert_eq!(graph.count_kind(NodeKind::Class), 2);
        assert_eq!(
            graph.targets("Class: A.Helper", Relation::HasMethod),
            vec!["Method: Run (Class: A.Helper)"]
        );
        assert_eq!(
            graph.targets("Class: B.Helper", Relation::HasMethod),
            vec!["Method: Run (Class: B.Helper)"]
        );
    }

    #[test]
    fn nested_types_are_keyed_under_their_outer_type() {
        let (graph, stats) = scan(
            "namespace N { class A { class Inner { void One() { } } } class B { class Inner { void Two() { } } } }",
        );
        assert_eq!(graph.targets("Namespace: N", Relation::ContainsClass), vec!["Class: N.A", "Class: N.B"]);
        assert_eq!(graph.targets("Class: N.A", Relation::ContainsClass), vec!["Class: N.A.Inner"]);
        assert_eq!(graph.targets("Class: N.B", Relation::ContainsClass), vec!["Class: N.B.Inner"]);
        assert_eq!(
            graph.targets("Class: N.A.Inner", Relation::HasMethod),
            vec!["Method: One (Class: N.A.Inner)"]
        );
        assert_eq!(
            graph.targets("Class: N.B.Inner", Relation::HasMethod),
            vec!["Method: Two (Class: N.B.Inner)"]
        );
        assert!(!graph.has_node("Class: N.Inner"));
        assert!(graph.targets("Class: N.A", Relation::HasMethod).is_empty());
        assert_eq!(stats.classes, 4);
    }

    #[test]
    fn nested_types_default_to_private() {
        let (graph, _) = scan(
            "namespace N { class Outer { struct Cell { } enum Mode { On, Off } public class Open { } } }",
        );
        let access = |id: &str| match graph.get_node_data(id) {
            Some(NodeData::Class(info) | NodeData::Struct(info)) => info.access_modifier,
            Some(NodeData::Enum { access_modifier, .. }) => Some(*access_modifier),
            other => panic!("unexpected node {other:?}"),
        };
        assert_eq!(access("Class: N.Outer"), Some(AccessModifier::Internal));
        assert_eq!(access("Struct: N.Outer.Cell"), Some(AccessModifier::Private));
        assert_eq!(access("Enum: N.Outer.Mode"), Some(AccessModifier::Private));
        assert_eq!(access("Class: N.Outer.Open"), Some(AccessModifier::Public));
        assert_eq!(graph.targets("Class: N.Outer", Relation::ContainsEnum), vec!["Enum: N.Outer.Mode"]);
        assert_eq!(
            graph.targets("Enum: N.Outer.Mode", Relation::HasMember),
            vec!["EnumMember: On (Enum: N.Outer.Mode)", "EnumMember: Off (Enum: N.Outer.Mode)"]
        );
        assert!(graph.targets("Namespace: N", Relation::ContainsEnum).is_empty());
    }

    #[test]
    fn nested_type_bases_resolve_in_the_namespace() {
        let (graph, _) = scan("namespace N { class Outer { class Impl : Base { } } }");
        assert_eq!(graph.targets("Class: N.Outer.Impl", Relation::Inherits), vec!["Class: N.Base"]);
    }

    #[test]
    fn qualify_joins_paths() {
        assert_eq!(qualify("", "A"), "A");
        assert_eq!(qualify("A.B", "C"), "A.B.C");
    }
}
