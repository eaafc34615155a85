//! Member recognizers. Each one scans the member view of a type body (see
//! [`super::block::member_view`]), so locals inside method bodies and the
//! members of nested types are never seen here.

use super::params::parse_parameters;
use super::patterns::{
    is_reserved_word, modifier_tokens, normalize_ws, EVENT_RE, FIELD_RE, INTERFACE_METHOD_RE,
    METHOD_RE, PROPERTY_RE,
};
use super::{report, ExtractContext};
use crate::config::{AccessModifier, NodeKey, NodeKind, Relation};
use crate::error::ExtractError;
use crate::graph::knowledge_graph::{EventInfo, FieldInfo, MethodInfo, NodeData, PropertyInfo};

/// Methods with a body. Constructors and control-flow statements that share
/// the method shape are passed over.
pub fn process_methods(cx: &mut ExtractContext<'_>, view: &str, owner: &str) {
    for caps in METHOD_RE.captures_iter(view) {
        let return_type = normalize_ws(&caps[3]);
        let name = &caps[4];
        if is_reserved_word(&return_type) || is_reserved_word(name) {
            continue;
        }
        let info = MethodInfo {
            name: name.to_string(),
            access_modifier: AccessModifier::or_default(
                caps.get(1).map(|m| m.as_str()),
                AccessModifier::Private,
            ),
            modifiers: modifier_tokens(caps.get(2).map(|m| m.as_str())),
            return_type,
            parameters: parse_parameters(&caps[5]),
        };
        if let Err(e) = record_method(cx, owner, info) {
            report("method", owner, &caps[0], &e);
        }
    }
}

/// Bodiless interface signatures, implicitly `public abstract`.
pub fn process_interface_methods(cx: &mut ExtractContext<'_>, view: &str, owner: &str) {
    for caps in INTERFACE_METHOD_RE.captures_iter(view) {
        let return_type = normalize_ws(&caps[1]);
        let name = &caps[2];
        if is_reserved_word(&return_type) || is_reserved_word(name) {
            continue;
        }
        let info = MethodInfo {
            name: name.to_string(),
            access_modifier: AccessModifier::Public,
            modifiers: vec!["abstract".to_string()],
            return_type,
            parameters: parse_parameters(&caps[3]),
        };
        if let Err(e) = record_method(cx, owner, info) {
            report("interface method", owner, &caps[0], &e);
        }
    }
}

fn record_method(
    cx: &mut ExtractContext<'_>,
    owner: &str,
    info: MethodInfo,
) -> Result<(), ExtractError> {
    let name = info.name.clone();
    let method_id = cx.graph.upsert_node(
        &NodeKey::member(NodeKind::Method, &name, owner),
        NodeData::Method(info),
    );
    cx.graph.add_edge(owner, &method_id, Relation::HasMethod)?;
    cx.graph.record_declared_method(owner, &name);
    cx.stats.methods += 1;
    Ok(())
}

/// Auto-properties. `default_access` and `implied_modifiers` cover
/// interface members, which carry neither keyword in source.
pub fn process_properties(
    cx: &mut ExtractContext<'_>,
    view: &str,
    owner: &str,
    default_access: AccessModifier,
    implied_modifiers: &[&str],
) {
    for caps in PROPERTY_RE.captures_iter(view) {
        let property_type = normalize_ws(&caps[3]);
        let name = &caps[4];
        if is_reserved_word(&property_type) {
            continue;
        }
        let mut modifiers = modifier_tokens(caps.get(2).map(|m| m.as_str()));
        for implied in implied_modifiers {
            if !modifiers.iter().any(|m| m == implied) {
                modifiers.push(implied.to_string());
            }
        }
        let info = PropertyInfo {
            name: name.to_string(),
            access_modifier: AccessModifier::or_default(
                caps.get(1).map(|m| m.as_str()),
                default_access,
            ),
            modifiers,
            property_type,
            accessors: normalize_ws(&caps[5]),
        };
        let key = NodeKey::member(NodeKind::Property, name, owner);
        if let Err(e) = record_member(cx, owner, &key, NodeData::Property(info), Relation::HasProperty)
        {
            report("property", owner, &caps[0], &e);
        }
    }
}

pub fn process_events(cx: &mut ExtractContext<'_>, view: &str, owner: &str) {
    for caps in EVENT_RE.captures_iter(view) {
        let name = &caps[4];
        let info = EventInfo {
            name: name.to_string(),
            access_modifier: AccessModifier::or_default(
                caps.get(1).map(|m| m.as_str()),
                AccessModifier::Private,
            ),
            modifiers: modifier_tokens(caps.get(2).map(|m| m.as_str())),
            event_type: normalize_ws(&caps[3]),
        };
        let key = NodeKey::member(NodeKind::Event, name, owner);
        if let Err(e) = record_member(cx, owner, &key, NodeData::Event(info), Relation::HasEvent) {
            report("event", owner, &caps[0], &e);
        }
    }
}

/// Fields run last: names already taken by a property or event of the same
/// owner are the tail of those declarations, not fields.
pub fn process_fields(cx: &mut ExtractContext<'_>, view: &str, owner: &str) {
    for caps in FIELD_RE.captures_iter(view) {
        let field_type = normalize_ws(&caps[3]);
        let name = &caps[4];
        if is_reserved_word(&field_type) || is_reserved_word(name) {
            continue;
        }
        // `=> expr;` is an expression-bodied member.
        if caps.get(5).is_some_and(|m| m.as_str().starts_with('>')) {
            continue;
        }
        if claimed_by_other_member(cx, owner, name) {
            continue;
        }
        let info = FieldInfo {
            name: name.to_string(),
            access_modifier: AccessModifier::or_default(
                caps.get(1).map(|m| m.as_str()),
                AccessModifier::Private,
            ),
            modifiers: modifier_tokens(caps.get(2).map(|m| m.as_str())),
            field_type,
        };
        let key = NodeKey::member(NodeKind::Field, name, owner);
        if let Err(e) = record_member(cx, owner, &key, NodeData::Field(info), Relation::HasField) {
            report("field", owner, &caps[0], &e);
        }
    }
}

fn claimed_by_other_member(cx: &ExtractContext<'_>, owner: &str, name: &str) -> bool {
    [NodeKind::Property, NodeKind::Event]
        .into_iter()
        .any(|kind| cx.graph.has_node(&NodeKey::member(kind, name, owner).id()))
}

fn record_member(
    cx: &mut ExtractContext<'_>,
    owner: &str,
    key: &NodeKey,
    data: NodeData,
    relation: Relation,
) -> Result<(), ExtractError> {
    let member_id = cx.graph.upsert_node(key, data);
    cx.graph.add_edge(owner, &member_id, relation)?;
    Ok(())
}
