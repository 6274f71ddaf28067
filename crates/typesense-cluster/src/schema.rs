//! Static description of the cluster resource for hosts that need to know
//! which attributes are user-settable, server-assigned or frozen after
//! creation.

use serde::Serialize;

const RESOURCE_TYPE_SUFFIX: &str = "_cluster";

/// Host-facing type name, e.g. `typesense_cluster` for provider `typesense`.
pub fn resource_type_name(provider_type_name: &str) -> String {
    format!("{provider_type_name}{RESOURCE_TYPE_SUFFIX}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Must be declared.
    Required,
    /// May be declared; falls back to the default or the server's value.
    OptionalComputed,
    /// Assigned by the control plane.
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    String(&'static str),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: ValueKind,
    pub presence: Presence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Changing the value means destroying and recreating the cluster.
    pub requires_replace: bool,
}

const fn attr(name: &'static str, kind: ValueKind, presence: Presence) -> Attribute {
    Attribute {
        name,
        kind,
        presence,
        default: None,
        requires_replace: false,
    }
}

const fn frozen(attribute: Attribute) -> Attribute {
    Attribute {
        requires_replace: true,
        ..attribute
    }
}

const fn defaulting(attribute: Attribute, default: DefaultValue) -> Attribute {
    Attribute {
        default: Some(default),
        ..attribute
    }
}

pub const ATTRIBUTES: &[Attribute] = &[
    attr("id", ValueKind::String, Presence::Computed),
    attr("name", ValueKind::String, Presence::OptionalComputed),
    frozen(attr("memory", ValueKind::String, Presence::Required)),
    frozen(attr("vcpu", ValueKind::String, Presence::Required)),
    frozen(defaulting(
        attr("high_performance_disk", ValueKind::String, Presence::OptionalComputed),
        DefaultValue::String("no"),
    )),
    attr("typesense_server_version", ValueKind::String, Presence::Computed),
    frozen(defaulting(
        attr("high_availability", ValueKind::String, Presence::OptionalComputed),
        DefaultValue::String("no"),
    )),
    attr("search_delivery_network", ValueKind::String, Presence::Computed),
    attr("load_balancing", ValueKind::String, Presence::Computed),
    frozen(attr("region", ValueKind::String, Presence::Required)),
    defaulting(
        attr("auto_upgrade_capacity", ValueKind::Bool, Presence::OptionalComputed),
        DefaultValue::Bool(false),
    ),
    attr("status", ValueKind::String, Presence::Computed),
];

pub fn attribute(name: &str) -> Option<&'static Attribute> {
    ATTRIBUTES.iter().find(|a| a.name == name)
}

/// Attributes whose change forces a replacement.
pub fn replacement_attributes() -> impl Iterator<Item = &'static str> {
    ATTRIBUTES.iter().filter(|a| a.requires_replace).map(|a| a.name)
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub type_name: String,
    pub attributes: &'static [Attribute],
}

pub fn resource_schema(provider_type_name: &str) -> ResourceSchema {
    ResourceSchema {
        type_name: resource_type_name(provider_type_name),
        attributes: ATTRIBUTES,
    }
}
