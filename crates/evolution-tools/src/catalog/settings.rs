//! `/settings/*`, `/webhook/*`, `/proxy/*`: per-instance configuration.

use super::{OperationDef, ResponseKind, Route, arguments_as_body, no_payload};
use crate::mapping::{Payload, ValidatedArguments};
use crate::schema::{DefaultValue, Field, Shape};
use crate::semantics::HttpMethod;
use serde_json::json;

const fn flag(name: &'static str, description: &'static str) -> Field {
    Field::defaulted(name, Shape::Boolean, DefaultValue::Bool(false), description)
}

const SET_SETTINGS_FIELDS: &[Field] = &[
    flag("rejectCall", "Reject incoming calls"),
    Field::optional("msgCall", Shape::String, "Message sent to rejected callers"),
    flag("groupsIgnore", "Ignore group messages"),
    flag("alwaysOnline", "Keep the instance shown as online"),
    flag("readMessages", "Mark incoming messages as read"),
    flag("readStatus", "Mark status updates as seen"),
    flag("syncFullHistory", "Sync the full chat history on connect"),
];

pub(in crate::catalog) static SET_SETTINGS: OperationDef = OperationDef {
    name: "set_settings",
    title: "Update settings",
    description: "Update the behaviour settings of the configured instance.",
    outcome: "Settings updated",
    route: Route::instance(HttpMethod::Post, "settings", "set"),
    fields: SET_SETTINGS_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static FIND_SETTINGS: OperationDef = OperationDef {
    name: "find_settings",
    title: "Get settings",
    description: "Get the behaviour settings of the configured instance.",
    outcome: "Settings fetched",
    route: Route::instance(HttpMethod::Get, "settings", "find"),
    fields: &[],
    payload: no_payload,
    refine: None,
    response: ResponseKind::Json,
};

const WEBHOOK_EVENTS: &[&str] = &[
    "APPLICATION_STARTUP",
    "QRCODE_UPDATED",
    "MESSAGES_SET",
    "MESSAGES_UPSERT",
    "MESSAGES_UPDATE",
    "MESSAGES_DELETE",
    "SEND_MESSAGE",
    "CONTACTS_SET",
    "CONTACTS_UPSERT",
    "CONTACTS_UPDATE",
    "PRESENCE_UPDATE",
    "CHATS_SET",
    "CHATS_UPSERT",
    "CHATS_UPDATE",
    "CHATS_DELETE",
    "GROUPS_UPSERT",
    "GROUP_UPDATE",
    "GROUP_PARTICIPANTS_UPDATE",
    "CONNECTION_UPDATE",
    "LABELS_EDIT",
    "LABELS_ASSOCIATION",
    "CALL",
    "TYPEBOT_START",
    "TYPEBOT_CHANGE_STATUS",
];

const WEBHOOK_EVENT: Shape = Shape::Enum(WEBHOOK_EVENTS);

const SET_WEBHOOK_FIELDS: &[Field] = &[
    Field::required("url", Shape::String, "Endpoint that receives events"),
    Field::defaulted(
        "enabled",
        Shape::Boolean,
        DefaultValue::Bool(true),
        "Enable the webhook",
    ),
    flag("webhookByEvents", "Append the event name to the URL path"),
    flag("webhookBase64", "Include media as base64 in events"),
    Field::optional(
        "events",
        Shape::array(&WEBHOOK_EVENT),
        "Events to deliver (all when omitted)",
    ),
];

pub(in crate::catalog) static SET_WEBHOOK: OperationDef = OperationDef {
    name: "set_webhook",
    title: "Set webhook",
    description: "Configure the webhook that receives events from the configured instance.",
    outcome: "Webhook configured",
    route: Route::instance(HttpMethod::Post, "webhook", "set"),
    fields: SET_WEBHOOK_FIELDS,
    payload: set_webhook,
    refine: None,
    response: ResponseKind::Json,
};

fn set_webhook(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "webhook": {
            "enabled": a.get("enabled"),
            "url": a.get("url"),
            "byEvents": a.get("webhookByEvents"),
            "base64": a.get("webhookBase64"),
            "events": a.get("events"),
        }
    }))
}

pub(in crate::catalog) static FIND_WEBHOOK: OperationDef = OperationDef {
    name: "find_webhook",
    title: "Get webhook",
    description: "Get the webhook configuration of the configured instance.",
    outcome: "Webhook fetched",
    route: Route::instance(HttpMethod::Get, "webhook", "find"),
    fields: &[],
    payload: no_payload,
    refine: None,
    response: ResponseKind::Json,
};

const SET_PROXY_FIELDS: &[Field] = &[
    Field::defaulted(
        "enabled",
        Shape::Boolean,
        DefaultValue::Bool(true),
        "Route the instance through the proxy",
    ),
    Field::required("host", Shape::String, "Proxy host"),
    Field::required("port", Shape::String, "Proxy port"),
    Field::required("protocol", Shape::Enum(&["http", "https"]), "Proxy protocol"),
    Field::optional("username", Shape::String, "Proxy username"),
    Field::optional("password", Shape::String, "Proxy password"),
];

pub(in crate::catalog) static SET_PROXY: OperationDef = OperationDef {
    name: "set_proxy",
    title: "Set proxy",
    description: "Configure the outbound proxy of the configured instance.",
    outcome: "Proxy configured",
    route: Route::instance(HttpMethod::Post, "proxy", "set"),
    fields: SET_PROXY_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static FIND_PROXY: OperationDef = OperationDef {
    name: "find_proxy",
    title: "Get proxy",
    description: "Get the proxy configuration of the configured instance.",
    outcome: "Proxy fetched",
    route: Route::instance(HttpMethod::Get, "proxy", "find"),
    fields: &[],
    payload: no_payload,
    refine: None,
    response: ResponseKind::Json,
};
