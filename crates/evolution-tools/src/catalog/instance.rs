//! `/instance/*`: instance lifecycle.

use super::{
    OperationDef, ResponseKind, Route, arguments_as_body, arguments_as_query, no_payload,
};
use crate::schema::{DefaultValue, Field, Shape};
use crate::semantics::HttpMethod;

const CREATE_INSTANCE_FIELDS: &[Field] = &[
    Field::required("instanceName", Shape::String, "Name of the new instance"),
    Field::optional("token", Shape::String, "Instance-level API token (generated if omitted)"),
    Field::defaulted(
        "qrcode",
        Shape::Boolean,
        DefaultValue::Bool(true),
        "Return a QR code for pairing right away",
    ),
    Field::defaulted(
        "integration",
        Shape::Enum(&["WHATSAPP-BAILEYS", "WHATSAPP-BUSINESS", "EVOLUTION"]),
        DefaultValue::Str("WHATSAPP-BAILEYS"),
        "Connection engine",
    ),
    Field::optional("number", Shape::String, "Phone number to pair with (pairing code flow)"),
];

pub(in crate::catalog) static CREATE_INSTANCE: OperationDef = OperationDef {
    name: "create_instance",
    title: "Create instance",
    description: "Create a new WhatsApp instance on the server.",
    outcome: "Instance created",
    route: Route::global(HttpMethod::Post, "instance", "create"),
    fields: CREATE_INSTANCE_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const FETCH_INSTANCES_FIELDS: &[Field] = &[
    Field::optional("instanceName", Shape::String, "Only return the instance with this name"),
    Field::optional("instanceId", Shape::String, "Only return the instance with this id"),
];

pub(in crate::catalog) static FETCH_INSTANCES: OperationDef = OperationDef {
    name: "fetch_instances",
    title: "List instances",
    description: "List instances on the server, optionally filtered by name or id.",
    outcome: "Instances fetched",
    route: Route::global(HttpMethod::Get, "instance", "fetchInstances"),
    fields: FETCH_INSTANCES_FIELDS,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};

const CONNECT_INSTANCE_FIELDS: &[Field] = &[Field::optional(
    "number",
    Shape::String,
    "Phone number to request a pairing code for",
)];

pub(in crate::catalog) static CONNECT_INSTANCE: OperationDef = OperationDef {
    name: "connect_instance",
    title: "Connect instance",
    description: "Start pairing the configured instance; returns a QR code and/or pairing code.",
    outcome: "Connection started",
    route: Route::instance(HttpMethod::Get, "instance", "connect").unauthenticated(),
    fields: CONNECT_INSTANCE_FIELDS,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static RESTART_INSTANCE: OperationDef = OperationDef {
    name: "restart_instance",
    title: "Restart instance",
    description: "Restart the configured instance's WhatsApp session.",
    outcome: "Instance restarted",
    route: Route::instance(HttpMethod::Put, "instance", "restart"),
    fields: &[],
    payload: no_payload,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static CONNECTION_STATE: OperationDef = OperationDef {
    name: "connection_state",
    title: "Connection state",
    description: "Get the connection state (open, connecting, close) of the configured instance.",
    outcome: "Connection state fetched",
    route: Route::instance(HttpMethod::Get, "instance", "connectionState").unauthenticated(),
    fields: &[],
    payload: no_payload,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static LOGOUT_INSTANCE: OperationDef = OperationDef {
    name: "logout_instance",
    title: "Log out instance",
    description: "Log the configured instance out of WhatsApp (the instance itself is kept).",
    outcome: "Instance logged out",
    route: Route::instance(HttpMethod::Delete, "instance", "logout"),
    fields: &[],
    payload: no_payload,
    refine: None,
    response: ResponseKind::Json,
};

const DELETE_INSTANCE_FIELDS: &[Field] = &[Field::required(
    "instanceName",
    Shape::String,
    "Name of the instance to delete",
)];

pub(in crate::catalog) static DELETE_INSTANCE: OperationDef = OperationDef {
    name: "delete_instance",
    title: "Delete instance",
    description: "Delete an instance from the server.",
    outcome: "Instance deleted",
    route: Route::global(HttpMethod::Delete, "instance", "delete").targeting("instanceName"),
    fields: DELETE_INSTANCE_FIELDS,
    payload: no_payload,
    refine: None,
    response: ResponseKind::Json,
};

const SET_PRESENCE_FIELDS: &[Field] = &[Field::required(
    "presence",
    Shape::Enum(&["available", "unavailable"]),
    "Global presence of the instance",
)];

pub(in crate::catalog) static SET_PRESENCE: OperationDef = OperationDef {
    name: "set_presence",
    title: "Set presence",
    description: "Set the instance's global presence (online/offline).",
    outcome: "Presence updated",
    route: Route::instance(HttpMethod::Post, "instance", "setPresence"),
    fields: SET_PRESENCE_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};
