//! `/message/*`: outgoing messages of every kind.

use super::{OperationDef, ResponseKind, Route, arguments_as_body};
use crate::mapping::{Payload, ValidatedArguments};
use crate::schema::{DefaultValue, Field, Shape};
use crate::semantics::HttpMethod;
use serde_json::json;

pub(super) const NUMBER: Field = Field::required(
    "number",
    Shape::String,
    "Recipient phone number with country code (e.g. 5511999998888) or a chat JID",
);

const MESSAGE_KEY_ID: Shape = Shape::Object(&[Field::required(
    "id",
    Shape::String,
    "ID of the quoted message",
)]);

const QUOTED: Shape = Shape::Object(&[Field::required("key", MESSAGE_KEY_ID, "")]);

const SEND_OPTIONS: Shape = Shape::Object(&[
    Field::optional(
        "delay",
        Shape::NON_NEGATIVE_INTEGER,
        "Milliseconds to wait (showing presence) before sending",
    ),
    Field::optional(
        "presence",
        Shape::Enum(&["composing", "recording", "paused"]),
        "Presence shown to the recipient while waiting",
    ),
    Field::optional("linkPreview", Shape::Boolean, "Render a preview for the first link"),
    Field::optional("mentionsEveryOne", Shape::Boolean, "Mention every group participant"),
    Field::optional(
        "mentioned",
        Shape::array(&Shape::String),
        "Numbers to mention",
    ),
    Field::optional("quoted", QUOTED, "Message to reply to"),
]);

pub(super) const OPTIONS: Field =
    Field::optional("options", SEND_OPTIONS, "Optional delivery options");

const SEND_TEXT_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("text", Shape::String, "Message text"),
    OPTIONS,
];

pub(in crate::catalog) static SEND_TEXT: OperationDef = OperationDef {
    name: "send_text",
    title: "Send text message",
    description: "Send a plain text message to a contact or group.",
    outcome: "Text message sent",
    route: Route::instance(HttpMethod::Post, "message", "sendText"),
    fields: SEND_TEXT_FIELDS,
    payload: send_text,
    refine: None,
    response: ResponseKind::Json,
};

fn send_text(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "number": a.get("number"),
        "text": a.get("text"),
        "options": a.get("options"),
    }))
}

const SEND_MEDIA_FIELDS: &[Field] = &[
    NUMBER,
    Field::required(
        "mediatype",
        Shape::Enum(&["image", "video", "document"]),
        "Kind of media",
    ),
    Field::required("media", Shape::String, "Public URL or base64-encoded file"),
    Field::optional("mimetype", Shape::String, "MIME type, e.g. image/png"),
    Field::optional("caption", Shape::String, "Caption shown under the media"),
    Field::optional("fileName", Shape::String, "File name (documents)"),
    OPTIONS,
];

pub(in crate::catalog) static SEND_MEDIA: OperationDef = OperationDef {
    name: "send_media",
    title: "Send media",
    description: "Send an image, video or document from a URL or base64 data.",
    outcome: "Media message sent",
    route: Route::instance(HttpMethod::Post, "message", "sendMedia"),
    fields: SEND_MEDIA_FIELDS,
    payload: send_media,
    refine: None,
    response: ResponseKind::Json,
};

fn send_media(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "number": a.get("number"),
        "options": a.get("options"),
        "media": {
            "type": a.get("mediatype"),
            "data": a.get("media"),
            "mimetype": a.get("mimetype"),
            "caption": a.get("caption"),
            "filename": a.get("fileName"),
        },
    }))
}

const SEND_VIDEO_NOTE_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("video", Shape::String, "Public URL or base64-encoded video"),
    OPTIONS,
];

pub(in crate::catalog) static SEND_VIDEO_NOTE: OperationDef = OperationDef {
    name: "send_video_note",
    title: "Send video note",
    description: "Send a round video note (PTV).",
    outcome: "Video note sent",
    route: Route::instance(HttpMethod::Post, "message", "sendPtv"),
    fields: SEND_VIDEO_NOTE_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const SEND_VOICE_NOTE_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("audio", Shape::String, "Public URL or base64-encoded audio"),
    Field::defaulted(
        "encoding",
        Shape::Boolean,
        DefaultValue::Bool(true),
        "Re-encode the audio as a WhatsApp voice note",
    ),
    OPTIONS,
];

pub(in crate::catalog) static SEND_VOICE_NOTE: OperationDef = OperationDef {
    name: "send_voice_note",
    title: "Send voice note",
    description: "Send an audio file as a push-to-talk voice note.",
    outcome: "Voice note sent",
    route: Route::instance(HttpMethod::Post, "message", "sendWhatsAppAudio"),
    fields: SEND_VOICE_NOTE_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const SEND_STICKER_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("sticker", Shape::String, "Public URL or base64-encoded image"),
    OPTIONS,
];

pub(in crate::catalog) static SEND_STICKER: OperationDef = OperationDef {
    name: "send_sticker",
    title: "Send sticker",
    description: "Send an image as a sticker.",
    outcome: "Sticker sent",
    route: Route::instance(HttpMethod::Post, "message", "sendSticker"),
    fields: SEND_STICKER_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const SEND_LOCATION_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("latitude", Shape::NUMBER, "Latitude in decimal degrees"),
    Field::required("longitude", Shape::NUMBER, "Longitude in decimal degrees"),
    Field::optional("name", Shape::String, "Place name"),
    Field::optional("address", Shape::String, "Street address"),
    OPTIONS,
];

pub(in crate::catalog) static SEND_LOCATION: OperationDef = OperationDef {
    name: "send_location",
    title: "Send location",
    description: "Send a location pin.",
    outcome: "Location sent",
    route: Route::instance(HttpMethod::Post, "message", "sendLocation"),
    fields: SEND_LOCATION_FIELDS,
    payload: send_location,
    refine: None,
    response: ResponseKind::Json,
};

fn send_location(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "number": a.get("number"),
        "location": {
            "latitude": a.get("latitude"),
            "longitude": a.get("longitude"),
            "name": a.get("name"),
            "address": a.get("address"),
        },
        "options": a.get("options"),
    }))
}

const CONTACT: Shape = Shape::Object(&[
    Field::required("fullName", Shape::String, "Display name"),
    Field::required("phoneNumber", Shape::String, "Phone number with country code"),
    Field::optional("wuid", Shape::String, "WhatsApp user id (digits only)"),
    Field::optional("organization", Shape::String, ""),
    Field::optional("email", Shape::String, ""),
    Field::optional("url", Shape::String, ""),
]);

const SEND_CONTACT_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("contacts", Shape::non_empty_array(&CONTACT), "Contact cards to send"),
    OPTIONS,
];

pub(in crate::catalog) static SEND_CONTACT: OperationDef = OperationDef {
    name: "send_contact",
    title: "Send contact",
    description: "Send one or more contact cards.",
    outcome: "Contact sent",
    route: Route::instance(HttpMethod::Post, "message", "sendContact"),
    fields: SEND_CONTACT_FIELDS,
    payload: send_contact,
    refine: None,
    response: ResponseKind::Json,
};

fn send_contact(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "number": a.get("number"),
        "contact": a.get("contacts"),
        "options": a.get("options"),
    }))
}

const SEND_REACTION_FIELDS: &[Field] = &[
    Field::required("remoteJid", Shape::String, "Chat JID of the message"),
    Field::required("fromMe", Shape::Boolean, "Whether the message was sent by this instance"),
    Field::required("id", Shape::String, "ID of the message to react to"),
    Field::required("reaction", Shape::String, "Emoji; an empty string removes the reaction"),
];

pub(in crate::catalog) static SEND_REACTION: OperationDef = OperationDef {
    name: "send_reaction",
    title: "Send reaction",
    description: "React to a message with an emoji.",
    outcome: "Reaction sent",
    route: Route::instance(HttpMethod::Post, "message", "sendReaction"),
    fields: SEND_REACTION_FIELDS,
    payload: send_reaction,
    refine: None,
    response: ResponseKind::Json,
};

fn send_reaction(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "key": {
            "remoteJid": a.get("remoteJid"),
            "fromMe": a.get("fromMe"),
            "id": a.get("id"),
        },
        "reaction": a.get("reaction"),
    }))
}

const SEND_POLL_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("name", Shape::String, "Poll question"),
    Field::defaulted(
        "selectableCount",
        Shape::NON_NEGATIVE_INTEGER,
        DefaultValue::Int(1),
        "How many options a voter may pick",
    ),
    Field::required("values", Shape::non_empty_array(&Shape::String), "Poll options"),
    OPTIONS,
];

pub(in crate::catalog) static SEND_POLL: OperationDef = OperationDef {
    name: "send_poll",
    title: "Send poll",
    description: "Send a poll with one or more options.",
    outcome: "Poll sent",
    route: Route::instance(HttpMethod::Post, "message", "sendPoll"),
    fields: SEND_POLL_FIELDS,
    payload: send_poll,
    refine: None,
    response: ResponseKind::Json,
};

fn send_poll(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "number": a.get("number"),
        "poll": {
            "name": a.get("name"),
            "selectableCount": a.get("selectableCount"),
            "values": a.get("values"),
        },
        "options": a.get("options"),
    }))
}

const LIST_ROW: Shape = Shape::Object(&[
    Field::required("title", Shape::String, "Row title"),
    Field::optional("description", Shape::String, "Row description"),
    Field::required("rowId", Shape::String, "Identifier returned when the row is picked"),
]);

const LIST_SECTION: Shape = Shape::Object(&[
    Field::required("title", Shape::String, "Section title"),
    Field::required("rows", Shape::non_empty_array(&LIST_ROW), "Selectable rows"),
]);

const SEND_LIST_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("title", Shape::String, "List title"),
    Field::required("description", Shape::String, "List body text"),
    Field::required("buttonText", Shape::String, "Label of the button that opens the list"),
    Field::optional("footerText", Shape::String, "Footer text"),
    Field::required("sections", Shape::non_empty_array(&LIST_SECTION), "List sections"),
    OPTIONS,
];

pub(in crate::catalog) static SEND_LIST: OperationDef = OperationDef {
    name: "send_list",
    title: "Send list",
    description: "Send an interactive list message with sections and rows.",
    outcome: "List message sent",
    route: Route::instance(HttpMethod::Post, "message", "sendList"),
    fields: SEND_LIST_FIELDS,
    payload: send_list,
    refine: None,
    response: ResponseKind::Json,
};

fn send_list(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "number": a.get("number"),
        "list": {
            "title": a.get("title"),
            "description": a.get("description"),
            "buttonText": a.get("buttonText"),
            "footerText": a.get("footerText"),
            "sections": a.get("sections"),
        },
        "options": a.get("options"),
    }))
}

const BUTTON: Shape = Shape::Object(&[
    Field::required(
        "type",
        Shape::Enum(&["reply", "url", "call", "copy"]),
        "Button behaviour",
    ),
    Field::required("displayText", Shape::String, "Button label"),
    Field::optional("id", Shape::String, "Reply id (reply buttons)"),
    Field::optional("url", Shape::String, "Target URL (url buttons)"),
    Field::optional("phoneNumber", Shape::String, "Number to call (call buttons)"),
    Field::optional("copyCode", Shape::String, "Text to copy (copy buttons)"),
]);

const SEND_BUTTONS_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("title", Shape::String, "Message title"),
    Field::required("description", Shape::String, "Message body text"),
    Field::optional("footer", Shape::String, "Footer text"),
    Field::required(
        "buttons",
        Shape::Array {
            items: &BUTTON,
            min_items: Some(1),
            max_items: Some(3),
        },
        "Between one and three buttons",
    ),
    OPTIONS,
];

pub(in crate::catalog) static SEND_BUTTONS: OperationDef = OperationDef {
    name: "send_buttons",
    title: "Send buttons",
    description: "Send a message with up to three interactive buttons.",
    outcome: "Button message sent",
    route: Route::instance(HttpMethod::Post, "message", "sendButtons"),
    fields: SEND_BUTTONS_FIELDS,
    payload: send_buttons,
    refine: None,
    response: ResponseKind::Json,
};

fn send_buttons(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "number": a.get("number"),
        "buttons": {
            "title": a.get("title"),
            "description": a.get("description"),
            "footer": a.get("footer"),
            "buttons": a.get("buttons"),
        },
        "options": a.get("options"),
    }))
}

const SEND_STATUS_FIELDS: &[Field] = &[
    Field::required(
        "type",
        Shape::Enum(&["text", "image", "video", "audio"]),
        "Status kind",
    ),
    Field::required("content", Shape::String, "Text, or media URL / base64 data"),
    Field::optional("caption", Shape::String, "Caption for media statuses"),
    Field::optional("backgroundColor", Shape::String, "Hex color for text statuses"),
    Field::optional("font", Shape::NON_NEGATIVE_INTEGER, "Font id for text statuses"),
    Field::defaulted(
        "allContacts",
        Shape::Boolean,
        DefaultValue::Bool(false),
        "Show the status to every contact",
    ),
    Field::optional(
        "statusJidList",
        Shape::array(&Shape::String),
        "Restrict the status to these JIDs",
    ),
];

pub(in crate::catalog) static SEND_STATUS: OperationDef = OperationDef {
    name: "send_status",
    title: "Post status",
    description: "Post a status (story) update.",
    outcome: "Status posted",
    route: Route::instance(HttpMethod::Post, "message", "sendStatus"),
    fields: SEND_STATUS_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};
