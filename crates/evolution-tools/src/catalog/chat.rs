//! `/chat/*`: chat state, lookups and the instance's own profile.

use super::message::NUMBER;
use super::{OperationDef, ResponseKind, Route, arguments_as_body, arguments_as_query, no_payload};
use crate::error::Violation;
use crate::mapping::{Payload, ValidatedArguments};
use crate::schema::{DefaultValue, Field, Shape};
use crate::semantics::HttpMethod;
use serde_json::{Value, json};

pub(super) const EDIT_FROM_ME_MESSAGE: &str =
    "only messages sent by this instance can be edited (key.fromMe must be true)";

const REMOTE_JID: Field = Field::required(
    "remoteJid",
    Shape::String,
    "Chat JID, e.g. 5511999998888@s.whatsapp.net or 123456@g.us",
);

const FROM_ME: Field = Field::required(
    "fromMe",
    Shape::Boolean,
    "Whether the message was sent by this instance",
);

const MESSAGE_ID: Field = Field::required("id", Shape::String, "Message ID");

const MESSAGE_KEY: Shape = Shape::Object(&[REMOTE_JID, FROM_ME, MESSAGE_ID]);

const PAGE: Field = Field::defaulted(
    "page",
    Shape::POSITIVE_INTEGER,
    DefaultValue::Int(1),
    "Page number",
);

const OFFSET: Field = Field::defaulted(
    "offset",
    Shape::POSITIVE_INTEGER,
    DefaultValue::Int(10),
    "Page size",
);

const CHECK_WHATSAPP_NUMBERS_FIELDS: &[Field] = &[Field::required(
    "numbers",
    Shape::non_empty_array(&Shape::String),
    "Phone numbers to check",
)];

pub(in crate::catalog) static CHECK_WHATSAPP_NUMBERS: OperationDef = OperationDef {
    name: "check_whatsapp_numbers",
    title: "Check WhatsApp numbers",
    description: "Check which phone numbers have a WhatsApp account.",
    outcome: "Numbers checked",
    route: Route::instance(HttpMethod::Post, "chat", "whatsappNumbers"),
    fields: CHECK_WHATSAPP_NUMBERS_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const MARK_AS_READ_FIELDS: &[Field] = &[Field::required(
    "messages",
    Shape::non_empty_array(&MESSAGE_KEY),
    "Keys of the messages to mark as read",
)];

pub(in crate::catalog) static MARK_AS_READ: OperationDef = OperationDef {
    name: "mark_as_read",
    title: "Mark messages as read",
    description: "Mark one or more messages as read.",
    outcome: "Messages marked as read",
    route: Route::instance(HttpMethod::Post, "chat", "markMessageAsRead"),
    fields: MARK_AS_READ_FIELDS,
    payload: mark_as_read,
    refine: None,
    response: ResponseKind::Json,
};

fn mark_as_read(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({ "readMessages": a.get("messages") }))
}

const MARK_CHAT_UNREAD_FIELDS: &[Field] = &[
    Field::required("chat", Shape::String, "Chat JID"),
    Field::required("lastMessageId", Shape::String, "ID of the last message in the chat"),
    Field::defaulted(
        "fromMe",
        Shape::Boolean,
        DefaultValue::Bool(false),
        "Whether the last message was sent by this instance",
    ),
];

pub(in crate::catalog) static MARK_CHAT_UNREAD: OperationDef = OperationDef {
    name: "mark_chat_unread",
    title: "Mark chat unread",
    description: "Mark a chat as unread.",
    outcome: "Chat marked as unread",
    route: Route::instance(HttpMethod::Post, "chat", "markChatUnread"),
    fields: MARK_CHAT_UNREAD_FIELDS,
    payload: mark_chat_unread,
    refine: None,
    response: ResponseKind::Json,
};

fn mark_chat_unread(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "chat": a.get("chat"),
        "lastMessage": {
            "key": {
                "remoteJid": a.get("chat"),
                "fromMe": a.get("fromMe"),
                "id": a.get("lastMessageId"),
            }
        },
    }))
}

const ARCHIVE_CHAT_FIELDS: &[Field] = &[
    Field::required("chat", Shape::String, "Chat JID"),
    Field::defaulted(
        "archive",
        Shape::Boolean,
        DefaultValue::Bool(true),
        "true to archive, false to unarchive",
    ),
    Field::optional("lastMessageId", Shape::String, "ID of the last message in the chat"),
];

pub(in crate::catalog) static ARCHIVE_CHAT: OperationDef = OperationDef {
    name: "archive_chat",
    title: "Archive chat",
    description: "Archive or unarchive a chat.",
    outcome: "Chat archive state updated",
    route: Route::instance(HttpMethod::Post, "chat", "archiveChat"),
    fields: ARCHIVE_CHAT_FIELDS,
    payload: archive_chat,
    refine: None,
    response: ResponseKind::Json,
};

fn archive_chat(a: &ValidatedArguments) -> Payload {
    let last_message = a
        .get("lastMessageId")
        .map(|id| json!({ "key": { "id": id } }));
    Payload::json(json!({
        "chatId": a.get("chat"),
        "archive": a.get("archive"),
        "lastMessage": last_message,
    }))
}

const DELETE_MESSAGE_FIELDS: &[Field] = &[
    MESSAGE_ID,
    REMOTE_JID,
    FROM_ME,
    Field::optional("participant", Shape::String, "Sender JID (group messages)"),
];

pub(in crate::catalog) static DELETE_MESSAGE: OperationDef = OperationDef {
    name: "delete_message",
    title: "Delete message for everyone",
    description: "Delete a message for every participant of the chat.",
    outcome: "Message deleted",
    route: Route::instance(HttpMethod::Delete, "chat", "deleteMessageForEveryone"),
    fields: DELETE_MESSAGE_FIELDS,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};

const EDIT_KEY: Shape = Shape::Object(&[
    REMOTE_JID,
    Field::optional(
        "fromMe",
        Shape::Boolean,
        "Must be true: only own messages can be edited",
    ),
    MESSAGE_ID,
]);

const EDIT_MESSAGE_FIELDS: &[Field] = &[
    NUMBER,
    Field::required("text", Shape::String, "New message text"),
    Field::required("key", EDIT_KEY, "Key of the message to edit"),
];

pub(in crate::catalog) static EDIT_MESSAGE: OperationDef = OperationDef {
    name: "edit_message",
    title: "Edit message",
    description: "Edit the text of a message previously sent by this instance.",
    outcome: "Message edited",
    route: Route::instance(HttpMethod::Post, "chat", "updateMessage"),
    fields: EDIT_MESSAGE_FIELDS,
    payload: arguments_as_body,
    refine: Some(edit_requires_own_message),
    response: ResponseKind::Json,
};

fn edit_requires_own_message(a: &ValidatedArguments) -> Option<Violation> {
    let from_me = a
        .get("key")
        .and_then(|key| key.get("fromMe"))
        .and_then(Value::as_bool);
    if from_me == Some(true) {
        return None;
    }
    Some(Violation::new("key.fromMe", EDIT_FROM_ME_MESSAGE))
}

const SEND_PRESENCE_FIELDS: &[Field] = &[
    NUMBER,
    Field::required(
        "presence",
        Shape::Enum(&["composing", "recording", "paused", "available", "unavailable"]),
        "Presence to show in the chat",
    ),
    Field::optional(
        "delay",
        Shape::NON_NEGATIVE_INTEGER,
        "How long to show the presence, in milliseconds",
    ),
];

pub(in crate::catalog) static SEND_PRESENCE: OperationDef = OperationDef {
    name: "send_presence",
    title: "Send chat presence",
    description: "Show a presence (typing, recording, ...) in a chat.",
    outcome: "Presence sent",
    route: Route::instance(HttpMethod::Post, "chat", "sendPresence"),
    fields: SEND_PRESENCE_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const UPDATE_BLOCK_STATUS_FIELDS: &[Field] = &[
    NUMBER,
    Field::required(
        "status",
        Shape::Enum(&["block", "unblock"]),
        "Block or unblock the contact",
    ),
];

pub(in crate::catalog) static UPDATE_BLOCK_STATUS: OperationDef = OperationDef {
    name: "update_block_status",
    title: "Block or unblock contact",
    description: "Block or unblock a contact.",
    outcome: "Block status updated",
    route: Route::instance(HttpMethod::Post, "chat", "updateBlockStatus"),
    fields: UPDATE_BLOCK_STATUS_FIELDS,
    payload: update_block_status,
    refine: None,
    response: ResponseKind::Json,
};

fn update_block_status(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "number": a.get("number"),
        "action": a.get("status"),
    }))
}

const NUMBER_ONLY: &[Field] = &[NUMBER];

pub(in crate::catalog) static FETCH_PROFILE_PICTURE: OperationDef = OperationDef {
    name: "fetch_profile_picture",
    title: "Fetch profile picture",
    description: "Get the profile picture URL of a contact.",
    outcome: "Profile picture fetched",
    route: Route::instance(HttpMethod::Post, "chat", "fetchProfilePictureUrl"),
    fields: NUMBER_ONLY,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const GET_BASE64_FROM_MEDIA_FIELDS: &[Field] = &[
    Field::required("messageId", Shape::String, "ID of the media message"),
    Field::defaulted(
        "convertToMp4",
        Shape::Boolean,
        DefaultValue::Bool(false),
        "Convert video/audio to MP4",
    ),
];

pub(in crate::catalog) static GET_BASE64_FROM_MEDIA: OperationDef = OperationDef {
    name: "get_base64_from_media",
    title: "Download media",
    description: "Download the media of a received message. Only metadata (type and size) is returned.",
    outcome: "Media downloaded",
    route: Route::instance(HttpMethod::Post, "chat", "getBase64FromMediaMessage"),
    fields: GET_BASE64_FROM_MEDIA_FIELDS,
    payload: get_base64_from_media,
    refine: None,
    response: ResponseKind::MediaMetadata,
};

fn get_base64_from_media(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "message": { "key": { "id": a.get("messageId") } },
        "convertToMp4": a.get("convertToMp4"),
    }))
}

const FIND_CONTACTS_FIELDS: &[Field] = &[Field::optional(
    "id",
    Shape::String,
    "Only return the contact with this JID",
)];

pub(in crate::catalog) static FIND_CONTACTS: OperationDef = OperationDef {
    name: "find_contacts",
    title: "Find contacts",
    description: "List the instance's contacts, optionally filtered by JID.",
    outcome: "Contacts fetched",
    route: Route::instance(HttpMethod::Post, "chat", "findContacts"),
    fields: FIND_CONTACTS_FIELDS,
    payload: find_contacts,
    refine: None,
    response: ResponseKind::Json,
};

fn find_contacts(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({ "where": { "id": a.get("id") } }))
}

const FIND_MESSAGES_FIELDS: &[Field] = &[
    Field::optional("remoteJid", Shape::String, "Only messages from this chat"),
    Field::optional("fromMe", Shape::Boolean, "Only messages sent (true) or received (false)"),
    PAGE,
    OFFSET,
];

pub(in crate::catalog) static FIND_MESSAGES: OperationDef = OperationDef {
    name: "find_messages",
    title: "Find messages",
    description: "Search stored messages, paginated.",
    outcome: "Messages fetched",
    route: Route::instance(HttpMethod::Post, "chat", "findMessages"),
    fields: FIND_MESSAGES_FIELDS,
    payload: find_messages,
    refine: None,
    response: ResponseKind::Json,
};

fn find_messages(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "where": {
            "key": {
                "remoteJid": a.get("remoteJid"),
                "fromMe": a.get("fromMe"),
            }
        },
        "page": a.get("page"),
        "offset": a.get("offset"),
    }))
}

const FIND_STATUS_MESSAGES_FIELDS: &[Field] = &[
    Field::optional("remoteJid", Shape::String, "Only updates for this chat"),
    Field::optional("id", Shape::String, "Only the update with this message ID"),
    PAGE,
    OFFSET,
];

pub(in crate::catalog) static FIND_STATUS_MESSAGES: OperationDef = OperationDef {
    name: "find_status_messages",
    title: "Find message status updates",
    description: "Search delivery/read status updates of messages, paginated.",
    outcome: "Status messages fetched",
    route: Route::instance(HttpMethod::Post, "chat", "findStatusMessage"),
    fields: FIND_STATUS_MESSAGES_FIELDS,
    payload: find_status_messages,
    refine: None,
    response: ResponseKind::Json,
};

fn find_status_messages(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({
        "where": {
            "remoteJid": a.get("remoteJid"),
            "id": a.get("id"),
        },
        "page": a.get("page"),
        "offset": a.get("offset"),
    }))
}

pub(in crate::catalog) static FIND_CHATS: OperationDef = OperationDef {
    name: "find_chats",
    title: "Find chats",
    description: "List the instance's chats.",
    outcome: "Chats fetched",
    route: Route::instance(HttpMethod::Post, "chat", "findChats"),
    fields: &[],
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static FETCH_PROFILE: OperationDef = OperationDef {
    name: "fetch_profile",
    title: "Fetch profile",
    description: "Get the public profile of a contact.",
    outcome: "Profile fetched",
    route: Route::instance(HttpMethod::Post, "chat", "fetchProfile"),
    fields: NUMBER_ONLY,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static FETCH_BUSINESS_PROFILE: OperationDef = OperationDef {
    name: "fetch_business_profile",
    title: "Fetch business profile",
    description: "Get the business profile of a WhatsApp Business contact.",
    outcome: "Business profile fetched",
    route: Route::instance(HttpMethod::Post, "chat", "fetchBusinessProfile"),
    fields: NUMBER_ONLY,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const UPDATE_PROFILE_NAME_FIELDS: &[Field] =
    &[Field::required("name", Shape::String, "New display name")];

pub(in crate::catalog) static UPDATE_PROFILE_NAME: OperationDef = OperationDef {
    name: "update_profile_name",
    title: "Update profile name",
    description: "Change the display name of the instance's own profile.",
    outcome: "Profile name updated",
    route: Route::instance(HttpMethod::Post, "chat", "updateProfileName"),
    fields: UPDATE_PROFILE_NAME_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const UPDATE_PROFILE_STATUS_FIELDS: &[Field] =
    &[Field::required("status", Shape::String, "New about/status text")];

pub(in crate::catalog) static UPDATE_PROFILE_STATUS: OperationDef = OperationDef {
    name: "update_profile_status",
    title: "Update profile status",
    description: "Change the about text of the instance's own profile.",
    outcome: "Profile status updated",
    route: Route::instance(HttpMethod::Post, "chat", "updateProfileStatus"),
    fields: UPDATE_PROFILE_STATUS_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const UPDATE_PROFILE_PICTURE_FIELDS: &[Field] = &[Field::required(
    "picture",
    Shape::String,
    "Public URL of the new picture",
)];

pub(in crate::catalog) static UPDATE_PROFILE_PICTURE: OperationDef = OperationDef {
    name: "update_profile_picture",
    title: "Update profile picture",
    description: "Change the picture of the instance's own profile.",
    outcome: "Profile picture updated",
    route: Route::instance(HttpMethod::Post, "chat", "updateProfilePicture"),
    fields: UPDATE_PROFILE_PICTURE_FIELDS,
    payload: update_profile_picture,
    refine: None,
    response: ResponseKind::Json,
};

fn update_profile_picture(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({ "picture": { "url": a.get("picture") } }))
}

pub(in crate::catalog) static REMOVE_PROFILE_PICTURE: OperationDef = OperationDef {
    name: "remove_profile_picture",
    title: "Remove profile picture",
    description: "Remove the picture of the instance's own profile.",
    outcome: "Profile picture removed",
    route: Route::instance(HttpMethod::Delete, "chat", "removeProfilePicture"),
    fields: &[],
    payload: no_payload,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static FETCH_PRIVACY_SETTINGS: OperationDef = OperationDef {
    name: "fetch_privacy_settings",
    title: "Fetch privacy settings",
    description: "Get the privacy settings of the instance's account.",
    outcome: "Privacy settings fetched",
    route: Route::instance(HttpMethod::Get, "chat", "fetchPrivacySettings"),
    fields: &[],
    payload: no_payload,
    refine: None,
    response: ResponseKind::Json,
};

const AUDIENCE: Shape = Shape::Enum(&["all", "contacts", "contact_blacklist", "none"]);

const UPDATE_PRIVACY_SETTINGS_FIELDS: &[Field] = &[
    Field::required("readreceipts", Shape::Enum(&["all", "none"]), "Send read receipts"),
    Field::required("profile", AUDIENCE, "Who can see the profile picture"),
    Field::required("status", AUDIENCE, "Who can see status updates"),
    Field::required(
        "online",
        Shape::Enum(&["all", "match_last_seen"]),
        "Who can see when you are online",
    ),
    Field::required("last", AUDIENCE, "Who can see last seen"),
    Field::required(
        "groupadd",
        Shape::Enum(&["all", "contacts", "contact_blacklist"]),
        "Who can add you to groups",
    ),
];

pub(in crate::catalog) static UPDATE_PRIVACY_SETTINGS: OperationDef = OperationDef {
    name: "update_privacy_settings",
    title: "Update privacy settings",
    description: "Change the privacy settings of the instance's account.",
    outcome: "Privacy settings updated",
    route: Route::instance(HttpMethod::Post, "chat", "updatePrivacySettings"),
    fields: UPDATE_PRIVACY_SETTINGS_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};
