//! `/group/*`: group administration. `groupJid` travels as a query parameter.

use super::{OperationDef, ResponseKind, Route, arguments_as_body, arguments_as_query};
use crate::mapping::{Payload, ValidatedArguments};
use crate::schema::{DefaultValue, Field, Shape};
use crate::semantics::HttpMethod;
use serde_json::json;

const GROUP_JID: Field = Field::required("groupJid", Shape::String, "Group JID, e.g. 123456@g.us");

const PARTICIPANTS: Field = Field::required(
    "participants",
    Shape::non_empty_array(&Shape::String),
    "Participant phone numbers",
);

/// `groupJid` as query, everything else as body.
fn group_body(a: &ValidatedArguments) -> Payload {
    Payload::json(a.without(&["groupJid"])).with_query(a.query_pairs(&["groupJid"]))
}

const CREATE_GROUP_FIELDS: &[Field] = &[
    Field::required("subject", Shape::String, "Group name"),
    Field::optional("description", Shape::String, "Group description"),
    PARTICIPANTS,
];

pub(in crate::catalog) static CREATE_GROUP: OperationDef = OperationDef {
    name: "create_group",
    title: "Create group",
    description: "Create a group with the given participants.",
    outcome: "Group created",
    route: Route::instance(HttpMethod::Post, "group", "create"),
    fields: CREATE_GROUP_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const UPDATE_GROUP_PICTURE_FIELDS: &[Field] = &[
    GROUP_JID,
    Field::required("image", Shape::String, "Public URL of the new picture"),
];

pub(in crate::catalog) static UPDATE_GROUP_PICTURE: OperationDef = OperationDef {
    name: "update_group_picture",
    title: "Update group picture",
    description: "Change a group's picture.",
    outcome: "Group picture updated",
    route: Route::instance(HttpMethod::Post, "group", "updateGroupPicture"),
    fields: UPDATE_GROUP_PICTURE_FIELDS,
    payload: update_group_picture,
    refine: None,
    response: ResponseKind::Json,
};

fn update_group_picture(a: &ValidatedArguments) -> Payload {
    Payload::json(json!({ "url": a.get("image") })).with_query(a.query_pairs(&["groupJid"]))
}

const UPDATE_GROUP_SUBJECT_FIELDS: &[Field] = &[
    GROUP_JID,
    Field::required("subject", Shape::String, "New group name"),
];

pub(in crate::catalog) static UPDATE_GROUP_SUBJECT: OperationDef = OperationDef {
    name: "update_group_subject",
    title: "Update group subject",
    description: "Rename a group.",
    outcome: "Group subject updated",
    route: Route::instance(HttpMethod::Post, "group", "updateGroupSubject"),
    fields: UPDATE_GROUP_SUBJECT_FIELDS,
    payload: group_body,
    refine: None,
    response: ResponseKind::Json,
};

const UPDATE_GROUP_DESCRIPTION_FIELDS: &[Field] = &[
    GROUP_JID,
    Field::required("description", Shape::String, "New group description"),
];

pub(in crate::catalog) static UPDATE_GROUP_DESCRIPTION: OperationDef = OperationDef {
    name: "update_group_description",
    title: "Update group description",
    description: "Change a group's description.",
    outcome: "Group description updated",
    route: Route::instance(HttpMethod::Post, "group", "updateGroupDescription"),
    fields: UPDATE_GROUP_DESCRIPTION_FIELDS,
    payload: group_body,
    refine: None,
    response: ResponseKind::Json,
};

const GROUP_JID_ONLY: &[Field] = &[GROUP_JID];

pub(in crate::catalog) static FETCH_INVITE_CODE: OperationDef = OperationDef {
    name: "fetch_invite_code",
    title: "Fetch invite code",
    description: "Get a group's invite code and link.",
    outcome: "Invite code fetched",
    route: Route::instance(HttpMethod::Get, "group", "inviteCode"),
    fields: GROUP_JID_ONLY,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static REVOKE_INVITE_CODE: OperationDef = OperationDef {
    name: "revoke_invite_code",
    title: "Revoke invite code",
    description: "Revoke a group's invite code and issue a new one.",
    outcome: "Invite code revoked",
    route: Route::instance(HttpMethod::Post, "group", "revokeInviteCode"),
    fields: GROUP_JID_ONLY,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};

const SEND_GROUP_INVITE_FIELDS: &[Field] = &[
    GROUP_JID,
    Field::required("description", Shape::String, "Text sent along with the invite link"),
    Field::required(
        "numbers",
        Shape::non_empty_array(&Shape::String),
        "Phone numbers to invite",
    ),
];

pub(in crate::catalog) static SEND_GROUP_INVITE: OperationDef = OperationDef {
    name: "send_group_invite",
    title: "Send group invite",
    description: "Send a group's invite link to phone numbers.",
    outcome: "Group invite sent",
    route: Route::instance(HttpMethod::Post, "group", "sendInvite"),
    fields: SEND_GROUP_INVITE_FIELDS,
    payload: arguments_as_body,
    refine: None,
    response: ResponseKind::Json,
};

const FIND_GROUP_BY_INVITE_CODE_FIELDS: &[Field] = &[Field::required(
    "inviteCode",
    Shape::String,
    "Invite code (the last part of the invite link)",
)];

pub(in crate::catalog) static FIND_GROUP_BY_INVITE_CODE: OperationDef = OperationDef {
    name: "find_group_by_invite_code",
    title: "Find group by invite code",
    description: "Look up a group from its invite code.",
    outcome: "Group fetched",
    route: Route::instance(HttpMethod::Get, "group", "inviteInfo"),
    fields: FIND_GROUP_BY_INVITE_CODE_FIELDS,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static FIND_GROUP_INFO: OperationDef = OperationDef {
    name: "find_group_info",
    title: "Find group info",
    description: "Get a group's metadata.",
    outcome: "Group info fetched",
    route: Route::instance(HttpMethod::Get, "group", "findGroupInfos"),
    fields: GROUP_JID_ONLY,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};

const FETCH_ALL_GROUPS_FIELDS: &[Field] = &[Field::defaulted(
    "getParticipants",
    Shape::Boolean,
    DefaultValue::Bool(false),
    "Include each group's participants",
)];

pub(in crate::catalog) static FETCH_ALL_GROUPS: OperationDef = OperationDef {
    name: "fetch_all_groups",
    title: "List groups",
    description: "List every group the instance belongs to.",
    outcome: "Groups fetched",
    route: Route::instance(HttpMethod::Get, "group", "fetchAllGroups"),
    fields: FETCH_ALL_GROUPS_FIELDS,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static FIND_PARTICIPANTS: OperationDef = OperationDef {
    name: "find_participants",
    title: "List group participants",
    description: "List a group's participants and their roles.",
    outcome: "Participants fetched",
    route: Route::instance(HttpMethod::Get, "group", "participants"),
    fields: GROUP_JID_ONLY,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};

const UPDATE_PARTICIPANTS_FIELDS: &[Field] = &[
    GROUP_JID,
    Field::required(
        "action",
        Shape::Enum(&["add", "remove", "promote", "demote"]),
        "What to do with the participants",
    ),
    PARTICIPANTS,
];

pub(in crate::catalog) static UPDATE_PARTICIPANTS: OperationDef = OperationDef {
    name: "update_participants",
    title: "Update group participants",
    description: "Add, remove, promote or demote group participants.",
    outcome: "Participants updated",
    route: Route::instance(HttpMethod::Post, "group", "updateParticipant"),
    fields: UPDATE_PARTICIPANTS_FIELDS,
    payload: group_body,
    refine: None,
    response: ResponseKind::Json,
};

const UPDATE_GROUP_SETTING_FIELDS: &[Field] = &[
    GROUP_JID,
    Field::required(
        "action",
        Shape::Enum(&["announcement", "not_announcement", "locked", "unlocked"]),
        "announcement: only admins send; locked: only admins edit group info",
    ),
];

pub(in crate::catalog) static UPDATE_GROUP_SETTING: OperationDef = OperationDef {
    name: "update_group_setting",
    title: "Update group setting",
    description: "Restrict or open who can send messages or edit a group.",
    outcome: "Group setting updated",
    route: Route::instance(HttpMethod::Post, "group", "updateSetting"),
    fields: UPDATE_GROUP_SETTING_FIELDS,
    payload: group_body,
    refine: None,
    response: ResponseKind::Json,
};

const TOGGLE_EPHEMERAL_FIELDS: &[Field] = &[
    GROUP_JID,
    Field::required(
        "expiration",
        Shape::IntEnum(&[0, 86_400, 604_800, 7_776_000]),
        "Disappearing message timer in seconds (0 turns it off)",
    ),
];

pub(in crate::catalog) static TOGGLE_EPHEMERAL: OperationDef = OperationDef {
    name: "toggle_ephemeral",
    title: "Toggle disappearing messages",
    description: "Set or clear the disappearing-messages timer of a group.",
    outcome: "Disappearing messages updated",
    route: Route::instance(HttpMethod::Post, "group", "toggleEphemeral"),
    fields: TOGGLE_EPHEMERAL_FIELDS,
    payload: group_body,
    refine: None,
    response: ResponseKind::Json,
};

pub(in crate::catalog) static LEAVE_GROUP: OperationDef = OperationDef {
    name: "leave_group",
    title: "Leave group",
    description: "Leave a group.",
    outcome: "Left group",
    route: Route::instance(HttpMethod::Delete, "group", "leaveGroup"),
    fields: GROUP_JID_ONLY,
    payload: arguments_as_query,
    refine: None,
    response: ResponseKind::Json,
};
