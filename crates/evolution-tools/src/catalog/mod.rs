//! The closed tool catalog.
//!
//! Each exposed tool is one [`Operation`] variant. A variant resolves (exhaustively, at compile
//! time) to a static [`OperationDef`] holding its input schema, HTTP route, payload mapping and
//! response handling.

mod chat;
mod group;
mod instance;
mod message;
mod settings;

use crate::error::{ValidationError, Violation};
use crate::mapping::{Payload, ValidatedArguments};
use crate::schema::{self, Field, InputSchema};
use crate::semantics::HttpMethod;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Which path segment (if any) follows `/{resource}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The configured instance.
    Instance,
    /// Instance-management endpoints with no trailing segment.
    Global,
    /// The value of the named (required) argument.
    Argument(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Send the `apikey` header.
    ApiKey,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub resource: &'static str,
    pub action: &'static str,
    pub target: Target,
    pub auth: Auth,
}

impl Route {
    const fn instance(method: HttpMethod, resource: &'static str, action: &'static str) -> Self {
        Self {
            method,
            resource,
            action,
            target: Target::Instance,
            auth: Auth::ApiKey,
        }
    }

    const fn global(method: HttpMethod, resource: &'static str, action: &'static str) -> Self {
        Self {
            method,
            resource,
            action,
            target: Target::Global,
            auth: Auth::ApiKey,
        }
    }

    const fn unauthenticated(self) -> Self {
        Self {
            auth: Auth::None,
            ..self
        }
    }

    const fn targeting(self, argument: &'static str) -> Self {
        Self {
            target: Target::Argument(argument),
            ..self
        }
    }
}

/// How a successful response is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Embed the remote response as pretty JSON.
    Json,
    /// Binary media payload: report metadata only.
    MediaMetadata,
}

pub type PayloadFn = fn(&ValidatedArguments) -> Payload;
pub type RefineFn = fn(&ValidatedArguments) -> Option<Violation>;

pub struct OperationDef {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// First line of the success text, e.g. "Text message sent".
    pub outcome: &'static str,
    pub route: Route,
    pub fields: &'static [Field],
    pub payload: PayloadFn,
    /// Business rule checked after structural validation.
    pub refine: Option<RefineFn>,
    pub response: ResponseKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // instance lifecycle
    CreateInstance,
    FetchInstances,
    ConnectInstance,
    RestartInstance,
    ConnectionState,
    LogoutInstance,
    DeleteInstance,
    SetPresence,
    // settings & integrations
    SetSettings,
    FindSettings,
    SetWebhook,
    FindWebhook,
    SetProxy,
    FindProxy,
    // messaging
    SendText,
    SendMedia,
    SendVideoNote,
    SendVoiceNote,
    SendSticker,
    SendLocation,
    SendContact,
    SendReaction,
    SendPoll,
    SendList,
    SendButtons,
    SendStatus,
    // chats & profile
    CheckWhatsappNumbers,
    MarkAsRead,
    MarkChatUnread,
    ArchiveChat,
    DeleteMessage,
    EditMessage,
    SendPresence,
    UpdateBlockStatus,
    FetchProfilePicture,
    GetBase64FromMedia,
    FindContacts,
    FindMessages,
    FindStatusMessages,
    FindChats,
    FetchProfile,
    FetchBusinessProfile,
    UpdateProfileName,
    UpdateProfileStatus,
    UpdateProfilePicture,
    RemoveProfilePicture,
    FetchPrivacySettings,
    UpdatePrivacySettings,
    // groups
    CreateGroup,
    UpdateGroupPicture,
    UpdateGroupSubject,
    UpdateGroupDescription,
    FetchInviteCode,
    RevokeInviteCode,
    SendGroupInvite,
    FindGroupByInviteCode,
    FindGroupInfo,
    FetchAllGroups,
    FindParticipants,
    UpdateParticipants,
    UpdateGroupSetting,
    ToggleEphemeral,
    LeaveGroup,
}

impl Operation {
    /// Every operation, in listing order.
    pub const ALL: [Operation; 63] = [
        Operation::CreateInstance,
        Operation::FetchInstances,
        Operation::ConnectInstance,
        Operation::RestartInstance,
        Operation::ConnectionState,
        Operation::LogoutInstance,
        Operation::DeleteInstance,
        Operation::SetPresence,
        Operation::SetSettings,
        Operation::FindSettings,
        Operation::SetWebhook,
        Operation::FindWebhook,
        Operation::SetProxy,
        Operation::FindProxy,
        Operation::SendText,
        Operation::SendMedia,
        Operation::SendVideoNote,
        Operation::SendVoiceNote,
        Operation::SendSticker,
        Operation::SendLocation,
        Operation::SendContact,
        Operation::SendReaction,
        Operation::SendPoll,
        Operation::SendList,
        Operation::SendButtons,
        Operation::SendStatus,
        Operation::CheckWhatsappNumbers,
        Operation::MarkAsRead,
        Operation::MarkChatUnread,
        Operation::ArchiveChat,
        Operation::DeleteMessage,
        Operation::EditMessage,
        Operation::SendPresence,
        Operation::UpdateBlockStatus,
        Operation::FetchProfilePicture,
        Operation::GetBase64FromMedia,
        Operation::FindContacts,
        Operation::FindMessages,
        Operation::FindStatusMessages,
        Operation::FindChats,
        Operation::FetchProfile,
        Operation::FetchBusinessProfile,
        Operation::UpdateProfileName,
        Operation::UpdateProfileStatus,
        Operation::UpdateProfilePicture,
        Operation::RemoveProfilePicture,
        Operation::FetchPrivacySettings,
        Operation::UpdatePrivacySettings,
        Operation::CreateGroup,
        Operation::UpdateGroupPicture,
        Operation::UpdateGroupSubject,
        Operation::UpdateGroupDescription,
        Operation::FetchInviteCode,
        Operation::RevokeInviteCode,
        Operation::SendGroupInvite,
        Operation::FindGroupByInviteCode,
        Operation::FindGroupInfo,
        Operation::FetchAllGroups,
        Operation::FindParticipants,
        Operation::UpdateParticipants,
        Operation::UpdateGroupSetting,
        Operation::ToggleEphemeral,
        Operation::LeaveGroup,
    ];

    #[must_use]
    pub fn def(self) -> &'static OperationDef {
        match self {
            Operation::CreateInstance => &instance::CREATE_INSTANCE,
            Operation::FetchInstances => &instance::FETCH_INSTANCES,
            Operation::ConnectInstance => &instance::CONNECT_INSTANCE,
            Operation::RestartInstance => &instance::RESTART_INSTANCE,
            Operation::ConnectionState => &instance::CONNECTION_STATE,
            Operation::LogoutInstance => &instance::LOGOUT_INSTANCE,
            Operation::DeleteInstance => &instance::DELETE_INSTANCE,
            Operation::SetPresence => &instance::SET_PRESENCE,
            Operation::SetSettings => &settings::SET_SETTINGS,
            Operation::FindSettings => &settings::FIND_SETTINGS,
            Operation::SetWebhook => &settings::SET_WEBHOOK,
            Operation::FindWebhook => &settings::FIND_WEBHOOK,
            Operation::SetProxy => &settings::SET_PROXY,
            Operation::FindProxy => &settings::FIND_PROXY,
            Operation::SendText => &message::SEND_TEXT,
            Operation::SendMedia => &message::SEND_MEDIA,
            Operation::SendVideoNote => &message::SEND_VIDEO_NOTE,
            Operation::SendVoiceNote => &message::SEND_VOICE_NOTE,
            Operation::SendSticker => &message::SEND_STICKER,
            Operation::SendLocation => &message::SEND_LOCATION,
            Operation::SendContact => &message::SEND_CONTACT,
            Operation::SendReaction => &message::SEND_REACTION,
            Operation::SendPoll => &message::SEND_POLL,
            Operation::SendList => &message::SEND_LIST,
            Operation::SendButtons => &message::SEND_BUTTONS,
            Operation::SendStatus => &message::SEND_STATUS,
            Operation::CheckWhatsappNumbers => &chat::CHECK_WHATSAPP_NUMBERS,
            Operation::MarkAsRead => &chat::MARK_AS_READ,
            Operation::MarkChatUnread => &chat::MARK_CHAT_UNREAD,
            Operation::ArchiveChat => &chat::ARCHIVE_CHAT,
            Operation::DeleteMessage => &chat::DELETE_MESSAGE,
            Operation::EditMessage => &chat::EDIT_MESSAGE,
            Operation::SendPresence => &chat::SEND_PRESENCE,
            Operation::UpdateBlockStatus => &chat::UPDATE_BLOCK_STATUS,
            Operation::FetchProfilePicture => &chat::FETCH_PROFILE_PICTURE,
            Operation::GetBase64FromMedia => &chat::GET_BASE64_FROM_MEDIA,
            Operation::FindContacts => &chat::FIND_CONTACTS,
            Operation::FindMessages => &chat::FIND_MESSAGES,
            Operation::FindStatusMessages => &chat::FIND_STATUS_MESSAGES,
            Operation::FindChats => &chat::FIND_CHATS,
            Operation::FetchProfile => &chat::FETCH_PROFILE,
            Operation::FetchBusinessProfile => &chat::FETCH_BUSINESS_PROFILE,
            Operation::UpdateProfileName => &chat::UPDATE_PROFILE_NAME,
            Operation::UpdateProfileStatus => &chat::UPDATE_PROFILE_STATUS,
            Operation::UpdateProfilePicture => &chat::UPDATE_PROFILE_PICTURE,
            Operation::RemoveProfilePicture => &chat::REMOVE_PROFILE_PICTURE,
            Operation::FetchPrivacySettings => &chat::FETCH_PRIVACY_SETTINGS,
            Operation::UpdatePrivacySettings => &chat::UPDATE_PRIVACY_SETTINGS,
            Operation::CreateGroup => &group::CREATE_GROUP,
            Operation::UpdateGroupPicture => &group::UPDATE_GROUP_PICTURE,
            Operation::UpdateGroupSubject => &group::UPDATE_GROUP_SUBJECT,
            Operation::UpdateGroupDescription => &group::UPDATE_GROUP_DESCRIPTION,
            Operation::FetchInviteCode => &group::FETCH_INVITE_CODE,
            Operation::RevokeInviteCode => &group::REVOKE_INVITE_CODE,
            Operation::SendGroupInvite => &group::SEND_GROUP_INVITE,
            Operation::FindGroupByInviteCode => &group::FIND_GROUP_BY_INVITE_CODE,
            Operation::FindGroupInfo => &group::FIND_GROUP_INFO,
            Operation::FetchAllGroups => &group::FETCH_ALL_GROUPS,
            Operation::FindParticipants => &group::FIND_PARTICIPANTS,
            Operation::UpdateParticipants => &group::UPDATE_PARTICIPANTS,
            Operation::UpdateGroupSetting => &group::UPDATE_GROUP_SETTING,
            Operation::ToggleEphemeral => &group::TOGGLE_EPHEMERAL,
            Operation::LeaveGroup => &group::LEAVE_GROUP,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.def().name
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    #[must_use]
    pub fn input_schema(self) -> Value {
        schema::object_schema(self.def().fields)
    }

    /// Validate raw call arguments against this operation's schema and business rules.
    ///
    /// # Errors
    ///
    /// Returns every structural violation, plus the refinement violation (if any).
    pub fn validate(self, args: &Value) -> Result<ValidatedArguments, ValidationError> {
        let def = self.def();
        let structural = INPUT_SCHEMAS[self as usize].validate(args);

        // Refinements run on whatever structurally valid shape we have so a caller sees every
        // problem at once.
        let (validated, mut violations) = match structural {
            Ok(map) => (ValidatedArguments::new(map), Vec::new()),
            Err(e) => (partial_arguments(args), e.violations),
        };
        if let Some(refine) = def.refine
            && let Some(v) = refine(&validated)
            && !violations.iter().any(|existing| existing.path == v.path)
        {
            violations.push(v);
        }

        if violations.is_empty() {
            Ok(validated)
        } else {
            Err(ValidationError { violations })
        }
    }
}

/// Compiled input schemas, indexed by declaration order (the order of [`Operation::ALL`]).
static INPUT_SCHEMAS: LazyLock<Vec<InputSchema>> = LazyLock::new(|| {
    Operation::ALL
        .into_iter()
        .map(|op| InputSchema::compile(op.def().fields))
        .collect()
});

fn partial_arguments(args: &Value) -> ValidatedArguments {
    ValidatedArguments::new(args.as_object().cloned().unwrap_or_default())
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| crate::error::Error::UnknownOperation(s.to_string()))
    }
}

// Payload shapes shared by many operations.

fn no_payload(_: &ValidatedArguments) -> Payload {
    Payload::none()
}

fn arguments_as_body(args: &ValidatedArguments) -> Payload {
    Payload::json(args.to_value())
}

fn arguments_as_query(args: &ValidatedArguments) -> Payload {
    Payload::query(args.all_query_pairs())
}
