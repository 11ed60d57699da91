//! The closed capability table and per-capability input binding schemas.
//!
//! A capability is a closed, named unit of executable behavior. The table
//! maps `(verb.class, object.type, verb.action)` triples to capabilities and
//! is fixed at build time; there is no dynamic discovery.

use serde::{Deserialize, Serialize};

use crate::dsl::{ObjectType, VerbClass};

/// Closed set of capability identifiers.
///
/// The reference executors cover the FILE, MEDIA, APP, NAVIGATE, and SEARCH
/// families. The remaining entries resolve in the compiler but have no
/// reference executor; every executor's gate rejects them with
/// `UNSUPPORTED_CAPABILITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)] // Variant names are the capability ids themselves.
pub enum CapabilityId {
    #[serde(rename = "FILE_MOVE")]
    FileMove,
    #[serde(rename = "FILE_COPY")]
    FileCopy,
    #[serde(rename = "FILE_DELETE")]
    FileDelete,
    #[serde(rename = "FILE_RENAME")]
    FileRename,
    #[serde(rename = "FILE_SHARE")]
    FileShare,
    #[serde(rename = "FILE_COMPRESS")]
    FileCompress,
    #[serde(rename = "FILE_ENCRYPT")]
    FileEncrypt,
    #[serde(rename = "FOLDER_CREATE")]
    FolderCreate,
    #[serde(rename = "FOLDER_DELETE")]
    FolderDelete,
    #[serde(rename = "EMAIL_SEND")]
    EmailSend,
    #[serde(rename = "EMAIL_EXTRACT")]
    EmailExtract,
    #[serde(rename = "DATASET_FILTER")]
    DatasetFilter,
    #[serde(rename = "DEVICE_NOTIFY")]
    DeviceNotify,
    #[serde(rename = "MEDIA_PLAY")]
    MediaPlay,
    #[serde(rename = "MEDIA_PAUSE")]
    MediaPause,
    #[serde(rename = "MEDIA_STOP")]
    MediaStop,
    #[serde(rename = "MEDIA_SEEK")]
    MediaSeek,
    #[serde(rename = "APP_LAUNCH")]
    AppLaunch,
    #[serde(rename = "APP_FOCUS")]
    AppFocus,
    #[serde(rename = "APP_CLOSE")]
    AppClose,
    #[serde(rename = "NAVIGATE_APP")]
    NavigateApp,
    #[serde(rename = "NAVIGATE_WINDOW")]
    NavigateWindow,
    #[serde(rename = "NAVIGATE_URL")]
    NavigateUrl,
    #[serde(rename = "NAVIGATE_FILE")]
    NavigateFile,
    #[serde(rename = "SEARCH_FILES")]
    SearchFiles,
    #[serde(rename = "SEARCH_EMAILS")]
    SearchEmails,
    #[serde(rename = "SEARCH_DATASETS")]
    SearchDatasets,
}

impl std::fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CapabilityId {
    /// Returns the stable wire spelling of this capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileMove => "FILE_MOVE",
            Self::FileCopy => "FILE_COPY",
            Self::FileDelete => "FILE_DELETE",
            Self::FileRename => "FILE_RENAME",
            Self::FileShare => "FILE_SHARE",
            Self::FileCompress => "FILE_COMPRESS",
            Self::FileEncrypt => "FILE_ENCRYPT",
            Self::FolderCreate => "FOLDER_CREATE",
            Self::FolderDelete => "FOLDER_DELETE",
            Self::EmailSend => "EMAIL_SEND",
            Self::EmailExtract => "EMAIL_EXTRACT",
            Self::DatasetFilter => "DATASET_FILTER",
            Self::DeviceNotify => "DEVICE_NOTIFY",
            Self::MediaPlay => "MEDIA_PLAY",
            Self::MediaPause => "MEDIA_PAUSE",
            Self::MediaStop => "MEDIA_STOP",
            Self::MediaSeek => "MEDIA_SEEK",
            Self::AppLaunch => "APP_LAUNCH",
            Self::AppFocus => "APP_FOCUS",
            Self::AppClose => "APP_CLOSE",
            Self::NavigateApp => "NAVIGATE_APP",
            Self::NavigateWindow => "NAVIGATE_WINDOW",
            Self::NavigateUrl => "NAVIGATE_URL",
            Self::NavigateFile => "NAVIGATE_FILE",
            Self::SearchFiles => "SEARCH_FILES",
            Self::SearchEmails => "SEARCH_EMAILS",
            Self::SearchDatasets => "SEARCH_DATASETS",
        }
    }
}

/// Where a bound input value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSource {
    /// The statement's object identifier, verbatim.
    ObjectIdentifier,
    /// The statement's metadata scope, verbatim.
    Scope,
    /// A caller-supplied auxiliary binding, verbatim.
    Aux,
    /// A constant fixed by the capability itself.
    Const(&'static str),
}

/// One required input key of a capability schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingSpec {
    /// Well-known input key, e.g. `source_path`.
    pub key: &'static str,
    /// Where the value is taken from.
    pub source: BindingSource,
}

const fn bind(key: &'static str, source: BindingSource) -> BindingSpec {
    BindingSpec { key, source }
}

/// One row of the closed capability table.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityEntry {
    /// Verb class of the resolving triple.
    pub verb_class: VerbClass,
    /// Object type of the resolving triple.
    pub object_type: ObjectType,
    /// Canonical action spelling of the resolving triple.
    pub action: &'static str,
    /// The capability the triple resolves to.
    pub capability: CapabilityId,
    /// Required input keys and their sources.
    pub schema: &'static [BindingSpec],
}

use self::BindingSource::{Aux, Const, ObjectIdentifier, Scope};
use self::CapabilityId::{
    AppClose, AppFocus, AppLaunch, DatasetFilter, DeviceNotify, EmailExtract, EmailSend,
    FileCompress, FileCopy, FileDelete, FileEncrypt, FileMove, FileRename, FileShare,
    FolderCreate, FolderDelete, MediaPause, MediaPlay, MediaSeek, MediaStop, NavigateApp,
    NavigateFile, NavigateUrl, NavigateWindow, SearchDatasets, SearchEmails, SearchFiles,
};

const TWO_PATHS: &[BindingSpec] = &[
    bind("source_path", ObjectIdentifier),
    bind("destination_path", Aux),
];
const ONE_PATH: &[BindingSpec] = &[bind("source_path", ObjectIdentifier)];
const MESSAGE_ID: &[BindingSpec] = &[bind("message_id", ObjectIdentifier)];
const MEDIA: &[BindingSpec] = &[
    bind("target_device", ObjectIdentifier),
    bind("media_uri", Aux),
];
const MEDIA_SEEK: &[BindingSpec] = &[
    bind("target_device", ObjectIdentifier),
    bind("media_uri", Aux),
    bind("position_seconds", Aux),
];
const APP: &[BindingSpec] = &[
    bind("app_id", ObjectIdentifier),
    bind("target_environment", Aux),
];
const SEARCH: &[BindingSpec] = &[
    bind("query", Aux),
    bind("max_results", Aux),
    bind("target_scope", Scope),
];

const fn navigate(target_type: &'static str) -> [BindingSpec; 4] {
    [
        bind("target_type", Const(target_type)),
        bind("target_id", ObjectIdentifier),
        bind("navigation_mode", Aux),
        bind("focus_policy", Aux),
    ]
}

const NAVIGATE_APP_SCHEMA: [BindingSpec; 4] = navigate("app");
const NAVIGATE_WINDOW_SCHEMA: [BindingSpec; 4] = navigate("window");
const NAVIGATE_URL_SCHEMA: [BindingSpec; 4] = navigate("url");
const NAVIGATE_FILE_SCHEMA: [BindingSpec; 4] = navigate("file");

/// The closed capability table. Order is immaterial; triples are unique.
pub const CAPABILITY_TABLE: &[CapabilityEntry] = &[
    entry(VerbClass::Mutate, ObjectType::File, "MOVE", FileMove, TWO_PATHS),
    entry(VerbClass::Mutate, ObjectType::File, "RENAME", FileRename, TWO_PATHS),
    entry(VerbClass::Mutate, ObjectType::File, "DELETE", FileDelete, ONE_PATH),
    entry(VerbClass::Mutate, ObjectType::Folder, "CREATE", FolderCreate, ONE_PATH),
    entry(VerbClass::Mutate, ObjectType::Folder, "DELETE", FolderDelete, ONE_PATH),
    entry(VerbClass::Transform, ObjectType::File, "COMPRESS", FileCompress, ONE_PATH),
    entry(VerbClass::Transform, ObjectType::File, "ENCRYPT", FileEncrypt, ONE_PATH),
    entry(VerbClass::Transform, ObjectType::Email, "EXTRACT", EmailExtract, MESSAGE_ID),
    entry(
        VerbClass::Transform,
        ObjectType::Dataset,
        "FILTER",
        DatasetFilter,
        &[bind("dataset_id", ObjectIdentifier), bind("predicate", Aux)],
    ),
    entry(VerbClass::Disseminate, ObjectType::File, "COPY", FileCopy, TWO_PATHS),
    entry(VerbClass::Disseminate, ObjectType::File, "SHARE", FileShare, ONE_PATH),
    entry(VerbClass::Disseminate, ObjectType::Email, "SEND", EmailSend, MESSAGE_ID),
    entry(
        VerbClass::Disseminate,
        ObjectType::Device,
        "NOTIFY",
        DeviceNotify,
        &[bind("target_device", ObjectIdentifier), bind("message", Aux)],
    ),
    entry(VerbClass::Mutate, ObjectType::Device, "PLAY", MediaPlay, MEDIA),
    entry(VerbClass::Mutate, ObjectType::Device, "PAUSE", MediaPause, MEDIA),
    entry(VerbClass::Mutate, ObjectType::Device, "STOP", MediaStop, MEDIA),
    entry(VerbClass::Mutate, ObjectType::Device, "SEEK", MediaSeek, MEDIA_SEEK),
    entry(VerbClass::Mutate, ObjectType::Device, "LAUNCH", AppLaunch, APP),
    entry(VerbClass::Mutate, ObjectType::Device, "FOCUS", AppFocus, APP),
    entry(VerbClass::Mutate, ObjectType::Device, "CLOSE", AppClose, APP),
    entry(
        VerbClass::Mutate,
        ObjectType::Device,
        "NAVIGATE_APP",
        NavigateApp,
        &NAVIGATE_APP_SCHEMA,
    ),
    entry(
        VerbClass::Mutate,
        ObjectType::Device,
        "NAVIGATE_WINDOW",
        NavigateWindow,
        &NAVIGATE_WINDOW_SCHEMA,
    ),
    entry(
        VerbClass::Mutate,
        ObjectType::Device,
        "NAVIGATE_URL",
        NavigateUrl,
        &NAVIGATE_URL_SCHEMA,
    ),
    entry(
        VerbClass::Mutate,
        ObjectType::Device,
        "NAVIGATE_FILE",
        NavigateFile,
        &NAVIGATE_FILE_SCHEMA,
    ),
    entry(VerbClass::Transform, ObjectType::Folder, "SEARCH", SearchFiles, SEARCH),
    entry(VerbClass::Transform, ObjectType::Email, "SEARCH", SearchEmails, SEARCH),
    entry(VerbClass::Transform, ObjectType::Dataset, "SEARCH", SearchDatasets, SEARCH),
];

const fn entry(
    verb_class: VerbClass,
    object_type: ObjectType,
    action: &'static str,
    capability: CapabilityId,
    schema: &'static [BindingSpec],
) -> CapabilityEntry {
    CapabilityEntry {
        verb_class,
        object_type,
        action,
        capability,
        schema,
    }
}

/// Looks up a triple with the exact canonical action spelling.
#[must_use]
pub fn lookup(
    verb_class: VerbClass,
    object_type: ObjectType,
    action: &str,
) -> Option<&'static CapabilityEntry> {
    CAPABILITY_TABLE.iter().find(|e| {
        e.verb_class == verb_class && e.object_type == object_type && e.action == action
    })
}

/// Looks up a triple ignoring ASCII case on the action.
///
/// Used to distinguish a misspelled registered action (`UNSUPPORTED_ACTION`)
/// from a triple that was never registered (`UNKNOWN_CAPABILITY`).
#[must_use]
pub fn lookup_ignore_case(
    verb_class: VerbClass,
    object_type: ObjectType,
    action: &str,
) -> Option<&'static CapabilityEntry> {
    CAPABILITY_TABLE.iter().find(|e| {
        e.verb_class == verb_class
            && e.object_type == object_type
            && e.action.eq_ignore_ascii_case(action)
    })
}
