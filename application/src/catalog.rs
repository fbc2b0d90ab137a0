//! The fixed tool catalog declared to the model.
//!
//! One definition function per tool, assembled by [`assistant_catalog`].
//! Argument names and enum values match the wire contract the handlers in
//! [`crate::dispatch`] expect.

use cadenza_domain::{ToolCatalog, ToolDefinition, ToolParameter};

pub const CHECK_USER: &str = "check_user";
pub const REGISTER_USER: &str = "register_user";
pub const ADD_EVENT: &str = "add_event";
pub const CHECK_TODAY_EVENTS: &str = "check_today_events";
pub const RECOGNIZE_SONG: &str = "recognize_song";
pub const GENERATE_AUDIO_FRAGMENT: &str = "generate_audio_fragment";
pub const MERGE_AUDIO: &str = "merge_audio";

const PRECISION_VALUES: [&str; 6] = [
    "exact_time",
    "morning",
    "afternoon",
    "evening",
    "during_day",
    "anytime",
];

const EVENT_KIND_VALUES: [&str; 5] = ["birthday", "errand", "reminder", "meeting", "deadline"];

/// The complete catalog used by the assistant.
pub fn assistant_catalog() -> ToolCatalog {
    ToolCatalog::new()
        .register(check_user_definition())
        .register(register_user_definition())
        .register(add_event_definition())
        .register(check_today_events_definition())
        .register(recognize_song_definition())
        .register(generate_audio_fragment_definition())
        .register(merge_audio_definition())
}

pub fn check_user_definition() -> ToolDefinition {
    ToolDefinition::new(
        CHECK_USER,
        "Check whether a user with the given handle is registered.",
    )
    .with_parameter(ToolParameter::new(
        "telegramName",
        "The user's chat handle",
        true,
    ))
}

pub fn register_user_definition() -> ToolDefinition {
    ToolDefinition::new(REGISTER_USER, "Register a new user by handle.").with_parameter(
        ToolParameter::new("telegramName", "The user's chat handle", true),
    )
}

pub fn add_event_definition() -> ToolDefinition {
    ToolDefinition::new(
        ADD_EVENT,
        "Store a new event (birthday, errand, reminder, meeting or deadline).",
    )
    .with_parameter(
        ToolParameter::new(
            "around",
            "Anchor time of the event as an ISO-8601 datetime",
            true,
        )
        .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("precision", "How precisely the time is known", true)
            .with_allowed_values(PRECISION_VALUES),
    )
    .with_parameter(ToolParameter::new(
        "description",
        "What the event is about",
        true,
    ))
    .with_parameter(
        ToolParameter::new("type", "Category of the event", true)
            .with_allowed_values(EVENT_KIND_VALUES),
    )
    .with_parameter(ToolParameter::new("author", "Who created the event", true))
}

pub fn check_today_events_definition() -> ToolDefinition {
    ToolDefinition::new(CHECK_TODAY_EVENTS, "List all events scheduled for today.")
}

pub fn recognize_song_definition() -> ToolDefinition {
    ToolDefinition::new(
        RECOGNIZE_SONG,
        "Identify a song from an uploaded audio message and return its metadata.",
    )
    .with_parameter(ToolParameter::new(
        "message_id",
        "Id of the message carrying the audio attachment",
        true,
    ))
}

pub fn generate_audio_fragment_definition() -> ToolDefinition {
    ToolDefinition::new(
        GENERATE_AUDIO_FRAGMENT,
        "Synthesize speech from text and deliver it to the user as an audio message.",
    )
    .with_parameter(ToolParameter::new("text", "Text or SSML to speak", true))
    .with_parameter(ToolParameter::new(
        "voice_name",
        "Voice to use (defaults to the configured voice)",
        false,
    ))
    .with_parameter(ToolParameter::new(
        "language_code",
        "BCP-47 language code (defaults to the configured language)",
        false,
    ))
}

pub fn merge_audio_definition() -> ToolDefinition {
    ToolDefinition::new(
        MERGE_AUDIO,
        "Concatenate an intro fragment with a main track and deliver the result to the user.",
    )
    .with_parameter(ToolParameter::new(
        "intro_audio",
        "Hex-encoded bytes of the intro fragment",
        true,
    ))
    .with_parameter(ToolParameter::new(
        "main_audio",
        "Hex-encoded bytes of the main track",
        true,
    ))
}
