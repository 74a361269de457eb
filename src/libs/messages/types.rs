/// Every user-facing message in the application.
///
/// API responses surface the Chinese record-keeping strings the web UI
/// expects; console lifecycle messages are English. Keeping them in one
/// enum means handlers and commands never embed literal text.
#[derive(Debug, Clone)]
pub enum Message {
    // === SLEEP SESSION MESSAGES ===
    SleepStarted,
    SleepRestarted,
    SleepCompleted,
    SleepEndedWithoutStart,
    SleepCustomAdded,

    // === MEAL MESSAGES ===
    MealLogged,
    MealCustomAdded,

    // === SHARED API MESSAGES ===
    RecordDeleted,
    RecordNotFound,
    MissingRequiredParams,
    InvalidRecordType,
    InvalidTimestamp(String),
    InvalidWindowDays(i64),

    // === STORAGE MESSAGES ===
    DbError,
    QueryFailed,
    InsertFailed,
    UpdateFailed,
    DeleteFailed,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved(String),    // path
    ConfigParseError,

    // === SERVER LIFECYCLE MESSAGES ===
    ServerListening(String), // address
    ServerShutdown,
}
