use crate::client::FetchError;
use crate::model::{Hospital, InventoryItem, ReminderPayload};
use crate::report::ReportData;
use std::path::PathBuf;

/// Requests from the UI loop to the network task.
#[derive(Debug)]
pub enum Action {
    FetchInventory { seq: u64 },
    SubmitReminder(ReminderPayload),
    RegisterPushToken(String),
    ScanHospitals,
    GenerateReport(ReportData),
    Quit,
}

/// Results flowing back from the network task to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    InventoryLoaded {
        seq: u64,
        result: Result<Vec<InventoryItem>, FetchError>,
    },
    ReminderSubmitted(Result<(), FetchError>),
    HospitalsLoaded(Result<Vec<Hospital>, String>),
    ReportReady(Result<PathBuf, String>),
    Status(String),
    Error(String),
}
