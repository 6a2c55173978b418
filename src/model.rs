use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One medicine entry as the server returns it. The client never mutates
/// these; every screen visit refetches the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub medicine_name: String,
    pub stock: i64,
    pub compartment: i64,
    pub expiration_date: DateTime<Utc>,
}

/// Envelope of `GET /inventory`.
#[derive(Debug, Deserialize)]
pub struct InventoryResponse {
    pub inventory: Vec<InventoryItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    OnceADay,
    TwiceADay,
    ThreeTimesADay,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [
        Frequency::OnceADay,
        Frequency::TwiceADay,
        Frequency::ThreeTimesADay,
    ];

    /// Number of reminder times (and dosage entries) this frequency implies.
    pub fn dose_count(self) -> usize {
        match self {
            Frequency::OnceADay => 1,
            Frequency::TwiceADay => 2,
            Frequency::ThreeTimesADay => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::OnceADay => "Once a day",
            Frequency::TwiceADay => "Twice a day",
            Frequency::ThreeTimesADay => "3 times a day",
        }
    }
}

/// A reminder time paired with how many pills to take at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosageEntry {
    pub time: DateTime<Utc>,
    pub dosage: u32,
}

/// The finalized wizard output, sent to `POST /reminder`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderPayload {
    pub medication_name: String,
    pub frequency: String,
    pub dosages: Vec<DosageEntry>,
    pub compartment: u8,
}

// --- SORTING ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriteria {
    #[default]
    Default,
    Ascend,
    Descend,
    ExpDate,
    Stock,
    CompartmentAscend,
    CompartmentDescend,
}

impl SortCriteria {
    pub const ALL: [SortCriteria; 7] = [
        SortCriteria::Default,
        SortCriteria::Ascend,
        SortCriteria::Descend,
        SortCriteria::ExpDate,
        SortCriteria::Stock,
        SortCriteria::CompartmentAscend,
        SortCriteria::CompartmentDescend,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortCriteria::Default => "default",
            SortCriteria::Ascend => "name (a-z)",
            SortCriteria::Descend => "name (z-a)",
            SortCriteria::ExpDate => "expiration date",
            SortCriteria::Stock => "low stock first",
            SortCriteria::CompartmentAscend => "compartment (1-5)",
            SortCriteria::CompartmentDescend => "compartment (5-1)",
        }
    }

    /// Config token, matching the server-side naming.
    pub fn parse(s: &str) -> Option<SortCriteria> {
        match s {
            "default" => Some(SortCriteria::Default),
            "ascend" => Some(SortCriteria::Ascend),
            "descend" => Some(SortCriteria::Descend),
            "expDate" => Some(SortCriteria::ExpDate),
            "stock" => Some(SortCriteria::Stock),
            "compartment_ascend" => Some(SortCriteria::CompartmentAscend),
            "compartment_descend" => Some(SortCriteria::CompartmentDescend),
            _ => None,
        }
    }

    /// Cycle through criteria in the UI.
    pub fn next(self) -> SortCriteria {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Apply this criterion in place. All sorts are stable; `Default` keeps
    /// the server-provided order untouched.
    pub fn apply(self, items: &mut [InventoryItem]) {
        match self {
            SortCriteria::Default => {}
            SortCriteria::Ascend => items.sort_by(|a, b| name_key(a).cmp(&name_key(b))),
            SortCriteria::Descend => items.sort_by(|a, b| name_key(b).cmp(&name_key(a))),
            SortCriteria::ExpDate => {
                items.sort_by(|a, b| a.expiration_date.cmp(&b.expiration_date))
            }
            SortCriteria::Stock => items.sort_by(|a, b| a.stock.cmp(&b.stock)),
            SortCriteria::CompartmentAscend => {
                items.sort_by(|a, b| a.compartment.cmp(&b.compartment))
            }
            SortCriteria::CompartmentDescend => {
                items.sort_by(|a, b| b.compartment.cmp(&a.compartment))
            }
        }
    }
}

fn name_key(item: &InventoryItem) -> String {
    item.medicine_name.to_lowercase()
}

/// A nearby hospital from the geocoding search.
#[derive(Debug, Clone, PartialEq)]
pub struct Hospital {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}
