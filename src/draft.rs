use crate::model::{DosageEntry, Frequency, ReminderPayload};
use chrono::{DateTime, Utc};
use std::fmt;

/// Position in the add-reminder wizard. Strictly linear; the only way
/// backwards is a full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    NameEntry,
    FrequencySelection,
    TimeSelection,
    DosageEntry,
    CompartmentSelection,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    EmptyName,
    TimeCountMismatch { expected: usize, got: usize },
    IncompletePills,
    CompartmentRequired,
    CompartmentInvalid,
    NotReady,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::EmptyName => write!(f, "Medication name cannot be empty."),
            DraftError::TimeCountMismatch { expected, got } => {
                write!(f, "Expected {} reminder time(s), got {}.", expected, got)
            }
            DraftError::IncompletePills => {
                write!(f, "Complete your selection by adding the necessary pill(s).")
            }
            DraftError::CompartmentRequired => write!(
                f,
                "Compartment number is required. Please enter a number between 1 and 5."
            ),
            DraftError::CompartmentInvalid => {
                write!(f, "Please enter a valid compartment number between 1 and 5.")
            }
            DraftError::NotReady => write!(f, "Reminder is missing required fields."),
        }
    }
}

impl std::error::Error for DraftError {}

/// The in-progress reminder being assembled across the wizard screens.
/// One instance lives per wizard session; nothing leaves it until
/// `payload()` at the Submit step. Abandoning the wizard calls `reset()`.
#[derive(Debug, Clone, Default)]
pub struct ReminderDraft {
    step: WizardStep,
    medication_name: String,
    frequency: Option<Frequency>,
    reminder_times: Vec<DateTime<Utc>>,
    dosages: Vec<DosageEntry>,
    // Raw field text; kept as typed so the user can clear and retype.
    compartment: String,
}

impl ReminderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn medication_name(&self) -> &str {
        &self.medication_name
    }

    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    pub fn reminder_times(&self) -> &[DateTime<Utc>] {
        &self.reminder_times
    }

    pub fn dosages(&self) -> &[DosageEntry] {
        &self.dosages
    }

    pub fn compartment(&self) -> &str {
        &self.compartment
    }

    /// Back to an empty draft at the first step. Called on wizard entry,
    /// successful submission, and abandonment.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_medication_name(&mut self, name: &str) -> Result<(), DraftError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DraftError::EmptyName);
        }
        self.medication_name = trimmed.to_string();
        // Renaming restarts everything downstream.
        self.frequency = None;
        self.reminder_times.clear();
        self.dosages.clear();
        self.compartment.clear();
        self.step = WizardStep::FrequencySelection;
        Ok(())
    }

    /// Locking in a frequency clears any previously collected times and
    /// dosages; the wizard gathers times next.
    pub fn set_frequency(&mut self, frequency: Frequency) -> Result<(), DraftError> {
        if self.medication_name.is_empty() {
            return Err(DraftError::NotReady);
        }
        self.frequency = Some(frequency);
        self.reminder_times.clear();
        self.dosages.clear();
        self.step = WizardStep::TimeSelection;
        Ok(())
    }

    pub fn set_times(&mut self, times: Vec<DateTime<Utc>>) -> Result<(), DraftError> {
        let frequency = self.frequency.ok_or(DraftError::NotReady)?;
        let expected = frequency.dose_count();
        if times.len() != expected {
            return Err(DraftError::TimeCountMismatch {
                expected,
                got: times.len(),
            });
        }
        self.reminder_times = times;
        self.step = WizardStep::DosageEntry;
        Ok(())
    }

    pub fn set_frequency_and_times(
        &mut self,
        frequency: Frequency,
        times: Vec<DateTime<Utc>>,
    ) -> Result<(), DraftError> {
        self.set_frequency(frequency)?;
        self.set_times(times)
    }

    /// One raw pill count per reminder time. Every entry must parse as an
    /// integer greater than zero; on any failure the draft is left untouched.
    pub fn set_dosages(&mut self, counts: &[String]) -> Result<(), DraftError> {
        if self.reminder_times.is_empty() || counts.len() != self.reminder_times.len() {
            return Err(DraftError::IncompletePills);
        }

        let mut parsed = Vec::with_capacity(counts.len());
        for count in counts {
            match count.trim().parse::<u32>() {
                Ok(n) if n > 0 => parsed.push(n),
                _ => return Err(DraftError::IncompletePills),
            }
        }

        self.dosages = self
            .reminder_times
            .iter()
            .zip(parsed)
            .map(|(time, dosage)| DosageEntry {
                time: *time,
                dosage,
            })
            .collect();
        self.step = WizardStep::CompartmentSelection;
        Ok(())
    }

    /// Keystroke-level compartment input: only the empty string (still
    /// editing) or an integer in 1..=5 is stored. Anything else is dropped
    /// silently; the error comes later from `finalize_compartment`.
    pub fn set_compartment(&mut self, text: &str) {
        if text.is_empty() || matches!(text.parse::<u8>(), Ok(1..=5)) {
            self.compartment = text.to_string();
        }
    }

    pub fn finalize_compartment(&mut self) -> Result<(), DraftError> {
        if self.compartment.is_empty() {
            return Err(DraftError::CompartmentRequired);
        }
        match self.compartment.parse::<u8>() {
            Ok(1..=5) => {
                self.step = WizardStep::Submit;
                Ok(())
            }
            _ => Err(DraftError::CompartmentInvalid),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.step == WizardStep::Submit
            && !self.medication_name.is_empty()
            && self.frequency.is_some()
            && !self.dosages.is_empty()
            && self.dosages.len() == self.reminder_times.len()
            && matches!(self.compartment.parse::<u8>(), Ok(1..=5))
    }

    /// The composite submission body. Only available once every step has
    /// validated.
    pub fn payload(&self) -> Result<ReminderPayload, DraftError> {
        if !self.is_ready() {
            return Err(DraftError::NotReady);
        }
        let frequency = self.frequency.ok_or(DraftError::NotReady)?;
        let compartment = self
            .compartment
            .parse::<u8>()
            .map_err(|_| DraftError::CompartmentInvalid)?;
        Ok(ReminderPayload {
            medication_name: self.medication_name.clone(),
            frequency: frequency.label().to_string(),
            dosages: self.dosages.clone(),
            compartment,
        })
    }
}
