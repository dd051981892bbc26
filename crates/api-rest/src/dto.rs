//! Request and response bodies for the REST API.
//!
//! JSON field names are camelCase to match the medication data model used by the mobile client.

use medtrack_core::{DailyProgress, Medication, MedicationForm, UpcomingDose};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// A medication as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRes {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub times: Vec<String>,
    pub taken: Vec<bool>,
    pub color: String,
    pub reminder_enabled: bool,
}

impl From<&Medication> for MedicationRes {
    fn from(med: &Medication) -> Self {
        Self {
            id: med.id().to_string(),
            name: med.name().to_string(),
            dosage: med.dosage().to_string(),
            frequency: med.frequency().to_string(),
            times: med.times().iter().map(ToString::to_string).collect(),
            taken: med.taken().to_vec(),
            color: med.colour().to_string(),
            reminder_enabled: med.reminder_enabled(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListMedicationsRes {
    pub medications: Vec<MedicationRes>,
}

/// Add-medication form. Blank entries in `times` are ignored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMedicationReq {
    #[schema(example = "Aspirin")]
    pub name: String,
    #[schema(example = "500mg")]
    pub dosage: String,
    #[schema(example = "Twice daily")]
    pub frequency: String,
    pub times: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub reminder_enabled: Option<bool>,
}

impl From<AddMedicationReq> for MedicationForm {
    fn from(req: AddMedicationReq) -> Self {
        MedicationForm {
            name: req.name,
            dosage: req.dosage,
            frequency: req.frequency,
            times: req.times,
            color: req.color,
            reminder_enabled: req.reminder_enabled,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRes {
    pub taken_doses: usize,
    pub total_doses: usize,
    pub progress_percentage: u8,
}

impl From<DailyProgress> for ProgressRes {
    fn from(p: DailyProgress) -> Self {
        Self {
            taken_doses: p.taken_doses,
            total_doses: p.total_doses,
            progress_percentage: p.progress_percentage,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDoseRes {
    pub medication_id: String,
    pub name: String,
    pub dosage: String,
    pub color: String,
    pub slot_index: usize,
    pub time: String,
}

impl From<UpcomingDose> for UpcomingDoseRes {
    fn from(d: UpcomingDose) -> Self {
        Self {
            medication_id: d.medication_id.to_string(),
            name: d.name,
            dosage: d.dosage,
            color: d.color.to_string(),
            slot_index: d.slot_index,
            time: d.time.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DosesRes {
    pub doses: Vec<UpcomingDoseRes>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpcomingParams {
    /// Maximum number of doses to return (default 3)
    pub limit: Option<usize>,
}
