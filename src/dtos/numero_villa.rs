//! NumeroVilla DTOs

use crate::entities::NumeroVilla;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumeroVillaDTO {
    pub villa_no: i64,
    pub villa_id: i64,
    pub detalle_especial: Option<String>,
}

impl From<NumeroVilla> for NumeroVillaDTO {
    fn from(value: NumeroVilla) -> Self {
        Self {
            villa_no: value.villa_no,
            villa_id: value.villa_id,
            detalle_especial: value.detalle_especial,
        }
    }
}

/// DTO per creare un numero di villa; `villa_no` is chosen by the caller
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNumeroVillaDTO {
    #[validate(range(min = 1, message = "VillaNo must be a positive number"))]
    pub villa_no: i64,

    #[validate(range(min = 1, message = "VillaId must be a positive number"))]
    pub villa_id: i64,

    #[serde(default)]
    pub detalle_especial: Option<String>,
}

impl CreateNumeroVillaDTO {
    pub fn into_entity(self, now: DateTime<Utc>) -> NumeroVilla {
        NumeroVilla {
            villa_no: self.villa_no,
            villa_id: self.villa_id,
            detalle_especial: self.detalle_especial,
            fecha_creacion: now,
            fecha_actualizacion: now,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNumeroVillaDTO {
    #[validate(range(min = 1, message = "VillaNo must be a positive number"))]
    pub villa_no: i64,

    #[validate(range(min = 1, message = "VillaId must be a positive number"))]
    pub villa_id: i64,

    #[serde(default)]
    pub detalle_especial: Option<String>,
}

impl UpdateNumeroVillaDTO {
    /// Same timestamp handling as `UpdateVillaDTO::into_entity`
    pub fn into_entity(self, now: DateTime<Utc>) -> NumeroVilla {
        NumeroVilla {
            villa_no: self.villa_no,
            villa_id: self.villa_id,
            detalle_especial: self.detalle_especial,
            fecha_creacion: now,
            fecha_actualizacion: now,
        }
    }
}
