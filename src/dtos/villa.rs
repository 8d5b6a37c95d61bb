//! Villa DTOs

use crate::entities::Villa;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VillaDTO {
    pub id: i64,
    pub nombre: String,
    pub detalle: String,
    pub tarifa: f64,
    pub ocupantes: i32,
    pub area: i32,
    pub image_url: String,
    pub amenidad: String,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl From<Villa> for VillaDTO {
    fn from(value: Villa) -> Self {
        Self {
            id: value.id,
            nombre: value.nombre,
            detalle: value.detalle,
            tarifa: value.tarifa,
            ocupantes: value.ocupantes,
            area: value.area,
            image_url: value.image_url,
            amenidad: value.amenidad,
            fecha_creacion: value.fecha_creacion,
            fecha_actualizacion: value.fecha_actualizacion,
        }
    }
}

/// DTO per creare una nuova villa (senza id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVillaDTO {
    #[validate(length(min = 1, max = 30, message = "Nombre must be between 1 and 30 characters"))]
    pub nombre: String,

    #[serde(default)]
    pub detalle: String,

    #[validate(range(exclusive_min = 0.0, message = "Tarifa must be greater than zero"))]
    pub tarifa: f64,

    #[serde(default)]
    #[validate(range(min = 0, message = "Ocupantes cannot be negative"))]
    pub ocupantes: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "Area cannot be negative"))]
    pub area: i32,

    #[serde(default)]
    pub image_url: String,

    #[serde(default)]
    pub amenidad: String,
}

impl CreateVillaDTO {
    /// New villa with both timestamps set to `now`; the key is assigned on insert
    pub fn into_entity(self, now: DateTime<Utc>) -> Villa {
        Villa {
            id: 0,
            nombre: self.nombre,
            detalle: self.detalle,
            tarifa: self.tarifa,
            ocupantes: self.ocupantes,
            area: self.area,
            image_url: self.image_url,
            amenidad: self.amenidad,
            fecha_creacion: now,
            fecha_actualizacion: now,
        }
    }
}

/// DTO per aggiornare una villa: full replace and patch target
///
/// `Default` gives the value a field is reset to by a patch `remove`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVillaDTO {
    #[validate(range(min = 1, message = "Id must be a positive number"))]
    pub id: i64,

    #[validate(length(min = 1, max = 30, message = "Nombre must be between 1 and 30 characters"))]
    pub nombre: String,

    #[serde(default)]
    pub detalle: String,

    #[validate(range(exclusive_min = 0.0, message = "Tarifa must be greater than zero"))]
    pub tarifa: f64,

    #[serde(default)]
    #[validate(range(min = 0, message = "Ocupantes cannot be negative"))]
    pub ocupantes: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "Area cannot be negative"))]
    pub area: i32,

    #[serde(default)]
    pub image_url: String,

    #[serde(default)]
    pub amenidad: String,
}

impl From<Villa> for UpdateVillaDTO {
    fn from(value: Villa) -> Self {
        Self {
            id: value.id,
            nombre: value.nombre,
            detalle: value.detalle,
            tarifa: value.tarifa,
            ocupantes: value.ocupantes,
            area: value.area,
            image_url: value.image_url,
            amenidad: value.amenidad,
        }
    }
}

impl UpdateVillaDTO {
    /// Villa carrying the DTO's fields
    ///
    /// The DTO has no timestamps: both are set to `now`. The repository update
    /// never writes `fecha_creacion` and stamps `fecha_actualizacion` itself.
    pub fn into_entity(self, now: DateTime<Utc>) -> Villa {
        Villa {
            id: self.id,
            nombre: self.nombre,
            detalle: self.detalle,
            tarifa: self.tarifa,
            ocupantes: self.ocupantes,
            area: self.area,
            image_url: self.image_url,
            amenidad: self.amenidad,
            fecha_creacion: now,
            fecha_actualizacion: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CreateVillaDTO, UpdateVillaDTO};
    use serde_json::json;
    use validator::Validate;

    #[test]
    fn test_create_dto_defaults_optional_fields() {
        let dto: CreateVillaDTO =
            serde_json::from_value(json!({"nombre": "Villa Sol", "tarifa": 120.5}))
                .expect("valid body");

        assert_eq!(dto.ocupantes, 0);
        assert_eq!(dto.image_url, "");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_dto_rejects_long_name_and_zero_tariff() {
        let dto = CreateVillaDTO {
            nombre: "x".repeat(31),
            detalle: String::new(),
            tarifa: 0.0,
            ocupantes: 1,
            area: 1,
            image_url: String::new(),
            amenidad: String::new(),
        };

        let errors = dto.validate().expect_err("invalid dto");
        let fields = errors.field_errors();
        assert!(fields.contains_key("nombre"));
        assert!(fields.contains_key("tarifa"));
    }

    #[test]
    fn test_update_dto_wire_names() {
        let value = serde_json::to_value(UpdateVillaDTO::default()).expect("serializable");
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("tarifa").is_some());
    }
}
