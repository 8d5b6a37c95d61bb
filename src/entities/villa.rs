//! Villa entity

use crate::repositories::{Entity, SqlValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Villa {
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

impl Villa {
    /// Case-insensitive name comparison used by the uniqueness checks
    pub fn has_name(&self, nombre: &str) -> bool {
        self.nombre.to_lowercase() == nombre.to_lowercase()
    }
}

impl Entity for Villa {
    const TABLE: &'static str = "Villas";
    const KEY_COLUMN: &'static str = "id";
    const KEY_GENERATED: bool = true;
    const INSERT_ONLY_COLUMNS: &'static [&'static str] = &["fecha_creacion"];
    const COLUMNS: &'static [&'static str] = &[
        "nombre",
        "detalle",
        "tarifa",
        "ocupantes",
        "area",
        "image_url",
        "amenidad",
        "fecha_actualizacion",
    ];

    fn key(&self) -> i64 {
        self.id
    }

    fn assign_key(&mut self, key: i64) {
        self.id = key;
    }

    fn insert_only_values(&self) -> Vec<SqlValue> {
        vec![SqlValue::Timestamp(self.fecha_creacion)]
    }

    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.nombre.clone()),
            SqlValue::Text(self.detalle.clone()),
            SqlValue::Real(self.tarifa),
            SqlValue::Integer(i64::from(self.ocupantes)),
            SqlValue::Integer(i64::from(self.area)),
            SqlValue::Text(self.image_url.clone()),
            SqlValue::Text(self.amenidad.clone()),
            SqlValue::Timestamp(self.fecha_actualizacion),
        ]
    }
}
