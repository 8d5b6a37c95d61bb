//! NumeroVilla entity - room number inside a villa

use crate::repositories::{Entity, SqlValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NumeroVilla {
    /// Caller-supplied primary key
    pub villa_no: i64,
    pub villa_id: i64,
    pub detalle_especial: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl Entity for NumeroVilla {
    const TABLE: &'static str = "NumeroVillas";
    const KEY_COLUMN: &'static str = "villa_no";
    const KEY_GENERATED: bool = false;
    const INSERT_ONLY_COLUMNS: &'static [&'static str] = &["fecha_creacion"];
    const COLUMNS: &'static [&'static str] =
        &["villa_id", "detalle_especial", "fecha_actualizacion"];

    fn key(&self) -> i64 {
        self.villa_no
    }

    fn assign_key(&mut self, key: i64) {
        self.villa_no = key;
    }

    fn insert_only_values(&self) -> Vec<SqlValue> {
        vec![SqlValue::Timestamp(self.fecha_creacion)]
    }

    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Integer(self.villa_id),
            SqlValue::OptionalText(self.detalle_especial.clone()),
            SqlValue::Timestamp(self.fecha_actualizacion),
        ]
    }
}
