// src/database/models.rs
use super::types::CoercedFloat;
use crate::models::CometRecord;

/// Row of the comet projection, before output normalization
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CometRow {
    name: Option<String>,
    diameter: CoercedFloat,
    eccentricity: CoercedFloat,
    inclination: CoercedFloat,
    perihelion: CoercedFloat,
    #[sqlx(rename = "M1")]
    m1: CoercedFloat,
    #[sqlx(rename = "Q")]
    aphelion: CoercedFloat,
    n: CoercedFloat,
    tp_cal: String,
}

impl From<CometRow> for CometRecord {
    fn from(row: CometRow) -> Self {
        Self {
            name: row.name.unwrap_or_default(),
            diameter: row.diameter.into(),
            eccentricity: row.eccentricity.into(),
            inclination: row.inclination.into(),
            perihelion: row.perihelion.into(),
            m1: row.m1.into(),
            aphelion: row.aphelion.into(),
            n: row.n.into(),
            tp_cal: row.tp_cal,
        }
    }
}
