use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use crate::database::DatabaseError;

/// Face outline preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaceShape {
    Oval,
    Round,
    Square,
    Heart,
    Long,
}

impl FaceShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaceShape::Oval => "OVAL",
            FaceShape::Round => "ROUND",
            FaceShape::Square => "SQUARE",
            FaceShape::Heart => "HEART",
            FaceShape::Long => "LONG",
        }
    }
}

impl FromStr for FaceShape {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OVAL" => Ok(FaceShape::Oval),
            "ROUND" => Ok(FaceShape::Round),
            "SQUARE" => Ok(FaceShape::Square),
            "HEART" => Ok(FaceShape::Heart),
            "LONG" => Ok(FaceShape::Long),
            other => Err(DatabaseError::Decode(format!("unknown face shape '{}'", other))),
        }
    }
}

/// Skin finish preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Skin {
    Natural,
    Smooth,
    Bright,
    Matte,
}

impl Skin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skin::Natural => "NATURAL",
            Skin::Smooth => "SMOOTH",
            Skin::Bright => "BRIGHT",
            Skin::Matte => "MATTE",
        }
    }
}

impl FromStr for Skin {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NATURAL" => Ok(Skin::Natural),
            "SMOOTH" => Ok(Skin::Smooth),
            "BRIGHT" => Ok(Skin::Bright),
            "MATTE" => Ok(Skin::Matte),
            other => Err(DatabaseError::Decode(format!("unknown skin finish '{}'", other))),
        }
    }
}

/// The adjustable part of a correction, shared by inserts and updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionValues {
    pub shape: FaceShape,
    pub skin: Skin,
    pub eyes: i16,
    pub nose: i16,
    pub lips: i16,
    pub chin: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub id: i64,
    pub user_id: i64,
    pub shape: FaceShape,
    pub skin: Skin,
    pub eyes: i16,
    pub nose: i16,
    pub lips: i16,
    pub chin: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `corrections` row; enums are stored as text
#[derive(Debug, FromRow)]
pub(crate) struct CorrectionRow {
    pub id: i64,
    pub user_id: i64,
    pub shape: String,
    pub skin: String,
    pub eyes: i16,
    pub nose: i16,
    pub lips: i16,
    pub chin: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CorrectionRow> for Correction {
    type Error = DatabaseError;

    fn try_from(row: CorrectionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            shape: row.shape.parse()?,
            skin: row.skin.parse()?,
            eyes: row.eyes,
            nose: row.nose,
            lips: row.lips,
            chin: row.chin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
