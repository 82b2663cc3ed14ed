use std::{fmt::Display, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

/// A movie as it goes over the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub poster_url: Option<String>,
    pub rating: Option<f64>,
    pub watched: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<movie::Model> for Movie {
    type Error = AppError;

    fn try_from(m: movie::Model) -> AppResult<Self> {
        Ok(Self {
            id: m.id,
            title: m.title,
            year: m.year,
            genre: m.genre,
            poster_url: m.poster_url,
            rating: m.rating,
            watched: m.watched,
            created_at: Timestamp::from_microsecond(m.created_at)?,
            updated_at: Timestamp::from_microsecond(m.updated_at)?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateMovie {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub poster_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub watched: Option<bool>,
}

/// A create request that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub poster_url: Option<String>,
    pub rating: Option<f64>,
    pub watched: bool,
}

impl CreateMovie {
    pub fn validate(self) -> AppResult<NewMovie> {
        let Some(title) = self.title else {
            return Err(AppError::validation("Title is required"));
        };
        check_rating(self.rating)?;

        Ok(NewMovie {
            title,
            year: self.year,
            genre: self.genre,
            poster_url: self.poster_url,
            rating: self.rating,
            watched: self.watched.unwrap_or(false),
        })
    }
}

/// Partial update. `None` means "keep the stored value", whether the field
/// was omitted or sent as `null`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MoviePatch {
    #[serde(default, deserialize_with = "trimmed")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub poster_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub watched: Option<bool>,
}

impl MoviePatch {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.as_deref().is_some_and(str::is_empty) {
            return Err(AppError::validation("Title cannot be empty"));
        }
        check_rating(self.rating)
    }

    /// Overlays the provided fields onto `current`. `updated_at` becomes
    /// `now`, bumped past the previous value if the clock has not moved.
    pub fn merge(self, current: movie::Model, now: i64) -> movie::Model {
        movie::Model {
            id: current.id,
            title: self.title.unwrap_or(current.title),
            year: self.year.or(current.year),
            genre: self.genre.or(current.genre),
            poster_url: self.poster_url.or(current.poster_url),
            rating: self.rating.or(current.rating),
            watched: self.watched.unwrap_or(current.watched),
            created_at: current.created_at,
            updated_at: now.max(current.updated_at.saturating_add(1)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

fn check_rating(rating: Option<f64>) -> AppResult<()> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(AppError::validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        ))),
        _ => Ok(()),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

/// Accepts a number, a numeric string, or a blank string (treated as absent).
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse().map(Some).map_err(|e| de::Error::custom(format!("invalid number {s:?}: {e}")))
        }
    }
}

fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(trimmed(deserializer)?.filter(|s| !s.is_empty()))
}
