//! Exercise records as exchanged with the server and kept in the local cache
//!
//! Categorical values are stored as the lower-case display names of the corresponding domain
//! properties.

use ironlog_domain::{self as domain, Property};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub external_id: String,
    pub name: String,
    pub level: String,
    pub category: String,
    pub mechanic: Option<String>,
    pub equipment: Option<String>,
    pub force: Option<String>,
    pub primary_muscles: Vec<String>,
    pub secondary_muscles: Option<Vec<String>>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<domain::Exercise> for Exercise {
    fn from(value: domain::Exercise) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            external_id: value.id.to_string(),
            name: value.name.to_string(),
            level: value.level.key(),
            category: value.category.key(),
            mechanic: value.mechanic.map(Property::key),
            equipment: value.equipment.map(Property::key),
            force: value.force.map(Property::key),
            primary_muscles: keys(&value.primary_muscles),
            secondary_muscles: value.secondary_muscles.as_deref().map(keys),
            instructions: value.instructions.clone(),
            images: value.images.clone(),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = ExerciseError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        let primary_muscles = properties(&value.primary_muscles, "muscle")?;

        if primary_muscles.is_empty() {
            return Err(ExerciseError::NoPrimaryMuscles(value.external_id));
        }

        Ok(Self {
            id: domain::ExerciseID::new(&value.external_id)?,
            name: domain::Name::new(&value.name)?,
            level: property(&value.level, "level")?,
            category: property(&value.category, "category")?,
            mechanic: optional_property(value.mechanic.as_deref(), "mechanic")?,
            equipment: optional_property(value.equipment.as_deref(), "equipment")?,
            force: optional_property(value.force.as_deref(), "force")?,
            primary_muscles,
            secondary_muscles: value
                .secondary_muscles
                .as_deref()
                .map(|muscles| properties(muscles, "muscle"))
                .transpose()?,
            instructions: value.instructions,
            images: value.images,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExerciseError {
    #[error(transparent)]
    ID(#[from] domain::ExerciseIDError),
    #[error(transparent)]
    Name(#[from] domain::NameError),
    #[error("unknown {0} \"{1}\"")]
    UnknownValue(&'static str, String),
    #[error("exercise {0} has no primary muscles")]
    NoPrimaryMuscles(String),
}

fn keys<P: Property>(properties: &[P]) -> Vec<String> {
    properties.iter().map(|p| p.key()).collect()
}

fn property<P: Property>(name: &str, kind: &'static str) -> Result<P, ExerciseError> {
    P::from_name(name).ok_or_else(|| ExerciseError::UnknownValue(kind, name.to_string()))
}

fn optional_property<P: Property>(
    name: Option<&str>,
    kind: &'static str,
) -> Result<Option<P>, ExerciseError> {
    name.map(|name| property(name, kind)).transpose()
}

fn properties<P: Property>(names: &[String], kind: &'static str) -> Result<Vec<P>, ExerciseError> {
    names.iter().map(|name| property(name, kind)).collect()
}
