use std::slice::Iter;

use derive_more::{AsRef, Deref, Display};

use crate::Name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub level: Level,
    pub category: Category,
    pub mechanic: Option<Mechanic>,
    pub equipment: Option<Equipment>,
    pub force: Option<Force>,
    pub primary_muscles: Vec<Muscle>,
    pub secondary_muscles: Option<Vec<Muscle>>,
    pub instructions: Vec<String>,
    pub images: Vec<String>,
}

/// Globally unique identifier assigned by the remote dataset.
#[derive(AsRef, Deref, Display, Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(String);

impl ExerciseID {
    pub fn new(id: &str) -> Result<Self, ExerciseIDError> {
        let trimmed_id = id.trim();

        if trimmed_id.is_empty() {
            return Err(ExerciseIDError::Empty);
        }

        Ok(Self(trimmed_id.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExerciseIDError {
    #[error("Exercise ID must not be empty")]
    Empty,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Muscle {
    Abdominals,
    Abductors,
    Adductors,
    Biceps,
    Calves,
    Chest,
    Forearms,
    Glutes,
    Hamstrings,
    Lats,
    LowerBack,
    MiddleBack,
    Neck,
    Quadriceps,
    Shoulders,
    Traps,
    Triceps,
}

impl Property for Muscle {
    fn iter() -> Iter<'static, Muscle> {
        static MUSCLES: [Muscle; 17] = [
            Muscle::Abdominals,
            Muscle::Abductors,
            Muscle::Adductors,
            Muscle::Biceps,
            Muscle::Calves,
            Muscle::Chest,
            Muscle::Forearms,
            Muscle::Glutes,
            Muscle::Hamstrings,
            Muscle::Lats,
            Muscle::LowerBack,
            Muscle::MiddleBack,
            Muscle::Neck,
            Muscle::Quadriceps,
            Muscle::Shoulders,
            Muscle::Traps,
            Muscle::Triceps,
        ];
        MUSCLES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Muscle::Abdominals => "Abdominals",
            Muscle::Abductors => "Abductors",
            Muscle::Adductors => "Adductors",
            Muscle::Biceps => "Biceps",
            Muscle::Calves => "Calves",
            Muscle::Chest => "Chest",
            Muscle::Forearms => "Forearms",
            Muscle::Glutes => "Glutes",
            Muscle::Hamstrings => "Hamstrings",
            Muscle::Lats => "Lats",
            Muscle::LowerBack => "Lower Back",
            Muscle::MiddleBack => "Middle Back",
            Muscle::Neck => "Neck",
            Muscle::Quadriceps => "Quadriceps",
            Muscle::Shoulders => "Shoulders",
            Muscle::Traps => "Traps",
            Muscle::Triceps => "Triceps",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Level {
    Beginner,
    Intermediate,
    Expert,
}

impl Property for Level {
    fn iter() -> Iter<'static, Level> {
        static LEVEL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Expert];
        LEVEL.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Expert => "Expert",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Force {
    Push,
    Pull,
    Static,
}

impl Property for Force {
    fn iter() -> Iter<'static, Force> {
        static FORCE: [Force; 3] = [Force::Push, Force::Pull, Force::Static];
        FORCE.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Force::Push => "Push",
            Force::Pull => "Pull",
            Force::Static => "Static",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mechanic {
    Compound,
    Isolation,
}

impl Property for Mechanic {
    fn iter() -> Iter<'static, Mechanic> {
        static MECHANIC: [Mechanic; 2] = [Mechanic::Compound, Mechanic::Isolation];
        MECHANIC.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Mechanic::Compound => "Compound",
            Mechanic::Isolation => "Isolation",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Equipment {
    BodyOnly,
    Machine,
    Other,
    FoamRoll,
    Kettlebells,
    Dumbbell,
    Cable,
    Barbell,
    Bands,
    MedicineBall,
    ExerciseBall,
    EZCurlBar,
}

impl Property for Equipment {
    fn iter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 12] = [
            Equipment::BodyOnly,
            Equipment::Machine,
            Equipment::Other,
            Equipment::FoamRoll,
            Equipment::Kettlebells,
            Equipment::Dumbbell,
            Equipment::Cable,
            Equipment::Barbell,
            Equipment::Bands,
            Equipment::MedicineBall,
            Equipment::ExerciseBall,
            Equipment::EZCurlBar,
        ];
        EQUIPMENT.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Equipment::BodyOnly => "Body Only",
            Equipment::Machine => "Machine",
            Equipment::Other => "Other",
            Equipment::FoamRoll => "Foam Roll",
            Equipment::Kettlebells => "Kettlebells",
            Equipment::Dumbbell => "Dumbbell",
            Equipment::Cable => "Cable",
            Equipment::Barbell => "Barbell",
            Equipment::Bands => "Bands",
            Equipment::MedicineBall => "Medicine Ball",
            Equipment::ExerciseBall => "Exercise Ball",
            Equipment::EZCurlBar => "E-Z Curl Bar",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    Strength,
    Stretching,
    Plyometrics,
    Strongman,
    Powerlifting,
    Cardio,
    OlympicWeightlifting,
}

impl Property for Category {
    fn iter() -> Iter<'static, Category> {
        static CATEGORY: [Category; 7] = [
            Category::Strength,
            Category::Stretching,
            Category::Plyometrics,
            Category::Strongman,
            Category::Powerlifting,
            Category::Cardio,
            Category::OlympicWeightlifting,
        ];
        CATEGORY.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Category::Strength => "Strength",
            Category::Stretching => "Stretching",
            Category::Plyometrics => "Plyometrics",
            Category::Strongman => "Strongman",
            Category::Powerlifting => "Powerlifting",
            Category::Cardio => "Cardio",
            Category::OlympicWeightlifting => "Olympic Weightlifting",
        }
    }
}

/// Categorical exercise attribute.
///
/// The lower-case form of [`Property::name`] is the value used by the remote dataset.
pub trait Property: Clone + Copy + Sized + 'static {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;

    #[must_use]
    fn key(self) -> String {
        self.name().to_lowercase()
    }

    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .copied()
    }
}
