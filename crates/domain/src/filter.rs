use std::collections::HashSet;

use crate::{Category, Equipment, Exercise, Level, Mechanic, Muscle, Property};

/// Structural predicate over exercises.
///
/// Empty muscle sets and absent scalar fields are unconstrained. All present criteria must hold.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExerciseFilter {
    pub primary_muscles: HashSet<Muscle>,
    pub secondary_muscles: HashSet<Muscle>,
    pub level: Option<Level>,
    pub category: Option<Category>,
    pub equipment: Option<Equipment>,
    pub mechanic: Option<Mechanic>,
}

impl ExerciseFilter {
    #[must_use]
    pub fn exercises<'a>(
        &self,
        exercises: impl Iterator<Item = &'a Exercise>,
    ) -> Vec<&'a Exercise> {
        exercises.filter(|e| self.matches(e)).collect()
    }

    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        (self.primary_muscles.is_empty()
            || exercise
                .primary_muscles
                .iter()
                .any(|m| self.primary_muscles.contains(m)))
            && (self.secondary_muscles.is_empty()
                || exercise
                    .secondary_muscles
                    .as_ref()
                    .is_some_and(|muscles| {
                        muscles.iter().any(|m| self.secondary_muscles.contains(m))
                    }))
            && self.level.is_none_or(|level| exercise.level == level)
            && self
                .category
                .is_none_or(|category| exercise.category == category)
            && self
                .equipment
                .is_none_or(|equipment| exercise.equipment == Some(equipment))
            && self
                .mechanic
                .is_none_or(|mechanic| exercise.mechanic == Some(mechanic))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary_muscles.is_empty()
            && self.secondary_muscles.is_empty()
            && self.level.is_none()
            && self.category.is_none()
            && self.equipment.is_none()
            && self.mechanic.is_none()
    }

    #[must_use]
    pub fn primary_muscle_list(&self) -> Vec<(Muscle, bool)> {
        Muscle::iter()
            .map(|m| (*m, self.primary_muscles.contains(m)))
            .collect::<Vec<_>>()
    }

    #[must_use]
    pub fn secondary_muscle_list(&self) -> Vec<(Muscle, bool)> {
        Muscle::iter()
            .map(|m| (*m, self.secondary_muscles.contains(m)))
            .collect::<Vec<_>>()
    }

    #[must_use]
    pub fn level_list(&self) -> Vec<(Level, bool)> {
        selection_list(self.level)
    }

    #[must_use]
    pub fn category_list(&self) -> Vec<(Category, bool)> {
        selection_list(self.category)
    }

    #[must_use]
    pub fn equipment_list(&self) -> Vec<(Equipment, bool)> {
        selection_list(self.equipment)
    }

    #[must_use]
    pub fn mechanic_list(&self) -> Vec<(Mechanic, bool)> {
        selection_list(self.mechanic)
    }

    pub fn toggle_primary_muscle(&mut self, muscle: Muscle) {
        if !self.primary_muscles.remove(&muscle) {
            self.primary_muscles.insert(muscle);
        }
    }

    pub fn toggle_secondary_muscle(&mut self, muscle: Muscle) {
        if !self.secondary_muscles.remove(&muscle) {
            self.secondary_muscles.insert(muscle);
        }
    }

    pub fn toggle_level(&mut self, level: Level) {
        toggle(&mut self.level, level);
    }

    pub fn toggle_category(&mut self, category: Category) {
        toggle(&mut self.category, category);
    }

    pub fn toggle_equipment(&mut self, equipment: Equipment) {
        toggle(&mut self.equipment, equipment);
    }

    pub fn toggle_mechanic(&mut self, mechanic: Mechanic) {
        toggle(&mut self.mechanic, mechanic);
    }
}

/// Owned variant of [`ExerciseFilter::exercises`] for callers holding a slice.
#[must_use]
pub fn apply_filters(exercises: &[Exercise], filter: &ExerciseFilter) -> Vec<Exercise> {
    if filter.is_empty() {
        return exercises.to_vec();
    }
    filter
        .exercises(exercises.iter())
        .into_iter()
        .cloned()
        .collect()
}

fn selection_list<P: Property + PartialEq>(selected: Option<P>) -> Vec<(P, bool)> {
    P::iter()
        .map(|p| (*p, selected == Some(*p)))
        .collect::<Vec<_>>()
}

fn toggle<P: PartialEq>(selected: &mut Option<P>, value: P) {
    if selected.as_ref() == Some(&value) {
        *selected = None;
    } else {
        *selected = Some(value);
    }
}
