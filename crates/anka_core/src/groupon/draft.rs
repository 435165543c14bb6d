//! Group-buying ("groupon") launch form state.
//!
//! # Responsibility
//! - Track the three-step launch flow and its per-step inputs.
//! - Derive meal count, original price and discounted group price.
//!
//! # Invariants
//! - The participant threshold never drops below `MIN_THRESHOLD`.
//! - The flow cannot leave meal selection with an empty meal list.
//! - Prices are whole currency units; the group price rounds half up.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_THRESHOLD: u32 = 10;
pub const MIN_THRESHOLD: u32 = 1;
/// Discount in tenths of the original price (6 = 60% of the price).
pub const DEFAULT_DISCOUNT_TENTHS: u32 = 6;

/// Launch flow steps in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrouponStep {
    ChooseStartDate,
    SelectMeals,
    ConfirmLaunch,
}

impl GrouponStep {
    pub const ALL: [GrouponStep; 3] = [
        Self::ChooseStartDate,
        Self::SelectMeals,
        Self::ConfirmLaunch,
    ];

    /// One-based position shown in the step indicator.
    pub fn number(self) -> usize {
        match self {
            Self::ChooseStartDate => 1,
            Self::SelectMeals => 2,
            Self::ConfirmLaunch => 3,
        }
    }

    /// User-facing step label.
    pub fn label(self) -> &'static str {
        match self {
            Self::ChooseStartDate => "選擇開始日期",
            Self::SelectMeals => "選擇餐點和人數",
            Self::ConfirmLaunch => "確認發起日期",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::ChooseStartDate => Some(Self::SelectMeals),
            Self::SelectMeals => Some(Self::ConfirmLaunch),
            Self::ConfirmLaunch => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::ChooseStartDate => None,
            Self::SelectMeals => Some(Self::ChooseStartDate),
            Self::ConfirmLaunch => Some(Self::SelectMeals),
        }
    }
}

/// Launch flow errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrouponError {
    NoMealsSelected,
    StepOutOfRange(GrouponStep),
    MealNotFound(String),
}

impl Display for GrouponError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMealsSelected => write!(f, "at least one meal must be selected"),
            Self::StepOutOfRange(step) => {
                write!(f, "no step beyond `{}` in that direction", step.label())
            }
            Self::MealNotFound(id) => write!(f, "meal not in draft: {id}"),
        }
    }
}

impl Error for GrouponError {}

/// One meal added to the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedMeal {
    pub meal_id: String,
    pub name: String,
    pub price: u64,
}

/// Editable launch form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrouponDraft {
    step: GrouponStep,
    collection_days: u32,
    threshold: u32,
    discount_tenths: u32,
    bonus_per_person: u64,
    meals: Vec<SelectedMeal>,
}

impl Default for GrouponDraft {
    fn default() -> Self {
        Self {
            step: GrouponStep::ChooseStartDate,
            collection_days: 0,
            threshold: DEFAULT_THRESHOLD,
            discount_tenths: DEFAULT_DISCOUNT_TENTHS,
            bonus_per_person: 0,
            meals: Vec::new(),
        }
    }
}

impl GrouponDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> GrouponStep {
        self.step
    }

    pub fn next_step(&mut self) -> Result<GrouponStep, GrouponError> {
        if self.step == GrouponStep::SelectMeals && self.meals.is_empty() {
            return Err(GrouponError::NoMealsSelected);
        }
        self.step = self
            .step
            .next()
            .ok_or(GrouponError::StepOutOfRange(self.step))?;
        Ok(self.step)
    }

    pub fn previous_step(&mut self) -> Result<GrouponStep, GrouponError> {
        self.step = self
            .step
            .previous()
            .ok_or(GrouponError::StepOutOfRange(self.step))?;
        Ok(self.step)
    }

    pub fn collection_days(&self) -> u32 {
        self.collection_days
    }

    pub fn set_collection_days(&mut self, days: u32) {
        self.collection_days = days;
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn increment_threshold(&mut self) -> u32 {
        self.threshold = self.threshold.saturating_add(1);
        self.threshold
    }

    pub fn decrement_threshold(&mut self) -> u32 {
        self.threshold = self.threshold.saturating_sub(1).max(MIN_THRESHOLD);
        self.threshold
    }

    pub fn discount_tenths(&self) -> u32 {
        self.discount_tenths
    }

    pub fn bonus_per_person(&self) -> u64 {
        self.bonus_per_person
    }

    pub fn set_bonus_per_person(&mut self, bonus: u64) {
        self.bonus_per_person = bonus;
    }

    pub fn meals(&self) -> &[SelectedMeal] {
        &self.meals
    }

    /// Adds one meal; the same meal may be added more than once.
    pub fn add_meal(&mut self, meal: SelectedMeal) {
        self.meals.push(meal);
    }

    /// Removes the most recently added entry of `meal_id`.
    pub fn remove_meal(&mut self, meal_id: &str) -> Result<SelectedMeal, GrouponError> {
        let position = self
            .meals
            .iter()
            .rposition(|meal| meal.meal_id == meal_id)
            .ok_or_else(|| GrouponError::MealNotFound(meal_id.to_string()))?;
        Ok(self.meals.remove(position))
    }

    pub fn meal_count(&self) -> usize {
        self.meals.len()
    }

    /// Sum of selected meal prices, saturating at `u64::MAX`.
    pub fn original_price(&self) -> u64 {
        self.meals
            .iter()
            .map(|meal| meal.price)
            .fold(0u64, u64::saturating_add)
    }

    /// Original price scaled by the discount, rounded half up.
    pub fn sale_price(&self) -> u64 {
        self.original_price()
            .saturating_mul(u64::from(self.discount_tenths))
            .saturating_add(5)
            / 10
    }
}

#[cfg(test)]
mod tests {
    use super::{GrouponDraft, GrouponStep};

    #[test]
    fn steps_are_numbered_in_display_order() {
        let numbers: Vec<usize> = GrouponStep::ALL.iter().map(|step| step.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn empty_draft_has_zero_prices() {
        let draft = GrouponDraft::new();
        assert_eq!(draft.original_price(), 0);
        assert_eq!(draft.sale_price(), 0);
    }
}
