use serde::{Deserialize, Serialize};

use crate::session::family::FamilyMember;
use crate::session::pantry::MealType;

/// Body of `POST /generate_meal`. Field names follow the service's wire
/// format, which mixes snake_case and camelCase.
#[derive(Debug, Serialize, Clone)]
pub struct MealRequest {
    pub family_members: Vec<FamilyMember>,
    pub ingredients: Vec<String>,
    #[serde(rename = "mealType")]
    pub meal_type: MealType,
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: String,
}

/// Body of `POST /save_family`.
#[derive(Debug, Serialize, Clone)]
pub struct SaveFamilyRequest {
    pub email: String,
    pub family: Vec<FamilyMember>,
}

/// Optional error body returned on non-success statuses.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MealSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub meal_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub why_this_meal: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeDetails {
    pub total_time_minutes: u32,
    pub steps: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UsedIngredient {
    pub ingredient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MemberRecommendation {
    pub name: String,
    pub recommendation: String,
}

/// One generated meal recommendation. Transient: each result is superseded
/// entirely by the next successful request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeResult {
    pub meal: MealSummary,
    pub recipe: RecipeDetails,
    #[serde(default)]
    pub ingredients_used: Vec<UsedIngredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_specific_recommendations: Option<Vec<MemberRecommendation>>,
}
