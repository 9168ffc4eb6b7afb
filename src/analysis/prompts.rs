//! Prompt templates and response schemas sent to the model

use crate::storage::Domain;
use chrono::NaiveDate;
use serde_json::{json, Value};

/// Weekly coaching prompt for `domain`, with the collection appended as JSON
pub fn analysis_prompt(domain: Domain, data_json: &str) -> String {
    let brief = match domain {
        Domain::Muscle => {
            "Act as an Elite Fitness Coach. Analyze this fitness data for a week.\n\
             Focus on Progressive Overload, Recovery Efficiency, and Macro Adherence.\n\n\
             1. Provide a \"No Fluff\" summary of their physical adaptation.\n\
             2. Provide 3 specific, technical, and actionable tips (e.g., \"Increase protein \
             by 10g post-workout\", \"Sleep debt detected, add 30min tonight\")."
        }
        Domain::Money => {
            "Act as a Financial Strategist. Analyze this transaction data.\n\n\
             1. Summarize cash flow velocity. Are they leaking money on small things? \
             Is the savings rate healthy?\n\
             2. Identify specific \"Lifestyle Inflation\" or unnecessary categorical spending.\n\
             3. Provide 3 ruthless, actionable tips to increase Net Worth velocity \
             (e.g., \"Cut dining budget by 15% to fund X\")."
        }
        Domain::Mind => {
            "Act as a High-Performance Psychologist. Analyze this mental wellness data.\n\n\
             1. Look for Dopamine triggers. Does high screen time correlate with lower Mind Scores?\n\
             2. Analyze the 'Deep Work' ratio (Reading/Meditation vs Screen Time).\n\
             3. Provide 3 scientific, habit-based tips to induce Flow State and reduce mental fog."
        }
    };
    format!("{brief}\n\nData: {data_json}")
}

/// Heading for a domain's analysis panel
pub fn coach_title(domain: Domain) -> &'static str {
    match domain {
        Domain::Muscle => "Fitness Insights",
        Domain::Money => "Financial Advisor",
        Domain::Mind => "Wellness Coach",
    }
}

/// Summary returned when the model answers with an empty body
pub fn empty_analysis_summary(domain: Domain) -> &'static str {
    match domain {
        Domain::Muscle => "Could not generate analysis.",
        Domain::Money => "Could not generate financial analysis.",
        Domain::Mind => "Could not generate wellness analysis.",
    }
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "tips": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["summary", "tips"]
    })
}

pub fn nutrition_prompt(food_description: &str) -> String {
    format!(
        "You are a nutrition expert. Analyze the following food intake text.\n\
         1. Correct any typos (e.g. \"protine\" -> \"protein\", \"ates\" -> \"ate\").\n\
         2. Identify specific brands if mentioned (e.g. \"yogabar\" -> \"Yoga Bar\").\n\
         3. If quantities are vague, estimate based on standard serving sizes.\n\
         4. Calculate the TOTAL nutritional content for ALL items listed.\n\
         5. Return the sum of calories, protein (g), carbs (g), fat (g), and fiber (g).\n\n\
         Input Text: \"{food_description}\""
    )
}

pub fn nutrition_schema() -> Value {
    number_object(&["calories", "protein", "carbs", "fat", "fiber"])
}

pub fn muscle_log_prompt(text: &str, today: NaiveDate) -> String {
    format!(
        "Extract fitness data from this text into a JSON object.\n\
         Current date is {today}.\n\
         If date is not specified, use current date.\n\
         Fields: date (YYYY-MM-DD), weight (number), workoutType (string), \
         workoutDuration (number, minutes), sleepHours (number), waterIntake (number, liters), \
         calories (number), fiber (number), protein (number), carbs (number), fat (number).\n\
         Input: \"{text}\"",
        today = today.format("%Y-%m-%d"),
    )
}

pub fn muscle_log_schema() -> Value {
    let mut schema = number_object(&[
        "weight",
        "workoutDuration",
        "sleepHours",
        "waterIntake",
        "calories",
        "fiber",
        "protein",
        "carbs",
        "fat",
    ]);
    if let Some(props) = schema["properties"].as_object_mut() {
        props.insert("date".to_string(), json!({ "type": "STRING" }));
        props.insert("workoutType".to_string(), json!({ "type": "STRING" }));
    }
    schema
}

fn number_object(fields: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|name| (name.to_string(), json!({ "type": "NUMBER" })))
        .collect();
    json!({ "type": "OBJECT", "properties": properties })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_data() {
        let prompt = analysis_prompt(Domain::Money, r#"[{"amount":-10}]"#);
        assert!(prompt.starts_with("Act as a Financial Strategist."));
        assert!(prompt.ends_with(r#"Data: [{"amount":-10}]"#));

        assert!(analysis_prompt(Domain::Muscle, "[]").contains("Elite Fitness Coach"));
        assert!(analysis_prompt(Domain::Mind, "[]").contains("High-Performance Psychologist"));
    }

    #[test]
    fn test_muscle_log_prompt_carries_today() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        let prompt = muscle_log_prompt("ran 5k", today);
        assert!(prompt.contains("Current date is 2025-11-20."));
        assert!(prompt.contains("Input: \"ran 5k\""));
    }

    #[test]
    fn test_schemas() {
        assert_eq!(analysis_schema()["properties"]["tips"]["type"], "ARRAY");
        assert_eq!(nutrition_schema()["properties"]["fiber"]["type"], "NUMBER");

        let log = muscle_log_schema();
        assert_eq!(log["properties"]["date"]["type"], "STRING");
        assert_eq!(log["properties"]["sleepHours"]["type"], "NUMBER");
        assert_eq!(log["properties"].as_object().unwrap().len(), 11);
    }
}
