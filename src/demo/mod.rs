//! Chat-demo scenarios and the player that steps through them

pub mod fixtures;
pub mod player;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::models::DemoScenario;
use crate::whatsapp::payload::MAX_BUTTONS;

pub use player::{visible_buttons, Direction, PlayerOptions, ScenarioPlayer};

/// Load scenarios from a JSON file (array of scenarios), or the built-in
/// set when no path is given.
pub fn load_scenarios(path: Option<&Path>) -> Result<Vec<DemoScenario>> {
    let scenarios = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<Vec<DemoScenario>>(&content)
                .with_context(|| format!("Failed to parse scenarios in {}", path.display()))?
        }
        None => fixtures::all(),
    };

    if scenarios.is_empty() {
        bail!("No scenarios to play");
    }

    lint_scenarios(&scenarios);
    Ok(scenarios)
}

/// Warn about data WhatsApp itself would reject. Rendering still proceeds.
fn lint_scenarios(scenarios: &[DemoScenario]) {
    for scenario in scenarios {
        for (idx, message) in scenario.messages.iter().enumerate() {
            let count = message.buttons().len();
            if count > MAX_BUTTONS {
                tracing::warn!(
                    "Scenario '{}' message {} has {} buttons (WhatsApp allows {})",
                    scenario.title,
                    idx,
                    count,
                    MAX_BUTTONS
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_scenarios() {
        let scenarios = load_scenarios(None).unwrap();
        assert_eq!(scenarios.len(), fixtures::all().len());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("wa-flow-{}.json", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"title":"one","messages":[{{"type":"user_text","text":"hi","time":"10:00"}}]}}]"#
        )
        .unwrap();
        drop(file);

        let scenarios = load_scenarios(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].title, "one");
    }

    #[test]
    fn test_empty_file_rejected() {
        let path = std::env::temp_dir().join(format!("wa-flow-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, "[]").unwrap();
        let result = load_scenarios(Some(&path));
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
