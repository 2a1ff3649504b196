use crate::config::{ConfigUpdate, RoverConfig};
use crate::control::command::MAX_MAGNITUDE;
use crate::detect::analysis::decision::DecisionContext;
use crate::detect::property::color::ColorReferenceSet;
use serde::Serialize;
use std::time::Duration;

/// The session's live tunables. Only the session task mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSettings {
    pub selected_colors: ColorReferenceSet,
    pub line_threshold: u8,
    pub safe_distance: u32,
    pub manual_speed: u8,
    pub cruise_speed: u8,
    pub interval_ms: u64,
    pub stop_duration_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings::from_config(&RoverConfig::default())
    }
}

impl SessionSettings {
    pub fn from_config(config: &RoverConfig) -> Self {
        let detection = &config.detection;
        SessionSettings {
            selected_colors: detection.colors(),
            line_threshold: detection.line_threshold,
            safe_distance: detection.safe_distance,
            manual_speed: config.manual_speed.min(MAX_MAGNITUDE),
            cruise_speed: detection.cruise_speed.min(MAX_MAGNITUDE),
            interval_ms: detection.interval_ms,
            stop_duration_ms: detection.stop_duration_ms,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn decision_context(&self) -> DecisionContext {
        DecisionContext {
            safe_distance: self.safe_distance,
            cruise_speed: self.cruise_speed,
            stop_duration: Duration::from_millis(self.stop_duration_ms),
        }
    }

    /// Applies the present fields and describes each change for the journal.
    pub fn apply(&mut self, update: &ConfigUpdate) -> Vec<String> {
        let mut changes = Vec::new();

        if let Some(colors) = &update.selected_colors {
            self.selected_colors = colors.iter().copied().collect();
            changes.push(format!("Selected colors: {}", self.selected_colors));
        }
        if let Some(threshold) = update.line_threshold {
            self.line_threshold = threshold;
            changes.push(format!("Line threshold: {}", threshold));
        }
        if let Some(distance) = update.safe_distance {
            self.safe_distance = distance;
            changes.push(format!("Safe distance: {}cm", distance));
        }
        if let Some(speed) = update.manual_speed {
            self.manual_speed = speed.min(MAX_MAGNITUDE as u32) as u8;
            changes.push(format!("Manual speed: {}", self.manual_speed));
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::property::color::ColorCategory;

    #[test]
    fn update_changes_only_given_fields() {
        let mut settings = SessionSettings::default();
        let changes = settings.apply(&ConfigUpdate {
            safe_distance: Some(35),
            ..Default::default()
        });

        assert_eq!(changes, vec!["Safe distance: 35cm".to_string()]);
        assert_eq!(settings.safe_distance, 35);
        assert_eq!(settings.manual_speed, 50);
        assert_eq!(settings.line_threshold, 50);
    }

    #[test]
    fn manual_speed_is_clamped() {
        let mut settings = SessionSettings::default();
        settings.apply(&ConfigUpdate {
            manual_speed: Some(250),
            ..Default::default()
        });
        assert_eq!(settings.manual_speed, 100);
    }

    #[test]
    fn colors_can_be_emptied() {
        let mut settings = SessionSettings::default();
        settings.apply(&ConfigUpdate {
            selected_colors: Some(vec![]),
            ..Default::default()
        });
        assert!(settings.selected_colors.is_empty());

        settings.apply(&ConfigUpdate {
            selected_colors: Some(vec![ColorCategory::Yellow, ColorCategory::Yellow]),
            ..Default::default()
        });
        assert_eq!(settings.selected_colors.len(), 1);
    }

    #[test]
    fn decision_context_mirrors_settings() {
        let settings = SessionSettings::default();
        let context = settings.decision_context();
        assert_eq!(context, DecisionContext::default());
    }
}
