//! The polygon information dialog.

use crate::i18n::{is_rtl, text, Text};
use dronemap_core::config::Language;
use dronemap_geo::PolygonInfo;
use serde::Serialize;

/// A button in the dialog footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalAction {
    /// Hide the dialog
    Close,
    /// Send the polygon to the drone operator
    Send,
    /// Ask the operator to call about a restricted polygon
    CallForQuote,
}

/// One labelled row of the dialog body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalField {
    /// Localised label
    pub label: String,
    /// Value with unit
    pub value: String,
    /// Highlight as a warning
    pub alert: bool,
}

/// Everything the host needs to draw the dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoModal {
    /// Dialog title
    pub title: String,
    /// Area, perimeter and no-fly rows
    pub fields: Vec<ModalField>,
    /// Label above the coordinate block
    pub coordinates_label: String,
    /// Outer ring as indented JSON
    pub coordinates_json: String,
    /// Footer buttons in display order
    pub actions: Vec<(ModalAction, String)>,
    /// Lay out right to left
    pub rtl: bool,
}

impl InfoModal {
    /// Builds the dialog for a measured polygon.
    pub fn new(info: &PolygonInfo, language: Language) -> Self {
        let t = |key| text(language, key).to_string();

        let zones = if info.has_no_fly_conflict() {
            info.no_fly_zones.join(", ")
        } else {
            t(Text::NoneFound)
        };

        let fields = vec![
            ModalField {
                label: t(Text::Area),
                value: format!("{} {}", info.area_display(), t(Text::SquareMeters)),
                alert: false,
            },
            ModalField {
                label: t(Text::Perimeter),
                value: format!("{} {}", info.perimeter_display(), t(Text::Meters)),
                alert: false,
            },
            ModalField {
                label: t(Text::NoFlyZones),
                value: zones,
                alert: info.has_no_fly_conflict(),
            },
        ];

        let mut actions = vec![(ModalAction::Close, t(Text::Close)), (ModalAction::Send, t(Text::SendToOperator))];
        if info.has_no_fly_conflict() {
            actions.push((ModalAction::CallForQuote, t(Text::CallForQuote)));
        }

        Self {
            title: t(Text::ModalTitle),
            fields,
            coordinates_label: t(Text::Coordinates),
            coordinates_json: info.coordinates_json(),
            actions,
            rtl: is_rtl(language),
        }
    }

    /// Whether a button is offered.
    pub fn has_action(&self, action: ModalAction) -> bool {
        self.actions.iter().any(|(a, _)| *a == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(zones: &[&str]) -> PolygonInfo {
        PolygonInfo {
            coordinates: vec![[35.0, 31.0], [35.1, 31.0], [35.1, 31.1], [35.0, 31.0]],
            area_m2: 52_345.678,
            perimeter_m: 1_234.5,
            no_fly_zones: zones.iter().map(|z| z.to_string()).collect(),
        }
    }

    #[test]
    fn test_clear_polygon_has_no_quote_button() {
        let modal = InfoModal::new(&info(&[]), Language::English);
        assert_eq!(modal.title, "Polygon information");
        assert_eq!(modal.fields[0].value, "52345.68 m²");
        assert_eq!(modal.fields[1].value, "1234.50 m");
        assert_eq!(modal.fields[2].value, "None");
        assert!(modal.fields.iter().all(|f| !f.alert));
        assert!(modal.has_action(ModalAction::Close));
        assert!(modal.has_action(ModalAction::Send));
        assert!(!modal.has_action(ModalAction::CallForQuote));
        assert!(!modal.rtl);
    }

    #[test]
    fn test_conflict_lists_zones_and_offers_quote() {
        let modal = InfoModal::new(&info(&["Ben Gurion Airport", "Knesset"]), Language::English);
        assert_eq!(modal.fields[2].value, "Ben Gurion Airport, Knesset");
        assert!(modal.fields[2].alert);
        assert_eq!(modal.actions.last().map(|(a, _)| *a), Some(ModalAction::CallForQuote));
    }

    #[test]
    fn test_hebrew_dialog_is_rtl() {
        let modal = InfoModal::new(&info(&[]), Language::Hebrew);
        assert!(modal.rtl);
        assert_eq!(modal.fields[2].value, "אין");
        assert_eq!(modal.actions[0].1, "סגור");
    }

    #[test]
    fn test_coordinates_are_pretty_json() {
        let modal = InfoModal::new(&info(&[]), Language::English);
        assert!(modal.coordinates_json.starts_with("[\n"));
    }
}
