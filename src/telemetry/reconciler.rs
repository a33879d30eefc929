//! Live-Update Reconciler
//!
//! Maps incoming telemetry updates onto dashboard cards by node name. A card
//! matches when its temperature or humidity snapshot carries the updated
//! node's name; both slots are checked independently because a card may pair
//! the same node twice. Updates for the same name apply in arrival order, so
//! the last received value wins.

use chrono::{DateTime, Utc};

use crate::domain::DisplayCard;
use crate::telemetry::TelemetryUpdate;

/// Apply one update to every matching card, stamping `last_update` with
/// `now`. Returns how many cards were touched; cards with no matching node
/// are left alone.
pub fn apply_update(cards: &mut [DisplayCard], update: &TelemetryUpdate, now: DateTime<Utc>) -> usize {
    let mut touched = 0;
    for card in cards.iter_mut() {
        let mut matched = false;
        if card.temperature.name == update.node {
            card.temperature.value = Some(update.value);
            matched = true;
        }
        if card.humidity.name == update.node {
            card.humidity.value = Some(update.value);
            matched = true;
        }
        if matched {
            card.last_update = Some(now);
            touched += 1;
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataType, FunctionCode, NodeSnapshot};

    fn snapshot(name: &str) -> NodeSnapshot {
        NodeSnapshot {
            name: name.to_string(),
            address: 100,
            function: FunctionCode::ReadHoldingRegisters,
            data_type: DataType::FloatAbcd,
            timeout: 500,
            value: None,
        }
    }

    fn card(title: &str, temp: &str, hum: &str) -> DisplayCard {
        DisplayCard {
            title: title.to_string(),
            device_name: "D1".to_string(),
            temperature: snapshot(temp),
            humidity: snapshot(hum),
            last_update: None,
        }
    }

    fn update(node: &str, value: f64) -> TelemetryUpdate {
        TelemetryUpdate {
            node: node.to_string(),
            value,
        }
    }

    #[test]
    fn test_updates_every_matching_card_and_no_others() {
        let mut cards = vec![
            card("A", "TempSensor1", "Hum1"),
            card("B", "Temp2", "TempSensor1"),
            card("C", "Temp3", "Hum3"),
        ];
        let now = Utc::now();

        let touched = apply_update(&mut cards, &update("TempSensor1", 23.5), now);
        assert_eq!(touched, 2);
        assert_eq!(cards[0].temperature.value, Some(23.5));
        assert_eq!(cards[0].humidity.value, None);
        assert_eq!(cards[1].humidity.value, Some(23.5));
        assert_eq!(cards[0].last_update, Some(now));
        assert_eq!(cards[1].last_update, Some(now));

        // Card C untouched entirely
        assert_eq!(cards[2].temperature.value, None);
        assert_eq!(cards[2].last_update, None);
    }

    #[test]
    fn test_both_slots_of_one_card_may_match() {
        let mut cards = vec![card("A", "Sensor", "Sensor")];
        apply_update(&mut cards, &update("Sensor", 7.0), Utc::now());
        assert_eq!(cards[0].temperature.value, Some(7.0));
        assert_eq!(cards[0].humidity.value, Some(7.0));
    }

    #[test]
    fn test_last_received_wins() {
        let mut cards = vec![card("A", "T", "H")];
        apply_update(&mut cards, &update("T", 1.0), Utc::now());
        apply_update(&mut cards, &update("T", 2.0), Utc::now());
        assert_eq!(cards[0].temperature.value, Some(2.0));
    }

    #[test]
    fn test_idempotent_per_message() {
        let mut cards = vec![card("A", "T", "H")];
        let now = Utc::now();
        apply_update(&mut cards, &update("T", 5.0), now);
        let before = cards[0].clone();
        apply_update(&mut cards, &update("T", 5.0), now);
        assert_eq!(cards[0], before);
    }
}
