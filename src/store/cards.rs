//! Card Store
//!
//! Dashboard card registry. Cards are built from a device + node selection
//! and freeze independent copies of the chosen nodes; after creation only the
//! title (via [`TitleEdit`]) and the live values (via the telemetry
//! reconciler) ever change.

use crate::constants::{MAX_CARDS, MAX_NAME_LENGTH};
use crate::domain::{DisplayCard, NodeSnapshot};
use crate::store::{DeviceStore, ValidationError};

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() || title.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TitleInvalid);
    }
    Ok(())
}

/// Registry of dashboard display cards
#[derive(Clone, Debug, Default)]
pub struct CardStore {
    cards: Vec<DisplayCard>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a card list loaded from the gateway
    pub fn from_cards(cards: Vec<DisplayCard>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[DisplayCard] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [DisplayCard] {
        &mut self.cards
    }

    /// Create a card from a device and two of its nodes, returning its index.
    ///
    /// The node metadata and current values are copied, not referenced;
    /// later edits to the device or nodes leave the card unchanged.
    pub fn add_card(
        &mut self,
        devices: &DeviceStore,
        device_index: usize,
        temperature_index: usize,
        humidity_index: usize,
        title: &str,
    ) -> Result<usize, ValidationError> {
        validate_title(title)?;
        if self.cards.len() >= MAX_CARDS {
            return Err(ValidationError::CardLimitReached);
        }
        let device = devices
            .devices()
            .get(device_index)
            .ok_or(ValidationError::UnknownIndex)?;
        let temperature = device
            .nodes
            .get(temperature_index)
            .ok_or(ValidationError::UnknownIndex)?;
        let humidity = device
            .nodes
            .get(humidity_index)
            .ok_or(ValidationError::UnknownIndex)?;

        self.cards.push(DisplayCard {
            title: title.to_string(),
            device_name: device.name.clone(),
            temperature: NodeSnapshot::from(temperature),
            humidity: NodeSnapshot::from(humidity),
            last_update: None,
        });
        Ok(self.cards.len() - 1)
    }

    pub fn rename_card(&mut self, index: usize, title: &str) -> Result<(), ValidationError> {
        validate_title(title)?;
        let card = self
            .cards
            .get_mut(index)
            .ok_or(ValidationError::UnknownIndex)?;
        card.title = title.to_string();
        Ok(())
    }

    pub fn delete_card(&mut self, index: usize) -> Result<DisplayCard, ValidationError> {
        if index >= self.cards.len() {
            return Err(ValidationError::UnknownIndex);
        }
        Ok(self.cards.remove(index))
    }

    /// Case-insensitive title search, as used by the dashboard filter box
    pub fn search<'a>(&'a self, query: &str) -> Vec<&'a DisplayCard> {
        let folded = query.to_lowercase();
        self.cards
            .iter()
            .filter(|c| c.title.to_lowercase().contains(&folded))
            .collect()
    }
}

/// In-progress title edit for one card.
///
/// Commit applies the buffer (Enter); discard drops it (Escape). An invalid
/// buffer is rejected by [`TitleEdit::commit`] without touching the card, and
/// the edit stays open so the operator can fix the input.
#[derive(Clone, Debug)]
pub struct TitleEdit {
    index: usize,
    buffer: String,
}

impl TitleEdit {
    /// Start editing a card's title, seeding the buffer with the current one
    pub fn begin(store: &CardStore, index: usize) -> Result<Self, ValidationError> {
        let card = store
            .cards()
            .get(index)
            .ok_or(ValidationError::UnknownIndex)?;
        Ok(Self {
            index,
            buffer: card.title.clone(),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn set_buffer(&mut self, value: impl Into<String>) {
        self.buffer = value.into();
    }

    /// Apply the buffered title. On rejection the store is unchanged and the
    /// caller should keep this edit open.
    pub fn commit(&self, store: &mut CardStore) -> Result<(), ValidationError> {
        store.rename_card(self.index, &self.buffer)
    }
}
