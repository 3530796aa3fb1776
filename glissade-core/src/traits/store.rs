//! Settings persistence
//!
//! Settings are stored as a key -> numeric-value map so the set of
//! parameters can grow without breaking old stores. Persistence is
//! best-effort: a missing or corrupt field falls back to its default on
//! load, and save failures must never stall the appliance.

use crate::config::{Field, Settings};

/// Storage keys, one per persisted parameter.
///
/// Values are u32 in the parameter's native unit (microseconds, counts,
/// millimeters, minutes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SettingsKey {
    Shutter = 0,
    Settle = 1,
    Images = 2,
    Distance = 3,
    Speed = 4,
    Timespan = 5,
}

impl SettingsKey {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SettingsKey::Shutter),
            1 => Some(SettingsKey::Settle),
            2 => Some(SettingsKey::Images),
            3 => Some(SettingsKey::Distance),
            4 => Some(SettingsKey::Speed),
            5 => Some(SettingsKey::Timespan),
            _ => None,
        }
    }

    /// The settings field this key persists.
    pub fn field(self) -> Field {
        match self {
            SettingsKey::Shutter => Field::Shutter,
            SettingsKey::Settle => Field::Settle,
            SettingsKey::Images => Field::Images,
            SettingsKey::Distance => Field::Distance,
            SettingsKey::Speed => Field::Speed,
            SettingsKey::Timespan => Field::Timespan,
        }
    }

    pub const ALL: [SettingsKey; 6] = [
        SettingsKey::Shutter,
        SettingsKey::Settle,
        SettingsKey::Images,
        SettingsKey::Distance,
        SettingsKey::Speed,
        SettingsKey::Timespan,
    ];
}

/// Errors from settings storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Underlying storage operation failed
    Storage,
    /// Key not present in the store
    NotFound,
    /// Stored data corrupted or invalid
    Corrupted,
}

/// Settings store interface.
///
/// Implementations handle the actual medium (flash map, file, test
/// memory). `load` is total: fields that cannot be read come back as
/// their defaults.
pub trait SettingsStore {
    /// Load settings, substituting defaults for missing/corrupt fields.
    fn load(&mut self) -> impl core::future::Future<Output = Settings>;

    /// Persist all settings fields.
    fn save(
        &mut self,
        settings: &Settings,
    ) -> impl core::future::Future<Output = Result<(), StoreError>>;
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for SettingsKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match SettingsKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_byte_roundtrip() {
        for key in SettingsKey::ALL {
            assert_eq!(SettingsKey::from_u8(key.as_u8()), Some(key));
        }
        assert_eq!(SettingsKey::from_u8(200), None);
    }

    #[test]
    fn test_keys_cover_all_fields() {
        for field in Field::ALL {
            assert!(SettingsKey::ALL.iter().any(|k| k.field() == field));
        }
    }
}
