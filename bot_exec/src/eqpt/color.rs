//! Color readings

use serde::Serialize;

/// Colors the robot distinguishes.
///
/// The sensor reports more IDs than this, they are folded into the colors used on the arena:
/// green reads as [`Color::Blue`] and orange as [`Color::Yellow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Color {
    Red,
    Blue,
    Yellow,
    Unknown,
}

impl Color {
    /// Map a raw color ID from the sensor.
    pub fn from_raw_id(id: i32) -> Self {
        match id {
            0 => Color::Red,
            2 => Color::Blue,
            3 | 6 => Color::Yellow,
            _ => Color::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_ids() {
        assert_eq!(Color::from_raw_id(0), Color::Red);
        assert_eq!(Color::from_raw_id(2), Color::Blue);
        assert_eq!(Color::from_raw_id(3), Color::Yellow);
        assert_eq!(Color::from_raw_id(6), Color::Yellow);
    }

    #[test]
    fn test_unmapped_ids() {
        for id in &[-1, 1, 4, 5, 7, 255, i32::MIN, i32::MAX] {
            assert_eq!(Color::from_raw_id(*id), Color::Unknown, "id {}", id);
        }
    }

    proptest! {
        #[test]
        fn mapping_is_pure(id in any::<i32>()) {
            prop_assert_eq!(Color::from_raw_id(id), Color::from_raw_id(id));
        }

        #[test]
        fn only_calibrated_ids_are_known(id in any::<i32>()) {
            prop_assume!(![0, 2, 3, 6].contains(&id));
            prop_assert_eq!(Color::from_raw_id(id), Color::Unknown);
        }
    }
}
