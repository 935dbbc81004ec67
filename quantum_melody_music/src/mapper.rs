// Histogram → melody expansion.
//
// Outcomes are visited in histogram order (ascending bitstring). Each one
// contributes its pitch `count` times in a row, and the accumulated sequence
// is cut to `target_length`. A histogram with fewer total shots than the
// target yields a shorter melody; nothing is padded.
//
// Because truncation happens after expansion, the visiting order decides
// which outcomes survive when shots exceed the target. With the default
// config (16 shots, 16 notes) nothing is cut.

use quantum_melody_sim::Histogram;

use crate::note::{CODE_BITS, NoteTable, Pitch};

/// Default melody length.
pub const TARGET_LENGTH: usize = 16;

pub type Melody = Vec<Pitch>;

pub fn map_to_melody(histogram: &Histogram, table: &NoteTable, target_length: usize) -> Melody {
    let mut melody = Melody::with_capacity(target_length.min(histogram.shots() as usize));
    for (bits, count) in histogram.iter() {
        if melody.len() >= target_length {
            break;
        }
        let pitch = table.lookup(bits.last_bits(CODE_BITS));
        melody.extend(std::iter::repeat_n(pitch, count as usize));
    }
    melody.truncate(target_length);
    melody
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn single_outcome_repeats_one_pitch() {
        let h = Histogram::single(3, 0b100, 16);
        let melody = map_to_melody(&h, &NoteTable::default(), TARGET_LENGTH);
        assert_eq!(melody, vec![Pitch::G4; 16]);
    }

    #[test]
    fn outcomes_expand_in_ascending_order() {
        let h = Histogram::from_counts(3, BTreeMap::from([(0b111, 2), (0b000, 3), (0b010, 1)]));
        let melody = map_to_melody(&h, &NoteTable::default(), TARGET_LENGTH);
        use Pitch::*;
        assert_eq!(melody, vec![C4, C4, C4, E4, C5, C5]);
    }

    #[test]
    fn short_histogram_is_not_padded() {
        let h = Histogram::from_counts(3, BTreeMap::from([(1, 3), (6, 2)]));
        let melody = map_to_melody(&h, &NoteTable::default(), TARGET_LENGTH);
        assert_eq!(melody.len(), 5);
    }

    #[test]
    fn long_histogram_is_truncated_from_the_end() {
        let h = Histogram::from_counts(3, BTreeMap::from([(0b001, 10), (0b110, 10)]));
        let melody = map_to_melody(&h, &NoteTable::default(), TARGET_LENGTH);
        assert_eq!(melody.len(), 16);
        assert!(melody[..10].iter().all(|&p| p == Pitch::D4));
        assert!(melody[10..].iter().all(|&p| p == Pitch::B4));
    }

    #[test]
    fn length_never_exceeds_target() {
        let h = Histogram::from_counts(
            3,
            BTreeMap::from([(0, 40), (3, 1), (5, 17)]),
        );
        for target in [0, 1, 7, 16, 57, 58, 100] {
            let melody = map_to_melody(&h, &NoteTable::default(), target);
            assert!(melody.len() <= target);
            assert_eq!(melody.len(), target.min(58));
        }
    }

    #[test]
    fn oversized_target_does_not_preallocate() {
        let h = Histogram::single(3, 0b010, 16);
        let melody = map_to_melody(&h, &NoteTable::default(), usize::MAX);
        assert_eq!(melody, vec![Pitch::E4; 16]);
    }

    #[test]
    fn wide_outcomes_use_trailing_three_bits() {
        // 5-bit outcome 11010 → trailing 010 → E4.
        let h = Histogram::single(5, 0b11010, 4);
        let melody = map_to_melody(&h, &NoteTable::default(), TARGET_LENGTH);
        assert_eq!(melody, vec![Pitch::E4; 4]);
    }

    #[test]
    fn unmapped_code_uses_fallback() {
        let table = NoteTable::empty().with_entry(0, Pitch::F4);
        let h = Histogram::single(3, 0b011, 2);
        assert_eq!(map_to_melody(&h, &table, TARGET_LENGTH), vec![Pitch::F4; 2]);
    }
}
