use rand::Rng;

use crate::Pattern;

/// Generates a random pattern of at most the given depth, where the literals
/// are taken from the first `num_of_characters` lower case letters.
pub fn random_pattern(rng: &mut impl Rng, depth: usize, num_of_characters: u32) -> Pattern {
    assert!(
        (1..=26).contains(&num_of_characters),
        "We only support between one and 26 lower case letters."
    );

    if depth == 0 || rng.random_bool(0.2) {
        return if rng.random_bool(0.1) {
            Pattern::Empty
        } else {
            let offset = rng.random_range(0..num_of_characters);
            Pattern::literal(char::from_u32('a' as u32 + offset).expect("Offset stays within the lower case letters"))
        };
    }

    match rng.random_range(0..3) {
        0 => Pattern::concatenate(
            random_pattern(rng, depth - 1, num_of_characters),
            random_pattern(rng, depth - 1, num_of_characters),
        ),
        1 => Pattern::choose(
            random_pattern(rng, depth - 1, num_of_characters),
            random_pattern(rng, depth - 1, num_of_characters),
        ),
        _ => Pattern::repeat(random_pattern(rng, depth - 1, num_of_characters)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kleene_utilities::random_test;
    use test_log::test;

    fn depth(pattern: &Pattern) -> usize {
        match pattern {
            Pattern::Empty | Pattern::Literal(_) => 0,
            Pattern::Concatenate(first, second) | Pattern::Choose(first, second) => 1 + depth(first).max(depth(second)),
            Pattern::Repeat(pattern) => 1 + depth(pattern),
        }
    }

    #[test]
    fn test_random_pattern() {
        random_test(100, |rng| {
            let pattern = random_pattern(rng, 5, 3);

            assert!(depth(&pattern) <= 5);
            assert!(pattern.to_string().chars().all(|c| "abc|()*".contains(c)));
        });
    }
}
