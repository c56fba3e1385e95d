//! Constraint checks applied to candidate passwords.

use crate::{Alphabet, GenerationConfig};

/// Check a candidate against every constraint `config` enables.
pub fn is_valid(password: &[char], config: &GenerationConfig, alphabet: &Alphabet) -> bool {
    if config.require_all_sets() && !covers_all_sets(password, alphabet) {
        return false;
    }
    if config.no_triple_repeat() && has_triple_repeat(password) {
        return false;
    }
    true
}

/// Whether each of the alphabet's sets has at least one character in `password`.
pub fn covers_all_sets(password: &[char], alphabet: &Alphabet) -> bool {
    alphabet
        .sets()
        .all(|set| password.iter().any(|&ch| set.contains(ch)))
}

/// Whether some character appears three or more times in a row.
pub fn has_triple_repeat(password: &[char]) -> bool {
    password
        .windows(3)
        .any(|window| window[0] == window[1] && window[1] == window[2])
}
