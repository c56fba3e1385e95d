//! Utilities for generating passwords.

use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};

use crate::format::format_groups;
use crate::{validate, Alphabet, Error, GenerationConfig, Impossible, Password, Result};

/// Draw `len` characters uniformly from `alphabet`, with no constraints at all.
///
/// Note that `rand`'s underlying uniform sampler does the right thing to prevent bias: if it can't
/// generate a value that is within the given range (or really, a multiple of the range), it
/// re-samples.
///
/// Returns `None` only if `alphabet` is empty.
pub fn generate_random_password<R>(rng: &mut R, alphabet: &[char], len: usize) -> Option<Vec<char>>
where
    R: Rng + CryptoRng,
{
    let mut password = Vec::with_capacity(len);
    for _ in 0..len {
        password.push(*alphabet.choose(rng)?);
    }
    Some(password)
}

/// Fail early on configurations that no amount of resampling could satisfy.
pub fn check_satisfiable(config: &GenerationConfig, alphabet: &Alphabet) -> Result<()> {
    let length = config.length();
    if config.require_all_sets() && length < alphabet.set_count() {
        return Err(Error::ImpossibleConstraint(Impossible::TooShortForAllSets {
            length,
            sets: alphabet.set_count(),
        }));
    }
    if config.no_triple_repeat() && alphabet.len() == 1 && length >= 3 {
        return Err(Error::ImpossibleConstraint(
            Impossible::RepeatWithSingleCharacter { length },
        ));
    }
    Ok(())
}

/// Generate one password satisfying `config`'s constraints.
///
/// `config` is validated first, since it may not have come through the builder. Candidates are
/// drawn whole and thrown away whole if they fail validation. The number of candidates is
/// bounded by [`GenerationConfig::max_attempts`].
pub fn generate<R>(config: &GenerationConfig, alphabet: &Alphabet, rng: &mut R) -> Result<Password>
where
    R: Rng + CryptoRng,
{
    config.validate()?;
    check_satisfiable(config, alphabet)?;
    sample_until_valid(config, alphabet, rng)
}

fn sample_until_valid<R>(
    config: &GenerationConfig,
    alphabet: &Alphabet,
    rng: &mut R,
) -> Result<Password>
where
    R: Rng + CryptoRng,
{
    let mut attempts: u64 = 0;
    loop {
        if let Some(max_attempts) = config.max_attempts() {
            if attempts >= max_attempts {
                tracing::warn!(attempts, "giving up on generating a password");
                return Err(Error::GenerationUnachievable { attempts });
            }
        }
        attempts += 1;

        let candidate = generate_random_password(rng, alphabet.chars(), config.length())
            .ok_or(Error::EmptyAlphabet)?;
        if validate::is_valid(&candidate, config, alphabet) {
            tracing::trace!(attempts, "accepted candidate password");
            return Ok(Password::from(candidate));
        }
    }
}

/// A checked configuration together with the alphabet built from it.
///
/// Both are immutable, so a `Generator` can be shared between threads as long as each one brings
/// its own RNG.
#[derive(Clone, Debug)]
pub struct Generator {
    config: GenerationConfig,
    alphabet: Alphabet,
}

impl Generator {
    /// Validate `config`, build its alphabet and make sure the constraints can be met.
    pub fn new(config: GenerationConfig) -> Result<Generator> {
        config.validate()?;
        let alphabet = Alphabet::build(&config)?;
        check_satisfiable(&config, &alphabet)?;
        tracing::debug!(
            alphabet_size = alphabet.len(),
            sets = alphabet.set_count(),
            length = config.length(),
            require_all_sets = config.require_all_sets(),
            no_triple_repeat = config.no_triple_repeat(),
            "password generator ready"
        );
        Ok(Generator { config, alphabet })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn generate<R>(&self, rng: &mut R) -> Result<Password>
    where
        R: Rng + CryptoRng,
    {
        sample_until_valid(&self.config, &self.alphabet, rng)
    }

    /// Generate a password and group it for display.
    pub fn generate_formatted<R>(&self, rng: &mut R) -> Result<String>
    where
        R: Rng + CryptoRng,
    {
        let password = self.generate(rng)?;
        Ok(format_groups(password.as_str(), self.config.group_size()))
    }

    /// The configured number of formatted passwords, generated lazily in order.
    pub fn passwords<'a, R>(&'a self, rng: &'a mut R) -> Passwords<'a, R>
    where
        R: Rng + CryptoRng,
    {
        Passwords {
            generator: self,
            rng,
            remaining: self.config.count(),
        }
    }
}

/// Iterator returned by [`Generator::passwords`].
///
/// Stops after the first error.
pub struct Passwords<'a, R> {
    generator: &'a Generator,
    rng: &'a mut R,
    remaining: usize,
}

impl<R> Iterator for Passwords<'_, R>
where
    R: Rng + CryptoRng,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.generator.generate_formatted(self.rng);
        self.remaining = match result {
            Ok(_) => self.remaining - 1,
            Err(_) => 0,
        };
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::CharsetTag;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_generate_random_password() {
        let alphabet = ['x', 'y', 'z'];
        let password = generate_random_password(&mut rng(1), &alphabet, 32).unwrap();
        assert_eq!(password.len(), 32);
        assert!(password.iter().all(|ch| alphabet.contains(ch)));
    }

    #[test]
    fn test_generate_random_password_empty_alphabet() {
        assert_eq!(generate_random_password(&mut rng(1), &[], 4), None);
        assert_eq!(generate_random_password(&mut rng(1), &[], 0), Some(Vec::new()));
    }

    #[test]
    fn test_draws_cover_the_alphabet() {
        let alphabet = ['a', 'b', 'c', 'd'];
        let password = generate_random_password(&mut rng(2), &alphabet, 400).unwrap();
        for ch in alphabet {
            assert!(password.contains(&ch), "{ch} never drawn");
        }
    }

    #[test]
    fn test_too_short_for_all_sets() {
        let config = GenerationConfig::builder()
            .tags([CharsetTag::Uppercase, CharsetTag::Lowercase, CharsetTag::Digits])
            .length(2)
            .require_all_sets(true)
            .build()
            .unwrap();
        let expected = Err(Error::ImpossibleConstraint(Impossible::TooShortForAllSets {
            length: 2,
            sets: 3,
        }));
        assert_eq!(Generator::new(config.clone()).map(|_| ()), expected);

        let alphabet = Alphabet::build(&config).unwrap();
        assert_eq!(generate(&config, &alphabet, &mut rng(3)).map(|_| ()), expected);
    }

    #[test]
    fn test_length_equal_to_set_count_is_allowed() {
        let config = GenerationConfig::builder()
            .tags([CharsetTag::Uppercase, CharsetTag::Lowercase, CharsetTag::Digits])
            .length(3)
            .require_all_sets(true)
            .build()
            .unwrap();
        let generator = Generator::new(config).unwrap();
        let password = generator.generate(&mut rng(4)).unwrap();
        let chars = password.as_str().chars().collect::<Vec<_>>();
        assert!(validate::covers_all_sets(&chars, generator.alphabet()));
    }

    #[test]
    fn test_single_character_with_no_repeat() {
        let config = GenerationConfig::builder()
            .tags([CharsetTag::Digits])
            .digits("7")
            .length(3)
            .no_triple_repeat(true)
            .build()
            .unwrap();
        assert_eq!(
            Generator::new(config).map(|_| ()),
            Err(Error::ImpossibleConstraint(
                Impossible::RepeatWithSingleCharacter { length: 3 }
            ))
        );

        // Two characters can't repeat three times.
        let config = GenerationConfig::builder()
            .tags([CharsetTag::Digits])
            .digits("7")
            .length(2)
            .no_triple_repeat(true)
            .build()
            .unwrap();
        let password = Generator::new(config).unwrap().generate(&mut rng(5)).unwrap();
        assert_eq!(password.as_str(), "77");
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        // A 200-character binary string without a run of three is vanishingly unlikely.
        let config = GenerationConfig::builder()
            .tags([CharsetTag::Digits])
            .digits("01")
            .length(200)
            .no_triple_repeat(true)
            .max_attempts(Some(5))
            .build()
            .unwrap();
        let generator = Generator::new(config).unwrap();
        assert_eq!(
            generator.generate(&mut rng(6)),
            Err(Error::GenerationUnachievable { attempts: 5 })
        );
    }

    #[test]
    fn test_passwords_yields_count_formatted() {
        let config = GenerationConfig::builder()
            .length(12)
            .group_size(4)
            .count(7)
            .build()
            .unwrap();
        let generator = Generator::new(config).unwrap();
        let mut rng = rng(7);
        let passwords = generator
            .passwords(&mut rng)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(passwords.len(), 7);
        for password in passwords {
            let groups = password.split(' ').collect::<Vec<_>>();
            assert_eq!(groups.len(), 3);
            assert!(groups.iter().all(|group| group.chars().count() == 4));
        }
    }

    #[test]
    fn test_passwords_stops_after_error() {
        let config = GenerationConfig::builder()
            .tags([CharsetTag::Digits])
            .digits("01")
            .length(200)
            .no_triple_repeat(true)
            .max_attempts(Some(1))
            .count(3)
            .build()
            .unwrap();
        let generator = Generator::new(config).unwrap();
        let mut rng = rng(8);
        let mut passwords = generator.passwords(&mut rng);
        assert!(matches!(
            passwords.next(),
            Some(Err(Error::GenerationUnachievable { attempts: 1 }))
        ));
        assert!(passwords.next().is_none());
    }

    #[test]
    fn test_password_debug_is_opaque() {
        let password = Password::from(vec!['s', 'e', 'c', 'r', 'e', 't']);
        assert!(!format!("{password:?}").contains("secret"));
        assert_eq!(password.to_string(), "secret");
    }
}
