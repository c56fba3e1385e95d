use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::codepoint::parse_codepoint_list;
use crate::{CharsetDefinitions, CharsetTag, Error, GenerationConfig, Result};

/// The characters selected by one tag. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterSet {
    tag: CharsetTag,
    chars: BTreeSet<char>,
}

impl CharacterSet {
    pub fn new(tag: CharsetTag, chars: BTreeSet<char>) -> Result<CharacterSet> {
        if chars.is_empty() {
            return Err(Error::EmptyCharacterSet(tag));
        }
        Ok(CharacterSet { tag, chars })
    }

    /// Build a set from its definition: literal characters for most tags, a codepoint list for
    /// [`CharsetTag::Unicode`].
    pub fn from_definition(tag: CharsetTag, definition: &str) -> Result<CharacterSet> {
        let chars = match tag {
            CharsetTag::Unicode => parse_codepoint_list(definition)?,
            _ => definition.chars().collect(),
        };
        CharacterSet::new(tag, chars)
    }

    pub fn tag(&self) -> CharsetTag {
        self.tag
    }

    pub fn chars(&self) -> &BTreeSet<char> {
        &self.chars
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// The characters passwords are drawn from.
///
/// Holds the flat, deduplicated union used for sampling, as well as each selected set on its own
/// for the "all sets" check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
    sets: BTreeMap<CharsetTag, CharacterSet>,
}

impl Alphabet {
    pub fn build(config: &GenerationConfig) -> Result<Alphabet> {
        Alphabet::from_definitions(config.tags().iter().copied(), config.charsets())
    }

    pub fn from_definitions(
        tags: impl IntoIterator<Item = CharsetTag>,
        definitions: &CharsetDefinitions,
    ) -> Result<Alphabet> {
        let sets = tags
            .into_iter()
            .map(|tag| CharacterSet::from_definition(tag, definitions.get(tag)))
            .collect::<Result<Vec<_>>>()?;
        Alphabet::from_sets(sets)
    }

    /// Combine already-built sets. A tag given twice keeps its last set.
    pub fn from_sets(sets: impl IntoIterator<Item = CharacterSet>) -> Result<Alphabet> {
        let sets = sets
            .into_iter()
            .map(|set| (set.tag, set))
            .collect::<BTreeMap<_, _>>();
        let union = sets
            .values()
            .flat_map(|set| set.chars.iter().copied())
            .collect::<BTreeSet<_>>();
        if union.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        Ok(Alphabet {
            chars: union.into_iter().collect(),
            sets,
        })
    }

    /// Every distinct character, sorted.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn sets(&self) -> impl Iterator<Item = &CharacterSet> + '_ {
        self.sets.values()
    }

    pub fn set(&self, tag: CharsetTag) -> Option<&CharacterSet> {
        self.sets.get(&tag)
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for set in self.sets() {
            write!(f, "{} ({}): ", set.tag, set.len())?;
            for ch in set.chars() {
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "total distinct characters: {}", self.len())
    }
}
