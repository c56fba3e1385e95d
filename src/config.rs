use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The retry ceiling used unless a caller picks another one.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// One of the character sets a password can draw from.
///
/// Tags are ordered (`u`, `l`, `d`, `p`, `n`) so that sets of them iterate the same way no matter
/// how the selection was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CharsetTag {
    Uppercase,
    Lowercase,
    Digits,
    Punctuation,
    Unicode,
}

impl CharsetTag {
    pub const ALL: [CharsetTag; 5] = [
        CharsetTag::Uppercase,
        CharsetTag::Lowercase,
        CharsetTag::Digits,
        CharsetTag::Punctuation,
        CharsetTag::Unicode,
    ];

    pub fn from_char(tag: char) -> Result<CharsetTag> {
        match tag {
            'u' => Ok(CharsetTag::Uppercase),
            'l' => Ok(CharsetTag::Lowercase),
            'd' => Ok(CharsetTag::Digits),
            'p' => Ok(CharsetTag::Punctuation),
            'n' => Ok(CharsetTag::Unicode),
            other => Err(Error::UnknownCharsetTag(other)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            CharsetTag::Uppercase => 'u',
            CharsetTag::Lowercase => 'l',
            CharsetTag::Digits => 'd',
            CharsetTag::Punctuation => 'p',
            CharsetTag::Unicode => 'n',
        }
    }

    /// Parse a selection such as `"uld"`. Repeated tags are harmless.
    pub fn parse_selection(selection: &str) -> Result<BTreeSet<CharsetTag>> {
        selection.chars().map(CharsetTag::from_char).collect()
    }
}

impl fmt::Display for CharsetTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharsetTag::Uppercase => "uppercase",
            CharsetTag::Lowercase => "lowercase",
            CharsetTag::Digits => "digits",
            CharsetTag::Punctuation => "punctuation",
            CharsetTag::Unicode => "unicode",
        };
        f.write_str(name)
    }
}

/// The characters behind each tag.
///
/// The Unicode set is given as a codepoint list (see [`crate::codepoint`]); the others are the
/// literal characters.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CharsetDefinitions {
    pub uppercase: String,
    pub lowercase: String,
    pub digits: String,
    pub punctuation: String,
    pub unicode: String,
}

impl CharsetDefinitions {
    pub fn get(&self, tag: CharsetTag) -> &str {
        match tag {
            CharsetTag::Uppercase => &self.uppercase,
            CharsetTag::Lowercase => &self.lowercase,
            CharsetTag::Digits => &self.digits,
            CharsetTag::Punctuation => &self.punctuation,
            CharsetTag::Unicode => &self.unicode,
        }
    }
}

impl Default for CharsetDefinitions {
    fn default() -> CharsetDefinitions {
        CharsetDefinitions {
            uppercase: "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_owned(),
            lowercase: "abcdefghijklmnopqrstuvwxyz".to_owned(),
            digits: "0123456789".to_owned(),
            punctuation: r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##.to_owned(),
            unicode: "a1-ac,ae-ff".to_owned(),
        }
    }
}

/// Everything needed to generate a batch of passwords.
///
/// Built through [`GenerationConfig::builder`], which validates the numeric fields. A config
/// that arrives some other way (say, deserialized) is checked again by
/// [`Generator::new`](crate::Generator::new).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationConfig {
    tags: BTreeSet<CharsetTag>,
    charsets: CharsetDefinitions,
    require_all_sets: bool,
    no_triple_repeat: bool,
    length: usize,
    group_size: usize,
    count: usize,
    max_attempts: Option<u64>,
}

impl GenerationConfig {
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
    }

    pub fn tags(&self) -> &BTreeSet<CharsetTag> {
        &self.tags
    }

    pub fn charsets(&self) -> &CharsetDefinitions {
        &self.charsets
    }

    /// Every selected set must contribute at least one character.
    pub fn require_all_sets(&self) -> bool {
        self.require_all_sets
    }

    /// No character may appear three (or more) times in a row.
    pub fn no_triple_repeat(&self) -> bool {
        self.no_triple_repeat
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Characters per output group; 0 means no grouping.
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Upper bound on candidates drawn per password; `None` retries forever.
    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.tags.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        if self.length == 0 {
            return Err(Error::InvalidLength(self.length));
        }
        if self.count == 0 {
            return Err(Error::InvalidCount(self.count));
        }
        if let Some(0) = self.max_attempts {
            return Err(Error::InvalidAttempts(0));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> GenerationConfig {
        GenerationConfig {
            tags: [
                CharsetTag::Uppercase,
                CharsetTag::Lowercase,
                CharsetTag::Digits,
            ]
            .into_iter()
            .collect(),
            charsets: CharsetDefinitions::default(),
            require_all_sets: false,
            no_triple_repeat: false,
            length: 10,
            group_size: 0,
            count: 1,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn tags(mut self, tags: impl IntoIterator<Item = CharsetTag>) -> Self {
        self.config.tags = tags.into_iter().collect();
        self
    }

    pub fn charsets(mut self, charsets: CharsetDefinitions) -> Self {
        self.config.charsets = charsets;
        self
    }

    pub fn uppercase(mut self, chars: impl Into<String>) -> Self {
        self.config.charsets.uppercase = chars.into();
        self
    }

    pub fn lowercase(mut self, chars: impl Into<String>) -> Self {
        self.config.charsets.lowercase = chars.into();
        self
    }

    pub fn digits(mut self, chars: impl Into<String>) -> Self {
        self.config.charsets.digits = chars.into();
        self
    }

    pub fn punctuation(mut self, chars: impl Into<String>) -> Self {
        self.config.charsets.punctuation = chars.into();
        self
    }

    /// A codepoint list such as `"a1-ac,ae-ff"`.
    pub fn unicode(mut self, codepoints: impl Into<String>) -> Self {
        self.config.charsets.unicode = codepoints.into();
        self
    }

    pub fn require_all_sets(mut self, yes: bool) -> Self {
        self.config.require_all_sets = yes;
        self
    }

    pub fn no_triple_repeat(mut self, yes: bool) -> Self {
        self.config.no_triple_repeat = yes;
        self
    }

    pub fn length(mut self, length: usize) -> Self {
        self.config.length = length;
        self
    }

    pub fn group_size(mut self, group_size: usize) -> Self {
        self.config.group_size = group_size;
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.config.count = count;
        self
    }

    pub fn max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.config.max_attempts = max_attempts;
        self
    }

    pub fn build(self) -> Result<GenerationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
