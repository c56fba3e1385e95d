use std::io::{self, Write};
use std::process;

use anyhow::Context;
use clap::Parser;
use rand::{CryptoRng, Rng};
use tracing_subscriber::EnvFilter;

use pwgen::{CharsetDefinitions, CharsetTag, GenerationConfig, Generator};

mod dump;

/// Generate passwords using a cryptographically secure random number generator.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The length of each password.
    #[arg(short, long, default_value_t = 10)]
    length: usize,
    /// Which character sets to use in the password: u=uppercase letters, l=lowercase letters,
    /// d=digits, p=punctuation, n=Unicode codepoints.
    #[arg(short, long, default_value = "uld")]
    sets: String,
    /// The set of uppercase letters.
    #[arg(long, default_value_t = CharsetDefinitions::default().uppercase)]
    uppercase: String,
    /// The set of lowercase letters.
    #[arg(long, default_value_t = CharsetDefinitions::default().lowercase)]
    lowercase: String,
    /// The set of digits.
    #[arg(long, default_value_t = CharsetDefinitions::default().digits)]
    digits: String,
    /// The set of punctuation characters.
    #[arg(long, default_value_t = CharsetDefinitions::default().punctuation)]
    punctuation: String,
    /// The hexadecimal Unicode codepoints (0-10ffff). A hyphen ("-") separates the first and last
    /// codepoint of a range. A comma (",") separates codepoints and ranges.
    #[arg(long, default_value_t = CharsetDefinitions::default().unicode)]
    unicode: String,
    /// Require at least one character from every selected set.
    #[arg(short, long)]
    all_sets: bool,
    /// Never put the same character three times in a row.
    #[arg(short = 'r', long)]
    no_repeat: bool,
    /// Split each password into space-separated groups of this many characters (0 disables
    /// grouping).
    #[arg(short, long, default_value_t = 0)]
    group: usize,
    /// How many passwords to generate, one per line.
    #[arg(short, long, default_value_t = 1)]
    count: usize,
    /// Give up after drawing this many candidates for a single password.
    #[arg(long, default_value_t = pwgen::DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u64,
    /// Keep drawing candidates for as long as it takes.
    #[arg(long)]
    unbounded: bool,
    /// Print the resolved settings (as JSON) to stderr before generating.
    #[arg(long)]
    show_settings: bool,
    /// Print the characters of each selected set to stderr before generating.
    #[arg(long)]
    show_alphabet: bool,
    /// Log more; repeat for even more. `PWGEN_LOG` overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn generation_config(&self) -> pwgen::Result<GenerationConfig> {
        let charsets = CharsetDefinitions {
            uppercase: self.uppercase.clone(),
            lowercase: self.lowercase.clone(),
            digits: self.digits.clone(),
            punctuation: self.punctuation.clone(),
            unicode: self.unicode.clone(),
        };
        GenerationConfig::builder()
            .tags(CharsetTag::parse_selection(&self.sets)?)
            .charsets(charsets)
            .require_all_sets(self.all_sets)
            .no_triple_repeat(self.no_repeat)
            .length(self.length)
            .group_size(self.group)
            .count(self.count)
            .max_attempts((!self.unbounded).then_some(self.max_attempts))
            .build()
    }
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("PWGEN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("failed to set up logging: {err}");
    }
}

fn run() -> Result<(), ProgError> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.generation_config()?;
    if args.show_settings {
        dump::show_settings(&config)?;
    }
    let generator = Generator::new(config)?;
    if args.show_alphabet {
        dump::show_alphabet(generator.alphabet())?;
    }

    let mut rng = rand::thread_rng();
    write_passwords(&generator, &mut rng, io::stdout().lock())
}

/// Generate the whole batch, then write it to `output`, one password per line.
///
/// Nothing is written if any password fails, so an error part way through the batch doesn't leave
/// a partial list behind.
fn write_passwords<R>(
    generator: &Generator,
    rng: &mut R,
    mut output: impl Write,
) -> Result<(), ProgError>
where
    R: Rng + CryptoRng,
{
    let passwords = generator.passwords(rng).collect::<Result<Vec<_>, _>>()?;
    tracing::info!(count = passwords.len(), "generated passwords");

    for password in &passwords {
        writeln!(output, "{password}").context("failed to write password")?;
    }
    output.flush().context("failed to flush output")?;
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => (),
        Err(ProgError::Other(err)) => {
            eprintln!("pwgen: {err:#}");
            process::exit(1);
        }
        Err(err) => {
            eprintln!("pwgen: {err}");
            process::exit(1);
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ProgError {
    #[error(transparent)]
    Generation(pwgen::Error),
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<pwgen::Error> for ProgError {
    fn from(err: pwgen::Error) -> ProgError {
        ProgError::Generation(err)
    }
}

impl From<anyhow::Error> for ProgError {
    fn from(err: anyhow::Error) -> ProgError {
        ProgError::Other(err)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pwgen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_match_library() {
        let config = parse(&[]).generation_config().unwrap();
        assert_eq!(config, GenerationConfig::default());
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "-l", "16", "-s", "ud", "-a", "-r", "-g", "4", "-c", "3", "--digits", "01",
        ]);
        let config = args.generation_config().unwrap();
        assert_eq!(config.length(), 16);
        assert_eq!(
            config.tags().iter().copied().collect::<Vec<_>>(),
            vec![CharsetTag::Uppercase, CharsetTag::Digits]
        );
        assert!(config.require_all_sets());
        assert!(config.no_triple_repeat());
        assert_eq!(config.group_size(), 4);
        assert_eq!(config.count(), 3);
        assert_eq!(config.charsets().digits, "01");
    }

    #[test]
    fn test_unbounded() {
        let config = parse(&["--unbounded"]).generation_config().unwrap();
        assert_eq!(config.max_attempts(), None);
        let config = parse(&["--max-attempts", "50"]).generation_config().unwrap();
        assert_eq!(config.max_attempts(), Some(50));
    }

    #[test]
    fn test_bad_sets() {
        assert_eq!(
            parse(&["-s", "uq"]).generation_config(),
            Err(pwgen::Error::UnknownCharsetTag('q'))
        );
        assert_eq!(
            parse(&["-s", ""]).generation_config(),
            Err(pwgen::Error::EmptyAlphabet)
        );
    }

    #[test]
    fn test_write_passwords_one_per_line() {
        let config = parse(&["-l", "8", "-g", "4", "-c", "3"]).generation_config().unwrap();
        let generator = Generator::new(config).unwrap();
        let mut output = Vec::new();
        write_passwords(&generator, &mut StdRng::seed_from_u64(1), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.chars().count() == 9));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_write_passwords_nothing_on_failure() {
        // Binary strings of 200 characters essentially always hold a run of three.
        let args = parse(&[
            "-s", "d", "--digits", "01", "-l", "200", "-r", "-c", "3", "--max-attempts", "1",
        ]);
        let generator = Generator::new(args.generation_config().unwrap()).unwrap();
        let mut output = Vec::new();
        let result = write_passwords(&generator, &mut StdRng::seed_from_u64(2), &mut output);
        assert!(matches!(
            result,
            Err(ProgError::Generation(pwgen::Error::GenerationUnachievable { attempts: 1 }))
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn test_args_are_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
