use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "crop")]
#[command(about = "Run vision functions over a set of frames")]
#[command(version)]
#[command(after_help = "Examples:\n  \
    crop harris_crop images -i a.png -i b.png\n  \
    crop harris_crop directory json -i frames/ -a truth.json -f fine.toml -o out/")]
pub struct CliArgs {
    /// Function module (harris_crop)
    pub function: String,

    /// Input module (images | directory)
    pub input: String,

    /// Annotation module (json)
    pub annotations: Option<String>,

    /// Argument for the function initialiser (repeatable)
    #[arg(short = 'f', long = "farg", value_name = "ARG")]
    pub function_args: Vec<String>,

    /// Argument for the input initialiser (repeatable)
    #[arg(short = 'i', long = "iarg", value_name = "ARG")]
    pub input_args: Vec<String>,

    /// Argument for the annotation initialiser (repeatable)
    #[arg(short = 'a', long = "aarg", value_name = "ARG")]
    pub annotation_args: Vec<String>,

    /// Write each frame with its proposals drawn
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Worker threads (default: all cores)
    #[arg(short = 't', long)]
    pub threads: Option<NonZeroUsize>,

    /// Do not write annotated frames
    #[arg(short = 's', long)]
    pub silent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("crop").chain(args.iter().copied()))
    }

    #[test]
    fn test_positional_and_repeated_flags() {
        let args = parse(&[
            "harris_crop", "images", "json", "-i", "a.png", "--iarg", "b.png", "-a", "truth.json",
            "-f", "fine.toml", "-s",
        ])
        .unwrap();
        assert_eq!(args.function, "harris_crop");
        assert_eq!(args.input, "images");
        assert_eq!(args.annotations.as_deref(), Some("json"));
        assert_eq!(args.input_args, vec!["a.png", "b.png"]);
        assert_eq!(args.annotation_args, vec!["truth.json"]);
        assert_eq!(args.function_args, vec!["fine.toml"]);
        assert!(args.silent);
        assert!(args.output_dir.is_none());
        assert!(args.threads.is_none());
    }

    #[test]
    fn test_flags_may_precede_positionals() {
        let args = parse(&["-o", "out", "-t", "2", "harris_crop", "directory", "-i", "frames"]).unwrap();
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.threads.map(NonZeroUsize::get), Some(2));
        assert_eq!(args.input_args, vec!["frames"]);
        assert!(args.annotations.is_none());
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["harris_crop"]).is_err());
        assert!(parse(&["harris_crop", "images", "json", "extra"]).is_err());
        assert!(parse(&["harris_crop", "images", "-i"]).is_err());
        assert!(parse(&["harris_crop", "images", "--verbose"]).is_err());
        assert!(parse(&["harris_crop", "images", "-t", "zero"]).is_err());
        assert!(parse(&["harris_crop", "images", "-t", "0"]).is_err());
    }

    #[test]
    fn test_help_is_a_clap_exit() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        let err = parse(&["--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
