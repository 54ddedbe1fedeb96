use anyhow::Result;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use rofi_bookmarks::config::{self, ListOptions, Settings};
use rofi_bookmarks::tree::TitleStyle;
use rofi_bookmarks::{launch, listing, rofi, Error};

#[derive(Parser, Debug)]
#[command(name = "rofi-bookmarks")]
#[command(about = "Generate a list of Firefox bookmarks for rofi", long_about = None)]
#[command(version)]
struct Cli {
    /// Restrict the list to a bookmark folder, e.g. "toolbar/Work"
    #[arg(default_value = "")]
    path: String,

    /// Separator for full paths
    #[arg(short, long, default_value = config::DEFAULT_SEPARATOR, value_name = "SEP")]
    separator: String,

    /// Firefox profile to use instead of the default one
    #[arg(short, long, value_name = "PROF")]
    profile: Option<String>,

    /// Show the full folder path instead of only the bookmark title
    #[arg(short, long)]
    full_path: bool,

    /// With a folder filter, show paths relative to that folder
    #[arg(short, long)]
    relative: bool,

    /// Show favicons next to bookmarks
    #[arg(short, long)]
    icons: bool,

    /// Prompt text shown by rofi
    #[arg(long, default_value = config::DEFAULT_PROMPT)]
    prompt: String,

    /// Browser executable used to open the selection
    #[arg(long, env = "ROFI_BOOKMARKS_BROWSER")]
    browser: Option<String>,

    /// Directory containing installs.ini and profiles.ini
    #[arg(long, env = "ROFI_BOOKMARKS_PROFILE_ROOT")]
    profile_root: Option<PathBuf>,

    /// Where favicons are cached
    #[arg(long, env = "ROFI_BOOKMARKS_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    rest: Vec<String>,
}

/// Remove `unknown` (as reported by clap) from `args`. Handles `--flag`,
/// `--flag=value` and a short flag bundled with others (`-fx` -> `-f`).
/// Returns false when no argument could be attributed to it.
fn drop_unknown(args: &mut Vec<String>, unknown: &str) -> bool {
    let with_value = format!("{}=", unknown);
    if let Some(i) = args
        .iter()
        .skip(1)
        .position(|a| a == unknown || a.starts_with(&with_value))
    {
        debug!("Ignoring unknown argument {:?}", args[i + 1]);
        args.remove(i + 1);
        return true;
    }

    let mut short = unknown.strip_prefix('-').unwrap_or_default().chars();
    let (Some(flag), None) = (short.next(), short.next()) else {
        return false;
    };
    let bundle = args.iter().skip(1).position(|a| {
        a.len() > 2 && a.starts_with('-') && !a.starts_with("--") && a[1..].contains(flag)
    });
    let Some(i) = bundle else {
        return false;
    };

    let arg = &mut args[i + 1];
    debug!("Ignoring unknown flag -{} in {:?}", flag, arg);
    if let Some(pos) = arg[1..].find(flag) {
        arg.remove(pos + 1);
    }
    if arg.as_str() == "-" {
        args.remove(i + 1);
    }
    true
}

/// Parse the command line, dropping arguments clap does not know instead of
/// failing. rofi appends the selected entry, and user wrappers may add more.
fn parse_lenient() -> Cli {
    let mut args: Vec<String> = std::env::args().collect();
    loop {
        let err = match Cli::try_parse_from(&args) {
            Ok(cli) => return cli,
            Err(e) => e,
        };
        if err.kind() != ErrorKind::UnknownArgument {
            err.exit();
        }
        let Some(ContextValue::String(unknown)) = err.get(ContextKind::InvalidArg) else {
            err.exit();
        };
        if !drop_unknown(&mut args, unknown) {
            err.exit();
        }
    }
}

fn main() -> Result<()> {
    // stdout belongs to rofi, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = parse_lenient();
    if !cli.rest.is_empty() {
        debug!("Ignoring extra arguments: {:?}", cli.rest);
    }

    let settings = Settings::resolve(cli.profile_root, cli.cache_dir, cli.browser)?;

    if rofi::is_selection(std::env::var(rofi::RETV_VAR).ok().as_deref()) {
        let url = std::env::var(rofi::INFO_VAR).map_err(|_| Error::MissingSelection)?;
        launch::launch(&settings.browser, &url, cli.profile.as_deref());
        return Ok(());
    }

    let style = if cli.full_path {
        TitleStyle::FullPath {
            separator: cli.separator,
        }
    } else {
        TitleStyle::FinalSegment
    };

    let options = ListOptions {
        filter: config::parse_filter(&cli.path),
        style,
        relative: cli.relative,
        icons: cli.icons,
        prompt: cli.prompt,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    listing::run(&settings, cli.profile.as_deref(), &options, &mut out)?;

    Ok(())
}
