/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Build { out_dir: String },
    Render { path: String },
    List { label: Option<String> },
    Labels,
    Login { token: String },
    Logout,
    Whoami,
    Help,
    Unknown(String),
}

pub const DEFAULT_OUT_DIR: &str = "site";

pub const USAGE: &str = "Usage: til <command>

Commands:
  build [<out_dir>]   Render the whole blog into <out_dir> (default: site)
  render <path>       Print the page for one path, e.g. /til/<slug> or /label/<label>
  list [<label>]      List posts, optionally only those carrying <label>
  labels              List labels with their post counts
  login <token>       Store a GitHub personal access token
  logout              Delete the stored token
  whoami              Show the account the token belongs to
  help                Show this message";

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
pub fn parse_args(args: &[String]) -> Command {
    let rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();

    match rest.as_slice() {
        [] | ["help"] | ["--help"] | ["-h"] => Command::Help,
        ["build"] => Command::Build {
            out_dir: DEFAULT_OUT_DIR.to_string(),
        },
        ["build", out_dir] => Command::Build {
            out_dir: out_dir.to_string(),
        },
        ["render"] => Command::Unknown("Missing path argument. Usage: til render <path>".to_string()),
        ["render", path] => Command::Render {
            path: path.to_string(),
        },
        ["list"] => Command::List { label: None },
        ["list", label] => Command::List {
            label: Some(label.to_string()),
        },
        ["labels"] => Command::Labels,
        ["login"] => Command::Unknown("Missing token argument. Usage: til login <token>".to_string()),
        ["login", token] if token.trim().is_empty() => {
            Command::Unknown("Token must not be empty.".to_string())
        }
        ["login", token] => Command::Login {
            token: token.trim().to_string(),
        },
        ["logout"] => Command::Logout,
        ["whoami"] => Command::Whoami,
        [cmd, ..] => Command::Unknown(format!("Unknown command: {cmd}{}", extra_suffix(&rest))),
    }
}

fn extra_suffix(rest: &[&str]) -> String {
    if rest.len() > 1 {
        format!(" (unexpected arguments: {})", rest[1..].join(" "))
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("til")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_no_command() {
        assert_eq!(parse_args(&args(&[])), Command::Help);
        assert_eq!(parse_args(&args(&["help"])), Command::Help);
        assert_eq!(parse_args(&args(&["--help"])), Command::Help);
    }

    #[test]
    fn test_parse_build_default_dir() {
        assert_eq!(
            parse_args(&args(&["build"])),
            Command::Build {
                out_dir: "site".to_string()
            }
        );
    }

    #[test]
    fn test_parse_build_with_dir() {
        assert_eq!(
            parse_args(&args(&["build", "public"])),
            Command::Build {
                out_dir: "public".to_string()
            }
        );
    }

    #[test]
    fn test_parse_render() {
        assert_eq!(
            parse_args(&args(&["render", "/til/foo"])),
            Command::Render {
                path: "/til/foo".to_string()
            }
        );
    }

    #[test]
    fn test_parse_render_missing_path() {
        assert_eq!(
            parse_args(&args(&["render"])),
            Command::Unknown("Missing path argument. Usage: til render <path>".to_string())
        );
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_args(&args(&["list"])), Command::List { label: None });
        assert_eq!(
            parse_args(&args(&["list", "rust"])),
            Command::List {
                label: Some("rust".to_string())
            }
        );
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(parse_args(&args(&["labels"])), Command::Labels);
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            parse_args(&args(&["login", " ghp_abc "])),
            Command::Login {
                token: "ghp_abc".to_string()
            }
        );
    }

    #[test]
    fn test_parse_login_missing_or_blank_token() {
        assert_eq!(
            parse_args(&args(&["login"])),
            Command::Unknown("Missing token argument. Usage: til login <token>".to_string())
        );
        assert_eq!(
            parse_args(&args(&["login", "  "])),
            Command::Unknown("Token must not be empty.".to_string())
        );
    }

    #[test]
    fn test_parse_logout_and_whoami() {
        assert_eq!(parse_args(&args(&["logout"])), Command::Logout);
        assert_eq!(parse_args(&args(&["whoami"])), Command::Whoami);
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse_args(&args(&["publish"])),
            Command::Unknown("Unknown command: publish".to_string())
        );
    }

    #[test]
    fn test_parse_too_many_args_for_known_command() {
        assert_eq!(
            parse_args(&args(&["whoami", "extra"])),
            Command::Unknown("Unknown command: whoami (unexpected arguments: extra)".to_string())
        );
        assert_eq!(
            parse_args(&args(&["build", "a", "b"])),
            Command::Unknown("Unknown command: build (unexpected arguments: a b)".to_string())
        );
    }
}
