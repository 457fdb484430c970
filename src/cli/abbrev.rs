// Command abbreviation matching for the changedesk CLI

/// Find all commands that start with the given prefix (case-insensitive)
pub fn find_matching_commands<'a>(prefix: &str, commands: &'a [&str]) -> Vec<&'a str> {
    let prefix_lower = prefix.to_lowercase();
    commands.iter()
        .filter(|cmd| cmd.to_lowercase().starts_with(&prefix_lower))
        .copied()
        .collect()
}

/// Find a unique command match for the given prefix
/// Returns Ok(command) if exactly one match, Err(matches) if ambiguous, Err(empty) if no match
/// Note: Exact matches take precedence over prefix matches (e.g., "result" matches "result" not "results")
pub fn find_unique_command<'a>(prefix: &str, commands: &'a [&str]) -> Result<&'a str, Vec<&'a str>> {
    let prefix_lower = prefix.to_lowercase();
    for cmd in commands {
        if cmd.to_lowercase() == prefix_lower {
            return Ok(*cmd);
        }
    }

    let matches = find_matching_commands(prefix, commands);

    if matches.is_empty() {
        Err(Vec::new())
    } else if matches.len() == 1 {
        Ok(matches[0])
    } else {
        Err(matches)
    }
}

/// Top-level commands
pub const TOP_LEVEL_COMMANDS: &[&str] = &[
    "login", "logout", "whoami", "profile", "forgot-password", "dashboard", "emergency",
    "changes", "approvals", "patch-jobs", "schedules", "assets", "workflow", "roles",
];

pub const EMERGENCY_COMMANDS: &[&str] = &["list", "show"];

pub const CHANGES_COMMANDS: &[&str] = &["list", "show", "results", "result"];

pub const APPROVALS_COMMANDS: &[&str] = &["list", "show", "approve", "reject", "need-info", "role"];

pub const PATCH_JOB_COMMANDS: &[&str] = &[
    "list", "show", "create", "assign", "options", "results", "result",
];

pub const SCHEDULES_COMMANDS: &[&str] = &["list"];

pub const ASSETS_COMMANDS: &[&str] = &[
    "list", "show", "history", "relations", "specs", "update", "by-category", "by-type",
];

/// Get subcommands for a given top-level command
pub fn get_subcommands(command: &str) -> Option<&'static [&'static str]> {
    match command {
        "emergency" => Some(EMERGENCY_COMMANDS),
        "changes" => Some(CHANGES_COMMANDS),
        "approvals" => Some(APPROVALS_COMMANDS),
        "patch-jobs" => Some(PATCH_JOB_COMMANDS),
        "schedules" => Some(SCHEDULES_COMMANDS),
        "assets" => Some(ASSETS_COMMANDS),
        _ => None,
    }
}

fn ambiguous(kind: &str, arg: &str, matches: &[&str]) -> String {
    format!("Ambiguous {} '{}'. Did you mean one of: {}?", kind, arg, matches.join(", "))
}

/// Expand command abbreviations in argument list
/// Returns expanded args or error message
pub fn expand_command_abbreviations(args: Vec<String>) -> Result<Vec<String>, String> {
    let Some(first) = args.first() else {
        return Ok(args);
    };
    if first.starts_with('-') {
        return Ok(args);
    }

    let mut expanded = Vec::with_capacity(args.len());
    let mut rest = args.iter().skip(1);

    let command = match find_unique_command(first, TOP_LEVEL_COMMANDS) {
        Ok(full_cmd) => full_cmd,
        Err(matches) if matches.is_empty() => {
            // Unknown command, let clap report it
            return Ok(args);
        }
        Err(matches) => return Err(ambiguous("command", first, &matches)),
    };
    expanded.push(command.to_string());

    if let Some(subcommands) = get_subcommands(command) {
        if let Some(next_arg) = rest.next() {
            if next_arg.starts_with('-') {
                expanded.push(next_arg.clone());
            } else {
                match find_unique_command(next_arg, subcommands) {
                    Ok(full_subcmd) => expanded.push(full_subcmd.to_string()),
                    Err(matches) if matches.is_empty() => expanded.push(next_arg.clone()),
                    Err(matches) => return Err(ambiguous("subcommand", next_arg, &matches)),
                }
            }
        }
    }

    expanded.extend(rest.cloned());
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_matching_commands() {
        let commands = &["list", "show", "history"];
        assert_eq!(find_matching_commands("s", commands), vec!["show"]);
        assert_eq!(find_matching_commands("L", commands), vec!["list"]);
        assert!(find_matching_commands("x", commands).is_empty());
    }

    #[test]
    fn test_exact_match_wins() {
        assert_eq!(find_unique_command("result", CHANGES_COMMANDS), Ok("result"));
        assert_eq!(find_unique_command("results", CHANGES_COMMANDS), Ok("results"));
        let err = find_unique_command("res", CHANGES_COMMANDS).unwrap_err();
        assert_eq!(err, vec!["results", "result"]);
    }

    #[test]
    fn test_expand_top_level_and_subcommand() {
        assert_eq!(
            expand_command_abbreviations(args(&["app", "rej", "CR-1", "--note", "x"])),
            Ok(args(&["approvals", "reject", "CR-1", "--note", "x"]))
        );
        assert_eq!(
            expand_command_abbreviations(args(&["as", "by-c"])),
            Ok(args(&["assets", "by-category"]))
        );
        assert_eq!(
            expand_command_abbreviations(args(&["wh"])),
            Ok(args(&["whoami"]))
        );
    }

    #[test]
    fn test_ambiguous_prefixes() {
        let err = expand_command_abbreviations(args(&["lo"])).unwrap_err();
        assert_eq!(err, "Ambiguous command 'lo'. Did you mean one of: login, logout?");

        let err = expand_command_abbreviations(args(&["patch", "re"])).unwrap_err();
        assert!(err.starts_with("Ambiguous subcommand 're'"));
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(expand_command_abbreviations(args(&["--version"])), Ok(args(&["--version"])));
        assert_eq!(expand_command_abbreviations(args(&["bogus", "x"])), Ok(args(&["bogus", "x"])));
        // Positional arguments after workflow are left alone
        assert_eq!(
            expand_command_abbreviations(args(&["work", "patch-job", "Staged"])),
            Ok(args(&["workflow", "patch-job", "Staged"]))
        );
        assert_eq!(expand_command_abbreviations(Vec::new()), Ok(Vec::new()));
    }
}
