//! Reading and writing `git rebase -i` todo scripts.

use std::sync::LazyLock;

use regex::Regex;

use super::entry::{Action, CommitAction, MessageFlag};
use super::error::TodoError;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static TODO_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<verb>\S+)(?:\s+(?P<flag>-[cC]))?(?:\s+(?P<id>\S+))?(?:\s+(?P<subject>.*))?$")
        .unwrap()
});

/// Parses a todo script into entries.
///
/// Blank lines and `#` comments are skipped. Instructions the model does
/// not handle (exec, break, label...) come back as [`Action::Other`] with
/// the verb as commit id and the rest of the line as subject.
pub fn parse_script(text: &str) -> Result<Vec<CommitAction>, TodoError> {
    let mut entries = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || TodoError::MalformedLine {
            line: number + 1,
            content: line.to_string(),
        };
        let captures = TODO_LINE.captures(line).ok_or_else(malformed)?;
        let verb = &captures["verb"];

        let Some(action) = Action::from_verb(verb) else {
            let rest = line[verb.len()..].trim_start();
            entries.push(CommitAction::new(verb, rest, Action::Other));
            continue;
        };

        let id = captures
            .name("id")
            .map(|m| m.as_str())
            .ok_or_else(malformed)?;
        let subject = captures.name("subject").map_or("", |m| m.as_str().trim());
        // Only fixup takes -C/-c.
        let flag = captures
            .name("flag")
            .filter(|_| action == Action::Fixup)
            .and_then(|m| MessageFlag::from_option(m.as_str()));
        entries.push(CommitAction::new(id, subject, action).with_message_flag(flag));
    }

    Ok(entries)
}

/// Formats entries as a todo script, one `<action> [-C|-c] <commit> <subject>`
/// per line.
pub fn format_script(entries: &[CommitAction]) -> String {
    let mut script = String::new();
    for entry in entries {
        let verb = match entry.action {
            Action::Other => entry.commit_id.as_str(),
            action => action.as_str(),
        };
        script.push_str(verb);
        if let Some(flag) = entry.message_flag {
            script.push(' ');
            script.push_str(flag.as_str());
        }
        if entry.action != Action::Other {
            script.push(' ');
            script.push_str(&entry.commit_id);
        }
        if !entry.subject.is_empty() {
            script.push(' ');
            script.push_str(&entry.subject);
        }
        script.push('\n');
    }
    script
}
