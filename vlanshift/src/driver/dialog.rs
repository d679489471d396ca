//! Dialogs: answering device questions while a command runs.
//!
//! Some commands stop and ask before finishing:
//! - `copy running-config flash:x` asks `Destination filename [x]?`
//! - `reload` asks `Proceed with reload? [confirm]`
//!
//! A [`Dialog`] is a list of [`Statement`]s. While the command runs, every
//! chunk of output is checked against the statement patterns; when one
//! matches, its action is called and whatever it returns is sent back as a
//! line. The dialog ends when the device prompt comes back.
//!
//! ```rust
//! use vlanshift::driver::{Dialog, Statement};
//!
//! let dialog = Dialog::new(vec![
//!     Statement::new(r"Destination filename \[(.*)\]\?")
//!         .unwrap()
//!         .reply("")
//!         .loop_continue(true)
//!         .continue_timer(false),
//! ]);
//! assert_eq!(dialog.statements().len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use regex::bytes::Regex;

use crate::channel::last_line;

/// Callback invoked when a statement's pattern is seen.
///
/// Returning `Some(line)` sends `line` to the device; `None` sends nothing.
pub type StatementAction = Arc<dyn Fn(&StatementMatch) -> Option<String> + Send + Sync>;

/// What a statement pattern matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementMatch {
    /// The matched text.
    pub text: String,

    /// Capture groups, `None` for groups that did not participate.
    pub captures: Vec<Option<String>>,
}

impl StatementMatch {
    /// Build a match from the first hit of `pattern` in `data`.
    pub fn find(pattern: &Regex, data: &[u8]) -> Option<Self> {
        let caps = pattern.captures(data)?;
        let text = caps
            .get(0)
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
            .unwrap_or_default();
        let captures = caps
            .iter()
            .skip(1)
            .map(|m| m.map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned()))
            .collect();
        Some(Self { text, captures })
    }

    /// Capture group `index` (1-based, like the regex).
    pub fn group(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.captures.get(i))
            .and_then(|c| c.as_deref())
    }
}

/// One pattern/action pair of a dialog.
#[derive(Clone)]
pub struct Statement {
    pattern: Regex,
    action: Option<StatementAction>,
    loop_continue: bool,
    continue_timer: bool,
}

impl Statement {
    /// A statement that does nothing when matched and ends statement
    /// matching. Use the builder methods to change that.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            action: None,
            loop_continue: false,
            continue_timer: true,
        })
    }

    /// Call `action` when the pattern matches.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&StatementMatch) -> Option<String> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Always answer with `line`.
    pub fn reply(self, line: impl Into<String>) -> Self {
        let line = line.into();
        self.action(move |_| Some(line.clone()))
    }

    /// Keep watching for statements after this one matched.
    pub fn loop_continue(mut self, enabled: bool) -> Self {
        self.loop_continue = enabled;
        self
    }

    /// `false` restarts the command timeout after this statement matched.
    pub fn continue_timer(mut self, enabled: bool) -> Self {
        self.continue_timer = enabled;
        self
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn keeps_looping(&self) -> bool {
        self.loop_continue
    }

    pub fn keeps_timer(&self) -> bool {
        self.continue_timer
    }

    /// Run the action for a match.
    pub fn respond(&self, matched: &StatementMatch) -> Option<String> {
        self.action.as_ref().and_then(|action| action(matched))
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("pattern", &self.pattern.as_str())
            .field("action", &self.action.as_ref().map(|_| "<callback>"))
            .field("loop_continue", &self.loop_continue)
            .field("continue_timer", &self.continue_timer)
            .finish()
    }
}

/// An ordered set of statements. Earlier statements win when several match.
#[derive(Debug, Clone, Default)]
pub struct Dialog {
    statements: Vec<Statement>,
}

impl Dialog {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Decide what a chunk of output means for a running dialog.
    ///
    /// A chunk whose last line is the device prompt ends the dialog, even
    /// if a question appears earlier in it: the device is no longer
    /// waiting. Otherwise the first watched statement that matches is
    /// answered. `watching` is false once a statement without
    /// `loop_continue` has matched.
    pub fn step(&self, watching: bool, chunk: &[u8], prompt: &Regex) -> DialogStep {
        if prompt.is_match(last_line(chunk)) {
            return DialogStep::Done;
        }
        if !watching {
            return DialogStep::Wait;
        }
        self.statements
            .iter()
            .find_map(|statement| {
                let hit = StatementMatch::find(statement.pattern(), chunk)?;
                Some(DialogStep::Answer {
                    reply: statement.respond(&hit),
                    matched: hit,
                    keep_watching: statement.keeps_looping(),
                    restart_timer: !statement.keeps_timer(),
                })
            })
            .unwrap_or(DialogStep::Wait)
    }
}

/// Next move of a dialog after one chunk of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogStep {
    /// The prompt came back.
    Done,

    /// A statement matched.
    Answer {
        matched: StatementMatch,
        /// Line to send back, if the action produced one.
        reply: Option<String>,
        keep_watching: bool,
        restart_timer: bool,
    },

    /// Nothing to act on yet; keep reading.
    Wait,
}

/// Outcome of a command run under a dialog.
#[derive(Debug, Clone)]
pub struct DialogResult {
    /// The command that started the dialog.
    pub command: String,

    /// Output with echo and final prompt removed.
    pub output: String,

    /// Text matched by each statement, in order.
    pub matched: Vec<String>,

    /// Prompt that ended the dialog.
    pub prompt: String,

    /// Failure marker found in the output, if any.
    pub failure_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_defaults() {
        let statement = Statement::new(r"\[confirm\]").unwrap();
        assert!(!statement.keeps_looping());
        assert!(statement.keeps_timer());
        let matched = StatementMatch::find(statement.pattern(), b"Proceed? [confirm]").unwrap();
        assert_eq!(statement.respond(&matched), None);
    }

    #[test]
    fn test_reply_and_captures() {
        let statement = Statement::new(r"Destination filename \[(.*)\]\?")
            .unwrap()
            .reply("")
            .loop_continue(true)
            .continue_timer(false);

        let matched = StatementMatch::find(
            statement.pattern(),
            b"copy running-config flash:sh-run-2026-10-17.txt\r\nDestination filename [sh-run-2026-10-17.txt]?",
        )
        .unwrap();

        assert_eq!(matched.group(1), Some("sh-run-2026-10-17.txt"));
        assert_eq!(matched.group(0), None);
        assert_eq!(statement.respond(&matched), Some(String::new()));
        assert!(statement.keeps_looping());
        assert!(!statement.keeps_timer());
    }

    #[test]
    fn test_action_sees_match() {
        let statement = Statement::new(r"Delete filename \[(\S+)\]\?")
            .unwrap()
            .action(|m| m.group(1).map(|name| format!("flash:{name}")));
        let matched =
            StatementMatch::find(statement.pattern(), b"Delete filename [old.txt]?").unwrap();
        assert_eq!(statement.respond(&matched), Some("flash:old.txt".to_string()));
    }

    fn prompt() -> Regex {
        Regex::new(r"[\w.\-]+[>#]\s*$").unwrap()
    }

    fn copy_dialog() -> Dialog {
        Dialog::new(vec![
            Statement::new(r"Destination filename \[(.*)\]\?")
                .unwrap()
                .reply("")
                .loop_continue(true)
                .continue_timer(false),
            Statement::new(r"\[confirm\]").unwrap().reply("y"),
        ])
    }

    #[test]
    fn test_step_looping_statement() {
        let step = copy_dialog().step(true, b"copy run flash:a.txt\r\nDestination filename [a.txt]?", &prompt());
        match step {
            DialogStep::Answer {
                matched,
                reply,
                keep_watching,
                restart_timer,
            } => {
                assert_eq!(matched.group(1), Some("a.txt"));
                assert_eq!(reply, Some(String::new()));
                assert!(keep_watching);
                assert!(restart_timer);
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_step_terminating_statement() {
        let dialog = copy_dialog();
        let step = dialog.step(true, b"Proceed with reload? [confirm]", &prompt());
        assert!(matches!(
            step,
            DialogStep::Answer {
                keep_watching: false,
                restart_timer: false,
                ..
            }
        ));
        // Once a terminating statement matched, questions are ignored.
        assert_eq!(dialog.step(false, b"Proceed with reload? [confirm]", &prompt()), DialogStep::Wait);
    }

    #[test]
    fn test_step_prompt_ends_chunk() {
        let dialog = copy_dialog();
        let chunk = b"Destination filename [a.txt]?\r\n1234 bytes copied\r\nswitch#";
        assert_eq!(dialog.step(true, chunk, &prompt()), DialogStep::Done);
        assert_eq!(dialog.step(false, b"switch#", &prompt()), DialogStep::Done);
        assert_eq!(Dialog::default().step(true, b"Copy in progress...", &prompt()), DialogStep::Wait);
    }

    #[test]
    fn test_step_earlier_statement_wins() {
        let dialog = copy_dialog();
        let step = dialog.step(true, b"Destination filename [a.txt]? [confirm]", &prompt());
        match step {
            DialogStep::Answer { reply, .. } => assert_eq!(reply, Some(String::new())),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_no_match() {
        let pattern = Regex::new(r"\[confirm\]").unwrap();
        assert!(StatementMatch::find(&pattern, b"switch#").is_none());
    }
}
