//! Line-oriented view of the note form.

use notes_types::Note;
use std::fmt::Write;

use crate::error::WriteOp;
use crate::form::{Field, FormDraft};
use crate::sync::{CreateOutcome, NoteSyncClient, PendingWrite, SyncEvent};

pub const HELP: &str = "\
Commands:
  name <text>          set the note name
  description <text>   set the note description
  blood <text>         set the blood level
  create               create a note from the form
  delete <n|id>        delete note number n (or by id)
  list                 show the notes
  refresh              re-fetch notes from the server
  signout              sign out and quit
  help                 show this help";

/// Which note a delete refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 1-based position in the rendered list
    Index(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Create,
    Delete(Target),
    List,
    Refresh,
    SignOut,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        if let Ok(field) = word.parse::<Field>() {
            return Ok(Command::Set(field, rest.to_string()));
        }

        match word.to_ascii_lowercase().as_str() {
            "create" => Ok(Command::Create),
            "delete" | "rm" => {
                if rest.is_empty() {
                    return Err("delete needs a note number or id".to_string());
                }
                match rest.parse::<usize>() {
                    Ok(0) => Err("note numbers start at 1".to_string()),
                    Ok(n) => Ok(Command::Delete(Target::Index(n))),
                    Err(_) => Ok(Command::Delete(Target::Id(rest.to_string()))),
                }
            }
            "list" | "ls" => Ok(Command::List),
            "refresh" => Ok(Command::Refresh),
            "signout" | "quit" | "exit" => Ok(Command::SignOut),
            "help" | "?" => Ok(Command::Help),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{}' (try 'help')", other)),
        }
    }
}

/// What the view should do after a command.
#[derive(Debug)]
pub enum Reply {
    Render,
    Message(String),
    Submitted(String, PendingWrite),
    SignOut,
}

pub fn resolve<'a>(target: &Target, notes: &'a [Note]) -> Option<&'a Note> {
    match target {
        Target::Index(n) => n.checked_sub(1).and_then(|i| notes.get(i)),
        Target::Id(id) => notes.iter().find(|n| n.id.as_deref() == Some(id.as_str())),
    }
}

/// Run one command against the sync client.
pub async fn apply(sync: &mut NoteSyncClient, command: Command) -> Reply {
    match command {
        Command::Set(field, value) => {
            sync.draft_mut().set(field, value);
            Reply::Render
        }
        Command::Create => match sync.create() {
            CreateOutcome::Skipped => {
                let missing = sync
                    .draft()
                    .missing_field()
                    .map(|f| f.to_string())
                    .unwrap_or_default();
                Reply::Message(format!("Fill in '{}' before creating a note", missing))
            }
            CreateOutcome::Submitted(pending) => Reply::Submitted("Note created".to_string(), pending),
        },
        Command::Delete(target) => {
            let Some(note) = resolve(&target, sync.notes()).cloned() else {
                return Reply::Message("No such note".to_string());
            };
            match sync.delete(&note) {
                Ok(pending) => Reply::Submitted(format!("Deleted '{}'", note.name), pending),
                Err(e) => Reply::Message(e.to_string()),
            }
        }
        Command::List => Reply::Render,
        Command::Refresh => match sync.fetch_all().await {
            Ok(_) => Reply::Render,
            Err(e) => Reply::Message(format!("{} (showing last known notes)", e)),
        },
        Command::SignOut => Reply::SignOut,
        Command::Help => Reply::Message(HELP.to_string()),
    }
}

pub fn render(username: &str, notes: &[Note], draft: &FormDraft, loading: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== My Notes App ({}) ===", username);
    let _ = writeln!(out, "{}", if loading { "Loading..." } else { "Fully loaded" });
    let _ = writeln!(
        out,
        "Form: name='{}' description='{}' blood='{}'",
        draft.name, draft.description, draft.blood_level
    );

    if notes.is_empty() {
        let _ = writeln!(out, "(no notes)");
    }
    for (i, note) in notes.iter().enumerate() {
        let id = note.id.as_deref().unwrap_or("unsaved");
        let _ = writeln!(out, "{:>3}. {} [{}] blood level {}", i + 1, note.name, id, note.blood_level);
        let _ = writeln!(out, "     {}", note.description);
    }
    out
}

/// One-line notification for a finished remote write.
pub fn describe_event(event: &SyncEvent) -> Option<String> {
    match event {
        SyncEvent::WriteConfirmed { .. } => None,
        SyncEvent::WriteFailed { op, message, .. } => Some(match op {
            WriteOp::Create => format!("! Saving a note failed, it is only shown locally: {}", message),
            WriteOp::Delete => format!("! Deleting a note on the server failed: {}", message),
        }),
    }
}
