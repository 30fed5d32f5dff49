//! Command dispatch for one heapmeta session.

use std::io::Write;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use heapmeta_core::debugger::resolve_first;
use heapmeta_core::display::Verbosity;
use heapmeta_core::{Address, Debugger, MetaError, MetaResult, Session};
use heapmeta_utils::{debug, Settings};

use crate::command::{Action, MetaCommand};

/// What the input loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow
{
    Continue,
    Quit,
}

/// A session plus the collaborators needed to run commands against it.
pub struct Shell<D>
{
    session: Session,
    debugger: D,
    settings: Settings,
}

impl<D: Debugger> Shell<D>
{
    pub fn new(debugger: D, settings: Settings) -> Self
    {
        Self {
            session: Session::new(),
            debugger,
            settings,
        }
    }

    pub fn session(&self) -> &Session
    {
        &self.session
    }

    /// Split and run one input line.
    ///
    /// A leading `ptmeta` word is accepted and ignored.
    pub fn run_line(&mut self, line: &str, out: &mut dyn Write) -> MetaResult<Flow>
    {
        let words = shlex::split(line).ok_or_else(|| MetaError::Usage(format!("unbalanced quotes in: {line}")))?;
        if words.is_empty() {
            return Ok(Flow::Continue);
        }
        let words: &[String] = match words.split_first() {
            Some((first, rest)) if first == "ptmeta" => rest,
            _ => &words,
        };

        match words.first().map(String::as_str) {
            Some("quit" | "exit") => Ok(Flow::Quit),
            Some("help") => {
                write!(out, "{}", MetaCommand::command().render_help())?;
                Ok(Flow::Continue)
            }
            _ => match MetaCommand::try_parse_from(words) {
                Ok(command) => {
                    self.execute(command, out)?;
                    Ok(Flow::Continue)
                }
                Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                    write!(out, "{}", e.render())?;
                    Ok(Flow::Continue)
                }
                Err(e) => Err(MetaError::Usage(e.render().to_string())),
            },
        }
    }

    /// Run a parsed command.
    pub fn execute(&mut self, command: MetaCommand, out: &mut dyn Write) -> MetaResult<()>
    {
        let verbose = command.verbose;
        debug!(?command, "executing");

        let Some(action) = command.action else {
            if command.save {
                writeln!(out, "Saving metadata database to file...")?;
                return self.session.save_snapshot(&self.settings.snapshot_path);
            }
            if command.load {
                writeln!(out, "Loading metadata database from file...")?;
                return self.session.load_snapshot(&self.settings.snapshot_path);
            }
            return Err(MetaError::Usage(format!(
                "requires an action\n\n{}",
                MetaCommand::command().render_help()
            )));
        };

        match action {
            Action::Add { address, key, value } => {
                let address = self.resolve(&address)?;
                if verbose >= 1 {
                    writeln!(out, "Adding to metadata database...")?;
                }
                self.session.add(&mut self.debugger, address, &key, value.as_deref())
            }
            Action::Del { address } => {
                let address = self.resolve(&address)?;
                if verbose >= 1 && self.session.store().get(address).is_some() {
                    writeln!(out, "Deleting metadata for {address} from database...")?;
                }
                self.session.delete(address);
                Ok(())
            }
            Action::List { address, metadata, json } => {
                let address = address.map(|expression| self.resolve(&expression)).transpose()?;
                let formatter = self.session.formatter().with_color(self.settings.color);
                if json {
                    let selection = metadata.unwrap_or(heapmeta_core::query::FieldSelection::All);
                    let entries = formatter.structured(address, &selection);
                    writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
                } else {
                    formatter.render(out, address, metadata.as_ref(), Verbosity(verbose))?;
                }
                Ok(())
            }
            Action::Config { feature, key, values } => {
                if verbose >= 1 {
                    writeln!(out, "Configuring metadata database...")?;
                }
                self.session.configure(&feature, &key, &values).map(|_| ())
            }
        }
    }

    fn resolve(&mut self, expression: &str) -> MetaResult<Address>
    {
        resolve_first(&mut self.debugger, expression)
    }
}
